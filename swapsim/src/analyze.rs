use tracing::{info, warn};

use swapsim_core::diagnostics::Verbosity;
use swapsim_core::deanonymization_thresholds_at;

use crate::cli::AnalyzeArgs;
use crate::sink::TracingSink;
use crate::summary::{self, Summary};
use crate::trace::{self, AnonymitySetTrace};

pub fn run(args: AnalyzeArgs, verbosity: Verbosity) -> anyhow::Result<()> {
    let trace = AnonymitySetTrace::read_from_file(&args.input)?;
    info!(
        "Loaded {} anonymity sets (seed {}) from {}",
        trace.proposers.len(),
        trace.seed,
        args.input.display()
    );

    let (thresholds, summary) = analyze(&trace, args.coverage, verbosity);

    summary::print_params(&trace.config);
    match summary {
        Some(s) => s.print(args.coverage),
        None => warn!("The trace holds no proposers, there is nothing to summarize."),
    }

    if let Some(path) = args.output {
        trace::write_thresholds(&path, &[(0, thresholds)])?;
        info!("Wrote thresholds to {}", path.display());
    }

    Ok(())
}

fn analyze(
    trace: &AnonymitySetTrace,
    coverage: f64,
    verbosity: Verbosity,
) -> (Vec<usize>, Option<Summary>) {
    let thresholds = deanonymization_thresholds_at(&trace.proposers, coverage);
    let mut sink = TracingSink::new(verbosity, 0);
    summary::log_proposers(&mut sink, &trace.proposers, &thresholds);
    let summary = Summary::steady_state(&thresholds);
    (thresholds, summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_thresholds() {
        let trace = AnonymitySetTrace::read_from_file("./test/anonymity_sets.json").unwrap();
        let (thresholds, summary) = analyze(&trace, 0.2, Verbosity(0));
        assert_eq!(thresholds, vec![1, 2, 1, 4]);

        let summary = summary.unwrap();
        assert_eq!(summary.proposers, 2);
        assert_eq!(summary.average, 2.5);
        assert_eq!(summary.fully_deanonymized, 0.5);
    }

    #[test]
    fn fixture_thresholds_at_half_coverage() {
        let trace = AnonymitySetTrace::read_from_file("./test/anonymity_sets.json").unwrap();
        let (thresholds, _) = analyze(&trace, 0.5, Verbosity(0));
        assert_eq!(thresholds, vec![1, 4, 1, 8]);
    }
}
