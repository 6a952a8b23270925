use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{info, warn};

use swapsim_core::diagnostics::Verbosity;
use swapsim_core::deanonymization_thresholds_at;

use crate::bench;
use crate::cli::RunArgs;
use crate::sink::TracingSink;
use crate::summary::{self, Summary};
use crate::trace;

pub fn run(args: RunArgs, verbosity: Verbosity) -> anyhow::Result<()> {
    let mut bench = bench::Bench::new();
    let bench_enabled = true;

    let config = args.network.config();
    // fail before any trial starts
    config.validate()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Seeding trial 0 with {}", seed);

    // Progress printer. Takes progress info via a channel from the trials
    // and reports it. This thread finishes as soon as a false value is sent
    // to the channel, or the channel is closed.
    let (progress_s, progress_r) = crossbeam_channel::unbounded::<bool>();
    let total = args.trials;
    let thread_handle = std::thread::spawn(move || {
        let mut seen: u64 = 0;
        while let Ok(value) = progress_r.recv() {
            if !value {
                break;
            }
            seen += 1;
            if total > 1 {
                info!("Finished trial {}/{}", seen, total);
            }
        }
    });

    bench.measure("simulate trials", bench_enabled);
    let results: anyhow::Result<Vec<(u64, Vec<usize>)>> = (0..args.trials)
        .into_par_iter()
        .map(|trial| -> anyhow::Result<(u64, Vec<usize>)> {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(trial));
            let mut sink = TracingSink::new(verbosity, trial);

            let proposers = swapsim_core::simulate(&config, &mut rng, &mut sink)?;
            let thresholds = deanonymization_thresholds_at(&proposers, args.coverage);
            summary::log_proposers(&mut sink, &proposers, &thresholds);

            progress_s.send(true)?;
            Ok((trial, thresholds))
        })
        .collect();

    progress_s.send(false)?;
    if thread_handle.join().is_err() {
        warn!("Progress printer panicked");
    }
    let mut results = results?;
    results.sort_unstable_by_key(|(trial, _)| *trial);

    bench.measure("summarize", bench_enabled);
    summary::print_params(&config);
    if results.len() > 1 {
        for (trial, thresholds) in results.iter() {
            if let Some(s) = Summary::steady_state(thresholds) {
                info!(
                    "Trial {}: average {}, std dev {:.3}, fully deanonymized {}",
                    trial, s.average, s.std_dev, s.fully_deanonymized
                );
            }
        }
    }

    let per_trial: Vec<Vec<usize>> = results.iter().map(|(_, t)| t.clone()).collect();
    match Summary::pooled(&per_trial) {
        Some(s) => s.print(args.coverage),
        None => warn!("No proposer was extracted, there is nothing to summarize."),
    }

    if let Some(path) = args.output {
        bench.measure("write thresholds", bench_enabled);
        trace::write_thresholds(&path, &results)?;
        info!("Wrote thresholds to {}", path.display());
    }

    Ok(())
}
