use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use swapsim_core::diagnostics::Verbosity;
use swapsim_core::Distribution;

use crate::bench;
use crate::cli::GenerateArgs;
use crate::sink::TracingSink;
use crate::trace::AnonymitySetTrace;

pub fn run(args: GenerateArgs, verbosity: Verbosity) -> anyhow::Result<()> {
    let mut bench = bench::Bench::new();
    let bench_enabled = true;

    let config = args.network.config();
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Simulating with seed {}...", seed);

    bench.measure("simulate", bench_enabled);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sink = TracingSink::new(verbosity, 0);
    let proposers = swapsim_core::simulate(&config, &mut rng, &mut sink)?;

    bench.measure("write to file", bench_enabled);
    let trace = AnonymitySetTrace {
        config,
        seed,
        proposers: proposers.iter().map(|p| Distribution::clone(p)).collect(),
    };
    trace.write_to_file(&args.output)?;
    info!(
        "Saved {} anonymity sets to {}",
        trace.proposers.len(),
        args.output.display()
    );

    Ok(())
}
