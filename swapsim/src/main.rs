mod analyze;
mod bench;
mod cli;
mod generate;
mod run;
mod sink;
mod summary;
mod trace;

use tracing::info;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let (cli, defaulted) = Cli::parse();
    let verbosity = cli.verbosity();
    sink::init(verbosity);

    for (arg, value) in defaulted {
        info!("Arg {} defaulted to {}", arg, value);
    }

    match cli.command {
        cli::Commands::Run(args) => {
            run::run(args, verbosity)?;
        }
        cli::Commands::Generate(args) => {
            generate::run(args, verbosity)?;
        }
        cli::Commands::Analyze(args) => {
            analyze::run(args, verbosity)?;
        }
    }

    Ok(())
}
