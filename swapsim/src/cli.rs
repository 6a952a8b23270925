use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};

use swapsim_core::diagnostics::Verbosity;
use swapsim_core::{NetworkConfig, DEFAULT_COVERAGE};

/// Tool to simulate the anonymity of proposers in a blind-and-swap shuffle.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity: 0 = quiet, 1 = progress, 2 = every swap, 3 = array snapshots
    #[arg(long, global = true, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub log_level: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate one or more trials and print the steady-state anonymity
    Run(RunArgs),
    /// Simulate a single trial and save the proposers' anonymity sets
    Generate(GenerateArgs),
    /// Analyze saved anonymity sets, estimating how easily proposers are found
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
pub struct NetworkArgs {
    /// Number of slots in the shuffled array (a power of two)
    #[arg(long, default_value_t = 2048)]
    pub width: usize,

    /// Number of rounds to simulate
    #[arg(long, default_value_t = 4096)]
    pub rounds: usize,

    /// Swaps per round (a power of two, minus one)
    #[arg(long, default_value_t = 31)]
    pub swaps_per_round: usize,

    /// Percentage of rounds whose shuffler is offline
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub offline_percent: u32,
}

impl NetworkArgs {
    pub fn config(&self) -> NetworkConfig {
        NetworkConfig {
            width: self.width,
            rounds: self.rounds,
            swaps_per_round: self.swaps_per_round,
            offline_percent: self.offline_percent,
        }
    }

    /// Names and values of all parameters the user left out
    fn defaulted(&self, matches: &ArgMatches) -> Vec<(&'static str, String)> {
        let values = [
            ("width", self.width.to_string()),
            ("rounds", self.rounds.to_string()),
            ("swaps_per_round", self.swaps_per_round.to_string()),
            ("offline_percent", self.offline_percent.to_string()),
        ];
        values
            .into_iter()
            .filter(|(id, _)| matches.value_source(id) == Some(ValueSource::DefaultValue))
            .collect()
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Number of independent trials, run in parallel
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub trials: u64,

    /// Seed of the first trial. Trial `i` uses `seed + i`. Random if left out.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fraction of belief mass the adversary wants to cover
    #[arg(long, default_value_t = DEFAULT_COVERAGE, value_parser = parse_coverage)]
    pub coverage: f64,

    /// Output the threshold of every proposer as CSV
    #[arg(long, value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Seed of the simulation. Random if left out.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output JSON file to save the anonymity sets to (zstd compressed if it ends in .zst)
    #[arg(value_name = "OUTPUT_FILE")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input file with anonymity sets, as written by `generate`
    #[arg(value_name = "TRACE_FILE")]
    pub input: PathBuf,

    /// Fraction of belief mass the adversary wants to cover
    #[arg(long, default_value_t = DEFAULT_COVERAGE, value_parser = parse_coverage)]
    pub coverage: f64,

    /// Output the threshold of every proposer as CSV
    #[arg(long, value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Parse the command line. Also returns the network parameters that
    /// were filled in with their defaults.
    pub fn parse() -> (Cli, Vec<(&'static str, String)>) {
        let matches = <Cli as CommandFactory>::command().get_matches();
        let cli = match <Cli as FromArgMatches>::from_arg_matches(&matches) {
            Ok(cli) => cli,
            Err(e) => e.exit(),
        };

        let defaulted = match (&cli.command, matches.subcommand()) {
            (Commands::Run(args), Some((_, sub))) => args.network.defaulted(sub),
            (Commands::Generate(args), Some((_, sub))) => args.network.defaulted(sub),
            _ => Vec::new(),
        };
        (cli, defaulted)
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity(self.log_level)
    }
}

fn parse_coverage(s: &str) -> Result<f64, String> {
    let coverage: f64 = s
        .parse()
        .map_err(|_| format!("Invalid coverage \"{}\".", s))?;
    if coverage > 0.0 && coverage <= 1.0 {
        Ok(coverage)
    } else {
        Err(format!("Coverage must lie in (0, 1], got {}.", coverage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn try_parse(args: &[&str]) -> Result<(Cli, ArgMatches), clap::Error> {
        let matches = <Cli as CommandFactory>::command().try_get_matches_from(args)?;
        let cli = <Cli as FromArgMatches>::from_arg_matches(&matches)?;
        Ok((cli, matches))
    }

    #[test]
    fn cli_is_well_formed() {
        <Cli as CommandFactory>::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_protocol_parameters() {
        let (cli, matches) = try_parse(&["swapsim", "run", "--width", "64"]).unwrap();
        assert_eq!(cli.log_level, 1);
        let Commands::Run(args) = cli.command else {
            panic!("expected the run command");
        };
        assert_eq!(
            args.network.config(),
            NetworkConfig {
                width: 64,
                ..NetworkConfig::default()
            }
        );
        assert_eq!(args.trials, 1);
        assert_eq!(args.coverage, DEFAULT_COVERAGE);

        let (_, sub) = matches.subcommand().unwrap();
        let defaulted: Vec<&str> = args
            .network
            .defaulted(sub)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(defaulted, vec!["rounds", "swaps_per_round", "offline_percent"]);
    }

    #[test]
    fn offline_percent_is_bounded() {
        assert!(try_parse(&["swapsim", "run", "--offline-percent", "101"]).is_err());
        assert!(try_parse(&["swapsim", "run", "--offline-percent", "100"]).is_ok());
    }

    #[test]
    fn coverage_must_be_a_fraction() {
        assert!(parse_coverage("0.5").is_ok());
        assert!(parse_coverage("0").is_err());
        assert!(parse_coverage("1.5").is_err());
        assert!(parse_coverage("lots").is_err());
    }

    #[test]
    fn log_level_is_global() {
        let (cli, _) =
            try_parse(&["swapsim", "analyze", "sets.json", "--log-level", "3"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity(3));
    }
}
