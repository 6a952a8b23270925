use tracing::level_filters::LevelFilter;

use swapsim_core::diagnostics::{DiagnosticSink, Level, Verbosity};

/// Forwards the simulator's diagnostics to `tracing`, tagged with the trial
/// they belong to.
pub struct TracingSink {
    verbosity: Verbosity,
    trial: u64,
}

impl TracingSink {
    pub fn new(verbosity: Verbosity, trial: u64) -> TracingSink {
        TracingSink { verbosity, trial }
    }
}

impl DiagnosticSink for TracingSink {
    fn enabled(&self, level: Level) -> bool {
        self.verbosity.permits(level)
    }

    fn write(&mut self, level: Level, message: &str) {
        match level {
            Level::Progress => tracing::info!(trial = self.trial, "{}", message),
            Level::Detail => tracing::debug!(trial = self.trial, "{}", message),
            Level::Snapshot => tracing::trace!(trial = self.trial, "{}", message),
        }
    }
}

/// The most detailed tracing level that a verbosity lets through
pub fn level_filter(verbosity: Verbosity) -> LevelFilter {
    match verbosity.0 {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber, printing to stderr
pub fn init(verbosity: Verbosity) {
    tracing_subscriber::fmt()
        .with_max_level(level_filter(verbosity))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
