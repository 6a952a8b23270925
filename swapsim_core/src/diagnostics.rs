//! Leveled diagnostics emitted while a simulation runs.
//!
//! The core never prints. It hands messages to a [DiagnosticSink] chosen by
//! the caller, which decides (via its [Verbosity]) what is worth producing.

/// How detailed a diagnostic message is
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Coarse progress, e.g. every few hundred rounds
    Progress = 1,
    /// Every layer and swap of the network
    Detail = 2,
    /// Full snapshots of the array. Expensive to format.
    Snapshot = 3,
}

/// The most detailed [Level] that should be emitted. Zero silences everything.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Verbosity(pub u8);

impl Verbosity {
    pub fn permits(self, level: Level) -> bool {
        level as u8 <= self.0
    }
}

/// Receiver of diagnostics.
pub trait DiagnosticSink {
    /// Whether messages of `level` are wanted at all
    fn enabled(&self, level: Level) -> bool;

    /// Emit a message that passed [Self::enabled]
    fn write(&mut self, level: Level, message: &str);

    /// Emit a literal message
    fn log(&mut self, level: Level, message: &str) {
        if self.enabled(level) {
            self.write(level, message);
        }
    }

    /// Emit a message that is only produced if `level` is enabled
    fn log_with<F>(&mut self, level: Level, producer: F)
    where
        F: FnOnce() -> String,
        Self: Sized,
    {
        if self.enabled(level) {
            let message = producer();
            self.write(level, &message);
        }
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }

    fn write(&mut self, level: Level, message: &str) {
        (**self).write(level, message)
    }
}

/// Discards all diagnostics
#[derive(Copy, Clone, Debug, Default)]
pub struct Silent;

impl DiagnosticSink for Silent {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn write(&mut self, _level: Level, _message: &str) {}
}

/// Keeps all permitted diagnostics in memory
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    verbosity: Verbosity,
    records: Vec<(Level, String)>,
}

impl Recorder {
    pub fn new(verbosity: Verbosity) -> Recorder {
        Recorder {
            verbosity,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[(Level, String)] {
        &self.records
    }

    /// Messages recorded at exactly `level`
    pub fn messages(&self, level: Level) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter(move |(l, _)| *l == level)
            .map(|(_, message)| message.as_str())
    }
}

impl DiagnosticSink for Recorder {
    fn enabled(&self, level: Level) -> bool {
        self.verbosity.permits(level)
    }

    fn write(&mut self, level: Level, message: &str) {
        self.records.push((level, message.to_owned()));
    }
}
