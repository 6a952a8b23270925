//! A crate for simulating how the anonymity of block proposers diffuses in a
//! repeated blind-and-swap shuffle, and for measuring how hard they are to
//! deanonymize.

mod identity;
pub use identity::Identity;

mod distribution;
pub use distribution::{merge, Condensed, Distribution};

mod config;
pub use config::{ConfigError, NetworkConfig};

mod schedule;
pub use schedule::RandomSchedule;

pub mod diagnostics;

mod network;
pub use network::{simulate, RoundOutcome, ShuffleNetwork};

mod analysis;
pub use analysis::{
    deanonymization_threshold, deanonymization_thresholds, deanonymization_thresholds_at,
    DEFAULT_COVERAGE,
};
