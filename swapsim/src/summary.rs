use std::borrow::Borrow;

use color_print::cprintln;
use statrs::statistics::Statistics;

use swapsim_core::diagnostics::{DiagnosticSink, Level};
use swapsim_core::{Distribution, NetworkConfig};

/// Candidates shown per proposer when logging its anonymity set
const LOGGED_CANDIDATES: usize = 8;

/// Statistics over the steady state of a run.
///
/// The first half of the thresholds belongs to the warm-up of the network
/// and is left out.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Number of proposers that went into the statistics
    pub proposers: usize,
    /// Mean number of candidates to take out for the target coverage
    pub average: f64,
    pub std_dev: f64,
    /// Fraction of proposers that were fully deanonymized (threshold 1)
    pub fully_deanonymized: f64,
}

impl Summary {
    /// Summarize the second half of `thresholds`. `None` if there is nothing
    /// to summarize.
    pub fn steady_state(thresholds: &[usize]) -> Option<Summary> {
        Self::from_steady_states([thresholds])
    }

    /// Pool the steady states of several trials into one summary
    pub fn pooled(trials: &[Vec<usize>]) -> Option<Summary> {
        Self::from_steady_states(trials.iter().map(|t| t.as_slice()))
    }

    fn from_steady_states<'a>(trials: impl IntoIterator<Item = &'a [usize]>) -> Option<Summary> {
        let steady: Vec<f64> = trials
            .into_iter()
            .flat_map(|thresholds| &thresholds[thresholds.len() / 2..])
            .map(|threshold| *threshold as f64)
            .collect();
        if steady.is_empty() {
            return None;
        }

        let fully_deanonymized =
            steady.iter().filter(|t| **t == 1.0).count() as f64 / steady.len() as f64;
        Some(Summary {
            proposers: steady.len(),
            average: steady.iter().mean(),
            std_dev: steady.iter().std_dev(),
            fully_deanonymized,
        })
    }

    pub fn print(&self, coverage: f64) {
        let percent = coverage * 100.0;
        cprintln!(
            "Average <bold>{}%</>-diffusion of proposer: <green>{}</> (std dev {:.3}, {} proposers)",
            percent,
            self.average,
            self.std_dev,
            self.proposers
        );
        cprintln!(
            "Frequency of <bold>{}%</>-diffusion = 1: <red>{}</>",
            percent,
            self.fully_deanonymized
        );
    }
}

pub fn print_params(config: &NetworkConfig) {
    cprintln!(
        "<bold>Params</> [width: {}, rounds: {}, swaps: {}, offline: {}]",
        config.width,
        config.rounds,
        config.swaps_per_round,
        config.offline_percent
    );
}

/// Log every proposer's anonymity set next to its threshold. Only produced
/// at snapshot verbosity.
pub fn log_proposers<S, D>(sink: &mut S, proposers: &[D], thresholds: &[usize])
where
    S: DiagnosticSink,
    D: Borrow<Distribution>,
{
    for (proposer, threshold) in proposers.iter().zip(thresholds) {
        sink.log_with(Level::Snapshot, || {
            format!(
                "Dealing with proposer (threshold: {}) with the following probs: {}",
                threshold,
                proposer.borrow().condensed(LOGGED_CANDIDATES)
            )
        });
    }
}
