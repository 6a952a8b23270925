use std::sync::Arc;

use rand::Rng;
use rand_distr::{Bernoulli, Distribution as _};

use crate::config::{ConfigError, NetworkConfig};
use crate::diagnostics::{DiagnosticSink, Level};
use crate::distribution::{merge, Distribution};
use crate::schedule::RandomSchedule;
use crate::Identity;

/// Rounds between two progress messages
const PROGRESS_INTERVAL: usize = 500;

/// Number of candidates shown per slot in array snapshots
const SNAPSHOT_CANDIDATES: usize = 4;

/// What happened in a single round
#[derive(Debug, Clone)]
pub enum RoundOutcome {
    /// The round's shuffler was offline. Nothing changed.
    Skipped,
    /// The proposer was extracted. Holds its anonymity set.
    Extracted(Arc<Distribution>),
}

/// The state of a shuffle network between rounds.
///
/// Each slot holds the anonymity set of the entity sitting there. Slots that
/// were merged with each other share one [Distribution] until either of them
/// is touched again.
pub struct ShuffleNetwork {
    width: usize,
    rounds: usize,
    log_swaps: u32,
    schedule: RandomSchedule,
    offline: Bernoulli,
    slots: Vec<Arc<Distribution>>,
    next_round: usize,
}

impl ShuffleNetwork {
    /// Set up a network in which slot `i` holds the original entity `i`.
    ///
    /// Fails if the configuration is invalid or `schedule` does not fit it.
    pub fn new(config: &NetworkConfig, schedule: RandomSchedule) -> Result<Self, ConfigError> {
        let log_swaps = config.validate()?;

        let expected = config.schedule_len();
        for actual in [schedule.positions().len(), schedule.offsets().len()] {
            if actual != expected {
                return Err(ConfigError::ScheduleLength { expected, actual });
            }
        }
        if let Some(position) = schedule.positions().iter().find(|p| **p >= config.width) {
            return Err(ConfigError::ScheduleOutOfRange(*position));
        }

        let offline = Bernoulli::new(config.offline_probability())
            .map_err(|_| ConfigError::OfflinePercentOutOfRange(config.offline_percent))?;

        let slots = (0..config.width)
            .map(|slot| Arc::new(Distribution::singleton(Identity::original(slot))))
            .collect();

        Ok(ShuffleNetwork {
            width: config.width,
            rounds: config.rounds,
            log_swaps,
            schedule,
            offline,
            slots,
            next_round: 0,
        })
    }

    /// The current anonymity set of every slot
    pub fn slots(&self) -> &[Arc<Distribution>] {
        &self.slots
    }

    /// The round that the next call to [Self::step] carries out
    pub fn next_round(&self) -> usize {
        self.next_round
    }

    pub fn is_finished(&self) -> bool {
        self.next_round >= self.rounds
    }

    /// Carry out the next round. Returns `None` once all rounds are done.
    pub fn step<R, S>(&mut self, rng: &mut R, sink: &mut S) -> Option<RoundOutcome>
    where
        R: Rng + ?Sized,
        S: DiagnosticSink,
    {
        if self.is_finished() {
            return None;
        }
        let round = self.next_round;
        self.next_round += 1;

        if round % PROGRESS_INTERVAL == 0 {
            sink.log_with(Level::Progress, || format!("Round {}", round));
        }

        // fault injection: the shuffler of this round is offline
        if self.offline.sample(rng) {
            return Some(RoundOutcome::Skipped);
        }

        self.mix(round, sink);
        let proposer = self.extract(round, sink);

        sink.log_with(Level::Snapshot, || self.snapshot());
        Some(RoundOutcome::Extracted(proposer))
    }

    /// Run all remaining rounds, collecting the proposers' anonymity sets
    pub fn run<R, S>(&mut self, rng: &mut R, sink: &mut S) -> Vec<Arc<Distribution>>
    where
        R: Rng + ?Sized,
        S: DiagnosticSink,
    {
        let mut proposers = Vec::with_capacity(self.rounds - self.next_round);
        while let Some(outcome) = self.step(rng, sink) {
            if let RoundOutcome::Extracted(proposer) = outcome {
                proposers.push(proposer);
            }
        }
        proposers
    }

    /// One pass through the butterfly: layer `depth` swaps `2^depth` pairs
    /// that lie `2^depth` offsets apart.
    fn mix<S: DiagnosticSink>(&mut self, round: usize, sink: &mut S) {
        for depth in 0..self.log_swaps {
            let (pivot, offset) = self.schedule.lookback(round, depth as usize + 1);
            sink.log_with(Level::Detail, || {
                format!("Depth {}: pivot {} offset {}", depth, pivot, offset)
            });

            let span = 1usize << depth;
            for i in 0..span {
                let left = (pivot + offset * i) % self.width;
                let right = (pivot + offset * (i + span)) % self.width;
                sink.log_with(Level::Detail, || format!("Swapping {} and {}", left, right));

                let merged = Arc::new(merge(&[&*self.slots[left], &*self.slots[right]]));
                self.slots[left] = Arc::clone(&merged);
                self.slots[right] = merged;
            }
        }
    }

    /// Take out the proposer of `round` and put a fresh entity in its place
    fn extract<S: DiagnosticSink>(&mut self, round: usize, sink: &mut S) -> Arc<Distribution> {
        let index = self.schedule.position(round);
        let identity = Identity::injected(self.width, round);
        let proposer = std::mem::replace(
            &mut self.slots[index],
            Arc::new(Distribution::singleton(identity)),
        );
        sink.log_with(Level::Detail, || {
            format!("New index: {}, Index: {}", identity, index)
        });
        proposer
    }

    fn snapshot(&self) -> String {
        let slots: Vec<String> = self
            .slots
            .iter()
            .map(|slot| slot.condensed(SNAPSHOT_CANDIDATES).to_string())
            .collect();
        format!("[{}]", slots.join(", "))
    }
}

/// Simulate a full run of the protocol.
///
/// The random schedule is drawn from `rng` first; the offline draws of each
/// round follow. Returns the anonymity set of every round's proposer, in
/// round order, leaving out rounds whose shuffler was offline.
pub fn simulate<R, S>(
    config: &NetworkConfig,
    rng: &mut R,
    sink: &mut S,
) -> Result<Vec<Arc<Distribution>>, ConfigError>
where
    R: Rng + ?Sized,
    S: DiagnosticSink,
{
    config.validate()?;
    let schedule = RandomSchedule::generate(config.width, config.schedule_len(), rng);
    let mut network = ShuffleNetwork::new(config, schedule)?;
    Ok(network.run(rng, sink))
}
