use serde::{Deserialize, Serialize};

/// Parameters of a simulated shuffle network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of slots in the shuffled array. Must be a power of two.
    pub width: usize,
    /// Number of rounds to simulate
    pub rounds: usize,
    /// Swaps carried out per round. Plus one, this must be a power of two.
    pub swaps_per_round: usize,
    /// Chance (in percent) that the shuffler of a round is offline
    pub offline_percent: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            width: 2048,
            rounds: 4096,
            swaps_per_round: 31,
            offline_percent: 0,
        }
    }
}

impl NetworkConfig {
    /// Check the parameters and compute the depth of the swap network
    /// (`log2(swaps_per_round + 1)`).
    pub fn validate(&self) -> Result<u32, ConfigError> {
        if !self.width.is_power_of_two() {
            return Err(ConfigError::WidthNotPowerOfTwo(self.width));
        }
        let swap_slots = self
            .swaps_per_round
            .checked_add(1)
            .filter(|n| n.is_power_of_two())
            .ok_or(ConfigError::SwapsNotPowerOfTwoMinusOne(
                self.swaps_per_round,
            ))?;
        if self.offline_percent > 100 {
            return Err(ConfigError::OfflinePercentOutOfRange(self.offline_percent));
        }
        Ok(swap_slots.trailing_zeros())
    }

    /// Length of the precomputed random sequences
    pub fn schedule_len(&self) -> usize {
        self.rounds + self.swaps_per_round
    }

    pub(crate) fn offline_probability(&self) -> f64 {
        self.offline_percent as f64 / 100.0
    }
}

/// An error in the parameters of a simulation.
///
/// All of these are detected before the first round runs.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Width must be a power of 2, got {0}.")]
    WidthNotPowerOfTwo(usize),
    #[error("swaps_per_round must be a power of 2 minus 1, got {0}.")]
    SwapsNotPowerOfTwoMinusOne(usize),
    #[error("offline_percent must be between 0 and 100, got {0}.")]
    OfflinePercentOutOfRange(u32),
    #[error("The random schedule holds {actual} entries, but {expected} are needed.")]
    ScheduleLength { expected: usize, actual: usize },
    #[error("The random schedule selects position {0}, which lies outside the network.")]
    ScheduleOutOfRange(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: usize, swaps_per_round: usize) -> NetworkConfig {
        NetworkConfig {
            width,
            swaps_per_round,
            ..NetworkConfig::default()
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(NetworkConfig::default().validate(), Ok(5));
    }

    #[test]
    fn depth_of_swap_network() {
        assert_eq!(config(4, 0).validate(), Ok(0));
        assert_eq!(config(4, 1).validate(), Ok(1));
        assert_eq!(config(4, 3).validate(), Ok(2));
        assert_eq!(config(1, 1).validate(), Ok(1));
    }

    #[test]
    fn width_must_be_power_of_two() {
        assert_eq!(
            config(1000, 31).validate(),
            Err(ConfigError::WidthNotPowerOfTwo(1000))
        );
        assert_eq!(
            config(0, 31).validate(),
            Err(ConfigError::WidthNotPowerOfTwo(0))
        );
    }

    #[test]
    fn swaps_must_fill_a_butterfly() {
        assert_eq!(
            config(2048, 30).validate(),
            Err(ConfigError::SwapsNotPowerOfTwoMinusOne(30))
        );
        assert_eq!(
            config(2048, usize::MAX).validate(),
            Err(ConfigError::SwapsNotPowerOfTwoMinusOne(usize::MAX))
        );
    }

    #[test]
    fn offline_percent_is_bounded() {
        let config = NetworkConfig {
            offline_percent: 101,
            ..NetworkConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::OfflinePercentOutOfRange(101))
        );
    }
}
