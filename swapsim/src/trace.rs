use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use swapsim_core::{Distribution, NetworkConfig};

/// The anonymity sets of all proposers of one simulation run, together with
/// the parameters that produced them.
#[derive(Serialize, Deserialize, Debug)]
pub struct AnonymitySetTrace {
    pub config: NetworkConfig,
    pub seed: u64,
    pub proposers: Vec<Distribution>,
}

/// One row of a threshold CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ThresholdRecord {
    pub trial: u64,
    pub proposer: usize,
    pub threshold: usize,
}

fn is_compressed(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(".zst"))
        .unwrap_or(false)
}

impl AnonymitySetTrace {
    /// Serialize to a JSON file, zstd compressed if the name ends in `.zst`
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();

        let mut file_writer: Box<dyn Write> = {
            let file = File::create(path)?;

            if is_compressed(path) {
                Box::new(zstd::Encoder::new(file, 16)?.auto_finish())
            } else {
                Box::new(file)
            }
        };

        serde_json::to_writer(&mut file_writer, self)?;
        file_writer.flush()?;
        Ok(())
    }

    /// Load a trace written by [Self::write_to_file]
    pub fn read_from_file(path: impl AsRef<Path>) -> anyhow::Result<AnonymitySetTrace> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let reader: Box<dyn Read> = if is_compressed(path) {
            Box::new(zstd::Decoder::new(file)?)
        } else {
            Box::new(BufReader::new(file))
        };

        let trace = serde_json::from_reader(reader)?;
        Ok(trace)
    }
}

/// Write the thresholds of all trials to a CSV file
pub fn write_thresholds(path: impl AsRef<Path>, trials: &[(u64, Vec<usize>)]) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_path(path.as_ref())?;
    for (trial, thresholds) in trials {
        for (proposer, threshold) in thresholds.iter().enumerate() {
            wtr.serialize(ThresholdRecord {
                trial: *trial,
                proposer,
                threshold: *threshold,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use swapsim_core::Identity;

    #[test]
    fn fixture_trace_loads() {
        let trace = AnonymitySetTrace::read_from_file("./test/anonymity_sets.json").unwrap();
        assert_eq!(trace.seed, 7);
        assert_eq!(trace.config.width, 16);
        assert_eq!(trace.proposers.len(), 4);
        assert_eq!(trace.proposers[0].get(Identity::new(0)), 0.6);
        assert_eq!(trace.proposers[2], Distribution::singleton(Identity::new(19)));
    }

    #[test]
    fn compression_is_chosen_by_extension() {
        assert!(is_compressed(Path::new("out/sets.json.zst")));
        assert!(!is_compressed(Path::new("out/sets.json")));
        assert!(!is_compressed(Path::new("zst/")));
    }

    #[test]
    fn compressed_trace_survives_a_round_trip() {
        let path = std::env::temp_dir().join(format!("swapsim-{}.json.zst", std::process::id()));
        let trace = AnonymitySetTrace {
            config: NetworkConfig::default(),
            seed: 3,
            proposers: vec![Distribution::singleton(Identity::new(2048))],
        };
        trace.write_to_file(&path).unwrap();
        let loaded = AnonymitySetTrace::read_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.config, trace.config);
        assert_eq!(loaded.proposers, trace.proposers);
    }

    #[test]
    fn thresholds_are_written_per_trial() {
        let path = std::env::temp_dir().join(format!("swapsim-{}.csv", std::process::id()));
        write_thresholds(&path, &[(0, vec![3, 1]), (1, vec![2])]).unwrap();
        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let records: Vec<ThresholdRecord> = rdr.deserialize().map(|r| r.unwrap()).collect();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            records,
            vec![
                ThresholdRecord { trial: 0, proposer: 0, threshold: 3 },
                ThresholdRecord { trial: 0, proposer: 1, threshold: 1 },
                ThresholdRecord { trial: 1, proposer: 0, threshold: 2 },
            ]
        );
    }
}
