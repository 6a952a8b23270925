use std::borrow::Borrow;

use crate::distribution::Distribution;

/// Fraction of belief mass an adversary wants to cover
pub const DEFAULT_COVERAGE: f64 = 0.2;

/// The number of most likely candidates whose combined mass reaches
/// `coverage` of the distribution's total mass.
///
/// An adversary who takes out that many candidates hits the true proposer
/// with a chance of at least `coverage`. Empty distributions yield 0.
pub fn deanonymization_threshold(distribution: &Distribution, coverage: f64) -> usize {
    let masses = distribution.sorted_masses();
    let mut remaining = masses.iter().sum::<f64>() * coverage;

    for (i, mass) in masses.iter().enumerate() {
        remaining -= mass;
        if remaining <= 0.0 {
            return i + 1;
        }
    }
    masses.len()
}

/// Compute the threshold of every proposer at [DEFAULT_COVERAGE], in order.
pub fn deanonymization_thresholds<D>(proposers: &[D]) -> Vec<usize>
where
    D: Borrow<Distribution>,
{
    deanonymization_thresholds_at(proposers, DEFAULT_COVERAGE)
}

/// Like [deanonymization_thresholds], with a custom `coverage`.
pub fn deanonymization_thresholds_at<D>(proposers: &[D], coverage: f64) -> Vec<usize>
where
    D: Borrow<Distribution>,
{
    proposers
        .iter()
        .map(|proposer| deanonymization_threshold(proposer.borrow(), coverage))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Identity;
    use std::sync::Arc;

    fn uniform(n: u64) -> Distribution {
        (0..n)
            .map(|id| (Identity::new(id), 1.0 / n as f64))
            .collect()
    }

    #[test]
    fn dominant_candidate_is_enough() {
        let d: Distribution = [(Identity::new(0), 0.6), (Identity::new(1), 0.4)]
            .into_iter()
            .collect();
        assert_eq!(deanonymization_threshold(&d, DEFAULT_COVERAGE), 1);
    }

    #[test]
    fn singleton_is_fully_deanonymized() {
        let d = Distribution::singleton(Identity::new(42));
        assert_eq!(deanonymization_threshold(&d, DEFAULT_COVERAGE), 1);
    }

    #[test]
    fn uniform_sets_need_a_fifth_of_their_candidates() {
        assert_eq!(deanonymization_threshold(&uniform(8), DEFAULT_COVERAGE), 2);
        assert_eq!(deanonymization_threshold(&uniform(16), DEFAULT_COVERAGE), 4);
        assert_eq!(deanonymization_threshold(&uniform(1024), DEFAULT_COVERAGE), 205);
        assert_eq!(deanonymization_threshold(&uniform(2048), DEFAULT_COVERAGE), 410);
    }

    #[test]
    fn largest_masses_are_taken_first() {
        let d: Distribution = [
            (Identity::new(0), 0.05),
            (Identity::new(1), 0.15),
            (Identity::new(2), 0.1),
            (Identity::new(3), 0.7),
        ]
        .into_iter()
        .collect();
        assert_eq!(deanonymization_threshold(&d, 0.8), 2);
        assert_eq!(deanonymization_threshold(&d, 0.9), 3);
    }

    #[test]
    fn coverage_is_relative_to_total_mass() {
        let d: Distribution = (0..8).map(|id| (Identity::new(id), 0.5)).collect();
        assert_eq!(deanonymization_threshold(&d, DEFAULT_COVERAGE), 2);
    }

    #[test]
    fn empty_distribution_has_no_threshold() {
        assert_eq!(deanonymization_threshold(&Distribution::new(), DEFAULT_COVERAGE), 0);
    }

    #[test]
    fn thresholds_keep_proposer_order() {
        let proposers = vec![
            Arc::new(uniform(16)),
            Arc::new(Distribution::singleton(Identity::new(3))),
            Arc::new(uniform(8)),
        ];
        assert_eq!(deanonymization_thresholds(&proposers), vec![4, 1, 2]);
        assert_eq!(deanonymization_thresholds_at(&proposers, 0.5), vec![8, 1, 4]);

        let owned: Vec<Distribution> = proposers.iter().map(|p| (**p).clone()).collect();
        assert_eq!(deanonymization_thresholds(&owned), vec![4, 1, 2]);
    }
}
