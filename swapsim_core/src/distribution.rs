use fxhash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

use std::cmp::Ordering;
use std::fmt;

use super::Identity;

/// A probability distribution over the identities that may sit in a slot.
///
/// This is the anonymity set of a slot from the point of view of an
/// observer who saw every swap but could not tell the swapped entities apart.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution {
    masses: HashMap<Identity, f64>,
}

impl Distribution {
    /// Create a new, empty distribution
    pub fn new() -> Distribution {
        Distribution {
            masses: HashMap::default(),
        }
    }

    /// A distribution in which `identity` is known for certain
    pub fn singleton(identity: Identity) -> Distribution {
        let mut masses = HashMap::default();
        masses.insert(identity, 1.0);
        Distribution { masses }
    }

    /// Get the mass assigned to `identity` (zero if it is no candidate)
    pub fn get(&self, identity: Identity) -> f64 {
        self.masses.get(&identity).copied().unwrap_or(0.0)
    }

    /// Get the number of candidate identities
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// Sum of all masses. Starts out as 1.0 and is kept by merging.
    pub fn total_mass(&self) -> f64 {
        self.masses.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Identity, f64)> + '_ {
        self.masses.iter().map(|(identity, mass)| (*identity, *mass))
    }

    /// All masses, largest first
    pub fn sorted_masses(&self) -> Vec<f64> {
        let mut masses: Vec<f64> = self.masses.values().copied().collect();
        masses.sort_unstable_by(|a, b| b.total_cmp(a));
        masses
    }

    /// All candidates, most likely first. Ties are ordered by identity.
    pub fn ranked(&self) -> Vec<(Identity, f64)> {
        let mut ranked: Vec<(Identity, f64)> = self.iter().collect();
        ranked.sort_unstable_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });
        ranked
    }

    /// A short human readable view on the `top` most likely candidates
    pub fn condensed(&self, top: usize) -> Condensed {
        let ranked = self.ranked();
        let shown: Vec<(Identity, f64)> = ranked.iter().take(top).copied().collect();
        let other = if ranked.len() > shown.len() {
            Some(ranked[shown.len()..].iter().map(|(_, mass)| mass).sum())
        } else {
            None
        };
        Condensed { shown, other }
    }

    fn add(&mut self, identity: Identity, mass: f64) {
        *self.masses.entry(identity).or_insert(0.0) += mass;
    }
}

impl FromIterator<(Identity, f64)> for Distribution {
    fn from_iter<T: IntoIterator<Item = (Identity, f64)>>(iter: T) -> Self {
        let mut distribution = Distribution::new();
        for (identity, mass) in iter {
            distribution.add(identity, mass);
        }
        distribution
    }
}

/// Merge distributions of entities that can no longer be told apart.
///
/// Every input receives the same weight, so for `n` inputs each candidate
/// ends up with the sum of its masses divided by `n`. Inputs that each sum
/// to one produce an output that sums to one.
pub fn merge(inputs: &[&Distribution]) -> Distribution {
    let weight = inputs.len() as f64;
    let mut merged = Distribution::new();
    for input in inputs {
        for (identity, mass) in input.iter() {
            merged.add(identity, mass / weight);
        }
    }
    merged
}

/// See [Distribution::condensed].
pub struct Condensed {
    shown: Vec<(Identity, f64)>,
    other: Option<f64>,
}

impl fmt::Display for Condensed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (identity, mass)) in self.shown.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:.3}", identity, mass)?;
        }
        if let Some(other) = self.other {
            write!(f, ", other: {:.3}", other)?;
        }
        write!(f, "}}")
    }
}
