use serde::{Deserialize, Serialize};

macro_rules! implement_display {
    ($t:ident) => {
        impl ::std::fmt::Display for $t {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

macro_rules! implement_conversions {
    ($t:ident,$b:ident) => {
        impl $t {
            pub fn new(other: $b) -> Self {
                Self(other)
            }

            pub fn to_num(self) -> $b {
                self.0
            }
        }
    };
}

/// The label of a distinct entity taking part in the shuffle.
///
/// Entities present at start-up are labelled by their slot index
/// (`0..width`). Every entity entering the network later is labelled
/// `width + round`, the round in which it replaced an extracted slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(u64);
implement_display!(Identity);
implement_conversions!(Identity, u64);

impl Identity {
    /// The identity of the entity initially sitting in `slot`
    pub fn original(slot: usize) -> Identity {
        Identity(slot as u64)
    }

    /// The identity of the entity injected in `round` into a network of `width` slots
    pub fn injected(width: usize, round: usize) -> Identity {
        Identity((width + round) as u64)
    }
}
