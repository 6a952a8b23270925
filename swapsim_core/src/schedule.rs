use rand::Rng;

/// The random choices of all shufflers, drawn up front.
///
/// Round `r` extracts the slot at `positions[r]`. Its swap network is laid out
/// by the pivots and offsets of the preceding rounds (see [Self::lookback]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomSchedule {
    positions: Vec<usize>,
    offsets: Vec<usize>,
}

impl RandomSchedule {
    /// Draw `len` uniform positions in `[0, width)` and `len` uniform odd
    /// offsets in `[1, width)`.
    ///
    /// Offsets are odd so that, with a power-of-two width, a swap never pairs
    /// a slot with itself.
    pub fn generate<R: Rng + ?Sized>(width: usize, len: usize, rng: &mut R) -> RandomSchedule {
        let positions = (0..len).map(|_| rng.gen_range(0..width)).collect();
        let half = (width / 2).max(1);
        let offsets = (0..len).map(|_| rng.gen_range(0..half) * 2 + 1).collect();
        RandomSchedule { positions, offsets }
    }

    /// Build a schedule from explicit sequences.
    ///
    /// The sequences are checked against the network parameters when the
    /// schedule is handed to a [crate::ShuffleNetwork].
    pub fn from_parts(positions: Vec<usize>, offsets: Vec<usize>) -> RandomSchedule {
        RandomSchedule { positions, offsets }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// The slot extracted in `round`
    pub fn position(&self, round: usize) -> usize {
        self.positions[round]
    }

    /// The `(pivot, offset)` pair `back` entries before `round`.
    ///
    /// Early rounds have no predecessors to look at. For them the index
    /// wraps around to the tail of the schedule, so `round - back == -1`
    /// reads the last entry.
    pub fn lookback(&self, round: usize, back: usize) -> (usize, usize) {
        let len = self.len();
        let index = (round + len - back) % len;
        (self.positions[index], self.offsets[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_offsets_are_odd_and_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let schedule = RandomSchedule::generate(64, 500, &mut rng);
        assert_eq!(schedule.len(), 500);
        assert!(schedule.positions().iter().all(|p| *p < 64));
        assert!(schedule.offsets().iter().all(|o| *o % 2 == 1 && *o < 64));
    }

    #[test]
    fn generation_is_seeded() {
        let a = RandomSchedule::generate(32, 40, &mut StdRng::seed_from_u64(1));
        let b = RandomSchedule::generate(32, 40, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn tiny_network_uses_offset_one() {
        let schedule = RandomSchedule::generate(1, 3, &mut StdRng::seed_from_u64(3));
        assert_eq!(schedule.positions(), &[0, 0, 0]);
        assert_eq!(schedule.offsets(), &[1, 1, 1]);
    }

    #[test]
    fn lookback_wraps_to_the_tail() {
        let schedule = RandomSchedule::from_parts(vec![10, 11, 12, 13], vec![1, 3, 5, 7]);
        assert_eq!(schedule.lookback(0, 1), (13, 7));
        assert_eq!(schedule.lookback(0, 2), (12, 5));
        assert_eq!(schedule.lookback(1, 2), (13, 7));
        assert_eq!(schedule.lookback(2, 1), (11, 3));
        assert_eq!(schedule.lookback(3, 3), (10, 1));
    }
}
