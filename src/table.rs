//! Per-power tables of reversal probability by confirmation depth

use std::fmt::Display;

use crate::{
    hash_power::{HashPower, PowerValue},
    timeline::{MiningRace, MiningRaceError},
};

/// Reversal probabilities of a single chain, indexed by confirmation depth.
///
/// Entries are contiguous from depth 1. The sweep that builds the table
/// stops once an estimate falls to the configured zero tolerance, and the
/// triggering estimate is not recorded, so a missing depth past the boundary
/// reads as "below tolerance".
#[derive(Debug, Clone)]
pub struct SuccessTable {
    power: HashPower,
    probabilities: Vec<PowerValue>,
}

/// Outcome of searching a [`SuccessTable`] for the depth that matches a
/// target reversal probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquivalentDepth {
    /// Smallest recorded depth whose reversal probability is at or below
    /// the target.
    Depth(usize),
    /// No recorded depth qualifies.
    NotFound,
}

impl SuccessTable {
    /// Sweeps depths upward from 1, recording one estimate per depth until
    /// an estimate falls to `tolerance` or the sweep passes `max_depth`
    /// (capped at the last valid depth of the race). The estimate that
    /// triggers the tolerance stop is not recorded.
    pub(crate) fn build(
        power: HashPower,
        race: &MiningRace,
        tolerance: PowerValue,
        max_depth: usize,
    ) -> Result<Self, MiningRaceError> {
        let ceiling = usize::min(max_depth, race.blocks() - 1);

        let mut probabilities = Vec::with_capacity(ceiling);
        for depth in 1..=ceiling {
            let probability = race.reversal_probability(depth)?;
            if probability <= tolerance {
                break;
            }
            probabilities.push(probability);
        }

        Ok(Self {
            power,
            probabilities,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_probabilities(
        power: HashPower,
        probabilities: Vec<PowerValue>,
    ) -> Self {
        Self {
            power,
            probabilities,
        }
    }

    /// Hash power split this table was computed for.
    #[inline]
    pub fn power(&self) -> HashPower {
        self.power
    }

    /// Reversal probability recorded at `depth`, if the sweep reached it.
    pub fn get(&self, depth: usize) -> Option<PowerValue> {
        if depth == 0 {
            return None;
        }

        self.probabilities.get(depth - 1).copied()
    }

    /// Reversal probability at `depth`, with unrecorded depths reading as 0.
    ///
    /// Valid for depths past the sweep boundary, where the estimate fell
    /// below the zero tolerance. Depth 0 is never recorded and also reads
    /// as 0.
    pub fn probability_or_zero(&self, depth: usize) -> PowerValue {
        self.get(depth).unwrap_or(0.0)
    }

    /// Largest recorded depth. 0 when the table is empty.
    #[inline]
    pub fn max_recorded_depth(&self) -> usize {
        self.probabilities.len()
    }

    /// True if the very first estimate already fell below the tolerance.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Recorded `(depth, probability)` pairs in increasing depth order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, PowerValue)> + '_ {
        self.probabilities
            .iter()
            .enumerate()
            .map(|(i, &probability)| (i + 1, probability))
    }

    /// Finds the smallest recorded depth whose reversal probability is at
    /// or below `target`.
    ///
    /// The search never extrapolates past the recorded boundary: a target
    /// smaller than every entry yields [`EquivalentDepth::NotFound`] even
    /// though deeper, unswept depths would eventually qualify.
    pub fn equivalent_depth(&self, target: PowerValue) -> EquivalentDepth {
        match self.entries().find(|&(_, probability)| probability <= target) {
            Some((depth, _)) => EquivalentDepth::Depth(depth),
            None => EquivalentDepth::NotFound,
        }
    }
}

impl Display for EquivalentDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Self::Depth(depth) => write!(f, "{}", depth),
            Self::NotFound => write!(f, "not found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EquivalentDepth, SuccessTable};
    use crate::{hash_power::HashPower, timeline::MiningRace};

    fn race(power: f64, trials: usize, blocks: usize, seed: u64) -> MiningRace {
        let power = HashPower::new(power).unwrap();
        MiningRace::sample(power, trials, blocks, seed).unwrap()
    }

    #[test]
    fn sweep_stops_before_the_ceiling() {
        let power = HashPower::new(0.1).unwrap();
        let race = race(0.1, 2000, 128, 21);

        let table = SuccessTable::build(power, &race, 1e-9, 60).unwrap();
        assert!(!table.is_empty());
        assert!(table.max_recorded_depth() < 60);
    }

    #[test]
    fn entries_are_contiguous_from_one() {
        let power = HashPower::new(0.3).unwrap();
        let race = race(0.3, 500, 64, 23);

        let table = SuccessTable::build(power, &race, 1e-9, 30).unwrap();
        let depths: Vec<_> = table.entries().map(|(depth, _)| depth).collect();
        let expected: Vec<_> = (1..=table.max_recorded_depth()).collect();
        assert_eq!(depths, expected);
    }

    #[test]
    fn triggering_estimate_is_not_recorded() {
        let power = HashPower::new(0.3).unwrap();
        let race = race(0.3, 50, 16, 25);

        // Tolerance 0 stops at the first empty estimate, which must not
        // appear in the table.
        let table = SuccessTable::build(power, &race, 0.0, 100).unwrap();
        assert!(table.max_recorded_depth() < 15);
        assert!(table.entries().all(|(_, probability)| probability > 0.0));

        // A tolerance that swallows every estimate leaves the table empty.
        let table = SuccessTable::build(power, &race, 1.0, 100).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.max_recorded_depth(), 0);
    }

    #[test]
    fn sweep_ceiling_is_capped() {
        let power = HashPower::new(0.3).unwrap();
        let race = race(0.3, 100, 16, 27);

        // A negative tolerance disables the stop rule, so the sweep runs to
        // its ceiling.
        let table = SuccessTable::build(power, &race, -1.0, 500).unwrap();
        assert_eq!(table.max_recorded_depth(), 15);

        let table = SuccessTable::build(power, &race, -1.0, 6).unwrap();
        assert_eq!(table.max_recorded_depth(), 6);
    }

    #[test]
    fn lookup_past_the_boundary_reads_as_zero() {
        let power = HashPower::new(0.3).unwrap();
        let table =
            SuccessTable::from_probabilities(power, vec![0.4, 0.3, 0.2]);

        assert_eq!(table.get(2), Some(0.3));
        assert_eq!(table.get(4), None);
        assert_eq!(table.get(0), None);
        assert_eq!(table.probability_or_zero(2), 0.3);
        assert_eq!(table.probability_or_zero(4), 0.0);
    }

    #[test]
    fn equivalent_depth_finds_first_match() {
        let power = HashPower::new(0.3).unwrap();
        let table = SuccessTable::from_probabilities(
            power,
            vec![0.4, 0.3, 0.2, 0.1],
        );

        assert_eq!(table.equivalent_depth(1.0), EquivalentDepth::Depth(1));
        assert_eq!(table.equivalent_depth(0.3), EquivalentDepth::Depth(2));
        assert_eq!(table.equivalent_depth(0.25), EquivalentDepth::Depth(3));
        assert_eq!(table.equivalent_depth(0.05), EquivalentDepth::NotFound);
    }

    #[test]
    fn equivalent_depth_ignores_later_dips() {
        let power = HashPower::new(0.3).unwrap();
        let table =
            SuccessTable::from_probabilities(power, vec![0.4, 0.1, 0.2]);

        assert_eq!(table.equivalent_depth(0.15), EquivalentDepth::Depth(2));
    }

    #[test]
    fn equivalent_depth_renders_both_outcomes() {
        assert_eq!(EquivalentDepth::Depth(7).to_string(), "7");
        assert_eq!(EquivalentDepth::NotFound.to_string(), "not found");
    }
}
