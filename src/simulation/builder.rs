use crate::hash_power::{HashPower, HashPowerError, PowerValue};

use super::SimulationGroup;

/// Builds a [`SimulationGroup`].
#[derive(Debug, Default, Clone)]
pub struct SimulationBuilder {
    powers: Vec<PowerValue>,
    trials: Option<usize>,
    blocks: Option<usize>,
    tolerance: Option<PowerValue>,
    max_depth: Option<usize>,
    seed: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum SimulationBuildError {
    #[error("no hash power values were given")]
    NoPowerValuesGiven,
    #[error("cannot simulate 0 trials")]
    ZeroTrials,
    #[error("simulated chains must be at least 2 blocks long, got {0}")]
    TooFewBlocks(usize),
    #[error("zero tolerance {0} must be a finite non-negative probability")]
    BadTolerance(PowerValue),
    #[error("depth sweep ceiling must be greater than 0")]
    ZeroMaxDepth,
    #[error(transparent)]
    HashPowerError(#[from] HashPowerError),
}

impl SimulationBuilder {
    /// Trials sampled per hash power value when unset.
    pub const DEFAULT_TRIALS: usize = 100_000;
    /// Blocks mined per process in each trial when unset.
    pub const DEFAULT_BLOCKS: usize = 200;
    /// Zero tolerance of the depth sweep when unset.
    pub const DEFAULT_TOLERANCE: PowerValue = 1e-9;
    /// Depth sweep ceiling when unset.
    pub const DEFAULT_MAX_DEPTH: usize = 100;

    /// Creates a new [`SimulationBuilder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a race where the adversary holds the given fraction of the
    /// total mining power.
    pub fn power_value(mut self, value: PowerValue) -> Self {
        self.powers.push(value);

        self
    }

    /// Call [`SimulationBuilder::power_value`] once for each element of
    /// `values`.
    pub fn power_values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = PowerValue>,
    {
        self.powers.extend(values);

        self
    }

    /// Sets the number of independent trials sampled per hash power value.
    pub fn trials(mut self, trials: usize) -> Self {
        self.trials = Some(trials);

        self
    }

    /// Sets the number of blocks each process mines in a trial.
    pub fn blocks(mut self, blocks: usize) -> Self {
        self.blocks = Some(blocks);

        self
    }

    /// Sets the estimate at or below which the depth sweep treats a
    /// reversal probability as zero and stops.
    pub fn zero_tolerance(mut self, tolerance: PowerValue) -> Self {
        self.tolerance = Some(tolerance);

        self
    }

    /// Sets the largest confirmation depth the sweep may reach.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);

        self
    }

    /// Seeds the group's random streams for reproducible results. Entropy
    /// from the OS is used otherwise.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);

        self
    }

    /// Creates a [`SimulationGroup`] from the specified parameters.
    pub fn build(self) -> Result<SimulationGroup, SimulationBuildError> {
        use SimulationBuildError::*;

        let SimulationBuilder {
            powers,
            trials,
            blocks,
            tolerance,
            max_depth,
            seed,
        } = self;

        if powers.is_empty() {
            return Err(NoPowerValuesGiven);
        }
        let powers = powers
            .into_iter()
            .map(HashPower::new)
            .collect::<Result<Vec<_>, _>>()?;

        let trials = match trials {
            Some(0) => return Err(ZeroTrials),
            Some(n) => n,
            None => Self::DEFAULT_TRIALS,
        };
        let blocks = match blocks {
            Some(b) if b < 2 => return Err(TooFewBlocks(b)),
            Some(b) => b,
            None => Self::DEFAULT_BLOCKS,
        };
        let tolerance = match tolerance {
            Some(t) if !t.is_finite() || t < 0.0 => {
                return Err(BadTolerance(t))
            }
            Some(t) => t,
            None => Self::DEFAULT_TOLERANCE,
        };
        let max_depth = match max_depth {
            Some(0) => return Err(ZeroMaxDepth),
            Some(d) => d,
            None => Self::DEFAULT_MAX_DEPTH,
        };
        let seed = seed.unwrap_or_else(rand::random);

        Ok(SimulationGroup {
            powers,
            trials,
            blocks,
            tolerance,
            max_depth,
            seed,
        })
    }
}
