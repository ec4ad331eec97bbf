//! Building and running security simulations

use crate::{
    hash_power::{HashPower, PowerValue},
    results::ResultsBuilder,
    table::SuccessTable,
    timeline::{MiningRace, MiningRaceError},
    utils::mix_seed,
};

pub mod builder;

pub use builder::{SimulationBuildError, SimulationBuilder};

/// Container for a group of security simulations which share sampling
/// parameters and evaluate one hash power value each. Simulations should be
/// run using this struct's `run_all` method.
#[derive(Debug, Clone)]
pub struct SimulationGroup {
    powers: Vec<HashPower>,
    trials: usize,
    blocks: usize,
    tolerance: PowerValue,
    max_depth: usize,
    seed: u64,
}

impl SimulationGroup {
    /// Append another hash power value to the group's sweep.
    pub fn add(&mut self, power: HashPower) {
        self.powers.push(power);
    }

    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::new()
    }

    /// Master seed the group's random streams derive from.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs every simulation in the group.
    ///
    /// Races run one at a time because each owns two trials-by-blocks
    /// buffers; the sampling and scanning inside a race already spread over
    /// the worker pool. Each race seeds its streams from the master seed
    /// and its position in the sweep, so a group's results depend only on
    /// its configuration.
    pub fn run_all(self) -> Result<ResultsBuilder, SimulationError> {
        let SimulationGroup {
            powers,
            trials,
            blocks,
            tolerance,
            max_depth,
            seed,
        } = self;

        let mut outputs = Vec::with_capacity(powers.len());
        for (index, power) in powers.into_iter().enumerate() {
            let simulation = Simulation {
                power,
                trials,
                blocks,
                tolerance,
                max_depth,
                seed: mix_seed(seed, index as u64),
            };

            outputs.push(simulation.run()?);
        }

        Ok(ResultsBuilder::new(outputs))
    }
}

/// A security simulation of one mining race.
#[derive(Debug, Clone)]
struct Simulation {
    power: HashPower,
    trials: usize,
    blocks: usize,
    tolerance: PowerValue,
    max_depth: usize,
    seed: u64,
}

/// Contains the output data from a simulation.
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    pub table: SuccessTable,
    pub trials: usize,
    pub blocks: usize,
    pub seed: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("mining race could not be evaluated")]
    MiningRaceError(#[from] MiningRaceError),
}

impl Simulation {
    /// Executes the configured simulation.
    fn run(self) -> Result<SimulationOutput, SimulationError> {
        let Simulation {
            power,
            trials,
            blocks,
            tolerance,
            max_depth,
            seed,
        } = self;

        let race = MiningRace::sample(power, trials, blocks, seed)?;
        let table = SuccessTable::build(power, &race, tolerance, max_depth)?;

        Ok(SimulationOutput {
            table,
            trials,
            blocks,
            seed,
        })
    }
}
