//! Simulating mining races between the adversary and the honest network

use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Exp};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{
    hash_power::{HashPower, PowerValue},
    utils::mix_seed,
};

/// Cumulative block-arrival times of the adversary and honest mining
/// processes over a set of independent trials.
///
/// Both processes are Poisson: inter-arrival gaps are exponential with rate
/// equal to the process's share of mining power. Time `0.0` is the fork
/// point, so entry `j` of a trial is the instant the process mines its `j`th
/// block past the fork. Every (trial, process) pair draws from its own RNG
/// stream derived from the race seed, which makes results reproducible
/// under any thread scheduling.
#[derive(Debug, Clone)]
pub struct MiningRace {
    /// Row-major trial rows, `blocks` entries per trial.
    adversary: Vec<PowerValue>,
    honest: Vec<PowerValue>,
    trials: usize,
    blocks: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum MiningRaceError {
    #[error("confirmation depth {0} is not in the range 1..{1}")]
    DepthOutOfRange(usize, usize),
    #[error("cannot simulate a race with 0 trials")]
    ZeroTrials,
    #[error("simulated chains must be at least 2 blocks long, got {0}")]
    TooFewBlocks(usize),
}

impl MiningRace {
    /// Minimum number of blocks the reversal scan extends past the
    /// confirmation depth, before the cap at the simulated length.
    pub const HORIZON_SLACK: usize = 100;

    /// Samples arrival times for `trials` independent races of `blocks`
    /// blocks each, with the adversary mining at `power.adversary()` and the
    /// honest network at `power.honest()`.
    pub fn sample(
        power: HashPower,
        trials: usize,
        blocks: usize,
        seed: u64,
    ) -> Result<Self, MiningRaceError> {
        use MiningRaceError::*;

        if trials == 0 {
            return Err(ZeroTrials);
        }
        if blocks < 2 {
            return Err(TooFewBlocks(blocks));
        }

        let mut adversary = vec![0.0; trials * blocks];
        let mut honest = vec![0.0; trials * blocks];

        fill_arrivals(&mut adversary, blocks, power.adversary(), seed, 0);
        fill_arrivals(&mut honest, blocks, power.honest(), seed, 1);

        Ok(Self {
            adversary,
            honest,
            trials,
            blocks,
        })
    }

    /// Fraction of trials in which the adversary can still reverse a block
    /// confirmed at `depth`.
    ///
    /// A trial counts as reversible when the adversary's clock is strictly
    /// ahead of the honest clock at some block index past `depth` and before
    /// the scan [horizon](Self::horizon): having mined as many blocks in
    /// less time, the adversary is not yet provably behind in the race.
    /// This deliberately overcounts relative to a strict overtake-and-hold
    /// condition, giving a conservative security estimate.
    pub fn reversal_probability(
        &self,
        depth: usize,
    ) -> Result<PowerValue, MiningRaceError> {
        use MiningRaceError::*;

        if depth == 0 || depth >= self.blocks {
            return Err(DepthOutOfRange(depth, self.blocks));
        }

        let horizon = self.horizon(depth);

        #[cfg(feature = "rayon")]
        let reversed = (0..self.trials)
            .into_par_iter()
            .filter(|&trial| self.trial_reversed(trial, depth, horizon))
            .count();
        #[cfg(not(feature = "rayon"))]
        let reversed = (0..self.trials)
            .filter(|&trial| self.trial_reversed(trial, depth, horizon))
            .count();

        Ok(reversed as PowerValue / self.trials as PowerValue)
    }

    /// Block index (exclusive) at which the reversal scan for `depth` stops:
    /// `max(2 * depth, depth + HORIZON_SLACK)`, capped at the simulated
    /// length.
    #[inline]
    pub fn horizon(&self, depth: usize) -> usize {
        usize::min(
            usize::max(2 * depth, depth + Self::HORIZON_SLACK),
            self.blocks,
        )
    }

    /// Number of simulated trials.
    #[inline]
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Number of blocks mined per process in each trial.
    #[inline]
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Cumulative arrival times of the adversary process in `trial`.
    pub fn adversary_times(&self, trial: usize) -> &[PowerValue] {
        let row = trial * self.blocks;
        &self.adversary[row..row + self.blocks]
    }

    /// Cumulative arrival times of the honest process in `trial`.
    pub fn honest_times(&self, trial: usize) -> &[PowerValue] {
        let row = trial * self.blocks;
        &self.honest[row..row + self.blocks]
    }

    fn trial_reversed(&self, trial: usize, depth: usize, horizon: usize) -> bool {
        let row = trial * self.blocks;
        let adversary = &self.adversary[row + depth + 1..row + horizon];
        let honest = &self.honest[row + depth + 1..row + horizon];

        adversary.iter().zip(honest).any(|(a, h)| a < h)
    }
}

/// Fills each `blocks`-long row of `times` with the running sum of
/// exponential gaps at the given rate. Entry 0 of every row is left at the
/// fork point `0.0`.
fn fill_arrivals(
    times: &mut [PowerValue],
    blocks: usize,
    rate: PowerValue,
    seed: u64,
    process: u64,
) {
    let gaps = Exp::new(rate).expect("rates from a HashPower are positive");

    let fill_row = |(trial, row): (usize, &mut [PowerValue])| {
        let stream = mix_seed(seed, 2 * trial as u64 + process);
        let mut rng = StdRng::seed_from_u64(stream);

        let mut elapsed = 0.0;
        for slot in row.iter_mut().skip(1) {
            elapsed += gaps.sample(&mut rng);
            *slot = elapsed;
        }
    };

    #[cfg(feature = "rayon")]
    times.par_chunks_mut(blocks).enumerate().for_each(fill_row);
    #[cfg(not(feature = "rayon"))]
    times.chunks_mut(blocks).enumerate().for_each(fill_row);
}
