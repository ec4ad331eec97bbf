//! Majority-reversal probability of an ensemble of voter chains

use crate::hash_power::PowerValue;

#[derive(Debug, thiserror::Error)]
pub enum EnsembleError {
    #[error("reversal probability {0} is not in the range 0.0..=1.0")]
    BadProbability(PowerValue),
    #[error("ensemble must contain at least 1 voter chain")]
    ZeroChains,
}

/// Probability that a strict majority of `chains` voter chains are reversed
/// at once, when each chain is reversed independently with `probability`.
///
/// This is the exact binomial tail over `chains / 2 + 1..=chains`
/// successes. Terms are computed in log space and accumulated relative to
/// the dominant term, so the tail stays positive even when every term
/// underflows `f64` on its own. The chains of a real deployment share a
/// network and an adversary; treating them as independent is a modeling
/// assumption, not a theorem.
pub fn majority_reversal(
    probability: PowerValue,
    chains: usize,
) -> Result<PowerValue, EnsembleError> {
    use EnsembleError::*;

    if !(0.0..=1.0).contains(&probability) {
        return Err(BadProbability(probability));
    }
    if chains == 0 {
        return Err(ZeroChains);
    }

    // The log-space terms are indeterminate at the endpoints (0 * ln 0).
    if probability == 0.0 {
        return Ok(0.0);
    }
    if probability == 1.0 {
        return Ok(1.0);
    }

    let mut ln_factorial = vec![0.0; chains + 1];
    for i in 1..=chains {
        ln_factorial[i] = ln_factorial[i - 1] + (i as PowerValue).ln();
    }

    let majority = chains / 2 + 1;
    let ln_p = probability.ln();
    let ln_q = (1.0 - probability).ln();

    // ln [C(chains, i) p^i q^(chains-i)] for each majority size i
    let log_terms: Vec<PowerValue> = (majority..=chains)
        .map(|i| {
            ln_factorial[chains]
                - ln_factorial[i]
                - ln_factorial[chains - i]
                + i as PowerValue * ln_p
                + (chains - i) as PowerValue * ln_q
        })
        .collect();

    let dominant = log_terms
        .iter()
        .fold(PowerValue::NEG_INFINITY, |a, &b| a.max(b));
    let scaled_sum: PowerValue =
        log_terms.iter().map(|&term| (term - dominant).exp()).sum();

    Ok((dominant + scaled_sum.ln()).exp().min(1.0))
}

#[cfg(test)]
mod tests {
    use super::{majority_reversal, EnsembleError};

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(majority_reversal(0.0, 31).unwrap(), 0.0);
        assert_eq!(majority_reversal(1.0, 31).unwrap(), 1.0);
    }

    #[test]
    fn single_chain_is_identity() {
        let p = 0.2931;
        assert!((majority_reversal(p, 1).unwrap() - p).abs() < 1e-12);
    }

    #[test]
    fn small_ensembles_match_closed_forms() {
        let p: f64 = 0.37;
        let q = 1.0 - p;

        let two = majority_reversal(p, 2).unwrap();
        assert!((two - p * p).abs() < 1e-12);

        let three = majority_reversal(p, 3).unwrap();
        assert!((three - (3.0 * p * p * q + p.powi(3))).abs() < 1e-12);
    }

    #[test]
    fn matches_direct_summation() {
        // Small enough for a naive f64 evaluation of the same tail.
        let chains = 15;
        let p: f64 = 0.31;

        let mut direct = 0.0;
        for i in (chains / 2 + 1)..=chains {
            let mut combinations = 1.0;
            for j in 0..i {
                combinations *= (chains - j) as f64 / (i - j) as f64;
            }
            direct += combinations
                * p.powi(i as i32)
                * (1.0 - p).powi((chains - i) as i32);
        }

        let log_space = majority_reversal(p, chains).unwrap();
        assert!((log_space - direct).abs() / direct < 1e-10);
    }

    #[test]
    fn pinned_tail_value() {
        // P[Bin(30, 0.31) >= 16], cross-checked with exact rational
        // arithmetic.
        let tail = majority_reversal(0.31, 30).unwrap();
        assert!((tail - 9.001927143968e-3).abs() < 1e-12);
    }

    #[test]
    fn monotone_in_probability() {
        let low = majority_reversal(0.2, 31).unwrap();
        let high = majority_reversal(0.3, 31).unwrap();
        assert!(low < high);
    }

    #[test]
    fn more_chains_help_when_probability_is_low() {
        let five = majority_reversal(0.1, 5).unwrap();
        let fifteen = majority_reversal(0.1, 15).unwrap();
        let twenty_five = majority_reversal(0.1, 25).unwrap();

        assert!(five > fifteen);
        assert!(fifteen > twenty_five);
    }

    #[test]
    fn deep_tail_does_not_underflow() {
        let tail = majority_reversal(0.01, 301).unwrap();
        assert!(tail > 0.0);
        assert!(tail < 1e-200);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            majority_reversal(-0.1, 5),
            Err(EnsembleError::BadProbability(_))
        ));
        assert!(matches!(
            majority_reversal(1.5, 5),
            Err(EnsembleError::BadProbability(_))
        ));
        assert!(matches!(
            majority_reversal(f64::NAN, 5),
            Err(EnsembleError::BadProbability(_))
        ));
        assert!(matches!(
            majority_reversal(0.3, 0),
            Err(EnsembleError::ZeroChains)
        ));
    }
}
