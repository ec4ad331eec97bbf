//! Describing the split of mining power between the adversary and the
//! honest network

/// Numeric type used to represent mining power and probabilities.
pub type PowerValue = f64;

/// Fraction of total mining power held by the adversary. The honest network
/// holds the complement, so both block-production rates are positive exactly
/// when the fraction lies strictly between `0.0` and `1.0`.
///
/// An adversary is only meaningful below `0.5`; larger values are accepted so
/// that the losing side of the race can be simulated directly.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct HashPower(PowerValue);

#[derive(Debug, thiserror::Error)]
pub enum HashPowerError {
    #[error("hash power fraction {0} is not strictly between 0.0 and 1.0")]
    BadPowerValue(PowerValue),
}

impl HashPower {
    /// Creates a validated hash power fraction.
    pub fn new(value: PowerValue) -> Result<Self, HashPowerError> {
        use HashPowerError::*;

        if value.is_nan() || value <= 0.0 || value >= 1.0 {
            return Err(BadPowerValue(value));
        }

        Ok(Self(value))
    }

    /// Block-production rate of the adversary.
    #[inline]
    pub fn adversary(&self) -> PowerValue {
        self.0
    }

    /// Block-production rate of the honest network.
    #[inline]
    pub fn honest(&self) -> PowerValue {
        1.0 - self.0
    }
}

impl TryFrom<PowerValue> for HashPower {
    type Error = HashPowerError;

    fn try_from(value: PowerValue) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for HashPower {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Helper trait for turning integer sequences into percentages.
/// # Example
/// ```
/// use voting_sim::hash_power::Percent;
///
/// for p in (10..=40).step_by(10).percent() {
///    println!("{}", p);
/// }
/// ```
pub trait Percent {
    /// Returns an iterator over percentage values. Can be used with
    /// [`SimulationBuilder`](crate::simulation::SimulationBuilder) to describe
    /// sweeps of adversarial hash power.
    fn percent(self) -> impl Iterator<Item = PowerValue>;
}

impl<I> Percent for I
where
    I: IntoIterator<Item = usize>,
{
    fn percent(self) -> impl Iterator<Item = PowerValue> {
        self.into_iter().map(|n| {
            assert!(n <= 100, "invalid percent value {}", n);

            n as PowerValue / 100.0
        })
    }
}
