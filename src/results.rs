/*!
Control the appearance of security comparison data

# Working with [`ResultsBuilder`]

## Examples

Creating a [`ResultsTable`] after running a simulation group:

```
use voting_sim::prelude::*;

let group = SimulationBuilder::new()
    .power_value(0.25)
    .trials(2000)
    .blocks(64)
    .seed(11)
    .build()
    .unwrap();

let results = group
    .run_all()
    .unwrap()
    .voter_depths([1, 2])    // Confirmation depth of each voter chain
    .chain_counts([11, 31])  // Ensemble sizes to compare
    .format(Format::CSV)     // Output results as CSV
    .build()
    .unwrap();

println!("{}", results);
```
*/

use std::fmt::Display;

use crate::{
    ensemble::{majority_reversal, EnsembleError},
    hash_power::PowerValue,
    simulation::SimulationOutput,
    table::EquivalentDepth,
};

/// Floating point precision of results data.
pub const FLOAT_PRECISION_DIGITS: usize = 6;

/// Builder for [`ResultsTable`]. Produced by running a
/// [`SimulationGroup`](crate::simulation::SimulationGroup).
#[derive(Debug, Clone)]
pub struct ResultsBuilder {
    data: Vec<SimulationOutput>,
    voter_depths: Vec<usize>,
    chain_counts: Vec<usize>,
    format: Format,
}

/// Describes the appearance of a [`ResultsTable`] as given by its
/// [`Display`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub enum Format {
    /// Comma-separated, without extra whitespace.
    CSV,
    /// Human-readable.
    #[default]
    PrettyPrint,
}

#[derive(Debug, thiserror::Error)]
pub enum ResultsError {
    #[error("voter depth sweep cannot include depth 0")]
    ZeroVoterDepth,
    #[error(transparent)]
    EnsembleError(#[from] EnsembleError),
}

impl ResultsBuilder {
    /// Voter depths compared when no sweep is given.
    pub const DEFAULT_VOTER_DEPTHS: [usize; 4] = [1, 2, 3, 4];
    /// Ensemble sizes compared when no sweep is given.
    pub const DEFAULT_CHAIN_COUNTS: [usize; 4] = [10, 20, 30, 40];

    /// Create a new [`ResultsBuilder`].
    pub(crate) fn new(data: Vec<SimulationOutput>) -> Self {
        Self {
            data,
            voter_depths: Self::DEFAULT_VOTER_DEPTHS.into(),
            chain_counts: Self::DEFAULT_CHAIN_COUNTS.into(),
            format: Format::default(),
        }
    }

    /// Compare the given confirmation depths of the voter chains.
    pub fn voter_depths<I>(mut self, depths: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        self.voter_depths = depths.into_iter().collect();

        self
    }

    /// Compare the given ensemble sizes.
    pub fn chain_counts<I>(mut self, counts: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        self.chain_counts = counts.into_iter().collect();

        self
    }

    /// Specify the [`Format`] of the results table.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;

        self
    }

    /// Extract the raw [`SimulationOutput`] data from this
    /// [`ResultsBuilder`]. Useful for running custom statistical analysis.
    ///
    /// # Ordering
    /// Outputs appear in the order their hash power values were given to
    /// [`SimulationBuilder`](crate::simulation::SimulationBuilder).
    pub fn data(self) -> Vec<SimulationOutput> {
        self.data
    }

    /// Create a new [`ResultsTable`], one row per simulated hash power,
    /// voter depth, and ensemble size.
    ///
    /// Depths past a table's recorded boundary read as probability 0, per
    /// the sweep's stopping rule.
    pub fn build(self) -> Result<ResultsTable, ResultsError> {
        use ResultsError::*;

        let ResultsBuilder {
            data,
            voter_depths,
            chain_counts,
            format,
        } = self;

        if voter_depths.iter().any(|&depth| depth == 0) {
            return Err(ZeroVoterDepth);
        }

        let mut rows =
            Vec::with_capacity(data.len() * voter_depths.len() * chain_counts.len());
        for output in &data {
            let table = &output.table;

            for &voter_depth in &voter_depths {
                let reversal_probability =
                    table.probability_or_zero(voter_depth);

                for &chains in &chain_counts {
                    let ensemble_reversal =
                        majority_reversal(reversal_probability, chains)?;
                    let equivalent_depth =
                        table.equivalent_depth(ensemble_reversal);

                    rows.push(ComparisonRecord {
                        power: table.power().adversary(),
                        voter_depth,
                        reversal_probability,
                        chains,
                        ensemble_reversal,
                        equivalent_depth,
                    });
                }
            }
        }

        Ok(ResultsTable { rows, format })
    }
}

/// One comparison row: a voting ensemble at a given confirmation depth
/// against the single-chain depth that matches its security.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonRecord {
    /// Adversarial share of mining power.
    pub power: PowerValue,
    /// Confirmation depth of each voter chain.
    pub voter_depth: usize,
    /// Single-chain reversal probability at `voter_depth`.
    pub reversal_probability: PowerValue,
    /// Number of voter chains in the ensemble.
    pub chains: usize,
    /// Probability that a majority of the ensemble is reversed at once.
    pub ensemble_reversal: PowerValue,
    /// Smallest single-chain depth at least as secure as the ensemble.
    pub equivalent_depth: EquivalentDepth,
}

impl ComparisonRecord {
    fn cells(&self) -> [String; 6] {
        [
            format!("{:.1$}", self.power, FLOAT_PRECISION_DIGITS),
            self.voter_depth.to_string(),
            format!(
                "{:.1$e}",
                self.reversal_probability, FLOAT_PRECISION_DIGITS
            ),
            self.chains.to_string(),
            format!("{:.1$e}", self.ensemble_reversal, FLOAT_PRECISION_DIGITS),
            self.equivalent_depth.to_string(),
        ]
    }
}

/// Formatted results from the completion of a
/// [`SimulationGroup`](crate::simulation::SimulationGroup). The results
/// table is given by the struct's [`Display`] implementation, as specified
/// by its [`Format`].
pub struct ResultsTable {
    rows: Vec<ComparisonRecord>,
    format: Format,
}

impl ResultsTable {
    const SEPARATOR_VERTICAL: char = '|';
    const SEPARATOR_HORIZONTAL: char = '-';
    const TITLES: [&'static str; 6] = [
        "Adversary Power",
        "Voter Depth",
        "Reversal Probability",
        "Voter Chains",
        "Ensemble Reversal",
        "Equivalent Depth",
    ];

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    /// Comparison records backing the table, in row order.
    pub fn rows(&self) -> &[ComparisonRecord] {
        &self.rows
    }
}

impl Display for ResultsTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.format {
            Format::CSV => {
                write!(f, "{}", Self::TITLES.join(","))?;

                for record in self.rows.iter() {
                    writeln!(f)?;

                    write!(f, "{}", record.cells().join(","))?;
                }
            }
            Format::PrettyPrint => {
                let mut text_widths: Vec<_> =
                    Self::TITLES.iter().map(|title| title.len()).collect();

                for record in self.rows.iter() {
                    for (i, cell) in record.cells().iter().enumerate() {
                        text_widths[i] = text_widths[i].max(cell.len());
                    }
                }

                for (i, title) in Self::TITLES.into_iter().enumerate() {
                    write!(
                        f,
                        " {:1$} {2}",
                        title,
                        text_widths[i],
                        Self::SEPARATOR_VERTICAL
                    )?;
                }
                writeln!(f)?;

                let total_width = text_widths.iter().map(|x| x + 3).sum();
                for _ in 0..total_width {
                    write!(f, "{}", Self::SEPARATOR_HORIZONTAL)?;
                }

                for record in self.rows.iter() {
                    writeln!(f)?;

                    for (i, cell) in record.cells().iter().enumerate() {
                        write!(
                            f,
                            " {:1$} {2}",
                            cell,
                            text_widths[i],
                            Self::SEPARATOR_VERTICAL
                        )?;
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ComparisonRecord, Format, ResultsBuilder, ResultsError, ResultsTable,
    };
    use crate::{
        hash_power::HashPower,
        simulation::SimulationOutput,
        table::{EquivalentDepth, SuccessTable},
    };

    fn fabricated_output(probabilities: Vec<f64>) -> SimulationOutput {
        let power = HashPower::new(0.3).unwrap();

        SimulationOutput {
            table: SuccessTable::from_probabilities(power, probabilities),
            trials: 1000,
            blocks: 64,
            seed: 1,
        }
    }

    #[test]
    fn csv_output_is_exact() {
        let record = ComparisonRecord {
            power: 0.3,
            voter_depth: 2,
            reversal_probability: 0.2325,
            chains: 30,
            ensemble_reversal: 0.000491,
            equivalent_depth: EquivalentDepth::Depth(9),
        };
        let table = ResultsTable {
            rows: vec![record],
            format: Format::CSV,
        };

        let expected = "Adversary Power,Voter Depth,Reversal Probability,\
                        Voter Chains,Ensemble Reversal,Equivalent Depth\n\
                        0.300000,2,2.325000e-1,30,4.910000e-4,9";
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn pretty_print_aligns_columns() {
        let found = ComparisonRecord {
            power: 0.3,
            voter_depth: 2,
            reversal_probability: 0.2325,
            chains: 30,
            ensemble_reversal: 0.000491,
            equivalent_depth: EquivalentDepth::Depth(9),
        };
        let missing = ComparisonRecord {
            equivalent_depth: EquivalentDepth::NotFound,
            ..found
        };
        let table = ResultsTable {
            rows: vec![found, missing],
            format: Format::PrettyPrint,
        };

        let text = table.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains(" Adversary Power |"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[3].contains(" not found "));

        let widths: Vec<_> = lines.iter().map(|line| line.len()).collect();
        assert!(widths.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn depths_past_the_boundary_read_as_zero() {
        let output = fabricated_output(vec![0.4, 0.3]);

        let table = ResultsBuilder::new(vec![output])
            .voter_depths([1, 5])
            .chain_counts([3])
            .build()
            .unwrap();

        let rows = table.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].voter_depth, 5);
        assert_eq!(rows[1].reversal_probability, 0.0);
        assert_eq!(rows[1].ensemble_reversal, 0.0);
        assert_eq!(rows[1].equivalent_depth, EquivalentDepth::NotFound);
    }

    #[test]
    fn records_cover_the_full_sweep() {
        let output = fabricated_output(vec![0.4, 0.3, 0.2]);

        let table = ResultsBuilder::new(vec![output])
            .voter_depths([1, 2])
            .chain_counts([3, 5, 7])
            .build()
            .unwrap();

        assert_eq!(table.rows().len(), 6);
        assert!(table
            .rows()
            .iter()
            .all(|record| record.power == 0.3 && record.chains % 2 == 1));
    }

    #[test]
    fn rejects_zero_voter_depth() {
        let output = fabricated_output(vec![0.4]);

        let result = ResultsBuilder::new(vec![output])
            .voter_depths([0])
            .build();
        assert!(matches!(result, Err(ResultsError::ZeroVoterDepth)));
    }

    #[test]
    fn propagates_zero_chain_count() {
        let output = fabricated_output(vec![0.4]);

        let result = ResultsBuilder::new(vec![output])
            .chain_counts([0])
            .build();
        assert!(matches!(result, Err(ResultsError::EnsembleError(_))));
    }
}
