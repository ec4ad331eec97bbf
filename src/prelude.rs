/*!
Re-export of common values and datatypes used for running and analyzing
security simulations. Must be imported manually.

```
use voting_sim::prelude::*;
```
*/

use crate::{
    ensemble, hash_power, latency, results, simulation, table, timeline,
};

pub use ensemble::{majority_reversal, EnsembleError};

pub use hash_power::{HashPower, HashPowerError, Percent, PowerValue};

pub use latency::{LatencyError, LatencySummary};

pub use results::{
    ComparisonRecord, Format, ResultsBuilder, ResultsError, ResultsTable,
};

pub use simulation::{
    SimulationBuildError, SimulationBuilder, SimulationError, SimulationGroup,
    SimulationOutput,
};

pub use table::{EquivalentDepth, SuccessTable};

pub use timeline::{MiningRace, MiningRaceError};
