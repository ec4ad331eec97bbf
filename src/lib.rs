/*!
Monte Carlo security evaluation of multi-chain voting consensus.

Estimates how often an adversary with a fixed share of mining power can
reverse a block confirmed at a given depth, and compares a single chain
against an ensemble of voter chains whose confirmations are combined by
majority.
*/

// ## Todo:
// - Report the Monte Carlo standard error next to each table entry
// - Support vote thresholds other than a strict majority

pub mod ensemble;
pub mod hash_power;
pub mod latency;
pub mod prelude;
pub mod results;
pub mod simulation;
pub mod table;
pub mod timeline;

pub(crate) mod utils;
