//! Reputation accounting.
//!
//! A vote transition on a target moves points to or from the target's
//! author. How many points is decided by a `ReputationCalculator` looking up
//! the `RuleTable`; the `ReputationAdjuster` applies the result to the
//! reputation store.
mod adjuster;
mod calculator;
mod rules;

pub use adjuster::ReputationAdjuster;
pub use calculator::{
    BasicReputationCalculator, DebugReputationCalculator, PointsContext, ReputationCalculator,
};
pub use rules::{Direction, RuleTable, normalize_category};
