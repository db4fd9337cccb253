//! # Forum Votes Engine
//! This crate ties the vote ledger to reputation accounting.
//! It includes the reputation rule table and calculators, the `Voteable`
//! composition that casts votes and adjusts the author's balance, vote
//! statistics, and the request layer that validates inbound vote requests
//! and assembles responses, along with error handling.
pub mod manager;
pub mod reputation;
pub mod request;
pub mod voteable;

pub mod errors;

pub use errors::{EngineError, VoteRequestError};
pub use manager::{ReputationBreakdown, StatisticsService, VoteManager, VoteStats};
pub use reputation::{
    BasicReputationCalculator, DebugReputationCalculator, Direction, PointsContext,
    ReputationAdjuster, ReputationCalculator, RuleTable,
};
pub use request::{
    AcceptanceRequest, AcceptanceResponse, ErrorResponse, VoteRequest, VoteRequestHandler,
    VoteResponse,
};
pub use voteable::Voteable;
