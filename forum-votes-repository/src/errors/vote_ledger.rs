//! Error types for the vote ledger.
//! Defines specific errors that can occur while reading or mutating votes.
use forum_votes_shared::types::{TargetRef, UserId};
use thiserror::Error;

/// Represents errors that can occur within a vote ledger.
///
/// `Conflict` is the only transient variant: it is reported when a concurrent
/// request won the race to insert the same (user, target) vote and the ledger
/// could not reconcile it.
#[derive(Debug, Error)]
pub enum VoteLedgerError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Conflicting vote by user {user_id} on {target}")]
    Conflict { target: TargetRef, user_id: UserId },

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("Invalid vote type: {0}")]
    InvalidVoteType(i16),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}

impl VoteLedgerError {
    /// Returns true when the caller may retry the same operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VoteLedgerError::Conflict { .. })
    }
}
