//! Error types for the vote engine.
//! Consolidates the storage errors that can surface while casting a vote
//! and adjusting reputation.
use forum_votes_repository::{ReputationStoreError, TargetDirectoryError, VoteLedgerError};
use thiserror::Error;

/// Represents errors that can occur within the vote engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Vote ledger error: {0}")]
    VoteLedger(#[from] VoteLedgerError),
    #[error("Reputation store error: {0}")]
    ReputationStore(#[from] ReputationStoreError),
    #[error("Target directory error: {0}")]
    TargetDirectory(#[from] TargetDirectoryError),
}

impl EngineError {
    /// Returns true when the failed operation may be retried as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::VoteLedger(e) if e.is_retryable())
    }
}
