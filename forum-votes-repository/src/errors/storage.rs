use thiserror::Error;

use crate::errors::{ReputationStoreError, TargetDirectoryError, VoteLedgerError};

/// Errors raised while building storage backends from a `StorageSource`.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Vote ledger error: {0}")]
    VoteLedger(#[from] VoteLedgerError),

    #[error("Reputation store error: {0}")]
    ReputationStore(#[from] ReputationStoreError),

    #[error("Target directory error: {0}")]
    TargetDirectory(#[from] TargetDirectoryError),

    #[error("Vote cache TTL must be greater than zero")]
    InvalidCacheTtl,
}
