use thiserror::Error;

#[derive(Debug, Error)]
/// Represents errors that can occur within the reputation store.
pub enum ReputationStoreError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
