use thiserror::Error;

#[derive(Debug, Error)]
/// Represents errors that can occur while resolving voteable targets.
pub enum TargetDirectoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
