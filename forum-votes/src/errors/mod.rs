//! Error types for the forum votes application.
//! Consolidates errors from configuration, storage setup, the engine and
//! the stdin/stdout transport.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Storage error: {0}")]
    Storage(#[from] forum_votes_repository::StorageError),
    #[error("Engine error: {0}")]
    Engine(#[from] forum_votes_engine::EngineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
