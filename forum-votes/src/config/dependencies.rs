use std::sync::Arc;

use forum_votes_engine::BasicReputationCalculator;
use forum_votes_repository::Storage;
use tracing::info;

use crate::config::handlers::CommandHandler;
use crate::config::Settings;
use crate::errors::AppError;

/// `Dependencies` struct holds the components the service runs on.
///
/// It includes the storage backends selected by the settings and the
/// command handler wired on top of them.
pub struct Dependencies {
    pub settings: Settings,
    pub storage: Storage,
    pub handler: CommandHandler,
}

impl Dependencies {
    /// Creates a new `Dependencies` instance from the environment.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok(Self)` on successful initialization or an
    /// `AppError` if the settings are invalid or the storage backend fails
    /// to initialize.
    pub async fn new() -> Result<Self, AppError> {
        Self::from_settings(Settings::from_env()?).await
    }

    pub async fn from_settings(settings: Settings) -> Result<Self, AppError> {
        let storage = settings.storage_source()?.into_storage().await?;
        let handler = CommandHandler::new(&storage, Arc::new(BasicReputationCalculator::default()));
        info!(backend = ?settings.backend, "dependencies initialized");

        Ok(Dependencies {
            settings,
            storage,
            handler,
        })
    }
}
