//! Storage backend selection.
//!
//! ## Usage
//!
//! ```ignore
//! use forum_votes_repository::StorageSource;
//!
//! // Development: keep everything in memory
//! let storage = StorageSource::mock().into_storage().await?;
//!
//! // Production: PostgreSQL, optionally behind the vote cache
//! let storage = StorageSource::live("postgres://...").into_storage().await?;
//! let storage = StorageSource::cached("postgres://...", ttl).into_storage().await?;
//! ```
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cached::{CachedVoteLedger, spawn_cache_cleanup_task};
use crate::errors::StorageError;
use crate::interfaces::{ReputationStore, TargetDirectory, VoteLedger};
use crate::memory::{InMemoryReputationStore, InMemoryTargetDirectory, InMemoryVoteLedger};
use crate::postgres::{
    PostgresReputationStore, PostgresTargetDirectory, PostgresVoteLedger, run_migrations,
};

/// Default size of the PostgreSQL connection pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Configuration for the storage backend.
///
/// Use this to explicitly choose between in-memory, PostgreSQL and cached
/// PostgreSQL storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageSource {
    /// Use in-memory storage for testing/development.
    Mock,

    /// Use PostgreSQL storage.
    Live {
        /// PostgreSQL connection URL
        database_url: String,
        max_connections: u32,
    },

    /// Use PostgreSQL storage with a read-through vote cache.
    Cached {
        /// PostgreSQL connection URL
        database_url: String,
        max_connections: u32,
        ttl: Duration,
    },
}

/// The set of backends the engine runs against.
#[derive(Clone)]
pub struct Storage {
    pub ledger: Arc<dyn VoteLedger>,
    pub reputation: Arc<dyn ReputationStore>,
    pub targets: Arc<dyn TargetDirectory>,
    /// Purge task of the vote cache, when one is running.
    pub cache_cleanup: Option<Arc<JoinHandle<()>>>,
}

impl Storage {
    /// Fresh in-memory backends.
    pub fn in_memory() -> Self {
        Self {
            ledger: Arc::new(InMemoryVoteLedger::new()),
            reputation: Arc::new(InMemoryReputationStore::new()),
            targets: Arc::new(InMemoryTargetDirectory::new()),
            cache_cleanup: None,
        }
    }
}

impl StorageSource {
    /// Create a mock (in-memory) storage source.
    pub fn mock() -> Self {
        Self::Mock
    }

    /// Create a live storage source with the given PostgreSQL URL.
    pub fn live(database_url: impl Into<String>) -> Self {
        Self::Live {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Create a cached storage source with the given PostgreSQL URL and TTL.
    pub fn cached(database_url: impl Into<String>, ttl: Duration) -> Self {
        Self::Cached {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            ttl,
        }
    }

    /// Overrides the connection pool size of a PostgreSQL-backed source.
    pub fn with_max_connections(mut self, connections: u32) -> Self {
        match &mut self {
            Self::Mock => {}
            Self::Live { max_connections, .. } | Self::Cached { max_connections, .. } => {
                *max_connections = connections;
            }
        }
        self
    }

    /// Builds the storage backends, migrating the schema for PostgreSQL.
    ///
    /// For the cached source this also spawns the periodic purge of expired
    /// cache entries, so it must run inside a tokio runtime. A zero cache TTL
    /// is rejected before any connection is opened.
    pub async fn into_storage(self) -> Result<Storage, StorageError> {
        if let Self::Cached { ttl, .. } = &self {
            if ttl.is_zero() {
                return Err(StorageError::InvalidCacheTtl);
            }
        }

        match self {
            Self::Mock => {
                info!("using in-memory vote storage");
                Ok(Storage::in_memory())
            }
            Self::Live {
                database_url,
                max_connections,
            } => {
                let pool = connect(&database_url, max_connections).await?;
                info!(max_connections, "using PostgreSQL vote storage");
                Ok(Storage {
                    ledger: Arc::new(PostgresVoteLedger::new(pool.clone()).await?),
                    reputation: Arc::new(PostgresReputationStore::new(pool.clone()).await?),
                    targets: Arc::new(PostgresTargetDirectory::new(pool).await?),
                    cache_cleanup: None,
                })
            }
            Self::Cached {
                database_url,
                max_connections,
                ttl,
            } => {
                let pool = connect(&database_url, max_connections).await?;
                let ledger = Arc::new(CachedVoteLedger::new(
                    PostgresVoteLedger::new(pool.clone()).await?,
                    ttl,
                ));
                let cache_cleanup = spawn_cache_cleanup_task(ledger.clone(), ttl).map(Arc::new);
                info!(
                    max_connections,
                    ttl_secs = ttl.as_secs(),
                    "using cached PostgreSQL vote storage"
                );
                Ok(Storage {
                    ledger,
                    reputation: Arc::new(PostgresReputationStore::new(pool.clone()).await?),
                    targets: Arc::new(PostgresTargetDirectory::new(pool).await?),
                    cache_cleanup,
                })
            }
        }
    }
}

async fn connect(database_url: &str, max_connections: u32) -> Result<sqlx::PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
