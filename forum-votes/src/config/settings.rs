use std::str::FromStr;
use std::time::Duration;

use forum_votes_repository::StorageSource;
use forum_votes_repository::cached::DEFAULT_CACHE_TTL;
use forum_votes_repository::source::DEFAULT_MAX_CONNECTIONS;

use crate::errors::AppError;

pub const BACKEND_VAR: &str = "VOTES_BACKEND";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const CACHE_TTL_VAR: &str = "VOTES_CACHE_TTL_SECS";
pub const MAX_CONNECTIONS_VAR: &str = "VOTES_DB_MAX_CONNECTIONS";

/// Which storage backend the service runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Memory,
    Postgres,
    Cached,
}

impl FromStr for Backend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "postgres" => Ok(Backend::Postgres),
            "cached" => Ok(Backend::Cached),
            other => Err(AppError::Config(format!(
                "{BACKEND_VAR} must be one of memory, postgres, cached; got {other:?}"
            ))),
        }
    }
}

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend: Backend,
    pub database_url: Option<String>,
    pub cache_ttl: Duration,
    pub max_connections: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            database_url: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup(BACKEND_VAR) {
            Some(value) => value.parse()?,
            None => Backend::default(),
        };
        let cache_ttl = match parse_var::<u64, _>(&lookup, CACHE_TTL_VAR)? {
            Some(0) => return Err(must_be_positive(CACHE_TTL_VAR)),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_CACHE_TTL,
        };
        let max_connections = match parse_var::<u32, _>(&lookup, MAX_CONNECTIONS_VAR)? {
            Some(0) => return Err(must_be_positive(MAX_CONNECTIONS_VAR)),
            Some(connections) => connections,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            backend,
            database_url: lookup(DATABASE_URL_VAR).filter(|url| !url.is_empty()),
            cache_ttl,
            max_connections,
        })
    }

    /// Translates the settings into a storage source.
    pub fn storage_source(&self) -> Result<StorageSource, AppError> {
        let database_url = || {
            self.database_url
                .clone()
                .ok_or_else(|| AppError::Config(format!("{DATABASE_URL_VAR} must be set")))
        };

        let source = match self.backend {
            Backend::Memory => StorageSource::mock(),
            Backend::Postgres => StorageSource::live(database_url()?),
            Backend::Cached => StorageSource::cached(database_url()?, self.cache_ttl),
        };
        Ok(source.with_max_connections(self.max_connections))
    }
}

fn must_be_positive(name: &str) -> AppError {
    AppError::Config(format!("{name} must be greater than zero"))
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| AppError::Config(format!("invalid {name} {value:?}: {e}")))
        })
        .transpose()
}
