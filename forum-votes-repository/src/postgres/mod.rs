//! PostgreSQL implementation of the forum votes repository.
//!
//! Provides durable backends for the `VoteLedger`, `ReputationStore` and
//! `TargetDirectory` traits on top of a shared `sqlx::PgPool`.
//!
//! ## Database Tables
//!
//! - `votes`: one row per (content_type, object_id, user_id), enforced by a
//!   UNIQUE constraint
//! - `profiles`: reputation balance per user
//! - `voteable_targets`: content type, object id and author of voteable content
mod reputation_store;
mod target_directory;
mod vote_ledger;

pub use reputation_store::PostgresReputationStore;
pub use target_directory::PostgresTargetDirectory;
pub use vote_ledger::PostgresVoteLedger;

use forum_votes_shared::types::VoteValue;

use crate::errors::VoteLedgerError;

/// Applies the bundled schema migrations to `pool`.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./src/postgres/migrations").run(pool).await
}

pub(crate) fn encode_vote_type(vote_type: VoteValue) -> i16 {
    match vote_type {
        VoteValue::Up => 0,
        VoteValue::Down => 1,
    }
}

pub(crate) fn decode_vote_type(value: i16) -> Result<VoteValue, VoteLedgerError> {
    match value {
        0 => Ok(VoteValue::Up),
        1 => Ok(VoteValue::Down),
        other => Err(VoteLedgerError::InvalidVoteType(other)),
    }
}
