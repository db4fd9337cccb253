//! # Forum Votes Repository
//! This crate provides traits and implementations for storing votes,
//! reputation balances and voteable targets. It includes definitions for
//! errors, interfaces, and concrete in-memory, PostgreSQL and caching backends.
pub mod cached;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;
pub mod source;

pub use cached::CachedVoteLedger;
pub use errors::{ReputationStoreError, StorageError, TargetDirectoryError, VoteLedgerError};
pub use interfaces::{
    AcceptanceChange, ReputationStore, TargetDirectory, TargetRecord, VoteLedger,
};
pub use memory::{InMemoryReputationStore, InMemoryTargetDirectory, InMemoryVoteLedger};
pub use postgres::{PostgresReputationStore, PostgresTargetDirectory, PostgresVoteLedger};
pub use source::{Storage, StorageSource};
