//! Error types for the forum votes repository.
//! Consolidates and re-exports error types related to storage operations.
mod reputation_store;
mod storage;
mod target_directory;
mod vote_ledger;

pub use reputation_store::ReputationStoreError;
pub use storage::StorageError;
pub use target_directory::TargetDirectoryError;
pub use vote_ledger::VoteLedgerError;
