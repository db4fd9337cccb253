//! In-memory storage backends.
//!
//! These keep all state in explicit, constructible containers so a test
//! harness can own, share and reset them without any process-wide globals.
mod reputation_store;
mod target_directory;
mod vote_ledger;

pub use reputation_store::InMemoryReputationStore;
pub use target_directory::InMemoryTargetDirectory;
pub use vote_ledger::InMemoryVoteLedger;

/// Current wall-clock time as unix seconds.
pub(crate) fn now_unix() -> u64 {
    time::OffsetDateTime::now_utc().unix_timestamp().max(0) as u64
}
