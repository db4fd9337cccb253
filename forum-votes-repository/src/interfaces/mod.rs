//! This module defines and re-exports the storage interfaces.
//! It serves as a central point for accessing traits related to data interaction.
mod reputation_store;
mod target_directory;
mod vote_ledger;

pub use reputation_store::ReputationStore;
pub use target_directory::{AcceptanceChange, TargetDirectory, TargetRecord};
pub use vote_ledger::VoteLedger;
