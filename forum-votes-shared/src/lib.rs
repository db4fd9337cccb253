//! # Forum Votes Shared
//! This crate defines the data structures shared across the forum votes ecosystem.
//! It includes definitions for voteable targets, actors, votes, vote counts and
//! the transition kinds reported by a vote ledger.
pub mod types;
