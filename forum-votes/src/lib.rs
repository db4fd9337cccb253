//! Forum Votes Library
//!
//! This library wires the vote engine to a storage backend chosen from the
//! environment, and exposes the line-oriented command handler the binary
//! serves.

pub mod config;
pub mod errors;

pub use config::{Dependencies, Settings};
pub use errors::AppError;
