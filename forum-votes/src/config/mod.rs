//! Configuration module for the forum votes service.
//! Defines and manages application-wide settings and dependencies.
mod dependencies;
pub mod handlers;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{Backend, Settings};
