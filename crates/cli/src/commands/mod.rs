//! Command handlers for the Localfind CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod models;
pub mod search;

// Re-export command types for convenience
pub use models::ModelsCommand;
pub use search::SearchCommand;
