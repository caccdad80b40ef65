//! Domain layer for configuration loading
//!
//! This module contains the error taxonomy and the load outcome model.

pub mod errors;
pub mod models;

// Re-export error types for convenient access
pub use errors::{ConfigError, ConfigResult, Violation};
pub use models::LoadOutcome;
