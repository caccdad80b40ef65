//! Strata - layered configuration loading
//!
//! Strata fills a configuration struct from three sources and validates the
//! result with a single call at program startup:
//!
//! 1. Defaults already set on the struct
//! 2. An optional YAML, JSON or TOML file
//! 3. Optional environment variables sharing a prefix
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): Error taxonomy and the load outcome
//! - **Infrastructure Layer** (`infrastructure`): Layer merging, decoding and
//!   validation on top of figment and validator
//!
//! # Example
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//! use strata::{ConfigLoader, Validate};
//!
//! #[derive(Default, Serialize, Deserialize, Validate)]
//! struct Config {
//!     #[validate(custom(function = "strata::validators::required"))]
//!     port: u16,
//!     host: String,
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut config = Config {
//!         host: "127.0.0.1".to_string(),
//!         ..Default::default()
//!     };
//!     let outcome = ConfigLoader::new()
//!         .config_file("/etc/my-app/config.yaml")
//!         .env_prefix("my-app")
//!         .load(&mut config)?;
//!     println!("loaded from {}", outcome.config_file().display());
//!     Ok(())
//! }
//! ```

pub mod domain;
pub mod infrastructure;

pub use infrastructure::validators;

// Re-export commonly used types for convenience
pub use domain::{ConfigError, ConfigResult, LoadOutcome, Violation};
pub use infrastructure::config::{
    init_and_load, init_and_load_with_params, ConfigLoader, DebugFormat, DebugOptions,
    FileFormat,
};
pub use validator::{Validate, ValidationError};
