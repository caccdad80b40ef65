//! Configuration management infrastructure
//!
//! Layered configuration using figment:
//! - Defaults captured from a pre-populated struct
//! - YAML, JSON or TOML file loading with strict key checking
//! - Environment variable overrides
//! - Declarative validation through the `validator` derive
//! - Debug dumps with optional secret redaction

pub mod debug;
pub mod env;
pub mod layer;
pub mod loader;
pub mod secret_scrubbing;
pub mod snapshot;
pub mod sources;
pub mod strict;

pub use debug::{DebugFormat, DebugOptions};
pub use env::EnvOverlay;
pub use loader::{init_and_load, init_and_load_with_params, lookup, ConfigLoader, DEFAULT_FILE_NAME};
pub use secret_scrubbing::SecretScrubber;
pub use snapshot::DefaultsSnapshot;
pub use sources::FileFormat;
