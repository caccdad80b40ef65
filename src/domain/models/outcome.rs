use std::path::{Path, PathBuf};

use figment::value::Dict;

/// Result of a successful [`ConfigLoader::load`](crate::ConfigLoader::load).
///
/// Besides the two facts callers usually care about (whether a file was
/// found and which path was consulted), the outcome keeps every merged layer
/// so [`LoadOutcome::debug_dump`] can show where each value came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub(crate) used_defaults: bool,
    pub(crate) config_file: PathBuf,
    pub(crate) defaults: Dict,
    pub(crate) file: Option<Dict>,
    pub(crate) environment: Dict,
    pub(crate) resolved: Dict,
}

impl LoadOutcome {
    /// True when no config file was found and only defaults and environment
    /// variables were merged.
    pub const fn used_defaults(&self) -> bool {
        self.used_defaults
    }

    /// The config file path that was consulted, whether or not it existed.
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Default values captured from the instance before merging.
    pub const fn defaults(&self) -> &Dict {
        &self.defaults
    }

    /// Values read from the config file, after key canonicalization.
    pub const fn file_values(&self) -> Option<&Dict> {
        self.file.as_ref()
    }

    /// Values taken from environment variables.
    pub const fn env_values(&self) -> &Dict {
        &self.environment
    }

    /// The final configuration as it was decoded into the struct.
    pub const fn resolved(&self) -> &Dict {
        &self.resolved
    }
}
