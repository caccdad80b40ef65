//! Error types for configuration loading and validation.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Join violations as `field: rule; field: rule`.
fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single unmet field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `database.user`.
    pub field: String,
    /// Code of the rule that failed, e.g. `required` or `url`.
    pub rule: String,
    /// Optional human readable detail supplied by the rule.
    pub message: Option<String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {} ({})", self.field, self.rule, message),
            None => write!(f, "{}: {}", self.field, self.rule),
        }
    }
}

/// Errors returned by [`ConfigLoader::load`](crate::ConfigLoader::load).
///
/// Variants are ordered by the stage that produces them: locating the file,
/// reading and parsing it, decoding the merged layers into the schema, and
/// validating the decoded value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to resolve the executable directory: {0}")]
    ExecutableDir(#[source] io::Error),

    #[error("Config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported config file type: {}. Must be one of: yaml, yml, json, toml", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Config file found, but it could not be read: {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Config file found, but an error occurred while parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: figment::Error,
    },

    #[error("Default values could not be captured from the config struct: {0}")]
    Snapshot(#[source] figment::Error),

    #[error("Unknown config key '{key}' in {origin}")]
    UnknownKey { key: String, origin: String },

    #[error("cannot parse '{key}': {message}")]
    Decode {
        key: String,
        message: String,
        #[source]
        source: figment::Error,
    },

    #[error("Missing required or invalid config attributes: {}", format_violations(.0))]
    Validation(Vec<Violation>),
}

impl ConfigError {
    /// Build a [`ConfigError::Decode`] from a figment extraction failure.
    pub(crate) fn decode(source: figment::Error) -> Self {
        let key = if source.path.is_empty() {
            "<root>".to_string()
        } else {
            source.path.join(".")
        };
        let message = source.kind.to_string();
        Self::Decode {
            key,
            message,
            source,
        }
    }

    /// Violations carried by a validation failure, empty for other variants.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation(violations) => violations,
            _ => &[],
        }
    }
}

/// Result alias used throughout the crate.
pub type ConfigResult<T> = Result<T, ConfigError>;
