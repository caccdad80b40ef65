//! Common test utilities for integration tests
//!
//! Provides the config struct fixture and file helpers shared across the
//! loader test files.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    #[validate(custom(function = "strata::validators::required"))]
    pub user: String,
    #[validate(custom(function = "strata::validators::required"))]
    pub password: String,
    #[validate(custom(function = "strata::validators::required"))]
    pub host: String,
    #[validate(custom(function = "strata::validators::required"))]
    pub port: i32,
    #[validate(custom(function = "strata::validators::required"))]
    pub name: String,
    #[serde(rename = "sslMode")]
    pub ssl_mode: String,
    #[serde(rename = "maxConns")]
    pub max_conns: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct LogsConfig {
    /// error | warn | info, case insensitive
    #[serde(rename = "level")]
    pub log_level: String,
    #[serde(rename = "isJSON")]
    pub is_json: bool,
    /// Queries slower than this are logged, e.g. "1ms" or "1s".
    #[serde(rename = "databaseSlowThreshold")]
    #[validate(custom(function = "strata::validators::duration"))]
    pub slow_threshold: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(custom(function = "strata::validators::required"))]
    pub port: i32,
    #[serde(rename = "publicUrl")]
    #[validate(custom(function = "strata::validators::url_syntax"))]
    pub public_url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub database: DatabaseConfig,
    #[serde(rename = "log")]
    #[validate(nested)]
    pub logs: LogsConfig,
    #[validate(nested)]
    pub server: ServerConfig,
}

/// Defaults are only set for fields that are not required.
pub fn default_config() -> Config {
    Config {
        database: DatabaseConfig {
            ssl_mode: "disable".to_string(),
            max_conns: 200,
            ..Default::default()
        },
        logs: LogsConfig {
            log_level: "debug".to_string(),
            is_json: false,
            slow_threshold: "1ms".to_string(),
        },
        server: ServerConfig::default(),
    }
}

/// A complete, valid config file.
pub const VALID_YAML: &str = r#"database:
  user: test_user
  password: "test_pwd"
  host: test_host
  name: test_name
  port: "90"
server:
  port: "90"
"#;

/// The result of merging [`VALID_YAML`] over [`default_config`].
#[allow(dead_code)]
pub fn expected_valid_config() -> Config {
    Config {
        database: DatabaseConfig {
            user: "test_user".to_string(),
            password: "test_pwd".to_string(),
            host: "test_host".to_string(),
            port: 90,
            name: "test_name".to_string(),
            ssl_mode: "disable".to_string(),
            max_conns: 200,
        },
        logs: LogsConfig {
            log_level: "debug".to_string(),
            is_json: false,
            slow_threshold: "1ms".to_string(),
        },
        server: ServerConfig {
            port: 90,
            public_url: String::new(),
        },
    }
}

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write `contents` to `name` inside `dir` and return the full path.
pub fn write_config(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write config file");
    path
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
