//! Loads a service configuration at startup.
//!
//! ```text
//! cargo run --example service_config -- --config /opt/company/project.yaml --env-prefix company-project
//! ```
//!
//! Required fields are left empty in the defaults, so running without a
//! config file or environment variables reports what is missing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use strata::{ConfigLoader, DebugOptions, Validate};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
struct DatabaseConfig {
    #[validate(custom(function = "strata::validators::required"))]
    user: String,
    #[validate(custom(function = "strata::validators::required"))]
    password: String,
    #[validate(custom(function = "strata::validators::required"))]
    host: String,
    #[validate(custom(function = "strata::validators::required"))]
    port: u16,
    #[validate(custom(function = "strata::validators::required"))]
    name: String,
    #[serde(rename = "sslMode")]
    ssl_mode: String,
    #[serde(rename = "maxConns")]
    max_conns: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
struct LogsConfig {
    // error | warn | info, case insensitive
    level: String,
    #[serde(rename = "isJSON")]
    json: bool,
    #[serde(rename = "databaseSlowThreshold")]
    #[validate(custom(function = "strata::validators::duration"))]
    slow_threshold: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
struct ServerConfig {
    #[validate(custom(function = "strata::validators::required"))]
    port: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
struct Config {
    #[validate(nested)]
    database: DatabaseConfig,
    #[serde(rename = "log")]
    #[validate(nested)]
    logs: LogsConfig,
    #[validate(nested)]
    server: ServerConfig,
}

impl Config {
    /// Only fields without a `required` constraint get a default.
    fn defaults() -> Self {
        Self {
            database: DatabaseConfig {
                ssl_mode: "disable".to_string(),
                max_conns: 200,
                ..Default::default()
            },
            logs: LogsConfig {
                level: "debug".to_string(),
                json: false,
                slow_threshold: "1ms".to_string(),
            },
            server: ServerConfig::default(),
        }
    }
}

/// Demo service startup
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Config file; defaults to config.yaml next to the executable
    #[arg(short, long, env = "SERVICE_CONFIG")]
    config: Option<PathBuf>,

    /// Prefix enabling environment overrides, e.g. `company-project`
    #[arg(long, default_value = "")]
    env_prefix: String,

    /// Print the whole resolved configuration. Never use in production.
    #[arg(long)]
    debug_config: bool,

    /// Redact secrets in the debug output
    #[arg(long, requires = "debug_config")]
    redact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::defaults();
    let mut loader = ConfigLoader::new().env_prefix(cli.env_prefix);
    if let Some(path) = cli.config {
        loader = loader.config_file(path);
    }

    let outcome = loader
        .load(&mut config)
        .context("Unable to init and load config")?;

    if cli.debug_config {
        let options = DebugOptions {
            redact: cli.redact,
            ..Default::default()
        };
        outcome
            .write_debug(&mut std::io::stdout().lock(), options)
            .context("Failed to print config")?;
    }

    let slow_threshold = strata::validators::parse_duration(&config.logs.slow_threshold)
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    // Hand sub-configs to components so they never depend on the loader.
    tracing::info!(
        host = %config.database.host,
        port = config.database.port,
        database = %config.database.name,
        max_conns = config.database.max_conns,
        server_port = config.server.port,
        slow_threshold_ms = slow_threshold.as_millis(),
        used_defaults = outcome.used_defaults(),
        "service configured"
    );

    Ok(())
}
