//! Debug dump of a loaded configuration.
//!
//! WARNING: a dump contains the entire configuration. Do not enable it in
//! production, the output may end up in log storage with every secret the
//! config holds.

use std::io::{self, Write};

use figment::value::Dict;
use serde::Serialize;

use super::secret_scrubbing::SecretScrubber;
use crate::domain::LoadOutcome;

/// Output format of a debug dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DebugFormat {
    /// YAML documents, one per layer.
    #[default]
    Yaml,
    /// A single pretty-printed JSON object keyed by layer.
    Json,
}

/// Options for [`LoadOutcome::write_debug`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugOptions {
    /// Output format.
    pub format: DebugFormat,
    /// Replace secret-looking values with `[REDACTED]`.
    pub redact: bool,
}

#[derive(Serialize)]
struct Dump<'a> {
    config_file: String,
    used_defaults: bool,
    defaults: &'a Dict,
    file: Option<&'a Dict>,
    environment: &'a Dict,
    resolved: &'a Dict,
}

impl LoadOutcome {
    /// Print every layer and the resolved configuration to standard output.
    ///
    /// Only for use during development behind an explicit debug flag: the
    /// entire configuration is printed, secrets included.
    pub fn debug_dump(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.write_debug(&mut handle, DebugOptions::default())
    }

    /// Write every layer and the resolved configuration to `writer`.
    pub fn write_debug<W: Write>(&self, writer: &mut W, options: DebugOptions) -> io::Result<()> {
        tracing::warn!(
            redact = options.redact,
            "dumping the entire configuration; never enable this in production"
        );

        let scrubber = options.redact.then(SecretScrubber::new);
        let view = |tree: &Dict| match &scrubber {
            Some(scrubber) => scrubber.scrub_tree(tree),
            None => tree.clone(),
        };

        let defaults = view(&self.defaults);
        let file = self.file.as_ref().map(&view);
        let environment = view(&self.environment);
        let resolved = view(&self.resolved);

        let dump = Dump {
            config_file: self.config_file.display().to_string(),
            used_defaults: self.used_defaults,
            defaults: &defaults,
            file: file.as_ref(),
            environment: &environment,
            resolved: &resolved,
        };

        match options.format {
            DebugFormat::Json => {
                serde_json::to_writer_pretty(&mut *writer, &dump).map_err(io::Error::other)?;
                writeln!(writer)
            }
            DebugFormat::Yaml => write_yaml(writer, &dump),
        }
    }
}

fn write_yaml<W: Write>(writer: &mut W, dump: &Dump<'_>) -> io::Result<()> {
    writeln!(writer, "# config file: {}", dump.config_file)?;
    writeln!(writer, "# used defaults: {}", dump.used_defaults)?;
    let sections: [(&str, Option<&Dict>); 4] = [
        ("defaults", Some(dump.defaults)),
        ("file", dump.file),
        ("environment", Some(dump.environment)),
        ("resolved", Some(dump.resolved)),
    ];
    for (name, tree) in sections {
        writeln!(writer, "--- # {name}")?;
        match tree {
            Some(tree) if !tree.is_empty() => {
                let yaml = serde_yaml::to_string(tree).map_err(io::Error::other)?;
                writer.write_all(yaml.as_bytes())?;
            }
            _ => writeln!(writer, "{{}}")?,
        }
    }
    Ok(())
}
