//! Environment variable overrides.
//!
//! Only keys that are already known from the defaults or the config file are
//! read. A key `database.maxConns` with prefix `my-app` is read from
//! `MY_APP_DATABASE_MAXCONNS`. Values are kept as text and converted to the
//! field's type when the config is extracted.

use std::collections::HashMap;

use figment::providers::Env;
use figment::util::nest;
use figment::value::{Dict, Value};

use super::snapshot::leaf_paths;
use super::strict::merge_entry;

/// Reads `PREFIX_SECTION_FIELD` variables for known config keys.
#[derive(Debug, Clone)]
pub struct EnvOverlay {
    prefix: String,
}

impl EnvOverlay {
    /// Create an overlay for `prefix`. Returns `None` when the prefix is
    /// empty, which disables environment overrides.
    pub fn new(prefix: &str) -> Option<Self> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return None;
        }
        Some(Self {
            prefix: normalize(prefix),
        })
    }

    /// Variable name for a key path.
    pub fn var_name(&self, path: &[String]) -> String {
        format!("{}_{}", self.prefix, suffix(path))
    }

    /// The normalized prefix, e.g. `MY_APP`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Environment provider yielding the dotted key of every leaf in `trees`
    /// that has a variable set.
    pub fn provider(&self, trees: &[&Dict]) -> Env {
        let mut known = HashMap::new();
        for tree in trees {
            for (path, value) in leaf_paths(tree) {
                // Open maps have no enumerable keys.
                if value.as_dict().is_some() {
                    continue;
                }
                known.insert(suffix(&path), path.join("."));
            }
        }

        Env::prefixed(&format!("{}_", self.prefix))
            .filter_map(move |key| {
                known
                    .get(&key.as_str().to_ascii_uppercase())
                    .map(|path| path.clone().into())
            })
            .lowercase(false)
    }

    /// Collect overrides for every leaf key of `trees`.
    pub fn collect(&self, trees: &[&Dict]) -> Dict {
        let mut overrides = Dict::new();
        for (key, raw) in self.provider(trees).iter() {
            tracing::debug!(key = key.as_str(), "environment override found");
            if let Value::Dict(_, nested) = nest(key.as_str(), Value::from(raw)) {
                for (name, value) in nested {
                    merge_entry(&mut overrides, name, value);
                }
            }
        }
        overrides
    }
}

fn normalize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| match c {
            '-' | '.' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Variable name of a key path without the prefix.
fn suffix(path: &[String]) -> String {
    path.iter()
        .map(|segment| normalize(segment))
        .collect::<Vec<_>>()
        .join("_")
}
