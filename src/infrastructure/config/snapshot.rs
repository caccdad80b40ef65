//! Default values captured from a pre-populated config struct.

use std::collections::BTreeMap;

use figment::value::{Dict, Value};
use serde::Serialize;

use crate::domain::{ConfigError, ConfigResult};

/// Tree of default values taken from the caller's instance before any file or
/// environment layer is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultsSnapshot {
    tree: Dict,
}

impl DefaultsSnapshot {
    /// Serialize `config` into a tree. The struct must serialize to a table.
    pub fn capture<T: Serialize>(config: &T) -> ConfigResult<Self> {
        let value = Value::serialize(config).map_err(ConfigError::Snapshot)?;
        match value.into_dict() {
            Some(tree) => Ok(Self { tree }),
            None => Err(ConfigError::Snapshot(figment::Error::from(
                "config struct must serialize to a table of fields".to_string(),
            ))),
        }
    }

    /// The nested tree.
    pub const fn tree(&self) -> &Dict {
        &self.tree
    }

    /// Consume the snapshot, returning the nested tree.
    pub fn into_tree(self) -> Dict {
        self.tree
    }

    /// Dotted path to leaf value view of the tree.
    ///
    /// Nested tables are descended into; empty tables are kept as leaves since
    /// they stand for open maps whose keys are unknown up front.
    pub fn flatten(&self) -> BTreeMap<String, Value> {
        let mut leaves = BTreeMap::new();
        for (path, value) in leaf_paths(&self.tree) {
            leaves.insert(path.join("."), value.clone());
        }
        leaves
    }
}

/// Collect `(segments, value)` for every leaf of `tree`.
pub(crate) fn leaf_paths(tree: &Dict) -> Vec<(Vec<String>, &Value)> {
    let mut out = Vec::new();
    walk(tree, &mut Vec::new(), &mut out);
    out
}

fn walk<'a>(tree: &'a Dict, prefix: &mut Vec<String>, out: &mut Vec<(Vec<String>, &'a Value)>) {
    for (key, value) in tree {
        prefix.push(key.clone());
        match value.as_dict() {
            Some(nested) if !nested.is_empty() => walk(nested, prefix, out),
            _ => out.push((prefix.clone(), value)),
        }
        prefix.pop();
    }
}
