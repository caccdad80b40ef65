//! A figment provider for a layer that has already been parsed.

use std::path::Path;

use figment::value::{Dict, Map};
use figment::{Error, Metadata, Profile, Provider, Source};

/// One merge layer: a tree of values plus a description of where it came
/// from, so decode errors can point at the file or environment.
#[derive(Debug, Clone)]
pub struct Layer {
    metadata: Metadata,
    values: Dict,
}

impl Layer {
    /// Values read from the config file at `path`.
    pub fn file(path: &Path, values: Dict) -> Self {
        Self {
            metadata: Metadata::from("config file", Source::File(path.to_path_buf())),
            values,
        }
    }

    /// Values read from environment variables sharing `prefix`.
    pub fn environment(prefix: &str, values: Dict) -> Self {
        Self {
            metadata: Metadata::named(format!("`{prefix}_` environment variable(s)")),
            values,
        }
    }
}

impl Provider for Layer {
    fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        Ok(Profile::Default.collect(self.values.clone()))
    }
}
