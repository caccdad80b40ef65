use std::path::{Path, PathBuf};

use figment::providers::Serialized;
use figment::value::{Dict, Value};
use figment::Figment;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use validator::Validate;

use super::env::EnvOverlay;
use super::layer::Layer;
use super::snapshot::DefaultsSnapshot;
use super::sources::{self, ResolvedFile};
use super::strict;
use crate::domain::{ConfigError, ConfigResult, LoadOutcome};
use crate::infrastructure::validators;

/// Base name searched for next to the executable when no path is given.
pub const DEFAULT_FILE_NAME: &str = "config";

/// Configuration loader with layered merging
///
/// Precedence (lowest to highest):
/// 1. Values already set on the struct passed to [`ConfigLoader::load`]
/// 2. The config file (explicit path, or `config.yaml` next to the executable)
/// 3. Environment variables (`PREFIX_SECTION_FIELD`, only when a prefix is set)
///
/// Each call builds its own merge context, so one loader can be shared and
/// used from several threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLoader {
    config_file: Option<PathBuf>,
    env_prefix: Option<String>,
    search_dir: Option<PathBuf>,
    file_name: String,
    require_file: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            config_file: None,
            env_prefix: None,
            search_dir: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
            require_file: false,
        }
    }
}

impl ConfigLoader {
    /// Loader that searches next to the executable and ignores the environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this file instead of searching. An empty path restores the search.
    ///
    /// Unlike a searched file, an explicit file that does not exist is an
    /// error.
    #[must_use]
    pub fn config_file(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.config_file = (!path.as_os_str().is_empty()).then(|| path.to_path_buf());
        self
    }

    /// Enable environment overrides for variables starting with `PREFIX_`.
    /// Prefixes must be unique between projects. An empty prefix disables
    /// overrides.
    #[must_use]
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.env_prefix = (!prefix.trim().is_empty()).then_some(prefix);
        self
    }

    /// Search this directory instead of the executable's directory.
    #[must_use]
    pub fn search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = Some(dir.into());
        self
    }

    /// Base name of the searched file (default `config`).
    #[must_use]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Treat a missing searched config file as an error instead of falling
    /// back to defaults.
    #[must_use]
    pub const fn require_file(mut self, required: bool) -> Self {
        self.require_file = required;
        self
    }

    /// Merge defaults, file and environment into `config`, then validate it.
    ///
    /// `config` must hold the default values for optional fields; required
    /// fields should be left at their zero value so validation catches missing
    /// input. On error `config` may be partially updated and must not be used.
    pub fn load<T>(&self, config: &mut T) -> ConfigResult<LoadOutcome>
    where
        T: Serialize + DeserializeOwned + Validate,
    {
        let env = self.env_prefix.as_deref().and_then(EnvOverlay::new);

        let resolved = self.resolve_file()?;
        let file_values = if resolved.exists {
            info!(path = %resolved.path.display(), "using config file");
            Some(sources::read_layer(&resolved.path)?)
        } else if self.require_file || self.config_file.is_some() {
            return Err(ConfigError::FileNotFound(resolved.path));
        } else {
            info!(
                path = %resolved.path.display(),
                "config file not found, continuing with other values"
            );
            None
        };

        let defaults = DefaultsSnapshot::capture(config)?.into_tree();
        debug!(keys = defaults.len(), "captured default values");

        let origin = resolved.path.display().to_string();
        let file_values = file_values
            .map(|values| strict::conform(values, &defaults, &origin))
            .transpose()?;

        let environment = match &env {
            Some(env) => {
                let mut known = vec![&defaults];
                known.extend(file_values.as_ref());
                let overrides = env.collect(&known);
                debug!(prefix = env.prefix(), keys = overrides.len(), "collected environment overrides");
                overrides
            }
            None => Dict::new(),
        };

        let mut figment = Figment::new().merge(Serialized::defaults(&defaults));
        if let Some(values) = &file_values {
            figment = figment.merge(Layer::file(&resolved.path, values.clone()));
        }
        if let Some(env) = &env {
            if !environment.is_empty() {
                figment = figment.merge(Layer::environment(env.prefix(), environment.clone()));
            }
        }

        *config = figment.extract_lossy().map_err(ConfigError::decode)?;
        validators::check(config)?;

        let resolved_values = DefaultsSnapshot::capture(config)?.into_tree();
        Ok(LoadOutcome {
            used_defaults: !resolved.exists,
            config_file: resolved.path,
            defaults,
            file: file_values,
            environment,
            resolved: resolved_values,
        })
    }

    fn resolve_file(&self) -> ConfigResult<ResolvedFile> {
        if let Some(path) = &self.config_file {
            return Ok(sources::explicit(path));
        }
        let dir = match &self.search_dir {
            Some(dir) => dir.clone(),
            None => sources::executable_dir()?,
        };
        Ok(sources::search(&dir, &self.file_name))
    }
}

/// Load `config` from `config.yaml` next to the executable, without
/// environment overrides.
pub fn init_and_load<T>(config: &mut T) -> ConfigResult<LoadOutcome>
where
    T: Serialize + DeserializeOwned + Validate,
{
    ConfigLoader::new().load(config)
}

/// Load `config` from `config_file` (or `config.yaml` next to the executable
/// when empty), with environment overrides under `env_prefix` when non-empty.
///
/// A non-empty `config_file` must exist.
pub fn init_and_load_with_params<T>(
    config: &mut T,
    config_file: impl AsRef<Path>,
    env_prefix: &str,
) -> ConfigResult<LoadOutcome>
where
    T: Serialize + DeserializeOwned + Validate,
{
    ConfigLoader::new()
        .config_file(config_file)
        .env_prefix(env_prefix)
        .load(config)
}

/// Value stored at a dotted key of a resolved tree, mainly for diagnostics.
pub fn lookup<'a>(tree: &'a Dict, key: &str) -> Option<&'a Value> {
    let mut segments = key.split('.');
    let mut current = tree.get(segments.next()?)?;
    for segment in segments {
        current = current.as_dict()?.get(segment)?;
    }
    Some(current)
}
