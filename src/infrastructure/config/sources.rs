//! Config file resolution and parsing.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use figment::providers::{Format, Json, Toml, Yaml};
use figment::value::Dict;
use figment::{Profile, Provider};

use crate::domain::{ConfigError, ConfigResult};

/// Extensions tried, in order, when searching a directory for a config file.
pub(crate) const SEARCH_EXTENSIONS: &[&str] = &["yaml", "yml", "json", "toml"];

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// YAML, also used for files without an extension.
    Yaml,
    /// JSON.
    Json,
    /// TOML.
    Toml,
}

impl FileFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let Some(ext) = path.extension() else {
            return Some(Self::Yaml);
        };
        match ext.to_str()?.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    fn parse(self, contents: &str) -> Result<Dict, figment::Error> {
        let mut data = match self {
            Self::Yaml => Yaml::string(contents).data()?,
            Self::Json => Json::string(contents).data()?,
            Self::Toml => Toml::string(contents).data()?,
        };
        Ok(data.remove(&Profile::Default).unwrap_or_default())
    }
}

/// Where the loader looks for its config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Path that was (or would have been) read.
    pub path: PathBuf,
    /// Whether a file exists at `path`.
    pub exists: bool,
}

/// Resolve an explicit path verbatim.
pub fn explicit(path: &Path) -> ResolvedFile {
    ResolvedFile {
        path: path.to_path_buf(),
        exists: path.is_file(),
    }
}

/// Search `dir` for `name` with any of the [`SEARCH_EXTENSIONS`].
///
/// When nothing matches, the first candidate is reported as the consulted
/// path.
pub fn search(dir: &Path, name: &str) -> ResolvedFile {
    let candidates: Vec<PathBuf> = SEARCH_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .collect();

    if let Some(found) = candidates.iter().find(|path| path.is_file()) {
        return ResolvedFile {
            path: found.clone(),
            exists: true,
        };
    }

    ResolvedFile {
        path: candidates
            .into_iter()
            .next()
            .unwrap_or_else(|| dir.join(name)),
        exists: false,
    }
}

/// Directory containing the running executable.
pub fn executable_dir() -> ConfigResult<PathBuf> {
    let executable = env::current_exe().map_err(ConfigError::ExecutableDir)?;
    executable
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            ConfigError::ExecutableDir(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} has no parent directory", executable.display()),
            ))
        })
}

/// Read and parse the file at `path`.
///
/// The format is chosen before reading so an unsupported extension is
/// reported even when the file is unreadable.
pub fn read_layer(path: &Path) -> ConfigResult<Dict> {
    let format =
        FileFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if contents.trim().is_empty() {
        return Ok(Dict::new());
    }

    format.parse(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
