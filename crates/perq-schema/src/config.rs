//! `perq.toml` loading.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{error::ConfigError, types::Schema};

/// Name of the perq configuration file.
pub const CONFIG_FILENAME: &str = "perq.toml";

/// Default index directory, relative to the config file.
const DEFAULT_INDEX_DIR: &str = ".perq/index";

/// Raw deserialization target for `perq.toml`.
#[derive(Debug, Deserialize)]
struct RawConfig {
    /// Index directory, relative to the config file unless absolute.
    index: Option<PathBuf>,
    /// Declared document fields.
    #[serde(default)]
    fields: Schema,
}

/// Resolved perq configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute (or caller-relative) path to the stored-query index directory.
    pub index: PathBuf,
    /// The field schema.
    pub fields: Schema,
}

impl Config {
    /// Loads configuration from a `perq.toml` file.
    ///
    /// The `index` setting is resolved relative to the config file's
    /// directory and defaults to `.perq/index`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Parses configuration from a TOML string.
    ///
    /// `path` is used for error reporting and for resolving the index
    /// directory.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

        if raw.fields.is_empty() {
            return Err(ConfigError::NoFields {
                path: path.to_path_buf(),
            });
        }

        let base = path.parent().unwrap_or(Path::new("."));
        let index = raw
            .index
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_DIR));
        let index = if index.is_absolute() {
            index
        } else {
            base.join(index)
        };

        Ok(Self {
            index,
            fields: raw.fields,
        })
    }
}
