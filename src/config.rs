//! Configuration.
//!
//! Settings are read from a TOML file:
//!
//! ```toml
//! tl_namespace_prefix = "\\VK\\TL\\"
//! max_type_depth = 64
//! ```
//!
//! [`Config::discover`] looks for `phpdoc-types.toml` in the project
//! directory first, then for `phpdoc-types/config.toml` in the user's
//! config directory, and falls back to the defaults.

use std::path::{Path, PathBuf};

use etcetera::BaseStrategy;
use serde::Deserialize;

use crate::error::ConfigError;

/// File name looked up in the project directory.
pub const PROJECT_CONFIG_FILE: &str = "phpdoc-types.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Namespace substituted for the `@tl\` shorthand in type names.
    pub tl_namespace_prefix: String,
    /// Maximum nesting of parentheses and generic argument lists in one type.
    pub max_type_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tl_namespace_prefix: "\\VK\\TL\\".to_string(),
            max_type_depth: 64,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Find and load the configuration that applies to `project_dir`.
    pub fn discover(project_dir: &Path) -> Result<Self, ConfigError> {
        match Self::candidate_paths(project_dir)
            .into_iter()
            .find(|p| p.is_file())
        {
            Some(path) => {
                tracing::debug!("loading config from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    fn candidate_paths(project_dir: &Path) -> Vec<PathBuf> {
        let mut paths = vec![project_dir.join(PROJECT_CONFIG_FILE)];
        match etcetera::choose_base_strategy() {
            Ok(strategy) => paths.push(strategy.config_dir().join("phpdoc-types").join("config.toml")),
            Err(err) => tracing::debug!("no user config directory: {err}"),
        }
        paths
    }
}
