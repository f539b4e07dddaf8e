//! Configuration types and structures.

use crate::capture::Profile;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file name of the layout store.
pub const DEFAULT_STORE_FILE: &str = "layouts.json";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    /// Capture profile used when a save does not name one (default: "Basic").
    #[serde(default = "default_profile")]
    pub default_profile: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            default_profile: default_profile(),
        }
    }
}

/// Layout store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// File name looked up in the working directory and the user directory.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Explicit store file. Skips the working-directory/user lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            path: None,
        }
    }
}

fn default_profile() -> String {
    "Basic".to_string()
}

fn default_file_name() -> String {
    DEFAULT_STORE_FILE.to_string()
}

impl Config {
    /// Load configuration from a single YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// The configured default capture profile.
    pub fn profile(&self) -> Profile {
        Profile::parse(&self.default_profile)
    }
}
