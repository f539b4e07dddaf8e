//! Configuration loader with tier-based merging.
//!
//! Tiers, lowest to highest precedence: embedded defaults, the user config
//! directory, the project config directory, then environment variables.
//! Project settings override user settings the same way a layout store in
//! the working directory overrides the per-user store.

use super::merge::deep_merge_all;
use super::types::Config;
use anyhow::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the configuration file inside each tier directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Embedded defaults (lowest priority)
    Defaults = 0,
    /// User-level config (<config_dir>/layout-presets/)
    User = 1,
    /// Project-level config ($CWD/.layout-presets/)
    Project = 2,
    /// Environment variables (highest priority)
    Environment = 3,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Directories consulted for configuration and for the layout store.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Working directory; the local layout store lives here.
    pub work_dir: PathBuf,
    /// Project-level config directory
    pub project_dir: Option<PathBuf>,
    /// User-level config directory; the per-user layout store lives here.
    pub user_dir: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    pub fn discover() -> Self {
        // User dir: LAYOUT_PRESETS_USER_DIR or <config_dir>/layout-presets
        let user_dir = std::env::var("LAYOUT_PRESETS_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|d| d.join("layout-presets")));

        // Project dir: LAYOUT_PRESETS_PROJECT_DIR or $CWD/.layout-presets
        let project_dir = std::env::var("LAYOUT_PRESETS_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from(".layout-presets")));

        Self {
            work_dir: PathBuf::from("."),
            project_dir,
            user_dir,
        }
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(
        work_dir: impl Into<PathBuf>,
        project_dir: Option<PathBuf>,
        user_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            work_dir: work_dir.into(),
            project_dir,
            user_dir,
        }
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Paths for each tier
    pub paths: ConfigPaths,
    /// Loaded configuration
    config: Config,
    /// Highest-precedence config file that contributed (if any)
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Load configuration from all tiers with proper merging.
    pub fn load() -> Result<Self> {
        Self::load_with_paths(ConfigPaths::discover())
    }

    /// Load configuration with explicit paths.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        // Explicit config file overrides all tiers
        if let Ok(explicit_path) = std::env::var("LAYOUT_PRESETS_CONFIG_PATH") {
            let path = PathBuf::from(&explicit_path);
            let mut config = Config::load(&path)?;
            Self::apply_env_overrides(&mut config);
            return Ok(Self {
                paths,
                config,
                config_path: Some(path),
            });
        }

        let mut configs: Vec<Value> = Vec::new();
        let mut config_path = None;

        // Tier 1: Defaults (embedded)
        configs.push(serde_json::to_value(Config::default())?);

        // Tier 2: User config
        if let Some(ref user_dir) = paths.user_dir
            && let Some(value) = Self::read_tier(&user_dir.join(CONFIG_FILE), ConfigTier::User)
        {
            configs.push(value);
            config_path = Some(user_dir.join(CONFIG_FILE));
        }

        // Tier 3: Project config
        if let Some(ref project_dir) = paths.project_dir
            && let Some(value) =
                Self::read_tier(&project_dir.join(CONFIG_FILE), ConfigTier::Project)
        {
            configs.push(value);
            config_path = Some(project_dir.join(CONFIG_FILE));
        }

        let merged = deep_merge_all(configs);
        let mut config: Config = serde_json::from_value(merged)?;

        // Tier 4: Environment variable overrides
        Self::apply_env_overrides(&mut config);

        Ok(Self {
            paths,
            config,
            config_path,
        })
    }

    /// Read one tier's YAML file. Missing files are skipped quietly,
    /// unreadable or malformed ones with a warning.
    fn read_tier(path: &Path, tier: ConfigTier) -> Option<Value> {
        if !path.exists() {
            return None;
        }
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!(tier = %tier, path = %path.display(), error = %err, "cannot read config");
                return None;
            }
        };
        match serde_yaml::from_str::<Value>(&content) {
            Ok(value) => {
                debug!(tier = %tier, path = %path.display(), "loaded config");
                Some(value)
            }
            Err(err) => {
                warn!(tier = %tier, path = %path.display(), error = %err, "ignoring malformed config");
                None
            }
        }
    }

    /// Apply environment variable overrides to config.
    fn apply_env_overrides(config: &mut Config) {
        if let Ok(store) = std::env::var("LAYOUT_PRESETS_STORE") {
            config.store.path = Some(PathBuf::from(store));
        }

        if let Ok(profile) = std::env::var("LAYOUT_PRESETS_PROFILE") {
            config.default_profile = profile;
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable access to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Get the config file path that was used.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
