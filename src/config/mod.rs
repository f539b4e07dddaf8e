//! Configuration system.
//!
//! Consolidates configuration from tiers with field-by-field YAML merging:
//! 1. **Defaults** - Built into the binary
//! 2. **User** - `<config_dir>/layout-presets/config.yaml`
//! 3. **Project** - `$CWD/.layout-presets/config.yaml`
//! 4. **Environment** - variables below
//!
//! ## Environment Variables
//! - `LAYOUT_PRESETS_CONFIG_PATH` - Explicit config file (overrides all tiers)
//! - `LAYOUT_PRESETS_STORE` - Explicit layout store file
//! - `LAYOUT_PRESETS_PROFILE` - Default capture profile
//! - `LAYOUT_PRESETS_USER_DIR` - User config dir (default: `<config_dir>/layout-presets`)
//! - `LAYOUT_PRESETS_PROJECT_DIR` - Project config dir (default: `./.layout-presets`)

mod loader;
mod merge;
mod types;

pub use loader::{CONFIG_FILE, ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;
