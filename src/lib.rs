//! Layout Presets Library
//!
//! Persists named styling presets for plots (colors, line widths, grids,
//! font sizes) and re-applies them onto live plot object graphs, writing
//! only the properties that actually change.

pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod layout;
pub mod logging;
pub mod merge;
pub mod presets;
pub mod resolver;
pub mod store;
pub mod target;
pub mod tree;

pub use capture::Profile;
pub use error::{LayoutError, LayoutResult};
pub use layout::{Layout, LayoutCollection, LayoutGroup};
pub use presets::{ApplyReport, LayoutManager, SaveReport};
pub use tree::{PropertyTree, PropertyValue};
