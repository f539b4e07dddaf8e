//! Durable layout storage.
//!
//! All layouts live in one JSON document whose top level is either a single
//! layout object or an array of them. A store file in the working directory
//! takes precedence over the per-user one.
//!
//! Loading never fails from the caller's point of view: a missing file, an
//! unreadable file and a malformed document all read as "no layouts".
//! Saving overwrites the whole document.

use crate::config::{Config, ConfigPaths};
use crate::error::{LayoutError, LayoutResult};
use crate::layout::{Layout, LayoutCollection};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Candidate locations for the store file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLocation {
    /// Store file in the current working context.
    pub local: PathBuf,
    /// Per-user store file, if a user directory is known.
    pub user: Option<PathBuf>,
}

impl StoreLocation {
    pub fn new(local: impl Into<PathBuf>, user: Option<PathBuf>) -> Self {
        Self {
            local: local.into(),
            user,
        }
    }

    /// A single fixed store file.
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self::new(path, None)
    }

    /// Location from configuration: an explicit `store.path` wins, otherwise
    /// `store.file_name` in the working directory and the user directory.
    pub fn from_config(config: &Config, paths: &ConfigPaths) -> Self {
        if let Some(ref path) = config.store.path {
            return Self::explicit(path);
        }
        let file_name = &config.store.file_name;
        Self::new(
            paths.work_dir.join(file_name),
            paths.user_dir.as_ref().map(|dir| dir.join(file_name)),
        )
    }

    /// The file to read and write: the local file if it exists, otherwise the
    /// per-user file, otherwise the local file.
    pub fn resolve(&self) -> &Path {
        if self.local.exists() {
            return &self.local;
        }
        self.user.as_deref().unwrap_or(&self.local)
    }

    /// Whether the local file is the one in use.
    pub fn is_local(&self) -> bool {
        self.resolve() == self.local
    }
}

/// Reads and writes the layout collection.
#[derive(Debug, Clone)]
pub struct LayoutStore {
    location: StoreLocation,
}

impl LayoutStore {
    pub fn new(location: StoreLocation) -> Self {
        Self { location }
    }

    /// A store backed by one fixed file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreLocation::explicit(path))
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// The file currently in effect.
    pub fn path(&self) -> &Path {
        self.location.resolve()
    }

    /// Load all stored layouts, or an empty collection on any failure.
    pub fn load(&self) -> LayoutCollection {
        match self.try_load() {
            Ok(collection) => collection,
            Err(err) => {
                warn!(error = %err, "no stored layouts available");
                LayoutCollection::new()
            }
        }
    }

    /// Load all stored layouts. A missing file is an empty collection.
    pub fn try_load(&self) -> LayoutResult<LayoutCollection> {
        let path = self.path();
        if !path.exists() {
            debug!(path = %path.display(), "layout store does not exist yet");
            return Ok(LayoutCollection::new());
        }
        let content = fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let collection = parse_collection(&content).map_err(|source| LayoutError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), count = collection.len(), "loaded layouts");
        Ok(collection)
    }

    /// Overwrite the store with `collection`. Returns the file written.
    pub fn save(&self, collection: &LayoutCollection) -> LayoutResult<PathBuf> {
        let path = self.path().to_path_buf();
        let content = render_collection(collection)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| LayoutError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, content).map_err(|source| LayoutError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), count = collection.len(), "saved layouts");
        Ok(path)
    }

    /// Load, insert or replace `layout` by name, and save.
    ///
    /// Returns the updated collection together with the save outcome; the
    /// collection is valid even if the save failed.
    pub fn upsert(&self, layout: Layout) -> (LayoutCollection, LayoutResult<PathBuf>) {
        let mut collection = self.load();
        collection.upsert(layout);
        let saved = self.save(&collection);
        (collection, saved)
    }
}

/// Parse a stored document into a collection.
pub fn parse_collection(content: &str) -> Result<LayoutCollection, serde_json::Error> {
    if content.trim().is_empty() {
        return Ok(LayoutCollection::new());
    }
    serde_json::from_str(content)
}

/// Render a collection as an indented JSON document with a trailing newline.
pub fn render_collection(collection: &LayoutCollection) -> LayoutResult<String> {
    let mut content = serde_json::to_string_pretty(collection).map_err(LayoutError::Serialize)?;
    content.push('\n');
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutGroup;
    use crate::tree::{PropertyTree, PropertyValue};
    use tempfile::TempDir;

    fn layout(name: &str) -> Layout {
        Layout::new(name).with_group(
            LayoutGroup::Container,
            PropertyTree::from_iter([("Color", PropertyValue::from([1.0, 1.0, 1.0]))]),
        )
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let store = LayoutStore::at(temp.path().join("layouts.json"));
        assert!(store.load().is_empty());
        assert!(store.try_load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("layouts.json");
        fs::write(&path, "{ not json").unwrap();
        let store = LayoutStore::at(&path);
        assert!(store.load().is_empty());
        assert!(matches!(store.try_load(), Err(LayoutError::Parse { .. })));
    }

    #[test]
    fn test_blank_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("layouts.json");
        fs::write(&path, "  \n").unwrap();
        assert!(LayoutStore::at(&path).try_load().unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/layouts.json");
        let store = LayoutStore::at(&path);
        let written = store.save(&LayoutCollection::from(vec![layout("A")])).unwrap();
        assert_eq!(written, path);
        assert_eq!(store.load().names(), vec!["A"]);
    }

    #[test]
    fn test_rendered_document_is_multiline() {
        let content = render_collection(&LayoutCollection::from(vec![layout("A"), layout("B")])).unwrap();
        assert!(content.lines().count() > 2);
        assert!(content.ends_with('\n'));
        assert_eq!(parse_collection(&content).unwrap().names(), vec!["A", "B"]);
    }

    #[test]
    fn test_upsert_keeps_position() {
        let temp = TempDir::new().unwrap();
        let store = LayoutStore::at(temp.path().join("layouts.json"));
        store
            .save(&LayoutCollection::from(vec![layout("A"), layout("B")]))
            .unwrap();

        let (collection, saved) = store.upsert(Layout::new("a"));
        assert!(saved.is_ok());
        assert_eq!(collection.names(), vec!["a", "B"]);
        assert_eq!(store.load(), collection);
    }

    #[test]
    fn test_location_prefers_local() {
        let temp = TempDir::new().unwrap();
        let local = temp.path().join("local.json");
        let user = temp.path().join("user.json");
        let location = StoreLocation::new(&local, Some(user.clone()));

        assert_eq!(location.resolve(), user.as_path());
        assert!(!location.is_local());

        fs::write(&local, "[]").unwrap();
        assert_eq!(location.resolve(), local.as_path());
        assert!(location.is_local());
    }

    #[test]
    fn test_location_without_user_dir_uses_local() {
        let location = StoreLocation::new("layouts.json", None);
        assert_eq!(location.resolve(), Path::new("layouts.json"));
    }

    #[test]
    fn test_location_from_config() {
        let paths = ConfigPaths::with_dirs("/work", None, Some(PathBuf::from("/home/u/.config/lp")));
        let location = StoreLocation::from_config(&Config::default(), &paths);
        assert_eq!(location.local, PathBuf::from("/work/layouts.json"));
        assert_eq!(
            location.user,
            Some(PathBuf::from("/home/u/.config/lp/layouts.json"))
        );

        let mut config = Config::default();
        config.store.path = Some(PathBuf::from("/shared/presets.json"));
        let location = StoreLocation::from_config(&config, &paths);
        assert_eq!(location, StoreLocation::explicit("/shared/presets.json"));
    }
}
