//! Public layout operations.
//!
//! [`LayoutManager`] ties the store, the resolver, capture and the merge
//! engine together. Every operation takes the target explicitly.

use crate::capture::{Profile, capture_layout};
use crate::config::{Config, ConfigPaths};
use crate::error::{LayoutError, LayoutResult};
use crate::layout::{Layout, LayoutCollection, LayoutGroup};
use crate::merge::{MergeEvent, MergeReport, apply_properties_with};
use crate::resolver::{self, Origin, Resolution};
use crate::store::{LayoutStore, StoreLocation};
use crate::target::ContainerTarget;
use std::path::PathBuf;
use tracing::{error, info};

/// Result of a save.
#[derive(Debug)]
pub struct SaveReport {
    /// The captured layout.
    pub layout: Layout,
    /// Whether a layout with the same name was replaced.
    pub replaced: bool,
    /// The store file on success, the write error otherwise.
    pub persisted: LayoutResult<PathBuf>,
}

impl SaveReport {
    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }
}

/// Result of applying a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyReport {
    /// Name of the layout that was applied.
    pub layout_name: String,
    pub origin: Origin,
    /// Figure-level outcome.
    pub container: MergeReport,
    /// Outcome summed over all axes.
    pub sub_containers: MergeReport,
    /// Outcome summed over all lines.
    pub child_elements: MergeReport,
}

impl ApplyReport {
    /// Outcome summed over all levels.
    pub fn total(&self) -> MergeReport {
        let mut total = self.container;
        total += self.sub_containers;
        total += self.child_elements;
        total
    }
}

/// Entry point for saving, listing and applying layouts.
#[derive(Debug, Clone)]
pub struct LayoutManager {
    store: LayoutStore,
    profile: Profile,
}

impl LayoutManager {
    /// Manager over `store` that captures with the `Basic` profile by default.
    pub fn new(store: LayoutStore) -> Self {
        Self {
            store,
            profile: Profile::BASIC,
        }
    }

    /// Manager over the store location and default profile described by
    /// `config`.
    pub fn from_config(config: &Config, paths: &ConfigPaths) -> Self {
        Self::new(LayoutStore::new(StoreLocation::from_config(config, paths)))
            .with_profile(config.profile())
    }

    /// Set the profile used by [`save_default`](Self::save_default).
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Capture `target` under the configured default profile.
    pub fn save_default(
        &self,
        name: &str,
        target: &dyn ContainerTarget,
    ) -> LayoutResult<SaveReport> {
        self.save(name, target, self.profile)
    }

    /// Capture `target` under `profile` and store it as `name`.
    ///
    /// Fails only if `target` has no axes. A store write failure is logged
    /// and carried in the report.
    pub fn save(
        &self,
        name: &str,
        target: &dyn ContainerTarget,
        profile: Profile,
    ) -> LayoutResult<SaveReport> {
        let layout = capture_layout(name, target, profile)?;
        let mut collection = self.store.load();
        let replaced = collection.upsert(layout.clone());
        let persisted = self.store.save(&collection);
        match &persisted {
            Ok(path) => info!(layout = %name, path = %path.display(), replaced, "layout saved"),
            Err(err) => error!(layout = %name, error = %err, "failed to save layout"),
        }
        Ok(SaveReport {
            layout,
            replaced,
            persisted,
        })
    }

    /// Apply the layout named `name` (or the default) onto `target`.
    pub fn apply_layout(
        &self,
        name: Option<&str>,
        target: &mut dyn ContainerTarget,
    ) -> LayoutResult<ApplyReport> {
        self.apply_layout_with(name, target, &mut |_, _| {})
    }

    /// Like [`apply_layout`](Self::apply_layout), reporting every leaf
    /// outcome together with the level it applied to.
    pub fn apply_layout_with(
        &self,
        name: Option<&str>,
        target: &mut dyn ContainerTarget,
        on_event: &mut dyn FnMut(LayoutGroup, &MergeEvent<'_>),
    ) -> LayoutResult<ApplyReport> {
        if !target.has_sub_containers() {
            return Err(LayoutError::NoSubContainer);
        }
        let resolution = resolver::resolve(name, &self.store.load());
        Ok(apply_resolution(&resolution, target, on_event))
    }

    /// All stored layouts.
    pub fn load_layouts(&self) -> LayoutCollection {
        self.store.load()
    }

    /// Names of all stored layouts in stored order.
    pub fn list_layout_names(&self) -> Vec<String> {
        self.store
            .load()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// A stored layout by case-insensitive name.
    pub fn find_layout(&self, name: &str) -> Option<Layout> {
        self.store.load().find(name).cloned()
    }

    /// The built-in default layout.
    pub fn default_layout(&self) -> Layout {
        resolver::default_layout()
    }

    /// Insert or replace each layout of `layouts` by name, then save once.
    pub fn import(&self, layouts: LayoutCollection) -> LayoutResult<PathBuf> {
        let mut collection = self.store.load();
        for layout in layouts {
            collection.upsert(layout);
        }
        self.store.save(&collection)
    }
}

/// Apply a resolved layout: the figure group onto the figure, the axis group
/// onto every axes, the line group onto every line of every axes. Absent
/// groups are skipped.
pub fn apply_resolution(
    resolution: &Resolution,
    target: &mut dyn ContainerTarget,
    on_event: &mut dyn FnMut(LayoutGroup, &MergeEvent<'_>),
) -> ApplyReport {
    let layout = &resolution.layout;
    let mut report = ApplyReport {
        layout_name: layout.name.clone(),
        origin: resolution.origin.clone(),
        container: MergeReport::default(),
        sub_containers: MergeReport::default(),
        child_elements: MergeReport::default(),
    };

    if let Some(figure) = layout.group(LayoutGroup::Container) {
        report.container = apply_properties_with(figure, &mut *target, &mut |event| {
            on_event(LayoutGroup::Container, event)
        });
    }

    let axis_group = layout.group(LayoutGroup::SubContainer);
    let line_group = layout.group(LayoutGroup::ChildElement);
    for axes in target.sub_containers_mut() {
        if let Some(axis) = axis_group {
            report.sub_containers += apply_properties_with(axis, &mut *axes, &mut |event| {
                on_event(LayoutGroup::SubContainer, event)
            });
        }
        if let Some(line) = line_group {
            for element in axes.child_elements_mut() {
                report.child_elements += apply_properties_with(line, element, &mut |event| {
                    on_event(LayoutGroup::ChildElement, event)
                });
            }
        }
    }

    info!(
        layout = %report.layout_name,
        origin = %report.origin,
        written = report.total().written,
        "layout applied"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::memory::{MemoryAxes, MemoryFigure, MemoryNode};
    use crate::tree::PropertyValue;
    use tempfile::TempDir;

    fn figure_with_lines(lines: usize) -> MemoryFigure {
        let mut axes = MemoryAxes::new(MemoryNode::new());
        for _ in 0..lines {
            axes = axes.with_line(MemoryNode::new());
        }
        MemoryFigure::new(MemoryNode::new()).with_axes(axes)
    }

    #[test]
    fn test_apply_default_counts_levels() {
        let temp = TempDir::new().unwrap();
        let manager = LayoutManager::new(LayoutStore::at(temp.path().join("layouts.json")));
        let mut figure = figure_with_lines(2);

        let report = manager.apply_layout(None, &mut figure).unwrap();
        assert_eq!(report.origin, Origin::Default);
        assert_eq!(report.container.written, 1);
        assert_eq!(report.sub_containers.written, 10);
        assert_eq!(report.child_elements.written, 2);
        assert_eq!(report.total().written, figure.write_count());
    }

    #[test]
    fn test_apply_reports_levels_to_callback() {
        let temp = TempDir::new().unwrap();
        let manager = LayoutManager::new(LayoutStore::at(temp.path().join("layouts.json")));
        let mut figure = figure_with_lines(1);

        let mut levels = Vec::new();
        manager
            .apply_layout_with(None, &mut figure, &mut |group, _| levels.push(group))
            .unwrap();
        assert_eq!(levels.first(), Some(&LayoutGroup::Container));
        assert_eq!(levels.last(), Some(&LayoutGroup::ChildElement));
        assert_eq!(levels.len(), 12);
    }

    #[test]
    fn test_apply_without_axes_fails() {
        let temp = TempDir::new().unwrap();
        let manager = LayoutManager::new(LayoutStore::at(temp.path().join("layouts.json")));
        let mut figure = MemoryFigure::new(MemoryNode::new());
        let err = manager.apply_layout(None, &mut figure).unwrap_err();
        assert!(matches!(err, LayoutError::NoSubContainer));
        assert_eq!(figure.write_count(), 0);
    }

    #[test]
    fn test_save_reports_write_failure() {
        let temp = TempDir::new().unwrap();
        // A directory where the store file should be makes the write fail.
        let path = temp.path().join("layouts.json");
        std::fs::create_dir_all(&path).unwrap();
        let manager = LayoutManager::new(LayoutStore::at(&path));

        let figure = figure_with_lines(0);
        let report = manager.save("Broken", &figure, Profile::BASIC).unwrap();
        assert!(!report.is_persisted());
        assert_eq!(report.layout.name, "Broken");
    }

    #[test]
    fn test_save_default_uses_configured_profile() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.default_profile = "Full,Line".to_string();
        config.store.path = Some(temp.path().join("layouts.json"));
        let paths = ConfigPaths::with_dirs(temp.path(), None, None);
        let manager = LayoutManager::from_config(&config, &paths);
        assert_eq!(manager.profile(), Profile::parse("Full,Line"));

        let figure = MemoryFigure::new(MemoryNode::new().with_property("MenuBar", "none")).with_axes(
            MemoryAxes::new(MemoryNode::new()).with_line(
                MemoryNode::new()
                    .with_property("LineWidth", 2.5)
                    .with_property("Marker", "o"),
            ),
        );
        let report = manager.save_default("Configured", &figure).unwrap();

        let line = report.layout.line.unwrap();
        assert_eq!(line.get("LineWidth"), Some(&PropertyValue::Number(2.5)));
        assert_eq!(line.get("Marker"), Some(&PropertyValue::Text("o".into())));
        assert_eq!(
            report.layout.figure.unwrap().get("MenuBar"),
            Some(&PropertyValue::Text("none".into()))
        );
        assert!(manager.find_layout("configured").unwrap().line.is_some());
    }

    #[test]
    fn test_new_manager_saves_basic_by_default() {
        let temp = TempDir::new().unwrap();
        let manager = LayoutManager::new(LayoutStore::at(temp.path().join("layouts.json")));
        let report = manager.save_default("Plain", &figure_with_lines(1)).unwrap();
        assert!(report.layout.line.is_none());
    }

    #[test]
    fn test_import_upserts_each() {
        let temp = TempDir::new().unwrap();
        let manager = LayoutManager::new(LayoutStore::at(temp.path().join("layouts.json")));
        manager
            .import(LayoutCollection::from(vec![Layout::new("A"), Layout::new("B")]))
            .unwrap();

        let replacement = Layout::new("b").with_group(
            LayoutGroup::ChildElement,
            crate::tree::PropertyTree::from_iter([("LineWidth", PropertyValue::from(3.0))]),
        );
        manager
            .import(LayoutCollection::from(vec![replacement, Layout::new("C")]))
            .unwrap();

        assert_eq!(manager.list_layout_names(), vec!["A", "b", "C"]);
        assert!(manager.find_layout("B").unwrap().line.is_some());
    }
}
