//! In-memory plot object graph.
//!
//! Each node stores its properties in a [`PropertyTree`] and records every
//! successful write, which makes it suitable for dry runs and for counting
//! writes in tests. A node may restrict itself to a fixed set of supported
//! property paths to mimic plot objects that reject unknown names.

use super::{ContainerTarget, PropertyTarget, SubContainerTarget};
use crate::error::{LayoutError, LayoutResult};
use crate::tree::{PropertyTree, PropertyValue};
use std::collections::BTreeSet;

/// A single recorded property write.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyWrite {
    pub path: String,
    pub value: PropertyValue,
}

/// Property bag for one object in the graph.
#[derive(Debug, Clone, Default)]
pub struct MemoryNode {
    properties: PropertyTree,
    supported: Option<BTreeSet<String>>,
    writes: Vec<PropertyWrite>,
}

impl MemoryNode {
    /// A node that accepts any property path.
    pub fn new() -> Self {
        Self::default()
    }

    /// A node that only supports the given paths.
    pub fn with_supported<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            supported: Some(paths.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Seed a property without recording a write.
    pub fn with_property(mut self, path: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(path, value);
        self
    }

    pub fn properties(&self) -> &PropertyTree {
        &self.properties
    }

    pub fn writes(&self) -> &[PropertyWrite] {
        &self.writes
    }

    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    fn supports(&self, path: &str) -> bool {
        self.supported
            .as_ref()
            .is_none_or(|paths| paths.contains(path))
    }
}

impl PropertyTarget for MemoryNode {
    fn get_property(&self, path: &str) -> LayoutResult<PropertyValue> {
        if !self.supports(path) {
            return Err(LayoutError::unsupported(path));
        }
        self.properties
            .get(path)
            .cloned()
            .ok_or_else(|| LayoutError::unsupported(path))
    }

    fn set_property(&mut self, path: &str, value: &PropertyValue) -> LayoutResult<()> {
        if !self.supports(path) {
            return Err(LayoutError::unsupported(path));
        }
        if value.is_group() {
            return Err(LayoutError::type_mismatch(path, "a leaf value"));
        }
        self.properties.insert(path, value.clone());
        self.writes.push(PropertyWrite {
            path: path.to_string(),
            value: value.clone(),
        });
        Ok(())
    }
}

/// A plotting region with its lines.
#[derive(Debug, Clone, Default)]
pub struct MemoryAxes {
    pub node: MemoryNode,
    pub lines: Vec<MemoryNode>,
}

impl MemoryAxes {
    pub fn new(node: MemoryNode) -> Self {
        Self {
            node,
            lines: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: MemoryNode) -> Self {
        self.lines.push(line);
        self
    }

    /// Writes recorded on this axes and its lines.
    pub fn write_count(&self) -> usize {
        self.node.write_count() + self.lines.iter().map(MemoryNode::write_count).sum::<usize>()
    }
}

impl PropertyTarget for MemoryAxes {
    fn get_property(&self, path: &str) -> LayoutResult<PropertyValue> {
        self.node.get_property(path)
    }

    fn set_property(&mut self, path: &str, value: &PropertyValue) -> LayoutResult<()> {
        self.node.set_property(path, value)
    }
}

impl SubContainerTarget for MemoryAxes {
    fn child_elements(&self) -> Vec<&dyn PropertyTarget> {
        self.lines.iter().map(|l| l as &dyn PropertyTarget).collect()
    }

    fn child_elements_mut(&mut self) -> Vec<&mut dyn PropertyTarget> {
        self.lines
            .iter_mut()
            .map(|l| l as &mut dyn PropertyTarget)
            .collect()
    }
}

/// A figure window with its axes.
#[derive(Debug, Clone, Default)]
pub struct MemoryFigure {
    pub node: MemoryNode,
    pub axes: Vec<MemoryAxes>,
}

impl MemoryFigure {
    pub fn new(node: MemoryNode) -> Self {
        Self {
            node,
            axes: Vec::new(),
        }
    }

    pub fn with_axes(mut self, axes: MemoryAxes) -> Self {
        self.axes.push(axes);
        self
    }

    /// Writes recorded anywhere in the graph.
    pub fn write_count(&self) -> usize {
        self.node.write_count() + self.axes.iter().map(MemoryAxes::write_count).sum::<usize>()
    }

    /// Every recorded write, prefixed with the object it landed on.
    pub fn all_writes(&self) -> Vec<(String, PropertyWrite)> {
        let mut out: Vec<(String, PropertyWrite)> = self
            .node
            .writes()
            .iter()
            .map(|w| ("figure".to_string(), w.clone()))
            .collect();
        for (i, axes) in self.axes.iter().enumerate() {
            out.extend(
                axes.node
                    .writes()
                    .iter()
                    .map(|w| (format!("axes[{}]", i), w.clone())),
            );
            for (j, line) in axes.lines.iter().enumerate() {
                out.extend(
                    line.writes()
                        .iter()
                        .map(|w| (format!("axes[{}].line[{}]", i, j), w.clone())),
                );
            }
        }
        out
    }
}

impl PropertyTarget for MemoryFigure {
    fn get_property(&self, path: &str) -> LayoutResult<PropertyValue> {
        self.node.get_property(path)
    }

    fn set_property(&mut self, path: &str, value: &PropertyValue) -> LayoutResult<()> {
        self.node.set_property(path, value)
    }
}

impl ContainerTarget for MemoryFigure {
    fn sub_containers(&self) -> Vec<&dyn SubContainerTarget> {
        self.axes
            .iter()
            .map(|a| a as &dyn SubContainerTarget)
            .collect()
    }

    fn sub_containers_mut(&mut self) -> Vec<&mut dyn SubContainerTarget> {
        self.axes
            .iter_mut()
            .map(|a| a as &mut dyn SubContainerTarget)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_paths_fail() {
        let mut node = MemoryNode::with_supported(["Color"]);
        assert!(node.get_property("FontSize").is_err());
        assert!(node.set_property("FontSize", &PropertyValue::Number(1.0)).is_err());
        assert!(node.set_property("Color", &PropertyValue::from([0.0, 0.0, 0.0])).is_ok());
        assert_eq!(node.write_count(), 1);
    }

    #[test]
    fn test_seeded_properties_are_not_writes() {
        let node = MemoryNode::new().with_property("XAxis.LineWidth", 0.5);
        assert_eq!(
            node.get_property("XAxis.LineWidth").unwrap(),
            PropertyValue::Number(0.5)
        );
        assert_eq!(node.write_count(), 0);
    }

    #[test]
    fn test_figure_counts_writes_across_graph() {
        let mut figure = MemoryFigure::new(MemoryNode::new())
            .with_axes(MemoryAxes::new(MemoryNode::new()).with_line(MemoryNode::new()));
        figure.set_property("Color", &PropertyValue::from([1.0, 1.0, 1.0])).unwrap();
        for axes in figure.sub_containers_mut() {
            axes.set_property("FontSize", &PropertyValue::Number(10.0)).unwrap();
            for line in axes.child_elements_mut() {
                line.set_property("LineWidth", &PropertyValue::Number(2.0)).unwrap();
            }
        }
        assert_eq!(figure.write_count(), 3);
        let targets: Vec<String> = figure.all_writes().into_iter().map(|(t, _)| t).collect();
        assert_eq!(targets, vec!["figure", "axes[0]", "axes[0].line[0]"]);
    }
}
