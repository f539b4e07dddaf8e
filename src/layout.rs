//! Layout data model.
//!
//! A [`Layout`] bundles up to three property groups, one per level of the
//! plot object graph. A [`LayoutCollection`] is the unit that is persisted.

use crate::tree::PropertyTree;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Level of the target object graph a property group applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutGroup {
    /// Top-level surface (figure window).
    Container,
    /// Plotting region (axes).
    SubContainer,
    /// Drawable item inside a plotting region (line).
    ChildElement,
}

impl LayoutGroup {
    pub const ALL: [LayoutGroup; 3] = [
        LayoutGroup::Container,
        LayoutGroup::SubContainer,
        LayoutGroup::ChildElement,
    ];

    /// Key of this group in the stored document.
    pub fn key(self) -> &'static str {
        match self {
            LayoutGroup::Container => "figure",
            LayoutGroup::SubContainer => "axis",
            LayoutGroup::ChildElement => "line",
        }
    }
}

impl fmt::Display for LayoutGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// A named bundle of styling properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figure: Option<PropertyTree>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<PropertyTree>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<PropertyTree>,

    /// Top-level fields this crate does not interpret, kept for the next save.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Layout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_group(mut self, group: LayoutGroup, tree: PropertyTree) -> Self {
        *self.group_slot(group) = Some(tree);
        self
    }

    pub fn group(&self, group: LayoutGroup) -> Option<&PropertyTree> {
        match group {
            LayoutGroup::Container => self.figure.as_ref(),
            LayoutGroup::SubContainer => self.axis.as_ref(),
            LayoutGroup::ChildElement => self.line.as_ref(),
        }
    }

    fn group_slot(&mut self, group: LayoutGroup) -> &mut Option<PropertyTree> {
        match group {
            LayoutGroup::Container => &mut self.figure,
            LayoutGroup::SubContainer => &mut self.axis,
            LayoutGroup::ChildElement => &mut self.line,
        }
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Stored document shape: either a single layout object or a sequence.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Layout>),
    One(Box<Layout>),
}

/// Ordered sequence of layouts; order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct LayoutCollection {
    layouts: Vec<Layout>,
}

impl Serialize for LayoutCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.layouts.serialize(serializer)
    }
}

impl From<OneOrMany> for LayoutCollection {
    fn from(doc: OneOrMany) -> Self {
        let layouts = match doc {
            OneOrMany::Many(layouts) => layouts,
            OneOrMany::One(layout) => vec![*layout],
        };
        Self { layouts }
    }
}

impl From<Vec<Layout>> for LayoutCollection {
    fn from(layouts: Vec<Layout>) -> Self {
        Self { layouts }
    }
}

impl LayoutCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layout> {
        self.layouts.iter()
    }

    /// First layout whose name matches case-insensitively.
    pub fn find(&self, name: &str) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.is_named(name))
    }

    /// Replace the first layout with a matching name in place, or append.
    ///
    /// Returns `true` when an existing layout was replaced.
    pub fn upsert(&mut self, layout: Layout) -> bool {
        match self.layouts.iter_mut().find(|l| l.is_named(&layout.name)) {
            Some(existing) => {
                *existing = layout;
                true
            }
            None => {
                self.layouts.push(layout);
                false
            }
        }
    }

    /// Layout names in stored order.
    pub fn names(&self) -> Vec<&str> {
        self.layouts.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<Layout> {
        self.layouts
    }
}

impl<'a> IntoIterator for &'a LayoutCollection {
    type Item = &'a Layout;
    type IntoIter = std::slice::Iter<'a, Layout>;

    fn into_iter(self) -> Self::IntoIter {
        self.layouts.iter()
    }
}

impl IntoIterator for LayoutCollection {
    type Item = Layout;
    type IntoIter = std::vec::IntoIter<Layout>;

    fn into_iter(self) -> Self::IntoIter {
        self.layouts.into_iter()
    }
}
