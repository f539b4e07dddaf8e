//! Capturing a layout from the current state of a live target.
//!
//! A capture profile selects which property subsets are read. Profile
//! strings are made of tokens separated by commas or spaces; matching is a
//! case-insensitive substring test:
//!
//! | Token   | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `Basic` | figure color, axes font size, grids and axis line widths    |
//! | `Full`  | adds window chrome and position to the figure group         |
//! | `Line`  | adds the line group (width only, or full style with `Full`) |
//!
//! `Basic` is always implied.

use crate::error::{LayoutError, LayoutResult};
use crate::layout::{Layout, LayoutGroup};
use crate::target::{ContainerTarget, PropertyTarget};
use crate::tree::PropertyTree;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Figure properties captured by every profile.
pub const FIGURE_BASIC: &[&str] = &["Color"];

/// Figure properties added by the `Full` token.
pub const FIGURE_FULL: &[&str] = &[
    "Position",
    "Units",
    "WindowStyle",
    "MenuBar",
    "ToolBar",
    "NumberTitle",
];

/// Axes properties captured by every profile.
pub const AXES_BASIC: &[&str] = &[
    "FontSize",
    "XGrid",
    "YGrid",
    "ZGrid",
    "XMinorGrid",
    "YMinorGrid",
    "ZMinorGrid",
    "XAxis.LineWidth",
    "YAxis.LineWidth",
    "ZAxis.LineWidth",
];

/// Line properties captured by the `Line` token.
pub const LINE_BASIC: &[&str] = &["LineWidth"];

/// Line properties added when `Line` is combined with `Full`.
pub const LINE_FULL: &[&str] = &["LineStyle", "Color", "Marker", "MarkerSize"];

/// Which optional property subsets a capture reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Profile {
    pub full: bool,
    pub line: bool,
}

impl Profile {
    pub const BASIC: Profile = Profile {
        full: false,
        line: false,
    };

    /// Parse a profile string. Unknown tokens are ignored.
    pub fn parse(profile_str: &str) -> Self {
        let mut profile = Profile::BASIC;
        for token in profile_str
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            profile.full |= token.contains("full");
            profile.line |= token.contains("line");
        }
        profile
    }

    /// Property paths captured for `group` under this profile.
    pub fn paths(&self, group: LayoutGroup) -> Vec<&'static str> {
        let mut paths = Vec::new();
        match group {
            LayoutGroup::Container => {
                paths.extend_from_slice(FIGURE_BASIC);
                if self.full {
                    paths.extend_from_slice(FIGURE_FULL);
                }
            }
            LayoutGroup::SubContainer => paths.extend_from_slice(AXES_BASIC),
            LayoutGroup::ChildElement => {
                if self.line {
                    paths.extend_from_slice(LINE_BASIC);
                    if self.full {
                        paths.extend_from_slice(LINE_FULL);
                    }
                }
            }
        }
        paths
    }
}

impl FromStr for Profile {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Profile::parse(s))
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Basic")?;
        if self.full {
            write!(f, ",Full")?;
        }
        if self.line {
            write!(f, ",Line")?;
        }
        Ok(())
    }
}

/// Read `paths` from `target` into a tree, skipping unreadable properties.
pub fn read_properties<T>(target: &T, paths: &[&str]) -> PropertyTree
where
    T: PropertyTarget + ?Sized,
{
    let mut tree = PropertyTree::new();
    for path in paths {
        match target.get_property(path) {
            Ok(value) => tree.insert(path, value),
            Err(err) => debug!(path = %path, error = %err, "property not captured"),
        }
    }
    tree
}

/// Build a layout from the current state of `target`.
///
/// The axes group is read from the first axes and the line group from the
/// first line of that axes. Fails if the target has no axes.
pub fn capture_layout(
    name: &str,
    target: &dyn ContainerTarget,
    profile: Profile,
) -> LayoutResult<Layout> {
    let sub_containers = target.sub_containers();
    let Some(axes) = sub_containers.first() else {
        return Err(LayoutError::NoSubContainer);
    };

    let mut layout = Layout::new(name)
        .with_group(
            LayoutGroup::Container,
            read_properties(target, &profile.paths(LayoutGroup::Container)),
        )
        .with_group(
            LayoutGroup::SubContainer,
            read_properties(*axes, &profile.paths(LayoutGroup::SubContainer)),
        );

    if profile.line {
        match axes.child_elements().first() {
            Some(line) => {
                layout = layout.with_group(
                    LayoutGroup::ChildElement,
                    read_properties(*line, &profile.paths(LayoutGroup::ChildElement)),
                );
            }
            None => debug!(layout = %name, "no line to capture line properties from"),
        }
    }

    Ok(layout)
}
