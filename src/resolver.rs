//! Resolving a requested layout name against the stored collection.

use crate::layout::{Layout, LayoutCollection, LayoutGroup};
use crate::tree::{PropertyTree, PropertyValue};
use std::fmt;
use tracing::warn;

/// Name of the built-in layout.
pub const DEFAULT_LAYOUT_NAME: &str = "Default";

const DEFAULT_FONT_SIZE: f64 = 12.0;
const DEFAULT_AXIS_LINE_WIDTH: f64 = 1.5;
const DEFAULT_LINE_WIDTH: f64 = 2.0;

/// The built-in layout used when no stored layout is requested or found.
///
/// White figure background, fixed font size, fixed axis line widths, grid
/// and minor grid on all three axes, fixed line width for plotted lines.
pub fn default_layout() -> Layout {
    let figure = PropertyTree::from_iter([("Color", PropertyValue::from([1.0, 1.0, 1.0]))]);

    let mut axis = PropertyTree::new();
    axis.insert("FontSize", DEFAULT_FONT_SIZE);
    for dim in ["X", "Y", "Z"] {
        axis.insert(&format!("{}Axis.LineWidth", dim), DEFAULT_AXIS_LINE_WIDTH);
        axis.insert(&format!("{}Grid", dim), "on");
        axis.insert(&format!("{}MinorGrid", dim), "on");
    }

    let line = PropertyTree::from_iter([("LineWidth", PropertyValue::from(DEFAULT_LINE_WIDTH))]);

    Layout::new(DEFAULT_LAYOUT_NAME)
        .with_group(LayoutGroup::Container, figure)
        .with_group(LayoutGroup::SubContainer, axis)
        .with_group(LayoutGroup::ChildElement, line)
}

/// Where a resolved layout came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Found in the stored collection.
    Stored,
    /// No name was requested.
    Default,
    /// A name was requested but not found; carries the requested name.
    Fallback(String),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Stored => write!(f, "stored"),
            Origin::Default => write!(f, "default"),
            Origin::Fallback(name) => write!(f, "default (no layout named '{}')", name),
        }
    }
}

/// A layout chosen for an apply operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub layout: Layout,
    pub origin: Origin,
}

impl Resolution {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, Origin::Fallback(_))
    }
}

/// Resolve `name` against `collection`.
///
/// An absent or blank name yields the built-in default silently. Any other
/// name is compared as given, ignoring case only; with no match the default
/// is returned and a warning is logged. The
/// returned layout is a copy; the collection is never modified.
pub fn resolve(name: Option<&str>, collection: &LayoutCollection) -> Resolution {
    let Some(name) = name.filter(|n| !n.trim().is_empty()) else {
        return Resolution {
            layout: default_layout(),
            origin: Origin::Default,
        };
    };

    match collection.find(name) {
        Some(layout) => Resolution {
            layout: layout.clone(),
            origin: Origin::Stored,
        },
        None => {
            warn!(layout = %name, "layout not found, using default layout");
            Resolution {
                layout: default_layout(),
                origin: Origin::Fallback(name.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` under a WARN-level subscriber and return what it logged.
    fn logs_of<R>(f: impl FnOnce() -> R) -> (R, String) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        (result, output)
    }

    fn demo_collection() -> LayoutCollection {
        LayoutCollection::from(vec![
            Layout::new("Other"),
            Layout::new("Demo").with_group(
                LayoutGroup::SubContainer,
                PropertyTree::from_iter([("FontSize", PropertyValue::from(20.0))]),
            ),
        ])
    }

    #[test]
    fn test_default_layout_contents() {
        let layout = default_layout();
        let figure = layout.figure.as_ref().unwrap();
        assert_eq!(
            figure.get("Color"),
            Some(&PropertyValue::Vector(vec![1.0, 1.0, 1.0]))
        );

        let axis = layout.axis.as_ref().unwrap();
        for dim in ["X", "Y", "Z"] {
            assert_eq!(
                axis.get(&format!("{}Grid", dim)),
                Some(&PropertyValue::Text("on".into()))
            );
            assert_eq!(
                axis.get(&format!("{}MinorGrid", dim)),
                Some(&PropertyValue::Text("on".into()))
            );
            assert!(axis.get(&format!("{}Axis.LineWidth", dim)).is_some());
        }
        assert!(layout.line.as_ref().unwrap().get("LineWidth").is_some());
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let collection = demo_collection();
        for query in ["demo", "DEMO", "Demo"] {
            let resolution = resolve(Some(query), &collection);
            assert_eq!(resolution.origin, Origin::Stored);
            assert_eq!(resolution.layout.name, "Demo");
        }
    }

    #[test]
    fn test_resolve_missing_falls_back() {
        let resolution = resolve(Some("NoSuchName"), &demo_collection());
        assert_eq!(resolution.layout, default_layout());
        assert_eq!(resolution.origin, Origin::Fallback("NoSuchName".into()));
        assert!(resolution.is_fallback());
    }

    #[test]
    fn test_resolve_absent_or_blank_is_default() {
        for name in [None, Some(""), Some("   ")] {
            let resolution = resolve(name, &demo_collection());
            assert_eq!(resolution.origin, Origin::Default);
            assert_eq!(resolution.layout, default_layout());
        }
    }

    #[test]
    fn test_fallback_logs_warning_but_default_is_silent() {
        let collection = demo_collection();

        let (resolution, output) = logs_of(|| resolve(Some("NoSuchName"), &collection));
        assert!(resolution.is_fallback());
        assert!(output.contains("WARN"));
        assert!(output.contains("layout not found"));
        assert!(output.contains("NoSuchName"));

        let (resolution, output) = logs_of(|| resolve(None, &collection));
        assert_eq!(resolution.origin, Origin::Default);
        assert!(output.is_empty());
    }

    #[test]
    fn test_resolve_compares_untrimmed_names() {
        let collection = LayoutCollection::from(vec![Layout::new(" x"), Layout::new("Demo")]);

        let padded = resolve(Some(" X"), &collection);
        assert_eq!(padded.origin, Origin::Stored);
        assert_eq!(padded.layout.name, " x");

        assert!(resolve(Some("x"), &collection).is_fallback());
        assert_eq!(
            resolve(Some(" demo "), &collection).origin,
            Origin::Fallback(" demo ".into())
        );
    }

    #[test]
    fn test_resolve_empty_collection() {
        let resolution = resolve(Some("Anything"), &LayoutCollection::new());
        assert!(resolution.is_fallback());
    }
}
