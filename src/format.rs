//! Output formatting utilities for markdown and JSON.

use crate::layout::{Layout, LayoutCollection, LayoutGroup};
use crate::tree::PropertyValue;
use serde_json::Value;

/// Output format for layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

/// Render a leaf value the way it appears in the stored document.
pub fn format_value(value: &PropertyValue) -> String {
    Value::from(value.clone()).to_string()
}

/// Format a single layout as markdown.
pub fn format_layout_markdown(layout: &Layout) -> String {
    let mut md = String::new();

    md.push_str(&format!("## Layout: {}\n", layout.name));

    for group in LayoutGroup::ALL {
        let Some(tree) = layout.group(group) else {
            continue;
        };
        md.push_str(&format!("\n### {}\n", group));
        if tree.is_empty() {
            md.push_str("_(empty)_\n");
            continue;
        }
        for (path, value) in tree.leaves() {
            md.push_str(&format!("- **{}**: `{}`\n", path, format_value(value)));
        }
    }

    md
}

/// Format a layout in the requested format.
pub fn format_layout(layout: &Layout, format: OutputFormat) -> String {
    match format {
        OutputFormat::Markdown => format_layout_markdown(layout),
        OutputFormat::Json => serde_json::to_string_pretty(layout).unwrap_or_default(),
    }
}

/// Format layout names as a markdown list, noting which groups each carries.
pub fn format_layout_list_markdown(collection: &LayoutCollection) -> String {
    if collection.is_empty() {
        return "No stored layouts.\n".to_string();
    }
    let mut md = String::new();
    for layout in collection {
        let groups: Vec<&str> = LayoutGroup::ALL
            .iter()
            .filter(|g| layout.group(**g).is_some())
            .map(|g| g.key())
            .collect();
        md.push_str(&format!("- {} ({})\n", layout.name, groups.join(", ")));
    }
    md
}
