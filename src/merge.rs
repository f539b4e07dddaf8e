//! Property merge engine.
//!
//! Overlays a [`PropertyTree`] onto a live target, writing only the leaves
//! whose value differs from what the target already holds. Writing a plot
//! property can trigger a redraw on the target, so unchanged leaves are
//! never written.
//!
//! The overlay is best effort: a leaf that cannot be read is assumed to have
//! changed, and a leaf that cannot be written is skipped. Neither aborts the
//! rest of the merge.

use crate::target::PropertyTarget;
use crate::tree::{PropertyTree, PropertyValue, join_path};
use std::ops::AddAssign;
use tracing::debug;

/// Outcome for a single leaf of the source tree.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeEvent<'a> {
    /// The target held a different (or unreadable) value and was written.
    Written {
        path: &'a str,
        value: &'a PropertyValue,
    },
    /// The target already held an equal value.
    Unchanged { path: &'a str },
    /// The target rejected the write.
    Failed { path: &'a str, reason: String },
}

/// Counts of leaf outcomes for one or more merges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub written: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl MergeReport {
    /// Leaves visited.
    pub fn total(&self) -> usize {
        self.written + self.unchanged + self.failed
    }

    pub fn absorb(&mut self, other: MergeReport) {
        *self += other;
    }

    fn record(&mut self, event: &MergeEvent<'_>) {
        match event {
            MergeEvent::Written { .. } => self.written += 1,
            MergeEvent::Unchanged { .. } => self.unchanged += 1,
            MergeEvent::Failed { .. } => self.failed += 1,
        }
    }
}

impl AddAssign for MergeReport {
    fn add_assign(&mut self, other: MergeReport) {
        self.written += other.written;
        self.unchanged += other.unchanged;
        self.failed += other.failed;
    }
}

/// Apply every leaf of `source` onto `target`, skipping unchanged values.
pub fn apply_properties<T>(source: &PropertyTree, target: &mut T) -> MergeReport
where
    T: PropertyTarget + ?Sized,
{
    apply_properties_with(source, target, &mut |_| {})
}

/// Like [`apply_properties`], reporting each leaf outcome to `on_event`.
pub fn apply_properties_with<T>(
    source: &PropertyTree,
    target: &mut T,
    on_event: &mut dyn FnMut(&MergeEvent<'_>),
) -> MergeReport
where
    T: PropertyTarget + ?Sized,
{
    let mut report = MergeReport::default();
    walk(source, "", target, &mut |event| {
        report.record(event);
        on_event(event);
    });
    report
}

fn walk<T>(
    source: &PropertyTree,
    prefix: &str,
    target: &mut T,
    emit: &mut dyn FnMut(&MergeEvent<'_>),
) where
    T: PropertyTarget + ?Sized,
{
    for (key, value) in source.iter() {
        let path = join_path(prefix, key);
        if let PropertyValue::Group(child) = value {
            walk(child, &path, target, emit);
            continue;
        }

        // Unreadable paths are treated as changed.
        let unchanged = target
            .get_property(&path)
            .is_ok_and(|current| current.matches(value));
        if unchanged {
            emit(&MergeEvent::Unchanged { path: &path });
            continue;
        }

        match target.set_property(&path, value) {
            Ok(()) => {
                debug!(path = %path, "property written");
                emit(&MergeEvent::Written { path: &path, value });
            }
            Err(err) => {
                debug!(path = %path, error = %err, "property skipped");
                emit(&MergeEvent::Failed {
                    path: &path,
                    reason: err.to_string(),
                });
            }
        }
    }
}
