//! Capability interface for live plot object graphs.
//!
//! The engine never introspects plot objects. Each concrete object kind
//! implements [`PropertyTarget`] to expose get/set by dotted property path,
//! and the two container levels expose their children.
//!
//! ```text
//! ContainerTarget (figure)
//!   └── SubContainerTarget (axes) *
//!         └── PropertyTarget (line) *
//! ```

pub mod memory;

use crate::error::LayoutResult;
use crate::tree::PropertyValue;

/// Property get/set by dotted path.
pub trait PropertyTarget {
    /// Current value at `path`, or an error if the path is not supported.
    fn get_property(&self, path: &str) -> LayoutResult<PropertyValue>;

    /// Write `value` at `path`. May trigger the target's own recompute.
    fn set_property(&mut self, path: &str, value: &PropertyValue) -> LayoutResult<()>;
}

/// A plotting region holding drawable child elements.
pub trait SubContainerTarget: PropertyTarget {
    fn child_elements(&self) -> Vec<&dyn PropertyTarget>;

    fn child_elements_mut(&mut self) -> Vec<&mut dyn PropertyTarget>;
}

/// The top-level surface holding plotting regions.
pub trait ContainerTarget: PropertyTarget {
    fn sub_containers(&self) -> Vec<&dyn SubContainerTarget>;

    fn sub_containers_mut(&mut self) -> Vec<&mut dyn SubContainerTarget>;

    fn has_sub_containers(&self) -> bool {
        !self.sub_containers().is_empty()
    }
}
