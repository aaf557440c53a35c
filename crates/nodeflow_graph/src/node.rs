// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph registry.

use crate::geometry::Point;
use crate::ids::{ElementHandle, NodeId, PortId};
use indexmap::IndexSet;
use std::fmt;
use std::rc::Rc;

/// Maps a node's rendered `(width, height)` to the offset of its anchor.
///
/// The node's position is where the anchor lands in content space.
pub type CenterFn = Rc<dyn Fn(f64, f64) -> Point>;

/// Anchor at the centre of the rendered element
pub fn standard_center_fn() -> CenterFn {
    Rc::new(|width, height| Point::new(width / 2.0, height / 2.0))
}

/// A node stored in the registry
#[derive(Clone)]
pub struct NodeEntry {
    /// Render target backing this node
    pub element: ElementHandle,
    /// Horizontal position, `None` until laid out
    pub x: Option<f64>,
    /// Vertical position, `None` until laid out
    pub y: Option<f64>,
    /// Anchor function
    pub center_fn: CenterFn,
    /// Stacking order
    pub priority: f64,
    /// Ports owned by this node
    pub ports: IndexSet<PortId>,
}

impl NodeEntry {
    /// Position if both coordinates are set
    pub fn position(&self) -> Option<Point> {
        Some(Point::new(self.x?, self.y?))
    }
}

impl fmt::Debug for NodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeEntry")
            .field("element", &self.element)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("priority", &self.priority)
            .field("ports", &self.ports)
            .finish_non_exhaustive()
    }
}

/// Request to add a node
#[derive(Clone)]
pub struct NewNode {
    /// Explicit id; generated when `None`
    pub id: Option<NodeId>,
    /// Render target
    pub element: ElementHandle,
    /// Horizontal position
    pub x: Option<f64>,
    /// Vertical position
    pub y: Option<f64>,
    /// Anchor function
    pub center_fn: CenterFn,
    /// Stacking order
    pub priority: f64,
}

impl NewNode {
    /// Create a request with an unset position, centred anchor and zero priority
    pub fn new(element: ElementHandle) -> Self {
        Self {
            id: None,
            element,
            x: None,
            y: None,
            center_fn: standard_center_fn(),
            priority: 0.0,
        }
    }

    /// Use an explicit id
    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the position
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Set the anchor function
    pub fn with_center_fn(mut self, center_fn: CenterFn) -> Self {
        self.center_fn = center_fn;
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }
}

/// Partial update of a node; `None` fields keep their value.
///
/// Coordinates are doubly optional: `Some(None)` unsets a coordinate.
#[derive(Clone, Default)]
pub struct NodePatch {
    /// New horizontal position
    pub x: Option<Option<f64>>,
    /// New vertical position
    pub y: Option<Option<f64>>,
    /// New anchor function
    pub center_fn: Option<CenterFn>,
    /// New priority
    pub priority: Option<f64>,
}

impl NodePatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to a position
    pub fn position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(Some(x));
        self.y = Some(Some(y));
        self
    }

    /// Set only the horizontal position
    pub fn x(mut self, x: f64) -> Self {
        self.x = Some(Some(x));
        self
    }

    /// Set only the vertical position
    pub fn y(mut self, y: f64) -> Self {
        self.y = Some(Some(y));
        self
    }

    /// Mark the position as pending layout
    pub fn unset_position(mut self) -> Self {
        self.x = Some(None);
        self.y = Some(None);
        self
    }

    /// Replace the anchor function
    pub fn center_fn(mut self, center_fn: CenterFn) -> Self {
        self.center_fn = Some(center_fn);
        self
    }

    /// Change the priority
    pub fn priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_center_fn() {
        let center = standard_center_fn();
        assert_eq!(center(100.0, 40.0), Point::new(50.0, 20.0));
    }

    #[test]
    fn test_position_requires_both_coordinates() {
        let mut entry = NodeEntry {
            element: ElementHandle(1),
            x: Some(1.0),
            y: None,
            center_fn: standard_center_fn(),
            priority: 0.0,
            ports: IndexSet::new(),
        };
        assert_eq!(entry.position(), None);

        entry.y = Some(2.0);
        assert_eq!(entry.position(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_patch_builders() {
        let patch = NodePatch::new().x(3.0).priority(2.0);
        assert_eq!(patch.x, Some(Some(3.0)));
        assert_eq!(patch.y, None);
        assert_eq!(patch.priority, Some(2.0));

        let patch = NodePatch::new().unset_position();
        assert_eq!(patch.x, Some(None));
        assert_eq!(patch.y, Some(None));
    }
}
