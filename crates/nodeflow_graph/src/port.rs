// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions. A port is a connection point owned by exactly one node.

use crate::ids::{ElementHandle, NodeId, PortId};

/// A port stored in the registry
#[derive(Debug, Clone, PartialEq)]
pub struct PortEntry {
    /// Render target backing this port
    pub element: ElementHandle,
    /// Direction angle in radians, used by edge shapes
    pub direction: f64,
    /// Owning node
    pub node: NodeId,
}

/// Request to mark a port on a node
#[derive(Debug, Clone, PartialEq)]
pub struct NewPort {
    /// Explicit id; generated when `None`
    pub id: Option<PortId>,
    /// Owning node
    pub node: NodeId,
    /// Render target; may be shared with other ports
    pub element: ElementHandle,
    /// Direction angle in radians
    pub direction: f64,
}

impl NewPort {
    /// Create a request with direction zero (pointing along +x)
    pub fn new(node: NodeId, element: ElementHandle) -> Self {
        Self {
            id: None,
            node,
            element,
            direction: 0.0,
        }
    }

    /// Use an explicit id
    pub fn with_id(mut self, id: PortId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the direction angle
    pub fn with_direction(mut self, direction: f64) -> Self {
        self.direction = direction;
        self
    }
}

/// Partial update of a port
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortPatch {
    /// New direction angle
    pub direction: Option<f64>,
}

impl PortPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the direction angle
    pub fn direction(mut self, direction: f64) -> Self {
        self.direction = Some(direction);
        self
    }
}
