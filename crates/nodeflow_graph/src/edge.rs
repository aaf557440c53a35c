// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge definitions. An edge is a directed link between two ports.

use crate::ids::{EdgeId, PortId};
use crate::shape::EdgeShape;
use std::fmt;
use std::rc::Rc;

/// An edge stored in the registry
#[derive(Clone)]
pub struct EdgeEntry {
    /// Source port
    pub from: PortId,
    /// Target port
    pub to: PortId,
    /// Shape used to render the edge
    pub shape: Rc<dyn EdgeShape>,
    /// Stacking order
    pub priority: f64,
}

impl EdgeEntry {
    /// Whether source and target are the same port
    pub fn is_port_cycle(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Debug for EdgeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeEntry")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Request to add an edge
#[derive(Clone)]
pub struct NewEdge {
    /// Explicit id; generated when `None`
    pub id: Option<EdgeId>,
    /// Source port
    pub from: PortId,
    /// Target port
    pub to: PortId,
    /// Shape object
    pub shape: Rc<dyn EdgeShape>,
    /// Stacking order
    pub priority: f64,
}

impl NewEdge {
    /// Create a request with zero priority
    pub fn new(from: PortId, to: PortId, shape: Rc<dyn EdgeShape>) -> Self {
        Self {
            id: None,
            from,
            to,
            shape,
            priority: 0.0,
        }
    }

    /// Use an explicit id
    pub fn with_id(mut self, id: EdgeId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }
}

/// Partial update of an edge
#[derive(Clone, Default)]
pub struct EdgePatch {
    /// New source port
    pub from: Option<PortId>,
    /// New target port
    pub to: Option<PortId>,
    /// New shape
    pub shape: Option<Rc<dyn EdgeShape>>,
    /// New priority
    pub priority: Option<f64>,
}

impl EdgePatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconnect the source
    pub fn from(mut self, from: PortId) -> Self {
        self.from = Some(from);
        self
    }

    /// Reconnect the target
    pub fn to(mut self, to: PortId) -> Self {
        self.to = Some(to);
        self
    }

    /// Replace the shape
    pub fn shape(mut self, shape: Rc<dyn EdgeShape>) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Change the priority
    pub fn priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }
}

impl fmt::Debug for EdgePatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgePatch")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("shape", &self.shape.is_some())
            .field("priority", &self.priority)
            .finish()
    }
}
