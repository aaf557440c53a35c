// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rendering boundary contract.
//!
//! The core never renders anything itself. It drives a boundary with
//! attach/detach/update calls and guarantees their ordering; what a call does
//! (create a DOM node, upload a sprite, nothing at all) is up to the
//! implementation.

use nodeflow_graph::{EdgeId, Graph, NodeId};

/// Receiver of materialization calls
pub trait RenderingBoundary {
    /// Materialize a node
    fn attach_node(&mut self, graph: &Graph<'_>, node_id: NodeId);

    /// Dematerialize a node
    fn detach_node(&mut self, graph: &Graph<'_>, node_id: NodeId);

    /// Materialize an edge; both endpoint nodes are already attached
    fn attach_edge(&mut self, graph: &Graph<'_>, edge_id: EdgeId);

    /// Dematerialize an edge
    fn detach_edge(&mut self, graph: &Graph<'_>, edge_id: EdgeId);

    /// A node moved or changed anchor
    fn update_node_position(&mut self, graph: &Graph<'_>, node_id: NodeId);

    /// A node's stacking order changed
    fn update_node_priority(&mut self, graph: &Graph<'_>, node_id: NodeId);

    /// An edge's shape object was replaced
    fn update_edge_shape(&mut self, graph: &Graph<'_>, edge_id: EdgeId);

    /// An edge needs its path recomputed
    fn render_edge(&mut self, graph: &Graph<'_>, edge_id: EdgeId);

    /// An edge's stacking order changed
    fn update_edge_priority(&mut self, graph: &Graph<'_>, edge_id: EdgeId);

    /// Drop everything materialized
    fn clear(&mut self);

    /// Release the boundary
    fn destroy(&mut self);
}

/// One recorded boundary call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryCall {
    /// `attach_node`
    AttachNode(NodeId),
    /// `detach_node`
    DetachNode(NodeId),
    /// `attach_edge`
    AttachEdge(EdgeId),
    /// `detach_edge`
    DetachEdge(EdgeId),
    /// `update_node_position`
    UpdateNodePosition(NodeId),
    /// `update_node_priority`
    UpdateNodePriority(NodeId),
    /// `update_edge_shape`
    UpdateEdgeShape(EdgeId),
    /// `render_edge`
    RenderEdge(EdgeId),
    /// `update_edge_priority`
    UpdateEdgePriority(EdgeId),
    /// `clear`
    Clear,
    /// `destroy`
    Destroy,
}

/// Boundary that records every call in order
#[derive(Debug, Clone, Default)]
pub struct RecordingBoundary {
    calls: Vec<BoundaryCall>,
}

impl RecordingBoundary {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far
    pub fn calls(&self) -> &[BoundaryCall] {
        &self.calls
    }

    /// Drain the recorded calls
    pub fn take_calls(&mut self) -> Vec<BoundaryCall> {
        std::mem::take(&mut self.calls)
    }

    /// How many times a call was received
    pub fn count(&self, call: BoundaryCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    /// Position of the first occurrence of a call
    pub fn position(&self, call: BoundaryCall) -> Option<usize> {
        self.calls.iter().position(|c| *c == call)
    }
}

impl RenderingBoundary for RecordingBoundary {
    fn attach_node(&mut self, _graph: &Graph<'_>, node_id: NodeId) {
        self.calls.push(BoundaryCall::AttachNode(node_id));
    }

    fn detach_node(&mut self, _graph: &Graph<'_>, node_id: NodeId) {
        self.calls.push(BoundaryCall::DetachNode(node_id));
    }

    fn attach_edge(&mut self, _graph: &Graph<'_>, edge_id: EdgeId) {
        self.calls.push(BoundaryCall::AttachEdge(edge_id));
    }

    fn detach_edge(&mut self, _graph: &Graph<'_>, edge_id: EdgeId) {
        self.calls.push(BoundaryCall::DetachEdge(edge_id));
    }

    fn update_node_position(&mut self, _graph: &Graph<'_>, node_id: NodeId) {
        self.calls.push(BoundaryCall::UpdateNodePosition(node_id));
    }

    fn update_node_priority(&mut self, _graph: &Graph<'_>, node_id: NodeId) {
        self.calls.push(BoundaryCall::UpdateNodePriority(node_id));
    }

    fn update_edge_shape(&mut self, _graph: &Graph<'_>, edge_id: EdgeId) {
        self.calls.push(BoundaryCall::UpdateEdgeShape(edge_id));
    }

    fn render_edge(&mut self, _graph: &Graph<'_>, edge_id: EdgeId) {
        self.calls.push(BoundaryCall::RenderEdge(edge_id));
    }

    fn update_edge_priority(&mut self, _graph: &Graph<'_>, edge_id: EdgeId) {
        self.calls.push(BoundaryCall::UpdateEdgePriority(edge_id));
    }

    fn clear(&mut self) {
        self.calls.push(BoundaryCall::Clear);
    }

    fn destroy(&mut self) {
        self.calls.push(BoundaryCall::Destroy);
    }
}
