// SPDX-License-Identifier: MIT OR Apache-2.0
//! Virtual scroll: materialize only what is near the rendering box.
//!
//! [`VirtualScroll`] decorates another [`RenderingBoundary`]. It keeps the
//! set of attached nodes and edges and forwards a call only when it changes
//! what should be materialized. An edge is never attached before both of its
//! endpoint nodes, and a node is never detached while an attached edge still
//! needs it.

use crate::boundary::RenderingBoundary;
use crate::rendering_box::RenderingBox;
use indexmap::IndexSet;
use nodeflow_graph::{EdgeId, EventHandler, Graph, NodeId, Point};
use serde::{Deserialize, Serialize};

/// Margin added around the rendering box for the node position test
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeContainingRadius {
    /// Horizontal margin
    pub horizontal: f64,
    /// Vertical margin
    pub vertical: f64,
}

/// Configuration for virtual scroll
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualScrollConfig {
    /// How far outside the box a node position may lie and still count as
    /// inside; roughly half the largest node extent
    pub node_containing_radius: NodeContainingRadius,
}

/// Membership changes computed for one rendering box
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MembershipDelta {
    /// Nodes entering, including endpoints forced by entering edges
    pub nodes_to_attach: IndexSet<NodeId>,
    /// Nodes leaving
    pub nodes_to_detach: IndexSet<NodeId>,
    /// Edges entering
    pub edges_to_attach: IndexSet<EdgeId>,
    /// Edges leaving
    pub edges_to_detach: IndexSet<EdgeId>,
}

impl MembershipDelta {
    /// Whether nothing changes
    pub fn is_empty(&self) -> bool {
        self.nodes_to_attach.is_empty()
            && self.nodes_to_detach.is_empty()
            && self.edges_to_attach.is_empty()
            && self.edges_to_detach.is_empty()
    }
}

/// Windowing decorator over a rendering boundary
pub struct VirtualScroll<B> {
    inner: B,
    config: VirtualScrollConfig,
    rendering_box: Option<RenderingBox>,
    attached_nodes: IndexSet<NodeId>,
    attached_edges: IndexSet<EdgeId>,
    before_node_attached: EventHandler<NodeId>,
    after_node_detached: EventHandler<NodeId>,
}

impl<B: RenderingBoundary> VirtualScroll<B> {
    /// Wrap a boundary. Nothing is in box until the first rendering box.
    pub fn new(inner: B, config: VirtualScrollConfig) -> Self {
        Self {
            inner,
            config,
            rendering_box: None,
            attached_nodes: IndexSet::new(),
            attached_edges: IndexSet::new(),
            before_node_attached: EventHandler::new(),
            after_node_detached: EventHandler::new(),
        }
    }

    /// The wrapped boundary
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// The wrapped boundary, mutably
    pub fn inner_mut(&mut self) -> &mut B {
        &mut self.inner
    }

    /// Current rendering box
    pub fn rendering_box(&self) -> Option<RenderingBox> {
        self.rendering_box
    }

    /// Attached nodes in attach order
    pub fn attached_node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.attached_nodes.iter().copied()
    }

    /// Attached edges in attach order
    pub fn attached_edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.attached_edges.iter().copied()
    }

    /// Whether a node is attached
    pub fn is_node_attached(&self, node_id: NodeId) -> bool {
        self.attached_nodes.contains(&node_id)
    }

    /// Whether an edge is attached
    pub fn is_edge_attached(&self, edge_id: EdgeId) -> bool {
        self.attached_edges.contains(&edge_id)
    }

    /// Fired right before a node is attached
    pub fn on_before_node_attached(&mut self) -> &mut EventHandler<NodeId> {
        &mut self.before_node_attached
    }

    /// Fired right after a node is detached
    pub fn on_after_node_detached(&mut self) -> &mut EventHandler<NodeId> {
        &mut self.after_node_detached
    }

    fn effective_box(&self) -> Option<RenderingBox> {
        let radius = self.config.node_containing_radius;
        self.rendering_box
            .map(|rb| rb.expanded(radius.horizontal, radius.vertical))
    }

    fn node_position(graph: &Graph<'_>, node_id: NodeId) -> Option<Point> {
        graph.node(node_id).ok().and_then(|node| node.position())
    }

    /// Whether the node's position is inside the box
    pub fn is_node_in_box(&self, graph: &Graph<'_>, node_id: NodeId) -> bool {
        let Some(rb) = self.effective_box() else {
            return false;
        };
        Self::node_position(graph, node_id).is_some_and(|p| rb.contains_point(p))
    }

    /// Whether the bounds spanned by the edge's endpoint nodes overlap the box
    pub fn is_edge_in_box(&self, graph: &Graph<'_>, edge_id: EdgeId) -> bool {
        let Some(rb) = self.effective_box() else {
            return false;
        };
        let Some((from, to)) = graph.edge_node_ids(edge_id) else {
            return false;
        };
        match (Self::node_position(graph, from), Self::node_position(graph, to)) {
            (Some(a), Some(b)) => rb.intersects(&RenderingBox::spanning(a, b)),
            _ => false,
        }
    }

    /// Compute what a box change would attach and detach
    pub fn compute_delta(&self, graph: &Graph<'_>) -> MembershipDelta {
        let mut delta = MembershipDelta::default();

        for node_id in graph.node_ids() {
            let in_box = self.is_node_in_box(graph, node_id);
            let attached = self.attached_nodes.contains(&node_id);
            if in_box && !attached {
                delta.nodes_to_attach.insert(node_id);
            } else if !in_box && attached {
                delta.nodes_to_detach.insert(node_id);
            }
        }

        for edge_id in graph.edge_ids() {
            let in_box = self.is_edge_in_box(graph, edge_id);
            let attached = self.attached_edges.contains(&edge_id);
            if in_box {
                if !attached {
                    delta.edges_to_attach.insert(edge_id);
                }
                let Some((from, to)) = graph.edge_node_ids(edge_id) else {
                    continue;
                };
                for node_id in [from, to] {
                    delta.nodes_to_detach.shift_remove(&node_id);
                    if !self.attached_nodes.contains(&node_id) {
                        delta.nodes_to_attach.insert(node_id);
                    }
                }
            } else if attached {
                delta.edges_to_detach.insert(edge_id);
            }
        }

        delta
    }

    /// Make `rendering_box` authoritative and bring membership in line
    pub fn apply_rendering_box(&mut self, graph: &Graph<'_>, rendering_box: RenderingBox) {
        self.rendering_box = Some(rendering_box);
        let delta = self.compute_delta(graph);
        tracing::debug!(
            "Rendering box {:?}: +{} -{} nodes, +{} -{} edges",
            rendering_box,
            delta.nodes_to_attach.len(),
            delta.nodes_to_detach.len(),
            delta.edges_to_attach.len(),
            delta.edges_to_detach.len(),
        );

        for edge_id in delta.edges_to_detach {
            self.detach_edge_now(graph, edge_id);
        }
        for node_id in delta.nodes_to_detach {
            self.detach_node_now(graph, node_id);
        }
        for node_id in delta.nodes_to_attach {
            self.attach_node_now(graph, node_id);
        }
        for edge_id in delta.edges_to_attach {
            self.attach_edge_now(graph, edge_id);
        }
    }

    fn attach_node_now(&mut self, graph: &Graph<'_>, node_id: NodeId) {
        if self.attached_nodes.contains(&node_id) {
            return;
        }
        self.before_node_attached.emit(&node_id);
        self.inner.attach_node(graph, node_id);
        self.attached_nodes.insert(node_id);
    }

    fn detach_node_now(&mut self, graph: &Graph<'_>, node_id: NodeId) {
        if !self.attached_nodes.shift_remove(&node_id) {
            return;
        }
        self.inner.detach_node(graph, node_id);
        self.after_node_detached.emit(&node_id);
    }

    fn attach_edge_now(&mut self, graph: &Graph<'_>, edge_id: EdgeId) {
        if self.attached_edges.contains(&edge_id) {
            return;
        }
        let Some((from, to)) = graph.edge_node_ids(edge_id) else {
            return;
        };
        self.attach_node_now(graph, from);
        self.attach_node_now(graph, to);
        self.inner.attach_edge(graph, edge_id);
        self.attached_edges.insert(edge_id);
    }

    fn detach_edge_now(&mut self, graph: &Graph<'_>, edge_id: EdgeId) {
        if !self.attached_edges.shift_remove(&edge_id) {
            return;
        }
        self.inner.detach_edge(graph, edge_id);
    }

    /// Detach a node that was only kept for edges, once none remain
    fn release_node(&mut self, graph: &Graph<'_>, node_id: NodeId) {
        if !self.attached_nodes.contains(&node_id) || self.is_node_in_box(graph, node_id) {
            return;
        }
        let still_needed = graph
            .node_adjacent_edge_ids(node_id)
            .unwrap_or_default()
            .iter()
            .any(|edge_id| self.attached_edges.contains(edge_id));
        if !still_needed {
            self.detach_node_now(graph, node_id);
        }
    }
}

impl<B: RenderingBoundary> RenderingBoundary for VirtualScroll<B> {
    fn attach_node(&mut self, graph: &Graph<'_>, node_id: NodeId) {
        if self.is_node_in_box(graph, node_id) {
            self.attach_node_now(graph, node_id);
        }
    }

    fn detach_node(&mut self, graph: &Graph<'_>, node_id: NodeId) {
        for edge_id in graph.node_adjacent_edge_ids(node_id).unwrap_or_default() {
            self.detach_edge_now(graph, edge_id);
        }
        self.detach_node_now(graph, node_id);
    }

    fn attach_edge(&mut self, graph: &Graph<'_>, edge_id: EdgeId) {
        if self.is_edge_in_box(graph, edge_id) {
            self.attach_edge_now(graph, edge_id);
        }
    }

    fn detach_edge(&mut self, graph: &Graph<'_>, edge_id: EdgeId) {
        if !self.attached_edges.contains(&edge_id) {
            return;
        }
        self.detach_edge_now(graph, edge_id);
        if let Some((from, to)) = graph.edge_node_ids(edge_id) {
            self.release_node(graph, from);
            self.release_node(graph, to);
        }
    }

    fn update_node_position(&mut self, graph: &Graph<'_>, node_id: NodeId) {
        if self.attached_nodes.contains(&node_id) {
            self.inner.update_node_position(graph, node_id);
        } else if self.is_node_in_box(graph, node_id) {
            self.attach_node_now(graph, node_id);
        }

        for edge_id in graph.node_adjacent_edge_ids(node_id).unwrap_or_default() {
            if !self.attached_edges.contains(&edge_id) && self.is_edge_in_box(graph, edge_id) {
                self.attach_edge_now(graph, edge_id);
            }
        }
    }

    fn update_node_priority(&mut self, graph: &Graph<'_>, node_id: NodeId) {
        if self.attached_nodes.contains(&node_id) {
            self.inner.update_node_priority(graph, node_id);
        }
    }

    fn update_edge_shape(&mut self, graph: &Graph<'_>, edge_id: EdgeId) {
        if self.attached_edges.contains(&edge_id) {
            self.inner.update_edge_shape(graph, edge_id);
        }
    }

    fn render_edge(&mut self, graph: &Graph<'_>, edge_id: EdgeId) {
        if self.attached_edges.contains(&edge_id) {
            // Endpoints may have been reconnected to nodes outside the box.
            if let Some((from, to)) = graph.edge_node_ids(edge_id) {
                self.attach_node_now(graph, from);
                self.attach_node_now(graph, to);
            }
            self.inner.render_edge(graph, edge_id);
        } else if self.is_edge_in_box(graph, edge_id) {
            self.attach_edge_now(graph, edge_id);
        }
    }

    fn update_edge_priority(&mut self, graph: &Graph<'_>, edge_id: EdgeId) {
        if self.attached_edges.contains(&edge_id) {
            self.inner.update_edge_priority(graph, edge_id);
        }
    }

    fn clear(&mut self) {
        self.inner.clear();
        self.attached_edges.clear();
        for node_id in std::mem::take(&mut self.attached_nodes) {
            self.after_node_detached.emit(&node_id);
        }
    }

    fn destroy(&mut self) {
        self.inner.destroy();
    }
}
