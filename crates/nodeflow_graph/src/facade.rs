// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read facade over the registry.
//!
//! Direct lookups (`node`, `port`, `edge`) fail on a missing id: callers are
//! expected to check existence first. Adjacency lookups return `None` for a
//! missing node or port, since bulk callers routinely probe ids that are
//! already gone.

use crate::edge::EdgeEntry;
use crate::error::{GraphError, Result};
use crate::ids::{EdgeId, ElementHandle, NodeId, PortId};
use crate::node::NodeEntry;
use crate::port::PortEntry;
use crate::shape::EdgeCategory;
use crate::store::GraphState;

/// Existence-checked, read-only view of the graph
#[derive(Debug, Clone, Copy)]
pub struct Graph<'a> {
    state: &'a GraphState,
}

impl<'a> Graph<'a> {
    pub(crate) fn new(state: &'a GraphState) -> Self {
        Self { state }
    }

    /// Get a node by ID
    pub fn node(&self, id: NodeId) -> Result<&'a NodeEntry> {
        self.state.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Get a port by ID
    pub fn port(&self, id: PortId) -> Result<&'a PortEntry> {
        self.state.ports.get(&id).ok_or(GraphError::PortNotFound(id))
    }

    /// Get an edge by ID
    pub fn edge(&self, id: EdgeId) -> Result<&'a EdgeEntry> {
        self.state.edges.get(&id).ok_or(GraphError::EdgeNotFound(id))
    }

    /// Check if a node exists
    pub fn has_node(&self, id: NodeId) -> bool {
        self.state.nodes.contains_key(&id)
    }

    /// Check if a port exists
    pub fn has_port(&self, id: PortId) -> bool {
        self.state.ports.contains_key(&id)
    }

    /// Check if an edge exists
    pub fn has_edge(&self, id: EdgeId) -> bool {
        self.state.edges.contains_key(&id)
    }

    /// All node IDs in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + 'a {
        self.state.nodes.keys().copied()
    }

    /// All port IDs in insertion order
    pub fn port_ids(&self) -> impl Iterator<Item = PortId> + 'a {
        self.state.ports.keys().copied()
    }

    /// All edge IDs in insertion order
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + 'a {
        self.state.edges.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.state.nodes.len()
    }

    /// Get the number of ports
    pub fn port_count(&self) -> usize {
        self.state.ports.len()
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.state.edges.len()
    }

    /// Node bound to a render target
    pub fn node_id_by_element(&self, element: ElementHandle) -> Option<NodeId> {
        self.state.element_nodes.get(&element).copied()
    }

    /// Ports bound to a render target
    pub fn port_ids_by_element(&self, element: ElementHandle) -> Vec<PortId> {
        self.state
            .element_ports
            .get(&element)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Ports owned by a node
    pub fn node_port_ids(&self, id: NodeId) -> Option<Vec<PortId>> {
        self.state
            .nodes
            .get(&id)
            .map(|node| node.ports.iter().copied().collect())
    }

    /// Owning node of a port
    pub fn port_node_id(&self, id: PortId) -> Option<NodeId> {
        self.state.port_owner(id)
    }

    /// Edges arriving at a port from a different port
    pub fn port_incoming_edge_ids(&self, id: PortId) -> Option<Vec<EdgeId>> {
        self.state
            .port_incoming_edge_ids(id)
            .map(|ids| ids.iter().copied().collect())
    }

    /// Edges leaving a port towards a different port
    pub fn port_outgoing_edge_ids(&self, id: PortId) -> Option<Vec<EdgeId>> {
        self.state
            .port_outgoing_edge_ids(id)
            .map(|ids| ids.iter().copied().collect())
    }

    /// Edges from a port to itself
    pub fn port_cycle_edge_ids(&self, id: PortId) -> Option<Vec<EdgeId>> {
        self.state
            .port_cycle_edge_ids(id)
            .map(|ids| ids.iter().copied().collect())
    }

    /// Every edge touching a port
    pub fn port_adjacent_edge_ids(&self, id: PortId) -> Option<Vec<EdgeId>> {
        self.state.port_adjacent_edge_ids(id)
    }

    /// Edges arriving at the node from other nodes
    pub fn node_incoming_edge_ids(&self, id: NodeId) -> Option<Vec<EdgeId>> {
        self.state.node_incoming_edge_ids(id)
    }

    /// Edges leaving the node towards other nodes
    pub fn node_outgoing_edge_ids(&self, id: NodeId) -> Option<Vec<EdgeId>> {
        self.state.node_outgoing_edge_ids(id)
    }

    /// Port cycles and node cycles of the node
    pub fn node_cycle_edge_ids(&self, id: NodeId) -> Option<Vec<EdgeId>> {
        self.state.node_cycle_edge_ids(id)
    }

    /// Every edge touching the node, each once
    pub fn node_adjacent_edge_ids(&self, id: NodeId) -> Option<Vec<EdgeId>> {
        self.state.node_adjacent_edge_ids(id)
    }

    /// Owning nodes of an edge's `(from, to)` ports
    pub fn edge_node_ids(&self, id: EdgeId) -> Option<(NodeId, NodeId)> {
        let edge = self.state.edges.get(&id)?;
        Some((
            self.state.port_owner(edge.from)?,
            self.state.port_owner(edge.to)?,
        ))
    }

    /// Classify an edge by its endpoints
    pub fn edge_category(&self, id: EdgeId) -> Result<EdgeCategory> {
        let edge = self.edge(id)?;
        if edge.is_port_cycle() {
            return Ok(EdgeCategory::PortCycle);
        }
        let from_node = self.port(edge.from)?.node;
        let to_node = self.port(edge.to)?.node;
        Ok(if from_node == to_node {
            EdgeCategory::NodeCycle
        } else {
            EdgeCategory::Line
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::edge::NewEdge;
    use crate::error::GraphError;
    use crate::ids::{EdgeId, ElementHandle, NodeId, PortId};
    use crate::node::NewNode;
    use crate::port::NewPort;
    use crate::shape::testing::noop_shape;
    use crate::shape::EdgeCategory;
    use crate::store::GraphStore;

    fn sample() -> (GraphStore, [PortId; 3], [EdgeId; 3]) {
        let mut store = GraphStore::new();
        let a = store.add_node(NewNode::new(ElementHandle(1))).unwrap();
        let b = store.add_node(NewNode::new(ElementHandle(2))).unwrap();
        let a1 = store.add_port(NewPort::new(a, ElementHandle(11))).unwrap();
        let a2 = store.add_port(NewPort::new(a, ElementHandle(12))).unwrap();
        let b1 = store.add_port(NewPort::new(b, ElementHandle(21))).unwrap();
        let line = store.add_edge(NewEdge::new(a1, b1, noop_shape())).unwrap();
        let node_cycle = store.add_edge(NewEdge::new(a1, a2, noop_shape())).unwrap();
        let port_cycle = store.add_edge(NewEdge::new(b1, b1, noop_shape())).unwrap();
        (store, [a1, a2, b1], [line, node_cycle, port_cycle])
    }

    #[test]
    fn test_direct_lookup_on_missing_id_fails() {
        let store = GraphStore::new();
        let graph = store.graph();
        assert_eq!(graph.node(NodeId(1)).unwrap_err(), GraphError::NodeNotFound(NodeId(1)));
        assert_eq!(graph.port(PortId(1)).unwrap_err(), GraphError::PortNotFound(PortId(1)));
        assert_eq!(graph.edge(EdgeId(1)).unwrap_err(), GraphError::EdgeNotFound(EdgeId(1)));
    }

    #[test]
    fn test_adjacency_on_missing_id_is_none() {
        let store = GraphStore::new();
        let graph = store.graph();
        assert_eq!(graph.node_incoming_edge_ids(NodeId(1)), None);
        assert_eq!(graph.node_adjacent_edge_ids(NodeId(1)), None);
        assert_eq!(graph.port_adjacent_edge_ids(PortId(1)), None);
        assert_eq!(graph.edge_node_ids(EdgeId(1)), None);
    }

    #[test]
    fn test_edge_category() {
        let (store, _, [line, node_cycle, port_cycle]) = sample();
        let graph = store.graph();
        assert_eq!(graph.edge_category(line), Ok(EdgeCategory::Line));
        assert_eq!(graph.edge_category(node_cycle), Ok(EdgeCategory::NodeCycle));
        assert_eq!(graph.edge_category(port_cycle), Ok(EdgeCategory::PortCycle));
    }

    #[test]
    fn test_port_adjacent_edges() {
        let (store, [a1, a2, b1], [line, node_cycle, port_cycle]) = sample();
        let graph = store.graph();
        assert_eq!(graph.port_adjacent_edge_ids(a1), Some(vec![line, node_cycle]));
        assert_eq!(graph.port_adjacent_edge_ids(a2), Some(vec![node_cycle]));
        assert_eq!(graph.port_adjacent_edge_ids(b1), Some(vec![line, port_cycle]));
    }

    #[test]
    fn test_edge_node_ids() {
        let (store, _, [line, _, _]) = sample();
        let graph = store.graph();
        assert_eq!(graph.edge_node_ids(line), Some((NodeId(0), NodeId(1))));
    }
}
