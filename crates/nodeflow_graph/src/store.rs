// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph registry: nodes, ports, edges and their adjacency indices.
//!
//! Each port keeps three edge sets. An edge whose `from` and `to` are the
//! same port lives only in that port's cycle set; any other edge lives in the
//! outgoing set of `from` and the incoming set of `to`. Node-level
//! classification is derived from the owners of those ports on demand.

use crate::edge::{EdgeEntry, EdgePatch, NewEdge};
use crate::error::{GraphError, Result};
use crate::event::GraphEvents;
use crate::facade::Graph;
use crate::ids::{EdgeId, ElementHandle, IdGenerator, NodeId, PortId};
use crate::lookup::MultiMap;
use crate::node::{NewNode, NodeEntry, NodePatch};
use crate::port::{NewPort, PortEntry, PortPatch};
use indexmap::{IndexMap, IndexSet};

/// Registry contents, readable through [`Graph`]
#[derive(Debug, Default)]
pub struct GraphState {
    pub(crate) nodes: IndexMap<NodeId, NodeEntry>,
    pub(crate) ports: IndexMap<PortId, PortEntry>,
    pub(crate) edges: IndexMap<EdgeId, EdgeEntry>,
    pub(crate) element_nodes: IndexMap<ElementHandle, NodeId>,
    pub(crate) element_ports: MultiMap<ElementHandle, PortId>,
    pub(crate) port_incoming: IndexMap<PortId, IndexSet<EdgeId>>,
    pub(crate) port_outgoing: IndexMap<PortId, IndexSet<EdgeId>>,
    pub(crate) port_cycle: IndexMap<PortId, IndexSet<EdgeId>>,
}

impl GraphState {
    /// Owning node of a port
    pub(crate) fn port_owner(&self, port_id: PortId) -> Option<NodeId> {
        self.ports.get(&port_id).map(|port| port.node)
    }

    fn index_edge(&mut self, edge_id: EdgeId, from: PortId, to: PortId) {
        if from == to {
            self.port_cycle.entry(from).or_default().insert(edge_id);
        } else {
            self.port_outgoing.entry(from).or_default().insert(edge_id);
            self.port_incoming.entry(to).or_default().insert(edge_id);
        }
    }

    fn unindex_edge(&mut self, edge_id: EdgeId, from: PortId, to: PortId) {
        if from == to {
            if let Some(set) = self.port_cycle.get_mut(&from) {
                set.shift_remove(&edge_id);
            }
        } else {
            if let Some(set) = self.port_outgoing.get_mut(&from) {
                set.shift_remove(&edge_id);
            }
            if let Some(set) = self.port_incoming.get_mut(&to) {
                set.shift_remove(&edge_id);
            }
        }
    }

    /// Edges arriving at the port from another port
    pub(crate) fn port_incoming_edge_ids(&self, port_id: PortId) -> Option<&IndexSet<EdgeId>> {
        self.port_incoming.get(&port_id)
    }

    /// Edges leaving the port towards another port
    pub(crate) fn port_outgoing_edge_ids(&self, port_id: PortId) -> Option<&IndexSet<EdgeId>> {
        self.port_outgoing.get(&port_id)
    }

    /// Edges from the port to itself
    pub(crate) fn port_cycle_edge_ids(&self, port_id: PortId) -> Option<&IndexSet<EdgeId>> {
        self.port_cycle.get(&port_id)
    }

    pub(crate) fn port_adjacent_edge_ids(&self, port_id: PortId) -> Option<Vec<EdgeId>> {
        if !self.ports.contains_key(&port_id) {
            return None;
        }
        let sets = [
            self.port_incoming.get(&port_id),
            self.port_outgoing.get(&port_id),
            self.port_cycle.get(&port_id),
        ];
        Some(sets.into_iter().flatten().flatten().copied().collect())
    }

    pub(crate) fn node_incoming_edge_ids(&self, node_id: NodeId) -> Option<Vec<EdgeId>> {
        let node = self.nodes.get(&node_id)?;
        let mut result = Vec::new();
        for port_id in &node.ports {
            for edge_id in self.port_incoming.get(port_id).into_iter().flatten() {
                let from = self.edges.get(edge_id).map(|edge| edge.from);
                if from.and_then(|from| self.port_owner(from)) != Some(node_id) {
                    result.push(*edge_id);
                }
            }
        }
        Some(result)
    }

    pub(crate) fn node_outgoing_edge_ids(&self, node_id: NodeId) -> Option<Vec<EdgeId>> {
        let node = self.nodes.get(&node_id)?;
        let mut result = Vec::new();
        for port_id in &node.ports {
            for edge_id in self.port_outgoing.get(port_id).into_iter().flatten() {
                let to = self.edges.get(edge_id).map(|edge| edge.to);
                if to.and_then(|to| self.port_owner(to)) != Some(node_id) {
                    result.push(*edge_id);
                }
            }
        }
        Some(result)
    }

    pub(crate) fn node_cycle_edge_ids(&self, node_id: NodeId) -> Option<Vec<EdgeId>> {
        let node = self.nodes.get(&node_id)?;
        let mut result = Vec::new();
        for port_id in &node.ports {
            result.extend(self.port_cycle.get(port_id).into_iter().flatten().copied());
            // Node cycles are visited once, from their source port.
            for edge_id in self.port_outgoing.get(port_id).into_iter().flatten() {
                let to = self.edges.get(edge_id).map(|edge| edge.to);
                if to.and_then(|to| self.port_owner(to)) == Some(node_id) {
                    result.push(*edge_id);
                }
            }
        }
        Some(result)
    }

    pub(crate) fn node_adjacent_edge_ids(&self, node_id: NodeId) -> Option<Vec<EdgeId>> {
        let node = self.nodes.get(&node_id)?;
        let mut result = IndexSet::new();
        for port_id in &node.ports {
            let sets = [
                self.port_incoming.get(port_id),
                self.port_outgoing.get(port_id),
                self.port_cycle.get(port_id),
            ];
            result.extend(sets.into_iter().flatten().flatten().copied());
        }
        Some(result.into_iter().collect())
    }

    fn has_adjacent_edges(&self, port_id: PortId) -> bool {
        [
            self.port_incoming.get(&port_id),
            self.port_outgoing.get(&port_id),
            self.port_cycle.get(&port_id),
        ]
        .into_iter()
        .flatten()
        .any(|set| !set.is_empty())
    }
}

/// Single source of truth for the diagram's data model
#[derive(Default)]
pub struct GraphStore {
    state: GraphState,
    events: GraphEvents,
    node_ids: IdGenerator<NodeId>,
    port_ids: IdGenerator<PortId>,
    edge_ids: IdGenerator<EdgeId>,
}

impl GraphStore {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Read facade over the current state
    pub fn graph(&self) -> Graph<'_> {
        Graph::new(&self.state)
    }

    /// Lifecycle channels
    pub fn events(&self) -> &GraphEvents {
        &self.events
    }

    /// Lifecycle channels, for subscribing
    pub fn events_mut(&mut self) -> &mut GraphEvents {
        &mut self.events
    }

    /// Add a node
    pub fn add_node(&mut self, request: NewNode) -> Result<NodeId> {
        if let Some(id) = request.id {
            if self.state.nodes.contains_key(&id) {
                return Err(GraphError::NodeIdInUse(id));
            }
        }
        if let Some(&node) = self.state.element_nodes.get(&request.element) {
            return Err(GraphError::ElementInUse {
                element: request.element,
                node,
            });
        }

        let nodes = &self.state.nodes;
        let id = request
            .id
            .unwrap_or_else(|| self.node_ids.create(|candidate| nodes.contains_key(&candidate)));

        self.state.nodes.insert(
            id,
            NodeEntry {
                element: request.element,
                x: request.x,
                y: request.y,
                center_fn: request.center_fn,
                priority: request.priority,
                ports: IndexSet::new(),
            },
        );
        self.state.element_nodes.insert(request.element, id);
        tracing::trace!("Node added: {:?}", id);

        self.events
            .after_node_added
            .emit(&Graph::new(&self.state), &id);
        Ok(id)
    }

    /// Apply a partial update to a node
    pub fn update_node(&mut self, id: NodeId, patch: NodePatch) -> Result<()> {
        let node = self
            .state
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound(id))?;

        if let Some(x) = patch.x {
            node.x = x;
        }
        if let Some(y) = patch.y {
            node.y = y;
        }
        if let Some(center_fn) = patch.center_fn {
            node.center_fn = center_fn;
        }
        let priority_changed = patch.priority.is_some_and(|p| p != node.priority);
        if let Some(priority) = patch.priority {
            node.priority = priority;
        }
        tracing::trace!("Node updated: {:?}", id);

        let graph = Graph::new(&self.state);
        self.events.after_node_updated.emit(&graph, &id);
        if priority_changed {
            self.events.after_node_priority_updated.emit(&graph, &id);
        }
        Ok(())
    }

    /// Remove a node that no longer owns ports
    pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
        let node = self
            .state
            .nodes
            .get(&id)
            .ok_or(GraphError::NodeNotFound(id))?;
        if !node.ports.is_empty() {
            return Err(GraphError::NodeHasPorts(id));
        }

        self.events
            .before_node_removed
            .emit(&Graph::new(&self.state), &id);

        if let Some(node) = self.state.nodes.shift_remove(&id) {
            self.state.element_nodes.shift_remove(&node.element);
        }
        tracing::trace!("Node removed: {:?}", id);
        Ok(())
    }

    /// Mark a port on an existing node
    pub fn add_port(&mut self, request: NewPort) -> Result<PortId> {
        if !self.state.nodes.contains_key(&request.node) {
            return Err(GraphError::NodeNotFound(request.node));
        }
        if let Some(id) = request.id {
            if self.state.ports.contains_key(&id) {
                return Err(GraphError::PortIdInUse(id));
            }
        }

        let ports = &self.state.ports;
        let id = request
            .id
            .unwrap_or_else(|| self.port_ids.create(|candidate| ports.contains_key(&candidate)));

        self.state.ports.insert(
            id,
            PortEntry {
                element: request.element,
                direction: request.direction,
                node: request.node,
            },
        );
        if let Some(node) = self.state.nodes.get_mut(&request.node) {
            node.ports.insert(id);
        }
        self.state.element_ports.add(request.element, id);
        self.state.port_incoming.insert(id, IndexSet::new());
        self.state.port_outgoing.insert(id, IndexSet::new());
        self.state.port_cycle.insert(id, IndexSet::new());
        tracing::trace!("Port added: {:?} on {:?}", id, request.node);

        self.events
            .after_port_added
            .emit(&Graph::new(&self.state), &id);
        Ok(id)
    }

    /// Apply a partial update to a port
    pub fn update_port(&mut self, id: PortId, patch: PortPatch) -> Result<()> {
        let port = self
            .state
            .ports
            .get_mut(&id)
            .ok_or(GraphError::PortNotFound(id))?;
        if let Some(direction) = patch.direction {
            port.direction = direction;
        }
        tracing::trace!("Port updated: {:?}", id);

        self.events
            .after_port_updated
            .emit(&Graph::new(&self.state), &id);
        Ok(())
    }

    /// Unmark a port that no longer has adjacent edges
    pub fn remove_port(&mut self, id: PortId) -> Result<()> {
        if !self.state.ports.contains_key(&id) {
            return Err(GraphError::PortNotFound(id));
        }
        if self.state.has_adjacent_edges(id) {
            return Err(GraphError::PortHasEdges(id));
        }

        self.events
            .before_port_removed
            .emit(&Graph::new(&self.state), &id);

        if let Some(port) = self.state.ports.shift_remove(&id) {
            if let Some(node) = self.state.nodes.get_mut(&port.node) {
                node.ports.shift_remove(&id);
            }
            self.state.element_ports.remove(&port.element, &id);
        }
        self.state.port_incoming.shift_remove(&id);
        self.state.port_outgoing.shift_remove(&id);
        self.state.port_cycle.shift_remove(&id);
        tracing::trace!("Port removed: {:?}", id);
        Ok(())
    }

    /// Add an edge between two existing ports
    pub fn add_edge(&mut self, request: NewEdge) -> Result<EdgeId> {
        if let Some(id) = request.id {
            if self.state.edges.contains_key(&id) {
                return Err(GraphError::EdgeIdInUse(id));
            }
        }
        self.ensure_port(request.from)?;
        self.ensure_port(request.to)?;

        let edges = &self.state.edges;
        let id = request
            .id
            .unwrap_or_else(|| self.edge_ids.create(|candidate| edges.contains_key(&candidate)));

        self.state.edges.insert(
            id,
            EdgeEntry {
                from: request.from,
                to: request.to,
                shape: request.shape,
                priority: request.priority,
            },
        );
        self.state.index_edge(id, request.from, request.to);
        tracing::trace!("Edge added: {:?} ({:?} -> {:?})", id, request.from, request.to);

        self.events
            .after_edge_added
            .emit(&Graph::new(&self.state), &id);
        Ok(id)
    }

    /// Apply a partial update to an edge.
    ///
    /// New endpoints are validated before anything changes. When an endpoint
    /// changes the edge is re-indexed under the same id before the shape and
    /// priority are applied.
    pub fn update_edge(&mut self, id: EdgeId, patch: EdgePatch) -> Result<()> {
        let edge = self
            .state
            .edges
            .get(&id)
            .ok_or(GraphError::EdgeNotFound(id))?;
        let (old_from, old_to) = (edge.from, edge.to);
        let from = patch.from.unwrap_or(old_from);
        let to = patch.to.unwrap_or(old_to);
        self.ensure_port(from)?;
        self.ensure_port(to)?;

        if from != old_from || to != old_to {
            self.state.unindex_edge(id, old_from, old_to);
            if let Some(edge) = self.state.edges.get_mut(&id) {
                edge.from = from;
                edge.to = to;
            }
            self.state.index_edge(id, from, to);
        }

        let mut shape_updated = false;
        let mut priority_changed = false;
        if let Some(edge) = self.state.edges.get_mut(&id) {
            if let Some(shape) = patch.shape {
                edge.shape = shape;
                shape_updated = true;
            }
            if let Some(priority) = patch.priority {
                priority_changed = priority != edge.priority;
                edge.priority = priority;
            }
        }
        tracing::trace!("Edge updated: {:?}", id);

        let graph = Graph::new(&self.state);
        if shape_updated {
            self.events.after_edge_shape_updated.emit(&graph, &id);
        }
        self.events.after_edge_updated.emit(&graph, &id);
        if priority_changed {
            self.events.after_edge_priority_updated.emit(&graph, &id);
        }
        Ok(())
    }

    /// Remove an edge
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<()> {
        if !self.state.edges.contains_key(&id) {
            return Err(GraphError::EdgeNotFound(id));
        }

        self.events
            .before_edge_removed
            .emit(&Graph::new(&self.state), &id);

        if let Some(edge) = self.state.edges.shift_remove(&id) {
            self.state.unindex_edge(id, edge.from, edge.to);
        }
        tracing::trace!("Edge removed: {:?}", id);
        Ok(())
    }

    /// Remove everything and reset the id generators
    pub fn clear(&mut self) {
        self.events
            .before_clear
            .emit(&Graph::new(&self.state), &());

        self.state = GraphState::default();
        self.node_ids.reset();
        self.port_ids.reset();
        self.edge_ids.reset();
        tracing::trace!("Graph cleared");
    }

    fn ensure_port(&self, id: PortId) -> Result<()> {
        if self.state.ports.contains_key(&id) {
            Ok(())
        } else {
            Err(GraphError::PortNotFound(id))
        }
    }
}
