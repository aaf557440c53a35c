// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas: the public entry point.
//!
//! A [`Canvas`] owns the graph registry, the viewport and a rendering
//! boundary. Mutation requests are validated, filled in from the
//! configuration and applied to the registry; the registry's lifecycle
//! events are forwarded to the boundary. Removal cascades are sequenced
//! here, one layer at a time: edges, then ports, then the node.

use crate::boundary::RenderingBoundary;
use crate::config::CanvasConfig;
use crate::error::Result;
use crate::priority::PriorityGenerator;
use crate::rendering_box::RenderingBox;
use crate::scheduler::RenderingBoxScheduler;
use crate::transform::navigation::Navigator;
use crate::transform::{TransformPatch, Viewport};
use crate::virtual_scroll::VirtualScroll;
use indexmap::IndexSet;
use nodeflow_graph::{
    CenterFn, EdgeId, EdgePatch, EdgeShape, ElementHandle, Graph, GraphError, GraphEventHandler,
    GraphEvents, GraphStore, ListenerId, NewEdge, NewNode, NewPort, NodeId, NodePatch, PortId,
    PortPatch,
};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Instant;

/// A port declared together with its node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePortRequest {
    /// Explicit id; generated when `None`
    pub id: Option<PortId>,
    /// Render target
    pub element: ElementHandle,
    /// Direction angle; the configured default when `None`
    pub direction: Option<f64>,
}

impl NodePortRequest {
    /// Create a request with a generated id and the default direction
    pub fn new(element: ElementHandle) -> Self {
        Self {
            id: None,
            element,
            direction: None,
        }
    }

    /// Use an explicit id
    pub fn with_id(mut self, id: PortId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the direction angle
    pub fn with_direction(mut self, direction: f64) -> Self {
        self.direction = Some(direction);
        self
    }
}

/// Request to add a node, optionally with its ports
#[derive(Clone)]
pub struct AddNodeRequest {
    /// Explicit id; generated when `None`
    pub id: Option<NodeId>,
    /// Render target
    pub element: ElementHandle,
    /// Horizontal position
    pub x: Option<f64>,
    /// Vertical position
    pub y: Option<f64>,
    /// Anchor function; the configured anchor when `None`
    pub center_fn: Option<CenterFn>,
    /// Stacking order; the configured policy when `None`
    pub priority: Option<f64>,
    /// Ports marked right after the node
    pub ports: Vec<NodePortRequest>,
}

impl AddNodeRequest {
    /// Create a request with an unset position
    pub fn new(element: ElementHandle) -> Self {
        Self {
            id: None,
            element,
            x: None,
            y: None,
            center_fn: None,
            priority: None,
            ports: Vec::new(),
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
        self.center_fn = Some(center_fn);
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Declare a port
    pub fn with_port(mut self, port: NodePortRequest) -> Self {
        self.ports.push(port);
        self
    }
}

/// Request to mark a port on an existing node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddPortRequest {
    /// Owning node
    pub node: NodeId,
    /// Port details
    pub port: NodePortRequest,
}

impl AddPortRequest {
    /// Create a request for a port on `node`
    pub fn new(node: NodeId, element: ElementHandle) -> Self {
        Self {
            node,
            port: NodePortRequest::new(element),
        }
    }

    /// Use an explicit id
    pub fn with_id(mut self, id: PortId) -> Self {
        self.port = self.port.with_id(id);
        self
    }

    /// Set the direction angle
    pub fn with_direction(mut self, direction: f64) -> Self {
        self.port = self.port.with_direction(direction);
        self
    }
}

/// Request to add an edge
#[derive(Clone)]
pub struct AddEdgeRequest {
    /// Explicit id; generated when `None`
    pub id: Option<EdgeId>,
    /// Source port
    pub from: PortId,
    /// Target port
    pub to: PortId,
    /// Shape; the configured shape when `None`
    pub shape: Option<Rc<dyn EdgeShape>>,
    /// Stacking order; the configured policy when `None`
    pub priority: Option<f64>,
}

impl AddEdgeRequest {
    /// Create a request between two ports
    pub fn new(from: PortId, to: PortId) -> Self {
        Self {
            id: None,
            from,
            to,
            shape: None,
            priority: None,
        }
    }

    /// Use an explicit id
    pub fn with_id(mut self, id: EdgeId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the shape
    pub fn with_shape(mut self, shape: Rc<dyn EdgeShape>) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Registry listeners installed by the canvas
struct Subscriptions {
    node_added: ListenerId,
    node_updated: ListenerId,
    node_priority_updated: ListenerId,
    node_removed: ListenerId,
    port_updated: ListenerId,
    edge_added: ListenerId,
    edge_shape_updated: ListenerId,
    edge_updated: ListenerId,
    edge_priority_updated: ListenerId,
    edge_removed: ListenerId,
    cleared: ListenerId,
}

fn forward<B, T>(
    handler: &mut GraphEventHandler<T>,
    boundary: &Rc<RefCell<B>>,
    call: impl Fn(&mut B, &Graph<'_>, &T) + 'static,
) -> ListenerId
where
    B: RenderingBoundary + 'static,
    T: 'static,
{
    let boundary = Rc::clone(boundary);
    handler.subscribe(move |graph, payload| call(&mut boundary.borrow_mut(), graph, payload))
}

impl Subscriptions {
    fn install<B: RenderingBoundary + 'static>(
        events: &mut GraphEvents,
        boundary: &Rc<RefCell<B>>,
    ) -> Self {
        Self {
            node_added: forward(&mut events.after_node_added, boundary, |b, g, id| {
                b.attach_node(g, *id);
            }),
            node_updated: forward(&mut events.after_node_updated, boundary, |b, g, id| {
                b.update_node_position(g, *id);
            }),
            node_priority_updated: forward(
                &mut events.after_node_priority_updated,
                boundary,
                |b, g, id| b.update_node_priority(g, *id),
            ),
            node_removed: forward(&mut events.before_node_removed, boundary, |b, g, id| {
                b.detach_node(g, *id);
            }),
            port_updated: forward(&mut events.after_port_updated, boundary, |b, g, id| {
                for edge_id in g.port_adjacent_edge_ids(*id).unwrap_or_default() {
                    b.render_edge(g, edge_id);
                }
            }),
            edge_added: forward(&mut events.after_edge_added, boundary, |b, g, id| {
                b.attach_edge(g, *id);
            }),
            edge_shape_updated: forward(
                &mut events.after_edge_shape_updated,
                boundary,
                |b, g, id| b.update_edge_shape(g, *id),
            ),
            edge_updated: forward(&mut events.after_edge_updated, boundary, |b, g, id| {
                b.render_edge(g, *id);
            }),
            edge_priority_updated: forward(
                &mut events.after_edge_priority_updated,
                boundary,
                |b, g, id| b.update_edge_priority(g, *id),
            ),
            edge_removed: forward(&mut events.before_edge_removed, boundary, |b, g, id| {
                b.detach_edge(g, *id);
            }),
            cleared: forward(&mut events.before_clear, boundary, |b, _, _| b.clear()),
        }
    }

    fn uninstall(self, events: &mut GraphEvents) {
        events.after_node_added.unsubscribe(self.node_added);
        events.after_node_updated.unsubscribe(self.node_updated);
        events
            .after_node_priority_updated
            .unsubscribe(self.node_priority_updated);
        events.before_node_removed.unsubscribe(self.node_removed);
        events.after_port_updated.unsubscribe(self.port_updated);
        events.after_edge_added.unsubscribe(self.edge_added);
        events
            .after_edge_shape_updated
            .unsubscribe(self.edge_shape_updated);
        events.after_edge_updated.unsubscribe(self.edge_updated);
        events
            .after_edge_priority_updated
            .unsubscribe(self.edge_priority_updated);
        events.before_edge_removed.unsubscribe(self.edge_removed);
        events.before_clear.unsubscribe(self.cleared);
    }
}

/// Diagram orchestrator
pub struct Canvas<B: RenderingBoundary + 'static> {
    store: GraphStore,
    viewport: Viewport,
    boundary: Rc<RefCell<B>>,
    config: CanvasConfig,
    default_edge_shape: Rc<dyn EdgeShape>,
    node_priorities: PriorityGenerator,
    edge_priorities: PriorityGenerator,
    navigator: Navigator,
    scheduler: RenderingBoxScheduler,
    subscriptions: Subscriptions,
}

impl<B: RenderingBoundary + 'static> Canvas<B> {
    /// Create a canvas rendering through `boundary`
    pub fn new(boundary: B, config: CanvasConfig) -> Self {
        let mut store = GraphStore::new();
        let boundary = Rc::new(RefCell::new(boundary));
        let subscriptions = Subscriptions::install(store.events_mut(), &boundary);

        Self {
            store,
            viewport: Viewport::new(),
            boundary,
            default_edge_shape: config.edges.shape.build(),
            node_priorities: PriorityGenerator::new(config.nodes.priority),
            edge_priorities: PriorityGenerator::new(config.edges.priority),
            navigator: Navigator::new(config.transform.preprocessor()),
            scheduler: RenderingBoxScheduler::new(config.scheduler),
            subscriptions,
            config,
        }
    }

    /// Read access to the graph
    pub fn graph(&self) -> Graph<'_> {
        self.store.graph()
    }

    /// Registry lifecycle channels, for additional listeners
    pub fn events_mut(&mut self) -> &mut GraphEvents {
        self.store.events_mut()
    }

    /// The viewport
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The viewport, for subscribing to its events or resizing
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// The rendering boundary
    pub fn boundary(&self) -> Ref<'_, B> {
        self.boundary.borrow()
    }

    /// The configuration the canvas was built with
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Add a node and the ports declared with it.
    ///
    /// The whole request is validated first; on error nothing is added.
    pub fn add_node(&mut self, request: AddNodeRequest) -> Result<&mut Self> {
        let graph = self.store.graph();
        if let Some(id) = request.id {
            if graph.has_node(id) {
                return Err(GraphError::NodeIdInUse(id).into());
            }
        }
        if let Some(node) = graph.node_id_by_element(request.element) {
            return Err(GraphError::ElementInUse {
                element: request.element,
                node,
            }
            .into());
        }
        let mut requested_ports = IndexSet::new();
        for port_id in request.ports.iter().filter_map(|port| port.id) {
            if graph.has_port(port_id) || !requested_ports.insert(port_id) {
                return Err(GraphError::PortIdInUse(port_id).into());
            }
        }

        let priority = match request.priority {
            Some(priority) => priority,
            None => self.node_priorities.next_priority(),
        };
        let center_fn = request
            .center_fn
            .unwrap_or_else(|| self.config.nodes.anchor.center_fn());
        let mut new_node = NewNode::new(request.element)
            .with_center_fn(center_fn)
            .with_priority(priority);
        new_node.id = request.id;
        new_node.x = request.x;
        new_node.y = request.y;

        let node_id = self.store.add_node(new_node)?;
        for port in request.ports {
            self.mark_port(node_id, port)?;
        }
        Ok(self)
    }

    /// Apply a partial update to a node
    pub fn update_node(&mut self, id: NodeId, patch: NodePatch) -> Result<&mut Self> {
        self.store.update_node(id, patch)?;
        Ok(self)
    }

    /// Remove a node with its ports and every edge attached to them
    pub fn remove_node(&mut self, id: NodeId) -> Result<&mut Self> {
        let port_ids = self
            .store
            .graph()
            .node_port_ids(id)
            .ok_or(GraphError::NodeNotFound(id))?;
        tracing::debug!("Removing {:?} with {} ports", id, port_ids.len());

        for port_id in port_ids {
            self.unmark_port(port_id)?;
        }
        self.store.remove_node(id)?;
        Ok(self)
    }

    /// Mark a port on an existing node
    pub fn add_port(&mut self, request: AddPortRequest) -> Result<&mut Self> {
        self.mark_port(request.node, request.port)?;
        Ok(self)
    }

    /// Apply a partial update to a port
    pub fn update_port(&mut self, id: PortId, patch: PortPatch) -> Result<&mut Self> {
        self.store.update_port(id, patch)?;
        Ok(self)
    }

    /// Unmark a port, removing its edges first
    pub fn remove_port(&mut self, id: PortId) -> Result<&mut Self> {
        self.unmark_port(id)?;
        Ok(self)
    }

    /// Add an edge between two existing ports
    pub fn add_edge(&mut self, request: AddEdgeRequest) -> Result<&mut Self> {
        let graph = self.store.graph();
        if let Some(id) = request.id {
            if graph.has_edge(id) {
                return Err(GraphError::EdgeIdInUse(id).into());
            }
        }
        for port_id in [request.from, request.to] {
            if !graph.has_port(port_id) {
                return Err(GraphError::PortNotFound(port_id).into());
            }
        }

        let priority = match request.priority {
            Some(priority) => priority,
            None => self.edge_priorities.next_priority(),
        };
        let shape = request
            .shape
            .unwrap_or_else(|| Rc::clone(&self.default_edge_shape));
        let mut new_edge = NewEdge::new(request.from, request.to, shape).with_priority(priority);
        new_edge.id = request.id;

        self.store.add_edge(new_edge)?;
        Ok(self)
    }

    /// Apply a partial update to an edge
    pub fn update_edge(&mut self, id: EdgeId, patch: EdgePatch) -> Result<&mut Self> {
        self.store.update_edge(id, patch)?;
        Ok(self)
    }

    /// Remove an edge
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<&mut Self> {
        self.store.remove_edge(id)?;
        Ok(self)
    }

    /// Merge a patch into the viewport matrix
    pub fn patch_viewport_matrix(&mut self, patch: TransformPatch) -> Result<&mut Self> {
        self.viewport.patch_viewport_matrix(patch)?;
        Ok(self)
    }

    /// Merge a patch into the content matrix
    pub fn patch_content_matrix(&mut self, patch: TransformPatch) -> Result<&mut Self> {
        self.viewport.patch_content_matrix(patch)?;
        Ok(self)
    }

    /// Pan by a screen-space delta through the configured limits
    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<&mut Self> {
        self.navigator.pan(&mut self.viewport, dx, dy)?;
        Ok(self)
    }

    /// Zoom about a screen point through the configured limits
    pub fn zoom_at(&mut self, factor: f64, cx: f64, cy: f64) -> Result<&mut Self> {
        self.navigator.zoom_at(&mut self.viewport, factor, cx, cy)?;
        Ok(self)
    }

    /// Remove everything and restart id and priority sequences
    pub fn clear(&mut self) -> &mut Self {
        self.store.clear();
        self.node_priorities.reset();
        self.edge_priorities.reset();
        self.scheduler.reset();
        self
    }

    /// Clear the graph, release the boundary and stop listening.
    ///
    /// Returns the boundary once no other handle to it remains.
    pub fn destroy(mut self) -> Option<B> {
        self.store.clear();
        self.boundary.borrow_mut().destroy();
        self.subscriptions.uninstall(self.store.events_mut());
        tracing::debug!("Canvas destroyed");
        Rc::try_unwrap(self.boundary).ok().map(RefCell::into_inner)
    }

    fn mark_port(&mut self, node: NodeId, port: NodePortRequest) -> Result<PortId> {
        let direction = port.direction.unwrap_or(self.config.ports.direction);
        let mut new_port = NewPort::new(node, port.element).with_direction(direction);
        new_port.id = port.id;
        Ok(self.store.add_port(new_port)?)
    }

    fn unmark_port(&mut self, id: PortId) -> Result<()> {
        let edge_ids = self
            .store
            .graph()
            .port_adjacent_edge_ids(id)
            .ok_or(GraphError::PortNotFound(id))?;
        for edge_id in edge_ids {
            self.store.remove_edge(edge_id)?;
        }
        self.store.remove_port(id)?;
        Ok(())
    }
}

impl<B: RenderingBoundary + 'static> Canvas<VirtualScroll<B>> {
    /// Create a canvas that only materializes what is near the rendering box
    pub fn with_virtual_scroll(boundary: B, config: CanvasConfig) -> Self {
        let scroll = VirtualScroll::new(boundary, config.virtual_scroll);
        Self::new(scroll, config)
    }

    /// Make `rendering_box` the materialized area
    pub fn set_rendering_box(&mut self, rendering_box: RenderingBox) -> &mut Self {
        let graph = self.store.graph();
        self.boundary
            .borrow_mut()
            .apply_rendering_box(&graph, rendering_box);
        self
    }

    /// Report the current viewport to the scheduler; applies a box when one
    /// is due immediately
    pub fn schedule_rendering_box(&mut self, now: Instant) -> &mut Self {
        let size = self.viewport.size();
        let matrix = self.viewport.viewport_matrix();
        if let Some(rendering_box) =
            self.scheduler
                .on_viewport_updated(&matrix, size.width, size.height, now)
        {
            self.set_rendering_box(rendering_box);
        }
        self
    }

    /// When the next [`poll_rendering_box`](Self::poll_rendering_box) can
    /// apply a box, for hosts that arm a timer
    pub fn next_rendering_box_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Apply the pending scheduled box if its debounce period has elapsed.
    /// Returns whether a box was applied.
    pub fn poll_rendering_box(&mut self, now: Instant) -> bool {
        match self.scheduler.poll(now) {
            Some(rendering_box) => {
                self.set_rendering_box(rendering_box);
                true
            }
            None => false,
        }
    }
}
