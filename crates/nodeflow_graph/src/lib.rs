// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph registry for `nodeflow` diagrams.
//!
//! This crate owns the data model of a node-link diagram:
//! - Nodes positioned in content space, owning ports
//! - Ports (connection points) with a direction angle
//! - Directed edges between ports, with a pluggable shape
//!
//! ## Architecture
//!
//! - [`GraphStore`] is the single source of truth. It validates every
//!   mutation, keeps adjacency indices per port and publishes lifecycle
//!   events on named channels.
//! - [`Graph`] is the read facade handed to event listeners and rendering
//!   code. Direct lookups on a missing id are errors, adjacency lookups on a
//!   missing id are `None`.
//! - [`EdgeShape`] is the contract edge renderers implement.

pub mod edge;
pub mod error;
pub mod event;
pub mod facade;
pub mod geometry;
pub mod ids;
pub mod lookup;
pub mod node;
pub mod port;
pub mod shape;
pub mod store;

pub use edge::{EdgeEntry, EdgePatch, NewEdge};
pub use error::{GraphError, Result};
pub use event::{EventHandler, GraphEventHandler, GraphEvents, ListenerId};
pub use facade::Graph;
pub use geometry::Point;
pub use ids::{EdgeId, ElementHandle, IdGenerator, NodeId, PortId, RawId};
pub use lookup::MultiMap;
pub use node::{standard_center_fn, CenterFn, NewNode, NodeEntry, NodePatch};
pub use port::{NewPort, PortEntry, PortPatch};
pub use shape::{EdgeCategory, EdgeEndpoint, EdgePath, EdgeRenderParams, EdgeShape, PathCommand};
pub use store::GraphStore;
