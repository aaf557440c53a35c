// SPDX-License-Identifier: MIT OR Apache-2.0
//! Domain errors raised by the graph registry.

use crate::ids::{EdgeId, ElementHandle, NodeId, PortId};
use thiserror::Error;

/// Error raised when a graph operation violates referential integrity,
/// reuses an id, or breaks a registry invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0:?}")]
    PortNotFound(PortId),

    /// Edge not found
    #[error("Edge not found: {0:?}")]
    EdgeNotFound(EdgeId),

    /// Node id already in use
    #[error("Node id already in use: {0:?}")]
    NodeIdInUse(NodeId),

    /// Port id already in use
    #[error("Port id already in use: {0:?}")]
    PortIdInUse(PortId),

    /// Edge id already in use
    #[error("Edge id already in use: {0:?}")]
    EdgeIdInUse(EdgeId),

    /// Element already backs another node
    #[error("Element {element:?} already backs node {node:?}")]
    ElementInUse {
        /// The conflicting element
        element: ElementHandle,
        /// The node currently bound to it
        node: NodeId,
    },

    /// Node still owns ports
    #[error("Node {0:?} still has marked ports")]
    NodeHasPorts(NodeId),

    /// Port still has adjacent edges
    #[error("Port {0:?} still has adjacent edges")]
    PortHasEdges(PortId),
}

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;
