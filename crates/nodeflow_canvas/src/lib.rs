// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas layer for `nodeflow` diagrams.
//!
//! This crate turns the graph registry into something that can be drawn:
//! - A two-form camera transform with pan/zoom helpers and preprocessors
//! - A rendering boundary contract the host implements
//! - Virtual scroll, which materializes only what is near the viewport
//! - Built-in straight and bezier edge shapes
//!
//! ## Architecture
//!
//! [`Canvas`] owns a [`GraphStore`](nodeflow_graph::GraphStore), a
//! [`Viewport`] and a boundary. It subscribes to the registry's lifecycle
//! channels and forwards each event to the boundary, so the boundary sees
//! every attach before the matching update and every detach before the
//! entity disappears. Wrapping the boundary in [`VirtualScroll`] adds
//! windowing without changing the canvas.
//!
//! Everything runs on the calling thread. The [`RenderingBoxScheduler`] is
//! driven by timestamps passed in by the host.

pub mod boundary;
pub mod canvas;
pub mod config;
pub mod error;
pub mod priority;
pub mod rendering_box;
pub mod scheduler;
pub mod shapes;
pub mod transform;
pub mod virtual_scroll;

pub use boundary::{BoundaryCall, RecordingBoundary, RenderingBoundary};
pub use canvas::{AddEdgeRequest, AddNodeRequest, AddPortRequest, Canvas, NodePortRequest};
pub use config::{
    CanvasConfig, EdgeDefaults, EdgeShapeConfig, NodeAnchor, NodeDefaults, PortDefaults,
    TransformLimits,
};
pub use error::{CanvasError, ConfigError, Result, TransformError};
pub use priority::{PriorityGenerator, PriorityPolicy};
pub use rendering_box::RenderingBox;
pub use scheduler::{RenderingBoxScheduler, SchedulerConfig};
pub use shapes::{ArrowStyle, BezierEdgeShape, StraightEdgeShape};
pub use transform::navigation::Navigator;
pub use transform::preprocess::{
    CombinedPreprocessor, PreprocessParams, ScaleLimitPreprocessor, ShiftLimitPreprocessor,
    TransformPreprocessor,
};
pub use transform::{TransformMatrix, TransformPatch, TransformState, Viewport, ViewportSize};
pub use virtual_scroll::{
    MembershipDelta, NodeContainingRadius, VirtualScroll, VirtualScrollConfig,
};
