// SPDX-License-Identifier: MIT OR Apache-2.0
//! Content-space rectangle deciding what is materialized.

use crate::transform::TransformMatrix;
use nodeflow_graph::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in content coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderingBox {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl RenderingBox {
    /// Create a box
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The content area visible through a viewport of the given size
    pub fn from_viewport(viewport: &TransformMatrix, width: f64, height: f64) -> Self {
        Self {
            x: viewport.x,
            y: viewport.y,
            width: width * viewport.scale,
            height: height * viewport.scale,
        }
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grow by `dx` on the left and right and by `dy` on the top and bottom
    pub fn expanded(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x - dx,
            y: self.y - dy,
            width: self.width + 2.0 * dx,
            height: self.height + 2.0 * dy,
        }
    }

    /// Whether the point lies inside, bounds included
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Whether `other` lies entirely inside
    pub fn contains_box(&self, other: &RenderingBox) -> bool {
        other.x >= self.x
            && other.right() <= self.right()
            && other.y >= self.y
            && other.bottom() <= self.bottom()
    }

    /// Whether the two boxes overlap, touching edges included
    pub fn intersects(&self, other: &RenderingBox) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Smallest box spanning two points
    pub fn spanning(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: a.x.max(b.x) - x,
            height: a.y.max(b.y) - y,
        }
    }
}
