// SPDX-License-Identifier: MIT OR Apache-2.0
//! Minimal content-space geometry.

use serde::{Deserialize, Serialize};

/// A point in content or viewport space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Unit vector pointing along an angle in radians
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Translate by `scale` times the vector `dir`
    pub fn offset(&self, dir: Point, scale: f64) -> Self {
        Self::new(self.x + dir.x * scale, self.y + dir.y * scale)
    }
}
