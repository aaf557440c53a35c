// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in edge shapes.
//!
//! Both shapes leave a gap of `arrow_length` at each arrow end so the
//! arrowhead polygon sits between the line and the port centre, and both
//! draw a loop of `cycle_radius` when an edge starts and ends at the same
//! place. Port directions are mirrored per axis to match where the target
//! lies relative to the source.

mod bezier;
mod straight;

pub use bezier::BezierEdgeShape;
pub use straight::StraightEdgeShape;

use nodeflow_graph::{EdgeEndpoint, EdgeRenderParams, Point};
use serde::{Deserialize, Serialize};

/// Arrowhead settings shared by the built-in shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowStyle {
    /// Distance from the port centre to the arrow base
    pub length: f64,
    /// Width of the arrow base
    pub width: f64,
    /// Draw an arrow at the source end
    pub source: bool,
    /// Draw an arrow at the target end
    pub target: bool,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            length: 15.0,
            width: 4.0,
            source: false,
            target: true,
        }
    }
}

impl ArrowStyle {
    fn source_gap(&self) -> f64 {
        if self.source { self.length } else { 0.0 }
    }

    fn target_gap(&self) -> f64 {
        if self.target { self.length } else { 0.0 }
    }

    /// Where the line starts, backed off from the source centre along `dir`
    pub(crate) fn line_start(&self, from: &EdgeEndpoint, dir: Point) -> Point {
        from.center.offset(dir, self.source_gap())
    }

    /// Where the line ends, backed off from the target centre along `dir`
    pub(crate) fn line_end(&self, to: &EdgeEndpoint, dir: Point) -> Point {
        to.center.offset(dir, self.target_gap())
    }

    pub(crate) fn source_arrow(&self, from: &EdgeEndpoint, dir: Point) -> Option<Vec<Point>> {
        self.source
            .then(|| arrow_polygon(from.center, dir, self.length, self.width))
    }

    pub(crate) fn target_arrow(&self, to: &EdgeEndpoint, dir: Point) -> Option<Vec<Point>> {
        self.target
            .then(|| arrow_polygon(to.center, dir, self.length, self.width))
    }
}

/// Per-axis sign that maps port directions onto the actual endpoint layout.
///
/// Port directions describe an edge whose target lies right of and below
/// its source. When the target lies left of (or above) the source, the
/// matching direction component is negated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Mirror {
    x: f64,
    y: f64,
}

impl Mirror {
    pub(crate) fn between(from: &EdgeEndpoint, to: &EdgeEndpoint) -> Self {
        let sign = |delta: f64| if delta < 0.0 { -1.0 } else { 1.0 };
        Self {
            x: sign(to.center.x - from.center.x),
            y: sign(to.center.y - from.center.y),
        }
    }

    /// Unit vector for a direction angle, mirrored
    pub(crate) fn direction(&self, angle: f64) -> Point {
        let dir = Point::from_angle(angle);
        Point::new(dir.x * self.x, dir.y * self.y)
    }

    /// Mirrored source and target directions of an edge
    pub(crate) fn directions(params: &EdgeRenderParams) -> (Point, Point) {
        let mirror = Self::between(&params.from, &params.to);
        (
            mirror.direction(params.from.direction),
            mirror.direction(params.to.direction),
        )
    }
}

/// Unit vector rotated a quarter turn counter-clockwise
pub(crate) fn perpendicular(dir: Point) -> Point {
    Point::new(-dir.y, dir.x)
}

/// Triangle with its tip at `tip` and its base `length` away along `dir`
pub(crate) fn arrow_polygon(tip: Point, dir: Point, length: f64, width: f64) -> Vec<Point> {
    let base = tip.offset(dir, length);
    let normal = perpendicular(dir);
    vec![
        tip,
        base.offset(normal, width / 2.0),
        base.offset(normal, -width / 2.0),
    ]
}

/// Whether two endpoints sit on top of each other
pub(crate) fn coincident(from: &EdgeEndpoint, to: &EdgeEndpoint) -> bool {
    from.center.distance(to.center) < f64::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_polygon_points_back_along_direction() {
        let polygon = arrow_polygon(Point::new(0.0, 0.0), Point::new(1.0, 0.0), 10.0, 4.0);
        assert_eq!(polygon[0], Point::new(0.0, 0.0));
        assert_eq!(polygon[1], Point::new(10.0, 2.0));
        assert_eq!(polygon[2], Point::new(10.0, -2.0));
    }

    #[test]
    fn test_gaps_follow_arrow_flags() {
        let style = ArrowStyle {
            source: false,
            target: true,
            ..ArrowStyle::default()
        };
        let endpoint = EdgeEndpoint {
            center: Point::new(0.0, 0.0),
            width: 0.0,
            height: 0.0,
            direction: 0.0,
        };
        let dir = Point::new(1.0, 0.0);
        assert_eq!(style.line_start(&endpoint, dir), Point::new(0.0, 0.0));
        assert_eq!(style.line_end(&endpoint, dir), Point::new(15.0, 0.0));
        assert!(style.source_arrow(&endpoint, dir).is_none());
        assert_eq!(style.target_arrow(&endpoint, dir).map(|p| p.len()), Some(3));
    }

    fn endpoint_at(x: f64, y: f64) -> EdgeEndpoint {
        EdgeEndpoint {
            center: Point::new(x, y),
            width: 0.0,
            height: 0.0,
            direction: 0.0,
        }
    }

    #[test]
    fn test_mirror_follows_target_quadrant() {
        let origin = endpoint_at(0.0, 0.0);
        assert_eq!(
            Mirror::between(&origin, &endpoint_at(10.0, 10.0)),
            Mirror { x: 1.0, y: 1.0 }
        );
        assert_eq!(
            Mirror::between(&origin, &endpoint_at(-10.0, 10.0)),
            Mirror { x: -1.0, y: 1.0 }
        );
        assert_eq!(
            Mirror::between(&origin, &endpoint_at(10.0, -10.0)),
            Mirror { x: 1.0, y: -1.0 }
        );
        // Aligned endpoints keep the unmirrored direction
        assert_eq!(Mirror::between(&origin, &origin), Mirror { x: 1.0, y: 1.0 });
    }

    #[test]
    fn test_mirrored_direction() {
        let mirror = Mirror { x: -1.0, y: 1.0 };
        let dir = mirror.direction(0.0);
        assert!((dir.x + 1.0).abs() < 1e-12);
        assert!(dir.y.abs() < 1e-12);
    }
}
