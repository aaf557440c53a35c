// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge shape contract.
//!
//! Every edge owns a shape object. The rendering side resolves each endpoint
//! to its content-space centre, rendered size and direction angle, then asks
//! the shape for a path.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// How an edge relates its two endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeCategory {
    /// Ports on distinct nodes
    Line,
    /// Source and target are the same port
    PortCycle,
    /// Distinct ports of the same node
    NodeCycle,
}

/// One end of an edge as seen by a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeEndpoint {
    /// Port centre in content space
    pub center: Point,
    /// Rendered width of the port
    pub width: f64,
    /// Rendered height of the port
    pub height: f64,
    /// Direction angle in radians
    pub direction: f64,
}

/// Input to [`EdgeShape::render`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRenderParams {
    /// Source endpoint
    pub from: EdgeEndpoint,
    /// Target endpoint
    pub to: EdgeEndpoint,
    /// Endpoint relationship
    pub category: EdgeCategory,
}

/// A single path drawing command
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    /// Start a new sub-path
    MoveTo(Point),
    /// Straight segment
    LineTo(Point),
    /// Cubic bezier segment (control 1, control 2, end)
    CubicTo(Point, Point, Point),
    /// Close the current sub-path
    Close,
}

/// Rendered edge geometry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgePath {
    /// Line commands
    pub commands: Vec<PathCommand>,
    /// Arrowhead polygon at the source end
    pub source_arrow: Option<Vec<Point>>,
    /// Arrowhead polygon at the target end
    pub target_arrow: Option<Vec<Point>>,
}

impl EdgePath {
    /// Every point referenced by the path (line commands only)
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.commands.iter().flat_map(|command| match *command {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => vec![p],
            PathCommand::CubicTo(c1, c2, p) => vec![c1, c2, p],
            PathCommand::Close => Vec::new(),
        })
    }

    /// Final point of the line, if any
    pub fn end_point(&self) -> Option<Point> {
        self.commands.iter().rev().find_map(|command| match *command {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) | PathCommand::CubicTo(_, _, p) => {
                Some(p)
            }
            PathCommand::Close => None,
        })
    }

    /// Render as an SVG path data string
    pub fn to_svg_path(&self) -> String {
        let mut out = String::new();
        for command in &self.commands {
            if !out.is_empty() {
                out.push(' ');
            }
            match command {
                PathCommand::MoveTo(p) => out.push_str(&format!("M {} {}", p.x, p.y)),
                PathCommand::LineTo(p) => out.push_str(&format!("L {} {}", p.x, p.y)),
                PathCommand::CubicTo(c1, c2, p) => out.push_str(&format!(
                    "C {} {}, {} {}, {} {}",
                    c1.x, c1.y, c2.x, c2.y, p.x, p.y
                )),
                PathCommand::Close => out.push('Z'),
            }
        }
        out
    }
}

/// Pluggable edge renderer
pub trait EdgeShape {
    /// Produce the edge geometry for the given endpoints
    fn render(&self, params: &EdgeRenderParams) -> EdgePath;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::rc::Rc;

    /// Shape that renders nothing
    pub(crate) struct NoopShape;

    impl EdgeShape for NoopShape {
        fn render(&self, _params: &EdgeRenderParams) -> EdgePath {
            EdgePath::default()
        }
    }

    pub(crate) fn noop_shape() -> Rc<dyn EdgeShape> {
        Rc::new(NoopShape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_path() {
        let path = EdgePath {
            commands: vec![
                PathCommand::MoveTo(Point::new(0.0, 0.0)),
                PathCommand::CubicTo(
                    Point::new(1.0, 0.0),
                    Point::new(2.0, 1.0),
                    Point::new(3.0, 1.0),
                ),
                PathCommand::LineTo(Point::new(4.0, 1.0)),
            ],
            source_arrow: None,
            target_arrow: None,
        };

        assert_eq!(path.to_svg_path(), "M 0 0 C 1 0, 2 1, 3 1 L 4 1");
        assert_eq!(path.end_point(), Some(Point::new(4.0, 1.0)));
        assert_eq!(path.points().count(), 5);
    }
}
