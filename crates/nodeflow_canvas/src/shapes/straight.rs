// SPDX-License-Identifier: MIT OR Apache-2.0
//! Polyline edges.

use super::{coincident, perpendicular, ArrowStyle, Mirror};
use nodeflow_graph::{EdgeCategory, EdgePath, EdgeRenderParams, EdgeShape, PathCommand, Point};
use serde::{Deserialize, Serialize};

/// Straight line between ports, with detours for cycles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StraightEdgeShape {
    /// Arrowheads
    pub arrow: ArrowStyle,
    /// Size of the loop drawn for a port cycle
    pub cycle_radius: f64,
    /// How far a node cycle leaves its ports before turning back
    pub detour_distance: f64,
}

impl Default for StraightEdgeShape {
    fn default() -> Self {
        Self {
            arrow: ArrowStyle::default(),
            cycle_radius: 30.0,
            detour_distance: 100.0,
        }
    }
}

impl StraightEdgeShape {
    fn loop_path(&self, params: &EdgeRenderParams, dirs: (Point, Point)) -> Vec<PathCommand> {
        let (from_dir, to_dir) = dirs;
        let normal = perpendicular(from_dir);
        let r = self.cycle_radius;
        let apex = params.from.center.offset(from_dir, 2.0 * r);

        vec![
            PathCommand::MoveTo(self.arrow.line_start(&params.from, from_dir)),
            PathCommand::LineTo(apex.offset(normal, r)),
            PathCommand::LineTo(apex.offset(normal, -r)),
            PathCommand::LineTo(self.arrow.line_end(&params.to, to_dir)),
        ]
    }

    fn detour_path(&self, params: &EdgeRenderParams, dirs: (Point, Point)) -> Vec<PathCommand> {
        let (from_dir, to_dir) = dirs;
        vec![
            PathCommand::MoveTo(self.arrow.line_start(&params.from, from_dir)),
            PathCommand::LineTo(params.from.center.offset(from_dir, self.detour_distance)),
            PathCommand::LineTo(params.to.center.offset(to_dir, self.detour_distance)),
            PathCommand::LineTo(self.arrow.line_end(&params.to, to_dir)),
        ]
    }
}

impl EdgeShape for StraightEdgeShape {
    fn render(&self, params: &EdgeRenderParams) -> EdgePath {
        let dirs = Mirror::directions(params);
        let commands = match params.category {
            EdgeCategory::PortCycle => self.loop_path(params, dirs),
            _ if coincident(&params.from, &params.to) => self.loop_path(params, dirs),
            EdgeCategory::NodeCycle => self.detour_path(params, dirs),
            EdgeCategory::Line => vec![
                PathCommand::MoveTo(self.arrow.line_start(&params.from, dirs.0)),
                PathCommand::LineTo(self.arrow.line_end(&params.to, dirs.1)),
            ],
        };

        EdgePath {
            commands,
            source_arrow: self.arrow.source_arrow(&params.from, dirs.0),
            target_arrow: self.arrow.target_arrow(&params.to, dirs.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeflow_graph::EdgeEndpoint;
    use std::f64::consts::PI;

    fn endpoint(x: f64, y: f64, direction: f64) -> EdgeEndpoint {
        EdgeEndpoint {
            center: Point::new(x, y),
            width: 0.0,
            height: 0.0,
            direction,
        }
    }

    #[test]
    fn test_line_reserves_arrow_gap() {
        let shape = StraightEdgeShape::default();
        let path = shape.render(&EdgeRenderParams {
            from: endpoint(0.0, 0.0, 0.0),
            to: endpoint(100.0, 0.0, PI),
            category: EdgeCategory::Line,
        });

        assert_eq!(path.commands[0], PathCommand::MoveTo(Point::new(0.0, 0.0)));
        let end = path.end_point().unwrap();
        assert!((end.x - 85.0).abs() < 1e-9);
        assert!(end.y.abs() < 1e-9);
        assert!(path.source_arrow.is_none());
        assert_eq!(path.target_arrow.unwrap()[0], Point::new(100.0, 0.0));
    }

    #[test]
    fn test_port_cycle_draws_loop() {
        let shape = StraightEdgeShape::default();
        let path = shape.render(&EdgeRenderParams {
            from: endpoint(10.0, 10.0, 0.0),
            to: endpoint(10.0, 10.0, 0.0),
            category: EdgeCategory::PortCycle,
        });

        assert_eq!(path.commands.len(), 4);
        let furthest = path.points().map(|p| p.x).fold(f64::MIN, f64::max);
        assert_eq!(furthest, 10.0 + 2.0 * shape.cycle_radius);
    }

    #[test]
    fn test_node_cycle_detours() {
        let shape = StraightEdgeShape::default();
        let path = shape.render(&EdgeRenderParams {
            from: endpoint(0.0, 0.0, 0.0),
            to: endpoint(0.0, 20.0, 0.0),
            category: EdgeCategory::NodeCycle,
        });

        assert_eq!(path.commands.len(), 4);
        assert!(path.points().any(|p| (p.x - shape.detour_distance).abs() < 1e-9));
    }

    #[test]
    fn test_target_left_of_source_mirrors_line() {
        let shape = StraightEdgeShape::default();
        let path = shape.render(&EdgeRenderParams {
            from: endpoint(0.0, 0.0, 0.0),
            to: endpoint(-100.0, 0.0, PI),
            category: EdgeCategory::Line,
        });

        // The arrow gap sits between the ports, not behind the target
        let end = path.end_point().unwrap();
        assert!((end.x + 85.0).abs() < 1e-9);
        let tip = path.target_arrow.unwrap();
        assert_eq!(tip[0], Point::new(-100.0, 0.0));
        assert!(tip[1].x > -100.0);
    }
}
