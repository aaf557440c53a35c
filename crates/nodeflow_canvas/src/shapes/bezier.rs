// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cubic bezier edges.

use super::{coincident, perpendicular, ArrowStyle, Mirror};
use nodeflow_graph::{EdgeCategory, EdgePath, EdgeRenderParams, EdgeShape, PathCommand, Point};
use serde::{Deserialize, Serialize};

/// Control point distance used when none is configured
const DEFAULT_CURVATURE: f64 = 50.0;

/// Bezier curve leaving and entering along the port directions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BezierEdgeShape {
    /// Arrowheads
    pub arrow: ArrowStyle,
    /// Distance of each control point from its end of the line
    pub curvature: f64,
    /// Size of the loop drawn for a port cycle
    pub cycle_radius: f64,
}

impl Default for BezierEdgeShape {
    fn default() -> Self {
        Self {
            arrow: ArrowStyle::default(),
            curvature: DEFAULT_CURVATURE,
            cycle_radius: 30.0,
        }
    }
}

impl BezierEdgeShape {
    fn loop_path(&self, params: &EdgeRenderParams, dirs: (Point, Point)) -> Vec<PathCommand> {
        let (from_dir, to_dir) = dirs;
        let normal = perpendicular(from_dir);
        let r = self.cycle_radius;
        let reach = params.from.center.offset(from_dir, 3.0 * r);

        vec![
            PathCommand::MoveTo(self.arrow.line_start(&params.from, from_dir)),
            PathCommand::CubicTo(
                reach.offset(normal, 2.0 * r),
                reach.offset(normal, -2.0 * r),
                self.arrow.line_end(&params.to, to_dir),
            ),
        ]
    }

    fn curve_path(
        &self,
        params: &EdgeRenderParams,
        dirs: (Point, Point),
        curvature: f64,
    ) -> Vec<PathCommand> {
        let (from_dir, to_dir) = dirs;
        let start = self.arrow.line_start(&params.from, from_dir);
        let end = self.arrow.line_end(&params.to, to_dir);
        vec![
            PathCommand::MoveTo(start),
            PathCommand::CubicTo(
                start.offset(from_dir, curvature),
                end.offset(to_dir, curvature),
                end,
            ),
        ]
    }
}

impl EdgeShape for BezierEdgeShape {
    fn render(&self, params: &EdgeRenderParams) -> EdgePath {
        let dirs = Mirror::directions(params);
        let commands = match params.category {
            EdgeCategory::PortCycle => self.loop_path(params, dirs),
            _ if coincident(&params.from, &params.to) => self.loop_path(params, dirs),
            // Ports of one node are close together, so keep the full bend.
            EdgeCategory::NodeCycle => self.curve_path(params, dirs, self.curvature),
            EdgeCategory::Line => {
                let distance = params.from.center.distance(params.to.center);
                self.curve_path(params, dirs, self.curvature.min(distance * 0.5))
            }
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
    fn test_controls_follow_port_directions() {
        let shape = BezierEdgeShape::default();
        let path = shape.render(&EdgeRenderParams {
            from: endpoint(0.0, 0.0, 0.0),
            to: endpoint(200.0, 50.0, PI),
            category: EdgeCategory::Line,
        });

        let PathCommand::CubicTo(c1, c2, end) = path.commands[1] else {
            panic!("expected a cubic segment");
        };
        assert_eq!(c1, Point::new(50.0, 0.0));
        assert!((end.x - 185.0).abs() < 1e-9);
        assert!((c2.x - 135.0).abs() < 1e-9);
        assert!((c2.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_line_limits_curvature() {
        let shape = BezierEdgeShape {
            arrow: ArrowStyle {
                target: false,
                ..ArrowStyle::default()
            },
            ..BezierEdgeShape::default()
        };
        let path = shape.render(&EdgeRenderParams {
            from: endpoint(0.0, 0.0, 0.0),
            to: endpoint(20.0, 0.0, PI),
            category: EdgeCategory::Line,
        });

        let PathCommand::CubicTo(c1, ..) = path.commands[1] else {
            panic!("expected a cubic segment");
        };
        assert_eq!(c1, Point::new(10.0, 0.0));
        assert!(path.target_arrow.is_none());
    }

    #[test]
    fn test_coincident_line_draws_loop() {
        let shape = BezierEdgeShape::default();
        let path = shape.render(&EdgeRenderParams {
            from: endpoint(5.0, 5.0, PI / 2.0),
            to: endpoint(5.0, 5.0, PI / 2.0),
            category: EdgeCategory::Line,
        });

        let furthest = path.points().map(|p| p.y).fold(f64::MIN, f64::max);
        assert!((furthest - (5.0 + 3.0 * shape.cycle_radius)).abs() < 1e-9);
    }

    #[test]
    fn test_mirrored_endpoints_mirror_controls() {
        let shape = BezierEdgeShape::default();
        let render = |to_x: f64| {
            let path = shape.render(&EdgeRenderParams {
                from: endpoint(0.0, 0.0, 0.0),
                to: endpoint(to_x, 50.0, PI),
                category: EdgeCategory::Line,
            });
            let PathCommand::CubicTo(c1, c2, end) = path.commands[1] else {
                panic!("expected a cubic segment");
            };
            (c1, c2, end)
        };

        let (rc1, rc2, rend) = render(200.0);
        let (lc1, lc2, lend) = render(-200.0);
        assert!((lc1.x + rc1.x).abs() < 1e-9);
        assert!((lc2.x + rc2.x).abs() < 1e-9);
        assert!((lend.x + rend.x).abs() < 1e-9);
        assert!((lc1.y - rc1.y).abs() < 1e-9);
        assert!((lend.x + 185.0).abs() < 1e-9);
    }
}
