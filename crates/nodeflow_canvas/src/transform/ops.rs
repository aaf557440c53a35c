// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pure transform algorithms used by gesture handling.
//!
//! All helpers take and return viewport matrices (screen → content).

use super::TransformMatrix;
use crate::error::TransformError;

/// Translate the camera by a screen-space delta
pub fn move_viewport(transform: &TransformMatrix, dx: f64, dy: f64) -> TransformMatrix {
    TransformMatrix {
        scale: transform.scale,
        x: transform.x + transform.scale * dx,
        y: transform.y + transform.scale * dy,
    }
}

/// Multiply the scale by `factor` while keeping the content point under the
/// screen point `(cx, cy)` fixed
pub fn scale_viewport(
    transform: &TransformMatrix,
    factor: f64,
    cx: f64,
    cy: f64,
) -> Result<TransformMatrix, TransformError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(TransformError::InvalidScale(factor));
    }
    TransformMatrix::new(
        transform.scale * factor,
        transform.x + transform.scale * (1.0 - factor) * cx,
        transform.y + transform.scale * (1.0 - factor) * cy,
    )
}

/// `outer ∘ inner`: apply `inner` first, then `outer`
pub fn compose(outer: &TransformMatrix, inner: &TransformMatrix) -> TransformMatrix {
    TransformMatrix {
        scale: outer.scale * inner.scale,
        x: inner.x * outer.scale + outer.x,
        y: inner.y * outer.scale + outer.y,
    }
}

/// Inverse transform
pub fn invert(transform: &TransformMatrix) -> Result<TransformMatrix, TransformError> {
    transform.validate()?;
    Ok(super::content_from_viewport(transform))
}

/// Pure translation
pub fn translation(dx: f64, dy: f64) -> TransformMatrix {
    TransformMatrix {
        scale: 1.0,
        x: dx,
        y: dy,
    }
}

/// Scaling about a fixed point
pub fn scaling_about(factor: f64, cx: f64, cy: f64) -> Result<TransformMatrix, TransformError> {
    TransformMatrix::new(factor, cx * (1.0 - factor), cy * (1.0 - factor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeflow_graph::Point;
    use proptest::prelude::*;

    fn close(a: &TransformMatrix, b: &TransformMatrix) -> bool {
        let tol = 1e-7 * (1.0 + a.x.abs().max(a.y.abs()).max(b.x.abs()).max(b.y.abs()));
        (a.scale - b.scale).abs() < 1e-9 * a.scale.max(1.0)
            && (a.x - b.x).abs() < tol
            && (a.y - b.y).abs() < tol
    }

    #[test]
    fn test_move_scales_delta() {
        let t = TransformMatrix::new(2.0, 1.0, 1.0).unwrap();
        let moved = move_viewport(&t, 3.0, -1.0);
        assert_eq!(moved, TransformMatrix::new(2.0, 7.0, -1.0).unwrap());
    }

    #[test]
    fn test_scale_keeps_point_fixed() {
        let t = TransformMatrix::new(1.5, 10.0, -20.0).unwrap();
        let anchor = Point::new(40.0, 25.0);
        let before = t.apply(anchor);

        let scaled = scale_viewport(&t, 2.0, anchor.x, anchor.y).unwrap();
        let after = scaled.apply(anchor);

        assert!((scaled.scale - 3.0).abs() < 1e-12);
        assert!(before.distance(after) < 1e-9);
    }

    #[test]
    fn test_scale_rejects_non_positive_factor() {
        let t = TransformMatrix::IDENTITY;
        assert!(scale_viewport(&t, 0.0, 0.0, 0.0).is_err());
        assert!(scale_viewport(&t, -2.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_invert() {
        let t = TransformMatrix::new(4.0, 2.0, -6.0).unwrap();
        let inv = invert(&t).unwrap();
        assert!(close(&compose(&t, &inv), &TransformMatrix::IDENTITY));
    }

    proptest! {
        #[test]
        fn prop_move_then_inverse_move_is_identity(
            scale in 0.01f64..100.0,
            x in -1e4f64..1e4,
            y in -1e4f64..1e4,
            dx in -1e3f64..1e3,
            dy in -1e3f64..1e3,
        ) {
            let t = TransformMatrix::new(scale, x, y).unwrap();
            let moved = move_viewport(&t, dx, dy);
            let unit = scale_viewport(&moved, 1.0, 0.0, 0.0).unwrap();
            let back = move_viewport(&unit, -dx, -dy);
            prop_assert!(close(&back, &t));
        }

        #[test]
        fn prop_zoom_round_trip(
            scale in 0.01f64..100.0,
            x in -1e4f64..1e4,
            y in -1e4f64..1e4,
            factor in 0.1f64..10.0,
            cx in -1e3f64..1e3,
            cy in -1e3f64..1e3,
        ) {
            let t = TransformMatrix::new(scale, x, y).unwrap();
            let zoomed = scale_viewport(&t, factor, cx, cy).unwrap();
            let back = scale_viewport(&zoomed, 1.0 / factor, cx, cy).unwrap();
            prop_assert!(close(&back, &t));
        }

        #[test]
        fn prop_helpers_match_composition(
            scale in 0.01f64..100.0,
            x in -1e3f64..1e3,
            dx in -1e2f64..1e2,
            factor in 0.1f64..10.0,
            cx in -1e2f64..1e2,
        ) {
            let t = TransformMatrix::new(scale, x, -x).unwrap();
            let step = scale_viewport(&move_viewport(&t, dx, -dx), factor, cx, cx).unwrap();
            let direct = compose(
                &compose(&t, &translation(dx, -dx)),
                &scaling_about(factor, cx, cx).unwrap(),
            );
            prop_assert!(close(&step, &direct));
        }
    }
}
