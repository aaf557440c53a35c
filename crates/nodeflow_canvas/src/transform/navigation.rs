// SPDX-License-Identifier: MIT OR Apache-2.0
//! Gesture entry points: pan and zoom through the preprocessor chain.

use super::ops::{move_viewport, scale_viewport};
use super::preprocess::{PreprocessParams, TransformPreprocessor};
use super::{TransformMatrix, TransformState, Viewport};
use crate::error::TransformError;

/// Turns pan/zoom deltas into viewport patches
pub struct Navigator {
    preprocessor: Box<dyn TransformPreprocessor>,
}

impl Navigator {
    /// Create a navigator with the given preprocessor
    pub fn new(preprocessor: impl TransformPreprocessor + 'static) -> Self {
        Self {
            preprocessor: Box::new(preprocessor),
        }
    }

    /// Move the camera by a screen-space delta
    pub fn pan(
        &self,
        viewport: &mut Viewport,
        dx: f64,
        dy: f64,
    ) -> Result<TransformState, TransformError> {
        let next = move_viewport(&viewport.viewport_matrix(), dx, dy);
        self.apply(viewport, next)
    }

    /// Zoom the camera about a screen point.
    ///
    /// A `factor` above one zooms out (more content per pixel).
    pub fn zoom_at(
        &self,
        viewport: &mut Viewport,
        factor: f64,
        cx: f64,
        cy: f64,
    ) -> Result<TransformState, TransformError> {
        let next = scale_viewport(&viewport.viewport_matrix(), factor, cx, cy)?;
        self.apply(viewport, next)
    }

    fn apply(
        &self,
        viewport: &mut Viewport,
        next: TransformMatrix,
    ) -> Result<TransformState, TransformError> {
        let size = viewport.size();
        let processed = self.preprocessor.process(&PreprocessParams {
            prev_transform: viewport.viewport_matrix(),
            next_transform: next,
            viewport_width: size.width,
            viewport_height: size.height,
        });
        if let Err(err) = processed.validate() {
            tracing::warn!("Preprocessor produced an invalid transform: {}", err);
            return Err(err);
        }
        viewport.patch_viewport_matrix(processed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::preprocess::{CombinedPreprocessor, ScaleLimitPreprocessor};

    #[test]
    fn test_pan_and_zoom() {
        let navigator = Navigator::new(CombinedPreprocessor::new());
        let mut viewport = Viewport::new();
        viewport.set_size(200.0, 100.0);

        navigator.pan(&mut viewport, 10.0, 5.0).unwrap();
        navigator.zoom_at(&mut viewport, 2.0, 0.0, 0.0).unwrap();

        let matrix = viewport.viewport_matrix();
        assert_eq!(matrix.scale, 2.0);
        assert_eq!(matrix.x, 10.0);
        assert_eq!(matrix.y, 5.0);
    }

    #[test]
    fn test_zoom_respects_limits() {
        let navigator = Navigator::new(ScaleLimitPreprocessor {
            min_content_scale: Some(0.5),
            max_content_scale: Some(2.0),
        });
        let mut viewport = Viewport::new();

        for _ in 0..10 {
            navigator.zoom_at(&mut viewport, 1.5, 50.0, 50.0).unwrap();
        }
        assert!((viewport.content_matrix().scale - 0.5).abs() < 1e-9);

        for _ in 0..20 {
            navigator.zoom_at(&mut viewport, 0.5, 50.0, 50.0).unwrap();
        }
        assert!((viewport.content_matrix().scale - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_preprocessor_output_rejected() {
        let navigator = Navigator::new(|p: &PreprocessParams| TransformMatrix {
            scale: 0.0,
            ..p.next_transform
        });
        let mut viewport = Viewport::new();
        assert!(navigator.pan(&mut viewport, 1.0, 1.0).is_err());
        assert_eq!(viewport.viewport_matrix(), TransformMatrix::IDENTITY);
    }
}
