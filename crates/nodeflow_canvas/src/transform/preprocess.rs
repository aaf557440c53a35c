// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transform preprocessors.
//!
//! A preprocessor sees a proposed viewport matrix and returns the one that is
//! actually applied. Gesture handling runs the configured chain before every
//! patch.

use super::TransformMatrix;

/// Input to a preprocessor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessParams {
    /// Viewport matrix currently applied
    pub prev_transform: TransformMatrix,
    /// Viewport matrix proposed by the gesture
    pub next_transform: TransformMatrix,
    /// Viewport width in screen pixels
    pub viewport_width: f64,
    /// Viewport height in screen pixels
    pub viewport_height: f64,
}

/// Rewrites a proposed viewport matrix
pub trait TransformPreprocessor {
    /// Return the matrix to apply
    fn process(&self, params: &PreprocessParams) -> TransformMatrix;
}

impl<F> TransformPreprocessor for F
where
    F: Fn(&PreprocessParams) -> TransformMatrix,
{
    fn process(&self, params: &PreprocessParams) -> TransformMatrix {
        self(params)
    }
}

/// Clamps the zoom level seen by the user (the content scale)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScaleLimitPreprocessor {
    /// Smallest content scale (furthest zoomed out)
    pub min_content_scale: Option<f64>,
    /// Largest content scale (furthest zoomed in)
    pub max_content_scale: Option<f64>,
}

impl TransformPreprocessor for ScaleLimitPreprocessor {
    fn process(&self, params: &PreprocessParams) -> TransformMatrix {
        let prev = params.prev_transform;
        let next = params.next_transform;
        let mut target = next.scale;

        // Content limits are reciprocal viewport limits.
        if let Some(min_content) = self.min_content_scale {
            let max_viewport = 1.0 / min_content;
            if next.scale > max_viewport && next.scale > prev.scale {
                target = prev.scale.max(max_viewport);
            }
        }
        if let Some(max_content) = self.max_content_scale {
            let min_viewport = 1.0 / max_content;
            if next.scale < min_viewport && next.scale < prev.scale {
                target = prev.scale.min(min_viewport);
            }
        }

        if target == next.scale {
            return next;
        }

        // Translation is linear in scale along a zoom about a fixed point, so
        // interpolating keeps the gesture's focal point in place.
        let ratio = (target - prev.scale) / (next.scale - prev.scale);
        TransformMatrix {
            scale: target,
            x: prev.x + (next.x - prev.x) * ratio,
            y: prev.y + (next.y - prev.y) * ratio,
        }
    }
}

/// Keeps the visible content area within bounds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShiftLimitPreprocessor {
    /// Smallest visible content x
    pub min_x: Option<f64>,
    /// Largest visible content x
    pub max_x: Option<f64>,
    /// Smallest visible content y
    pub min_y: Option<f64>,
    /// Largest visible content y
    pub max_y: Option<f64>,
}

impl TransformPreprocessor for ShiftLimitPreprocessor {
    fn process(&self, params: &PreprocessParams) -> TransformMatrix {
        let next = params.next_transform;
        let visible_width = params.viewport_width * next.scale;
        let visible_height = params.viewport_height * next.scale;

        let mut x = next.x;
        if let Some(max_x) = self.max_x {
            if x + visible_width > max_x {
                x = max_x - visible_width;
            }
        }
        if let Some(min_x) = self.min_x {
            if x < min_x {
                x = min_x;
            }
        }

        let mut y = next.y;
        if let Some(max_y) = self.max_y {
            if y + visible_height > max_y {
                y = max_y - visible_height;
            }
        }
        if let Some(min_y) = self.min_y {
            if y < min_y {
                y = min_y;
            }
        }

        TransformMatrix {
            scale: next.scale,
            x,
            y,
        }
    }
}

/// Runs preprocessors in sequence, each seeing the previous one's output
#[derive(Default)]
pub struct CombinedPreprocessor {
    steps: Vec<Box<dyn TransformPreprocessor>>,
}

impl CombinedPreprocessor {
    /// Create an empty chain (identity)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step
    pub fn with(mut self, step: impl TransformPreprocessor + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the chain is the identity
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl TransformPreprocessor for CombinedPreprocessor {
    fn process(&self, params: &PreprocessParams) -> TransformMatrix {
        self.steps.iter().fold(params.next_transform, |next, step| {
            step.process(&PreprocessParams {
                next_transform: next,
                ..*params
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::ops::scale_viewport;

    fn params(prev: TransformMatrix, next: TransformMatrix) -> PreprocessParams {
        PreprocessParams {
            prev_transform: prev,
            next_transform: next,
            viewport_width: 100.0,
            viewport_height: 50.0,
        }
    }

    #[test]
    fn test_scale_limit_passes_through_in_range() {
        let limit = ScaleLimitPreprocessor {
            min_content_scale: Some(0.5),
            max_content_scale: Some(4.0),
        };
        let prev = TransformMatrix::IDENTITY;
        let next = scale_viewport(&prev, 1.5, 10.0, 10.0).unwrap();
        assert_eq!(limit.process(&params(prev, next)), next);
    }

    #[test]
    fn test_scale_limit_clamps_and_keeps_focal_point() {
        let limit = ScaleLimitPreprocessor {
            min_content_scale: Some(0.5),
            max_content_scale: None,
        };
        let prev = TransformMatrix::IDENTITY;
        // Viewport scale 4 means content scale 0.25, below the limit.
        let next = scale_viewport(&prev, 4.0, 30.0, 20.0).unwrap();
        let applied = limit.process(&params(prev, next));
        let expected = scale_viewport(&prev, 2.0, 30.0, 20.0).unwrap();

        assert!((applied.scale - 2.0).abs() < 1e-12);
        assert!((applied.x - expected.x).abs() < 1e-9);
        assert!((applied.y - expected.y).abs() < 1e-9);
    }

    #[test]
    fn test_scale_limit_allows_moving_back_into_range() {
        let limit = ScaleLimitPreprocessor {
            min_content_scale: None,
            max_content_scale: Some(2.0),
        };
        // Already beyond the limit; zooming further in is allowed back.
        let prev = TransformMatrix::new(0.1, 0.0, 0.0).unwrap();
        let next = TransformMatrix::new(0.2, 0.0, 0.0).unwrap();
        assert_eq!(limit.process(&params(prev, next)), next);
    }

    #[test]
    fn test_shift_limit() {
        let limit = ShiftLimitPreprocessor {
            min_x: Some(0.0),
            max_x: Some(500.0),
            min_y: None,
            max_y: Some(100.0),
        };
        let prev = TransformMatrix::IDENTITY;
        let next = TransformMatrix::new(1.0, 450.0, 80.0).unwrap();
        let applied = limit.process(&params(prev, next));
        assert_eq!(applied, TransformMatrix::new(1.0, 400.0, 50.0).unwrap());

        let next = TransformMatrix::new(1.0, -20.0, -1000.0).unwrap();
        let applied = limit.process(&params(prev, next));
        assert_eq!(applied, TransformMatrix::new(1.0, 0.0, -1000.0).unwrap());
    }

    #[test]
    fn test_combined_threads_output() {
        let chain = CombinedPreprocessor::new()
            .with(|p: &PreprocessParams| TransformMatrix {
                x: p.next_transform.x + 1.0,
                ..p.next_transform
            })
            .with(|p: &PreprocessParams| TransformMatrix {
                x: p.next_transform.x * 10.0,
                ..p.next_transform
            });
        let prev = TransformMatrix::IDENTITY;
        let next = TransformMatrix::new(1.0, 2.0, 0.0).unwrap();
        assert_eq!(chain.process(&params(prev, next)).x, 30.0);
        assert_eq!(chain.len(), 2);
    }
}
