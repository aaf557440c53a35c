// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera model.
//!
//! The camera is a similarity transform kept in two linked forms:
//! - the **viewport matrix** maps viewport (screen) coordinates to content
//!   coordinates: `content = screen * scale + (x, y)`
//! - the **content matrix** maps content coordinates back to the viewport,
//!   i.e. how the rendered container must be placed
//!
//! Either form may be patched; the other is always rederived through
//! [`content_from_viewport`] / [`viewport_from_content`].

pub mod navigation;
pub mod ops;
pub mod preprocess;

use crate::error::TransformError;
use nodeflow_graph::{EventHandler, Point};
use serde::{Deserialize, Serialize};

/// Uniform scale followed by a translation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformMatrix {
    /// Scale factor, always finite and positive
    pub scale: f64,
    /// Horizontal translation
    pub x: f64,
    /// Vertical translation
    pub y: f64,
}

impl TransformMatrix {
    /// The identity transform
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        x: 0.0,
        y: 0.0,
    };

    /// Create a transform, validating the scale and translation
    pub fn new(scale: f64, x: f64, y: f64) -> Result<Self, TransformError> {
        let matrix = Self { scale, x, y };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Check the scale is finite and positive and the translation finite
    pub fn validate(&self) -> Result<(), TransformError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(TransformError::InvalidScale(self.scale));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(TransformError::InvalidTranslation(self.x, self.y));
        }
        Ok(())
    }

    /// Merge a patch; omitted fields keep their value
    pub fn patched(&self, patch: TransformPatch) -> Result<Self, TransformError> {
        Self::new(
            patch.scale.unwrap_or(self.scale),
            patch.x.unwrap_or(self.x),
            patch.y.unwrap_or(self.y),
        )
    }

    /// Map a point through the transform
    pub fn apply(&self, point: Point) -> Point {
        Point::new(point.x * self.scale + self.x, point.y * self.scale + self.y)
    }
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Partial transform; `None` fields are left unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformPatch {
    /// New scale
    pub scale: Option<f64>,
    /// New horizontal translation
    pub x: Option<f64>,
    /// New vertical translation
    pub y: Option<f64>,
}

impl TransformPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scale
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Set the horizontal translation
    pub fn x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    /// Set the vertical translation
    pub fn y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }
}

impl From<TransformMatrix> for TransformPatch {
    fn from(matrix: TransformMatrix) -> Self {
        Self {
            scale: Some(matrix.scale),
            x: Some(matrix.x),
            y: Some(matrix.y),
        }
    }
}

/// Derive the content matrix from a viewport matrix
pub fn content_from_viewport(viewport: &TransformMatrix) -> TransformMatrix {
    TransformMatrix {
        scale: 1.0 / viewport.scale,
        x: -viewport.x / viewport.scale,
        y: -viewport.y / viewport.scale,
    }
}

/// Derive the viewport matrix from a content matrix
pub fn viewport_from_content(content: &TransformMatrix) -> TransformMatrix {
    // The relation is an involution.
    content_from_viewport(content)
}

/// Both representations of the current camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    /// Viewport to content
    pub viewport: TransformMatrix,
    /// Content to viewport
    pub content: TransformMatrix,
}

impl TransformState {
    /// Build from a viewport matrix
    pub fn from_viewport(viewport: TransformMatrix) -> Result<Self, TransformError> {
        viewport.validate()?;
        let content = content_from_viewport(&viewport);
        content.validate()?;
        Ok(Self { viewport, content })
    }

    /// Build from a content matrix
    pub fn from_content(content: TransformMatrix) -> Result<Self, TransformError> {
        content.validate()?;
        let viewport = viewport_from_content(&content);
        viewport.validate()?;
        Ok(Self { viewport, content })
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            viewport: TransformMatrix::IDENTITY,
            content: TransformMatrix::IDENTITY,
        }
    }
}

/// Viewport size in screen pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

/// Camera state store publishing an event after every change
#[derive(Default)]
pub struct Viewport {
    state: TransformState,
    size: ViewportSize,
    after_updated: EventHandler<TransformState>,
    after_resized: EventHandler<ViewportSize>,
}

impl Viewport {
    /// Create a viewport at the identity transform with zero size
    pub fn new() -> Self {
        Self::default()
    }

    /// Current viewport matrix
    pub fn viewport_matrix(&self) -> TransformMatrix {
        self.state.viewport
    }

    /// Current content matrix
    pub fn content_matrix(&self) -> TransformMatrix {
        self.state.content
    }

    /// Both matrices
    pub fn state(&self) -> TransformState {
        self.state
    }

    /// Current size
    pub fn size(&self) -> ViewportSize {
        self.size
    }

    /// Merge a patch into the viewport matrix and rederive the content matrix
    pub fn patch_viewport_matrix(
        &mut self,
        patch: TransformPatch,
    ) -> Result<TransformState, TransformError> {
        let viewport = self.state.viewport.patched(patch)?;
        self.state = TransformState::from_viewport(viewport)?;
        tracing::trace!("Viewport matrix patched: {:?}", self.state.viewport);
        self.after_updated.emit(&self.state);
        Ok(self.state)
    }

    /// Merge a patch into the content matrix and rederive the viewport matrix
    pub fn patch_content_matrix(
        &mut self,
        patch: TransformPatch,
    ) -> Result<TransformState, TransformError> {
        let content = self.state.content.patched(patch)?;
        self.state = TransformState::from_content(content)?;
        tracing::trace!("Content matrix patched: {:?}", self.state.content);
        self.after_updated.emit(&self.state);
        Ok(self.state)
    }

    /// Record a new viewport size
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.size = ViewportSize { width, height };
        self.after_resized.emit(&self.size);
    }

    /// Fired after either matrix changes
    pub fn on_after_updated(&mut self) -> &mut EventHandler<TransformState> {
        &mut self.after_updated
    }

    /// Fired after the size changes
    pub fn on_after_resized(&mut self) -> &mut EventHandler<ViewportSize> {
        &mut self.after_resized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_patches_merge_instead_of_resetting() {
        let mut viewport = Viewport::new();
        viewport
            .patch_viewport_matrix(TransformPatch::new().scale(2.0))
            .unwrap();
        viewport
            .patch_viewport_matrix(TransformPatch::new().x(5.0))
            .unwrap();

        let matrix = viewport.viewport_matrix();
        assert_eq!(matrix.scale, 2.0);
        assert_eq!(matrix.x, 5.0);
        assert_eq!(matrix.y, 0.0);
    }

    #[test]
    fn test_content_matrix_is_inverse() {
        let mut viewport = Viewport::new();
        viewport
            .patch_viewport_matrix(TransformPatch::new().scale(2.0).x(10.0).y(-4.0))
            .unwrap();

        let content = viewport.content_matrix();
        assert!((content.scale - 0.5).abs() < EPS);
        assert!((content.x + 5.0).abs() < EPS);
        assert!((content.y - 2.0).abs() < EPS);

        let screen = Point::new(3.0, 7.0);
        let back = content.apply(viewport.viewport_matrix().apply(screen));
        assert!(back.distance(screen) < EPS);
    }

    #[test]
    fn test_patch_content_updates_viewport() {
        let mut viewport = Viewport::new();
        viewport
            .patch_content_matrix(TransformPatch::new().scale(4.0).x(8.0))
            .unwrap();

        let matrix = viewport.viewport_matrix();
        assert!((matrix.scale - 0.25).abs() < EPS);
        assert!((matrix.x + 2.0).abs() < EPS);
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let mut viewport = Viewport::new();
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = viewport
                .patch_viewport_matrix(TransformPatch::new().scale(scale))
                .unwrap_err();
            assert!(matches!(err, TransformError::InvalidScale(_)));
        }
        assert_eq!(viewport.viewport_matrix(), TransformMatrix::IDENTITY);
    }

    #[test]
    fn test_single_event_per_patch() {
        let mut viewport = Viewport::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        viewport
            .on_after_updated()
            .subscribe(move |state| sink.borrow_mut().push(*state));

        viewport
            .patch_viewport_matrix(TransformPatch::new().scale(2.0))
            .unwrap();
        viewport
            .patch_content_matrix(TransformPatch::new().x(1.0))
            .unwrap();

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].viewport.scale, 2.0);
        assert_eq!(events[1].content.x, 1.0);
        assert_eq!(events[1].content.scale, 0.5);
    }
}
