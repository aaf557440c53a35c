// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rendering box scheduling.
//!
//! Viewport updates arrive far more often than the windowing engine needs
//! to rescan. The scheduler coalesces them, emitting a box once updates have
//! been quiet for the debounce period, or immediately after a zoom that left
//! the loaded area. Time is passed in explicitly so no timer thread exists.

use crate::rendering_box::RenderingBox;
use crate::transform::TransformMatrix;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Quiet period before a pending box is emitted (milliseconds)
    pub debounce_ms: u64,
    /// Extra area loaded around the viewport, in screen pixels
    pub margin: f64,
    /// Relative scale change below which a zoom counts as no zoom
    pub scale_tolerance: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            margin: 200.0,
            scale_tolerance: 1e-9,
        }
    }
}

impl SchedulerConfig {
    /// Debounce period as a duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingBox {
    rendering_box: RenderingBox,
    due: Instant,
}

/// Turns viewport updates into rendering box emissions
#[derive(Debug, Clone)]
pub struct RenderingBoxScheduler {
    config: SchedulerConfig,
    last_emitted: Option<RenderingBox>,
    last_scale: Option<f64>,
    pending: Option<PendingBox>,
}

impl RenderingBoxScheduler {
    /// Create a scheduler that has emitted nothing yet
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            last_emitted: None,
            last_scale: None,
            pending: None,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// The box most recently handed out
    pub fn last_emitted(&self) -> Option<RenderingBox> {
        self.last_emitted
    }

    /// Whether a box is waiting for its debounce period
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending box becomes due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.due)
    }

    /// The viewport area plus margin, in content space
    pub fn target_box(&self, viewport: &TransformMatrix, width: f64, height: f64) -> RenderingBox {
        let margin = self.config.margin * viewport.scale;
        RenderingBox::from_viewport(viewport, width, height).expanded(margin, margin)
    }

    /// Feed a viewport change. Returns a box to apply right away, if any;
    /// otherwise the box is held until [`poll`](Self::poll) finds it due.
    pub fn on_viewport_updated(
        &mut self,
        viewport: &TransformMatrix,
        width: f64,
        height: f64,
        now: Instant,
    ) -> Option<RenderingBox> {
        let target = self.target_box(viewport, width, height);
        let scale_changed = self.last_scale.map_or(true, |scale| {
            (scale - viewport.scale).abs() > self.config.scale_tolerance * scale
        });
        self.last_scale = Some(viewport.scale);

        let covered = self
            .last_emitted
            .is_some_and(|loaded| loaded.contains_box(&target));

        if self.last_emitted.is_none() || (scale_changed && !covered) {
            self.pending = None;
            return self.emit(target);
        }

        self.pending = Some(PendingBox {
            rendering_box: target,
            due: now + self.config.debounce(),
        });
        None
    }

    /// Emit the pending box if its debounce period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<RenderingBox> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;
        self.emit(pending.rendering_box)
    }

    /// Emit the pending box regardless of time
    pub fn flush(&mut self) -> Option<RenderingBox> {
        let pending = self.pending.take()?;
        self.emit(pending.rendering_box)
    }

    /// Forget all history, as after a clear
    pub fn reset(&mut self) {
        self.last_emitted = None;
        self.last_scale = None;
        self.pending = None;
    }

    fn emit(&mut self, rendering_box: RenderingBox) -> Option<RenderingBox> {
        if self.last_emitted == Some(rendering_box) {
            return None;
        }
        tracing::trace!("Emitting rendering box {:?}", rendering_box);
        self.last_emitted = Some(rendering_box);
        Some(rendering_box)
    }
}

impl Default for RenderingBoxScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> RenderingBoxScheduler {
        RenderingBoxScheduler::new(SchedulerConfig {
            debounce_ms: 50,
            margin: 10.0,
            scale_tolerance: 1e-9,
        })
    }

    #[test]
    fn test_first_update_emits_immediately() {
        let mut scheduler = scheduler();
        let now = Instant::now();
        let emitted = scheduler.on_viewport_updated(&TransformMatrix::IDENTITY, 100.0, 50.0, now);
        assert_eq!(emitted, Some(RenderingBox::new(-10.0, -10.0, 120.0, 70.0)));
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn test_pan_is_debounced() {
        let mut scheduler = scheduler();
        let start = Instant::now();
        scheduler.on_viewport_updated(&TransformMatrix::IDENTITY, 100.0, 50.0, start);

        let panned = TransformMatrix::new(1.0, 5.0, 0.0).unwrap();
        assert!(scheduler.on_viewport_updated(&panned, 100.0, 50.0, start).is_none());
        assert_eq!(scheduler.next_deadline(), Some(start + Duration::from_millis(50)));
        assert!(scheduler.poll(start + Duration::from_millis(10)).is_none());

        let emitted = scheduler.poll(start + Duration::from_millis(50));
        assert_eq!(emitted, Some(RenderingBox::new(-5.0, -10.0, 120.0, 70.0)));
        assert_eq!(scheduler.next_deadline(), None);
        assert!(scheduler.poll(start + Duration::from_millis(500)).is_none());
    }

    #[test]
    fn test_newer_update_supersedes_pending() {
        let mut scheduler = scheduler();
        let start = Instant::now();
        scheduler.on_viewport_updated(&TransformMatrix::IDENTITY, 100.0, 50.0, start);

        let first = TransformMatrix::new(1.0, 5.0, 0.0).unwrap();
        let second = TransformMatrix::new(1.0, 7.0, 0.0).unwrap();
        scheduler.on_viewport_updated(&first, 100.0, 50.0, start);
        scheduler.on_viewport_updated(&second, 100.0, 50.0, start + Duration::from_millis(40));

        // The deadline moved with the newer update.
        assert!(scheduler.poll(start + Duration::from_millis(60)).is_none());
        let emitted = scheduler.poll(start + Duration::from_millis(90));
        assert_eq!(emitted.map(|rb| rb.x), Some(-3.0));
    }

    #[test]
    fn test_zoom_out_past_loaded_area_emits_immediately() {
        let mut scheduler = scheduler();
        let now = Instant::now();
        scheduler.on_viewport_updated(&TransformMatrix::IDENTITY, 100.0, 50.0, now);

        let zoomed_out = TransformMatrix::new(2.0, 0.0, 0.0).unwrap();
        let emitted = scheduler.on_viewport_updated(&zoomed_out, 100.0, 50.0, now);
        assert_eq!(emitted, Some(RenderingBox::new(-20.0, -20.0, 240.0, 140.0)));
    }

    #[test]
    fn test_zoom_in_within_loaded_area_is_debounced() {
        let mut scheduler = scheduler();
        let now = Instant::now();
        scheduler.on_viewport_updated(&TransformMatrix::IDENTITY, 100.0, 50.0, now);

        let zoomed_in = TransformMatrix::new(0.5, 10.0, 5.0).unwrap();
        assert!(scheduler.on_viewport_updated(&zoomed_in, 100.0, 50.0, now).is_none());
        assert!(scheduler.flush().is_some());
        assert!(scheduler.flush().is_none());
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut scheduler = scheduler();
        let now = Instant::now();
        scheduler.on_viewport_updated(&TransformMatrix::IDENTITY, 100.0, 50.0, now);
        scheduler.reset();
        assert!(scheduler.last_emitted().is_none());
        assert!(scheduler
            .on_viewport_updated(&TransformMatrix::IDENTITY, 100.0, 50.0, now)
            .is_some());
    }
}
