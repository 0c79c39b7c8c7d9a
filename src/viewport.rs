//! Visible extent of the host map.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;

/// Map extent reported on every move/zoom-end. Replaced wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub bounds: BoundingBox,
    pub zoom: f64,
    /// Map center as `(lat, lng)`. Defaults to the center of `bounds`.
    #[serde(default)]
    pub center: Option<(f64, f64)>,
}

impl Viewport {
    #[must_use]
    pub fn new(bounds: BoundingBox, zoom: f64) -> Self {
        Self { bounds, zoom, center: None }
    }

    #[must_use]
    pub fn with_center(mut self, lat: f64, lng: f64) -> Self {
        self.center = Some((lat, lng));
        self
    }

    /// Reported center, or the middle of the bounds when the host did not send one.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        self.center.unwrap_or_else(|| self.bounds.center())
    }
}

/// Holds the last reported viewport. No validation: whatever the host map
/// says is the truth.
#[derive(Debug, Clone)]
pub struct ViewportTracker {
    current: Viewport,
}

impl ViewportTracker {
    #[must_use]
    pub fn new(initial: Viewport) -> Self {
        Self { current: initial }
    }

    /// Replace the tracked viewport.
    pub fn update(&mut self, viewport: Viewport) {
        self.current = viewport;
    }

    #[must_use]
    pub fn current(&self) -> Viewport {
        self.current
    }

    #[must_use]
    pub fn current_bounds(&self) -> BoundingBox {
        self.current.bounds
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.current.zoom
    }

    /// Current extent as `(center, zoom)`.
    #[must_use]
    pub fn extent(&self) -> ((f64, f64), f64) {
        (self.current.center(), self.current.zoom)
    }
}
