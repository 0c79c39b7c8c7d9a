//! Axis-aligned bounding boxes and the viewport overlap test.
//!
//! Boxes are in geographic degrees. Edges are inclusive: a geometry touching
//! the viewport border counts as visible, matching how the host map library
//! compares its own bounds.

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;

use serde::{Deserialize, Serialize};

use crate::geometry::Position;

/// `[min_lat, max_lat] × [min_lng, max_lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Build a box from its south-west and north-east corners, given as `(lat, lng)`.
    #[must_use]
    pub fn from_corners(south_west: (f64, f64), north_east: (f64, f64)) -> Self {
        Self { min_lat: south_west.0, max_lat: north_east.0, min_lng: south_west.1, max_lng: north_east.1 }
    }

    /// Enclose a list of `[lng, lat]` positions with a single linear scan.
    ///
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn enclosing(positions: &[Position]) -> Option<Self> {
        let (first, rest) = positions.split_first()?;
        let mut bbox = Self { min_lat: first[1], max_lat: first[1], min_lng: first[0], max_lng: first[0] };
        for &[lng, lat] in rest {
            bbox.min_lat = bbox.min_lat.min(lat);
            bbox.max_lat = bbox.max_lat.max(lat);
            bbox.min_lng = bbox.min_lng.min(lng);
            bbox.max_lng = bbox.max_lng.max(lng);
        }
        Some(bbox)
    }

    /// Whether `other` lies entirely inside this box.
    #[must_use]
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.min_lat >= self.min_lat
            && other.max_lat <= self.max_lat
            && other.min_lng >= self.min_lng
            && other.max_lng <= self.max_lng
    }

    /// Whether the two boxes overlap on both axes.
    #[must_use]
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        let lat = other.max_lat >= self.min_lat && other.min_lat <= self.max_lat;
        let lng = other.max_lng >= self.min_lng && other.min_lng <= self.max_lng;
        lat && lng
    }

    /// Center of the box as `(lat, lng)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        ((self.min_lat + self.max_lat) / 2.0, (self.min_lng + self.max_lng) / 2.0)
    }
}

/// Whether a geometry with bounding box `geometry` should be drawn in `viewport`.
///
/// True when the viewport contains the geometry's box or the two overlap.
#[must_use]
pub fn intersects(geometry: &BoundingBox, viewport: &BoundingBox) -> bool {
    viewport.contains(geometry) || viewport.overlaps(geometry)
}
