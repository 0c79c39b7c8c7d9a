#![allow(clippy::float_cmp)]

use super::*;

fn square(min: f64, max: f64) -> BoundingBox {
    BoundingBox::from_corners((min, min), (max, max))
}

#[test]
fn tracker_reports_initial_viewport() {
    let t = ViewportTracker::new(Viewport::new(square(0.0, 10.0), 8.0));
    assert_eq!(t.current_bounds(), square(0.0, 10.0));
    assert_eq!(t.zoom(), 8.0);
}

#[test]
fn update_replaces_bounds_and_zoom() {
    let mut t = ViewportTracker::new(Viewport::new(square(0.0, 10.0), 8.0));
    t.update(Viewport::new(square(20.0, 30.0), 13.0));
    assert_eq!(t.current_bounds(), square(20.0, 30.0));
    assert_eq!(t.zoom(), 13.0);
}

#[test]
fn update_accepts_inverted_bounds_without_validation() {
    let mut t = ViewportTracker::new(Viewport::new(square(0.0, 10.0), 8.0));
    let inverted = BoundingBox::from_corners((10.0, 10.0), (0.0, 0.0));
    t.update(Viewport::new(inverted, 3.0));
    assert_eq!(t.current_bounds(), inverted);
}

#[test]
fn extent_defaults_center_to_bounds_midpoint() {
    let t = ViewportTracker::new(Viewport::new(square(0.0, 10.0), 4.0));
    assert_eq!(t.extent(), ((5.0, 5.0), 4.0));
}

#[test]
fn extent_prefers_reported_center() {
    let t = ViewportTracker::new(Viewport::new(square(0.0, 10.0), 4.0).with_center(1.0, 2.0));
    assert_eq!(t.extent(), ((1.0, 2.0), 4.0));
}

#[test]
fn viewport_deserializes_without_center() {
    let raw = r#"{"bounds":{"min_lat":0,"max_lat":1,"min_lng":0,"max_lng":1},"zoom":5}"#;
    let v: Viewport = serde_json::from_str(raw).unwrap();
    assert_eq!(v.zoom, 5.0);
    assert!(v.center.is_none());
}
