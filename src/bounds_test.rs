#![allow(clippy::float_cmp)]

use super::*;

fn bbox(sw: (f64, f64), ne: (f64, f64)) -> BoundingBox {
    BoundingBox::from_corners(sw, ne)
}

// =============================================================
// enclosing
// =============================================================

#[test]
fn enclosing_empty_is_none() {
    assert!(BoundingBox::enclosing(&[]).is_none());
}

#[test]
fn enclosing_single_point_is_degenerate() {
    let b = BoundingBox::enclosing(&[[2.0, 48.0]]).unwrap();
    assert_eq!(b.min_lat, 48.0);
    assert_eq!(b.max_lat, 48.0);
    assert_eq!(b.min_lng, 2.0);
    assert_eq!(b.max_lng, 2.0);
}

#[test]
fn enclosing_reads_positions_as_lng_lat() {
    let ring = [[1.0, 10.0], [3.0, 12.0], [2.0, 11.0], [1.0, 10.0]];
    let b = BoundingBox::enclosing(&ring).unwrap();
    assert_eq!(b, bbox((10.0, 1.0), (12.0, 3.0)));
}

#[test]
fn enclosing_handles_negative_coordinates() {
    let ring = [[-5.0, -3.0], [4.0, 7.0], [-1.0, 0.0]];
    let b = BoundingBox::enclosing(&ring).unwrap();
    assert_eq!(b, bbox((-3.0, -5.0), (7.0, 4.0)));
}

// =============================================================
// contains / overlaps
// =============================================================

#[test]
fn contains_inner_box() {
    let outer = bbox((0.0, 0.0), (10.0, 10.0));
    assert!(outer.contains(&bbox((5.0, 5.0), (6.0, 6.0))));
    assert!(!bbox((5.0, 5.0), (6.0, 6.0)).contains(&outer));
}

#[test]
fn contains_is_edge_inclusive() {
    let outer = bbox((0.0, 0.0), (10.0, 10.0));
    assert!(outer.contains(&outer));
}

#[test]
fn overlaps_requires_both_axes() {
    let a = bbox((0.0, 0.0), (10.0, 10.0));
    // lat overlaps, lng does not
    assert!(!a.overlaps(&bbox((5.0, 20.0), (6.0, 30.0))));
    // lng overlaps, lat does not
    assert!(!a.overlaps(&bbox((20.0, 5.0), (30.0, 6.0))));
    assert!(a.overlaps(&bbox((5.0, 5.0), (15.0, 15.0))));
}

#[test]
fn overlaps_touching_edge() {
    let a = bbox((0.0, 0.0), (10.0, 10.0));
    assert!(a.overlaps(&bbox((10.0, 10.0), (20.0, 20.0))));
}

#[test]
fn center_is_midpoint() {
    assert_eq!(bbox((0.0, 2.0), (10.0, 4.0)).center(), (5.0, 3.0));
}

// =============================================================
// intersects
// =============================================================

#[test]
fn intersects_excludes_far_away_geometry() {
    let viewport = bbox((0.0, 0.0), (10.0, 10.0));
    assert!(!intersects(&bbox((20.0, 20.0), (30.0, 30.0)), &viewport));
}

#[test]
fn intersects_includes_contained_geometry() {
    let viewport = bbox((0.0, 0.0), (10.0, 10.0));
    assert!(intersects(&bbox((5.0, 5.0), (6.0, 6.0)), &viewport));
}

#[test]
fn intersects_includes_straddling_geometry() {
    let viewport = bbox((0.0, 0.0), (10.0, 10.0));
    assert!(intersects(&bbox((8.0, -4.0), (14.0, 3.0)), &viewport));
}

#[test]
fn intersects_includes_geometry_larger_than_viewport() {
    let viewport = bbox((4.0, 4.0), (5.0, 5.0));
    assert!(intersects(&bbox((0.0, 0.0), (10.0, 10.0)), &viewport));
}

#[test]
fn intersects_symmetric_for_identical_boxes() {
    let a = bbox((1.0, 1.0), (2.0, 2.0));
    let b = a;
    assert_eq!(intersects(&a, &b), intersects(&b, &a));
    assert!(intersects(&a, &b));
}

#[test]
fn intersects_symmetric_for_containment() {
    let outer = bbox((0.0, 0.0), (10.0, 10.0));
    let inner = bbox((2.0, 2.0), (3.0, 3.0));
    assert_eq!(intersects(&outer, &inner), intersects(&inner, &outer));
    assert!(intersects(&inner, &outer));
}
