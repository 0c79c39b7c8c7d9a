#![allow(clippy::float_cmp)]

use super::*;
use crate::compositor::{FeatureProperties, feature_style};
use crate::geometry::Geometry;

fn viewport() -> Viewport {
    Viewport::new(BoundingBox::from_corners((0.0, 0.0), (10.0, 20.0)), 9.0)
}

fn collection(n: usize) -> FeatureCollection {
    let features = (0..n)
        .map(|_| Feature {
            kind: "Feature",
            geometry: Geometry::Polygon(vec![vec![[1.0, 1.0], [2.0, 2.0], [1.0, 1.0]]]),
            properties: FeatureProperties { name: "Multipolygon", type_id: 1, style: FeatureStyle::area("#000000") },
        })
        .collect();
    FeatureCollection::new(features)
}

#[test]
fn reports_its_viewport() {
    let r = GeoJsonRenderer::new(Vec::new(), viewport());
    assert_eq!(r.current_zoom(), 9.0);
    assert_eq!(r.current_center(), (5.0, 10.0));
    assert_eq!(r.viewport().center, Some((5.0, 10.0)));
}

#[test]
fn set_viewport_moves_map() {
    let mut r = GeoJsonRenderer::new(Vec::new(), viewport());
    r.set_viewport(Viewport::new(BoundingBox::from_corners((1.0, 1.0), (2.0, 2.0)), 15.0).with_center(1.2, 1.8));
    assert_eq!(r.current_zoom(), 15.0);
    assert_eq!(r.current_center(), (1.2, 1.8));
}

#[test]
fn add_layer_writes_one_json_line() {
    let mut r = GeoJsonRenderer::new(Vec::new(), viewport());
    let h = r.add_layer(&collection(2), feature_style);
    assert_eq!(h, LayerHandle(1));

    let out = String::from_utf8(r.into_inner()).unwrap();
    assert_eq!(out.lines().count(), 1);
    let v: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
    assert_eq!(v["layer"], 1);
    assert_eq!(v["collection"]["features"].as_array().unwrap().len(), 2);
}

#[test]
fn remove_layer_drops_live_layer() {
    let mut r = GeoJsonRenderer::new(Vec::new(), viewport());
    let a = r.add_layer(&collection(1), feature_style);
    let b = r.add_layer(&collection(3), feature_style);
    r.remove_layer(a);
    assert_eq!(r.live_layers().len(), 1);
    assert_eq!(r.live_layers().get(&b), Some(&3));
    // unknown handle is logged, not fatal
    r.remove_layer(LayerHandle(99));
    assert_eq!(r.live_layers().len(), 1);
}

#[test]
fn invalidate_size_counts() {
    let mut r = GeoJsonRenderer::new(Vec::new(), viewport());
    r.invalidate_size();
    r.invalidate_size();
    assert_eq!(r.invalidations(), 2);
}

#[test]
fn install_basemaps_keeps_order() {
    let mut r = GeoJsonRenderer::new(Vec::new(), viewport());
    let mut second = Basemap::openstreetmap();
    second.name = "Ortho".into();
    r.install_basemaps(&[Basemap::openstreetmap(), second]);
    assert_eq!(r.basemaps(), &["OpenStreetMap".to_string(), "Ortho".to_string()]);
}
