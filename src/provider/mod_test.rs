use serde_json::json;

use super::*;

fn record(geometry: serde_json::Value) -> AreaRecord {
    AreaRecord { id_area: Some(1), area_name: None, geometry }
}

#[test]
fn area_type_deserializes_geonature_fields() {
    let t: AreaType = serde_json::from_value(json!({
        "id_type": 25,
        "type_name": "Communes",
        "type_code": "COM",
        "zoom_min": 10
    }))
    .unwrap();
    assert_eq!(t.id, 25);
    assert_eq!(t.label, "Communes");
    assert_eq!(t.zoom_min, Some(10.0));
}

#[test]
fn area_type_without_zoom_min_has_no_floor() {
    let t: AreaType = serde_json::from_value(json!({"id_type": 3, "zoom_min": null})).unwrap();
    assert_eq!(t.zoom_min, None);
    assert_eq!(t.label, "");
}

#[test]
fn area_record_accepts_geojson_4326_alias() {
    let r: AreaRecord = serde_json::from_value(json!({
        "id_area": 7,
        "area_name": "Ariège",
        "geojson_4326": "{\"type\":\"Polygon\",\"coordinates\":[]}"
    }))
    .unwrap();
    assert_eq!(r.id_area, Some(7));
    assert!(r.geometry.is_string());
}

#[test]
fn query_for_type_targets_single_type() {
    let q = AreaQuery::for_type(4, 100, true);
    assert_eq!(q.type_ids, vec![4]);
    assert!(q.area_name.is_none());
    assert_eq!(q.limit, 100);
    assert!(q.simplify);
}

#[test]
fn validate_keeps_good_and_counts_bad() {
    let records = vec![
        record(json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 1], [0, 0]]]})),
        record(json!("not geojson")),
        record(json!({"type": "Point", "coordinates": [0, 0]})),
        record(json!("{\"type\":\"MultiPolygon\",\"coordinates\":[[[[0,0],[1,1],[0,0]]]]}")),
    ];
    let validated = validate_records(1, records);
    assert_eq!(validated.geometries.len(), 2);
    assert_eq!(validated.skipped, 2);
}

#[test]
fn validate_empty_is_empty() {
    let validated = validate_records(1, vec![]);
    assert_eq!(validated, ValidatedAreas::default());
}

#[test]
fn provider_error_codes_and_retry() {
    assert_eq!(ProviderError::Request("x".into()).error_code(), "E_AREA_REQUEST");
    assert!(ProviderError::Request("x".into()).retryable());
    assert!(ProviderError::Response { status: 503, body: String::new() }.retryable());
    assert!(ProviderError::Response { status: 429, body: String::new() }.retryable());
    assert!(!ProviderError::Response { status: 404, body: String::new() }.retryable());
    assert!(!ProviderError::Parse("x".into()).retryable());
}
