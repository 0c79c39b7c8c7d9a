#![allow(clippy::float_cmp)]

use super::*;

fn geometries(n: usize) -> Vec<Geometry> {
    (0..n).map(|i| Geometry::Polygon(vec![vec![[i as f64, 0.0], [i as f64, 1.0]]])).collect()
}

fn types() -> Vec<AreaType> {
    vec![
        AreaType { id: 1, zoom_min: Some(12.0), label: "Communes".into() },
        AreaType { id: 2, zoom_min: None, label: "Départements".into() },
    ]
}

fn enable(reg: &mut LayerRegistry, type_id: TypeId, n: usize) {
    let ToggleOutcome::FetchRequired(ticket) = reg.request(type_id, true, 20.0) else {
        panic!("expected fetch for {type_id}");
    };
    assert_eq!(reg.complete(type_id, ticket, geometries(n)), Completion::Inserted);
}

// =============================================================
// Zoom floor
// =============================================================

#[test]
fn zoom_min_lookup() {
    let mut reg = LayerRegistry::new();
    reg.set_area_types(types());
    assert_eq!(reg.zoom_min(1), Some(12.0));
    assert_eq!(reg.zoom_min(2), None);
    assert_eq!(reg.zoom_min(99), None);
    assert_eq!(reg.area_type(2).map(|t| t.label.as_str()), Some("Départements"));
}

#[test]
fn request_below_floor_is_rejected_without_state_change() {
    let mut reg = LayerRegistry::new();
    reg.set_area_types(types());
    assert_eq!(reg.request(1, true, 8.0), ToggleOutcome::Rejected { zoom_min: 12.0, zoom: 8.0 });
    assert!(reg.is_empty());
    assert!(!reg.is_pending(1));
}

#[test]
fn request_without_floor_always_fetches() {
    let mut reg = LayerRegistry::new();
    reg.set_area_types(types());
    assert!(matches!(reg.request(2, true, 0.0), ToggleOutcome::FetchRequired(_)));
    assert!(matches!(reg.request(99, true, 0.0), ToggleOutcome::FetchRequired(_)));
}

#[test]
fn disable_ignores_zoom_floor() {
    let mut reg = LayerRegistry::new();
    reg.set_area_types(types());
    enable(&mut reg, 1, 1);
    assert_eq!(reg.request(1, false, 2.0), ToggleOutcome::Removed);
    assert!(reg.is_empty());
}

// =============================================================
// Tickets
// =============================================================

#[test]
fn tickets_increase() {
    let mut reg = LayerRegistry::new();
    let ToggleOutcome::FetchRequired(a) = reg.request(1, true, 0.0) else { panic!() };
    let ToggleOutcome::FetchRequired(b) = reg.request(2, true, 0.0) else { panic!() };
    assert!(b > a);
}

#[test]
fn complete_with_current_ticket_inserts() {
    let mut reg = LayerRegistry::new();
    enable(&mut reg, 5, 3);
    assert!(reg.contains(5));
    assert!(!reg.is_pending(5));
    assert_eq!(reg.entries()[0].geometries.len(), 3);
}

#[test]
fn complete_after_disable_is_discarded() {
    let mut reg = LayerRegistry::new();
    let ToggleOutcome::FetchRequired(ticket) = reg.request(5, true, 0.0) else { panic!() };
    assert_eq!(reg.request(5, false, 0.0), ToggleOutcome::Unchanged);
    assert_eq!(reg.complete(5, ticket, geometries(1)), Completion::Discarded);
    assert!(reg.is_empty());
}

#[test]
fn complete_with_superseded_ticket_is_discarded() {
    let mut reg = LayerRegistry::new();
    let ToggleOutcome::FetchRequired(old) = reg.request(5, true, 0.0) else { panic!() };
    let ToggleOutcome::FetchRequired(new) = reg.request(5, true, 0.0) else { panic!() };
    assert_eq!(reg.complete(5, old, geometries(1)), Completion::Discarded);
    assert_eq!(reg.complete(5, new, geometries(2)), Completion::Inserted);
    assert_eq!(reg.entries()[0].geometries.len(), 2);
}

#[test]
fn re_enabling_replaces_entry_in_place() {
    let mut reg = LayerRegistry::new();
    enable(&mut reg, 1, 1);
    enable(&mut reg, 2, 1);
    let ToggleOutcome::FetchRequired(ticket) = reg.request(1, true, 0.0) else { panic!() };
    assert_eq!(reg.complete(1, ticket, geometries(4)), Completion::Replaced);

    assert_eq!(reg.len(), 2);
    let order: Vec<TypeId> = reg.entries().iter().map(|e| e.type_id).collect();
    assert_eq!(order, vec![1, 2]);
    assert_eq!(reg.entries()[0].geometries.len(), 4);
}

#[test]
fn abandon_clears_only_matching_ticket() {
    let mut reg = LayerRegistry::new();
    let ToggleOutcome::FetchRequired(old) = reg.request(5, true, 0.0) else { panic!() };
    let ToggleOutcome::FetchRequired(new) = reg.request(5, true, 0.0) else { panic!() };
    assert!(!reg.abandon(5, old));
    assert!(reg.is_pending(5));
    assert!(reg.abandon(5, new));
    assert!(!reg.is_pending(5));
}

// =============================================================
// Ordering / uniqueness
// =============================================================

#[test]
fn entries_keep_insertion_order() {
    let mut reg = LayerRegistry::new();
    for id in [30, 10, 20] {
        enable(&mut reg, id, 1);
    }
    let order: Vec<TypeId> = reg.entries().iter().map(|e| e.type_id).collect();
    assert_eq!(order, vec![30, 10, 20]);
}

#[test]
fn disabled_then_enabled_moves_to_end() {
    let mut reg = LayerRegistry::new();
    enable(&mut reg, 1, 1);
    enable(&mut reg, 2, 1);
    reg.request(1, false, 0.0);
    enable(&mut reg, 1, 1);
    let order: Vec<TypeId> = reg.entries().iter().map(|e| e.type_id).collect();
    assert_eq!(order, vec![2, 1]);
}

#[test]
fn at_most_one_entry_per_type() {
    let mut reg = LayerRegistry::new();
    for _ in 0..3 {
        let ToggleOutcome::FetchRequired(t) = reg.request(1, true, 0.0) else { panic!() };
        reg.complete(1, t, geometries(1));
    }
    assert_eq!(reg.len(), 1);
}

#[test]
fn remove_absent_is_false() {
    let mut reg = LayerRegistry::new();
    assert!(!reg.remove(1));
}
