use std::sync::{Arc, Mutex};

use super::*;

fn registry_with(count: u32) -> (SelectionRegistry, Vec<EntityId>) {
    let registry = SelectionRegistry::new(EventBus::new());
    let ids: Vec<_> = (0..count).map(EntityId).collect();
    for &id in &ids {
        registry.register(id, UnitTypeId(0));
    }
    (registry, ids)
}

fn record<E: Copy + Send + 'static>(bus: &EventBus) -> Arc<Mutex<Vec<E>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    bus.subscribe(move |event: &E| sink.lock().unwrap().push(*event));
    log
}

#[test]
fn test_register_publishes_spawn_once() {
    let registry = SelectionRegistry::new(EventBus::new());
    let spawned = record::<UnitSpawned>(registry.bus());

    assert!(registry.register(EntityId(3), UnitTypeId(1)));
    assert!(!registry.register(EntityId(3), UnitTypeId(1)));

    assert_eq!(
        *spawned.lock().unwrap(),
        vec![UnitSpawned { entity: EntityId(3), unit_type: UnitTypeId(1) }]
    );
    assert!(registry.is_alive(EntityId(3)));
}

#[test]
fn test_reselect_reraises_without_duplicating() {
    let (registry, ids) = registry_with(2);
    let selected = record::<UnitSelected>(registry.bus());

    assert!(registry.select(ids[0]));
    assert!(registry.select(ids[0]));

    assert_eq!(registry.selected(), vec![ids[0]]);
    assert_eq!(selected.lock().unwrap().len(), 2);
}

#[test]
fn test_selecting_dead_entity_is_ignored() {
    let (registry, _) = registry_with(1);
    let selected = record::<UnitSelected>(registry.bus());

    assert!(!registry.select(EntityId(99)));
    assert!(registry.selected().is_empty());
    assert!(selected.lock().unwrap().is_empty());
}

#[test]
fn test_deselect_is_idempotent() {
    let (registry, ids) = registry_with(1);
    let deselected = record::<UnitDeselected>(registry.bus());

    registry.select(ids[0]);
    assert!(registry.deselect(ids[0]));
    assert!(!registry.deselect(ids[0]));

    assert_eq!(deselected.lock().unwrap().len(), 1);
}

#[test]
fn test_unregister_removes_from_selection() {
    let (registry, ids) = registry_with(2);
    let deselected = record::<UnitDeselected>(registry.bus());
    let despawned = record::<UnitDespawned>(registry.bus());

    registry.select(ids[0]);
    registry.select(ids[1]);
    assert!(registry.unregister(ids[0]));

    assert_eq!(registry.selected(), vec![ids[1]]);
    assert!(!registry.is_alive(ids[0]));
    assert_eq!(*deselected.lock().unwrap(), vec![UnitDeselected { entity: ids[0] }]);
    assert_eq!(*despawned.lock().unwrap(), vec![UnitDespawned { entity: ids[0] }]);

    // Unregistering an unknown entity announces nothing.
    assert!(!registry.unregister(ids[0]));
    assert_eq!(despawned.lock().unwrap().len(), 1);
}

#[test]
fn test_selection_keeps_selection_order() {
    let (registry, ids) = registry_with(4);
    registry.select(ids[2]);
    registry.select(ids[0]);
    registry.select(ids[3]);
    assert_eq!(registry.selected(), vec![ids[2], ids[0], ids[3]]);
}

#[test]
fn test_deselect_all_with_handler_mutating_selection() {
    let (registry, ids) = registry_with(4);
    for &id in &ids {
        registry.select(id);
    }

    // Deselecting the first entity cascades into deselecting the third one.
    let cascade = registry.clone();
    let (first, third) = (ids[0], ids[2]);
    registry.bus().subscribe(move |event: &UnitDeselected| {
        if event.entity == first {
            cascade.deselect(third);
        }
    });
    let deselected = record::<UnitDeselected>(registry.bus());

    let processed = registry.deselect_all();

    assert!(registry.selected().is_empty());
    let mut seen: Vec<_> = deselected.lock().unwrap().iter().map(|e| e.entity).collect();
    seen.sort();
    // Every entity exactly once: nothing skipped, nothing doubled.
    assert_eq!(seen, ids);
    // The cascaded one was processed by the handler, not the loop.
    assert_eq!(processed, 3);
}

#[test]
fn test_deselect_all_ignores_entities_selected_during_iteration() {
    let (registry, ids) = registry_with(3);
    registry.select(ids[0]);

    let reselect = registry.clone();
    let late = ids[2];
    registry.bus().subscribe(move |_: &UnitDeselected| {
        reselect.select(late);
    });

    assert_eq!(registry.deselect_all(), 1);
    assert_eq!(registry.selected(), vec![late]);
}

#[test]
fn test_alive_listing_is_sorted() {
    let registry = SelectionRegistry::new(EventBus::new());
    for id in [5, 1, 3] {
        registry.register(EntityId(id), UnitTypeId(0));
    }
    assert_eq!(registry.alive(), vec![EntityId(1), EntityId(3), EntityId(5)]);
    assert_eq!(registry.alive_count(), 3);
}
