//! Alive and selected sets.
//!
//! The registry is the single owner of "who exists" and "who is selected".
//! Every change is announced on the event bus after the registry's own lock
//! is released, so handlers may call straight back into the registry.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::*;
use rustc_hash::FxHashSet;

use crate::game::command::UnitTypeId;
use crate::game::event_bus::EventBus;
use crate::game::events::{UnitDeselected, UnitDespawned, UnitSelected, UnitSpawned};
use crate::game::unit::EntityId;

#[cfg(test)]
mod tests;

#[derive(Default, Debug)]
struct SelectionSets {
    alive: FxHashSet<EntityId>,
    /// Selection order is kept so multi-unit orders are dispatched
    /// deterministically. Never holds duplicates.
    selected: Vec<EntityId>,
}

/// Cloneable handle; all clones share the same sets.
#[derive(Clone)]
pub struct SelectionRegistry {
    sets: Arc<Mutex<SelectionSets>>,
    bus: EventBus,
}

impl SelectionRegistry {
    pub fn new(bus: EventBus) -> Self {
        Self {
            sets: Arc::new(Mutex::new(SelectionSets::default())),
            bus,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SelectionSets> {
        self.sets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `entity` to the alive set and announce it.
    pub fn register(&self, entity: EntityId, unit_type: UnitTypeId) -> bool {
        let inserted = self.lock().alive.insert(entity);
        if inserted {
            self.bus.publish(&UnitSpawned { entity, unit_type });
        }
        inserted
    }

    /// Remove `entity` from both sets. A selected entity is deselected first.
    pub fn unregister(&self, entity: EntityId) -> bool {
        let (was_alive, was_selected) = {
            let mut sets = self.lock();
            let was_alive = sets.alive.remove(&entity);
            let before = sets.selected.len();
            sets.selected.retain(|&e| e != entity);
            (was_alive, sets.selected.len() != before)
        };

        if was_selected {
            self.bus.publish(&UnitDeselected { entity });
        }
        if was_alive {
            self.bus.publish(&UnitDespawned { entity });
        }
        was_alive
    }

    /// Select `entity`. Dead entities are ignored. Selecting an entity that is
    /// already selected announces it again without duplicating it.
    pub fn select(&self, entity: EntityId) -> bool {
        {
            let mut sets = self.lock();
            if !sets.alive.contains(&entity) {
                debug!("Ignoring selection of {:?}: not alive", entity);
                return false;
            }
            if !sets.selected.contains(&entity) {
                sets.selected.push(entity);
            }
        }

        self.bus.publish(&UnitSelected { entity });
        true
    }

    /// Deselect `entity`. No-op (and no event) if it was not selected.
    pub fn deselect(&self, entity: EntityId) -> bool {
        let removed = {
            let mut sets = self.lock();
            let before = sets.selected.len();
            sets.selected.retain(|&e| e != entity);
            sets.selected.len() != before
        };

        if removed {
            self.bus.publish(&UnitDeselected { entity });
        }
        removed
    }

    /// Deselect everything that was selected when the call started.
    ///
    /// Handlers triggered by one deselection may deselect others; entities
    /// already gone by the time they are reached are not processed again.
    pub fn deselect_all(&self) -> usize {
        let snapshot = self.selected();
        snapshot
            .into_iter()
            .filter(|&entity| self.deselect(entity))
            .count()
    }

    pub fn selected(&self) -> Vec<EntityId> {
        self.lock().selected.clone()
    }

    pub fn selected_count(&self) -> usize {
        self.lock().selected.len()
    }

    pub fn is_selected(&self, entity: EntityId) -> bool {
        self.lock().selected.contains(&entity)
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.lock().alive.contains(&entity)
    }

    pub fn alive(&self) -> Vec<EntityId> {
        let mut alive: Vec<_> = self.lock().alive.iter().copied().collect();
        alive.sort_unstable();
        alive
    }

    pub fn alive_count(&self) -> usize {
        self.lock().alive.len()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}
