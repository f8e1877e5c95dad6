use bevy::prelude::*;
use rustc_hash::FxHashMap;

use crate::game::command::UnitType;
use super::components::{Commandable, EntityId};

/// Owns every commandable entity's data. Alive/selected bookkeeping lives in
/// the [`SelectionRegistry`](crate::game::selection::SelectionRegistry).
#[derive(Default, Debug)]
pub struct Units {
    entities: FxHashMap<EntityId, Commandable>,
    next_id: u32,
}

impl Units {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawn(&mut self, unit_type: &UnitType, position: Vec3, queue_capacity: usize) -> EntityId {
        let id = self.allocate();
        self.entities
            .insert(id, Commandable::from_type(id, unit_type, position, queue_capacity));
        id
    }

    /// Insert a hand-built commandable. The id is assigned by the store.
    pub fn spawn_with(&mut self, build: impl FnOnce(EntityId) -> Commandable) -> EntityId {
        let id = self.allocate();
        let mut commandable = build(id);
        commandable.id = id;
        self.entities.insert(id, commandable);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Commandable> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Commandable> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Commandable> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Commandable> {
        self.entities.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Commandable> {
        self.entities.values_mut()
    }

    /// All ids in spawn order.
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
