use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashSet;

use crate::game::command::{CommandCatalog, CommandId, SLOT_COUNT};
use crate::game::event_bus::{EventBus, Subscription};
use crate::game::events::{UnitDeselected, UnitSelected};
use crate::game::unit::{EntityId, Units};

pub type Slots = [Option<CommandId>; SLOT_COUNT];

#[derive(Default)]
struct Tracked {
    selected: FxHashSet<EntityId>,
    dirty: bool,
}

/// Command card backing state: which command sits in each of the nine
/// slots for the current selection.
pub struct ActionPanel {
    tracked: Arc<Mutex<Tracked>>,
    slots: Slots,
    bus: EventBus,
    subscriptions: Vec<Subscription>,
}

impl ActionPanel {
    pub fn new(bus: &EventBus) -> Self {
        let tracked = Arc::new(Mutex::new(Tracked::default()));

        let on_select = {
            let tracked = Arc::clone(&tracked);
            bus.subscribe::<UnitSelected, _>(move |event| {
                let mut tracked = lock(&tracked);
                tracked.selected.insert(event.entity);
                tracked.dirty = true;
            })
        };
        let on_deselect = {
            let tracked = Arc::clone(&tracked);
            bus.subscribe::<UnitDeselected, _>(move |event| {
                let mut tracked = lock(&tracked);
                tracked.selected.remove(&event.entity);
                tracked.dirty = true;
            })
        };

        Self {
            tracked,
            slots: [None; SLOT_COUNT],
            bus: bus.clone(),
            subscriptions: vec![on_select, on_deselect],
        }
    }

    /// Recompute the slots if the selection changed since the last call.
    /// Returns `true` when the slots were rebuilt.
    pub fn refresh(&mut self, catalog: &CommandCatalog, units: &Units) -> bool {
        let selected: Vec<EntityId> = {
            let mut tracked = lock(&self.tracked);
            if !tracked.dirty {
                return false;
            }
            tracked.dirty = false;
            tracked.selected.iter().copied().collect()
        };

        self.slots = resolve_slots(catalog, units, &selected);
        true
    }

    /// Force the next `refresh` to rebuild, e.g. after the catalog changed.
    pub fn invalidate(&self) {
        lock(&self.tracked).dirty = true;
    }

    pub fn slots(&self) -> &Slots {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<CommandId> {
        self.slots.get(index).copied().flatten()
    }

    pub fn tracked_count(&self) -> usize {
        lock(&self.tracked).selected.len()
    }

    pub fn shutdown(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            self.bus.unsubscribe(subscription);
        }
    }
}

/// Union of the selection's commands; each slot takes the lowest command id
/// that claims it.
pub fn resolve_slots(catalog: &CommandCatalog, units: &Units, selected: &[EntityId]) -> Slots {
    let mut slots: Slots = [None; SLOT_COUNT];

    let commands = selected
        .iter()
        .filter_map(|&id| units.get(id))
        .flat_map(|commandable| commandable.commands.iter().copied())
        .filter_map(|id| catalog.command(id));

    for command in commands {
        let slot = &mut slots[command.slot as usize];
        match slot {
            Some(current) if *current <= command.id => {}
            _ => *slot = Some(command.id),
        }
    }

    slots
}

fn lock(tracked: &Mutex<Tracked>) -> MutexGuard<'_, Tracked> {
    tracked.lock().unwrap_or_else(PoisonError::into_inner)
}
