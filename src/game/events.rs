//! Events published on the [`EventBus`](crate::game::event_bus::EventBus).
//!
//! Producers (registry, session, action HUD) publish these; the camera, HUD
//! and session subscribe without holding references to each other.

use crate::game::command::{CommandId, UnitTypeId};
use crate::game::unit::EntityId;

// ============================================================================
// Lifecycle
// ============================================================================

/// A commandable entity entered the world and joined the alive set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSpawned {
    pub entity: EntityId,
    pub unit_type: UnitTypeId,
}

/// A commandable entity left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitDespawned {
    pub entity: EntityId,
}

// ============================================================================
// Selection
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSelected {
    pub entity: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitDeselected {
    pub entity: EntityId,
}

/// The player picked a command from the action panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSelected {
    pub command: CommandId,
}

// ============================================================================
// Production
// ============================================================================

/// A building finished an order and the unit has been spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitProduced {
    pub building: EntityId,
    pub entity: EntityId,
    pub unit_type: UnitTypeId,
}

/// A building was despawned with orders still queued; they were dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductionCancelled {
    pub building: EntityId,
    pub pending: usize,
}
