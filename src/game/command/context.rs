use bevy::prelude::*;

use crate::game::command::UnitTypeId;
use crate::game::unit::{Commandable, EnqueueError, EntityId};

/// Result of a ray cast against the world: where it landed and what it hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetHit {
    pub point: Vec3,
    pub object: Option<EntityId>,
}

impl TargetHit {
    pub fn ground(point: Vec3) -> Self {
        Self { point, object: None }
    }
}

/// Everything a command needs to act on one entity of a dispatch batch.
///
/// Built fresh for each entity of each dispatch and dropped right after.
pub struct CommandContext<'a> {
    pub commandable: &'a mut Commandable,
    pub hit: TargetHit,
    /// Zero-based position of the entity within the current batch.
    pub unit_index: usize,
}

impl<'a> CommandContext<'a> {
    pub fn new(commandable: &'a mut Commandable, hit: TargetHit, unit_index: usize) -> Self {
        Self { commandable, hit, unit_index }
    }
}

/// What [`Command::handle`](crate::game::command::Command::handle) did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CommandOutcome {
    Moved { destination: Vec3 },
    Queued { unit: UnitTypeId, queue_len: usize },
    Rejected(EnqueueError),
    NotApplicable,
}
