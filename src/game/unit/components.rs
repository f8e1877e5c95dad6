use bevy::prelude::*;

use crate::game::command::{CommandList, UnitType, UnitTypeId};
use super::production::BuildQueue;

/// Opaque handle to a commandable entity. Never reused within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Movement primitive. `move_to` is fire-and-forget; `step` walks a straight
/// line toward the destination each tick.
#[derive(Clone, Debug, PartialEq)]
pub struct NavAgent {
    pub speed: f32,
    destination: Option<Vec3>,
}

impl NavAgent {
    pub fn new(speed: f32) -> Self {
        Self { speed, destination: None }
    }

    pub fn move_to(&mut self, destination: Vec3) {
        self.destination = Some(destination);
    }

    pub fn stop(&mut self) {
        self.destination = None;
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    /// Advance `position` toward the destination. Returns `true` on the step
    /// that arrives.
    pub fn step(&mut self, position: &mut Vec3, dt: f32, arrival_threshold: f32) -> bool {
        let Some(destination) = self.destination else { return false };

        let to_target = destination - *position;
        let distance = to_target.length();
        let max_step = self.speed.max(0.0) * dt;

        if distance <= arrival_threshold || distance <= max_step {
            *position = destination;
            self.destination = None;
            return true;
        }

        *position += to_target / distance * max_step;
        false
    }
}

/// A unit or building that can be selected and ordered around.
#[derive(Clone, Debug)]
pub struct Commandable {
    pub id: EntityId,
    pub unit_type: UnitTypeId,
    pub position: Vec3,
    pub health: i32,
    /// Footprint radius used to space units apart. Expected to be > 0.
    pub steering_radius: f32,
    /// Supported commands in registration order.
    pub commands: CommandList,
    pub nav: Option<NavAgent>,
    pub production: Option<BuildQueue>,
}

impl Commandable {
    pub fn from_type(id: EntityId, unit_type: &UnitType, position: Vec3, queue_capacity: usize) -> Self {
        Self {
            id,
            unit_type: unit_type.id,
            position,
            health: unit_type.health,
            steering_radius: unit_type.steering_radius,
            commands: unit_type.commands.clone(),
            nav: unit_type.move_speed.map(NavAgent::new),
            production: unit_type.production.then(|| BuildQueue::new(queue_capacity)),
        }
    }

    /// Mobile units are the ones drag-select and right-click orders apply to.
    pub fn is_mobile(&self) -> bool {
        self.nav.is_some()
    }
}
