//! Command dispatch with destination deconfliction.
//!
//! One dispatch call handles one player order (a "batch"): for each entity in
//! batch order it picks the first applicable command, spreads movement
//! destinations over concentric rings, and fires the command.

use bevy::prelude::*;

use crate::game::command::{Command, CommandCatalog, CommandContext, CommandId, CommandOutcome, TargetHit};
use crate::game::unit::{EntityId, Units};

mod deconfliction;

#[cfg(test)]
mod tests;

pub use deconfliction::{FormationConfig, RingPacker, RingState};

/// One command that fired during a batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IssuedCommand {
    pub entity: EntityId,
    pub command: CommandId,
    pub outcome: CommandOutcome,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispatchReport {
    pub issued: Vec<IssuedCommand>,
    /// Entities with no applicable command, or no longer in the unit store.
    pub skipped: Vec<EntityId>,
}

impl DispatchReport {
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty() && self.skipped.is_empty()
    }

    pub fn destination_of(&self, entity: EntityId) -> Option<Vec3> {
        self.issued.iter().find_map(|issued| match issued.outcome {
            CommandOutcome::Moved { destination } if issued.entity == entity => Some(destination),
            _ => None,
        })
    }
}

/// Owns the ring accumulator. Must not be re-entered while a batch runs.
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    packer: RingPacker,
}

impl Dispatcher {
    pub fn new(config: FormationConfig) -> Self {
        Self { packer: RingPacker::new(config) }
    }

    pub fn ring_state(&self) -> RingState {
        self.packer.state()
    }

    pub fn formation(&self) -> FormationConfig {
        self.packer.config()
    }

    pub fn set_formation(&mut self, config: FormationConfig) {
        self.packer.set_config(config);
    }

    /// Smart order: every entity runs its first applicable command (by slot,
    /// then registration order) against `hit`.
    pub fn dispatch(
        &mut self,
        catalog: &CommandCatalog,
        units: &mut Units,
        batch: &[EntityId],
        hit: TargetHit,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (unit_index, &entity) in batch.iter().enumerate() {
            if unit_index == 0 {
                self.packer.reset();
            }

            let Some(commandable) = units.get_mut(entity) else {
                debug!("Dispatch skipped {:?}: not in the unit store", entity);
                report.skipped.push(entity);
                continue;
            };

            let candidates = catalog.ordered(&commandable.commands);
            let mut ctx = CommandContext::new(commandable, hit, unit_index);
            let Some(command) = candidates.into_iter().find(|command| command.can_handle(&ctx)) else {
                report.skipped.push(entity);
                continue;
            };

            let outcome = self.fire(command, &mut ctx);
            report.issued.push(IssuedCommand { entity, command: command.id, outcome });
        }

        report
    }

    /// Explicit order: run `command` on every entity of the batch that can
    /// handle it.
    pub fn dispatch_command(
        &mut self,
        catalog: &CommandCatalog,
        units: &mut Units,
        command: CommandId,
        batch: &[EntityId],
        hit: TargetHit,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        let Some(command) = catalog.command(command) else {
            warn!("Dispatch of unknown command {:?} ignored", command);
            return report;
        };

        for (unit_index, &entity) in batch.iter().enumerate() {
            if unit_index == 0 {
                self.packer.reset();
            }

            let Some(commandable) = units.get_mut(entity) else {
                report.skipped.push(entity);
                continue;
            };

            let mut ctx = CommandContext::new(commandable, hit, unit_index);
            if !command.can_handle(&ctx) {
                report.skipped.push(entity);
                continue;
            }

            let outcome = self.fire(command, &mut ctx);
            report.issued.push(IssuedCommand { entity, command: command.id, outcome });
        }

        report
    }

    fn fire(&mut self, command: &Command, ctx: &mut CommandContext<'_>) -> CommandOutcome {
        if command.is_move() {
            ctx.hit.point = self.packer.place(ctx.hit.point, ctx.commandable.steering_radius);
        }
        command.handle(ctx)
    }
}
