//! Player-issuable commands.
//!
//! A [`Command`] is an immutable descriptor from the [`CommandCatalog`]. Its
//! behavior is selected by [`CommandKind`]; every kind answers the same two
//! questions: does it apply to this entity (`can_handle`), and what happens
//! when it fires (`handle`).

use bevy::prelude::*;

mod catalog;
mod context;


pub use catalog::{
    CatalogDef, CatalogError, Command, CommandCatalog, CommandDef, CommandId, CommandKind,
    CommandKindDef, CommandList, UnitType, UnitTypeDef, UnitTypeId, MAX_SLOT, SLOT_COUNT,
};
pub use context::{CommandContext, CommandOutcome, TargetHit};

impl Command {
    /// Whether this command applies to the context's entity. Pure.
    pub fn can_handle(&self, ctx: &CommandContext<'_>) -> bool {
        match self.kind {
            CommandKind::Move => ctx.commandable.nav.is_some(),
            CommandKind::BuildUnit { .. } => ctx.commandable.production.is_some(),
        }
    }

    /// Fire the command. Never panics; inapplicable contexts report
    /// [`CommandOutcome::NotApplicable`] and a full build queue reports
    /// [`CommandOutcome::Rejected`].
    pub fn handle(&self, ctx: &mut CommandContext<'_>) -> CommandOutcome {
        match self.kind {
            CommandKind::Move => {
                let Some(nav) = ctx.commandable.nav.as_mut() else {
                    return CommandOutcome::NotApplicable;
                };
                let destination = ctx.hit.point;
                nav.move_to(destination);
                CommandOutcome::Moved { destination }
            }
            CommandKind::BuildUnit { unit, build_time } => {
                let building = ctx.commandable.id;
                let Some(queue) = ctx.commandable.production.as_mut() else {
                    return CommandOutcome::NotApplicable;
                };
                match queue.enqueue(unit, build_time) {
                    Ok(queue_len) => CommandOutcome::Queued { unit, queue_len },
                    Err(err) => {
                        warn!("{:?} rejected `{}`: {}", building, self.name, err);
                        CommandOutcome::Rejected(err)
                    }
                }
            }
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self.kind, CommandKind::Move)
    }
}
