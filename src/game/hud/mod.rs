use bevy::prelude::*;

use crate::game::control::ControlSet;

mod commands;
mod components;
mod panel;
mod selection;
mod setup;


pub use components::{ActionButton, ActionLabel, HudRoot, SelectionText};
pub use panel::{resolve_slots, ActionPanel, Slots};

use commands::*;
use selection::*;
use setup::*;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud)
           .add_systems(Update, action_button_handler.in_set(ControlSet::Input))
           .add_systems(Update, (
               button_system,
               update_action_buttons,
               update_selection_hud,
           ).chain().in_set(ControlSet::Presentation));
    }
}
