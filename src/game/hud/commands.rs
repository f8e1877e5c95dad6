use bevy::prelude::*;

use crate::game::control::Session;
use super::components::*;
use super::setup::{BUTTON_EMPTY, BUTTON_IDLE};

/// Handle button visual feedback on interaction
pub fn button_system(
    session: Res<Session>,
    mut interaction_query: Query<
        (&Interaction, &ActionButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
) {
    for (interaction, button, mut color) in &mut interaction_query {
        if session.panel().slot(button.0).is_none() {
            *color = BackgroundColor(BUTTON_EMPTY);
            continue;
        }
        match *interaction {
            Interaction::Pressed => {
                *color = BackgroundColor(Color::srgb(0.1, 0.5, 0.1));
            }
            Interaction::Hovered => {
                *color = BackgroundColor(Color::srgb(0.4, 0.4, 0.4));
            }
            Interaction::None => {
                *color = BackgroundColor(BUTTON_IDLE);
            }
        }
    }
}

/// Publish `ActionSelected` when an enabled slot is pressed
pub fn action_button_handler(
    interaction_query: Query<
        (&Interaction, &ActionButton),
        (Changed<Interaction>, With<Button>),
    >,
    session: Res<Session>,
) {
    for (interaction, button) in &interaction_query {
        if *interaction != Interaction::Pressed {
            continue;
        }
        if let Some(command) = session.panel().slot(button.0) {
            session.select_action(command);
        }
    }
}

/// Keep the command card in sync with the panel slots
pub fn update_action_buttons(
    session: Res<Session>,
    mut labels: Query<(&ActionLabel, &mut Text)>,
    mut buttons: Query<(&ActionButton, &Interaction, &mut BackgroundColor)>,
) {
    let panel = session.panel();
    let catalog = session.catalog();

    for (label, mut text) in &mut labels {
        let name = panel
            .slot(label.0)
            .and_then(|id| catalog.command(id))
            .map_or("", |command| command.name.as_str());
        if text.0 != name {
            text.0 = name.to_string();
        }
    }

    for (button, interaction, mut color) in &mut buttons {
        let wanted = match (panel.slot(button.0), interaction) {
            (None, _) => BUTTON_EMPTY,
            (Some(_), Interaction::None) => BUTTON_IDLE,
            (Some(_), _) => continue,
        };
        color.set_if_neq(BackgroundColor(wanted));
    }
}
