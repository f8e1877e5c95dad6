use bevy::prelude::*;

use crate::game::control::Session;
use super::components::*;

/// Update the selection HUD to show selected unit info
pub fn update_selection_hud(
    session: Res<Session>,
    mut text_query: Query<&mut Text, With<SelectionText>>,
) {
    let selected = session.registry().selected();
    let units = session.units();
    let catalog = session.catalog();

    let summary = match selected.as_slice() {
        [] => "No Selection".to_string(),
        [single] => match units.get(*single) {
            Some(commandable) => {
                let name = catalog
                    .unit_type(commandable.unit_type)
                    .map_or("unknown", |t| t.name.as_str());
                let mut line = format!("{} {:?}\nHP: {}", name, single, commandable.health);
                if let Some(queue) = &commandable.production {
                    line.push_str(&format!(
                        "\nQueue: {}/{} ({:.0}%)",
                        queue.len(),
                        queue.capacity(),
                        queue.progress() * 100.0
                    ));
                }
                line
            }
            None => "No Selection".to_string(),
        },
        many => format!("Selected: {} units", many.len()),
    };

    for mut text in &mut text_query {
        if text.0 != summary {
            text.0 = summary.clone();
        }
    }
}
