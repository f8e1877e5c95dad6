use bevy::prelude::*;

use crate::game::command::SLOT_COUNT;
use super::components::*;

pub(super) const BUTTON_IDLE: Color = Color::srgb(0.3, 0.3, 0.3);
pub(super) const BUTTON_EMPTY: Color = Color::srgb(0.15, 0.15, 0.15);

/// Setup the HUD UI elements
pub fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::FlexEnd,
                align_items: AlignItems::FlexEnd, // Align items to the bottom
                flex_direction: FlexDirection::Row,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            // Selection Info
            parent.spawn((
                Node {
                    width: Val::Px(400.0),
                    height: Val::Px(150.0),
                    border: UiRect::all(Val::Px(2.0)),
                    margin: UiRect::bottom(Val::Px(10.0)),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    ..default()
                },
                BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                BorderColor::from(Color::WHITE),
            )).with_children(|p| {
                p.spawn((
                    Text::new("No Selection"),
                    TextFont {
                        font_size: 20.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    Node {
                        margin: UiRect::top(Val::Px(10.0)),
                        ..default()
                    },
                    SelectionText,
                ));
            });

            // Bottom Right: Command Card, 3x3 slots
            parent.spawn((
                Node {
                    width: Val::Px(200.0),
                    height: Val::Px(200.0),
                    border: UiRect::all(Val::Px(2.0)),
                    margin: UiRect::all(Val::Px(10.0)),
                    display: Display::Grid,
                    grid_template_columns: vec![GridTrack::fr(1.0); 3],
                    grid_template_rows: vec![GridTrack::fr(1.0); 3],
                    row_gap: Val::Px(5.0),
                    column_gap: Val::Px(5.0),
                    padding: UiRect::all(Val::Px(5.0)),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                BorderColor::from(Color::WHITE),
            )).with_children(|p| {
                for slot in 0..SLOT_COUNT {
                    p.spawn((
                        Button,
                        Node {
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(BUTTON_EMPTY),
                        ActionButton(slot),
                    )).with_children(|btn| {
                        btn.spawn((
                            Text::new(""),
                            TextFont {
                                font_size: 13.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                            ActionLabel(slot),
                        ));
                    });
                }
            });
        });
}
