use bevy::prelude::*;

/// Root marker component for HUD elements
#[derive(Component)]
pub struct HudRoot;

/// Selection text display
#[derive(Component)]
pub struct SelectionText;

/// Command card button bound to one of the nine action slots
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionButton(pub usize);

/// Label inside an [`ActionButton`]
#[derive(Component)]
pub struct ActionLabel(pub usize);
