use bevy::prelude::*;

/// Edge-triggered state of one button for the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub pressed: bool,
    pub just_pressed: bool,
    pub just_released: bool,
}

impl ButtonState {
    pub const IDLE: Self = Self { pressed: false, just_pressed: false, just_released: false };
    pub const HELD: Self = Self { pressed: true, just_pressed: false, just_released: false };
    pub const PRESSED: Self = Self { pressed: true, just_pressed: true, just_released: false };
    pub const RELEASED: Self = Self { pressed: false, just_pressed: false, just_released: true };

    pub fn from_input<T>(input: &ButtonInput<T>, button: T) -> Self
    where
        T: Copy + Eq + std::hash::Hash + Send + Sync + 'static,
    {
        Self {
            pressed: input.pressed(button),
            just_pressed: input.just_pressed(button),
            just_released: input.just_released(button),
        }
    }

    /// Pressed or released this frame.
    pub fn changed(&self) -> bool {
        self.just_pressed || self.just_released
    }
}

/// Raw device state for one frame, decoupled from any input backend.
///
/// Screen coordinates have their origin at the top-left corner, y down.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub cursor: Option<Vec2>,
    pub screen_size: Vec2,

    pub pan_forward: ButtonState,
    pub pan_backward: ButtonState,
    pub pan_left: ButtonState,
    pub pan_right: ButtonState,

    pub zoom: ButtonState,
    pub rotate_left: ButtonState,
    pub rotate_right: ButtonState,

    /// Held to add to the current selection instead of replacing it.
    pub additive: ButtonState,

    pub left_mouse: ButtonState,
    pub right_mouse: ButtonState,
}

impl InputSnapshot {
    pub fn with_cursor(cursor: Vec2, screen_size: Vec2) -> Self {
        Self {
            cursor: Some(cursor),
            screen_size,
            ..default()
        }
    }
}
