use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::math::slerp;
use super::input::InputSnapshot;

/// Camera tuning, hot-reloaded from `game_config.ron`.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub keyboard_pan_speed: f32,
    pub rotation_speed: f32,
    pub enable_edge_pan: bool,
    /// Width in pixels of the screen border that pans the camera.
    pub edge_pan_size: f32,
    pub mouse_pan_speed: f32,
    pub zoom_speed: f32,
    /// Camera height while the zoom key is held.
    pub min_zoom_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            keyboard_pan_speed: 5.0,
            rotation_speed: 1.0,
            enable_edge_pan: true,
            edge_pan_size: 5.0,
            mouse_pan_speed: 5.0,
            zoom_speed: 1.0,
            min_zoom_distance: 7.5,
        }
    }
}

/// RTS camera: a follow target on the ground plus an offset the camera sits at.
///
/// Panning moves the target. Zoom and rotation ease the offset toward a goal
/// with a spherical interpolation whose parameter restarts every time the
/// key goes down or up.
#[derive(Clone, Debug)]
pub struct CameraRig {
    config: CameraConfig,
    target: Vec3,
    velocity: Vec3,
    follow_offset: Vec3,
    starting_follow_offset: Vec3,
    max_rotation_amount: f32,
    clock: f32,
    zoom_started_at: f32,
    rotation_started_at: f32,
}

impl CameraRig {
    pub fn new(config: CameraConfig, follow_offset: Vec3) -> Self {
        Self {
            config,
            target: Vec3::ZERO,
            velocity: Vec3::ZERO,
            follow_offset,
            starting_follow_offset: follow_offset,
            max_rotation_amount: follow_offset.z.abs(),
            clock: 0.0,
            zoom_started_at: 0.0,
            rotation_started_at: 0.0,
        }
    }

    pub fn config(&self) -> CameraConfig {
        self.config
    }

    pub fn set_config(&mut self, config: CameraConfig) {
        self.config = config;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn follow_offset(&self) -> Vec3 {
        self.follow_offset
    }

    /// Pan, then zoom, then rotate; `dt` in seconds.
    pub fn update(&mut self, input: &InputSnapshot, dt: f32) {
        self.clock += dt;
        self.pan(input);
        self.zoom(input);
        self.rotate(input);
        self.target += self.velocity * dt;
    }

    /// World transform the camera should take: at `target + offset`, looking
    /// at the target.
    pub fn camera_transform(&self) -> Transform {
        Transform::from_translation(self.target + self.follow_offset).looking_at(self.target, Vec3::Y)
    }

    fn pan(&mut self, input: &InputSnapshot) {
        let mut amount = Vec2::ZERO;

        if input.pan_forward.pressed {
            amount.y += self.config.keyboard_pan_speed;
        }
        if input.pan_backward.pressed {
            amount.y -= self.config.keyboard_pan_speed;
        }
        if input.pan_left.pressed {
            amount.x -= self.config.keyboard_pan_speed;
        }
        if input.pan_right.pressed {
            amount.x += self.config.keyboard_pan_speed;
        }

        if self.config.enable_edge_pan {
            if let Some(cursor) = input.cursor {
                let edge = self.config.edge_pan_size;
                let size = input.screen_size;

                // Screen y grows downward, so the top edge pans forward.
                if cursor.x <= edge {
                    amount.x -= self.config.mouse_pan_speed;
                } else if cursor.x >= size.x - edge {
                    amount.x += self.config.mouse_pan_speed;
                }

                if cursor.y <= edge {
                    amount.y += self.config.mouse_pan_speed;
                } else if cursor.y >= size.y - edge {
                    amount.y -= self.config.mouse_pan_speed;
                }
            }
        }

        // Forward on screen is -Z in the world.
        self.velocity = Vec3::new(amount.x, 0.0, -amount.y);
    }

    fn zoom(&mut self, input: &InputSnapshot) {
        if input.zoom.changed() {
            self.zoom_started_at = self.clock;
        }
        let t = ((self.clock - self.zoom_started_at) * self.config.zoom_speed).clamp(0.0, 1.0);

        let goal_height = if input.zoom.pressed {
            self.config.min_zoom_distance
        } else {
            self.starting_follow_offset.y
        };
        let goal = Vec3::new(self.follow_offset.x, goal_height, self.follow_offset.z);
        self.follow_offset = slerp(self.follow_offset, goal, t);
    }

    fn rotate(&mut self, input: &InputSnapshot) {
        if input.rotate_left.changed() || input.rotate_right.changed() {
            self.rotation_started_at = self.clock;
        }
        let t = ((self.clock - self.rotation_started_at) * self.config.rotation_speed).clamp(0.0, 1.0);

        let goal = if input.rotate_right.pressed {
            Vec3::new(self.max_rotation_amount, self.follow_offset.y, 0.0)
        } else if input.rotate_left.pressed {
            Vec3::new(-self.max_rotation_amount, self.follow_offset.y, 0.0)
        } else {
            Vec3::new(
                self.starting_follow_offset.x,
                self.follow_offset.y,
                self.starting_follow_offset.z,
            )
        };
        self.follow_offset = slerp(self.follow_offset, goal, t);
    }
}
