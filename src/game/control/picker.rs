use bevy::prelude::*;

/// Projection between screen space and the world, provided by whatever owns
/// the camera.
pub trait Picker {
    /// World-space ray under a screen position.
    fn ray(&self, cursor: Vec2) -> Option<Ray3d>;

    /// Screen position of a world point, if it is in view.
    fn world_to_screen(&self, point: Vec3) -> Option<Vec2>;

    /// Whether the pointer currently hovers a UI element.
    fn pointer_over_ui(&self) -> bool;
}

/// Picker backed by a Bevy camera.
pub struct CameraPicker<'a> {
    pub camera: &'a Camera,
    pub transform: &'a GlobalTransform,
    pub pointer_over_ui: bool,
}

impl Picker for CameraPicker<'_> {
    fn ray(&self, cursor: Vec2) -> Option<Ray3d> {
        self.camera.viewport_to_world(self.transform, cursor).ok()
    }

    fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        self.camera.world_to_viewport(self.transform, point).ok()
    }

    fn pointer_over_ui(&self) -> bool {
        self.pointer_over_ui
    }
}

/// Orthographic straight-down view for headless runs: screen x/y map to
/// world x/z at `pixels_per_unit`.
#[derive(Clone, Copy, Debug)]
pub struct TopDownPicker {
    pub pixels_per_unit: f32,
    pub pointer_over_ui: bool,
}

impl Default for TopDownPicker {
    fn default() -> Self {
        Self { pixels_per_unit: 1.0, pointer_over_ui: false }
    }
}

impl TopDownPicker {
    const HEIGHT: f32 = 100.0;
}

impl Picker for TopDownPicker {
    fn ray(&self, cursor: Vec2) -> Option<Ray3d> {
        let world = cursor / self.pixels_per_unit;
        Some(Ray3d::new(Vec3::new(world.x, Self::HEIGHT, world.y), Dir3::NEG_Y))
    }

    fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        Some(point.xz() * self.pixels_per_unit)
    }

    fn pointer_over_ui(&self) -> bool {
        self.pointer_over_ui
    }
}
