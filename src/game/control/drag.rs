use bevy::prelude::*;

use crate::game::math::rect_from_corners;
use crate::game::unit::EntityId;

/// Left-button drag state between press and release.
#[derive(Clone, Debug, Default)]
pub struct DragSelect {
    start: Vec2,
    rect: Option<Rect>,
    pressed: bool,
    began_over_ui: bool,
    added: Vec<EntityId>,
}

impl DragSelect {
    pub fn begin(&mut self, cursor: Vec2, over_ui: bool) {
        self.start = cursor;
        self.rect = None;
        self.pressed = true;
        self.began_over_ui = over_ui;
        self.added.clear();
    }

    /// Stretch the box to `cursor`. Entities collected so far are dropped so
    /// the caller can refill from the new box.
    pub fn resize(&mut self, cursor: Vec2) -> Rect {
        let rect = rect_from_corners(self.start, cursor);
        self.rect = Some(rect);
        self.added.clear();
        rect
    }

    pub fn collect(&mut self, entity: EntityId) {
        if !self.added.contains(&entity) {
            self.added.push(entity);
        }
    }

    /// End the drag and hand back what the box covered.
    pub fn finish(&mut self) -> Vec<EntityId> {
        self.rect = None;
        self.pressed = false;
        std::mem::take(&mut self.added)
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn began_over_ui(&self) -> bool {
        self.began_over_ui
    }

    /// Box to draw, while one is being dragged.
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    pub fn collected(&self) -> &[EntityId] {
        &self.added
    }
}
