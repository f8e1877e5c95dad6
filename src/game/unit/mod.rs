mod components;
mod production;
mod resources;
mod store;
mod visuals;


use bevy::prelude::*;

use crate::game::control::ControlSet;

// Re-export public types
pub use components::{Commandable, EntityId, NavAgent};
pub use production::{BuildQueue, EnqueueError, DEFAULT_QUEUE_CAPACITY};
pub use resources::{UnitMaterials, UnitMesh, UnitViews};
pub use store::Units;
pub use visuals::{ProductionBar, SelectionCircle, UnitView};

use resources::setup_unit_resources;
use visuals::{reconcile_unit_views, sync_visuals, update_production_bars, update_selection_circle_visibility};

/// Plugin that renders commandables held by the session
pub struct UnitPlugin;

impl Plugin for UnitPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UnitViews>()
           .add_systems(Startup, setup_unit_resources)
           .add_systems(Update, (
               reconcile_unit_views,
               (sync_visuals, update_selection_circle_visibility, update_production_bars),
           ).chain().in_set(ControlSet::Presentation));
    }
}
