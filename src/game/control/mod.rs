//! Player control: per-frame input in, selection changes and orders out.
//!
//! [`Session`] holds the core and is engine-agnostic apart from the math
//! types; [`ControlPlugin`] wires it into Bevy.

use bevy::prelude::*;

mod camera_rig;
mod drag;
mod input;
mod picker;
mod session;
mod systems;


pub use camera_rig::{CameraConfig, CameraRig};
pub use drag::DragSelect;
pub use input::{ButtonState, InputSnapshot};
pub use picker::{CameraPicker, Picker, TopDownPicker};
pub use session::{Session, SessionSettings};
pub use systems::{setup_session, RtsCamera, SelectionBox};

use crate::game::config::load_initial_config;
use systems::*;

/// Input drives the session; presentation reads it afterwards.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlSet {
    Input,
    Presentation,
}

pub struct ControlPlugin;

impl Plugin for ControlPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(Update, ControlSet::Input.before(ControlSet::Presentation))
           .add_systems(Startup, (
               setup_session.after(load_initial_config),
               (spawn_camera, setup_selection_box).after(setup_session),
           ))
           .add_systems(Update, drive_session.in_set(ControlSet::Input))
           .add_systems(Update, (sync_camera, update_selection_box).in_set(ControlSet::Presentation))
           .add_systems(Last, shutdown_session);
    }
}
