use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::game::config::{current_game_config, load_catalog_or_builtin, GameConfig, GameConfigHandle, InitialConfig, CATALOG_PATH};
use super::camera_rig::CameraConfig;
use super::input::{ButtonState, InputSnapshot};
use super::picker::{CameraPicker, Picker};
use super::session::Session;

/// Marker for the 3D camera driven by the session's camera rig.
#[derive(Component)]
pub struct RtsCamera;

/// Marker component for the selection box UI element.
#[derive(Component)]
pub struct SelectionBox;

pub fn setup_session(mut commands: Commands, initial: Res<InitialConfig>) {
    let catalog = load_catalog_or_builtin(CATALOG_PATH);
    let session = Session::new(initial.session_settings(CameraConfig::default()), catalog);
    commands.insert_resource(session);
}

pub fn spawn_camera(mut commands: Commands, session: Res<Session>) {
    commands.spawn((
        Camera3d::default(),
        session.camera().camera_transform(),
        RtsCamera,
    ));
}

/// Setup the selection box UI element
pub fn setup_selection_box(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            border: UiRect::all(Val::Px(2.0)),
            ..default()
        },
        BorderColor::from(Color::WHITE),
        BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.1)),
        Visibility::Hidden,
        SelectionBox,
    ));
}

pub fn gather_input(
    keys: &ButtonInput<KeyCode>,
    mouse: &ButtonInput<MouseButton>,
    window: Option<&Window>,
    config: &GameConfig,
) -> InputSnapshot {
    InputSnapshot {
        cursor: window.and_then(Window::cursor_position),
        screen_size: window.map_or(Vec2::ZERO, Window::size),
        pan_forward: ButtonState::from_input(keys, config.key_camera_forward),
        pan_backward: ButtonState::from_input(keys, config.key_camera_backward),
        pan_left: ButtonState::from_input(keys, config.key_camera_left),
        pan_right: ButtonState::from_input(keys, config.key_camera_right),
        zoom: ButtonState::from_input(keys, config.key_camera_zoom),
        rotate_left: ButtonState::from_input(keys, config.key_camera_rotate_left),
        rotate_right: ButtonState::from_input(keys, config.key_camera_rotate_right),
        additive: ButtonState::from_input(keys, config.key_additive_select),
        left_mouse: ButtonState::from_input(mouse, MouseButton::Left),
        right_mouse: ButtonState::from_input(mouse, MouseButton::Right),
    }
}

/// Feed this frame's input to the session.
pub fn drive_session(
    mut session: ResMut<Session>,
    keys: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform), With<RtsCamera>>,
    q_interaction: Query<&Interaction>,
    config_handle: Option<Res<GameConfigHandle>>,
    configs: Res<Assets<GameConfig>>,
    time: Res<Time>,
) {
    let fallback = GameConfig::default();
    let config = current_game_config(config_handle.as_deref(), &configs, &fallback);
    let input = gather_input(&keys, &mouse_button, q_window.single().ok(), config);

    let pointer_over_ui = q_interaction.iter().any(|i| *i != Interaction::None);
    let picker = q_camera.single().ok().map(|(camera, transform)| CameraPicker {
        camera,
        transform,
        pointer_over_ui,
    });

    session.tick(&input, time.delta(), picker.as_ref().map(|p| p as &dyn Picker));
}

pub fn sync_camera(session: Res<Session>, mut q_camera: Query<&mut Transform, With<RtsCamera>>) {
    let Ok(mut transform) = q_camera.single_mut() else { return };
    *transform = session.camera().camera_transform();
}

pub fn update_selection_box(
    session: Res<Session>,
    mut q_selection_box: Query<(&mut Node, &mut Visibility), With<SelectionBox>>,
) {
    let Ok((mut node, mut visibility)) = q_selection_box.single_mut() else { return };

    match session.drag().rect() {
        Some(rect) => {
            node.left = Val::Px(rect.min.x);
            node.top = Val::Px(rect.min.y);
            node.width = Val::Px(rect.width());
            node.height = Val::Px(rect.height());
            *visibility = Visibility::Visible;
        }
        None => *visibility = Visibility::Hidden,
    }
}

pub fn shutdown_session(mut exit_events: MessageReader<AppExit>, mut session: ResMut<Session>) {
    if exit_events.read().next().is_some() {
        session.shutdown();
    }
}
