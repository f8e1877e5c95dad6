use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use outpost::game::config::{GameConfigPlugin, InitialConfig};
use outpost::game::control::{ControlPlugin, RtsCamera, Session};
use outpost::game::hud::{ActionButton, HudPlugin};

fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(bevy::asset::AssetPlugin::default());
    app.init_resource::<ButtonInput<KeyCode>>();
    app.init_resource::<ButtonInput<MouseButton>>();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    app.add_plugins((GameConfigPlugin, ControlPlugin, HudPlugin));
    app
}

#[test]
fn test_startup_builds_session_and_camera() {
    let mut app = headless_app();
    app.update();

    assert!(app.world().get_resource::<InitialConfig>().is_some());
    let session = app.world().resource::<Session>();
    assert!(session.catalog().unit_type_by_name("base").is_some());

    let mut cameras = app.world_mut().query_filtered::<Entity, With<RtsCamera>>();
    assert_eq!(cameras.iter(app.world()).count(), 1);
}

#[test]
fn test_held_key_pans_camera() {
    let mut app = headless_app();
    app.update();

    app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(KeyCode::KeyD);
    for _ in 0..5 {
        app.update();
    }

    let target = app.world().resource::<Session>().camera().target();
    assert!(target.x > 0.0, "camera target {}", target);

    let expected = app.world().resource::<Session>().camera().camera_transform();
    let mut cameras = app.world_mut().query_filtered::<&Transform, With<RtsCamera>>();
    let transform = cameras.single(app.world()).unwrap();
    assert!((transform.translation - expected.translation).length() < 1e-4);
}

#[test]
fn test_command_card_button_queues_production() {
    let mut app = headless_app();
    app.update();

    let base = {
        let mut session = app.world_mut().resource_mut::<Session>();
        let base = session.spawn_unit_named("base", Vec3::ZERO).unwrap();
        session.registry().select(base);
        base
    };
    app.update();

    let mut buttons = app.world_mut().query::<(Entity, &ActionButton)>();
    let slot_one = buttons
        .iter(app.world())
        .find(|(_, button)| button.0 == 1)
        .map(|(entity, _)| entity)
        .unwrap();
    app.world_mut().entity_mut(slot_one).insert(Interaction::Pressed);
    app.update();
    app.update();

    let session = app.world().resource::<Session>();
    let queue = session.units().get(base).unwrap().production.as_ref().unwrap();
    assert_eq!(queue.len(), 1);
}
