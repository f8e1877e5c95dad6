use bevy::prelude::*;
use rand::{rng, Rng};

pub mod command;
pub mod config;
pub mod control;
pub mod dispatch;
pub mod event_bus;
pub mod events;
pub mod hud;
pub mod math;
pub mod selection;
pub mod unit;

use config::{GameConfigPlugin, InitialConfig};
use control::{ControlPlugin, Session};
use hud::HudPlugin;
use unit::UnitPlugin;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            GameConfigPlugin,
            ControlPlugin,
            UnitPlugin,
            HudPlugin,
        ))
        .add_systems(Startup, (setup_game, spawn_demo_units.after(control::setup_session)));
    }
}

fn setup_game(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("Game setup started");

    // Ground Plane
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(100.0, 100.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
    ));

    // Light
    commands.spawn((
        PointLight {
            shadows_enabled: true,
            intensity: 10_000_000.0,
            range: 100.0,
            ..default()
        },
        Transform::from_xyz(8.0, 16.0, 8.0),
    ));

    // UI Camera
    commands.spawn((
        Camera2d::default(),
        Camera {
            order: 1,
            ..default()
        },
    ));
}

/// A base, a supply hut and a few units scattered in front of them.
fn spawn_demo_units(mut session: ResMut<Session>, initial: Res<InitialConfig>) {
    session.spawn_unit_named("base", Vec3::ZERO);
    session.spawn_unit_named("supply_hut", Vec3::new(-8.0, 0.0, 2.0));

    let mut rng = rng();
    let spread = initial.demo_spawn_spread.max(0.1);
    let mut scatter = |session: &mut Session, name: &str, count: usize| {
        for _ in 0..count {
            let x = rng.random_range(-spread..spread);
            let z = rng.random_range(-spread..spread);
            session.spawn_unit_named(name, Vec3::new(6.0 + x, 0.0, 6.0 + z));
        }
    };
    scatter(&mut *session, "worker", initial.demo_workers);
    scatter(&mut *session, "soldier", initial.demo_soldiers);

    info!("Demo scene spawned {} units", session.units().len());
}
