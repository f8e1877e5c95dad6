use bevy::prelude::*;
use rustc_hash::FxHashMap;

use super::components::EntityId;

/// Shared mesh handles for unit rendering
#[derive(Resource)]
pub struct UnitMesh {
    pub unit: Handle<Mesh>,
    pub building: Handle<Mesh>,
    pub circle: Handle<Mesh>,
    pub quad: Handle<Mesh>,
}

/// Shared material handles for unit rendering
#[derive(Resource)]
pub struct UnitMaterials {
    pub mobile: Handle<StandardMaterial>,
    pub building: Handle<StandardMaterial>,
    pub selection_circle: Handle<StandardMaterial>,
    pub production_bar: Handle<StandardMaterial>,
}

/// Render entity of every commandable that currently has one.
#[derive(Resource, Default)]
pub struct UnitViews(pub FxHashMap<EntityId, Entity>);

/// Sets up shared unit rendering resources (meshes and materials)
pub(super) fn setup_unit_resources(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(UnitMesh {
        unit: meshes.add(Capsule3d::default()),
        building: meshes.add(Cuboid::new(1.0, 1.0, 1.0)),
        // Unit-radius ring, scaled per unit
        circle: meshes.add(Annulus::new(0.9, 1.0)),
        quad: meshes.add(Rectangle::new(1.0, 0.15)),
    });

    let production_bar = materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 0.6, 1.0),
        unlit: true,
        cull_mode: None, // Double sided
        ..default()
    });
    let selection_circle = materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 1.0, 0.2),
        unlit: true,
        ..default()
    });

    commands.insert_resource(UnitMaterials {
        mobile: materials.add(Color::srgb(0.8, 0.7, 0.6)),
        building: materials.add(Color::srgb(0.5, 0.5, 0.55)),
        selection_circle,
        production_bar,
    });
}
