use bevy::prelude::*;

use crate::game::control::Session;

use super::components::{Commandable, EntityId};
use super::resources::{UnitMaterials, UnitMesh, UnitViews};

const BUILDING_HEIGHT: f32 = 1.5;
const UNIT_HEIGHT: f32 = 1.0;

/// Links a render entity to the commandable it shows.
#[derive(Component, Clone, Copy, Debug)]
pub struct UnitView(pub EntityId);

/// Marks the child entity that renders the selection circle
#[derive(Component)]
pub struct SelectionCircle;

/// Marks the child entity that shows build progress of a production building
#[derive(Component)]
pub struct ProductionBar;

fn view_height(commandable: &Commandable) -> f32 {
    if commandable.is_mobile() {
        UNIT_HEIGHT
    } else {
        BUILDING_HEIGHT * 0.5
    }
}

/// Spawns views for new commandables and despawns views whose commandable
/// is gone.
///
/// Only touches the diff, so it is cheap on frames where nothing spawned.
pub(super) fn reconcile_unit_views(
    mut commands: Commands,
    session: Res<Session>,
    mut views: ResMut<UnitViews>,
    unit_mesh: Res<UnitMesh>,
    unit_materials: Res<UnitMaterials>,
) {
    let units = session.units();

    views.0.retain(|id, entity| {
        let alive = units.contains(*id);
        if !alive {
            commands.entity(*entity).despawn();
        }
        alive
    });

    for commandable in units.iter() {
        if views.0.contains_key(&commandable.id) {
            continue;
        }

        let radius = commandable.steering_radius;
        let height = view_height(commandable);
        let (mesh, material, scale) = if commandable.is_mobile() {
            (&unit_mesh.unit, &unit_materials.mobile, Vec3::splat(radius * 2.0))
        } else {
            (
                &unit_mesh.building,
                &unit_materials.building,
                Vec3::new(radius * 2.0, BUILDING_HEIGHT, radius * 2.0),
            )
        };

        let mut entity = commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(commandable.position + Vec3::Y * height),
            Visibility::default(),
            UnitView(commandable.id),
        ));

        entity.with_children(|parent| {
            // Parent scale is undone so the ring matches the steering radius.
            parent.spawn((
                Mesh3d(unit_mesh.circle.clone()),
                MeshMaterial3d(unit_materials.selection_circle.clone()),
                Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2))
                    .with_translation(Vec3::new(0.0, (0.05 - height) / scale.y, 0.0))
                    .with_scale(Vec3::new(radius * 1.2 / scale.x, radius * 1.2 / scale.z, 1.0)),
                Visibility::Hidden,
                SelectionCircle,
            ));

            if commandable.production.is_some() {
                parent.spawn((
                    Mesh3d(unit_mesh.quad.clone()),
                    MeshMaterial3d(unit_materials.production_bar.clone()),
                    Transform::from_xyz(0.0, 0.75, 0.0),
                    Visibility::Hidden,
                    ProductionBar,
                ));
            }
        });

        views.0.insert(commandable.id, entity.id());
    }
}

/// Copies core positions onto view transforms.
pub(super) fn sync_visuals(
    session: Res<Session>,
    mut query: Query<(&UnitView, &mut Transform)>,
) {
    for (view, mut transform) in query.iter_mut() {
        let Some(commandable) = session.units().get(view.0) else { continue };
        transform.translation = commandable.position + Vec3::Y * view_height(commandable);
    }
}

/// Shows/hides selection circles from the selection registry
pub(super) fn update_selection_circle_visibility(
    session: Res<Session>,
    q_views: Query<(&UnitView, &Children)>,
    mut q_vis: Query<&mut Visibility, With<SelectionCircle>>,
) {
    let registry = session.registry();
    for (view, children) in q_views.iter() {
        let wanted = if registry.is_selected(view.0) {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        for child in children.iter() {
            if let Ok(mut vis) = q_vis.get_mut(child) {
                vis.set_if_neq(wanted);
            }
        }
    }
}

/// Stretches the production bar with the head order's progress.
pub(super) fn update_production_bars(
    session: Res<Session>,
    q_views: Query<(&UnitView, &Children)>,
    mut q_bars: Query<(&mut Transform, &mut Visibility), With<ProductionBar>>,
) {
    for (view, children) in q_views.iter() {
        let Some(queue) = session.units().get(view.0).and_then(|c| c.production.as_ref()) else {
            continue;
        };
        for child in children.iter() {
            let Ok((mut transform, mut vis)) = q_bars.get_mut(child) else { continue };
            if queue.is_empty() {
                vis.set_if_neq(Visibility::Hidden);
            } else {
                vis.set_if_neq(Visibility::Visible);
                transform.scale.x = queue.progress().max(0.01);
            }
        }
    }
}
