use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bevy::prelude::*;

use crate::game::command::{CommandCatalog, CommandId, TargetHit, UnitTypeId};
use crate::game::dispatch::{DispatchReport, Dispatcher, FormationConfig};
use crate::game::event_bus::{EventBus, Subscription};
use crate::game::events::{ActionSelected, ProductionCancelled, UnitProduced};
use crate::game::hud::ActionPanel;
use crate::game::math::{ray_ground_intersection, ray_sphere_projection};
use crate::game::selection::SelectionRegistry;
use crate::game::unit::{Commandable, EntityId, Units, DEFAULT_QUEUE_CAPACITY};

use super::camera_rig::{CameraConfig, CameraRig};
use super::drag::DragSelect;
use super::input::InputSnapshot;
use super::picker::Picker;

/// Tunables the session is built with.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSettings {
    pub formation: FormationConfig,
    pub build_queue_capacity: usize,
    /// Distance at which a moving unit counts as arrived.
    pub arrival_threshold: f32,
    /// Minimum pick radius for click selection, so tiny units stay clickable.
    pub selection_click_radius: f32,
    pub camera: CameraConfig,
    pub camera_follow_offset: Vec3,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            formation: FormationConfig::default(),
            build_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            arrival_threshold: 0.1,
            selection_click_radius: 0.5,
            camera: CameraConfig::default(),
            camera_follow_offset: Vec3::new(0.0, 15.0, 15.0),
        }
    }
}

/// One player's control session: owns the world model and turns per-frame
/// input into selection changes and orders.
#[derive(Resource)]
pub struct Session {
    settings: SessionSettings,
    bus: EventBus,
    registry: SelectionRegistry,
    catalog: CommandCatalog,
    units: Units,
    dispatcher: Dispatcher,
    camera: CameraRig,
    drag: DragSelect,
    panel: ActionPanel,
    active_action: Option<CommandId>,
    picked_actions: Arc<Mutex<Vec<CommandId>>>,
    action_subscription: Option<Subscription>,
}

impl Session {
    pub fn new(settings: SessionSettings, catalog: CommandCatalog) -> Self {
        let bus = EventBus::new();
        let registry = SelectionRegistry::new(bus.clone());
        let panel = ActionPanel::new(&bus);

        let picked_actions = Arc::new(Mutex::new(Vec::new()));
        let action_subscription = {
            let picked = Arc::clone(&picked_actions);
            bus.subscribe::<ActionSelected, _>(move |event| {
                picked
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(event.command);
            })
        };

        info!(
            "Session started with {} commands and {} unit types",
            catalog.commands().len(),
            catalog.unit_types().len()
        );

        Self {
            dispatcher: Dispatcher::new(settings.formation),
            camera: CameraRig::new(settings.camera, settings.camera_follow_offset),
            settings,
            bus,
            registry,
            catalog,
            units: Units::new(),
            drag: DragSelect::default(),
            panel,
            active_action: None,
            picked_actions,
            action_subscription: Some(action_subscription),
        }
    }

    /// Drop the session's own subscriptions. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(subscription) = self.action_subscription.take() {
            self.bus.unsubscribe(subscription);
            self.panel.shutdown();
            info!("Session shut down with {} live units", self.units.len());
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn registry(&self) -> &SelectionRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    pub fn units(&self) -> &Units {
        &self.units
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn set_camera_config(&mut self, config: CameraConfig) {
        self.settings.camera = config;
        self.camera.set_config(config);
    }

    pub fn drag(&self) -> &DragSelect {
        &self.drag
    }

    pub fn panel(&self) -> &ActionPanel {
        &self.panel
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn active_action(&self) -> Option<CommandId> {
        self.active_action
    }

    /// Create a unit of `unit_type` and register it as selectable.
    pub fn spawn_unit(&mut self, unit_type: UnitTypeId, position: Vec3) -> Option<EntityId> {
        let Some(template) = self.catalog.unit_type(unit_type) else {
            warn!("Cannot spawn unknown unit type {:?}", unit_type);
            return None;
        };

        let id = self.units.spawn(template, position, self.settings.build_queue_capacity);
        self.registry.register(id, unit_type);
        debug!("Spawned {} as {:?} at {}", template.name, id, position);
        Some(id)
    }

    pub fn spawn_unit_named(&mut self, name: &str, position: Vec3) -> Option<EntityId> {
        let Some(unit_type) = self.catalog.unit_type_by_name(name).map(|t| t.id) else {
            warn!("Cannot spawn unknown unit type `{}`", name);
            return None;
        };
        self.spawn_unit(unit_type, position)
    }

    /// Remove a unit. Any pending production is cancelled first.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        let Some(mut commandable) = self.units.remove(entity) else {
            return false;
        };

        if let Some(queue) = commandable.production.as_mut() {
            let pending = queue.cancel();
            if pending > 0 {
                info!("Cancelled {} pending orders of {:?}", pending, entity);
            }
            self.bus.publish(&ProductionCancelled { building: entity, pending });
        }

        self.registry.unregister(entity);
        true
    }

    /// Run one frame: camera, pending HUD actions, right-click orders, drag
    /// selection, then simulation.
    pub fn tick(&mut self, input: &InputSnapshot, dt: Duration, picker: Option<&dyn Picker>) {
        self.camera.update(input, dt.as_secs_f32());
        self.apply_picked_actions();

        match picker {
            Some(picker) => {
                self.handle_right_click(input, picker);
                self.handle_drag_select(input, picker);
            }
            None => {
                error_once!("No picker configured; selection and orders are disabled");
            }
        }

        self.advance(dt);
        self.panel.refresh(&self.catalog, &self.units);
    }

    /// Move units and run production timers.
    pub fn advance(&mut self, dt: Duration) {
        let dt_secs = dt.as_secs_f32();
        let threshold = self.settings.arrival_threshold;
        let mut produced: Vec<(EntityId, Vec3, UnitTypeId)> = Vec::new();

        for commandable in self.units.iter_mut() {
            let Commandable { id, position, nav, production, .. } = commandable;

            if let Some(nav) = nav.as_mut() {
                if nav.step(position, dt_secs, threshold) {
                    debug!("{:?} arrived at {}", id, position);
                }
            }
            if let Some(unit_type) = production.as_mut().and_then(|queue| queue.tick(dt)) {
                produced.push((*id, *position, unit_type));
            }
        }

        produced.sort_by_key(|(building, _, _)| *building);
        for (building, position, unit_type) in produced {
            if let Some(entity) = self.spawn_unit(unit_type, position) {
                self.bus.publish(&UnitProduced { building, entity, unit_type });
            }
        }
    }

    /// Smart order for the selection: every selected mobile unit runs its
    /// first applicable command against `hit`.
    pub fn order_selected(&mut self, hit: TargetHit) -> DispatchReport {
        let batch: Vec<EntityId> = self
            .registry
            .selected()
            .into_iter()
            .filter(|&id| self.units.get(id).is_some_and(Commandable::is_mobile))
            .collect();

        self.dispatcher.dispatch(&self.catalog, &mut self.units, &batch, hit)
    }

    /// Run an explicit command on every selected unit that can handle it.
    pub fn perform_action(&mut self, command: CommandId, hit: TargetHit) -> DispatchReport {
        let batch = self.registry.selected();
        self.dispatcher.dispatch_command(&self.catalog, &mut self.units, command, &batch, hit)
    }

    /// Publish an `ActionSelected` the way the command card does.
    pub fn select_action(&self, command: CommandId) {
        self.bus.publish(&ActionSelected { command });
    }

    fn apply_picked_actions(&mut self) {
        let picked = std::mem::take(
            &mut *self.picked_actions.lock().unwrap_or_else(PoisonError::into_inner),
        );

        for command_id in picked {
            let Some(command) = self.catalog.command(command_id) else {
                warn!("Ignoring unknown action {:?}", command_id);
                continue;
            };

            if command.requires_click_to_activate {
                debug!("Action `{}` waits for a target", command.name);
                self.active_action = Some(command_id);
            } else {
                self.fire_at_own_positions(command_id);
            }
        }
    }

    fn fire_at_own_positions(&mut self, command: CommandId) {
        for entity in self.registry.selected() {
            let Some(position) = self.units.get(entity).map(|c| c.position) else {
                continue;
            };
            let hit = TargetHit { point: position, object: Some(entity) };
            self.dispatcher
                .dispatch_command(&self.catalog, &mut self.units, command, &[entity], hit);
        }
    }

    fn handle_right_click(&mut self, input: &InputSnapshot, picker: &dyn Picker) {
        if !input.right_mouse.just_released || self.registry.selected_count() == 0 {
            return;
        }
        let Some(hit) = input.cursor.and_then(|cursor| self.target_under(cursor, picker)) else {
            return;
        };

        let report = self.order_selected(hit);
        debug!(
            "Right-click at {} issued {} commands, skipped {}",
            hit.point,
            report.issued.len(),
            report.skipped.len()
        );
    }

    fn handle_drag_select(&mut self, input: &InputSnapshot, picker: &dyn Picker) {
        let button = input.left_mouse;
        if button.just_pressed {
            if let Some(cursor) = input.cursor {
                self.drag.begin(cursor, picker.pointer_over_ui());
            }
        } else if button.pressed {
            self.drag_to(input, picker);
        } else if button.just_released {
            self.release(input, picker);
        }
    }

    fn drag_to(&mut self, input: &InputSnapshot, picker: &dyn Picker) {
        if !self.drag.is_pressed() || self.active_action.is_some() || self.drag.began_over_ui() {
            return;
        }
        let Some(cursor) = input.cursor else { return };

        let rect = self.drag.resize(cursor);
        for entity in self.registry.alive() {
            let Some(commandable) = self.units.get(entity) else { continue };
            if !commandable.is_mobile() {
                continue;
            }
            if picker
                .world_to_screen(commandable.position)
                .is_some_and(|screen| rect.contains(screen))
            {
                self.drag.collect(entity);
            }
        }
    }

    fn release(&mut self, input: &InputSnapshot, picker: &dyn Picker) {
        if !self.drag.is_pressed() {
            return;
        }
        let began_over_ui = self.drag.began_over_ui();
        let collected = self.drag.finish();
        if began_over_ui {
            return;
        }

        if self.active_action.is_none() && !input.additive.pressed {
            self.registry.deselect_all();
        }

        self.handle_left_click(input, picker);

        for entity in collected {
            self.registry.select(entity);
        }
    }

    fn handle_left_click(&mut self, input: &InputSnapshot, picker: &dyn Picker) {
        let Some(cursor) = input.cursor else { return };

        match self.active_action {
            None => {
                if let Some(entity) = picker.ray(cursor).and_then(|ray| self.unit_under(ray)) {
                    self.registry.select(entity);
                }
            }
            Some(command) => {
                if picker.pointer_over_ui() {
                    return;
                }
                if let Some(hit) = self.target_under(cursor, picker) {
                    self.perform_action(command, hit);
                    self.active_action = None;
                }
            }
        }
    }

    fn target_under(&self, cursor: Vec2, picker: &dyn Picker) -> Option<TargetHit> {
        let ray = picker.ray(cursor)?;
        let point = ray_ground_intersection(ray)?;
        Some(TargetHit { point, object: self.unit_under(ray) })
    }

    /// Closest alive unit whose pick sphere the ray passes through.
    fn unit_under(&self, ray: Ray3d) -> Option<EntityId> {
        let min_radius = self.settings.selection_click_radius;

        self.registry
            .alive()
            .into_iter()
            .filter_map(|entity| {
                let commandable = self.units.get(entity)?;
                let radius = commandable.steering_radius.max(min_radius);
                ray_sphere_projection(ray, commandable.position, radius).map(|depth| (entity, depth))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entity, _)| entity)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
