use std::path::Path;

use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::command::{CatalogError, CommandCatalog};
use crate::game::control::{CameraConfig, Session, SessionSettings};
use crate::game::dispatch::FormationConfig;
use crate::game::unit::DEFAULT_QUEUE_CAPACITY;

pub const INITIAL_CONFIG_PATH: &str = "assets/initial_config.ron";
pub const CATALOG_PATH: &str = "assets/catalog.ron";

/// Largest build queue a config may ask for.
pub const MAX_BUILD_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid value in {path}: {reason}")]
    Invalid { path: String, reason: String },

    #[error("invalid catalog {path}: {source}")]
    Catalog {
        path: String,
        #[source]
        source: CatalogError,
    },
}

/// Static configuration loaded once at startup. Changing these values
/// requires a restart.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InitialConfig {
    // Formation
    pub layer_spacing_multiplier: f32,
    pub unit_spacing_multiplier: f32,

    // Units
    pub build_queue_capacity: usize,
    pub arrival_threshold: f32,
    pub selection_click_radius: f32,

    // Camera
    pub camera_follow_offset: Vec3,

    // Demo scene
    pub demo_workers: usize,
    pub demo_soldiers: usize,
    pub demo_spawn_spread: f32,
}

impl Default for InitialConfig {
    fn default() -> Self {
        let formation = FormationConfig::default();
        Self {
            layer_spacing_multiplier: formation.layer_spacing_multiplier,
            unit_spacing_multiplier: formation.unit_spacing_multiplier,
            build_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            arrival_threshold: 0.1,
            selection_click_radius: 0.5,
            camera_follow_offset: Vec3::new(0.0, 15.0, 15.0),
            demo_workers: 6,
            demo_soldiers: 4,
            demo_spawn_spread: 8.0,
        }
    }
}

impl InitialConfig {
    pub fn from_ron(source: &str, path: &str) -> Result<Self, ConfigError> {
        let config: Self =
            ron::from_str(source).map_err(|source| ConfigError::Parse { path: path.to_string(), source })?;
        config.validate().map_err(|reason| ConfigError::Invalid { path: path.to_string(), reason })?;
        Ok(config)
    }

    /// Reject values the session cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_BUILD_QUEUE_CAPACITY).contains(&self.build_queue_capacity) {
            return Err(format!(
                "build_queue_capacity {} is outside 1..={}",
                self.build_queue_capacity, MAX_BUILD_QUEUE_CAPACITY
            ));
        }
        let positive = [
            ("layer_spacing_multiplier", self.layer_spacing_multiplier),
            ("unit_spacing_multiplier", self.unit_spacing_multiplier),
            ("selection_click_radius", self.selection_click_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be positive, got {}", name, value));
            }
        }
        let non_negative = [
            ("arrival_threshold", self.arrival_threshold),
            ("demo_spawn_spread", self.demo_spawn_spread),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be zero or more, got {}", name, value));
            }
        }
        if !self.camera_follow_offset.is_finite() {
            return Err(format!("camera_follow_offset {} is not finite", self.camera_follow_offset));
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: display.clone(), source })?;
        Self::from_ron(&contents, &display)
    }

    /// Load from `path`, falling back to defaults with an error log.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                error!("Using default InitialConfig");
                Self::default()
            }
        }
    }

    pub fn formation(&self) -> FormationConfig {
        FormationConfig {
            layer_spacing_multiplier: self.layer_spacing_multiplier,
            unit_spacing_multiplier: self.unit_spacing_multiplier,
        }
    }

    pub fn session_settings(&self, camera: CameraConfig) -> SessionSettings {
        SessionSettings {
            formation: self.formation(),
            build_queue_capacity: self.build_queue_capacity,
            arrival_threshold: self.arrival_threshold,
            selection_click_radius: self.selection_click_radius,
            camera,
            camera_follow_offset: self.camera_follow_offset,
        }
    }
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<CommandCatalog, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: display.clone(), source })?;
    CommandCatalog::from_ron(&contents)
        .map_err(|source| ConfigError::Catalog { path: display, source })
}

/// Catalog from `path`, or the built-in one if it cannot be loaded.
pub fn load_catalog_or_builtin(path: impl AsRef<Path>) -> CommandCatalog {
    match load_catalog(path) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("{}", e);
            error!("Using built-in command catalog");
            CommandCatalog::builtin()
        }
    }
}

/// Runtime configuration that can be hot-reloaded during gameplay.
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug)]
#[serde(default)]
pub struct GameConfig {
    // Controls
    pub key_camera_forward: KeyCode,
    pub key_camera_backward: KeyCode,
    pub key_camera_left: KeyCode,
    pub key_camera_right: KeyCode,
    pub key_camera_zoom: KeyCode,
    pub key_camera_rotate_left: KeyCode,
    pub key_camera_rotate_right: KeyCode,
    pub key_additive_select: KeyCode,

    // Camera
    pub camera: CameraConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            key_camera_forward: KeyCode::KeyW,
            key_camera_backward: KeyCode::KeyS,
            key_camera_left: KeyCode::KeyA,
            key_camera_right: KeyCode::KeyD,
            key_camera_zoom: KeyCode::End,
            key_camera_rotate_left: KeyCode::PageUp,
            key_camera_rotate_right: KeyCode::PageDown,
            key_additive_select: KeyCode::ShiftLeft,
            camera: CameraConfig::default(),
        }
    }
}

#[derive(Resource)]
pub struct GameConfigHandle(pub Handle<GameConfig>);

pub struct GameConfigPlugin;

impl Plugin for GameConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<GameConfig>::new(&["game_config.ron"]))
           .add_systems(Startup, (load_initial_config, setup_runtime_config).chain())
           .add_systems(Update, apply_game_config);
    }
}

/// Load static initial configuration synchronously at startup.
pub fn load_initial_config(mut commands: Commands) {
    let config = InitialConfig::load_or_default(INITIAL_CONFIG_PATH);
    info!("Initial config ready ({} build slots per queue)", config.build_queue_capacity);
    commands.insert_resource(config);
}

/// Load runtime configuration asynchronously (can be hot-reloaded).
fn setup_runtime_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load("game_config.ron");
    commands.insert_resource(GameConfigHandle(handle));
}

/// Push loaded or edited camera settings into the running session.
fn apply_game_config(
    mut events: MessageReader<AssetEvent<GameConfig>>,
    handle: Option<Res<GameConfigHandle>>,
    configs: Res<Assets<GameConfig>>,
    session: Option<ResMut<Session>>,
) {
    let (Some(handle), Some(mut session)) = (handle, session) else { return };

    for event in events.read() {
        let id = match event {
            AssetEvent::LoadedWithDependencies { id } | AssetEvent::Modified { id } => *id,
            _ => continue,
        };
        if id != handle.0.id() {
            continue;
        }
        if let Some(config) = configs.get(id) {
            info!("Applying game config: {:?}", config.camera);
            session.set_camera_config(config.camera);
        }
    }
}

/// Current runtime config, or the defaults while the asset is still loading.
pub fn current_game_config<'a>(
    handle: Option<&GameConfigHandle>,
    configs: &'a Assets<GameConfig>,
    fallback: &'a GameConfig,
) -> &'a GameConfig {
    handle.and_then(|h| configs.get(&h.0)).unwrap_or(fallback)
}
