use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Highest UI slot a command may occupy (the action panel has 9 slots).
pub const MAX_SLOT: u8 = 8;
pub const SLOT_COUNT: usize = MAX_SLOT as usize + 1;

/// Index of a command inside the [`CommandCatalog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub u16);

/// Index of a unit type inside the [`CommandCatalog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitTypeId(pub u16);

pub type CommandList = SmallVec<[CommandId; 4]>;

/// The closed set of things a player can order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CommandKind {
    /// Walk to the clicked point. Applies to anything with a nav agent.
    Move,
    /// Queue production of `unit`. Applies to anything with a build queue.
    BuildUnit { unit: UnitTypeId, build_time: Duration },
}

/// Immutable command descriptor. One instance per command type, shared by
/// every entity that offers it.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    pub id: CommandId,
    pub name: String,
    pub icon: String,
    pub slot: u8,
    pub requires_click_to_activate: bool,
    pub kind: CommandKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnitType {
    pub id: UnitTypeId,
    pub name: String,
    pub health: i32,
    pub steering_radius: f32,
    /// `None` for static structures.
    pub move_speed: Option<f32>,
    pub build_time: Duration,
    pub production: bool,
    /// In registration order, as listed in the catalog file.
    pub commands: CommandList,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("duplicate command name `{0}`")]
    DuplicateCommand(String),

    #[error("duplicate unit type name `{0}`")]
    DuplicateUnitType(String),

    #[error("command `{name}` uses slot {slot}, slots run 0..={max}", max = MAX_SLOT)]
    SlotOutOfRange { name: String, slot: u8 },

    #[error("command `{command}` builds unknown unit type `{unit}`")]
    UnknownUnitType { command: String, unit: String },

    #[error("unit type `{unit}` lists unknown command `{command}`")]
    UnknownCommand { unit: String, command: String },

    #[error("unit type `{0}` is built by a command but has no positive build time")]
    NonPositiveBuildTime(String),

    #[error("unit type `{name}` has a build time of {secs}s, which is too long")]
    BuildTimeOutOfRange { name: String, secs: f32 },

    #[error("unit type `{0}` needs a positive steering radius")]
    NonPositiveSteeringRadius(String),

    #[error("catalog holds more than {} entries", u16::MAX)]
    TooManyEntries,
}

// ============================================================================
// File format
// ============================================================================

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct CatalogDef {
    pub commands: Vec<CommandDef>,
    pub units: Vec<UnitTypeDef>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct CommandDef {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub slot: u8,
    #[serde(default = "default_requires_click")]
    pub requires_click_to_activate: bool,
    pub kind: CommandKindDef,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub enum CommandKindDef {
    Move,
    BuildUnit { unit: String },
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct UnitTypeDef {
    pub name: String,
    #[serde(default = "default_health")]
    pub health: i32,
    pub steering_radius: f32,
    #[serde(default)]
    pub move_speed: Option<f32>,
    #[serde(default)]
    pub build_time_secs: f32,
    #[serde(default)]
    pub production: bool,
    #[serde(default)]
    pub commands: Vec<String>,
}

fn default_requires_click() -> bool {
    true
}

fn default_health() -> i32 {
    100
}

/// Non-positive and unrepresentable times read as zero.
fn seconds_or_zero(secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs).unwrap_or(Duration::ZERO)
}

// ============================================================================
// Catalog
// ============================================================================

/// Every command and unit type known to the game. Built once at load time and
/// read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct CommandCatalog {
    commands: Vec<Command>,
    units: Vec<UnitType>,
}

impl CommandCatalog {
    pub fn from_ron(source: &str) -> Result<Self, CatalogError> {
        let def: CatalogDef = ron::from_str(source)?;
        Self::from_def(def)
    }

    /// Resolve names to ids and validate the definition.
    pub fn from_def(def: CatalogDef) -> Result<Self, CatalogError> {
        if def.commands.len() > u16::MAX as usize || def.units.len() > u16::MAX as usize {
            return Err(CatalogError::TooManyEntries);
        }

        let mut unit_ids: FxHashMap<&str, UnitTypeId> = FxHashMap::default();
        for (index, unit) in def.units.iter().enumerate() {
            if !unit.steering_radius.is_finite() || unit.steering_radius <= 0.0 {
                return Err(CatalogError::NonPositiveSteeringRadius(unit.name.clone()));
            }
            if unit_ids.insert(&unit.name, UnitTypeId(index as u16)).is_some() {
                return Err(CatalogError::DuplicateUnitType(unit.name.clone()));
            }
        }

        let mut command_ids: FxHashMap<&str, CommandId> = FxHashMap::default();
        let mut commands = Vec::with_capacity(def.commands.len());
        for (index, command) in def.commands.iter().enumerate() {
            let id = CommandId(index as u16);
            if command_ids.insert(&command.name, id).is_some() {
                return Err(CatalogError::DuplicateCommand(command.name.clone()));
            }
            if command.slot > MAX_SLOT {
                return Err(CatalogError::SlotOutOfRange {
                    name: command.name.clone(),
                    slot: command.slot,
                });
            }

            let kind = match &command.kind {
                CommandKindDef::Move => CommandKind::Move,
                CommandKindDef::BuildUnit { unit } => {
                    let Some(&unit_id) = unit_ids.get(unit.as_str()) else {
                        return Err(CatalogError::UnknownUnitType {
                            command: command.name.clone(),
                            unit: unit.clone(),
                        });
                    };
                    let build_time_secs = def.units[unit_id.0 as usize].build_time_secs;
                    if !build_time_secs.is_finite() || build_time_secs <= 0.0 {
                        return Err(CatalogError::NonPositiveBuildTime(unit.clone()));
                    }
                    let build_time = Duration::try_from_secs_f32(build_time_secs).map_err(|_| {
                        CatalogError::BuildTimeOutOfRange { name: unit.clone(), secs: build_time_secs }
                    })?;
                    CommandKind::BuildUnit { unit: unit_id, build_time }
                }
            };

            commands.push(Command {
                id,
                name: command.name.clone(),
                icon: command.icon.clone(),
                slot: command.slot,
                requires_click_to_activate: command.requires_click_to_activate,
                kind,
            });
        }

        let mut units = Vec::with_capacity(def.units.len());
        for (index, unit) in def.units.iter().enumerate() {
            let mut unit_commands = CommandList::new();
            for name in &unit.commands {
                let Some(&command_id) = command_ids.get(name.as_str()) else {
                    return Err(CatalogError::UnknownCommand {
                        unit: unit.name.clone(),
                        command: name.clone(),
                    });
                };
                unit_commands.push(command_id);
            }

            units.push(UnitType {
                id: UnitTypeId(index as u16),
                name: unit.name.clone(),
                health: unit.health,
                steering_radius: unit.steering_radius,
                move_speed: unit.move_speed,
                build_time: seconds_or_zero(unit.build_time_secs),
                production: unit.production,
                commands: unit_commands,
            });
        }

        Ok(Self { commands, units })
    }

    /// The catalog shipped with the game, used when `assets/catalog.ron` is
    /// missing or invalid.
    pub fn builtin() -> Self {
        let move_cmd = CommandId(0);
        let build_worker = CommandId(1);
        let build_soldier = CommandId(2);

        let worker = UnitTypeId(0);
        let soldier = UnitTypeId(1);

        let commands = vec![
            Command {
                id: move_cmd,
                name: "move".into(),
                icon: "icons/move.png".into(),
                slot: 0,
                requires_click_to_activate: true,
                kind: CommandKind::Move,
            },
            Command {
                id: build_worker,
                name: "build_worker".into(),
                icon: "icons/worker.png".into(),
                slot: 1,
                requires_click_to_activate: false,
                kind: CommandKind::BuildUnit { unit: worker, build_time: Duration::from_secs(3) },
            },
            Command {
                id: build_soldier,
                name: "build_soldier".into(),
                icon: "icons/soldier.png".into(),
                slot: 2,
                requires_click_to_activate: false,
                kind: CommandKind::BuildUnit { unit: soldier, build_time: Duration::from_secs(5) },
            },
        ];

        let units = vec![
            UnitType {
                id: worker,
                name: "worker".into(),
                health: 50,
                steering_radius: 0.5,
                move_speed: Some(6.0),
                build_time: Duration::from_secs(3),
                production: false,
                commands: CommandList::from_slice(&[move_cmd]),
            },
            UnitType {
                id: soldier,
                name: "soldier".into(),
                health: 100,
                steering_radius: 0.6,
                move_speed: Some(5.0),
                build_time: Duration::from_secs(5),
                production: false,
                commands: CommandList::from_slice(&[move_cmd]),
            },
            UnitType {
                id: UnitTypeId(2),
                name: "base".into(),
                health: 1000,
                steering_radius: 3.0,
                move_speed: None,
                build_time: Duration::ZERO,
                production: true,
                commands: CommandList::from_slice(&[build_worker, build_soldier]),
            },
            UnitType {
                id: UnitTypeId(3),
                name: "supply_hut".into(),
                health: 100,
                steering_radius: 1.5,
                move_speed: None,
                build_time: Duration::ZERO,
                production: false,
                commands: CommandList::new(),
            },
        ];

        Self { commands, units }
    }

    pub fn command(&self, id: CommandId) -> Option<&Command> {
        self.commands.get(id.0 as usize)
    }

    pub fn command_by_name(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn unit_type(&self, id: UnitTypeId) -> Option<&UnitType> {
        self.units.get(id.0 as usize)
    }

    pub fn unit_type_by_name(&self, name: &str) -> Option<&UnitType> {
        self.units.iter().find(|u| u.name == name)
    }

    pub fn unit_types(&self) -> &[UnitType] {
        &self.units
    }

    /// Resolve `ids` to commands ordered by slot, ties kept in the order given.
    /// Unknown ids are dropped.
    pub fn ordered(&self, ids: &[CommandId]) -> SmallVec<[&Command; 4]> {
        let mut ordered: SmallVec<[&Command; 4]> =
            ids.iter().filter_map(|&id| self.command(id)).collect();
        // sort_by_key is stable, so slot ties keep the given order.
        ordered.sort_by_key(|command| command.slot);
        ordered
    }
}
