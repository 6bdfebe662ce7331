//! TOML level loading: level settings, movers and scripted inputs

use crate::keyframe::{Keyframe, MoveType, MoverKind};
use crate::mover::Mover;
use hinge_core::{EntityId, HingeError, IdAllocator, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Per-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSettings {
    pub name: String,
    /// Run movers with the legacy fixed-point math
    #[serde(default)]
    pub legacy_movers: bool,
    /// Fixed simulation rate in Hz
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
}

fn default_tick_rate() -> f64 {
    60.0
}

/// A mover as written in a level file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoverDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub kind: MoverKind,
    #[serde(default)]
    pub move_type: MoveType,
    #[serde(default)]
    pub door: bool,
    #[serde(default)]
    pub start_at_keyframe: usize,
    #[serde(default)]
    pub stop_completely_at_keyframe: Option<usize>,
    #[serde(default)]
    pub use_travel_time_as_velocity: bool,
    #[serde(default)]
    pub force_orient: bool,
    pub keyframes: Vec<Keyframe>,
}

/// Scripted input applied to a mover at a given tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptAction {
    /// Trigger on
    Activate,
    /// Trigger off
    Release,
    /// External hold on
    Pause,
    /// External hold off
    Resume,
    /// An entity steps into the mover's way
    Obstruct,
    /// The mover's path is blocked
    Block,
    /// Remove every obstruction of the mover
    Clear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub tick: u64,
    pub mover: String,
    pub action: ScriptAction,
    /// Activator or obstructing entity, where the action has one
    #[serde(default)]
    pub entity: Option<EntityId>,
}

#[derive(Debug, Clone, Deserialize)]
struct LevelFile {
    level: LevelSettings,
    #[serde(default)]
    movers: Vec<MoverDef>,
    #[serde(default)]
    script: Vec<ScriptEntry>,
}

/// A loaded, validated level
#[derive(Debug, Clone)]
pub struct Level {
    pub settings: LevelSettings,
    pub movers: Vec<Mover>,
    /// Sorted by tick; entries on the same tick keep file order
    pub script: Vec<ScriptEntry>,
    /// Source of fresh ids, above every id the level file mentions
    pub ids: IdAllocator,
}

impl Level {
    /// Script entries due on `tick`
    pub fn script_at(&self, tick: u64) -> impl Iterator<Item = &ScriptEntry> {
        self.script.iter().filter(move |entry| entry.tick == tick)
    }
}

/// Load a level from a `.level.toml` file.
pub fn load_level_from_file(path: &Path) -> Result<Level> {
    let content = std::fs::read_to_string(path)?;
    load_level_from_str(&content)
}

/// Parse and validate a level from a TOML string.
pub fn load_level_from_str(content: &str) -> Result<Level> {
    let file: LevelFile = toml::from_str(content)?;

    if !(file.level.tick_rate > 0.0 && file.level.tick_rate.is_finite()) {
        return Err(HingeError::ValueOutOfRange {
            field: "level.tick_rate".into(),
            min: f64::MIN_POSITIVE,
            max: f64::MAX,
            value: file.level.tick_rate,
        });
    }

    let mut allocator = IdAllocator::new();
    for def in &file.movers {
        if let Some(id) = def.id {
            allocator.reserve_through(id);
        }
        for kf in &def.keyframes {
            for &item in &kf.linked_items {
                allocator.reserve_through(item);
            }
        }
    }
    for entity in file.script.iter().filter_map(|entry| entry.entity) {
        allocator.reserve_through(entity);
    }

    let mut names = HashSet::new();
    let mut ids = HashSet::new();
    let mut movers = Vec::with_capacity(file.movers.len());
    for def in file.movers {
        if !names.insert(def.name.clone()) {
            return Err(HingeError::DuplicateMoverName(def.name));
        }
        let mover = build_mover(def, &mut allocator)?;
        if !ids.insert(mover.id) {
            return Err(HingeError::LevelError(format!(
                "Mover '{}' reuses id {}",
                mover.name, mover.id
            )));
        }
        movers.push(mover);
    }

    for entry in &file.script {
        if !names.contains(&entry.mover) {
            return Err(HingeError::MoverNotFound(format!(
                "{} (script entry at tick {})",
                entry.mover, entry.tick
            )));
        }
    }
    let mut script = file.script;
    script.sort_by_key(|entry| entry.tick);

    Ok(Level {
        settings: file.level,
        movers,
        script,
        ids: allocator,
    })
}

fn build_mover(def: MoverDef, allocator: &mut IdAllocator) -> Result<Mover> {
    let id = def.id.unwrap_or_else(|| allocator.allocate());
    let mover = Mover::new(id, def.name, def.keyframes, def.move_type)?
        .with_kind(def.kind)
        .as_door(def.door)
        .starting_at(def.start_at_keyframe)
        .holding_at(def.stop_completely_at_keyframe)
        .travel_time_as_velocity(def.use_travel_time_as_velocity)
        .force_orient(def.force_orient);
    mover.validate()?;
    Ok(mover)
}
