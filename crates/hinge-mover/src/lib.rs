//! Keyframe mover controller for Hinge
//!
//! Drives doors, lifts, platforms and rotating mechanisms along authored
//! keyframes, one fixed tick at a time:
//! - `profile` — trapezoidal velocity profile shared by translation and rotation
//! - `sequencer` — picks the next keyframe per `MoveType` on arrival
//! - `bounce` — reverses doors closing onto something
//! - `controller` / `rotation` — per-tick state machines
//! - `strategy` / `legacy` — keyframe vs. legacy math, chosen per level
//! - `loader` — TOML level files

pub mod bounce;
pub mod controller;
pub mod environment;
pub mod keyframe;
pub mod legacy;
pub mod loader;
pub mod mover;
pub mod profile;
pub mod rotation;
pub mod segment;
pub mod sequencer;
pub mod strategy;

use hinge_core::{EntityId, HingeError, IdAllocator, Result};
use hinge_runtime::{EventBus, RuntimeSystem};

use environment::{LevelEnvironment, Obstructions, TickContext};
use loader::{Level, ScriptAction, ScriptEntry};
use mover::{Mover, MoverSnapshot};
use strategy::MotionStrategy;

/// Top-level mover system: owns every mover of a level and ticks them in
/// load order once per fixed step.
///
/// Implements `RuntimeSystem`; sounds, keyframe events and lifecycle
/// notifications are published to the event bus.
pub struct MoverSystem {
    movers: Vec<Mover>,
    strategy: Box<dyn MotionStrategy>,
    pub obstructions: Obstructions,
    ids: IdAllocator,
    sim_time: f64,
}

impl MoverSystem {
    pub fn new(movers: Vec<Mover>, legacy_movers: bool) -> Self {
        let mut ids = IdAllocator::new();
        for mover in &movers {
            ids.reserve_through(mover.id);
        }
        Self {
            movers,
            strategy: strategy::select(legacy_movers),
            obstructions: Obstructions::new(),
            ids,
            sim_time: 0.0,
        }
    }

    /// Build the system for a loaded level, honoring its legacy flag.
    pub fn from_level(level: &Level) -> Self {
        let mut system = Self::new(level.movers.clone(), level.settings.legacy_movers);
        system.ids = level.ids.clone();
        system
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Simulation time after the last fixed step
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn movers(&self) -> &[Mover] {
        &self.movers
    }

    pub fn mover(&self, name: &str) -> Option<&Mover> {
        self.movers.iter().find(|m| m.name == name)
    }

    pub fn mover_mut(&mut self, name: &str) -> Option<&mut Mover> {
        self.movers.iter_mut().find(|m| m.name == name)
    }

    pub fn snapshots(&self) -> Vec<MoverSnapshot> {
        self.movers.iter().map(Mover::snapshot).collect()
    }

    /// Level trigger entry point: start (`on`) or release the named mover.
    pub fn activate(
        &mut self,
        name: &str,
        trigger: Option<EntityId>,
        activator: Option<EntityId>,
        on: bool,
        events: &mut EventBus,
    ) -> Result<bool> {
        let index = self
            .movers
            .iter()
            .position(|m| m.name == name)
            .ok_or_else(|| HingeError::MoverNotFound(name.to_string()))?;
        let mut env = LevelEnvironment::new(&self.obstructions, events);
        Ok(self.movers[index].activate(trigger, activator, on, &mut env))
    }

    /// Apply one scripted input.
    pub fn apply_script(&mut self, entry: &ScriptEntry, events: &mut EventBus) -> Result<()> {
        tracing::debug!(tick = entry.tick, mover = %entry.mover, action = ?entry.action, "script");
        let mover_id = self
            .mover(&entry.mover)
            .map(|m| m.id)
            .ok_or_else(|| HingeError::MoverNotFound(entry.mover.clone()))?;

        match entry.action {
            ScriptAction::Activate => {
                self.activate(&entry.mover, None, entry.entity, true, events)?;
            }
            ScriptAction::Release => {
                self.activate(&entry.mover, None, entry.entity, false, events)?;
            }
            ScriptAction::Pause | ScriptAction::Resume => {
                let paused = entry.action == ScriptAction::Pause;
                if let Some(mover) = self.mover_mut(&entry.mover) {
                    mover.set_paused(paused);
                }
            }
            ScriptAction::Obstruct => {
                let entity = match entry.entity {
                    Some(entity) => entity,
                    None => self.ids.allocate(),
                };
                self.obstructions.add_entity(mover_id, entity);
            }
            ScriptAction::Block => self.obstructions.set_blocked(mover_id, true),
            ScriptAction::Clear => self.obstructions.clear_mover(mover_id),
        }
        Ok(())
    }

    /// Advance every mover by `dt` seconds, in load order.
    pub fn step(&mut self, events: &mut EventBus, dt: f64) {
        self.sim_time += dt;
        let ctx = TickContext {
            now: self.sim_time,
            dt,
        };
        let mut env = LevelEnvironment::new(&self.obstructions, events);
        for mover in &mut self.movers {
            self.strategy.advance(mover, &mut env, ctx);
        }
    }

    /// Clear all movers for a level transition.
    pub fn clear(&mut self) {
        self.movers.clear();
        self.obstructions = Obstructions::new();
        self.ids = IdAllocator::new();
        self.sim_time = 0.0;
    }
}

impl RuntimeSystem for MoverSystem {
    fn initialize(&mut self, _events: &mut EventBus) -> Result<()> {
        for mover in &self.movers {
            mover.validate()?;
        }
        tracing::info!(
            movers = self.movers.len(),
            strategy = self.strategy.name(),
            "Mover system initialized"
        );
        Ok(())
    }

    fn fixed_update(&mut self, events: &mut EventBus, dt: f64) -> Result<()> {
        self.step(events, dt);
        Ok(())
    }

    fn update(&mut self, _events: &mut EventBus, _dt: f64) -> Result<()> {
        // Movers only change state on fixed steps
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Mover system shut down");
        Ok(())
    }

    fn name(&self) -> &str {
        "movers"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hinge_core::Vec3;
    use hinge_runtime::GameEvent;
    use keyframe::{Keyframe, MoveType};
    use loader::load_level_from_str;

    const LEVEL: &str = r#"
[level]
name = "lobby"
tick_rate = 4.0

[[movers]]
name = "door"
id = 1
move_type = "PingPongOnce"
door = true

[[movers.keyframes]]
position = [0.0, 0.0, 0.0]
forward_time = 1.0
reverse_time = 1.0

[[movers.keyframes]]
position = [0.0, 4.0, 0.0]
event = "door_open"

[[movers]]
name = "lift"
id = 2
move_type = "Lift"
keyframes = [{ position = [5.0, 0.0, 0.0] }, { position = [5.0, 2.0, 0.0] }]
"#;

    fn system(level: &Level) -> (MoverSystem, EventBus) {
        let mut system = MoverSystem::from_level(level);
        let mut bus = EventBus::new();
        system.initialize(&mut bus).unwrap();
        (system, bus)
    }

    #[test]
    fn activation_and_arrival_publish_events() {
        let level = load_level_from_str(LEVEL).unwrap();
        let (mut system, mut bus) = system(&level);
        let door = EntityId::from_raw(1);
        let player = EntityId::from_raw(99);

        assert!(system
            .activate("door", None, Some(player), true, &mut bus)
            .unwrap());
        for _ in 0..4 {
            system.fixed_update(&mut bus, 0.25).unwrap();
        }
        let events = bus.drain();
        assert_eq!(
            events,
            vec![
                GameEvent::MoverSoundStarted { mover: door },
                GameEvent::MoverStarted {
                    mover: door,
                    activator: Some(player),
                },
                GameEvent::MoverArrived {
                    mover: door,
                    keyframe: 1,
                },
                GameEvent::MoverEvent {
                    event: "door_open".into(),
                    source: door,
                },
            ]
        );
        assert_eq!(system.mover("door").unwrap().position, Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(system.sim_time(), 1.0);
    }

    #[test]
    fn unknown_mover_is_an_error() {
        let level = load_level_from_str(LEVEL).unwrap();
        let (mut system, mut bus) = system(&level);
        assert!(matches!(
            system.activate("nope", None, None, true, &mut bus),
            Err(HingeError::MoverNotFound(_))
        ));
    }

    #[test]
    fn scripted_obstruction_bounces_door() {
        let level = load_level_from_str(LEVEL).unwrap();
        let (mut system, mut bus) = system(&level);
        system.activate("door", None, None, true, &mut bus).unwrap();
        // Open (4 ticks) then two ticks into closing
        for _ in 0..6 {
            system.step(&mut bus, 0.25);
        }
        let entry = ScriptEntry {
            tick: 6,
            mover: "door".into(),
            action: ScriptAction::Obstruct,
            entity: Some(EntityId::from_raw(42)),
        };
        system.apply_script(&entry, &mut bus).unwrap();
        system.step(&mut bus, 0.25);
        let door = system.mover("door").unwrap();
        assert_eq!(door.stop_at_keyframe, Some(1));
        assert!(bus
            .drain()
            .contains(&GameEvent::MoverBounced { mover: door.id }));
    }

    #[test]
    fn one_way_door_waits_for_entity_in_doorway() {
        let vault = r#"
[level]
name = "vault"
tick_rate = 4.0

[[movers]]
name = "vault_door"
id = 3
move_type = "OneWay"
door = true
start_at_keyframe = 1
keyframes = [{ position = [0.0, 0.0, 0.0] }, { position = [0.0, 4.0, 0.0] }]
"#;
        let level = load_level_from_str(vault).unwrap();
        let (mut system, mut bus) = system(&level);
        let door = EntityId::from_raw(3);
        let script = |action| ScriptEntry {
            tick: 1,
            mover: "vault_door".into(),
            action,
            entity: Some(EntityId::from_raw(99)),
        };

        system.activate("vault_door", None, None, true, &mut bus).unwrap();
        system.step(&mut bus, 0.25);
        system.apply_script(&script(ScriptAction::Obstruct), &mut bus).unwrap();
        for _ in 0..4 {
            system.step(&mut bus, 0.25);
        }
        let vault_door = system.mover("vault_door").unwrap();
        assert_eq!(vault_door.position, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(vault_door.state(), mover::MoverState::PausedAtKeyframe);
        assert_eq!(vault_door.stop_at_keyframe, Some(0));
        let stops = bus
            .drain()
            .into_iter()
            .filter(|e| *e == GameEvent::MoverSoundStopped { mover: door })
            .count();
        assert_eq!(stops, 1);

        system.apply_script(&script(ScriptAction::Clear), &mut bus).unwrap();
        for _ in 0..3 {
            system.step(&mut bus, 0.25);
        }
        let vault_door = system.mover("vault_door").unwrap();
        assert_eq!(vault_door.position, Vec3::ZERO);
        assert!(!vault_door.is_moving());
    }

    #[test]
    fn scripted_obstruct_without_entity_allocates_fresh_id() {
        let level = load_level_from_str(LEVEL).unwrap();
        let (mut system, mut bus) = system(&level);
        let entry = ScriptEntry {
            tick: 0,
            mover: "lift".into(),
            action: ScriptAction::Obstruct,
            entity: None,
        };
        system.apply_script(&entry, &mut bus).unwrap();
        assert!(system.obstructions.has_entity(EntityId::from_raw(2)));
        assert_eq!(system.ids.allocate(), EntityId::from_raw(4));
    }

    #[test]
    fn scripted_pause_holds_mover() {
        let level = load_level_from_str(LEVEL).unwrap();
        let (mut system, mut bus) = system(&level);
        system.activate("lift", None, None, true, &mut bus).unwrap();
        let pause = ScriptEntry {
            tick: 0,
            mover: "lift".into(),
            action: ScriptAction::Pause,
            entity: None,
        };
        system.apply_script(&pause, &mut bus).unwrap();
        for _ in 0..10 {
            system.step(&mut bus, 0.25);
        }
        let lift = system.mover("lift").unwrap();
        assert_eq!(lift.position, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(lift.current_velocity, 0.0);
        assert!(lift.is_moving());
    }

    #[test]
    fn legacy_flag_selects_strategy() {
        let movers = vec![Mover::new(
            EntityId::from_raw(3),
            "m",
            vec![Keyframe::at(Vec3::ZERO), Keyframe::at(Vec3::UP)],
            MoveType::OneWay,
        )
        .unwrap()];
        assert_eq!(MoverSystem::new(movers.clone(), false).strategy_name(), "keyframe");
        assert_eq!(MoverSystem::new(movers, true).strategy_name(), "legacy");
    }

    #[test]
    fn clear_resets_level_state() {
        let level = load_level_from_str(LEVEL).unwrap();
        let (mut system, mut bus) = system(&level);
        system.step(&mut bus, 0.5);
        system.clear();
        assert!(system.movers().is_empty());
        assert_eq!(system.sim_time(), 0.0);
        system.shutdown().unwrap();
    }
}
