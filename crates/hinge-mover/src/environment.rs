//! The seam between movers and the rest of the level

use crate::mover::Mover;
use hinge_core::EntityId;
use hinge_runtime::{EventBus, GameEvent};
use std::collections::{HashMap, HashSet};

/// Timing of one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Simulation time at the end of this tick
    pub now: f64,
    /// Length of this tick in seconds
    pub dt: f64,
}

/// Queries and side effects a mover needs from its surroundings.
///
/// Queries are read-only for the duration of a tick. The lifecycle
/// notifications default to no-ops.
pub trait MoverEnvironment {
    fn is_door(&self, mover: &Mover) -> bool {
        mover.door
    }

    /// Something is standing in the mover's way (e.g. a player in a doorway)
    fn is_obstructed_by_entity(&self, mover: &Mover) -> bool;

    /// The mover's path is blocked and it must wait
    fn is_obstructed(&self, mover: &Mover) -> bool;

    fn play_start_sound(&mut self, mover: &Mover);

    fn play_stop_sound(&mut self, mover: &Mover);

    fn fire_event(&mut self, event: &str, source: &Mover);

    fn mover_started(&mut self, _mover: &Mover) {}

    fn mover_arrived(&mut self, _mover: &Mover, _keyframe: usize) {}

    fn mover_stopped(&mut self, _mover: &Mover, _keyframe: usize) {}

    fn mover_bounced(&mut self, _mover: &Mover) {}
}

/// Who is blocking which mover. Updated between ticks, read during them.
#[derive(Debug, Clone, Default)]
pub struct Obstructions {
    by_entity: HashMap<EntityId, HashSet<EntityId>>,
    blocked: HashSet<EntityId>,
}

impl Obstructions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `entity` standing in `mover`'s way
    pub fn add_entity(&mut self, mover: EntityId, entity: EntityId) {
        self.by_entity.entry(mover).or_default().insert(entity);
    }

    pub fn remove_entity(&mut self, mover: EntityId, entity: EntityId) {
        if let Some(set) = self.by_entity.get_mut(&mover) {
            set.remove(&entity);
            if set.is_empty() {
                self.by_entity.remove(&mover);
            }
        }
    }

    pub fn set_blocked(&mut self, mover: EntityId, blocked: bool) {
        if blocked {
            self.blocked.insert(mover);
        } else {
            self.blocked.remove(&mover);
        }
    }

    /// Forget everything about `mover`
    pub fn clear_mover(&mut self, mover: EntityId) {
        self.by_entity.remove(&mover);
        self.blocked.remove(&mover);
    }

    pub fn has_entity(&self, mover: EntityId) -> bool {
        self.by_entity.contains_key(&mover)
    }

    pub fn is_blocked(&self, mover: EntityId) -> bool {
        self.blocked.contains(&mover)
    }
}

/// Environment backed by the level's obstruction table, publishing sounds
/// and events onto the game's event bus.
pub struct LevelEnvironment<'a> {
    obstructions: &'a Obstructions,
    events: &'a mut EventBus,
}

impl<'a> LevelEnvironment<'a> {
    pub fn new(obstructions: &'a Obstructions, events: &'a mut EventBus) -> Self {
        Self {
            obstructions,
            events,
        }
    }
}

impl MoverEnvironment for LevelEnvironment<'_> {
    fn is_obstructed_by_entity(&self, mover: &Mover) -> bool {
        self.obstructions.has_entity(mover.id)
    }

    fn is_obstructed(&self, mover: &Mover) -> bool {
        self.obstructions.is_blocked(mover.id)
    }

    fn play_start_sound(&mut self, mover: &Mover) {
        self.events
            .push(GameEvent::MoverSoundStarted { mover: mover.id });
    }

    fn play_stop_sound(&mut self, mover: &Mover) {
        self.events
            .push(GameEvent::MoverSoundStopped { mover: mover.id });
    }

    fn fire_event(&mut self, event: &str, source: &Mover) {
        self.events.push(GameEvent::MoverEvent {
            event: event.to_string(),
            source: source.id,
        });
    }

    fn mover_started(&mut self, mover: &Mover) {
        self.events.push(GameEvent::MoverStarted {
            mover: mover.id,
            activator: mover.activator,
        });
    }

    fn mover_arrived(&mut self, mover: &Mover, keyframe: usize) {
        self.events.push(GameEvent::MoverArrived {
            mover: mover.id,
            keyframe,
        });
    }

    fn mover_stopped(&mut self, mover: &Mover, keyframe: usize) {
        self.events.push(GameEvent::MoverStopped {
            mover: mover.id,
            keyframe,
        });
    }

    fn mover_bounced(&mut self, mover: &Mover) {
        self.events.push(GameEvent::MoverBounced { mover: mover.id });
    }
}
