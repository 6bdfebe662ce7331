//! Typed game events published by runtime systems

use hinge_core::EntityId;
use serde::Serialize;

/// Events exchanged between systems through the [`EventBus`](crate::EventBus).
///
/// The mover subsystem publishes these; audio, scripting and replication
/// layers drain and react to them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A mover left rest in response to an activation
    MoverStarted {
        mover: EntityId,
        activator: Option<EntityId>,
    },
    /// A mover reached a keyframe at the end of a segment
    MoverArrived { mover: EntityId, keyframe: usize },
    /// A mover came to rest at a keyframe
    MoverStopped { mover: EntityId, keyframe: usize },
    /// A door reversed direction because something was in the way
    MoverBounced { mover: EntityId },
    /// A keyframe's authored event, fired on arrival
    MoverEvent { event: String, source: EntityId },
    /// Movement sound should start on the mover
    MoverSoundStarted { mover: EntityId },
    /// Movement sound should stop on the mover
    MoverSoundStopped { mover: EntityId },
}

impl GameEvent {
    /// The mover this event concerns
    pub fn mover(&self) -> EntityId {
        match self {
            GameEvent::MoverStarted { mover, .. }
            | GameEvent::MoverArrived { mover, .. }
            | GameEvent::MoverStopped { mover, .. }
            | GameEvent::MoverBounced { mover }
            | GameEvent::MoverSoundStarted { mover }
            | GameEvent::MoverSoundStopped { mover } => *mover,
            GameEvent::MoverEvent { source, .. } => *source,
        }
    }
}
