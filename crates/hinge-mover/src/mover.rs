//! Per-mover mutable state and the activation entry point

use crate::environment::MoverEnvironment;
use crate::keyframe::{Keyframe, MoveType, MoverKind};
use hinge_core::{EntityId, HingeError, Result, Vec3};
use serde::Serialize;

/// Mutable flags of a mover, one named boolean each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MoverFlags {
    /// External hold (scripted); the mover does not advance while set
    pub paused: bool,
    /// Timed pause after arriving at a keyframe, or after being blocked
    pub paused_at_keyframe: bool,
    /// Which way the mover travels; kept across activations
    pub direction_forward: bool,
    /// Keyframe times are speeds in units per second rather than durations
    pub use_travel_time_as_velocity: bool,
    /// Face along the direction of travel instead of blending keyframe orientations
    pub force_orient: bool,
}

/// Coarse state of a mover, derived from its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoverState {
    Resting,
    PausedExternal,
    PausedAtKeyframe,
    Traveling,
}

/// A level-authored mechanism driven along its keyframes.
///
/// Lives from level load to unload. `start_at_keyframe` and
/// `stop_at_keyframe` are the ends of the segment being traversed;
/// `stop_at_keyframe == None` means the mover is at rest on
/// `start_at_keyframe`.
#[derive(Debug, Clone)]
pub struct Mover {
    pub id: EntityId,
    pub name: String,
    keyframes: Vec<Keyframe>,
    pub kind: MoverKind,
    pub move_type: MoveType,
    /// Authored door flag, consulted through [`MoverEnvironment::is_door`]
    pub door: bool,
    pub flags: MoverFlags,
    pub start_at_keyframe: usize,
    pub stop_at_keyframe: Option<usize>,
    /// Seconds spent in the current segment
    pub travel_time_seconds: f64,
    /// Simulation time at which a timed pause ends
    pub pause_deadline: f64,
    /// Keyframe the mover parks on until it is activated again
    pub stop_completely_at_keyframe: Option<usize>,
    /// Keyframe a loop circuit started from
    pub loop_origin: usize,
    /// Whoever last activated the mover
    pub activator: Option<EntityId>,
    pub position: Vec3,
    /// Euler degrees: pitch, yaw, roll
    pub orientation: Vec3,
    /// Scalar speed along the path (units/s, or rad/s for rotators)
    pub current_velocity: f64,
    /// Accumulated rotation in radians, kept in `[0, 2π)`
    pub rotation_current_angle: f64,
}

impl Mover {
    /// Create a mover resting on its first keyframe.
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        keyframes: Vec<Keyframe>,
        move_type: MoveType,
    ) -> Result<Self> {
        let name = name.into();
        if keyframes.len() < 2 {
            return Err(HingeError::LevelError(format!(
                "Mover '{}' needs at least 2 keyframes, got {}",
                name,
                keyframes.len()
            )));
        }
        let position = keyframes[0].position;
        let orientation = keyframes[0].orientation;
        Ok(Self {
            id,
            name,
            keyframes,
            kind: MoverKind::Translate,
            move_type,
            door: false,
            flags: MoverFlags {
                direction_forward: true,
                ..MoverFlags::default()
            },
            start_at_keyframe: 0,
            stop_at_keyframe: None,
            travel_time_seconds: 0.0,
            pause_deadline: 0.0,
            stop_completely_at_keyframe: None,
            loop_origin: 0,
            activator: None,
            position,
            orientation,
            current_velocity: 0.0,
            rotation_current_angle: 0.0,
        })
    }

    pub fn with_kind(mut self, kind: MoverKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn as_door(mut self, door: bool) -> Self {
        self.door = door;
        self
    }

    /// Rest on `index` instead of the first keyframe
    pub fn starting_at(mut self, index: usize) -> Self {
        self.start_at_keyframe = index;
        if let Some(kf) = self.keyframes.get(index) {
            self.position = kf.position;
            self.orientation = kf.orientation;
        }
        self
    }

    pub fn holding_at(mut self, index: Option<usize>) -> Self {
        self.stop_completely_at_keyframe = index;
        self
    }

    pub fn travel_time_as_velocity(mut self, enabled: bool) -> Self {
        self.flags.use_travel_time_as_velocity = enabled;
        self
    }

    pub fn force_orient(mut self, enabled: bool) -> Self {
        self.flags.force_orient = enabled;
        self
    }

    /// Check authored indices and keyframe data.
    pub fn validate(&self) -> Result<()> {
        let count = self.keyframes.len();
        if self.start_at_keyframe >= count {
            return Err(HingeError::InvalidKeyframeIndex {
                mover: self.name.clone(),
                index: self.start_at_keyframe,
                count,
            });
        }
        if let Some(hold) = self.stop_completely_at_keyframe {
            if hold >= count {
                return Err(HingeError::InvalidKeyframeIndex {
                    mover: self.name.clone(),
                    index: hold,
                    count,
                });
            }
        }
        for (i, kf) in self.keyframes.iter().enumerate() {
            if kf.linked_items.len() > 2 {
                return Err(HingeError::LevelError(format!(
                    "Mover '{}' keyframe {} links {} items (at most 2)",
                    self.name,
                    i,
                    kf.linked_items.len()
                )));
            }
        }
        Ok(())
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn keyframe(&self, index: usize) -> Option<&Keyframe> {
        self.keyframes.get(index)
    }

    pub fn last_index(&self) -> usize {
        self.keyframes.len() - 1
    }

    pub fn state(&self) -> MoverState {
        if self.flags.paused {
            MoverState::PausedExternal
        } else if self.stop_at_keyframe.is_none() {
            MoverState::Resting
        } else if self.flags.paused_at_keyframe {
            MoverState::PausedAtKeyframe
        } else {
            MoverState::Traveling
        }
    }

    pub fn is_moving(&self) -> bool {
        self.stop_at_keyframe.is_some()
    }

    /// Set or clear the external hold.
    pub fn set_paused(&mut self, paused: bool) {
        self.flags.paused = paused;
        if paused {
            self.current_velocity = 0.0;
        }
    }

    /// Start or release the mover in response to a trigger.
    ///
    /// `on = true` starts a resting mover; it is ignored while the mover is
    /// already under way. `on = false` releases a mover parked on its
    /// stop-completely keyframe, sending it back the way it came.
    /// Returns whether the mover started moving.
    pub fn activate(
        &mut self,
        trigger: Option<EntityId>,
        activator: Option<EntityId>,
        on: bool,
        env: &mut dyn MoverEnvironment,
    ) -> bool {
        if self.is_moving() {
            tracing::debug!(mover = %self.name, ?trigger, on, "activation ignored, already moving");
            return false;
        }

        if !on {
            if self.stop_completely_at_keyframe != Some(self.start_at_keyframe) {
                return false;
            }
            if !self.move_type.is_loop() {
                self.flags.direction_forward = !self.flags.direction_forward;
            }
        }

        let Some(next) = self.first_segment() else {
            tracing::warn!(mover = %self.name, start = self.start_at_keyframe, "cannot start from invalid keyframe");
            return false;
        };

        self.stop_at_keyframe = Some(next);
        self.travel_time_seconds = 0.0;
        self.flags.paused_at_keyframe = false;
        self.activator = activator;
        tracing::debug!(
            mover = %self.name,
            from = self.start_at_keyframe,
            to = next,
            forward = self.flags.direction_forward,
            "mover activated"
        );
        env.play_start_sound(self);
        env.mover_started(self);
        true
    }

    /// Pick the first segment out of `start_at_keyframe`, flipping direction
    /// when the mover already sits on the endpoint it was heading for.
    fn first_segment(&mut self) -> Option<usize> {
        let start = self.start_at_keyframe;
        let last = self.last_index();
        if start > last {
            return None;
        }

        if self.move_type.is_loop() {
            self.flags.direction_forward = true;
            self.loop_origin = start;
            return Some((start + 1) % self.keyframes.len());
        }

        if self.flags.direction_forward {
            if start < last {
                Some(start + 1)
            } else {
                self.flags.direction_forward = false;
                Some(start - 1)
            }
        } else if start > 0 {
            Some(start - 1)
        } else {
            self.flags.direction_forward = true;
            Some(start + 1)
        }
    }

    /// Place the mover exactly on keyframe `index`.
    pub(crate) fn snap_to(&mut self, index: usize) {
        if let Some(kf) = self.keyframes.get(index) {
            self.position = kf.position;
            self.orientation = kf.orientation;
        }
    }

    /// Come to rest on `index`.
    pub(crate) fn park(&mut self, index: usize) {
        self.start_at_keyframe = index;
        self.stop_at_keyframe = None;
        self.travel_time_seconds = 0.0;
        self.current_velocity = 0.0;
        self.flags.paused_at_keyframe = false;
    }

    /// Rest without moving after finding the mover in an unusable state.
    pub(crate) fn fail_safe_rest(&mut self, reason: &str) {
        tracing::warn!(
            mover = %self.name,
            start = self.start_at_keyframe,
            stop = ?self.stop_at_keyframe,
            reason,
            "resting mover"
        );
        let start = self.start_at_keyframe.min(self.last_index());
        self.park(start);
    }

    pub fn snapshot(&self) -> MoverSnapshot {
        MoverSnapshot {
            id: self.id,
            name: self.name.clone(),
            state: self.state(),
            start_at_keyframe: self.start_at_keyframe,
            stop_at_keyframe: self.stop_at_keyframe,
            travel_time_seconds: self.travel_time_seconds,
            position: self.position.to_array(),
            orientation: self.orientation.to_array(),
            velocity: self.current_velocity,
            angle: self.rotation_current_angle,
        }
    }
}

/// Read-only view of a mover for the interpolation and reporting layers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoverSnapshot {
    pub id: EntityId,
    pub name: String,
    pub state: MoverState,
    pub start_at_keyframe: usize,
    pub stop_at_keyframe: Option<usize>,
    pub travel_time_seconds: f64,
    pub position: [f64; 3],
    pub orientation: [f64; 3],
    pub velocity: f64,
    pub angle: f64,
}
