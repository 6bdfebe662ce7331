//! Authored mover data: keyframes and sequencing modes

use hinge_core::{EntityId, Vec3};
use serde::{Deserialize, Serialize};

/// An authored waypoint on a mover's path. Immutable once the level is loaded.
///
/// Keyframe `k` owns the segment between `k` and `k + 1` (the last keyframe
/// owns the wrap-around segment of looping movers): its timing fields drive
/// that segment in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// World position of the mover at this keyframe
    pub position: Vec3,
    /// Orientation at this keyframe (Euler degrees: pitch, yaw, roll)
    #[serde(default)]
    pub orientation: Vec3,
    /// Signed angle in radians swept by the owned segment (rotating movers)
    #[serde(default)]
    pub rotation_angle: f64,
    /// Seconds to wait after arriving here before moving on
    #[serde(default)]
    pub pause: f64,
    /// Duration of the owned segment traveled forward, in seconds. When the
    /// mover uses travel time as velocity this is a speed in units/second.
    #[serde(default = "default_segment_time")]
    pub forward_time: f64,
    /// Duration (or speed) of the owned segment traveled backward
    #[serde(default = "default_segment_time")]
    pub reverse_time: f64,
    /// Acceleration ramp duration in seconds
    #[serde(default)]
    pub accel: f64,
    /// Deceleration ramp duration in seconds
    #[serde(default)]
    pub decel: f64,
    /// Event fired when the mover arrives here
    #[serde(default)]
    pub event: Option<String>,
    /// Up to two items linked to this keyframe
    #[serde(default)]
    pub linked_items: Vec<EntityId>,
}

fn default_segment_time() -> f64 {
    1.0
}

impl Keyframe {
    /// A keyframe at `position` with one-second segments and no ramps.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Vec3::ZERO,
            rotation_angle: 0.0,
            pause: 0.0,
            forward_time: default_segment_time(),
            reverse_time: default_segment_time(),
            accel: 0.0,
            decel: 0.0,
            event: None,
            linked_items: Vec::new(),
        }
    }

    pub fn with_times(mut self, forward: f64, reverse: f64) -> Self {
        self.forward_time = forward;
        self.reverse_time = reverse;
        self
    }

    pub fn with_ramps(mut self, accel: f64, decel: f64) -> Self {
        self.accel = accel;
        self.decel = decel;
        self
    }

    pub fn with_pause(mut self, pause: f64) -> Self {
        self.pause = pause;
        self
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn with_rotation(mut self, angle: f64) -> Self {
        self.rotation_angle = angle;
        self
    }

    pub fn with_orientation(mut self, orientation: Vec3) -> Self {
        self.orientation = orientation;
        self
    }

    /// Authored segment time for the given travel direction
    pub fn segment_time(&self, forward: bool) -> f64 {
        if forward {
            self.forward_time
        } else {
            self.reverse_time
        }
    }
}

/// How a mover picks its next keyframe when a segment completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MoveType {
    /// Run to the far end and stop; the next activation runs back
    #[default]
    OneWay,
    /// Run to the far end, come straight back, then stop
    PingPongOnce,
    /// Bounce between the ends forever
    PingPongInfinite,
    /// Run one full circuit, wrapping from last to first
    LoopOnce,
    /// Circle forever
    LoopInfinite,
    /// One segment per activation
    Lift,
}

impl MoveType {
    /// Loop modes always travel forward and wrap at the end
    pub fn is_loop(self) -> bool {
        matches!(self, MoveType::LoopOnce | MoveType::LoopInfinite)
    }
}

/// Whether a mover translates along its keyframes or rotates in place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoverKind {
    #[default]
    Translate,
    Rotate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyframe_defaults_from_toml() {
        let kf: Keyframe = toml::from_str("position = [1.0, 2.0, 3.0]").unwrap();
        assert_eq!(kf.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(kf.forward_time, 1.0);
        assert_eq!(kf.reverse_time, 1.0);
        assert_eq!(kf.accel, 0.0);
        assert!(kf.event.is_none());
        assert!(kf.linked_items.is_empty());
    }

    #[test]
    fn segment_time_picks_direction() {
        let kf = Keyframe::at(Vec3::ZERO).with_times(2.0, 3.0);
        assert_eq!(kf.segment_time(true), 2.0);
        assert_eq!(kf.segment_time(false), 3.0);
    }

    #[test]
    fn move_type_parses_variant_names() {
        #[derive(Deserialize)]
        struct Holder {
            mode: MoveType,
        }
        let h: Holder = toml::from_str("mode = \"PingPongInfinite\"").unwrap();
        assert_eq!(h.mode, MoveType::PingPongInfinite);
        assert!(MoveType::LoopOnce.is_loop());
        assert!(!MoveType::Lift.is_loop());
    }
}
