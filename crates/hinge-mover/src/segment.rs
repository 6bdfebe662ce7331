//! Geometry and timing of the segment between two keyframes

use crate::keyframe::MoverKind;
use crate::mover::Mover;

/// Shortest duration a segment is ever evaluated with
pub const MIN_SEGMENT_DURATION: f64 = 0.001;

/// Fraction of a velocity-mode segment the ramps may take up together
const RAMP_BUDGET: f64 = 0.9;

/// A resolved segment of a mover's path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: usize,
    pub to: usize,
    pub forward: bool,
    /// Path length: units for translation, radians for rotation
    pub distance: f64,
    /// Always at least [`MIN_SEGMENT_DURATION`]
    pub duration: f64,
    pub accel: f64,
    pub decel: f64,
    /// Signed sweep of the owning keyframe, before direction is applied
    pub rotation_span: f64,
}

impl Segment {
    /// Resolve the segment `from -> to` of `mover` traveled in the given
    /// direction. The forward-side keyframe owns the timing: `from` when
    /// going forward, `to` when going backward.
    ///
    /// Returns `None` for out-of-range or degenerate (`from == to`) indices.
    pub fn resolve(mover: &Mover, from: usize, to: usize, forward: bool) -> Option<Self> {
        if from == to {
            return None;
        }
        let start = mover.keyframe(from)?;
        let end = mover.keyframe(to)?;
        let owner = if forward { start } else { end };

        let distance = match mover.kind {
            MoverKind::Translate => start.position.distance(&end.position),
            MoverKind::Rotate => owner.rotation_angle.abs(),
        };

        let authored = owner.segment_time(forward);
        let velocity_mode = mover.flags.use_travel_time_as_velocity;
        let mut duration = if velocity_mode {
            distance / authored
        } else {
            authored
        };
        if !(duration.is_finite() && duration > 0.0) {
            duration = MIN_SEGMENT_DURATION;
        }
        duration = duration.max(MIN_SEGMENT_DURATION);

        let mut accel = owner.accel.max(0.0);
        let mut decel = owner.decel.max(0.0);
        if velocity_mode {
            let budget = RAMP_BUDGET * duration;
            let ramps = accel + decel;
            if ramps > budget {
                let scale = budget / ramps;
                accel *= scale;
                decel *= scale;
            }
        }

        Some(Self {
            from,
            to,
            forward,
            distance,
            duration,
            accel,
            decel,
            rotation_span: owner.rotation_angle,
        })
    }
}
