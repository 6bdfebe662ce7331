//! Compatibility motion for levels authored against the old mover math.
//!
//! Linear only: ramps are ignored, travel time advances in whole
//! milliseconds and progress is a 16.16 fixed-point fraction. Doors do not
//! bounce. Sequencing is shared with the keyframe strategy.

use crate::controller::{finish_segment, place, prepare, TickOutcome};
use crate::environment::{MoverEnvironment, TickContext};
use crate::keyframe::MoverKind;
use crate::mover::Mover;
use crate::strategy::MotionStrategy;
use hinge_core::wrap_angle;

const FIXED_ONE: u64 = 1 << 16;

#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyMotion;

fn to_millis(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}

impl MotionStrategy for LegacyMotion {
    fn advance(
        &self,
        mover: &mut Mover,
        env: &mut dyn MoverEnvironment,
        ctx: TickContext,
    ) -> TickOutcome {
        let segment = match prepare(mover, env, ctx, false) {
            Ok(segment) => segment,
            Err(outcome) => return outcome,
        };

        let duration_ms = to_millis(segment.duration).max(1);
        let before_ms = to_millis(mover.travel_time_seconds).min(duration_ms);
        let elapsed_ms = (before_ms + to_millis(ctx.dt)).min(duration_ms);
        mover.travel_time_seconds = (elapsed_ms as f64 / 1000.0).min(segment.duration);

        let before_fx = before_ms * FIXED_ONE / duration_ms;
        let progress_fx = elapsed_ms * FIXED_ONE / duration_ms;
        let progress = progress_fx as f64 / FIXED_ONE as f64;
        let rate = 1000.0 / duration_ms as f64;

        match mover.kind {
            MoverKind::Translate => {
                place(mover, &segment, progress);
                mover.current_velocity = segment.distance * rate;
            }
            MoverKind::Rotate => {
                let sign = if segment.forward { 1.0 } else { -1.0 };
                let swept = (progress_fx - before_fx) as f64 / FIXED_ONE as f64;
                mover.rotation_current_angle = wrap_angle(
                    mover.rotation_current_angle + segment.rotation_span * sign * swept,
                );
                mover.current_velocity = segment.rotation_span.abs() * rate;
            }
        }

        if elapsed_ms >= duration_ms {
            if mover.kind == MoverKind::Translate {
                mover.snap_to(segment.to);
            }
            return finish_segment(mover, env, ctx);
        }
        TickOutcome::Moved
    }

    fn name(&self) -> &'static str {
        "legacy"
    }
}
