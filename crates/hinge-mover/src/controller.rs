//! Per-tick state machine for translating movers

use crate::bounce;
use crate::environment::{MoverEnvironment, TickContext};
use crate::keyframe::MoverKind;
use crate::mover::Mover;
use crate::profile::evaluate;
use crate::segment::Segment;
use crate::sequencer::ArrivalOutcome;
use hinge_core::Vec3;

/// What a tick did to a mover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Externally paused; nothing moved
    Held,
    /// At rest on a keyframe
    Resting,
    /// Waiting out a timed pause or an obstruction
    Waiting,
    /// Moved along the current segment
    Moved,
    /// Reached the end of the segment
    Arrived(ArrivalOutcome),
    /// Found in an unusable state and put to rest
    Invalid,
}

/// Steps shared by every motion strategy before the mover integrates
/// motion: pause handling, segment resolution and obstruction.
///
/// Returns the segment to integrate, or the outcome of a tick that ends here.
pub(crate) fn prepare(
    mover: &mut Mover,
    env: &mut dyn MoverEnvironment,
    ctx: TickContext,
    allow_bounce: bool,
) -> Result<Segment, TickOutcome> {
    if mover.flags.paused {
        // Travel time is kept; the segment resumes where it left off
        mover.current_velocity = 0.0;
        mover.snap_to(mover.start_at_keyframe);
        return Err(TickOutcome::Held);
    }

    let Some(stop) = mover.stop_at_keyframe else {
        if mover.start_at_keyframe > mover.last_index() {
            mover.fail_safe_rest("resting on missing keyframe");
            return Err(TickOutcome::Invalid);
        }
        mover.current_velocity = 0.0;
        mover.snap_to(mover.start_at_keyframe);
        return Err(TickOutcome::Resting);
    };

    let Some(mut segment) = Segment::resolve(
        mover,
        mover.start_at_keyframe,
        stop,
        mover.flags.direction_forward,
    ) else {
        mover.fail_safe_rest("invalid segment");
        return Err(TickOutcome::Invalid);
    };

    if mover.flags.paused_at_keyframe {
        let blocked = (is_door(mover, env) && env.is_obstructed_by_entity(mover))
            || env.is_obstructed(mover);
        if blocked || ctx.now < mover.pause_deadline {
            mover.current_velocity = 0.0;
            return Err(TickOutcome::Waiting);
        }
        mover.flags.paused_at_keyframe = false;
        env.play_start_sound(mover);
    }

    let mut bounced = false;
    if allow_bounce && bounce::should_bounce(mover, env) {
        match bounce::try_bounce(mover, &segment) {
            Some(opening) => {
                segment = opening;
                bounced = true;
                env.mover_bounced(mover);
            }
            None => {
                hard_pause(mover, env, stop, ctx);
                return Err(TickOutcome::Waiting);
            }
        }
    }

    if !bounced && blocks_travel(mover, env) {
        hard_pause(mover, env, stop, ctx);
        return Err(TickOutcome::Waiting);
    }

    Ok(segment)
}

/// Rotating movers are never doors.
fn is_door(mover: &Mover, env: &dyn MoverEnvironment) -> bool {
    mover.kind == MoverKind::Translate && env.is_door(mover)
}

/// The path is blocked, or a door is closing onto an entity it did not
/// bounce off.
fn blocks_travel(mover: &Mover, env: &dyn MoverEnvironment) -> bool {
    env.is_obstructed(mover)
        || (mover.stop_at_keyframe == Some(0)
            && is_door(mover, env)
            && env.is_obstructed_by_entity(mover))
}

/// Stop where the mover is and wait out the destination keyframe's pause.
/// The pause lasts at least as long as the obstruction.
fn hard_pause(
    mover: &mut Mover,
    env: &mut dyn MoverEnvironment,
    destination: usize,
    ctx: TickContext,
) {
    let pause = mover.keyframe(destination).map_or(0.0, |kf| kf.pause);
    mover.flags.paused_at_keyframe = true;
    mover.pause_deadline = ctx.now + pause.max(0.0);
    mover.current_velocity = 0.0;
    env.play_stop_sound(mover);
    tracing::debug!(mover = %mover.name, destination, pause, "mover blocked");
}

/// Finish the segment: complete the arrival and stop the movement sound if
/// the mover is done moving. A fresh pause has already stopped it.
pub(crate) fn finish_segment(
    mover: &mut Mover,
    env: &mut dyn MoverEnvironment,
    ctx: TickContext,
) -> TickOutcome {
    let outcome = mover.arrive(env, ctx.now);
    if matches!(outcome, ArrivalOutcome::Stopped | ArrivalOutcome::Parked) {
        env.play_stop_sound(mover);
    }
    TickOutcome::Arrived(outcome)
}

/// Advance a translating mover by one tick.
pub fn tick(mover: &mut Mover, env: &mut dyn MoverEnvironment, ctx: TickContext) -> TickOutcome {
    let segment = match prepare(mover, env, ctx, true) {
        Ok(segment) => segment,
        Err(outcome) => return outcome,
    };

    mover.travel_time_seconds = (mover.travel_time_seconds + ctx.dt).min(segment.duration);
    let sample = evaluate(
        mover.travel_time_seconds,
        segment.duration,
        segment.accel,
        segment.decel,
    );
    place(mover, &segment, sample.progress);
    mover.current_velocity = segment.distance * sample.speed;

    if mover.travel_time_seconds >= segment.duration {
        mover.snap_to(segment.to);
        return finish_segment(mover, env, ctx);
    }
    TickOutcome::Moved
}

/// Write position and orientation `progress` of the way along `segment`.
pub(crate) fn place(mover: &mut Mover, segment: &Segment, progress: f64) {
    let (Some(from), Some(to)) = (mover.keyframe(segment.from), mover.keyframe(segment.to)) else {
        return;
    };
    let (from_pos, to_pos) = (from.position, to.position);
    let mut orientation = from.orientation.lerp(&to.orientation, progress);

    if mover.flags.force_orient {
        if let Some(yaw) = heading(from_pos, to_pos) {
            orientation.y = yaw;
        }
    }

    mover.position = from_pos.lerp(&to_pos, progress);
    mover.orientation = orientation;
}

/// Yaw in degrees facing from `from` toward `to` (forward is -Z)
fn heading(from: Vec3, to: Vec3) -> Option<f64> {
    let d = to - from;
    if d.x == 0.0 && d.z == 0.0 {
        return None;
    }
    Some((-d.x).atan2(-d.z).to_degrees())
}
