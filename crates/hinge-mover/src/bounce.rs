//! Door bounce: reversing a closing door that something is standing in

use crate::environment::MoverEnvironment;
use crate::keyframe::MoveType;
use crate::mover::Mover;
use crate::segment::Segment;

/// Whether `mover` is a door closing onto something that should make it
/// reopen.
pub fn should_bounce(mover: &Mover, env: &dyn MoverEnvironment) -> bool {
    mover.stop_at_keyframe == Some(0)
        && mover.move_type != MoveType::OneWay
        && env.is_door(mover)
        && env.is_obstructed_by_entity(mover)
}

/// Turn the closing segment `closing` around so the door heads back open
/// from where it physically is.
///
/// The elapsed time is mirrored: a door `f` of the way through closing
/// resumes `1 - f` of the way through opening. Returns the new segment, or
/// `None` if the reversed endpoints are not a usable segment, in which case
/// the mover is left untouched.
pub fn try_bounce(mover: &mut Mover, closing: &Segment) -> Option<Segment> {
    let opening = Segment::resolve(mover, closing.to, closing.from, true)?;
    let fraction = (mover.travel_time_seconds / closing.duration).clamp(0.0, 1.0);

    mover.start_at_keyframe = opening.from;
    mover.stop_at_keyframe = Some(opening.to);
    mover.flags.direction_forward = true;
    mover.travel_time_seconds = (1.0 - fraction) * opening.duration;

    tracing::debug!(
        mover = %mover.name,
        fraction,
        resume_at = mover.travel_time_seconds,
        "door bounced"
    );
    Some(opening)
}
