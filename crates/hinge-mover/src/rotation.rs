//! Per-tick state machine for movers that rotate in place

use crate::controller::{finish_segment, prepare, TickOutcome};
use crate::environment::{MoverEnvironment, TickContext};
use crate::mover::Mover;
use crate::profile::evaluate;
use hinge_core::wrap_angle;

/// Advance a rotating mover by one tick.
///
/// Same states as the translating controller, but the profile drives an
/// angle: each tick adds `span * speed * dt`, negated when traveling
/// backward. Speed is sampled at the middle of the tick so a full segment
/// sweeps its span. Rotators never bounce.
pub fn tick(mover: &mut Mover, env: &mut dyn MoverEnvironment, ctx: TickContext) -> TickOutcome {
    let segment = match prepare(mover, env, ctx, false) {
        Ok(segment) => segment,
        Err(outcome) => return outcome,
    };

    let before = mover.travel_time_seconds;
    mover.travel_time_seconds = (before + ctx.dt).min(segment.duration);
    let step = mover.travel_time_seconds - before;

    let midpoint = evaluate(
        before + 0.5 * step,
        segment.duration,
        segment.accel,
        segment.decel,
    );
    let sign = if segment.forward { 1.0 } else { -1.0 };
    mover.rotation_current_angle = wrap_angle(
        mover.rotation_current_angle + segment.rotation_span * midpoint.speed * sign * step,
    );

    let now = evaluate(
        mover.travel_time_seconds,
        segment.duration,
        segment.accel,
        segment.decel,
    );
    mover.current_velocity = segment.rotation_span.abs() * now.speed;

    if mover.travel_time_seconds >= segment.duration {
        return finish_segment(mover, env, ctx);
    }
    TickOutcome::Moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::testing::RecordingEnv;
    use crate::keyframe::{Keyframe, MoveType, MoverKind};
    use crate::sequencer::ArrivalOutcome;
    use hinge_core::{EntityId, Vec3};
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn rotator(span: f64, move_type: MoveType) -> Mover {
        Mover::new(
            EntityId::from_raw(8),
            "fan",
            vec![
                Keyframe::at(Vec3::ZERO)
                    .with_rotation(span)
                    .with_times(1.0, 1.0)
                    .with_ramps(0.25, 0.25),
                Keyframe::at(Vec3::ZERO),
            ],
            move_type,
        )
        .unwrap()
        .with_kind(MoverKind::Rotate)
    }

    fn run(mover: &mut Mover, env: &mut RecordingEnv, ticks: usize, dt: f64, now: &mut f64) {
        for _ in 0..ticks {
            *now += dt;
            tick(mover, env, TickContext { now: *now, dt });
        }
    }

    #[test]
    fn sweeps_full_span_over_segment() {
        let mut env = RecordingEnv::default();
        let mut m = rotator(FRAC_PI_2, MoveType::OneWay);
        m.activate(None, None, true, &mut env);
        let mut now = 0.0;
        // One extra tick in case the summed dt lands just short of 1.0
        run(&mut m, &mut env, 61, 1.0 / 60.0, &mut now);
        assert!(!m.is_moving());
        assert!((m.rotation_current_angle - FRAC_PI_2).abs() < 1e-6);
        assert_eq!(m.position, Vec3::ZERO);
    }

    #[test]
    fn backward_segment_undoes_forward() {
        let mut env = RecordingEnv::default();
        let mut m = rotator(PI / 3.0, MoveType::PingPongOnce);
        m.activate(None, None, true, &mut env);
        let mut now = 0.0;
        run(&mut m, &mut env, 200, 1.0 / 50.0, &mut now);
        assert!(!m.is_moving());
        let error = m.rotation_current_angle.min(TAU - m.rotation_current_angle);
        assert!(error < 1e-6, "ended at {}", m.rotation_current_angle);
    }

    #[test]
    fn angle_wraps_into_range() {
        let mut env = RecordingEnv::default();
        let mut m = rotator(-FRAC_PI_2, MoveType::LoopInfinite);
        m.activate(None, None, true, &mut env);
        let mut now = 0.0;
        for _ in 0..500 {
            now += 0.03;
            tick(&mut m, &mut env, TickContext { now, dt: 0.03 });
            assert!((0.0..TAU).contains(&m.rotation_current_angle));
        }
    }

    #[test]
    fn arrival_uses_shared_sequencer() {
        let mut env = RecordingEnv::default();
        let mut m = rotator(1.0, MoveType::Lift);
        m.activate(None, None, true, &mut env);
        let mut outcome = TickOutcome::Moved;
        let mut now = 0.0;
        for _ in 0..10 {
            now += 0.125;
            outcome = tick(&mut m, &mut env, TickContext { now, dt: 0.125 });
            if !m.is_moving() {
                break;
            }
        }
        assert_eq!(outcome, TickOutcome::Arrived(ArrivalOutcome::Stopped));
        assert_eq!(m.start_at_keyframe, 1);
        assert!(!m.flags.direction_forward);
    }

    #[test]
    fn rotators_ignore_entity_obstruction() {
        let mut env = RecordingEnv {
            door: Some(true),
            obstructed_by_entity: true,
            ..Default::default()
        };
        let mut m = rotator(1.0, MoveType::PingPongOnce).starting_at(1);
        m.flags.direction_forward = false;
        m.activate(None, None, true, &mut env);
        assert_eq!(
            tick(&mut m, &mut env, TickContext { now: 0.1, dt: 0.1 }),
            TickOutcome::Moved
        );
        assert_eq!(m.stop_at_keyframe, Some(0));
    }
}
