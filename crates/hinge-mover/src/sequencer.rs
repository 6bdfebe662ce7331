//! Keyframe sequencing: what happens when a segment completes

use crate::environment::MoverEnvironment;
use crate::keyframe::MoveType;
use crate::mover::Mover;

/// Decision for the segment after an arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Travel on to this keyframe
    Continue(usize),
    /// Come to rest on the keyframe just reached
    Stop,
}

/// The segment that just completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    /// Keyframe the segment started from
    pub from: usize,
    /// Keyframe just reached
    pub cur: usize,
    /// Number of keyframes on the path
    pub count: usize,
    /// Where the current loop circuit began
    pub loop_origin: usize,
}

/// Choose the next step for `move_type`, updating `forward` where the mode
/// turns around or rests.
///
/// An arrival outside the path clamps to `Stop`.
pub fn next_step(move_type: MoveType, arrival: Arrival, forward: &mut bool) -> Step {
    if arrival.count < 2 || arrival.cur >= arrival.count {
        return Step::Stop;
    }
    let last = arrival.count - 1;
    match move_type {
        MoveType::OneWay => one_way(arrival.cur, last, forward),
        MoveType::PingPongOnce => ping_pong(arrival.cur, last, forward, true),
        MoveType::PingPongInfinite => ping_pong(arrival.cur, last, forward, false),
        MoveType::LoopOnce => looping(arrival, forward, true),
        MoveType::LoopInfinite => looping(arrival, forward, false),
        MoveType::Lift => lift(arrival.cur, last, forward),
    }
}

fn one_way(cur: usize, last: usize, forward: &mut bool) -> Step {
    if *forward {
        if cur < last {
            return Step::Continue(cur + 1);
        }
        *forward = false;
    } else {
        if cur > 0 {
            return Step::Continue(cur - 1);
        }
        *forward = true;
    }
    Step::Stop
}

fn ping_pong(cur: usize, last: usize, forward: &mut bool, once: bool) -> Step {
    if *forward {
        if cur < last {
            Step::Continue(cur + 1)
        } else {
            *forward = false;
            Step::Continue(cur - 1)
        }
    } else if cur > 0 {
        Step::Continue(cur - 1)
    } else {
        *forward = true;
        if once {
            Step::Stop
        } else {
            Step::Continue(cur + 1)
        }
    }
}

fn looping(arrival: Arrival, forward: &mut bool, once: bool) -> Step {
    *forward = true;
    // Back where the circuit began. From keyframe 0 this is the
    // last -> first wrap segment.
    if once && arrival.cur == arrival.loop_origin {
        return Step::Stop;
    }
    Step::Continue((arrival.cur + 1) % arrival.count)
}

fn lift(cur: usize, last: usize, forward: &mut bool) -> Step {
    if cur == 0 {
        *forward = true;
    } else if cur == last {
        *forward = false;
    }
    Step::Stop
}

/// What an arrival did to the mover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalOutcome {
    /// Started the next segment immediately
    Continuing,
    /// Started the next segment behind a timed pause
    Paused,
    /// Came to rest
    Stopped,
    /// Parked on the stop-completely keyframe
    Parked,
}

impl Mover {
    /// Complete the current segment at simulation time `now`: fire the
    /// keyframe's event, then park, rest, or set up the next segment.
    pub fn arrive(&mut self, env: &mut dyn MoverEnvironment, now: f64) -> ArrivalOutcome {
        let Some(cur) = self.stop_at_keyframe else {
            return ArrivalOutcome::Stopped;
        };
        let Some(keyframe) = self.keyframe(cur) else {
            self.fail_safe_rest("arrived at missing keyframe");
            return ArrivalOutcome::Stopped;
        };
        let event = keyframe.event.clone();
        let pause = keyframe.pause;

        env.mover_arrived(self, cur);
        if let Some(event) = event {
            env.fire_event(&event, self);
        }

        if self.stop_completely_at_keyframe == Some(cur) {
            tracing::debug!(mover = %self.name, keyframe = cur, "parked on hold keyframe");
            self.park(cur);
            env.mover_stopped(self, cur);
            return ArrivalOutcome::Parked;
        }

        let arrival = Arrival {
            from: self.start_at_keyframe,
            cur,
            count: self.keyframes().len(),
            loop_origin: self.loop_origin,
        };
        let mut forward = self.flags.direction_forward;
        let step = next_step(self.move_type, arrival, &mut forward);
        self.flags.direction_forward = forward;

        match step {
            Step::Continue(next) => {
                self.start_at_keyframe = cur;
                self.stop_at_keyframe = Some(next);
                self.travel_time_seconds = 0.0;
                if pause > 0.0 {
                    self.flags.paused_at_keyframe = true;
                    self.pause_deadline = now + pause;
                    self.current_velocity = 0.0;
                    env.play_stop_sound(self);
                    tracing::debug!(mover = %self.name, keyframe = cur, next, pause, "pausing at keyframe");
                    ArrivalOutcome::Paused
                } else {
                    self.flags.paused_at_keyframe = false;
                    ArrivalOutcome::Continuing
                }
            }
            Step::Stop => {
                tracing::debug!(mover = %self.name, keyframe = cur, "mover stopped");
                self.park(cur);
                env.mover_stopped(self, cur);
                ArrivalOutcome::Stopped
            }
        }
    }
}
