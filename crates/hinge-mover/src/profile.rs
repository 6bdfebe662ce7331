//! Pure trapezoidal velocity profile, shared by translation and rotation

/// One sample of a motion profile.
///
/// `progress` is the fraction of the segment covered, `speed` its time
/// derivative in segment-lengths per second. Integrating `speed` over the
/// whole segment yields exactly 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileSample {
    pub progress: f64,
    pub speed: f64,
}

impl ProfileSample {
    const START: Self = Self {
        progress: 0.0,
        speed: 0.0,
    };
    const END: Self = Self {
        progress: 1.0,
        speed: 0.0,
    };
}

/// Evaluate the motion profile of a segment lasting `duration` seconds at
/// `elapsed` seconds in, with acceleration and deceleration ramps of `accel`
/// and `decel` seconds.
///
/// Without ramps the motion is linear. With ramps the speed follows a
/// trapezoid: linear ramp up, cruise, linear ramp down. Ramps too long to
/// leave a positive peak speed degrade to linear motion; ramps that merely
/// overlap are shrunk proportionally into a triangle.
pub fn evaluate(elapsed: f64, duration: f64, accel: f64, decel: f64) -> ProfileSample {
    // Negated comparisons so NaN durations land on the finished sample
    if !(duration > 0.0) {
        return ProfileSample::END;
    }
    if elapsed <= 0.0 {
        return ProfileSample::START;
    }
    if elapsed >= duration {
        return ProfileSample::END;
    }

    let mut accel = accel.max(0.0);
    let mut decel = decel.max(0.0);
    if accel <= 0.0 && decel <= 0.0 {
        return linear(elapsed, duration);
    }

    if duration - 0.5 * (accel + decel) <= 0.0 {
        return linear(elapsed, duration);
    }

    if accel + decel > duration {
        let fit = duration / (accel + decel);
        accel *= fit;
        decel *= fit;
    }

    let peak = 1.0 / (duration - 0.5 * (accel + decel));

    if elapsed < accel {
        ProfileSample {
            progress: 0.5 * (peak / accel) * elapsed * elapsed,
            speed: peak * elapsed / accel,
        }
    } else if elapsed < duration - decel {
        ProfileSample {
            progress: 0.5 * peak * accel + peak * (elapsed - accel),
            speed: peak,
        }
    } else {
        let remaining = duration - elapsed;
        ProfileSample {
            progress: 1.0 - 0.5 * (peak / decel) * remaining * remaining,
            speed: peak * remaining / decel,
        }
    }
}

fn linear(elapsed: f64, duration: f64) -> ProfileSample {
    ProfileSample {
        progress: elapsed / duration,
        speed: 1.0 / duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAMPS: [(f64, f64); 7] = [
        (0.0, 0.0),
        (0.5, 0.0),
        (0.0, 0.5),
        (0.5, 0.5),
        (0.2, 1.3),
        (1.0, 1.0),
        (1.5, 1.5),
    ];

    #[test]
    fn degenerate_inputs() {
        assert_eq!(evaluate(0.5, 0.0, 0.0, 0.0), ProfileSample::END);
        assert_eq!(evaluate(0.5, -1.0, 0.1, 0.1), ProfileSample::END);
        assert_eq!(evaluate(0.5, f64::NAN, 0.0, 0.0), ProfileSample::END);
        assert_eq!(evaluate(0.0, 2.0, 0.5, 0.5), ProfileSample::START);
        assert_eq!(evaluate(-1.0, 2.0, 0.0, 0.0), ProfileSample::START);
        assert_eq!(evaluate(2.0, 2.0, 0.5, 0.5), ProfileSample::END);
        assert_eq!(evaluate(3.0, 2.0, 0.0, 0.0), ProfileSample::END);
    }

    #[test]
    fn progress_is_monotonic_with_exact_endpoints() {
        let duration = 2.0;
        for (accel, decel) in RAMPS {
            assert_eq!(evaluate(0.0, duration, accel, decel).progress, 0.0);
            assert_eq!(evaluate(duration, duration, accel, decel).progress, 1.0);

            let mut last = 0.0;
            for i in 0..=400 {
                let t = duration * i as f64 / 400.0;
                let p = evaluate(t, duration, accel, decel).progress;
                assert!(
                    p + 1e-12 >= last,
                    "progress fell from {last} to {p} at t={t} (accel={accel}, decel={decel})"
                );
                assert!((0.0..=1.0).contains(&p));
                last = p;
            }
        }
    }

    #[test]
    fn speed_integrates_to_one() {
        let duration = 2.0;
        let steps = 20_000;
        let dt = duration / steps as f64;
        for (accel, decel) in RAMPS {
            let total: f64 = (0..steps)
                .map(|i| evaluate((i as f64 + 0.5) * dt, duration, accel, decel).speed * dt)
                .sum();
            assert!(
                (total - 1.0).abs() < 1e-6,
                "integral {total} for accel={accel}, decel={decel}"
            );
        }
    }

    #[test]
    fn zero_ramps_are_exactly_linear() {
        for i in 1..10 {
            let t = i as f64 * 0.3;
            let s = evaluate(t, 3.0, 0.0, 0.0);
            assert_eq!(s.progress, t / 3.0);
            assert_eq!(s.speed, 1.0 / 3.0);
        }
    }

    #[test]
    fn oversized_ramps_fall_back_to_linear() {
        // 3.0 - 0.5 * (4.0 + 4.0) < 0
        let s = evaluate(1.5, 3.0, 4.0, 4.0);
        assert_eq!(s.progress, 0.5);
        assert_eq!(s.speed, 1.0 / 3.0);
    }

    #[test]
    fn trapezoid_phases() {
        // duration 4, ramps 1 each: peak speed 1/3
        let peak = 1.0 / 3.0;
        let s = evaluate(0.5, 4.0, 1.0, 1.0);
        assert!((s.speed - peak * 0.5).abs() < 1e-12);
        assert!((s.progress - 0.5 * peak * 0.25).abs() < 1e-12);

        let s = evaluate(2.0, 4.0, 1.0, 1.0);
        assert_eq!(s.speed, peak);
        assert!((s.progress - 0.5).abs() < 1e-12);

        let s = evaluate(3.5, 4.0, 1.0, 1.0);
        assert!((s.speed - peak * 0.5).abs() < 1e-12);
        assert!((s.progress - (1.0 - 0.5 * peak * 0.25)).abs() < 1e-12);
    }
}
