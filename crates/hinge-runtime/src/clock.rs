//! Game clock with fixed-timestep accumulator

/// Tracks game time and hands out fixed simulation steps.
///
/// Simulation time is derived from the number of consumed steps rather than
/// summed frame deltas, so two clocks fed different frame timings still agree
/// on the time of step `n`.
#[derive(Debug, Clone)]
pub struct GameClock {
    /// Total wall time fed into the clock in seconds
    pub total_time: f64,
    /// Time of the last frame in seconds
    pub delta_time: f64,
    /// Fixed timestep interval (default: 1/60 second)
    pub fixed_timestep: f64,
    /// Accumulated time for fixed-step consumption
    accumulator: f64,
    /// Number of fixed steps consumed so far
    fixed_steps: u64,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            fixed_timestep: 1.0 / 60.0,
            accumulator: 0.0,
            fixed_steps: 0,
        }
    }
}

impl GameClock {
    /// Create a new game clock with default 60Hz fixed timestep
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game clock with a custom fixed timestep
    pub fn with_fixed_timestep(hz: f64) -> Self {
        Self {
            fixed_timestep: 1.0 / hz,
            ..Self::default()
        }
    }

    /// Feed one frame's elapsed time into the clock.
    pub fn advance(&mut self, elapsed: f64) {
        // Clamp to avoid spiral of death (max 250ms frame time)
        self.delta_time = elapsed.clamp(0.0, 0.25);
        self.total_time += self.delta_time;
        self.accumulator += self.delta_time;
    }

    /// Returns true if there's enough accumulated time for a fixed update step
    pub fn should_fixed_update(&self) -> bool {
        self.accumulator >= self.fixed_timestep
    }

    /// Consume one fixed timestep from the accumulator
    pub fn consume_fixed_step(&mut self) {
        self.accumulator -= self.fixed_timestep;
        self.fixed_steps += 1;
    }

    /// Number of fixed steps consumed so far
    pub fn fixed_steps(&self) -> u64 {
        self.fixed_steps
    }

    /// Simulation time at the end of the last consumed step
    pub fn sim_time(&self) -> f64 {
        self.fixed_steps as f64 * self.fixed_timestep
    }

    /// Get the interpolation alpha for rendering between fixed steps
    pub fn interpolation_alpha(&self) -> f64 {
        self.accumulator / self.fixed_timestep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = GameClock::new();
        assert!((clock.fixed_timestep - 1.0 / 60.0).abs() < 1e-10);
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.fixed_steps(), 0);
    }

    #[test]
    fn test_custom_timestep() {
        let clock = GameClock::with_fixed_timestep(30.0);
        assert!((clock.fixed_timestep - 1.0 / 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_advance_clamps_long_frames() {
        let mut clock = GameClock::new();
        clock.advance(2.0);
        assert_eq!(clock.delta_time, 0.25);
        clock.advance(-1.0);
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn test_accumulator_logic() {
        let mut clock = GameClock::new();
        clock.fixed_timestep = 1.0 / 60.0;
        // Simulate adding time directly
        clock.accumulator = 1.0 / 30.0; // Two fixed steps worth

        assert!(clock.should_fixed_update());
        clock.consume_fixed_step();
        assert!(clock.should_fixed_update());
        clock.consume_fixed_step();
        assert!(!clock.should_fixed_update());
        assert_eq!(clock.fixed_steps(), 2);
    }

    #[test]
    fn test_sim_time_independent_of_frame_split() {
        let mut a = GameClock::with_fixed_timestep(60.0);
        let mut b = GameClock::with_fixed_timestep(60.0);
        for _ in 0..120 {
            a.advance(a.fixed_timestep);
            while a.should_fixed_update() {
                a.consume_fixed_step();
            }
        }
        for _ in 0..120 {
            let step = b.fixed_timestep;
            b.accumulator += step;
            while b.should_fixed_update() {
                b.consume_fixed_step();
            }
        }
        assert_eq!(a.fixed_steps(), b.fixed_steps());
        assert_eq!(a.sim_time().to_bits(), b.sim_time().to_bits());
    }

    #[test]
    fn test_interpolation_alpha() {
        let mut clock = GameClock::new();
        clock.fixed_timestep = 1.0 / 60.0;
        clock.accumulator = clock.fixed_timestep * 0.5;
        let alpha = clock.interpolation_alpha();
        assert!((alpha - 0.5).abs() < 1e-10);
    }
}
