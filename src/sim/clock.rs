use std::time::{Duration, Instant};

/// Result of one [`SimulationClock::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// Simulated seconds to advance: wall time since the last tick times the speed.
    pub dt: f64,
    /// A new frame should be published.
    pub frame_due: bool,
}

/// Turns wall-clock wake-ups into simulation time steps and throttles
/// frame publication to a target rate independent of the step rate.
#[derive(Clone, Debug)]
pub struct SimulationClock {
    last_tick: Instant,
    accumulated: Duration,
    sim_speed: f64,
    frame_interval: Duration,
}

impl SimulationClock {
    pub fn new(now: Instant, sim_speed: f64, frame_interval: Duration) -> Self {
        debug_assert!(sim_speed > 0.0);
        Self {
            last_tick: now,
            accumulated: Duration::ZERO,
            sim_speed,
            frame_interval,
        }
    }

    pub fn sim_speed(&self) -> f64 {
        self.sim_speed
    }

    pub fn set_sim_speed(&mut self, sim_speed: f64) {
        debug_assert!(sim_speed > 0.0);
        self.sim_speed = sim_speed;
    }

    /// Forget time spent while the loop was not stepping (e.g. during a rebuild).
    pub fn reset(&mut self, now: Instant) {
        self.last_tick = now;
    }

    pub fn tick(&mut self, now: Instant) -> Tick {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.accumulated += elapsed;

        let frame_due = self.accumulated >= self.frame_interval;
        if frame_due {
            self.accumulated = Duration::ZERO;
        }

        Tick {
            dt: elapsed.as_secs_f64() * self.sim_speed,
            frame_due,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dt_is_scaled_wall_time() {
        let start = Instant::now();
        let mut clock = SimulationClock::new(start, 2.5, Duration::from_millis(11));
        let tick = clock.tick(start + Duration::from_millis(4));
        assert_relative_eq!(tick.dt, 0.010, epsilon = 1e-12);
        assert!(!tick.frame_due);
    }

    #[test]
    fn frames_are_throttled_to_interval() {
        let start = Instant::now();
        let mut clock = SimulationClock::new(start, 1.0, Duration::from_millis(10));
        let mut frames = 0;
        for ms in 1..=50 {
            if clock.tick(start + Duration::from_millis(ms * 4)).frame_due {
                frames += 1;
            }
        }
        // 200 ms of 4 ms wake-ups, one frame per 12 ms of accumulated time
        assert_eq!(frames, 16);
    }

    #[test]
    fn reset_skips_idle_time() {
        let start = Instant::now();
        let mut clock = SimulationClock::new(start, 1.0, Duration::from_millis(10));
        clock.reset(start + Duration::from_secs(3));
        let tick = clock.tick(start + Duration::from_secs(3) + Duration::from_millis(5));
        assert_relative_eq!(tick.dt, 0.005, epsilon = 1e-12);
    }

    #[test]
    fn speed_change_applies_to_next_tick() {
        let start = Instant::now();
        let mut clock = SimulationClock::new(start, 1.0, Duration::from_millis(10));
        clock.set_sim_speed(0.5);
        let tick = clock.tick(start + Duration::from_millis(8));
        assert_relative_eq!(tick.dt, 0.004, epsilon = 1e-12);
    }
}
