use std::time::Duration;

use bevy::math::DVec2;

use crate::error::{Result, SandboxError};
use crate::physics::Mode;

/// Loop timing
pub const FRAME_HZ: f64 = 90.0;
/// How long the sim thread sleeps waiting for commands before stepping anyway.
pub const WAKE_PERIOD: Duration = Duration::from_millis(5);

/// Collision tolerances
pub const BOUNDS_EPSILON: f64 = 0.1;
pub const MIN_DISTANCE: f64 = 1.0;

/// Body defaults
pub const DEFAULT_RESTITUTION: f64 = 0.8;
pub const DEFAULT_COLOR: [u8; 3] = [128, 128, 128];

/// Standard mode fields (already accelerations, see `Body::update`)
pub const GRAVITY: DVec2 = DVec2::new(0.0, -9.8);
pub const WIND: DVec2 = DVec2::new(15.0, 0.0);

/// Random scene generation
pub const MIN_BODIES: usize = 3;
pub const MAX_BODIES: usize = 24;
pub const MIN_MASS: f64 = 20.0;
pub const MAX_MASS: f64 = 120.0;
pub const PLACEMENT_PADDING: f64 = 5.0;
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1_000;

/// Planetarium mode
pub const ATTRACTION_CONSTANT: f64 = 16666.0;
pub const MIN_ATTRACTION_DISTANCE: f64 = 1.0;
pub const PLANETARIUM_RESTITUTION: f64 = 0.000001;
pub const ORBIT_TRAIL_LEN: usize = 1000;

/// Host controls
pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 2.0;
pub const SCALE_STEP: f64 = 0.1;
pub const MIN_SIM_SPEED: f64 = 0.1;
pub const MAX_SIM_SPEED: f64 = 10.0;
pub const SIM_SPEED_STEP: f64 = 0.1;

/// Initial window size (logical pixels)
pub const WINDOW_SIZE: (u32, u32) = (1280, 800);

/// Runtime knobs for one simulation run. Defaults come from the constants above.
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    pub mode: Mode,
    pub sim_speed: f64,
    pub frame_hz: f64,
    pub wake_period: Duration,
    /// Fixed seed for reproducible random scenes; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub gravity: DVec2,
    pub wind: DVec2,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Standard,
            sim_speed: 1.0,
            frame_hz: FRAME_HZ,
            wake_period: WAKE_PERIOD,
            seed: None,
            gravity: GRAVITY,
            wind: WIND,
        }
    }
}

impl SandboxConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.sim_speed.is_finite() && self.sim_speed > 0.0) {
            return Err(SandboxError::InvalidSpeed(self.sim_speed));
        }
        if !(self.frame_hz.is_finite() && self.frame_hz > 0.0) {
            return Err(SandboxError::InvalidConfig(format!(
                "frame rate must be positive, got {}",
                self.frame_hz
            )));
        }
        if self.wake_period.is_zero() {
            return Err(SandboxError::InvalidConfig(
                "wake period must be non-zero".into(),
            ));
        }
        if !(self.gravity.is_finite() && self.wind.is_finite()) {
            return Err(SandboxError::InvalidConfig(
                "force fields must be finite".into(),
            ));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SandboxConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_speed() {
        let cfg = SandboxConfig {
            sim_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(SandboxError::InvalidSpeed(_))));
    }

    #[test]
    fn frame_interval_matches_rate() {
        let cfg = SandboxConfig::default();
        let expected = Duration::from_secs_f64(1.0 / FRAME_HZ);
        assert_eq!(cfg.frame_interval(), expected);
    }
}
