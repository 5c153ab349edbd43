//! Error types for the sandbox.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("body mass must be finite and positive, got {0}")]
    InvalidMass(f64),

    #[error("restitution must lie in [0, 1], got {0}")]
    InvalidRestitution(f64),

    #[error("simulation speed must be finite and positive, got {0}")]
    InvalidSpeed(f64),

    #[error("bounds must have positive width and height, got {width} x {height}")]
    InvalidBounds { width: f64, height: f64 },

    #[error("could not place any body inside the bounds ({requested} requested)")]
    PlacementStarved { requested: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to spawn simulation thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SandboxError>;
