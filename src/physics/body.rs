use std::collections::VecDeque;

use bevy::math::DVec2;

use super::bounds::Bounds;
use super::collision::Impactor;
use super::integrator;
use super::vector::Vector;
use crate::config::{DEFAULT_COLOR, DEFAULT_RESTITUTION};
use crate::error::{Result, SandboxError};

/// Position history kept for trail rendering.
/// Strict FIFO; a capacity of zero disables tracking.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trail {
    points: VecDeque<DVec2>,
    capacity: usize,
}

impl Trail {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: DVec2) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest point first.
    pub fn iter(&self) -> impl Iterator<Item = &DVec2> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<DVec2> {
        self.points.iter().copied().collect()
    }
}

/// A circular body. Its mass doubles as its diameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub position: DVec2,
    /// Position before the last integration step; collision resolution rolls back to it.
    pub last_position: DVec2,
    pub velocity: Vector,
    pub acceleration: Vector,
    pub mass: f64,
    /// Fraction of speed kept after an impact, in `[0, 1]`.
    pub restitution: f64,
    pub movable: bool,
    pub color: [u8; 3],
    pub tag: Option<String>,
    pub trail: Trail,
}

impl Body {
    pub fn new(mass: f64, position: DVec2) -> Self {
        debug_assert!(mass.is_finite() && mass > 0.0, "mass must be positive");
        Self {
            position,
            last_position: position,
            velocity: Vector::ZERO,
            acceleration: Vector::ZERO,
            mass,
            restitution: DEFAULT_RESTITUTION,
            movable: true,
            color: DEFAULT_COLOR,
            tag: None,
            trail: Trail::default(),
        }
    }

    /// Like [`Body::new`] but rejects a non-positive or non-finite mass.
    pub fn try_new(mass: f64, position: DVec2) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SandboxError::InvalidMass(mass));
        }
        if !position.is_finite() {
            return Err(SandboxError::InvalidConfig(format!(
                "body position must be finite, got {position}"
            )));
        }
        Ok(Self::new(mass, position))
    }

    pub fn with_velocity(mut self, velocity: Vector) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_restitution(mut self, restitution: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&restitution));
        self.restitution = restitution;
        self
    }

    /// Like [`Body::with_restitution`] but rejects values outside `[0, 1]`.
    pub fn try_with_restitution(self, restitution: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&restitution) {
            return Err(SandboxError::InvalidRestitution(restitution));
        }
        Ok(self.with_restitution(restitution))
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_trail(mut self, capacity: usize) -> Self {
        self.trail = Trail::with_capacity(capacity);
        self
    }

    pub fn immovable(mut self) -> Self {
        self.movable = false;
        self
    }

    pub fn radius(&self) -> f64 {
        self.mass / 2.0
    }

    /// Advance one step. See [`integrator::step`].
    pub fn update(&mut self, forces: &[Vector], bounds: &Bounds, dt: f64, constrain_to_bounds: bool) {
        integrator::step(self, forces, bounds, dt, constrain_to_bounds);
    }

    /// Where this body will be after one more step under `forces`,
    /// without touching the body itself. Bounds are ignored.
    pub fn lookahead(&self, forces: &[Vector], dt: f64) -> Impactor {
        integrator::predict(self, forces, dt)
    }

    /// True when `point` lies strictly inside the body's circle.
    pub fn intersects(&self, point: DVec2) -> bool {
        let d = point - self.position;
        let r = self.radius();
        d.length_squared() / (r * r) < 1.0
    }

    /// Teleport to `to`. Velocity is kept.
    pub fn translate_absolute(&mut self, to: DVec2) {
        self.position = to;
        self.last_position = to;
    }
}
