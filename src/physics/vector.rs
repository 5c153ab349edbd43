use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use bevy::math::DVec2;

/// Quarter-turn angles in radians, shared by the wall reflection formulas.
pub const DEG_90: f64 = FRAC_PI_2;
pub const DEG_180: f64 = PI;
pub const DEG_270: f64 = PI + FRAC_PI_2;
/// Multiply degrees by this to get radians.
pub const TO_RAD: f64 = PI / 180.0;

/// A 2D vector anchored at an `origin`.
///
/// The cartesian offset is stored; magnitude and angle are derived from it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
    pub origin: DVec2,
    delta: DVec2,
}

impl Vector {
    pub const ZERO: Self = Self {
        origin: DVec2::ZERO,
        delta: DVec2::ZERO,
    };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self {
            origin: DVec2::ZERO,
            delta: DVec2::new(dx, dy),
        }
    }

    pub fn anchored(origin: DVec2, delta: DVec2) -> Self {
        Self { origin, delta }
    }

    /// Build from `magnitude` and `angle` (radians).
    pub fn from_polar(magnitude: f64, angle: f64) -> Self {
        Self {
            origin: DVec2::ZERO,
            delta: DVec2::from_angle(angle) * magnitude,
        }
    }

    /// The vector pointing from `from` to `to`, anchored at `from`.
    pub fn between(from: DVec2, to: DVec2) -> Self {
        Self {
            origin: from,
            delta: to - from,
        }
    }

    pub fn x(&self) -> f64 {
        self.delta.x
    }

    pub fn y(&self) -> f64 {
        self.delta.y
    }

    pub fn delta(&self) -> DVec2 {
        self.delta
    }

    /// The point this vector reaches when drawn from its origin.
    pub fn end(&self) -> DVec2 {
        self.origin + self.delta
    }

    pub fn magnitude(&self) -> f64 {
        self.delta.length()
    }

    /// Angle in radians, normalized to `[0, 2π)`.
    pub fn angle(&self) -> f64 {
        normalize_angle(self.delta.y.atan2(self.delta.x))
    }

    /// Keeps the direction. A negative magnitude flips it, so the stored
    /// length is always `|magnitude|`.
    pub fn set_magnitude(&mut self, magnitude: f64) {
        self.delta = DVec2::from_angle(self.angle()) * magnitude;
    }

    /// Keeps the magnitude.
    pub fn set_angle(&mut self, angle: f64) {
        self.delta = DVec2::from_angle(angle) * self.magnitude();
    }

    pub fn rotate(&mut self, by: f64) {
        self.delta = DVec2::from_angle(by).rotate(self.delta);
    }

    /// Move the origin by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.origin += DVec2::new(dx, dy);
    }

    /// Move the origin to `to`.
    pub fn translate_absolute(&mut self, to: DVec2) {
        self.origin = to;
    }

    pub fn is_finite(&self) -> bool {
        self.delta.is_finite()
    }
}

pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector {
            origin: self.origin,
            delta: self.delta + rhs.delta,
        }
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector {
            origin: self.origin,
            delta: self.delta - rhs.delta,
        }
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        self.delta += rhs.delta;
    }
}

impl SubAssign for Vector {
    fn sub_assign(&mut self, rhs: Vector) {
        self.delta -= rhs.delta;
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        Vector {
            origin: self.origin,
            delta: self.delta * rhs,
        }
    }
}

impl Div<f64> for Vector {
    type Output = Vector;

    fn div(self, rhs: f64) -> Vector {
        Vector {
            origin: self.origin,
            delta: self.delta / rhs,
        }
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector {
            origin: self.origin,
            delta: -self.delta,
        }
    }
}
