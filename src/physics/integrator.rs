//! Per-body kinematics: force accumulation, explicit Euler position update,
//! and wall reflection.
//!
//! Force lists follow one protocol: entry 0 is a field that is already an
//! acceleration (gravity, or a zero placeholder), every later entry is a raw
//! force and gets divided by the body's mass.

use super::body::Body;
use super::bounds::Bounds;
use super::collision::Impactor;
use super::vector::{DEG_90, DEG_180, DEG_270, Vector};
use crate::config::BOUNDS_EPSILON;

/// Total acceleration from a force list. An empty list yields zero.
pub fn accumulate_acceleration(forces: &[Vector], mass: f64) -> Vector {
    let Some((field, rest)) = forces.split_first() else {
        return Vector::ZERO;
    };
    rest.iter().fold(*field, |acc, force| acc + *force / mass)
}

/// Advance `body` by `dt`.
///
/// Velocity takes the whole acceleration each step; only the position
/// update is scaled by `dt`.
pub fn step(body: &mut Body, forces: &[Vector], bounds: &Bounds, dt: f64, constrain: bool) {
    body.trail.push(body.position);

    if !body.movable {
        return;
    }

    body.acceleration = accumulate_acceleration(forces, body.mass);
    body.velocity += body.acceleration;
    body.last_position = body.position;
    body.position += body.velocity.delta() * dt;

    if constrain {
        reflect_off_bounds(body, bounds);
    }
}

/// The state `step` would produce, without bounds and without mutating `body`.
pub fn predict(body: &Body, forces: &[Vector], dt: f64) -> Impactor {
    let mut velocity = body.velocity;
    if body.movable {
        velocity += accumulate_acceleration(forces, body.mass);
    }
    Impactor {
        position: body.position + velocity.delta() * dt,
        velocity,
        mass: body.mass,
        restitution: body.restitution,
    }
}

/// Clamp `body` inside `bounds` and mirror its velocity off any wall it
/// crossed, losing speed by its restitution. At most one vertical and one
/// horizontal wall can be hit per call. Returns the number of reflections.
pub fn reflect_off_bounds(body: &mut Body, bounds: &Bounds) -> usize {
    let r = body.radius();
    let mut hits = 0;

    if body.position.x - r + BOUNDS_EPSILON < bounds.left {
        body.position.x = bounds.left + r;
        bounce(body, DEG_180);
        hits += 1;
    } else if body.position.x + r - BOUNDS_EPSILON > bounds.right {
        body.position.x = bounds.right - r;
        bounce(body, DEG_180);
        hits += 1;
    }

    if body.position.y + r - BOUNDS_EPSILON > bounds.top {
        body.position.y = bounds.top - r;
        bounce(body, DEG_270 + DEG_90);
        hits += 1;
    } else if body.position.y - r + BOUNDS_EPSILON < bounds.bottom {
        body.position.y = bounds.bottom + r;
        bounce(body, DEG_90 + DEG_270);
        hits += 1;
    }

    hits
}

// angle' = mirror - angle: mirror = 180° flips x, 360° flips y
fn bounce(body: &mut Body, mirror: f64) {
    let v = &mut body.velocity;
    let angle = v.angle();
    v.set_angle(mirror - angle);
    v.set_magnitude(v.magnitude() * body.restitution);
}
