//! Body-body collision detection and resolution.
//!
//! Each tick every movable body is checked against every other body. A
//! neighbor that touches others is merged with them into one equivalent
//! body (a cluster), and the response is computed against a copy of the
//! moving body advanced one step, so overlaps that will exist by the end of
//! the tick are caught too. New velocities are applied only after the whole
//! scan, and the affected bodies are put back where they were before this
//! tick's integration.

use bevy::math::DVec2;
use tracing::warn;

use super::body::Body;
use super::forces::ForceSet;
use super::vector::{DEG_90, Vector};
use crate::config::MIN_DISTANCE;

/// The kinematic state a collision response needs. Built from a body, from
/// a one-step lookahead of a body, or from a merged cluster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impactor {
    pub position: DVec2,
    pub velocity: Vector,
    pub mass: f64,
    pub restitution: f64,
}

impl Impactor {
    pub fn radius(&self) -> f64 {
        self.mass / 2.0
    }

    /// Collapse `members` into one body: summed mass and velocity, centroid
    /// position, restitution of the first member.
    pub fn aggregate(bodies: &[Body], members: &[usize]) -> Self {
        debug_assert!(!members.is_empty());
        let first = &bodies[members[0]];
        let mut sum = Impactor::from(first);
        let mut centroid = first.position;
        for &m in &members[1..] {
            let b = &bodies[m];
            sum.mass += b.mass;
            sum.velocity += b.velocity;
            centroid += b.position;
        }
        sum.position = centroid / members.len() as f64;
        sum
    }
}

impl From<&Body> for Impactor {
    fn from(body: &Body) -> Self {
        Self {
            position: body.position,
            velocity: body.velocity,
            mass: body.mass,
            restitution: body.restitution,
        }
    }
}

/// Direction and surface gap between two circles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpactVector {
    /// Center of the first circle.
    pub from: DVec2,
    /// Center-to-center direction, radians in `[0, 2π)`.
    pub angle: f64,
    /// Center distance minus both radii. Negative when overlapping.
    pub gap: f64,
}

impl ImpactVector {
    pub fn new(a: DVec2, radius_a: f64, b: DVec2, radius_b: f64) -> Self {
        let centers = Vector::between(a, b);
        Self {
            from: a,
            angle: centers.angle(),
            gap: centers.magnitude().abs() - (radius_a + radius_b),
        }
    }

    pub fn between(a: &Impactor, b: &Impactor) -> Self {
        Self::new(a.position, a.radius(), b.position, b.radius())
    }

    pub fn is_contact(&self) -> bool {
        self.gap <= MIN_DISTANCE
    }

    /// As an anchored vector whose length is the absolute gap.
    pub fn to_vector(&self) -> Vector {
        let mut v = Vector::from_polar(self.gap.abs(), self.angle);
        v.translate_absolute(self.from);
        v
    }
}

pub fn impact_vector(a: &Body, b: &Body) -> ImpactVector {
    ImpactVector::new(a.position, a.radius(), b.position, b.radius())
}

pub fn colliding(a: &Body, b: &Body) -> bool {
    impact_vector(a, b).is_contact()
}

/// Every body transitively touching `seed`, `seed` first, never including
/// `exclude`.
pub fn cluster_of(bodies: &[Body], seed: usize, exclude: usize) -> Vec<usize> {
    let mut visited = vec![false; bodies.len()];
    visited[seed] = true;
    if let Some(v) = visited.get_mut(exclude) {
        *v = true;
    }

    let mut members = vec![seed];
    let mut stack = vec![seed];
    while let Some(current) = stack.pop() {
        for (other, seen) in visited.iter_mut().enumerate() {
            if !*seen && colliding(&bodies[current], &bodies[other]) {
                *seen = true;
                members.push(other);
                stack.push(other);
            }
        }
    }
    members
}

/// Outcome of [`elastic_response`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Response {
    /// New velocity for the first body, `None` when there is no contact.
    pub velocity: Option<Vector>,
    pub impact: ImpactVector,
}

/// 2D elastic collision of `a` against `b`, with each mass weighted by its
/// restitution. Only `a`'s new velocity is returned.
pub fn elastic_response(a: &Impactor, b: &Impactor) -> Response {
    let impact = ImpactVector::between(a, b);
    if !impact.is_contact() {
        return Response {
            velocity: None,
            impact,
        };
    }

    let phi = impact.angle;
    let m1 = a.mass * a.restitution;
    let m2 = b.mass * b.restitution;
    if m1 + m2 <= f64::EPSILON {
        // both fully inelastic: the formula is 0/0
        return Response {
            velocity: None,
            impact,
        };
    }

    let (v1, a1) = (a.velocity.magnitude(), a.velocity.angle());
    let (v2, a2) = (b.velocity.magnitude(), b.velocity.angle());

    let normal = (v1 * (a1 - phi).cos() * (m1 - m2) + 2.0 * m2 * v2 * (a2 - phi).cos()) / (m1 + m2);
    let tangent = v1 * (a1 - phi).sin();

    let velocity = Vector::from_polar(normal, phi) + Vector::from_polar(tangent, phi + DEG_90);
    Response {
        velocity: Some(velocity),
        impact,
    }
}

/// New velocity per body, `None` where nothing collided. Reads only the
/// pre-resolution state.
pub fn candidate_velocities(bodies: &[Body], forces: &ForceSet, dt: f64) -> Vec<Option<Vector>> {
    let mut out = vec![None; bodies.len()];

    for (i, body) in bodies.iter().enumerate() {
        if !body.movable {
            continue;
        }
        let mut probe: Option<Impactor> = None;

        for (j, other) in bodies.iter().enumerate() {
            if i == j || !colliding(body, other) {
                continue;
            }

            let members = cluster_of(bodies, j, i);
            let target = if members.len() == 1 {
                Impactor::from(other)
            } else {
                Impactor::aggregate(bodies, &members)
            };
            let ahead = *probe.get_or_insert_with(|| body.lookahead(forces.for_body(i), dt));

            let Some(v) = elastic_response(&ahead, &target).velocity else {
                continue;
            };
            if !v.is_finite() {
                warn!(body = i, neighbor = j, "discarding non-finite collision velocity");
                continue;
            }

            // Later impacts are subtracted from the first one. This is a rough
            // stand-in for a multi-contact solve and is kept as is.
            out[i] = Some(match out[i] {
                None => v,
                Some(first) => first - v,
            });
        }
    }
    out
}

/// Detect and resolve all collisions for this tick. Bodies that got a new
/// velocity are moved back to their pre-integration position. Returns how
/// many bodies were affected.
pub fn resolve_collisions(bodies: &mut [Body], forces: &ForceSet, dt: f64) -> usize {
    let candidates = candidate_velocities(bodies, forces, dt);
    let mut resolved = 0;
    for (body, velocity) in bodies.iter_mut().zip(candidates) {
        if let Some(v) = velocity {
            body.velocity = v;
            body.position = body.last_position;
            resolved += 1;
        }
    }
    resolved
}
