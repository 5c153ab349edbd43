//! Force lists handed to the integrator each tick.
//!
//! - Standard mode: one shared list, `[gravity, wind]`.
//! - Planetarium mode: one list per body, `[zero, pull from every other body...]`.
//!
//! Entry 0 of every list is an acceleration field and is not divided by
//! mass (see `integrator::accumulate_acceleration`), so field-type forces
//! always go first.

use bevy::math::DVec2;

use super::body::Body;
use super::scene::Mode;
use super::vector::Vector;
use crate::config::{ATTRACTION_CONSTANT, GRAVITY, MIN_ATTRACTION_DISTANCE, WIND};

/// Forces for every body in the scene for one tick.
#[derive(Clone, Debug, PartialEq)]
pub enum ForceSet {
    /// Same list for every body.
    Shared(Vec<Vector>),
    /// `lists[i]` belongs to body `i`.
    PerBody(Vec<Vec<Vector>>),
}

impl ForceSet {
    pub fn for_body(&self, index: usize) -> &[Vector] {
        match self {
            ForceSet::Shared(forces) => forces,
            ForceSet::PerBody(lists) => lists.get(index).map(Vec::as_slice).unwrap_or(&[]),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForceField {
    pub gravity: Vector,
    pub wind: Vector,
    /// Inverse-square constant before scaling by `dt`.
    pub attraction: f64,
    /// Distances below this are clamped up before dividing.
    pub min_distance: f64,
}

impl Default for ForceField {
    fn default() -> Self {
        Self::new(GRAVITY, WIND)
    }
}

impl ForceField {
    pub fn new(gravity: DVec2, wind: DVec2) -> Self {
        Self {
            gravity: Vector::anchored(DVec2::ZERO, gravity),
            wind: Vector::anchored(DVec2::ZERO, wind),
            attraction: ATTRACTION_CONSTANT,
            min_distance: MIN_ATTRACTION_DISTANCE,
        }
    }

    pub fn forces(&self, mode: Mode, bodies: &[Body], dt: f64) -> ForceSet {
        match mode {
            Mode::Standard => ForceSet::Shared(self.standard()),
            Mode::Planetarium => ForceSet::PerBody(
                (0..bodies.len())
                    .map(|i| self.planetarium(bodies, i, dt))
                    .collect(),
            ),
        }
    }

    /// Gravity first (already an acceleration), then wind.
    pub fn standard(&self) -> Vec<Vector> {
        vec![self.gravity, self.wind]
    }

    /// Zero placeholder, then one pull per other body, in body order.
    pub fn planetarium(&self, bodies: &[Body], index: usize, dt: f64) -> Vec<Vector> {
        let target = &bodies[index];
        let mut forces = Vec::with_capacity(bodies.len());
        forces.push(Vector::ZERO);
        forces.extend(
            bodies
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != index)
                .map(|(_, source)| self.attraction(target, source, dt)),
        );
        forces
    }

    /// Pull on `target` toward `source`: `k * m_source² / d²` with
    /// `k = attraction * dt`. Not physical; tuned for pacing on screen.
    pub fn attraction(&self, target: &Body, source: &Body, dt: f64) -> Vector {
        let mut pull = Vector::between(target.position, source.position);
        let distance = pull.magnitude();
        if distance <= f64::EPSILON {
            // coincident centers have no direction
            return Vector::anchored(target.position, DVec2::ZERO);
        }
        let d = distance.max(self.min_distance);
        let k = self.attraction * dt;
        pull.set_magnitude(k * source.mass * source.mass / (d * d));
        pull
    }
}
