use std::fmt;

use bevy::math::DVec2;
use rand::prelude::*;
use tracing::{debug, info, warn};

use super::body::Body;
use super::bounds::Bounds;
use super::collision;
use super::forces::ForceField;
use super::vector::{TO_RAD, Vector};
use crate::config::*;
use crate::error::{Result, SandboxError};

/// Which force regime drives the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Constant gravity and wind, bodies bounce off the bounds.
    #[default]
    Standard,
    /// Bodies attract each other; no walls, near-zero restitution.
    Planetarium,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Standard => Mode::Planetarium,
            Mode::Planetarium => Mode::Standard,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Standard => f.write_str("Standard"),
            Mode::Planetarium => f.write_str("Planetarium"),
        }
    }
}

/// A body held by the pointer. It is made immovable while held so the
/// integrator doesn't fight the drag.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Grab {
    index: usize,
    was_movable: bool,
}

/// The live set of bodies plus everything needed to step them.
#[derive(Clone, Debug)]
pub struct Scene {
    bodies: Vec<Body>,
    bounds: Bounds,
    mode: Mode,
    field: ForceField,
    grab: Option<Grab>,
    ticks: u64,
}

impl Scene {
    /// An empty scene. Call [`Scene::rebuild`] to populate it.
    pub fn new(mode: Mode, bounds: Bounds) -> Self {
        Self {
            bodies: Vec::new(),
            bounds,
            mode,
            field: ForceField::default(),
            grab: None,
            ticks: 0,
        }
    }

    pub fn with_field(mut self, field: ForceField) -> Self {
        self.field = field;
        self
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn push(&mut self, body: Body) {
        self.bodies.push(body);
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn field(&self) -> &ForceField {
        &self.field
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Throw away all bodies and lay out a fresh scene for `mode`.
    /// Returns the number of bodies placed. On error the current scene is
    /// left as it was.
    pub fn rebuild(&mut self, mode: Mode, rng: &mut StdRng) -> Result<usize> {
        let bodies = match mode {
            Mode::Standard => random_bodies(&self.bounds, rng)?,
            Mode::Planetarium => planetarium_bodies(),
        };

        self.bodies = bodies;
        self.grab = None;
        self.ticks = 0;
        self.mode = mode;
        info!(%mode, bodies = self.bodies.len(), "scene rebuilt");
        Ok(self.bodies.len())
    }

    /// One simulation step: forces, integration, collisions.
    pub fn advance_one_tick(&mut self, dt: f64) {
        if self.mode == Mode::Planetarium {
            for body in &mut self.bodies {
                body.restitution = PLANETARIUM_RESTITUTION;
            }
        }

        let forces = self.field.forces(self.mode, &self.bodies, dt);
        let constrain = self.mode == Mode::Standard;
        for (i, body) in self.bodies.iter_mut().enumerate() {
            body.update(forces.for_body(i), &self.bounds, dt, constrain);
        }

        let resolved = collision::resolve_collisions(&mut self.bodies, &forces, dt);
        if resolved > 0 {
            debug!(tick = self.ticks, resolved, "collisions resolved");
        }
        self.ticks += 1;
    }

    /// Index of the first body under `point`, if any.
    pub fn body_at(&self, point: DVec2) -> Option<usize> {
        self.bodies.iter().position(|b| b.intersects(point))
    }

    /// Start holding body `index`. Releases any body already held.
    pub fn grab(&mut self, index: usize) -> bool {
        self.release();
        let Some(body) = self.bodies.get_mut(index) else {
            warn!(index, "grab ignored: no such body");
            return false;
        };
        self.grab = Some(Grab {
            index,
            was_movable: body.movable,
        });
        body.movable = false;
        true
    }

    /// Move the held body. Ignored unless `index` is the one held.
    pub fn drag_to(&mut self, index: usize, point: DVec2) {
        match self.grab {
            Some(grab) if grab.index == index => {
                if let Some(body) = self.bodies.get_mut(index) {
                    body.translate_absolute(point);
                }
            }
            _ => debug!(index, "drag ignored: body not held"),
        }
    }

    /// Let go of the held body and restore its movability.
    pub fn release(&mut self) {
        if let Some(grab) = self.grab.take() {
            if let Some(body) = self.bodies.get_mut(grab.index) {
                body.movable = grab.was_movable;
            }
        }
    }

    pub fn held(&self) -> Option<usize> {
        self.grab.map(|g| g.index)
    }
}

/// The fixed four-body planetarium: an immovable sun and three orbiters.
pub fn planetarium_bodies() -> Vec<Body> {
    vec![
        Body::new(200.0, DVec2::ZERO)
            .immovable()
            .with_color([255, 255, 0])
            .with_tag("sun"),
        Body::new(30.0, DVec2::new(700.0, 0.0))
            .with_velocity(Vector::from_polar(200.0, 90.0 * TO_RAD))
            .with_color([0, 191, 255])
            .with_trail(ORBIT_TRAIL_LEN),
        Body::new(20.0, DVec2::new(0.0, -500.0))
            .with_velocity(Vector::from_polar(200.0, 0.0 * TO_RAD))
            .with_color([255, 69, 0])
            .with_trail(ORBIT_TRAIL_LEN),
        Body::new(40.0, DVec2::new(-500.0, 0.0))
            .with_velocity(Vector::from_polar(220.0, 290.0 * TO_RAD))
            .with_color([154, 205, 50])
            .with_trail(ORBIT_TRAIL_LEN),
    ]
}

/// How many bodies a random scene of this width asks for.
fn body_count(bounds: &Bounds, rng: &mut StdRng) -> usize {
    let upper = (bounds.width().sqrt() as usize).clamp(MIN_BODIES + 1, MAX_BODIES + 1);
    rng.random_range(MIN_BODIES..upper)
}

/// Random bodies that fit inside `bounds` without their padded boxes
/// overlapping. Each body gets a bounded number of placement attempts; when
/// one runs out the scene keeps what was placed so far.
pub fn random_bodies(bounds: &Bounds, rng: &mut StdRng) -> Result<Vec<Body>> {
    bounds.validate()?;

    let requested = body_count(bounds, rng);
    let mut bodies: Vec<Body> = Vec::with_capacity(requested);

    'bodies: for _ in 0..requested {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let mass = rng.random_range(MIN_MASS..MAX_MASS);
            let center = DVec2::new(
                bounds.left + rng.random::<f64>() * bounds.width(),
                bounds.bottom + rng.random::<f64>() * bounds.height(),
            );
            if fits(bounds, &bodies, center, mass / 2.0) {
                let color = [rng.random::<u8>(), rng.random::<u8>(), rng.random::<u8>()];
                bodies.push(Body::new(mass, center).with_color(color));
                continue 'bodies;
            }
        }
        warn!(
            placed = bodies.len(),
            requested, "placement attempts exhausted, keeping a smaller scene"
        );
        break;
    }

    if bodies.is_empty() {
        return Err(SandboxError::PlacementStarved { requested });
    }
    Ok(bodies)
}

fn fits(bounds: &Bounds, placed: &[Body], center: DVec2, radius: f64) -> bool {
    if !bounds.contains_circle(center, radius) {
        return false;
    }
    let reach = radius + PLACEMENT_PADDING;
    placed.iter().all(|other| {
        let span = reach + other.radius() + PLACEMENT_PADDING;
        let d = (center - other.position).abs();
        d.x >= span || d.y >= span
    })
}
