use bevy::math::DVec2;

use crate::physics::{Body, Bounds, Mode, Scene};

/// What the renderer needs to draw one body.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyView {
    pub position: DVec2,
    pub radius: f64,
    pub mass: f64,
    pub color: [u8; 3],
    pub tag: Option<String>,
    pub movable: bool,
    /// Oldest point first.
    pub trail: Vec<DVec2>,
}

impl BodyView {
    pub fn intersects(&self, point: DVec2) -> bool {
        let d = point - self.position;
        d.length_squared() / (self.radius * self.radius) < 1.0
    }
}

impl From<&Body> for BodyView {
    fn from(body: &Body) -> Self {
        Self {
            position: body.position,
            radius: body.radius(),
            mass: body.mass,
            color: body.color,
            tag: body.tag.clone(),
            movable: body.movable,
            trail: body.trail.to_vec(),
        }
    }
}

/// Immutable copy of the scene published by the sim thread for the UI thread.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    /// Bumped on every rebuild; body indices are only meaningful within one generation.
    pub generation: u64,
    pub tick: u64,
    pub mode: Mode,
    pub sim_speed: f64,
    pub bounds: Bounds,
    /// Body currently held by the pointer.
    pub held: Option<usize>,
    pub bodies: Vec<BodyView>,
}

impl Snapshot {
    pub fn capture(scene: &Scene, generation: u64, sim_speed: f64) -> Self {
        Self {
            generation,
            tick: scene.ticks(),
            mode: scene.mode(),
            sim_speed,
            bounds: *scene.bounds(),
            held: scene.held(),
            bodies: scene.bodies().iter().map(BodyView::from).collect(),
        }
    }

    /// Index of the first body under `point`.
    pub fn body_at(&self, point: DVec2) -> Option<usize> {
        self.bodies.iter().position(|b| b.intersects(point))
    }
}
