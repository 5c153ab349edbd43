//! The physics engine: vectors, bodies, integration, collisions and force fields.
//! Nothing in here knows about windows or threads.

pub mod body;
pub mod bounds;
pub mod collision;
pub mod forces;
pub mod integrator;
pub mod scene;
pub mod vector;

pub use body::{Body, Trail};
pub use bounds::Bounds;
pub use collision::{ImpactVector, Impactor, resolve_collisions};
pub use forces::{ForceField, ForceSet};
pub use scene::{Mode, Scene};
pub use vector::Vector;
