//! Newton sandbox: circular bodies under force fields, colliding with each
//! other and with the window bounds.
//!
//! - [`physics`]: the engine (vectors, bodies, integrator, collisions, force fields, scene)
//! - [`sim`]: background loop, clock, snapshot handoff
//! - [`host`]: Bevy plugin that draws snapshots and turns input into commands

pub mod config;
pub mod error;
pub mod host;
pub mod physics;
pub mod sim;

pub use error::{Result, SandboxError};
