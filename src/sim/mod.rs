//! Runs the physics off the UI thread and hands frames back to it.

pub mod clock;
pub mod runner;
pub mod snapshot;

pub use clock::{SimulationClock, Tick};
pub use runner::{Command, Runner, SimulationHandle};
pub use snapshot::{BodyView, Snapshot};
