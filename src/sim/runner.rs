//! The background simulation loop.
//!
//! The loop thread owns the [`Scene`]. The UI side never touches it: it
//! sends [`Command`]s, which are applied at the start of the next tick, and
//! reads the latest [`Snapshot`], which the loop replaces once per frame.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use bevy::math::DVec2;
use flume::{Receiver, RecvTimeoutError, Sender};
use parking_lot::RwLock;
use rand::prelude::*;
use tracing::{debug, error, info, warn};

use super::clock::SimulationClock;
use super::snapshot::Snapshot;
use crate::config::SandboxConfig;
use crate::error::Result;
use crate::physics::{Bounds, ForceField, Mode, Scene};

/// Requests from the UI thread to the loop.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discard the scene and build a new one in `mode`.
    Rebuild(Mode),
    /// Rebuild in the current mode.
    Restart,
    SetBounds(Bounds),
    SetSpeed(f64),
    /// Hold body `index` still so the pointer can move it. Ignored when
    /// `generation` is not the current scene's.
    Grab { generation: u64, index: usize },
    DragTo(usize, DVec2),
    Release,
    Shutdown,
}

type Published = Arc<RwLock<Arc<Snapshot>>>;

/// Owning handle to a running simulation thread. Dropping it stops the loop.
pub struct SimulationHandle {
    commands: Sender<Command>,
    published: Published,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SimulationHandle {
    pub fn spawn(config: SandboxConfig, bounds: Bounds) -> Result<Self> {
        config.validate()?;
        bounds.validate()?;

        let (tx, rx) = flume::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));
        let mut runner = Runner::new(&config, bounds, Instant::now());
        let published: Published = Arc::new(RwLock::new(Arc::new(runner.snapshot())));

        let loop_published = published.clone();
        let loop_shutdown = shutdown.clone();
        let wake_period = config.wake_period;
        let thread = thread::Builder::new()
            .name("newton-sim".into())
            .spawn(move || runner.run(rx, loop_published, loop_shutdown, wake_period))?;

        Ok(Self {
            commands: tx,
            published,
            shutdown,
            thread: Some(thread),
        })
    }

    /// Queue a command. Returns false when the loop has already stopped.
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    /// The most recently published frame.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.published.read().clone()
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the loop and wait for the in-flight tick to finish.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        // wake the loop if it is waiting on the queue
        let _ = self.commands.send(Command::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("simulation thread panicked");
            }
        }
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Loop state. Driven by [`SimulationHandle`] on its own thread, or stepped
/// by hand in tests.
pub struct Runner {
    scene: Scene,
    clock: SimulationClock,
    rng: StdRng,
    generation: u64,
    frame_due: bool,
}

impl Runner {
    pub fn new(config: &SandboxConfig, bounds: Bounds, now: Instant) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let scene = Scene::new(config.mode, bounds)
            .with_field(ForceField::new(config.gravity, config.wind));
        let mut runner = Self {
            scene,
            clock: SimulationClock::new(now, config.sim_speed, config.frame_interval()),
            rng: StdRng::seed_from_u64(seed),
            generation: 0,
            frame_due: false,
        };
        debug!(seed, "scene rng seeded");
        runner.rebuild(config.mode, now);
        runner
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.scene, self.generation, self.clock.sim_speed())
    }

    /// Apply one command. `Break` means the loop should stop.
    pub fn apply(&mut self, command: Command, now: Instant) -> ControlFlow<()> {
        debug!(?command, "applying command");
        match command {
            Command::Rebuild(mode) => self.rebuild(mode, now),
            Command::Restart => self.rebuild(self.scene.mode(), now),
            Command::SetBounds(bounds) => match bounds.validate() {
                Ok(()) => self.scene.set_bounds(bounds),
                Err(e) => warn!(%e, "bounds rejected"),
            },
            Command::SetSpeed(speed) => {
                if speed.is_finite() && speed > 0.0 {
                    self.clock.set_sim_speed(speed);
                } else {
                    warn!(speed, "simulation speed rejected");
                }
            }
            Command::Grab { generation, index } => {
                if generation == self.generation {
                    self.scene.grab(index);
                } else {
                    debug!(generation, current = self.generation, "stale grab ignored");
                }
            }
            Command::DragTo(index, point) => self.scene.drag_to(index, point),
            Command::Release => self.scene.release(),
            Command::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Advance by the wall time elapsed since the previous step.
    /// Returns true when a frame is due.
    pub fn step(&mut self, now: Instant) -> bool {
        let tick = self.clock.tick(now);
        self.scene.advance_one_tick(tick.dt);
        let due = tick.frame_due || self.frame_due;
        self.frame_due = false;
        due
    }

    fn rebuild(&mut self, mode: Mode, now: Instant) {
        if let Err(e) = self.scene.rebuild(mode, &mut self.rng) {
            error!(%e, %mode, "scene rebuild failed");
        }
        self.generation += 1;
        self.clock.reset(now);
        self.frame_due = true;
    }

    fn run(
        mut self,
        commands: Receiver<Command>,
        published: Published,
        shutdown: Arc<AtomicBool>,
        wake_period: Duration,
    ) {
        info!(mode = %self.scene.mode(), "simulation loop started");

        'run: while !shutdown.load(Ordering::Acquire) {
            let mut pending = Vec::new();
            match commands.recv_timeout(wake_period) {
                Ok(command) => pending.push(command),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            pending.extend(commands.try_iter());

            let now = Instant::now();
            for command in pending {
                if self.apply(command, now).is_break() {
                    break 'run;
                }
            }

            if self.step(Instant::now()) {
                *published.write() = Arc::new(self.snapshot());
            }
        }

        info!(ticks = self.scene.ticks(), "simulation loop stopped");
    }
}
