//! Host-side UI state: zoom, speed, mode, help, and pointer dragging.
//! Pure logic; the Bevy systems in `input.rs` feed it and forward the
//! resulting [`Command`]s to the sim thread.

use bevy::math::DVec2;
use bevy::prelude::Resource;

use crate::config::*;
use crate::physics::{Bounds, Mode};
use crate::sim::{Command, Snapshot};

pub const HELP_TEXT: &str = "[ENTER] = Restart Simulation\n\
                             [SPACE] = Switch Simulation Mode\n\
                             [<] [>] = Change Simulation Speed\n\
                             [+] [-] = Change Scale/Zoom\n\
                             [F1]    = Toggle this information";

/// Keyboard-level intents, independent of the actual key bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostAction {
    ZoomIn,
    ZoomOut,
    Restart,
    ToggleMode,
    SpeedUp,
    SpeedDown,
    ToggleHelp,
}

/// Screen size plus zoom: maps window pixels to simulation units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Viewport {
    pub fn bounds(&self) -> Bounds {
        Bounds::from_viewport(self.width, self.height, self.scale)
    }

    /// Window position (origin top-left, y down) to simulation space
    /// (origin center, y up).
    pub fn screen_to_sim(&self, screen: DVec2) -> DVec2 {
        let bounds = self.bounds();
        DVec2::new(
            screen.x / self.scale - bounds.width() / 2.0,
            bounds.height() / 2.0 - screen.y / self.scale,
        )
    }

    /// Simulation space to the Bevy 2D world (origin center, y up, pixels).
    pub fn sim_to_world(&self, sim: DVec2) -> DVec2 {
        sim * self.scale
    }
}

#[derive(Resource, Clone, Debug, PartialEq)]
pub struct Controls {
    pub scale: f64,
    pub sim_speed: f64,
    pub mode: Mode,
    pub show_help: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(&SandboxConfig::default())
    }
}

impl Controls {
    pub fn new(config: &SandboxConfig) -> Self {
        Self {
            scale: 1.0,
            sim_speed: config.sim_speed.clamp(MIN_SIM_SPEED, MAX_SIM_SPEED),
            mode: config.mode,
            show_help: true,
        }
    }

    pub fn viewport(&self, width: f64, height: f64) -> Viewport {
        Viewport {
            width,
            height,
            scale: self.scale,
        }
    }

    /// Update local state for `action` and return the command the sim
    /// thread needs, if any. Zoom needs the window size to recompute bounds.
    pub fn apply(&mut self, action: HostAction, window: (f64, f64)) -> Option<Command> {
        match action {
            HostAction::ZoomIn | HostAction::ZoomOut => {
                let step = if action == HostAction::ZoomIn {
                    SCALE_STEP
                } else {
                    -SCALE_STEP
                };
                let scale = round_tenth((self.scale + step).clamp(MIN_SCALE, MAX_SCALE));
                if scale == self.scale {
                    return None;
                }
                self.scale = scale;
                Some(Command::SetBounds(self.viewport(window.0, window.1).bounds()))
            }
            HostAction::SpeedUp | HostAction::SpeedDown => {
                let step = if action == HostAction::SpeedUp {
                    SIM_SPEED_STEP
                } else {
                    -SIM_SPEED_STEP
                };
                let speed = round_tenth((self.sim_speed + step).clamp(MIN_SIM_SPEED, MAX_SIM_SPEED));
                if speed == self.sim_speed {
                    return None;
                }
                self.sim_speed = speed;
                Some(Command::SetSpeed(speed))
            }
            HostAction::Restart => Some(Command::Restart),
            HostAction::ToggleMode => {
                self.mode = self.mode.toggled();
                Some(Command::Rebuild(self.mode))
            }
            HostAction::ToggleHelp => {
                self.show_help = !self.show_help;
                None
            }
        }
    }

    pub fn title(&self) -> String {
        let help = if self.show_help { " | [F1] Help" } else { "" };
        format!(
            "Newton Simulator: {} | Simulation {:.1} | Scale {:.1}{}",
            self.mode, self.sim_speed, self.scale, help
        )
    }
}

// keeps repeated 0.1 steps from drifting (0.30000000000000004)
fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Pointer drag state machine. Body indices are tied to a snapshot generation.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    pub hovered: Option<usize>,
    pub dragging: Option<(u64, usize)>,
}

impl DragState {
    /// Pointer moved to `point` (simulation space).
    pub fn pointer_moved(&mut self, snapshot: &Snapshot, point: DVec2) -> Option<Command> {
        match self.dragging {
            Some((generation, index)) if generation == snapshot.generation => {
                Some(Command::DragTo(index, point))
            }
            Some(_) => {
                // scene was rebuilt under the pointer
                self.dragging = None;
                Some(Command::Release)
            }
            None => {
                self.hovered = snapshot.body_at(point);
                None
            }
        }
    }

    pub fn pressed(&mut self, snapshot: &Snapshot) -> Option<Command> {
        let index = self.hovered?;
        self.dragging = Some((snapshot.generation, index));
        Some(Command::Grab {
            generation: snapshot.generation,
            index,
        })
    }

    pub fn released(&mut self) -> Option<Command> {
        self.dragging.take().map(|_| Command::Release)
    }
}
