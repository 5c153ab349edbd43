//! Bevy glue around the simulation: window, input, drawing.
//!
//! The sim thread owns the scene. Every render frame we pull its latest
//! snapshot, turn input into commands for it, and draw the snapshot with
//! gizmos.

use std::sync::Arc;

use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

pub mod controls;
pub mod input;
pub mod render;

pub use controls::{Controls, DragState, HELP_TEXT, HostAction, Viewport};

use crate::config::SandboxConfig;
use crate::sim::{SimulationHandle, Snapshot};

/// The running simulation thread.
#[derive(Resource)]
pub struct Simulation(pub SimulationHandle);

/// Latest snapshot pulled from the sim thread this frame.
#[derive(Resource, Default, Clone)]
pub struct Frame(pub Arc<Snapshot>);

/// Last window size we sent bounds for (logical pixels).
#[derive(Resource, Default, Copy, Clone, Debug)]
pub struct WindowExtent {
    pub size: DVec2,
}

#[derive(Resource, Clone)]
struct Settings(SandboxConfig);

/// Plug this into your App with `.add_plugins(SandboxPlugin::default())`.
#[derive(Default)]
pub struct SandboxPlugin {
    pub config: SandboxConfig,
}

impl Plugin for SandboxPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Settings(self.config.clone()))
            .insert_resource(Controls::new(&self.config))
            .init_resource::<DragState>()
            .init_resource::<Frame>()
            .init_resource::<WindowExtent>()
            .add_systems(Startup, (start_simulation, render::spawn_help_overlay))
            .add_systems(
                Update,
                (
                    pull_frame,
                    input::track_window_size,
                    input::handle_keyboard,
                    input::handle_pointer,
                    input::update_title,
                    render::sync_help_overlay,
                    render::draw_scene,
                )
                    .chain()
                    .run_if(resource_exists::<Simulation>),
            )
            // Native-only quit shortcut (Esc or Q)
            .add_systems(Update, input::exit_on_esc_or_q_if_native);
    }
}

/// Spawn the camera and the sim thread, sized to the primary window.
fn start_simulation(
    mut commands: Commands,
    settings: Res<Settings>,
    controls: Res<Controls>,
    mut extent: ResMut<WindowExtent>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut exit: MessageWriter<AppExit>,
) {
    commands.spawn(Camera2d);

    let Ok(window) = windows.single() else {
        error!("no primary window, cannot size the simulation");
        exit.write(AppExit::error());
        return;
    };
    extent.size = DVec2::new(window.width() as f64, window.height() as f64);
    let bounds = controls.viewport(extent.size.x, extent.size.y).bounds();

    match SimulationHandle::spawn(settings.0.clone(), bounds) {
        Ok(handle) => {
            info!("simulation started");
            commands.insert_resource(Simulation(handle));
        }
        Err(e) => {
            error!(%e, "failed to start simulation");
            exit.write(AppExit::error());
        }
    }
}

fn pull_frame(sim: Res<Simulation>, mut frame: ResMut<Frame>) {
    let latest = sim.0.snapshot();
    if !Arc::ptr_eq(&latest, &frame.0) {
        frame.0 = latest;
    }
}
