use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::controls::{Controls, DragState, HostAction};
use super::{Frame, Simulation, WindowExtent};
use crate::sim::Command;

/// Key bindings. Actions fire on key release.
const BINDINGS: [(KeyCode, HostAction); 10] = [
    (KeyCode::NumpadAdd, HostAction::ZoomIn),
    (KeyCode::Equal, HostAction::ZoomIn),
    (KeyCode::NumpadSubtract, HostAction::ZoomOut),
    (KeyCode::Minus, HostAction::ZoomOut),
    (KeyCode::Enter, HostAction::Restart),
    (KeyCode::NumpadEnter, HostAction::Restart),
    (KeyCode::Space, HostAction::ToggleMode),
    (KeyCode::Period, HostAction::SpeedUp),
    (KeyCode::Comma, HostAction::SpeedDown),
    (KeyCode::F1, HostAction::ToggleHelp),
];

fn send(sim: &Simulation, command: Option<Command>) {
    if let Some(command) = command {
        if !sim.0.send(command) {
            warn!("simulation thread is gone, input dropped");
        }
    }
}

/// Native-only quit: press Esc or Q to exit the app.
/// (No-op on wasm32.)
pub fn exit_on_esc_or_q_if_native(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if cfg!(not(target_arch = "wasm32")) && keys.any_just_pressed([KeyCode::Escape, KeyCode::KeyQ]) {
        exit.write(AppExit::Success);
    }
}

/// Resend bounds whenever the window is resized.
pub fn track_window_size(
    windows: Query<&Window, With<PrimaryWindow>>,
    controls: Res<Controls>,
    mut extent: ResMut<WindowExtent>,
    sim: Res<Simulation>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = DVec2::new(window.width() as f64, window.height() as f64);
    if size == extent.size || size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    extent.size = size;
    send(&sim, Some(Command::SetBounds(controls.viewport(size.x, size.y).bounds())));
}

pub fn handle_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    mut controls: ResMut<Controls>,
    extent: Res<WindowExtent>,
    sim: Res<Simulation>,
) {
    for (key, action) in BINDINGS {
        if !keys.just_released(key) {
            continue;
        }
        let command = controls.apply(action, (extent.size.x, extent.size.y));
        send(&sim, command);
    }
}

/// Hover detection and dragging with the left mouse button.
pub fn handle_pointer(
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    controls: Res<Controls>,
    frame: Res<Frame>,
    mut drag: ResMut<DragState>,
    sim: Res<Simulation>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    if let Some(screen) = window.cursor_position() {
        let viewport = controls.viewport(window.width() as f64, window.height() as f64);
        let point = viewport.screen_to_sim(screen.as_dvec2());
        send(&sim, drag.pointer_moved(&frame.0, point));
    }

    if buttons.just_pressed(MouseButton::Left) {
        send(&sim, drag.pressed(&frame.0));
    }
    if buttons.just_released(MouseButton::Left) {
        send(&sim, drag.released());
    }
}

pub fn update_title(
    controls: Res<Controls>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !controls.is_changed() {
        return;
    }
    if let Ok(mut window) = windows.single_mut() {
        window.title = controls.title();
    }
}
