use bevy::prelude::*;

use newton_sandbox::config::{SandboxConfig, WINDOW_SIZE};
use newton_sandbox::host::{Controls, SandboxPlugin};

fn main() {
    let config = SandboxConfig::default();
    let title = Controls::new(&config).title();

    App::new()
        // Solid black background
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title,
                resolution: WINDOW_SIZE.into(),
                ..default()
            }),
            ..default()
        }))
        // Sim thread + input + drawing
        .add_plugins(SandboxPlugin { config })
        .run();
}
