use bevy::prelude::*;

use super::controls::{Controls, DragState, HELP_TEXT};
use super::{Frame, WindowExtent};

/// Trail alpha out of 255.
const TRAIL_ALPHA: u8 = 96;
const HOVER_RING: f32 = 3.0;
const HELP_MARGIN: f32 = 8.0;
const HELP_FONT_SIZE: f32 = 14.0;

/// Marker for the help text node.
#[derive(Component)]
pub struct HelpOverlay;

/// Draw every body as a circle, with its trail behind it.
pub fn draw_scene(
    mut gizmos: Gizmos,
    frame: Res<Frame>,
    controls: Res<Controls>,
    drag: Res<DragState>,
    extent: Res<WindowExtent>,
) {
    let viewport = controls.viewport(extent.size.x, extent.size.y);

    for (i, body) in frame.0.bodies.iter().enumerate() {
        let [r, g, b] = body.color;

        if body.trail.len() > 1 {
            gizmos.linestrip_2d(
                body.trail.iter().map(|p| viewport.sim_to_world(*p).as_vec2()),
                Color::srgba_u8(r, g, b, TRAIL_ALPHA),
            );
        }

        let center = viewport.sim_to_world(body.position).as_vec2();
        let radius = (body.radius * controls.scale) as f32;
        gizmos.circle_2d(center, radius, Color::srgb_u8(r, g, b));

        if drag.hovered == Some(i) || frame.0.held == Some(i) {
            gizmos.circle_2d(center, radius + HOVER_RING, Color::WHITE);
        }
    }
}

/// Key help in the top-left corner, shown or hidden by F1.
pub fn spawn_help_overlay(mut commands: Commands, controls: Res<Controls>) {
    commands.spawn((
        HelpOverlay,
        Text::new(HELP_TEXT),
        TextFont {
            font_size: HELP_FONT_SIZE,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(HELP_MARGIN),
            left: Val::Px(HELP_MARGIN),
            ..default()
        },
        help_visibility(controls.show_help),
    ));
}

pub fn sync_help_overlay(
    controls: Res<Controls>,
    mut overlay: Query<&mut Visibility, With<HelpOverlay>>,
) {
    if !controls.is_changed() {
        return;
    }
    for mut visibility in &mut overlay {
        visibility.set_if_neq(help_visibility(controls.show_help));
    }
}

fn help_visibility(show: bool) -> Visibility {
    if show {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}
