//! Pointer and keyboard input.
//!
//! - Left mouse **release** → [`ViewportClick`] in normalized coordinates.
//! - **Esc** / **Space** → quit.
//!
//! Both systems run before [`SimulationStep`], so a click lands in the same
//! frame it was made.

use crate::simulation::{click_to_viewport, SimulationStep, ViewportClick};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (pointer_click_system, quit_on_key_system).before(SimulationStep),
        );
    }
}

/// Turn a left-button release over the window into a [`ViewportClick`].
pub fn pointer_click_system(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut clicks: MessageWriter<ViewportClick>,
) {
    if !buttons.just_released(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    let target = click_to_viewport(cursor, size);
    debug!(
        "[input] Click at pixel ({:.0}, {:.0}) → ({:.3}, {:.3})",
        cursor.x, cursor.y, target.x, target.y
    );
    clicks.write(ViewportClick(target));
}

/// Esc or Space quits.
pub fn quit_on_key_system(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.any_just_pressed([KeyCode::Escape, KeyCode::Space]) {
        info!("[input] Quit requested");
        exit.write(AppExit::Success);
    }
}
