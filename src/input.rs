/*
Wristwatch - Wrist Watch HUD
*/
use bevy::prelude::*;

use crate::settings::WatchSettings;

/// Logical Watch Buttons, Whatever Physical Input Drives Them
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WatchAction {
    RadialMenu,
    ToggleMode,
}

/// Rebuild This Frame's Action Edges From the Bound Keys
/// Runs Before Anything Reads 'ButtonInput<WatchAction>'
pub fn map_watch_bindings(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<WatchSettings>,
    mut actions: ResMut<ButtonInput<WatchAction>>,
) {
    actions.clear();

    let binds = settings.bindings;
    for (key, action) in [
        (binds.radial_menu, WatchAction::RadialMenu),
        (binds.toggle_mode, WatchAction::ToggleMode),
    ] {
        if keys.just_pressed(key) {
            actions.press(action);
        }
        if keys.just_released(key) {
            actions.release(action);
        }
    }
}
