/*
Wristwatch - Wrist Watch HUD
*/
use bevy::prelude::*;
use bevy::audio::{
    AudioPlayer,
    AudioSource,
    PlaybackSettings,
    Volume,
};
use rand::RngExt;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UiSoundKind {
    /// Chat Line Arrived on the Watch
    MenuChangePage,
}

#[derive(Clone, Copy, Debug, Message, PartialEq, Eq)]
pub struct PlayUiSound {
    pub kind: UiSoundKind,
}

/// Vibration Request for the Offhand Controller (the One Wearing the Watch),
/// Picked up by the VR Input Layer
#[derive(Clone, Copy, Debug, Message, PartialEq)]
pub struct HapticPulse {
    pub duration_secs: f32,
    pub frequency: f32,
    pub amplitude: f32,
}

impl HapticPulse {
    /// New Chat Line
    pub const CHAT: Self = Self::offhand(0.1, 40.0, 0.75);
    /// Objective Text Rewritten
    pub const OBJECTIVE: Self = Self::offhand(0.01, 1.0 / 0.025, 0.2);
    /// Manual Mode Advance
    pub const MODE_ADVANCE: Self = Self::offhand(0.025, 1.0 / 0.025, 0.3);

    pub const fn offhand(duration_secs: f32, frequency: f32, amplitude: f32) -> Self {
        Self {
            duration_secs,
            frequency,
            amplitude,
        }
    }
}

#[derive(Resource, Default)]
pub struct UiSoundLibrary {
    pub map: HashMap<UiSoundKind, Vec<Handle<AudioSource>>>,
}

impl UiSoundLibrary {
    pub fn insert_one(&mut self, k: UiSoundKind, h: Handle<AudioSource>) {
        self.map.entry(k).or_default().push(h);
    }
}

/// Needs an 'AssetServer', so Only the Full Game Adds It
pub struct WatchAudioPlugin;

impl Plugin for WatchAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_ui_sounds)
            .add_systems(Update, play_ui_sounds);
    }
}

pub fn setup_ui_sounds(mut commands: Commands, asset_server: Res<AssetServer>) {
    let mut lib = UiSoundLibrary::default();
    lib.insert_one(
        UiSoundKind::MenuChangePage,
        asset_server.load("sounds/ui/menu_change_page.ogg"),
    );
    commands.insert_resource(lib);
}

pub fn play_ui_sounds(
    lib: Res<UiSoundLibrary>,
    mut commands: Commands,
    mut ev: MessageReader<PlayUiSound>,
) {
    for e in ev.read() {
        let Some(list) = lib.map.get(&e.kind) else {
            warn!("Missing UI sound for {:?}", e.kind);
            continue;
        };
        if list.is_empty() {
            continue;
        }

        let i = rand::rng().random_range(0..list.len());
        let clip = list[i].clone();

        // Watch sounds sit on the player's wrist, no spatialization
        commands.spawn((
            AudioPlayer::new(clip),
            PlaybackSettings::DESPAWN.with_volume(Volume::Linear(0.8)),
        ));
    }
}
