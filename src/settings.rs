/*
Wristwatch - Wrist Watch HUD
*/
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::status::STATUS_REFRESH_SECS;

const SETTINGS_FILE: &str = "watch.ron";
const MIN_REFRESH_SECS: f32 = 0.05;
const MIN_WATCH_SCALE: f32 = 0.25;
const MAX_WATCH_SCALE: f32 = 4.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Keys Standing in for the Two Watch Actions on the Controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchBindings {
    pub radial_menu: KeyCode,
    pub toggle_mode: KeyCode,
}

impl Default for WatchBindings {
    fn default() -> Self {
        Self {
            radial_menu: KeyCode::KeyQ,
            toggle_mode: KeyCode::Tab,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    /// Numeric Readout Instead of the Bullet Grid
    pub use_numbers_for_ammo: bool,
    /// Multiplier on Top of the Watch's Base 1.25 Scale
    /// Range: 0.25 ..= 4.0
    pub watch_scale: f32,
    /// '#RRGGBB' for the Strap and Body
    pub watch_color: String,
    /// Labels Under the Radial Menu Icons
    pub radial_info_text: bool,
    /// When False, 'Chat' is Skipped by Mode Cycling
    pub chat_on_watch: bool,
    /// Gun in the Left Hand, Watch on the Right
    pub use_left_hand: bool,
    /// Team Status Refresh Cadence in Seconds, at Least 0.05
    pub status_refresh_secs: f32,
    pub bindings: WatchBindings,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            use_numbers_for_ammo: false,
            watch_scale: 1.0,
            watch_color: "#FFFFFF".to_string(),
            radial_info_text: true,
            chat_on_watch: true,
            use_left_hand: false,
            status_refresh_secs: STATUS_REFRESH_SECS,
            bindings: WatchBindings::default(),
        }
    }
}

impl WatchSettings {
    fn config_path() -> Option<PathBuf> {
        #[cfg(debug_assertions)]
        {
            // Debug builds: read from project directory
            let mut p = std::env::current_dir().ok()?;
            p.push(SETTINGS_FILE);
            Some(p)
        }
        #[cfg(not(debug_assertions))]
        {
            dirs::config_dir().map(|mut p| {
                p.push("Wristwatch");
                p.push(SETTINGS_FILE);
                p
            })
        }
    }

    pub fn from_ron(path: &Path, contents: &str) -> Result<Self, SettingsError> {
        ron::from_str::<Self>(contents)
            .map(Self::sanitized)
            .map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(path, &contents)
    }

    /// Missing File Means Defaults, a Broken One Gets a Warning and Defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                info!("Watch settings loaded from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("{e}, using default watch settings");
                Self::default()
            }
        }
    }

    pub fn sanitized(mut self) -> Self {
        self.watch_scale = self.effective_watch_scale();
        self.status_refresh_secs = self.effective_refresh_secs();
        self
    }

    /// Never Panics, Whatever Was Written Into the Resource
    pub fn status_refresh_interval(&self) -> Duration {
        Duration::try_from_secs_f32(self.effective_refresh_secs())
            .unwrap_or_else(|_| Duration::from_secs_f32(STATUS_REFRESH_SECS))
    }

    fn effective_refresh_secs(&self) -> f32 {
        if self.status_refresh_secs.is_finite() {
            self.status_refresh_secs.max(MIN_REFRESH_SECS)
        } else {
            STATUS_REFRESH_SECS
        }
    }

    /// Configured Scale Kept Inside the Range the Watch Can Draw
    pub fn effective_watch_scale(&self) -> f32 {
        if self.watch_scale.is_finite() {
            self.watch_scale.clamp(MIN_WATCH_SCALE, MAX_WATCH_SCALE)
        } else {
            1.0
        }
    }

    /// Which Observed Settings Differ Between Two Snapshots
    pub fn changes_from(&self, before: &Self) -> Vec<WatchSettingKind> {
        let mut out = Vec::new();
        if self.use_numbers_for_ammo != before.use_numbers_for_ammo {
            out.push(WatchSettingKind::AmmoNumbers);
        }
        if self.watch_scale != before.watch_scale {
            out.push(WatchSettingKind::WatchScale);
        }
        if self.watch_color != before.watch_color {
            out.push(WatchSettingKind::WatchColor);
        }
        if self.radial_info_text != before.radial_info_text {
            out.push(WatchSettingKind::RadialInfoText);
        }
        if self.chat_on_watch != before.chat_on_watch {
            out.push(WatchSettingKind::ChatOnWatch);
        }
        if self.use_left_hand != before.use_left_hand {
            out.push(WatchSettingKind::Handedness);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchSettingKind {
    AmmoNumbers,
    WatchScale,
    WatchColor,
    RadialInfoText,
    ChatOnWatch,
    Handedness,
}

/// Fired Once per Setting That Changed This Frame
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSettingChanged(pub WatchSettingKind);

/// Diff the Settings Resource Against Last Frame's Copy
/// Out-of-Range Values Written at Runtime are Pulled Back First
pub fn detect_setting_changes(
    mut settings: ResMut<WatchSettings>,
    mut last: Local<Option<WatchSettings>>,
    mut changed: MessageWriter<WatchSettingChanged>,
) {
    if !settings.is_changed() && last.is_some() {
        return;
    }

    let clean = settings.clone().sanitized();
    if *settings != clean {
        warn!("Watch settings out of range, clamped");
        *settings = clean;
    }

    match last.as_ref() {
        Some(before) => {
            for kind in settings.changes_from(before) {
                info!("Watch setting changed: {kind:?}");
                changed.write(WatchSettingChanged(kind));
            }
        }
        None => {
            // First run is the baseline, watch setup already applied it
        }
    }
    *last = Some(settings.clone());
}
