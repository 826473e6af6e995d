/*
Wristwatch - Wrist Watch HUD
*/
use bevy::prelude::*;
use std::time::Duration;

use super::refresh::{LoopWake, StatusRefreshLoop};
use crate::chat::ChatLog;
use crate::team::InventorySlot;

/// Which Face the Watch is Showing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WatchMode {
    #[default]
    Inventory,
    Objective,
    Chat,
    Status,
}

impl WatchMode {
    /// Cycle Order
    pub const ALL: [WatchMode; 4] = [
        WatchMode::Inventory,
        WatchMode::Objective,
        WatchMode::Chat,
        WatchMode::Status,
    ];

    pub fn next(self, chat_enabled: bool) -> Self {
        let mut i = self as usize;
        loop {
            i = (i + 1) % Self::ALL.len();
            let candidate = Self::ALL[i];
            if candidate == WatchMode::Chat && !chat_enabled {
                continue;
            }
            return candidate;
        }
    }
}

/// Item Currently in the Player's Hands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WieldedItem {
    pub slot: InventorySlot,
    pub shootable: bool,
    pub max_clip: i32,
    pub current_clip: i32,
}

/// Local Player's Own Readings for the Inventory Face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalVitals {
    pub health: f32,
    pub infection: f32,
    pub oxygen: f32,
}

impl Default for LocalVitals {
    fn default() -> Self {
        Self { health: 1.0, infection: 0.0, oxygen: 1.0 }
    }
}

/// Per-Watch State, Owned by the Watch Entity
#[derive(Component, Debug)]
pub struct Watch {
    mode: WatchMode,
    status_loop: Option<StatusRefreshLoop>,
    refresh_interval: Duration,
    refresh_pending: bool,
    pub chat: ChatLog,
    pub wielded: Option<WieldedItem>,
    pub vitals: LocalVitals,
}

impl Watch {
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            mode: WatchMode::default(),
            status_loop: None,
            refresh_interval,
            refresh_pending: false,
            chat: ChatLog::default(),
            wielded: None,
            vitals: LocalVitals::default(),
        }
    }

    pub fn mode(&self) -> WatchMode {
        self.mode
    }

    pub fn status_loop_active(&self) -> bool {
        self.status_loop.is_some()
    }

    /// Applies to the Next Loop Started
    pub fn set_refresh_interval(&mut self, interval: Duration) {
        self.refresh_interval = interval;
    }

    /// Sets the Mode Unconditionally
    /// Leaving Status Cancels the Loop, Entering it Asks for an Immediate
    /// Refresh and Starts One (Unless One is Already Running)
    pub fn switch_mode(&mut self, mode: WatchMode) {
        if self.mode == WatchMode::Status && mode != WatchMode::Status {
            self.stop_status_loop();
        }

        debug!("Watch mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;

        if mode == WatchMode::Status {
            self.refresh_pending = true;
            self.start_status_loop();
        }
    }

    pub fn advance_mode(&mut self, chat_enabled: bool) -> WatchMode {
        let next = self.mode.next(chat_enabled);
        self.switch_mode(next);
        next
    }

    fn start_status_loop(&mut self) {
        if self.status_loop.is_some() {
            return;
        }
        debug!("Status refresh loop started ({:?})", self.refresh_interval);
        self.status_loop = Some(StatusRefreshLoop::new(self.refresh_interval));
    }

    fn stop_status_loop(&mut self) {
        if let Some(mut status_loop) = self.status_loop.take() {
            status_loop.cancel();
            debug!("Status refresh loop stopped");
        }
        self.refresh_pending = false;
    }

    /// Cancels Any Running Loop, Call Before the Watch Goes Away
    pub fn teardown(&mut self) {
        self.stop_status_loop();
    }

    /// Advances the Loop by One Frame
    /// True When the Status Panel Should be Re-Rendered Now
    pub fn poll_status_refresh(&mut self, delta: Duration) -> bool {
        let immediate = std::mem::take(&mut self.refresh_pending);

        let mode = self.mode;
        let woke = match self.status_loop.as_mut() {
            Some(status_loop) => status_loop.tick(delta, || mode == WatchMode::Status),
            None => LoopWake::Idle,
        };

        match woke {
            LoopWake::Finished => {
                self.status_loop = None;
                false
            }
            LoopWake::Refresh => mode == WatchMode::Status,
            LoopWake::Idle => immediate && mode == WatchMode::Status,
        }
    }
}
