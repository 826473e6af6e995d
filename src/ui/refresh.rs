/*
Wristwatch - Wrist Watch HUD
*/
use bevy::prelude::*;
use std::time::Duration;

/// Handle for the Team Status Refresh Loop
/// Sleeps One Interval per Iteration, Checked on Every Wake
#[derive(Debug, Clone)]
pub struct StatusRefreshLoop {
    timer: Timer,
    cancelled: bool,
}

/// What a Wake Should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopWake {
    /// Still Sleeping
    Idle,
    /// Interval Elapsed, Refresh Now
    Refresh,
    /// Cancelled or the Panel Went Away, Drop the Handle
    Finished,
}

impl StatusRefreshLoop {
    pub fn new(interval: Duration) -> Self {
        Self {
            timer: Timer::new(interval, TimerMode::Repeating),
            cancelled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// 'still_wanted' is Re-Evaluated Only When the Loop Wakes
    pub fn tick(&mut self, delta: Duration, still_wanted: impl FnOnce() -> bool) -> LoopWake {
        if self.cancelled {
            return LoopWake::Finished;
        }
        if !self.timer.tick(delta).just_finished() {
            return LoopWake::Idle;
        }
        if !still_wanted() {
            self.cancelled = true;
            return LoopWake::Finished;
        }
        LoopWake::Refresh
    }
}
