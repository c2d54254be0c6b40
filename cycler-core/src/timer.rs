//! Tick-counted countdown timers for the pump phases and the blink LED
//!
//! Timers never read a clock; they advance one step per scheduler tick,
//! which keeps the whole state machine deterministic on the host.

use crate::hal::Duration;

/// Countdown timer measured in scheduler ticks
#[derive(Debug)]
pub struct PhaseTimer {
    total_ticks: u64,
    elapsed_ticks: u64,
    tick_ms: u64,
    running: bool,
    expired: bool,
}

impl PhaseTimer {
    /// Timer over a duration given in minutes
    pub fn from_minutes(minutes: u32, tick_interval: Duration) -> Self {
        Self::from_millis(minutes as u64 * 60_000, tick_interval)
    }

    /// Timer over a duration given in seconds
    pub fn from_secs(secs: u32, tick_interval: Duration) -> Self {
        Self::from_millis(secs as u64 * 1000, tick_interval)
    }

    fn from_millis(duration_ms: u64, tick_interval: Duration) -> Self {
        let tick_ms = tick_interval.as_millis().max(1);
        Self {
            total_ticks: duration_ms / tick_ms,
            elapsed_ticks: 0,
            tick_ms,
            running: false,
            expired: false,
        }
    }

    /// Re-arm with a new duration; elapsed time resets so the timer is
    /// fresh when it is next started
    pub fn set_minutes(&mut self, minutes: u32) {
        self.total_ticks = minutes as u64 * 60_000 / self.tick_ms;
        self.elapsed_ticks = 0;
        self.expired = false;
    }

    /// Start counting from zero elapsed time
    pub fn start(&mut self) {
        self.elapsed_ticks = 0;
        self.expired = false;
        self.running = true;
    }

    /// Stop counting; elapsed time is kept until the next start/set
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance one scheduler tick. Returns true exactly once, on the tick
    /// the configured duration elapses. Stopped timers do not advance.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.expired {
            return false;
        }
        self.elapsed_ticks += 1;
        if self.elapsed_ticks >= self.total_ticks {
            self.expired = true;
            return true;
        }
        false
    }

    /// Whole seconds left before expiry
    pub fn remaining_secs(&self) -> u32 {
        let left = self.total_ticks.saturating_sub(self.elapsed_ticks);
        (left * self.tick_ms / 1000) as u32
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Currently configured duration, rounded down to whole minutes
    pub fn configured_minutes(&self) -> u32 {
        (self.total_ticks * self.tick_ms / 60_000) as u32
    }
}
