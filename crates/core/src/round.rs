//! Round countdown
//!
//! Counts whole seconds down while running. The finish is reported one
//! interval after the display reaches zero, so "0" stays visible for a full
//! second before the round ends.

use crate::types::ROUND_INTERVAL_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTimer {
    start_seconds: u32,
    remaining: u32,
    interval_ms: u32,
    accumulator_ms: u32,
    running: bool,
}

impl RoundTimer {
    pub fn new(seconds: u32) -> Self {
        Self {
            start_seconds: seconds,
            remaining: seconds,
            interval_ms: ROUND_INTERVAL_MS,
            accumulator_ms: 0,
            running: false,
        }
    }

    pub fn with_interval_ms(mut self, interval_ms: u32) -> Self {
        self.interval_ms = interval_ms.max(1);
        self
    }

    pub fn start(&mut self) {
        self.accumulator_ms = 0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Restore the starting time. Does not change whether the timer runs.
    pub fn reset(&mut self) {
        self.remaining = self.start_seconds;
        self.accumulator_ms = 0;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by `elapsed_ms`. Returns true exactly once, when the round ends.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.running {
            return false;
        }

        self.accumulator_ms = self.accumulator_ms.saturating_add(elapsed_ms);
        while self.accumulator_ms >= self.interval_ms {
            self.accumulator_ms -= self.interval_ms;
            if self.remaining == 0 {
                self.stop();
                return true;
            }
            self.remaining -= 1;
        }
        false
    }
}
