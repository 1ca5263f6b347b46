//! Phase timing for the resolution state machine.
//!
//! Delayed phases never block: the controller re-enters the same state every
//! tick and asks its [`PhaseTimer`] whether the delay has passed. Time comes
//! from an injected [`Clock`], so tests drive it with a [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Virtual clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// One-shot delay gate with explicit arm / elapsed / disarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseTimer {
    armed_at: Option<u64>,
}

impl PhaseTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start measuring from `now`. Re-arming restarts the measurement.
    pub fn arm(&mut self, now: u64) {
        self.armed_at = Some(now);
    }

    pub fn disarm(&mut self) {
        self.armed_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// True once at least `delay_ms` passed since arming. Always false while disarmed.
    pub fn elapsed(&self, now: u64, delay_ms: u32) -> bool {
        match self.armed_at {
            Some(start) => now.saturating_sub(start) >= delay_ms as u64,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disarmed_timer_never_elapses() {
        let timer = PhaseTimer::new();
        assert!(!timer.is_armed());
        assert!(!timer.elapsed(u64::MAX, 0));
    }

    #[test]
    fn armed_timer_elapses_after_delay() {
        let mut timer = PhaseTimer::new();
        timer.arm(1000);
        assert!(timer.is_armed());
        assert!(!timer.elapsed(1000, 250));
        assert!(!timer.elapsed(1249, 250));
        assert!(timer.elapsed(1250, 250));

        timer.disarm();
        assert!(!timer.elapsed(5000, 250));
    }

    #[test]
    fn arming_at_time_zero_is_distinct_from_disarmed() {
        let mut timer = PhaseTimer::new();
        timer.arm(0);
        assert!(timer.is_armed());
        assert!(timer.elapsed(100, 100));
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(40);
        handle.advance(2);
        assert_eq!(clock.now_ms(), 42);
        clock.set(7);
        assert_eq!(handle.now_ms(), 7);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
