//! Session - round lifecycle around the controller
//!
//! A session starts with a populated, frozen board (`Waiting`). `start`
//! unfreezes it and starts the countdown; when the countdown runs out the
//! board is frozen again and the round is `Finished`. `restart` deals a new
//! board and starts the next round.

use crate::config::EngineConfig;
use crate::controller::Controller;
use crate::round::RoundTimer;
use crate::snapshot::BoardSnapshot;
use crate::timer::{Clock, SystemClock};
use crate::types::{BoardState, Swap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug)]
pub struct Session<C: Clock = SystemClock> {
    controller: Controller<C>,
    round: RoundTimer,
    phase: RoundPhase,
}

impl Session<SystemClock> {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(config: &EngineConfig, clock: C) -> Self {
        let mut controller = Controller::with_clock(config, clock);
        controller.initialize();
        controller.freeze(true);
        Self {
            controller,
            round: RoundTimer::new(config.round_seconds),
            phase: RoundPhase::Waiting,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn controller(&self) -> &Controller<C> {
        &self.controller
    }

    /// Mutable access for hosts that subscribe to grid events.
    pub fn controller_mut(&mut self) -> &mut Controller<C> {
        &mut self.controller
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.round.remaining()
    }

    pub fn state(&self) -> BoardState {
        self.controller.state()
    }

    /// Begin the first round. Only valid while waiting.
    pub fn start(&mut self) -> bool {
        if self.phase != RoundPhase::Waiting {
            return false;
        }
        self.controller.freeze(false);
        self.round.reset();
        self.round.start();
        self.phase = RoundPhase::Playing;
        log::info!("round started ({}s)", self.round.remaining());
        true
    }

    /// Deal a fresh board and begin another round. Only valid once finished.
    pub fn restart(&mut self) -> bool {
        if self.phase != RoundPhase::Finished {
            return false;
        }
        self.controller.initialize();
        self.round.reset();
        self.round.start();
        self.phase = RoundPhase::Playing;
        log::info!("round restarted ({}s)", self.round.remaining());
        true
    }

    /// `start` or `restart`, whichever applies.
    pub fn advance_round(&mut self) -> bool {
        match self.phase {
            RoundPhase::Waiting => self.start(),
            RoundPhase::Finished => self.restart(),
            RoundPhase::Playing => false,
        }
    }

    /// Forward a swap while a round is being played.
    pub fn request_swap(&mut self, swap: Swap) -> bool {
        if self.phase != RoundPhase::Playing {
            return false;
        }
        self.controller.request_swap(swap)
    }

    /// One logic tick: advance the board, then the countdown.
    pub fn update(&mut self, elapsed_ms: u32) -> BoardState {
        let state = self.controller.update();
        if self.phase == RoundPhase::Playing && self.round.tick(elapsed_ms) {
            self.controller.freeze(true);
            self.phase = RoundPhase::Finished;
            log::info!("round finished");
            return self.controller.state();
        }
        state
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        self.controller.snapshot_into(out);
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.controller.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualClock;
    use crate::types::Position;

    fn session(seconds: u32) -> Session<ManualClock> {
        let mut config = EngineConfig::default().with_seed(77);
        config.round_seconds = seconds;
        Session::with_clock(&config, ManualClock::new())
    }

    #[test]
    fn new_session_waits_on_frozen_board() {
        let s = session(60);
        assert_eq!(s.phase(), RoundPhase::Waiting);
        assert_eq!(s.state(), BoardState::Freeze);
        assert_eq!(s.controller().holes(), 0);
    }

    #[test]
    fn swaps_are_ignored_until_started() {
        let mut s = session(60);
        let swap = Swap::new(Position::new(0, 0), Position::new(1, 0));
        assert!(!s.request_swap(swap));
        assert!(s.start());
        assert!(!s.start());
        assert_eq!(s.state(), BoardState::Ready);
        assert!(s.request_swap(swap));
    }

    #[test]
    fn countdown_expiry_freezes_board() {
        let mut s = session(1);
        s.start();
        s.update(1000);
        assert_eq!(s.remaining_seconds(), 0);
        assert_eq!(s.phase(), RoundPhase::Playing);
        assert_eq!(s.update(1000), BoardState::Freeze);
        assert_eq!(s.phase(), RoundPhase::Finished);
    }

    #[test]
    fn restart_deals_new_round() {
        let mut s = session(0);
        assert!(!s.restart());
        s.start();
        s.update(1000);
        assert_eq!(s.phase(), RoundPhase::Finished);

        assert!(s.advance_round());
        assert_eq!(s.phase(), RoundPhase::Playing);
        assert_eq!(s.state(), BoardState::Ready);
        assert_eq!(s.remaining_seconds(), 0);
    }
}
