//! Session tests - round lifecycle

use gem_match::core::{EngineConfig, ManualClock, RoundPhase, Session};
use gem_match::types::{BoardState, Position, Swap, TICK_MS};

fn session(seconds: u32) -> Session<ManualClock> {
    let mut config = EngineConfig::default().with_seed(2718);
    config.round_seconds = seconds;
    Session::with_clock(&config, ManualClock::new())
}

#[test]
fn test_round_lifecycle() {
    let mut s = session(3);
    assert_eq!(s.phase(), RoundPhase::Waiting);
    assert_eq!(s.remaining_seconds(), 3);

    // Time does not run before the round starts.
    for _ in 0..500 {
        s.update(TICK_MS);
    }
    assert_eq!(s.remaining_seconds(), 3);
    assert_eq!(s.state(), BoardState::Freeze);

    assert!(s.advance_round());
    assert_eq!(s.phase(), RoundPhase::Playing);
    assert!(s.snapshot().input_enabled);

    let mut ticks = 0;
    while s.phase() == RoundPhase::Playing {
        s.update(TICK_MS);
        ticks += 1;
    }
    // Three seconds counted down plus one more interval showing zero.
    assert_eq!(ticks * TICK_MS, 4000);
    assert_eq!(s.phase(), RoundPhase::Finished);
    assert_eq!(s.state(), BoardState::Freeze);
    assert_eq!(s.remaining_seconds(), 0);
    assert!(!s.snapshot().input_enabled);
}

#[test]
fn test_uneven_frame_times_accumulate() {
    let mut s = session(5);
    assert!(s.advance_round());

    s.update(1500);
    assert_eq!(s.remaining_seconds(), 4);
    s.update(700);
    assert_eq!(s.remaining_seconds(), 3);

    // 200ms carried over, so 2799 more leaves one second and 999ms pending.
    s.update(2799);
    assert_eq!(s.remaining_seconds(), 1);
    s.update(1);
    assert_eq!(s.remaining_seconds(), 0);
    assert_eq!(s.phase(), RoundPhase::Playing);

    s.update(999);
    assert_eq!(s.phase(), RoundPhase::Playing);
    s.update(1);
    assert_eq!(s.phase(), RoundPhase::Finished);
}

#[test]
fn test_finished_round_ignores_swaps_until_restart() {
    let mut s = session(0);
    s.start();
    s.update(1000);
    assert_eq!(s.phase(), RoundPhase::Finished);

    let swap = Swap::new(Position::new(0, 0), Position::new(0, 1));
    assert!(!s.request_swap(swap));

    let before = s.snapshot().cells;
    assert!(s.advance_round());
    assert_eq!(s.phase(), RoundPhase::Playing);
    assert_ne!(s.snapshot().cells, before, "restart deals a new board");
    assert!(s.request_swap(swap));
    assert!(!s.advance_round());
}

#[test]
fn test_round_ends_mid_turn() {
    let mut s = session(0);
    s.start();
    s.request_swap(Swap::new(Position::new(0, 0), Position::new(1, 0)));
    assert_eq!(s.update(1000), BoardState::Freeze);
    assert_eq!(s.phase(), RoundPhase::Finished);
    assert!(s.controller().selection().is_none());
}
