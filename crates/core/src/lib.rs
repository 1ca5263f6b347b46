//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the grid simulation and the turn state machine.
//! It has **no dependencies** on rendering, terminals, or input devices, making it:
//!
//! - **Deterministic**: a fixed seed reproduces every populate and refill
//! - **Testable**: delays run on an injectable clock
//! - **Portable**: the presentation layer only observes grid events and snapshots
//!
//! # Module Structure
//!
//! - [`grid`]: board storage, swap legality, run detection, removal and gravity
//! - [`controller`]: the state machine that sequences grid operations per tick
//! - [`events`]: observer list for grid notifications
//! - [`timer`]: clock abstraction and the phase delay timer
//! - [`round`]: countdown for timed rounds
//! - [`session`]: round lifecycle (waiting, playing, finished)
//! - [`config`]: engine settings from defaults, environment, or JSON
//! - [`rng`]: seeded color generation
//! - [`snapshot`]: read-only board copy for views
//!
//! # Game Rules
//!
//! - A swap is legal iff it leaves at least one of the two touched cells in a
//!   horizontal or vertical run of three or more equal colors
//! - Every run is removed after a short highlight delay
//! - Holes bubble up one row per gravity step; the top row refills with
//!   random colors
//! - Cascading runs created by gravity are resolved before input is accepted
//!   again
//!
//! # Example
//!
//! ```
//! use gem_match_core::{Controller, EngineConfig, EventRecorder, ManualClock};
//! use gem_match_types::{BoardState, Position, Swap};
//!
//! let config = EngineConfig::default().with_seed(12345);
//! let clock = ManualClock::new();
//! let mut controller = Controller::with_clock(&config, clock.clone());
//!
//! let events = EventRecorder::new();
//! controller.subscribe(events.sink());
//! controller.initialize();
//! assert_eq!(controller.state(), BoardState::Ready);
//! assert_eq!(events.len(), 64);
//!
//! // The request is consumed on the next tick; an illegal swap just returns to Ready.
//! controller.request_swap(Swap::new(Position::new(0, 0), Position::new(1, 0)));
//! controller.update();
//! ```
//!
//! # Timing
//!
//! Call [`Controller::update`] (or [`Session::update`]) once per host tick.
//! Removal waits `remove_delay_ms` (250ms by default), every gravity step
//! waits `drop_delay_ms` (100ms by default).

pub mod config;
pub mod controller;
pub mod events;
pub mod grid;
pub mod rng;
pub mod round;
pub mod session;
pub mod snapshot;
pub mod timer;

pub use gem_match_types as types;

// Re-export commonly used types for convenience
pub use config::{ConfigError, EngineConfig};
pub use controller::Controller;
pub use events::{EventBus, EventRecorder, SubscriptionId};
pub use grid::Grid;
pub use rng::SimpleRng;
pub use round::RoundTimer;
pub use session::{RoundPhase, Session};
pub use snapshot::BoardSnapshot;
pub use timer::{Clock, ManualClock, PhaseTimer, SystemClock};
