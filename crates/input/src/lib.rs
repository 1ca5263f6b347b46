//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::PlayerAction`] and tracks
//! the selection cursor that turns two picks into an adjacent swap.

pub mod cursor;
pub mod map;

pub use gem_match_types as types;

pub use cursor::{CursorOutcome, SelectionCursor};
pub use map::{handle_key_event, should_quit};
