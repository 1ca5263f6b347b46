//! Terminal rendering for the gem board.
//!
//! A small, game-oriented rendering layer: the view draws a
//! [`core::BoardSnapshot`] into a framebuffer which the renderer flushes to the
//! terminal, writing only what changed since the last frame.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Allow precise control over aspect ratio (2 columns per board cell)

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use gem_match_core as core;
pub use gem_match_types as types;

pub use fb::{CellStyle, FrameBuffer, Glyph, Rgb};
pub use game_view::{AnchorY, GameView, HudView, Viewport};
pub use renderer::{encode_changes, encode_frame, TerminalRenderer};
