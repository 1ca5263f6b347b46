//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behavior beyond conversions, making them
//! usable in any context (grid simulation, terminal rendering, input mapping).
//!
//! # Board Dimensions
//!
//! The default board is 8 columns by 8 rows. Coordinates are `(column, row)`
//! with `(0, 0)` in the top-left corner; rows grow downwards, which is also the
//! direction of gravity.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep of the host poll loop (~60 FPS) |
//! | `REMOVE_SEQUENCE_DELAY_MS` | 250 | Pause between detecting and removing a run |
//! | `DROP_DELAY_MS` | 100 | Pause between two gravity steps |
//! | `ROUND_INTERVAL_MS` | 1000 | Countdown step of a round |
//!
//! # Examples
//!
//! ```
//! use gem_match_types::{Color, Position, Swap};
//!
//! let color = Color::from_str("purple").unwrap();
//! assert_eq!(color, Color::Purple);
//! assert_eq!(Color::from_index(2), Some(Color::Blue));
//!
//! let swap = Swap::new(Position::new(3, 4), Position::new(3, 5));
//! assert!(swap.is_adjacent());
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells
pub const DEFAULT_COLUMNS: u8 = 8;

/// Default board height in cells
pub const DEFAULT_ROWS: u8 = 8;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Delay between marking a run and removing it, so the view can highlight it.
pub const REMOVE_SEQUENCE_DELAY_MS: u32 = 250;

/// Delay between two single-row gravity steps.
pub const DROP_DELAY_MS: u32 = 100;

/// Length of a round in seconds.
pub const ROUND_SECONDS: u32 = 60;

/// Countdown step of the round timer.
pub const ROUND_INTERVAL_MS: u32 = 1000;

/// Minimum run length that counts as a sequence.
pub const MIN_SEQUENCE_LEN: usize = 3;


/// The gem palette
///
/// The order is significant: a palette of size `K` uses the first `K` colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Purple,
    Yellow,
}

impl Color {
    /// Number of colors in the full palette
    pub const COUNT: u8 = 5;

    /// Every color, in palette order
    pub const ALL: [Color; 5] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Purple,
        Color::Yellow,
    ];

    /// Palette index of the color
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Look up a color by palette index
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use gem_match_types::Color;
    ///
    /// assert_eq!(Color::from_str("RED"), Some(Color::Red));
    /// assert_eq!(Color::from_str("y"), Some(Color::Yellow));
    /// assert_eq!(Color::from_str("teal"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" | "r" => Some(Color::Red),
            "green" | "g" => Some(Color::Green),
            "blue" | "b" => Some(Color::Blue),
            "purple" | "p" => Some(Color::Purple),
            "yellow" | "y" => Some(Color::Yellow),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Yellow => "yellow",
        }
    }

    /// Single-letter tag used by board dumps
    pub fn letter(&self) -> char {
        match self {
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Blue => 'B',
            Color::Purple => 'P',
            Color::Yellow => 'Y',
        }
    }
}

/// A cell on the board
///
/// - `None`: a hole waiting to be filled by gravity
/// - `Some(Color)`: a gem of that color
pub type Cell = Option<Color>;

/// A grid coordinate, `column` grows rightwards and `row` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub column: u8,
    pub row: u8,
}

impl Position {
    pub const fn new(column: u8, row: u8) -> Self {
        Self { column, row }
    }

    /// True when `other` shares an edge with `self`.
    pub fn is_adjacent(&self, other: Position) -> bool {
        let dx = (self.column as i16 - other.column as i16).abs();
        let dy = (self.row as i16 - other.row as i16).abs();
        dx + dy == 1
    }
}

/// A swap intent between two cells, as forwarded by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Swap {
    pub source: Position,
    pub target: Position,
}

impl Swap {
    pub const fn new(source: Position, target: Position) -> Self {
        Self { source, target }
    }

    pub fn is_adjacent(&self) -> bool {
        self.source.is_adjacent(self.target)
    }
}

/// Phase of the resolution state machine
///
/// A turn walks `Ready → GemsSelected → GemsSwapped → SequenceDetected →
/// SequencesRemoved → GemsDropped`, looping back to `SequenceDetected` while
/// cascades keep producing runs, and finally returns to `Ready`.
/// `Freeze` is entered and left explicitly by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardState {
    #[default]
    Uninitialized,
    Freeze,
    Ready,
    GemsSelected,
    GemsSwapped,
    SequenceDetected,
    SequencesRemoved,
    GemsDropped,
}

impl BoardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardState::Uninitialized => "uninitialized",
            BoardState::Freeze => "freeze",
            BoardState::Ready => "ready",
            BoardState::GemsSelected => "gems_selected",
            BoardState::GemsSwapped => "gems_swapped",
            BoardState::SequenceDetected => "sequence_detected",
            BoardState::SequencesRemoved => "sequences_removed",
            BoardState::GemsDropped => "gems_dropped",
        }
    }

    /// True while a turn is being resolved (between an accepted request and `Ready`).
    pub fn is_resolving(&self) -> bool {
        !matches!(
            self,
            BoardState::Uninitialized | BoardState::Freeze | BoardState::Ready
        )
    }
}

/// Kind of a grid notification, used to subscribe to a single event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridEventKind {
    ColorAdded,
    ColorRemoved,
    ColorDropped,
    SequenceFound,
}

/// Notification raised by the grid at the point of mutation
///
/// - `ColorAdded`: a new gem appeared at the position (populate or top-row refill)
/// - `ColorRemoved`: the gem at the position was removed as part of a run
/// - `ColorDropped`: the gem at the position moved one row down
/// - `SequenceFound`: the gem at the position became part of a detected run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GridEvent {
    ColorAdded(Position),
    ColorRemoved(Position),
    ColorDropped(Position),
    SequenceFound(Position),
}

impl GridEvent {
    pub fn kind(&self) -> GridEventKind {
        match self {
            GridEvent::ColorAdded(_) => GridEventKind::ColorAdded,
            GridEvent::ColorRemoved(_) => GridEventKind::ColorRemoved,
            GridEvent::ColorDropped(_) => GridEventKind::ColorDropped,
            GridEvent::SequenceFound(_) => GridEventKind::SequenceFound,
        }
    }

    pub fn position(&self) -> Position {
        match *self {
            GridEvent::ColorAdded(p)
            | GridEvent::ColorRemoved(p)
            | GridEvent::ColorDropped(p)
            | GridEvent::SequenceFound(p) => p,
        }
    }
}

/// Player intents produced by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Move the cursor one cell left
    CursorLeft,
    /// Move the cursor one cell right
    CursorRight,
    /// Move the cursor one cell up
    CursorUp,
    /// Move the cursor one cell down
    CursorDown,
    /// Pick the cell under the cursor, or swap with the picked cell
    Select,
    /// Drop the picked cell
    Cancel,
    /// Start the first round or play again after a round ended
    StartRound,
}

impl PlayerAction {
    /// Cursor displacement `(dx, dy)` for movement actions
    pub fn cursor_delta(&self) -> Option<(i8, i8)> {
        match self {
            PlayerAction::CursorLeft => Some((-1, 0)),
            PlayerAction::CursorRight => Some((1, 0)),
            PlayerAction::CursorUp => Some((0, -1)),
            PlayerAction::CursorDown => Some((0, 1)),
            _ => None,
        }
    }
}
