//! Selection cursor turning cursor moves and picks into swap intents.
//!
//! The first select picks the cell under the cursor. A second select on an
//! orthogonal neighbour yields a [`Swap`]; a select anywhere else re-picks.

use crate::types::{PlayerAction, Position, Swap};

/// Outcome of feeding a [`PlayerAction`] to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorOutcome {
    /// Nothing for the host to do
    None,
    /// The cursor moved or the pick changed; redraw
    Moved,
    /// A complete adjacent swap to forward to the board
    Swap(Swap),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCursor {
    columns: u8,
    rows: u8,
    position: Position,
    picked: Option<Position>,
}

impl SelectionCursor {
    pub fn new(columns: u8, rows: u8) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            position: Position::new(0, 0),
            picked: None,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn picked(&self) -> Option<Position> {
        self.picked
    }

    /// Move by `(dx, dy)`, clamped to the board.
    pub fn move_by(&mut self, dx: i8, dy: i8) -> bool {
        let column = (self.position.column as i16 + dx as i16).clamp(0, self.columns as i16 - 1);
        let row = (self.position.row as i16 + dy as i16).clamp(0, self.rows as i16 - 1);
        let next = Position::new(column as u8, row as u8);
        let moved = next != self.position;
        self.position = next;
        moved
    }

    /// Jump to `position` if it lies on the board.
    pub fn move_to(&mut self, position: Position) -> bool {
        if position.column >= self.columns || position.row >= self.rows {
            return false;
        }
        self.position = position;
        true
    }

    /// Pick the current cell or complete a swap with the picked one.
    pub fn select(&mut self) -> Option<Swap> {
        match self.picked {
            Some(picked) if picked.is_adjacent(self.position) => {
                self.picked = None;
                Some(Swap::new(picked, self.position))
            }
            Some(picked) if picked == self.position => {
                self.picked = None;
                None
            }
            _ => {
                self.picked = Some(self.position);
                None
            }
        }
    }

    pub fn cancel(&mut self) -> bool {
        self.picked.take().is_some()
    }

    /// Forget the pick and return to the top-left cell.
    pub fn reset(&mut self) {
        self.position = Position::new(0, 0);
        self.picked = None;
    }

    /// Finish a drag: releasing on a neighbour of the picked cell swaps them.
    ///
    /// Releasing on the picked cell itself, on a distant cell or without a
    /// pick leaves the cursor untouched.
    pub fn release_at(&mut self, position: Position) -> Option<Swap> {
        let picked = self.picked?;
        if !picked.is_adjacent(position) || !self.move_to(position) {
            return None;
        }
        self.select()
    }

    /// Like [`SelectionCursor::apply`], but while the board is busy a select
    /// is dropped and the current pick is kept. Movement still works.
    pub fn apply_when(&mut self, action: PlayerAction, accepting_swaps: bool) -> CursorOutcome {
        if !accepting_swaps && action == PlayerAction::Select {
            return CursorOutcome::None;
        }
        self.apply(action)
    }

    /// Apply a cursor-level action. `StartRound` is left to the host.
    pub fn apply(&mut self, action: PlayerAction) -> CursorOutcome {
        if let Some((dx, dy)) = action.cursor_delta() {
            return if self.move_by(dx, dy) {
                CursorOutcome::Moved
            } else {
                CursorOutcome::None
            };
        }

        match action {
            PlayerAction::Select => match self.select() {
                Some(swap) => CursorOutcome::Swap(swap),
                None => CursorOutcome::Moved,
            },
            PlayerAction::Cancel => {
                if self.cancel() {
                    CursorOutcome::Moved
                } else {
                    CursorOutcome::None
                }
            }
            _ => CursorOutcome::None,
        }
    }
}
