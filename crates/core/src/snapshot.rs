use serde::{Deserialize, Serialize};

use crate::types::{BoardState, Cell, Position};

/// Read-only copy of the board for views and tests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub columns: u8,
    pub rows: u8,
    /// Row-major cells
    pub cells: Vec<Cell>,
    /// Cells marked by the last detection pass (about to be removed)
    pub marked: Vec<bool>,
    pub holes: usize,
    pub state: BoardState,
    pub input_enabled: bool,
    pub cascade: u32,
}

impl BoardSnapshot {
    pub fn cell(&self, column: u8, row: u8) -> Cell {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells[row as usize * self.columns as usize + column as usize]
    }

    pub fn is_marked(&self, column: u8, row: u8) -> bool {
        if column >= self.columns || row >= self.rows {
            return false;
        }
        self.marked[row as usize * self.columns as usize + column as usize]
    }

    pub fn contains(&self, position: Position) -> bool {
        position.column < self.columns && position.row < self.rows
    }

    pub fn clear(&mut self) {
        self.columns = 0;
        self.rows = 0;
        self.cells.clear();
        self.marked.clear();
        self.holes = 0;
        self.state = BoardState::Uninitialized;
        self.input_enabled = false;
        self.cascade = 0;
    }
}
