//! Grid module - owns the board's colors and the matching rules
//!
//! The grid is a `columns x rows` board where each cell holds a gem color or is
//! a hole. Cells live in a flat row-major vector (`row * columns + column`).
//! Coordinates: (column, row) with (0, 0) in the top-left corner; gravity pulls
//! towards higher rows.
//!
//! Every mutation is reported through the grid's [`EventBus`]:
//! color added / removed / dropped, and sequence found.

use std::fmt;

use crate::events::{EventBus, SubscriptionId};
use crate::rng::SimpleRng;
use crate::types::{Cell, Color, GridEvent, GridEventKind, Position, MIN_SEQUENCE_LEN};

/// Smallest palette for which populate can always avoid a run.
pub const MIN_PALETTE: u8 = 3;

/// Local patterns checked by [`Grid::is_part_of_sequence`]: two offsets that
/// must both match the tested cell.
const SEQUENCE_PATTERNS: [[(i16, i16); 2]; 6] = [
    [(1, 0), (2, 0)],   // two to the right
    [(-1, 0), (-2, 0)], // two to the left
    [(-1, 0), (1, 0)],  // straddling horizontally
    [(0, 1), (0, 2)],   // two below
    [(0, -1), (0, -2)], // two above
    [(0, -1), (0, 1)],  // straddling vertically
];

/// The game board
#[derive(Debug)]
pub struct Grid {
    columns: u8,
    rows: u8,
    palette: u8,
    /// Flat array of cells, row-major order (row * columns + column)
    cells: Vec<Cell>,
    /// Cells that belong to a run found by the last detection pass
    sequence_mask: Vec<bool>,
    holes: usize,
    rng: SimpleRng,
    events: EventBus,
}

impl Grid {
    /// Create an empty grid (every cell is a hole) drawing colors from the
    /// first `palette` colors of the palette.
    ///
    /// Zero dimensions are raised to 1 and the palette is clamped to
    /// `MIN_PALETTE..=Color::COUNT`.
    pub fn new(columns: u8, rows: u8, palette: u8, rng: SimpleRng) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let len = columns as usize * rows as usize;
        Self {
            columns,
            rows,
            palette: palette.clamp(MIN_PALETTE, Color::COUNT),
            cells: vec![None; len],
            sequence_mask: vec![false; len],
            holes: len,
            rng,
            events: EventBus::new(),
        }
    }

    /// Build a grid from explicit cells (row-major). Returns `None` when the
    /// cell count does not match the dimensions.
    pub fn from_cells(columns: u8, rows: u8, cells: Vec<Cell>, rng: SimpleRng) -> Option<Self> {
        if columns == 0 || rows == 0 || cells.len() != columns as usize * rows as usize {
            return None;
        }
        let mut grid = Self::new(columns, rows, Color::COUNT, rng);
        grid.holes = cells.iter().filter(|c| c.is_none()).count();
        grid.cells = cells;
        Some(grid)
    }

    /// Build a grid from one string per row, one letter per cell
    /// (`R G B P Y`, case-insensitive, `.` for a hole). Whitespace is ignored.
    ///
    /// ```
    /// use gem_match_core::Grid;
    /// use gem_match_types::Color;
    ///
    /// let grid = Grid::from_rows(&["RGB", "B.R"]).unwrap();
    /// assert_eq!(grid.columns(), 3);
    /// assert_eq!(grid.color(2, 1), Some(Color::Red));
    /// assert_eq!(grid.holes(), 1);
    /// ```
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let mut cells = Vec::new();
        let mut columns = None;
        for line in rows {
            let mut width = 0usize;
            for ch in line.chars().filter(|c| !c.is_whitespace()) {
                let cell = match ch {
                    '.' => None,
                    _ => Some(Color::from_str(&ch.to_string())?),
                };
                cells.push(cell);
                width += 1;
            }
            match columns {
                None => columns = Some(width),
                Some(w) if w != width => return None,
                Some(_) => {}
            }
        }
        let columns = u8::try_from(columns?).ok()?;
        let rows = u8::try_from(rows.len()).ok()?;
        Self::from_cells(columns, rows, cells, SimpleRng::default())
    }

    /// Calculate flat index from (column, row) coordinates
    #[inline(always)]
    fn index(&self, column: u8, row: u8) -> Option<usize> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(row as usize * self.columns as usize + column as usize)
    }

    /// Cell at a signed offset from (column, row), `None` when off the board.
    #[inline(always)]
    fn cell_at_offset(&self, column: u8, row: u8, dx: i16, dy: i16) -> Cell {
        let x = column as i16 + dx;
        let y = row as i16 + dy;
        if x < 0 || y < 0 || x >= self.columns as i16 || y >= self.rows as i16 {
            return None;
        }
        self.cells[y as usize * self.columns as usize + x as usize]
    }

    fn position_of(&self, index: usize) -> Position {
        let columns = self.columns as usize;
        Position::new((index % columns) as u8, (index / columns) as u8)
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Number of colors cells are drawn from
    pub fn palette(&self) -> u8 {
        self.palette
    }

    /// Number of holes currently on the board
    pub fn holes(&self) -> usize {
        self.holes
    }

    /// Color at (column, row). Out of range reads as a hole.
    pub fn color(&self, column: u8, row: u8) -> Cell {
        self.index(column, row).and_then(|i| self.cells[i])
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        self.index(position.column, position.row).is_some()
    }

    /// Whether the last detection pass marked (column, row). Out of range is unmarked.
    pub fn is_marked(&self, column: u8, row: u8) -> bool {
        self.index(column, row).map_or(false, |i| self.sequence_mask[i])
    }

    /// Flat row-major view of the cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Flat row-major view of the sequence mask
    pub fn sequence_mask(&self) -> &[bool] {
        &self.sequence_mask
    }

    /// Current RNG state, enough to replay every future refill.
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Subscribe to every grid event.
    pub fn subscribe(&mut self, handler: impl FnMut(GridEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(handler)
    }

    /// Subscribe to one kind of grid event.
    pub fn subscribe_kind(
        &mut self,
        kind: GridEventKind,
        handler: impl FnMut(GridEvent) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe_kind(kind, handler)
    }

    /// Fill the board with random colors in a single left-to-right,
    /// top-to-bottom pass.
    ///
    /// Each color is re-rolled while it would complete a run with the two
    /// cells to its left or the two cells above it. Both pairs are checked on
    /// every roll, so a re-roll can never trade a horizontal run for a
    /// vertical one. Raises `ColorAdded` for every cell once the board is
    /// written.
    pub fn populate(&mut self) {
        for row in 0..self.rows {
            for column in 0..self.columns {
                let mut color = self.rng.next_color(self.palette);
                while self.completes_run_on_write(column, row, color) {
                    color = self.rng.next_color(self.palette);
                }
                let i = row as usize * self.columns as usize + column as usize;
                self.cells[i] = Some(color);
            }
        }

        self.sequence_mask.fill(false);
        self.holes = 0;

        for i in 0..self.cells.len() {
            let position = self.position_of(i);
            self.events.emit(GridEvent::ColorAdded(position));
        }
        log::trace!("populated grid:\n{}", self);
    }

    fn completes_run_on_write(&self, column: u8, row: u8, color: Color) -> bool {
        let c = Some(color);
        let left = column >= 2
            && self.cell_at_offset(column, row, -1, 0) == c
            && self.cell_at_offset(column, row, -2, 0) == c;
        let above = row >= 2
            && self.cell_at_offset(column, row, 0, -1) == c
            && self.cell_at_offset(column, row, 0, -2) == c;
        left || above
    }

    /// Attempt to swap the colors of two cells.
    ///
    /// Out-of-range coordinates are rejected without mutation. Otherwise the
    /// colors are exchanged and the swap is kept only if either touched cell
    /// is now part of a run; if not, it is reverted and `false` is returned.
    /// Adjacency is not checked here. Swapping a cell with itself keeps the
    /// board unchanged and returns whether that cell already sits in a run.
    pub fn swap_colors(&mut self, source: Position, target: Position) -> bool {
        let (Some(src), Some(dst)) = (
            self.index(source.column, source.row),
            self.index(target.column, target.row),
        ) else {
            return false;
        };

        self.cells.swap(src, dst);

        if self.is_part_of_sequence(source.column, source.row)
            || self.is_part_of_sequence(target.column, target.row)
        {
            return true;
        }

        self.cells.swap(src, dst);
        false
    }

    /// Local run test: true when the cell's color equals both cells of any of
    /// the six neighbor patterns (right pair, left pair, horizontal straddle,
    /// lower pair, upper pair, vertical straddle). Holes and out-of-range
    /// cells are never part of a run.
    pub fn is_part_of_sequence(&self, column: u8, row: u8) -> bool {
        let Some(color) = self.color(column, row) else {
            return false;
        };
        let c = Some(color);
        SEQUENCE_PATTERNS.iter().any(|[(ax, ay), (bx, by)]| {
            self.cell_at_offset(column, row, *ax, *ay) == c
                && self.cell_at_offset(column, row, *bx, *by) == c
        })
    }

    /// Scan the whole board for runs of at least three equal colors.
    ///
    /// The mask is reset first. From every cell the run is extended rightwards
    /// and downwards; each run long enough marks all of its cells. A cell that
    /// becomes marked raises `SequenceFound` once per pass, even when it
    /// belongs to overlapping runs. Returns the number of marked cells.
    pub fn detect_color_sequences(&mut self) -> usize {
        self.sequence_mask.fill(false);
        let columns = self.columns as usize;
        let rows = self.rows as usize;
        let mut marked = 0;

        for row in 0..rows {
            for column in 0..columns {
                let i = row * columns + column;
                let Some(color) = self.cells[i] else {
                    continue;
                };

                let mut run_x = 1;
                while column + run_x < columns && self.cells[i + run_x] == Some(color) {
                    run_x += 1;
                }
                if run_x >= MIN_SEQUENCE_LEN {
                    for k in 0..run_x {
                        marked += self.mark(i + k);
                    }
                }

                let mut run_y = 1;
                while row + run_y < rows && self.cells[i + run_y * columns] == Some(color) {
                    run_y += 1;
                }
                if run_y >= MIN_SEQUENCE_LEN {
                    for k in 0..run_y {
                        marked += self.mark(i + k * columns);
                    }
                }
            }
        }

        if marked > 0 {
            log::trace!("sequence mask:\n{}", self.sequence_mask_string());
        }
        marked
    }

    fn mark(&mut self, index: usize) -> usize {
        if self.sequence_mask[index] {
            return 0;
        }
        self.sequence_mask[index] = true;
        let position = self.position_of(index);
        self.events.emit(GridEvent::SequenceFound(position));
        1
    }

    /// True when the last detection pass marked any cell.
    pub fn contains_sequences(&self) -> bool {
        self.sequence_mask.iter().any(|m| *m)
    }

    /// Turn every marked cell into a hole, then clear the mask.
    ///
    /// Without a prior detection pass the mask is clear and nothing happens.
    /// Returns the number of holes created.
    pub fn remove_sequences(&mut self) -> usize {
        let mut removed = 0;
        for i in 0..self.cells.len() {
            if !self.sequence_mask[i] || self.cells[i].is_none() {
                continue;
            }
            self.cells[i] = None;
            self.holes += 1;
            removed += 1;
            let position = self.position_of(i);
            self.events.emit(GridEvent::ColorRemoved(position));
        }
        self.sequence_mask.fill(false);
        self.debug_check_holes();
        removed
    }

    /// A single gravity step.
    ///
    /// Scans bottom-to-top, right-to-left. Every hole pulls down the cell
    /// directly above it (raising `ColorDropped` at the origin when a color
    /// moved); a hole in the top row is refilled with a random color instead
    /// (raising `ColorAdded`). Each call closes at most one hole per column,
    /// so repeated calls are needed to settle the board.
    /// Returns the number of refilled top-row cells.
    pub fn drop_colors(&mut self) -> usize {
        if self.holes == 0 {
            return 0;
        }
        let columns = self.columns as usize;
        let mut refilled = 0;

        for row in (0..self.rows as usize).rev() {
            for column in (0..columns).rev() {
                let i = row * columns + column;
                if self.cells[i].is_some() {
                    continue;
                }

                if row > 0 {
                    let above = i - columns;
                    self.cells[i] = self.cells[above].take();
                    if self.cells[i].is_some() {
                        let origin = Position::new(column as u8, (row - 1) as u8);
                        self.events.emit(GridEvent::ColorDropped(origin));
                    }
                } else {
                    self.cells[i] = Some(self.rng.next_color(self.palette));
                    self.holes -= 1;
                    refilled += 1;
                    let position = Position::new(column as u8, 0);
                    self.events.emit(GridEvent::ColorAdded(position));
                }
            }
        }

        self.debug_check_holes();
        refilled
    }

    /// No holes and no run anywhere on the board.
    pub fn is_settled(&self) -> bool {
        if self.holes > 0 {
            return false;
        }
        (0..self.rows).all(|row| (0..self.columns).all(|col| !self.is_part_of_sequence(col, row)))
    }

    /// Copy the cells into a reusable buffer.
    pub fn write_cells(&self, out: &mut Vec<Cell>) {
        out.clear();
        out.extend_from_slice(&self.cells);
    }

    /// Mask dump: one line per row, `1` for marked cells.
    pub fn sequence_mask_string(&self) -> String {
        let mut out = String::with_capacity(self.sequence_mask.len() * 2);
        for (i, marked) in self.sequence_mask.iter().enumerate() {
            if i > 0 && i % self.columns as usize == 0 {
                out.push('\n');
            } else if i > 0 {
                out.push(' ');
            }
            out.push(if *marked { '1' } else { '0' });
        }
        out
    }

    #[inline]
    fn debug_check_holes(&self) {
        debug_assert_eq!(
            self.holes,
            self.cells.iter().filter(|c| c.is_none()).count(),
            "hole count out of sync with cells"
        );
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            for column in 0..self.columns {
                if column > 0 {
                    write!(f, " ")?;
                }
                let ch = self.color(column, row).map_or('.', |c| c.letter());
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventRecorder;

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(8, 6, 5, SimpleRng::new(1));
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(7, 0), Some(7));
        assert_eq!(grid.index(0, 1), Some(8));
        assert_eq!(grid.index(7, 5), Some(47));
        assert_eq!(grid.index(8, 0), None);
        assert_eq!(grid.index(0, 6), None);
    }

    #[test]
    fn test_new_grid_is_all_holes() {
        let grid = Grid::new(4, 3, 5, SimpleRng::new(1));
        assert_eq!(grid.holes(), 12);
        assert!(grid.cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_palette_is_clamped() {
        assert_eq!(Grid::new(3, 3, 1, SimpleRng::new(1)).palette(), MIN_PALETTE);
        assert_eq!(Grid::new(3, 3, 200, SimpleRng::new(1)).palette(), Color::COUNT);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        assert!(Grid::from_rows(&["RGB", "RG"]).is_none());
        assert!(Grid::from_rows(&["RXB"]).is_none());
        assert!(Grid::from_rows(&[]).is_none());
    }

    #[test]
    fn test_display_dump() {
        let grid = Grid::from_rows(&["RGB", "P.Y"]).unwrap();
        assert_eq!(grid.to_string(), "R G B\nP . Y");
    }

    #[test]
    fn test_is_part_of_sequence_patterns() {
        let grid = Grid::from_rows(&[
            "RRRGB", //
            "GBGRB", //
            "BGBRG", //
            "GBGRY", //
        ])
        .unwrap();
        // horizontal: right pair, straddle, left pair
        assert!(grid.is_part_of_sequence(0, 0));
        assert!(grid.is_part_of_sequence(1, 0));
        assert!(grid.is_part_of_sequence(2, 0));
        // vertical: lower pair, straddle, upper pair
        assert!(grid.is_part_of_sequence(3, 1));
        assert!(grid.is_part_of_sequence(3, 2));
        assert!(grid.is_part_of_sequence(3, 3));
        assert!(!grid.is_part_of_sequence(4, 0));
        assert!(!grid.is_part_of_sequence(9, 9));
    }

    #[test]
    fn test_mask_string() {
        let mut grid = Grid::from_rows(&["RRR", "GBG"]).unwrap();
        grid.detect_color_sequences();
        assert_eq!(grid.sequence_mask_string(), "1 1 1\n0 0 0");
    }

    #[test]
    fn test_detection_notifies_each_cell_once_for_overlapping_runs() {
        // Row of four and a column of three crossing at (1, 0).
        let mut grid = Grid::from_rows(&["RRRR", "GRBG", "BRGB"]).unwrap();
        let rec = EventRecorder::new();
        grid.subscribe(rec.sink());

        assert_eq!(grid.detect_color_sequences(), 6);
        assert_eq!(rec.count(GridEventKind::SequenceFound), 6);
    }

    #[test]
    fn test_detection_ignores_holes() {
        let mut grid = Grid::from_rows(&["...", "RGB"]).unwrap();
        assert_eq!(grid.detect_color_sequences(), 0);
        assert!(!grid.contains_sequences());
    }

    #[test]
    fn test_drop_moves_column_and_refills_top() {
        let mut grid = Grid::from_rows(&["R", "G", "."]).unwrap();
        let rec = EventRecorder::new();
        grid.subscribe(rec.sink());

        assert_eq!(grid.drop_colors(), 1);
        assert_eq!(grid.holes(), 0);
        assert_eq!(grid.color(0, 1), Some(Color::Red));
        assert_eq!(grid.color(0, 2), Some(Color::Green));
        assert!(grid.color(0, 0).is_some());
        assert_eq!(
            rec.drain(),
            vec![
                GridEvent::ColorDropped(Position::new(0, 1)),
                GridEvent::ColorDropped(Position::new(0, 0)),
                GridEvent::ColorAdded(Position::new(0, 0)),
            ]
        );
    }

    #[test]
    fn test_drop_without_holes_is_noop() {
        let mut grid = Grid::from_rows(&["RG", "GR"]).unwrap();
        let rec = EventRecorder::new();
        grid.subscribe(rec.sink());
        assert_eq!(grid.drop_colors(), 0);
        assert!(rec.is_empty());
    }
}
