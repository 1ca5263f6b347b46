//! Grid tests - matching rules, removal and gravity

use gem_match::core::{EventRecorder, Grid, SimpleRng};
use gem_match::types::{Color, GridEvent, GridEventKind, Position};

fn populated(seed: u32, columns: u8, rows: u8, palette: u8) -> Grid {
    let mut grid = Grid::new(columns, rows, palette, SimpleRng::new(seed));
    grid.populate();
    grid
}

fn copy_of(grid: &Grid) -> Grid {
    Grid::from_cells(
        grid.columns(),
        grid.rows(),
        grid.cells().to_vec(),
        SimpleRng::new(1),
    )
    .unwrap()
}

fn p(column: u8, row: u8) -> Position {
    Position::new(column, row)
}

#[test]
fn test_new_grid_is_all_holes() {
    let grid = Grid::new(4, 3, 5, SimpleRng::new(1));
    assert_eq!(grid.columns(), 4);
    assert_eq!(grid.rows(), 3);
    assert_eq!(grid.holes(), 12);
    assert_eq!(grid.color(0, 0), None);
    assert!(!grid.is_settled());
}

#[test]
fn test_populate_leaves_no_runs() {
    for seed in 1..40 {
        let grid = populated(seed, 8, 8, 5);
        assert_eq!(grid.holes(), 0, "seed {seed}");
        for row in 0..8 {
            for column in 0..8 {
                assert!(
                    !grid.is_part_of_sequence(column, row),
                    "seed {seed}: run at ({column}, {row})\n{grid}"
                );
            }
        }
    }
}

#[test]
fn test_populate_with_smallest_palette() {
    for seed in 1..20 {
        let grid = populated(seed, 8, 8, 3);
        assert!(grid.is_settled(), "seed {seed}\n{grid}");
        assert!(grid
            .cells()
            .iter()
            .all(|c| matches!(c, Some(Color::Red | Color::Green | Color::Blue))));
    }
}

#[test]
fn test_populate_is_deterministic_per_seed() {
    let a = populated(99, 8, 8, 5);
    let b = populated(99, 8, 8, 5);
    let c = populated(100, 8, 8, 5);
    assert_eq!(a.cells(), b.cells());
    assert_ne!(a.cells(), c.cells());
}

#[test]
fn test_populate_reports_every_cell() {
    let mut grid = Grid::new(8, 8, 5, SimpleRng::new(7));
    let rec = EventRecorder::new();
    grid.subscribe(rec.sink());
    grid.populate();

    let events = rec.drain();
    assert_eq!(events.len(), 64);
    assert!(events.iter().all(|e| e.kind() == GridEventKind::ColorAdded));
    assert_eq!(events[0], GridEvent::ColorAdded(p(0, 0)));
    assert_eq!(events[63], GridEvent::ColorAdded(p(7, 7)));
}

#[test]
fn test_out_of_range_reads_are_neutral() {
    let grid = Grid::from_rows(&["RRR", "GBG"]).unwrap();
    assert_eq!(grid.color(3, 0), None);
    assert_eq!(grid.color(0, 2), None);
    assert!(!grid.is_part_of_sequence(9, 9));
    assert!(!grid.is_marked(9, 9));
}

#[test]
fn test_swap_out_of_range_is_rejected() {
    let mut grid = Grid::from_rows(&["RBR", "GRG"]).unwrap();
    let before = grid.cells().to_vec();
    assert!(!grid.swap_colors(p(1, 0), p(3, 0)));
    assert!(!grid.swap_colors(p(0, 5), p(0, 0)));
    assert_eq!(grid.cells(), &before[..]);
}

#[test]
fn test_swap_that_forms_no_run_is_reverted() {
    let mut grid = Grid::from_rows(&["RGB", "GBR", "BRG"]).unwrap();
    let before = grid.cells().to_vec();
    assert!(!grid.swap_colors(p(0, 0), p(1, 0)));
    assert_eq!(grid.cells(), &before[..]);
}

#[test]
fn test_swap_forming_horizontal_run() {
    let mut grid = Grid::from_rows(&["RBR", "GRG"]).unwrap();
    let rec = EventRecorder::new();
    grid.subscribe_kind(GridEventKind::SequenceFound, rec.sink());

    assert!(grid.swap_colors(p(1, 0), p(1, 1)));
    assert_eq!(grid.to_string(), "R R R\nG B G");

    assert_eq!(grid.detect_color_sequences(), 3);
    assert_eq!(rec.len(), 3);
    assert!(grid.is_marked(0, 0) && grid.is_marked(1, 0) && grid.is_marked(2, 0));
    assert_eq!(grid.sequence_mask_string(), "1 1 1\n0 0 0");
}

#[test]
fn test_swap_forming_vertical_run_on_target() {
    let mut grid = Grid::from_rows(&["GR", "RG", "GB"]).unwrap();
    // Moving G from (0,0) to (1,0) builds nothing; moving R to (0,0)
    // gives column 0 = R R G, still no run.
    assert!(!grid.swap_colors(p(0, 0), p(1, 0)));

    let mut grid = Grid::from_rows(&["BG", "GR", "GB"]).unwrap();
    // Column 0 becomes G G G.
    assert!(grid.swap_colors(p(0, 0), p(1, 0)));
    assert_eq!(grid.color(0, 0), Some(Color::Green));
    assert!(grid.is_part_of_sequence(0, 1));
}

#[test]
fn test_swap_with_self_never_mutates() {
    let mut grid = Grid::from_rows(&["RRR", "GBG"]).unwrap();
    let before = grid.cells().to_vec();
    assert!(grid.swap_colors(p(1, 0), p(1, 0)));
    assert!(!grid.swap_colors(p(1, 1), p(1, 1)));
    assert_eq!(grid.cells(), &before[..]);
}

#[test]
fn test_swap_result_matches_local_run_test() {
    let source = populated(2024, 8, 8, 5);
    let neighbours = [(1i16, 0i16), (0, 1)];
    let mut legal = 0;

    for row in 0..8u8 {
        for column in 0..8u8 {
            for (dx, dy) in neighbours {
                let (tc, tr) = (column as i16 + dx, row as i16 + dy);
                if tc >= 8 || tr >= 8 {
                    continue;
                }
                let (a, b) = (p(column, row), p(tc as u8, tr as u8));
                let mut grid = copy_of(&source);
                let accepted = grid.swap_colors(a, b);
                if accepted {
                    legal += 1;
                    assert!(
                        grid.is_part_of_sequence(a.column, a.row)
                            || grid.is_part_of_sequence(b.column, b.row)
                    );
                } else {
                    assert_eq!(grid.cells(), source.cells());
                }
            }
        }
    }
    assert!(legal > 0, "a fresh 8x8 board should offer a move");
}

#[test]
fn test_holes_never_form_runs() {
    let mut grid = Grid::from_rows(&["...", "RGB"]).unwrap();
    assert_eq!(grid.detect_color_sequences(), 0);
    assert!(!grid.is_part_of_sequence(1, 0));
    assert!(!grid.contains_sequences());
}

#[test]
fn test_overlapping_runs_mark_each_cell_once() {
    let mut grid = Grid::from_rows(&["RRR", "RGB", "RBG"]).unwrap();
    let rec = EventRecorder::new();
    grid.subscribe(rec.sink());

    assert_eq!(grid.detect_color_sequences(), 5);
    assert_eq!(rec.count(GridEventKind::SequenceFound), 5);

    // A second pass resets the mask and reports the same cells again.
    assert_eq!(grid.detect_color_sequences(), 5);
    assert_eq!(rec.count(GridEventKind::SequenceFound), 10);
}

#[test]
fn test_long_run_is_fully_marked() {
    let mut grid = Grid::from_rows(&["GGGGG", "RBRBR"]).unwrap();
    assert_eq!(grid.detect_color_sequences(), 5);
    assert_eq!(grid.sequence_mask_string(), "1 1 1 1 1\n0 0 0 0 0");
}

#[test]
fn test_remove_turns_marked_cells_into_holes() {
    let mut grid = Grid::from_rows(&["RGB", "BRG", "YYY"]).unwrap();
    let rec = EventRecorder::new();
    grid.subscribe_kind(GridEventKind::ColorRemoved, rec.sink());

    let marked = grid.detect_color_sequences();
    assert_eq!(grid.remove_sequences(), marked);
    assert_eq!(grid.holes(), marked);
    assert!(!grid.contains_sequences());
    assert_eq!(rec.len(), 3);
    assert_eq!(grid.to_string(), "R G B\nB R G\n. . .");
}

#[test]
fn test_remove_without_detection_is_noop() {
    let mut grid = Grid::from_rows(&["RGB", "YYY"]).unwrap();
    assert_eq!(grid.remove_sequences(), 0);
    assert_eq!(grid.holes(), 0);
}

#[test]
fn test_drop_shifts_columns_and_refills_top_row() {
    let mut grid = Grid::from_rows(&["RGB", "BRG", "YYY"]).unwrap();
    grid.detect_color_sequences();
    grid.remove_sequences();

    let rec = EventRecorder::new();
    grid.subscribe(rec.sink());
    assert_eq!(grid.drop_colors(), 3);
    assert_eq!(grid.holes(), 0);

    assert_eq!(grid.color(0, 2), Some(Color::Blue));
    assert_eq!(grid.color(1, 2), Some(Color::Red));
    assert_eq!(grid.color(2, 2), Some(Color::Green));
    assert_eq!(grid.color(0, 1), Some(Color::Red));
    assert_eq!(grid.color(1, 1), Some(Color::Green));
    assert_eq!(grid.color(2, 1), Some(Color::Blue));

    assert_eq!(rec.count(GridEventKind::ColorDropped), 6);
    assert_eq!(rec.count(GridEventKind::ColorAdded), 3);
    // Drops are reported at the cell the gem left.
    let events = rec.drain();
    assert!(events.contains(&GridEvent::ColorDropped(p(0, 1))));
    assert!(events.contains(&GridEvent::ColorDropped(p(0, 0))));
    assert!(!events.contains(&GridEvent::ColorDropped(p(0, 2))));
}

#[test]
fn test_refill_draws_from_generator() {
    let a = populated(99, 6, 6, 5);
    let b = populated(99, 6, 6, 5);
    assert_eq!(a.rng_state(), b.rng_state());

    let mut grid = Grid::from_rows(&["RGB", "BRG", "YYY"]).unwrap();
    grid.detect_color_sequences();
    grid.remove_sequences();
    let before = grid.rng_state();
    grid.drop_colors();
    assert_ne!(grid.rng_state(), before);

    // No holes, no draws.
    let settled = grid.rng_state();
    grid.drop_colors();
    assert_eq!(grid.rng_state(), settled);
}

#[test]
fn test_drop_without_holes_is_noop() {
    let mut grid = Grid::from_rows(&["RGB", "BRG"]).unwrap();
    let rec = EventRecorder::new();
    grid.subscribe(rec.sink());
    assert_eq!(grid.drop_colors(), 0);
    assert!(rec.is_empty());
}

#[test]
fn test_vertical_hole_stack_settles_one_row_per_step() {
    let mut grid = Grid::from_rows(&["RGB", "GBR", "PGB", "PBR", "PGB"]).unwrap();
    assert_eq!(grid.detect_color_sequences(), 3);
    grid.remove_sequences();
    assert_eq!(grid.holes(), 3);

    let mut steps = 0;
    while grid.holes() > 0 {
        let before = grid.holes();
        let refilled = grid.drop_colors();
        assert_eq!(grid.holes(), before - refilled);
        assert_eq!(refilled, 1);
        steps += 1;
        assert!(steps <= grid.rows() as usize);
    }
    assert_eq!(steps, 3);
    assert_eq!(grid.color(0, 4), Some(Color::Green));
    assert_eq!(grid.color(0, 3), Some(Color::Red));
}

#[test]
fn test_cascade_resolution_converges() {
    let mut grid = populated(5, 8, 8, 3);
    // Knock out a whole row to force refills.
    let mut cells = grid.cells().to_vec();
    for cell in cells.iter_mut().skip(8 * 4).take(8) {
        *cell = None;
    }
    grid = Grid::from_cells(8, 8, cells, SimpleRng::new(5)).unwrap();

    for _ in 0..64 {
        while grid.holes() > 0 {
            let before = grid.holes();
            let refilled = grid.drop_colors();
            assert_eq!(grid.holes(), before - refilled);
        }
        if grid.detect_color_sequences() == 0 {
            break;
        }
        grid.remove_sequences();
    }
    assert!(grid.is_settled());
}

#[test]
fn test_display_and_from_rows_agree() {
    let grid = Grid::from_rows(&["rgbpy", "Y.PBR"]).unwrap();
    assert_eq!(grid.to_string(), "R G B P Y\nY . P B R");
    assert!(Grid::from_rows(&["RG", "R"]).is_none());
    assert!(Grid::from_rows(&["RX"]).is_none());
}
