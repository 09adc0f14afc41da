//! Viewport and scroll tests
//!
//! Scroll position, window anchoring, clamping and edge snapping.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{fixed_grid, RecordingPresenter, ScriptedSource, UniformSource};
use gridport::layout::RowSizing;
use gridport::{GridConfig, GridViewport, IndexSpan};
use test_case::test_case;

#[test]
fn scroll_past_max_clamps_and_snaps_to_bottom() {
    let source = UniformSource::new(5, 1);
    let mut p = RecordingPresenter::new();
    let mut grid = fixed_grid(30.0, &[100.0], (100.0, 100.0), &source, &mut p);

    grid.set_scroll(0.0, 60.0, &source, &mut p);
    let w = grid.current_window();
    assert_eq!(grid.scroll_offset().vertical, 50.0);
    assert_eq!(w.first_row(), Some(1));
    assert_eq!(w.last_row(), Some(4));
    assert_eq!(w.leading_row_offset, 20.0);
}

#[test]
fn unclamped_target_lands_on_row_boundary() {
    let source = UniformSource::new(10, 1);
    let mut p = RecordingPresenter::new();
    let mut grid = fixed_grid(30.0, &[100.0], (100.0, 100.0), &source, &mut p);

    grid.set_scroll(0.0, 60.0, &source, &mut p);
    let w = grid.current_window();
    assert_eq!(w.first_row(), Some(2));
    assert_eq!(w.leading_row_offset, 0.0);
    assert_eq!(w.last_row(), Some(5));
}

#[test_case(20.0 ; "short rows")]
#[test_case(30.0 ; "medium rows")]
#[test_case(57.0 ; "tall rows")]
fn scrolling_one_row_height_advances_one_row(height: f32) {
    let source = UniformSource::new(1_000, 1);
    let mut p = RecordingPresenter::new();
    let mut grid = fixed_grid(height, &[100.0], (100.0, 300.0), &source, &mut p);

    for expected in 1..20 {
        grid.scroll_by(0.0, height, &source, &mut p);
        let w = grid.current_window();
        assert_eq!(w.first_row(), Some(expected));
        assert_eq!(w.leading_row_offset, 0.0);
    }
}

#[test]
fn offset_never_leaves_bounds() {
    let source = UniformSource::new(50, 1);
    let mut p = RecordingPresenter::new();
    let mut grid = fixed_grid(25.0, &[100.0], (100.0, 200.0), &source, &mut p);
    let max = 50.0 * 25.0 - 200.0;

    for delta in [-40.0, 333.0, 1e6, -17.5, -1e6, 999.0, 12.25] {
        grid.scroll_by(0.0, delta, &source, &mut p);
        let v = grid.scroll_offset().vertical;
        assert!((0.0..=max).contains(&v), "offset {v} out of bounds");
        let w = grid.current_window();
        let first = w.first_row().unwrap();
        assert!(w.leading_row_offset < grid.rows().height(first));
    }
}

#[test]
fn snap_to_bottom_pins_last_row_even_with_estimates() {
    // Auto rows estimated at 20 but measuring 35: the bottom anchor must
    // still show the final row flush with the viewport bottom.
    let mut source = ScriptedSource::new(200, 2);
    source.default.height = 35.0;
    let config = GridConfig {
        row_sizing: RowSizing::Auto,
        estimated_row_height: 20.0,
        ..GridConfig::default()
    };
    let mut grid = GridViewport::new(config).unwrap();
    grid.resize(200.0, 100.0).unwrap();
    let mut p = RecordingPresenter::new();
    grid.layout(&source, &mut p);

    grid.scroll_by(0.0, 1e9, &source, &mut p);
    let w = grid.current_window();
    assert_eq!(w.last_row(), Some(199));
    let bottom = grid
        .cell_rect(gridport::GridCellRef::new(199, 0))
        .unwrap()
        .bottom();
    assert!((bottom - 100.0).abs() < 0.01);
}

#[test]
fn scroll_back_to_top_resets_anchor() {
    let source = UniformSource::new(100, 1);
    let mut p = RecordingPresenter::new();
    let mut grid = fixed_grid(20.0, &[100.0], (100.0, 100.0), &source, &mut p);

    grid.scroll_by(0.0, 517.0, &source, &mut p);
    grid.scroll_by(0.0, -516.5, &source, &mut p);
    assert_eq!(grid.current_window().first_row(), Some(0));
    grid.scroll_by(0.0, -10.0, &source, &mut p);
    let w = grid.current_window();
    assert_eq!(w.rows, IndexSpan::new(0, 4));
    assert_eq!(w.leading_row_offset, 0.0);
    assert_eq!(grid.scroll_offset().vertical, 0.0);
}

#[test]
fn content_shorter_than_viewport_does_not_scroll() {
    let source = UniformSource::new(3, 1);
    let mut p = RecordingPresenter::new();
    let mut grid = fixed_grid(20.0, &[100.0], (100.0, 100.0), &source, &mut p);

    grid.scroll_by(0.0, 40.0, &source, &mut p);
    let w = grid.current_window();
    assert_eq!(w.rows, IndexSpan::new(0, 2));
    assert_eq!(grid.scroll_offset().vertical, 0.0);
}

#[test]
fn growing_viewport_at_bottom_fills_upward() {
    let source = UniformSource::new(20, 1);
    let mut p = RecordingPresenter::new();
    let mut grid = fixed_grid(20.0, &[100.0], (100.0, 100.0), &source, &mut p);

    grid.scroll_by(0.0, 1e6, &source, &mut p);
    assert_eq!(grid.current_window().rows, IndexSpan::new(15, 19));

    grid.resize(100.0, 150.0).unwrap();
    grid.layout(&source, &mut p);
    let w = grid.current_window();
    assert_eq!(w.rows, IndexSpan::new(12, 19));
    assert_eq!(w.leading_row_offset, 10.0);
    assert_eq!(grid.scroll_offset().vertical, 250.0);
}

#[test_case(0.0, 100.0 ; "zero height")]
#[test_case(100.0, 0.0 ; "zero width")]
fn degenerate_viewport_gives_empty_window(height: f32, width: f32) {
    let source = UniformSource::new(10, 3);
    let mut p = RecordingPresenter::new();
    let mut grid = fixed_grid(20.0, &[50.0, 50.0, 50.0], (width, height), &source, &mut p);
    grid.scroll_by(10.0, 10.0, &source, &mut p);
    let w = grid.current_window();
    if height <= 0.0 {
        assert_eq!(w.rows, None);
    }
    if width <= 0.0 {
        assert_eq!(w.cols, None);
    }
}

#[test]
fn infinite_viewport_realizes_everything() {
    let source = UniformSource::new(12, 4);
    let mut p = RecordingPresenter::new();
    let mut grid = fixed_grid(
        20.0,
        &[50.0; 4],
        (f32::INFINITY, f32::INFINITY),
        &source,
        &mut p,
    );
    grid.scroll_by(30.0, 30.0, &source, &mut p);
    let w = grid.current_window();
    assert_eq!(w.rows, IndexSpan::new(0, 11));
    assert_eq!(w.cols, IndexSpan::new(0, 3));
    assert_eq!(grid.scroll_offset().vertical, 0.0);
}

#[test]
fn horizontal_scroll_walks_columns() {
    let source = UniformSource::new(10, 6);
    let mut p = RecordingPresenter::new();
    let mut grid = fixed_grid(20.0, &[100.0; 6], (250.0, 100.0), &source, &mut p);

    grid.scroll_by(130.0, 0.0, &source, &mut p);
    let w = grid.current_window();
    assert_eq!(w.first_col(), Some(1));
    assert_eq!(w.leading_col_offset, 30.0);
    assert_eq!(w.last_col(), Some(3));
    assert_eq!(grid.scroll_offset().horizontal, 130.0);

    grid.scroll_by(1e6, 0.0, &source, &mut p);
    let w = grid.current_window();
    assert_eq!(grid.scroll_offset().horizontal, 350.0);
    assert_eq!(w.cols, IndexSpan::new(3, 5));
    assert_eq!(w.leading_col_offset, 50.0);

    grid.scroll_by(-1e6, 0.0, &source, &mut p);
    assert_eq!(grid.current_window().first_col(), Some(0));
    assert_eq!(grid.scroll_offset().horizontal, 0.0);
}

#[test]
fn column_into_view_scrolls_minimum_distance() {
    let source = UniformSource::new(10, 8);
    let mut p = RecordingPresenter::new();
    let mut grid = fixed_grid(20.0, &[100.0; 8], (250.0, 100.0), &source, &mut p);

    grid.scroll_column_into_view(4, &source, &mut p).unwrap();
    let w = grid.current_window();
    assert_eq!(w.last_col(), Some(4));
    assert_eq!(grid.scroll_offset().horizontal, 250.0);

    grid.scroll_column_into_view(1, &source, &mut p).unwrap();
    let w = grid.current_window();
    assert_eq!(w.first_col(), Some(1));
    assert_eq!(w.leading_col_offset, 0.0);
    assert!(grid.scroll_column_into_view(99, &source, &mut p).is_err());
}
