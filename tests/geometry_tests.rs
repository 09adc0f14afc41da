//! Geometry tests
//!
//! Cell rectangles, hit testing and selection overlays over a scrolled
//! window.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{fixed_grid, RecordingPresenter, UniformSource};
use gridport::{GridCellRange, GridCellRef, GridViewport, Point, Rect, SelectionMode};

/// 20 rows of 20px, five 100px columns, 250x100 viewport.
fn grid(source: &UniformSource, p: &mut RecordingPresenter) -> GridViewport {
    fixed_grid(20.0, &[100.0; 5], (250.0, 100.0), source, p)
}

#[test]
fn cell_rect_follows_both_leading_offsets() {
    let source = UniformSource::new(20, 5);
    let mut p = RecordingPresenter::new();
    let mut g = grid(&source, &mut p);
    g.set_scroll(130.0, 30.0, &source, &mut p);

    let w = g.current_window();
    assert_eq!(w.cols, gridport::IndexSpan::new(1, 3));
    assert_eq!(w.rows, gridport::IndexSpan::new(1, 6));

    assert_eq!(g.cell_rect(GridCellRef::new(1, 1)), Some(Rect::new(-30.0, -10.0, 100.0, 20.0)));
    assert_eq!(g.cell_rect(GridCellRef::new(3, 2)), Some(Rect::new(70.0, 30.0, 100.0, 20.0)));
    assert_eq!(g.cell_rect(GridCellRef::new(0, 1)), None);
    assert_eq!(g.cell_rect(GridCellRef::new(1, 0)), None);
    assert_eq!(g.cell_rect(GridCellRef::new(1, 9)), None);
}

#[test]
fn hit_test_maps_points_to_cells() {
    let source = UniformSource::new(20, 5);
    let mut p = RecordingPresenter::new();
    let mut g = grid(&source, &mut p);
    g.set_scroll(130.0, 30.0, &source, &mut p);

    assert_eq!(g.hit_test(Point::new(75.0, 35.0)), Some(GridCellRef::new(3, 2)));
    assert_eq!(g.hit_test(Point::new(0.0, 0.0)), Some(GridCellRef::new(1, 1)));
    // Left/top edges are inclusive.
    assert_eq!(g.hit_test(Point::new(70.0, 10.0)), Some(GridCellRef::new(2, 2)));
    assert_eq!(g.hit_test(Point::new(-1.0, 10.0)), None);
    assert_eq!(g.hit_test(Point::new(250.0, 10.0)), None);
    assert_eq!(g.hit_test(Point::new(10.0, 100.0)), None);
}

#[test]
fn hit_test_agrees_with_cell_rect() {
    let source = UniformSource::new(20, 5);
    let mut p = RecordingPresenter::new();
    let mut g = grid(&source, &mut p);
    g.set_scroll(55.0, 47.0, &source, &mut p);

    let rows: Vec<usize> = g.displayed_rows().map(|(row, _)| row).collect();
    for row in rows {
        for col in g.displayed_columns() {
            let cell = GridCellRef::new(row, col);
            let rect = g.cell_rect(cell).unwrap();
            let center = Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
            if (0.0..250.0).contains(&center.x) && (0.0..100.0).contains(&center.y) {
                assert_eq!(g.hit_test(center), Some(cell));
            }
        }
    }
}

#[test]
fn whole_row_selection_spans_every_column() {
    let source = UniformSource::new(20, 5);
    let mut p = RecordingPresenter::new();
    let g = grid(&source, &mut p);

    let sel = g
        .selection_rect(&GridCellRange::rows(1, 3), SelectionMode::Rows)
        .unwrap();
    assert_eq!(sel.rect, Rect::new(0.0, 20.0, 250.0, 60.0));
    assert!(!sel.hide_left);
    assert!(!sel.hide_top);
    assert!(!sel.hide_bottom);
    // Columns 3 and 4 are past the right edge.
    assert!(sel.hide_right);
}

#[test]
fn block_selection_clips_to_viewport() {
    let source = UniformSource::new(20, 5);
    let mut p = RecordingPresenter::new();
    let mut g = grid(&source, &mut p);
    g.set_scroll(0.0, 30.0, &source, &mut p);

    let range = GridCellRange::new(GridCellRef::new(0, 0), GridCellRef::new(50, 1));
    let sel = g.selection_rect(&range, SelectionMode::Block).unwrap();
    assert_eq!(sel.rect, Rect::new(0.0, 0.0, 200.0, 100.0));
    assert!(sel.hide_top);
    assert!(sel.hide_bottom);
    assert!(!sel.hide_left);
    assert!(!sel.hide_right);
}

#[test]
fn whole_column_selection_spans_every_row() {
    let source = UniformSource::new(20, 5);
    let mut p = RecordingPresenter::new();
    let g = grid(&source, &mut p);

    let sel = g
        .selection_rect(&GridCellRange::columns(2, 2), SelectionMode::Columns)
        .unwrap();
    assert_eq!(sel.rect, Rect::new(200.0, 0.0, 50.0, 100.0));
    assert!(sel.hide_right);
    assert!(sel.hide_bottom);
    assert!(!sel.hide_top);
}

#[test]
fn offscreen_selection_has_no_rect() {
    let source = UniformSource::new(20, 5);
    let mut p = RecordingPresenter::new();
    let g = grid(&source, &mut p);

    let below = GridCellRange::new(GridCellRef::new(10, 0), GridCellRef::new(12, 1));
    assert_eq!(g.selection_rect(&below, SelectionMode::Block), None);
    let right = GridCellRange::new(GridCellRef::new(0, 3), GridCellRef::new(2, 4));
    assert_eq!(g.selection_rect(&right, SelectionMode::Block), None);
}

#[test]
fn geometry_reflects_explicit_row_heights() {
    let source = UniformSource::new(20, 5);
    let mut p = RecordingPresenter::new();
    let mut g = grid(&source, &mut p);
    g.set_row_height(1, Some(45.0)).unwrap();
    g.layout(&source, &mut p);

    assert_eq!(g.cell_rect(GridCellRef::new(1, 0)), Some(Rect::new(0.0, 20.0, 100.0, 45.0)));
    assert_eq!(g.cell_rect(GridCellRef::new(2, 0)).unwrap().y, 65.0);
    assert_eq!(g.hit_test(Point::new(5.0, 64.0)), Some(GridCellRef::new(1, 0)));
}

#[test]
fn selection_from_hit_test_follows_moved_columns() {
    let source = UniformSource::new(10, 3);
    let mut p = RecordingPresenter::new();
    let mut g = fixed_grid(20.0, &[50.0, 60.0, 70.0], (300.0, 100.0), &source, &mut p);
    g.move_column(2, 0).unwrap();
    g.layout(&source, &mut p);

    let hit = g.hit_test(Point::new(5.0, 25.0)).unwrap();
    assert_eq!(hit, GridCellRef::new(1, 2));
    let cell = g.cell_rect(hit).unwrap();
    assert_eq!(cell, Rect::new(0.0, 20.0, 70.0, 20.0));

    let sel = g.selection_rect(&GridCellRange::single(hit), SelectionMode::Block).unwrap();
    assert_eq!(sel.rect, cell);
    assert!(!sel.hide_left && !sel.hide_right);

    // Dragging onto the column now shown second spans display positions 0..=1.
    let range = GridCellRange::new(hit, GridCellRef::new(2, 0));
    let sel = g.selection_rect(&range, SelectionMode::Block).unwrap();
    assert_eq!(sel.rect, Rect::new(0.0, 20.0, 120.0, 40.0));
    assert!(g.is_selected(&range, GridCellRef::new(2, 0), SelectionMode::Block));
    assert!(!g.is_selected(&range, GridCellRef::new(2, 1), SelectionMode::Block));
    assert!(g.is_selected(&range, GridCellRef::new(7, 1), SelectionMode::Rows));
}
