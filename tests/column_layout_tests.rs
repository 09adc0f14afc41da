//! Column sizing tests
//!
//! Fixed/auto/star resolution, bound clamping, hidden columns and auto
//! columns measured through the host source.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{fixed_config, RecordingPresenter, ScriptedSource, UniformSource};
use gridport::layout::{ColumnDef, ColumnSet, SizeSpec};
use gridport::{GridError, GridViewport};
use test_case::test_case;

fn widths(set: &ColumnSet) -> Vec<f32> {
    set.iter().map(|c| c.actual_width()).collect()
}

#[test_case(&[1.0, 3.0], 400.0, &[100.0, 300.0] ; "one to three")]
#[test_case(&[1.0, 1.0, 2.0], 400.0, &[100.0, 100.0, 200.0] ; "halves and quarters")]
#[test_case(&[2.5], 123.0, &[123.0] ; "single star takes everything")]
fn star_weights_split_exactly(weights: &[f32], available: f32, expected: &[f32]) {
    let defs: Vec<ColumnDef> = weights
        .iter()
        .map(|&w| ColumnDef::star(w).with_bounds(0.0, f32::INFINITY).unwrap())
        .collect();
    let mut set = ColumnSet::from_defs(&defs).unwrap();
    set.layout(available, |_, _| 0.0);
    assert_eq!(widths(&set), expected);
}

#[test]
fn fixed_auto_star_scenario() {
    let mut source = ScriptedSource::new(10, 3);
    source.widths.insert(1, 80.0);
    let defs = [ColumnDef::fixed(50.0), ColumnDef::auto(), ColumnDef::star(1.0)];
    let mut grid = GridViewport::with_columns(fixed_config(20.0), &defs).unwrap();
    grid.resize(300.0, 100.0).unwrap();
    grid.layout(&source, &mut RecordingPresenter::new());

    assert_eq!(widths(grid.columns()), vec![50.0, 80.0, 170.0]);
    assert_eq!(grid.columns().total_width(), 300.0);
}

#[test_case(300.0 ; "narrow")]
#[test_case(777.0 ; "odd width")]
#[test_case(1920.0 ; "wide")]
fn sum_of_widths_fits_viewport(available: f32) {
    let defs = [
        ColumnDef::fixed(60.0),
        ColumnDef::star(1.0),
        ColumnDef::star(2.0).with_bounds(20.0, 300.0).unwrap(),
        ColumnDef::star(3.0),
    ];
    let mut set = ColumnSet::from_defs(&defs).unwrap();
    set.layout(available, |_, _| 0.0);
    assert!(set.total_width() <= available + 0.01);
    for col in set.iter() {
        assert!(col.bounds().contains(col.actual_width()));
    }
}

#[test]
fn minimums_may_overflow_the_viewport() {
    let defs = [
        ColumnDef::fixed(100.0),
        ColumnDef::star(1.0).with_bounds(80.0, f32::INFINITY).unwrap(),
    ];
    let mut set = ColumnSet::from_defs(&defs).unwrap();
    set.layout(120.0, |_, _| 0.0);
    assert_eq!(widths(&set), vec![100.0, 80.0]);
    assert_eq!(set.total_width(), 180.0);
}

#[test]
fn zero_remaining_gives_zero_width_unbounded_stars() {
    let defs = [
        ColumnDef::fixed(300.0),
        ColumnDef::star(1.0).with_bounds(0.0, f32::INFINITY).unwrap(),
    ];
    let mut set = ColumnSet::from_defs(&defs).unwrap();
    set.layout(200.0, |_, _| 0.0);
    assert_eq!(set.get(1).unwrap().actual_width(), 0.0);
}

#[test]
fn hidden_column_is_skipped_everywhere() {
    let source = UniformSource::new(5, 3);
    let defs = [ColumnDef::fixed(50.0), ColumnDef::fixed(60.0), ColumnDef::star(1.0)];
    let mut grid = GridViewport::with_columns(fixed_config(20.0), &defs).unwrap();
    grid.resize(200.0, 100.0).unwrap();
    grid.set_column_visible(1, false).unwrap();
    grid.layout(&source, &mut RecordingPresenter::new());

    assert_eq!(grid.columns().get(2).unwrap().actual_width(), 150.0);
    assert_eq!(grid.displayed_columns(), vec![0, 2]);
    assert_eq!(grid.cell_rect(gridport::GridCellRef::new(0, 1)), None);
}

#[test]
fn auto_column_grows_with_realized_rows_and_header() {
    let mut source = ScriptedSource::new(100, 1);
    source.widths.insert(0, 70.0);
    let mut grid = GridViewport::with_columns(fixed_config(20.0), &[ColumnDef::auto()]).unwrap();
    grid.resize(400.0, 100.0).unwrap();
    let mut p = RecordingPresenter::new();
    grid.layout(&source, &mut p);
    assert_eq!(grid.columns().get(0).unwrap().actual_width(), 70.0);

    // Narrower content further down never shrinks the column.
    source.widths.insert(0, 30.0);
    grid.scroll_by(0.0, 500.0, &source, &mut p);
    assert_eq!(grid.columns().get(0).unwrap().actual_width(), 70.0);

    grid.invalidate_measurements();
    grid.layout(&source, &mut p);
    assert_eq!(grid.columns().get(0).unwrap().actual_width(), 30.0);
}

#[test]
fn header_width_counts_for_auto_columns() {
    let mut source = UniformSource::new(3, 1).with_cell(40.0, 20.0);
    source.header = Some(90.0);
    let mut grid = GridViewport::with_columns(fixed_config(20.0), &[ColumnDef::auto()]).unwrap();
    grid.resize(400.0, 100.0).unwrap();
    grid.layout(&source, &mut RecordingPresenter::new());
    assert_eq!(grid.columns().get(0).unwrap().actual_width(), 90.0);
}

#[test]
fn measurement_only_touches_realized_rows() {
    let source = ScriptedSource::new(10_000, 2);
    let mut grid = GridViewport::with_columns(
        fixed_config(20.0),
        &[ColumnDef::auto(), ColumnDef::fixed(100.0)],
    )
    .unwrap();
    grid.resize(300.0, 100.0).unwrap();
    grid.layout(&source, &mut RecordingPresenter::new());
    let measured = source.measured_rows.borrow().clone();
    assert_eq!(measured, vec![0, 1, 2, 3, 4]);
}

#[test]
fn star_degrades_to_auto_in_unbounded_width() {
    let mut source = ScriptedSource::new(4, 2);
    source.widths.insert(0, 66.0);
    source.widths.insert(1, 33.0);
    let mut grid = GridViewport::with_columns(
        fixed_config(20.0),
        &[ColumnDef::star(1.0), ColumnDef::star(5.0)],
    )
    .unwrap();
    grid.resize(f32::INFINITY, 100.0).unwrap();
    grid.layout(&source, &mut RecordingPresenter::new());
    assert_eq!(widths(grid.columns()), vec![66.0, 33.0]);
}

#[test]
fn invalid_definitions_are_reported() {
    assert!(matches!(
        ColumnDef::fixed(10.0).with_bounds(50.0, 10.0),
        Err(GridError::InvalidConstraint { .. })
    ));
    assert!(ColumnDef::fixed(10.0).with_bounds(f32::NAN, 10.0).is_err());
    assert!(ColumnDef::fixed(10.0).with_bounds(-1.0, 10.0).is_err());
    let mut grid = GridViewport::with_columns(fixed_config(20.0), &[ColumnDef::fixed(10.0)]).unwrap();
    assert!(grid.set_column_size(0, SizeSpec::Proportional(-2.0)).is_err());
    assert!(grid.set_column_size(5, SizeSpec::Auto).is_err());
    assert!(grid.set_column_bounds(0, 30.0, 20.0).is_err());
}

fn auto_grid(defs: &[ColumnDef], source: &ScriptedSource, p: &mut RecordingPresenter) -> GridViewport {
    let mut grid = GridViewport::with_columns(fixed_config(20.0), defs).unwrap();
    grid.resize(600.0, 100.0).unwrap();
    grid.layout(source, p);
    grid
}

#[test]
fn auto_column_inserted_after_layout_is_measured() {
    let mut source = ScriptedSource::new(50, 1);
    source.default.width = 90.0;
    let mut p = RecordingPresenter::new();
    let mut grid = auto_grid(&[ColumnDef::auto()], &source, &mut p);
    assert_eq!(grid.columns().get(0).unwrap().actual_width(), 90.0);

    grid.insert_column(1, ColumnDef::auto()).unwrap();
    source.cols = 2;
    grid.layout(&source, &mut p);
    assert_eq!(grid.columns().get(1).unwrap().actual_width(), 90.0);
    assert_eq!(grid.columns().total_width(), 180.0);
}

#[test]
fn auto_columns_added_by_the_source_are_measured() {
    let mut source = ScriptedSource::new(50, 1);
    source.widths.insert(1, 75.0);
    let config = gridport::GridConfig {
        default_column: ColumnDef::auto(),
        ..fixed_config(20.0)
    };
    let mut grid = GridViewport::new(config).unwrap();
    grid.resize(600.0, 100.0).unwrap();
    let mut p = RecordingPresenter::new();
    grid.layout(&source, &mut p);
    assert_eq!(grid.columns().get(0).unwrap().actual_width(), 50.0);

    source.cols = 2;
    grid.layout(&source, &mut p);
    assert_eq!(grid.columns().get(1).unwrap().actual_width(), 75.0);
}

#[test]
fn hidden_auto_column_is_measured_when_shown() {
    let mut source = ScriptedSource::new(50, 2);
    source.widths.insert(1, 120.0);
    let mut p = RecordingPresenter::new();
    let mut grid = auto_grid(&[ColumnDef::auto(), ColumnDef::auto().hidden()], &source, &mut p);
    assert_eq!(grid.displayed_columns(), vec![0]);

    grid.set_column_visible(1, true).unwrap();
    grid.layout(&source, &mut p);
    assert_eq!(grid.columns().get(1).unwrap().actual_width(), 120.0);
    assert_eq!(grid.displayed_columns(), vec![0, 1]);

    // Nothing is left to measure on the next pass.
    let before = source.measured_rows.borrow().len();
    grid.layout(&source, &mut p);
    assert_eq!(source.measured_rows.borrow().len(), before);
}
