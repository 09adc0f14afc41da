//! Benchmarks for scrolling and layout performance.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gridport::layout::{ColumnDef, ColumnSet, RowSizing};
use gridport::{GridConfig, GridSource, GridViewport, RenderTree, Size};

/// Uniform data with a slightly varying natural height per row.
struct Uniform {
    rows: usize,
    cols: usize,
}

impl GridSource for Uniform {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.cols
    }

    fn measure_cell(&self, row: usize, col: usize, _available: Size) -> Size {
        Size::new(40.0 + (col % 7) as f32 * 10.0, 18.0 + (row % 5) as f32 * 2.0)
    }
}

fn grid(sizing: RowSizing, source: &Uniform, tree: &mut RenderTree) -> GridViewport {
    let config = GridConfig {
        row_sizing: sizing,
        frozen_column_count: 1,
        ..GridConfig::default()
    };
    let mut grid = GridViewport::new(config).expect("valid config");
    grid.resize(1280.0, 720.0).expect("valid size");
    grid.layout(source, tree);
    grid
}

/// Wheel-sized steps from top to bottom of 100k rows
fn bench_scroll_sweep(c: &mut Criterion) {
    let source = Uniform {
        rows: 100_000,
        cols: 20,
    };
    let mut group = c.benchmark_group("scroll_sweep");
    group.throughput(Throughput::Elements(1_000));

    for (name, sizing) in [("fixed", RowSizing::Fixed(22.0)), ("auto", RowSizing::Auto)] {
        group.bench_function(BenchmarkId::new("wheel_1000_steps", name), |b| {
            b.iter(|| {
                let mut tree = RenderTree::new();
                let mut grid = grid(sizing, &source, &mut tree);
                for _ in 0..1_000 {
                    grid.scroll_by(0.0, black_box(53.0), &source, &mut tree);
                }
                grid.current_window()
            });
        });
    }
    group.finish();
}

/// Jumps far enough that every step is a full rebuild
fn bench_scroll_jumps(c: &mut Criterion) {
    let source = Uniform {
        rows: 100_000,
        cols: 20,
    };
    c.bench_function("scroll_jump_rebuild", |b| {
        let mut tree = RenderTree::new();
        let mut grid = grid(RowSizing::Fixed(22.0), &source, &mut tree);
        let mut target = 0.0;
        b.iter(|| {
            target = (target + 50_000.0) % 2_000_000.0;
            grid.set_scroll(0.0, black_box(target), &source, &mut tree);
        });
    });
}

/// Star layout across many mixed columns
fn bench_star_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("star_layout");
    for count in [16usize, 256, 4096] {
        let defs: Vec<ColumnDef> = (0..count)
            .map(|i| match i % 3 {
                0 => ColumnDef::fixed(80.0),
                1 => ColumnDef::auto(),
                _ => ColumnDef::star((i % 4 + 1) as f32)
                    .with_bounds(30.0, 400.0)
                    .expect("valid bounds"),
            })
            .collect();
        let mut set = ColumnSet::from_defs(&defs).expect("valid columns");
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| set.layout(black_box(count as f32 * 60.0), |col, _| 50.0 + col.id() as f32 % 30.0));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scroll_sweep, bench_scroll_jumps, bench_star_layout);
criterion_main!(benches);
