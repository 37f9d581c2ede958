//! Criterion benchmarks for field actions and the daily tick.
//!
//! Benchmarks:
//!   - sweep order for a single-row and a full tool reach rectangle
//!   - plowing a full reach rectangle on the default layout
//!   - advancing a day with every default field planted
//!
//! Run with: cargo bench --bench field_actions

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use furrow_sim::{sweep, Direction, FarmWorld, Rect, Tool, ToolKind};

// ---------------------------------------------------------------------------
// Benchmark: sweep
// ---------------------------------------------------------------------------

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");

    let reach = Tool::preset(ToolKind::WateringCan).reach_rect();
    group.bench_function("reach_7x7", |b| {
        b.iter(|| black_box(sweep(black_box(reach), false)));
    });

    let row = Rect::new(-3, -1, 7, 1);
    group.bench_function("front_row", |b| {
        b.iter(|| black_box(sweep(black_box(row), false)));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: plow
// ---------------------------------------------------------------------------

fn bench_plow(c: &mut Criterion) {
    let mut group = c.benchmark_group("plow");

    let reach = Tool::preset(ToolKind::Plow).reach_rect();
    group.bench_function("full_reach", |b| {
        b.iter_batched(
            || {
                let mut farm = FarmWorld::new();
                farm.spawn_actor("farmer", 0, 0, Tool::preset(ToolKind::Plow));
                farm
            },
            |mut farm| black_box(farm.plow("farmer", reach, Direction::East)),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: advance_day
// ---------------------------------------------------------------------------

fn planted_farm() -> FarmWorld {
    let mut farm = FarmWorld::new();
    let field_ids: Vec<String> = farm.snapshot().fields.into_iter().map(|f| f.id).collect();
    for id in &field_ids {
        let _ = farm.plant(id, "tomato");
        let _ = farm.add_water(id, 2);
        let _ = farm.add_sun(id, 3);
    }
    farm
}

fn bench_advance_day(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance_day");
    group.sample_size(20);

    group.bench_function("225_crops", |b| {
        b.iter_batched(
            planted_farm,
            |mut farm| black_box(farm.advance_day()),
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Register groups
// ---------------------------------------------------------------------------

criterion_group!(benches, bench_sweep, bench_plow, bench_advance_day);
criterion_main!(benches);
