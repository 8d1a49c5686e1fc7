//! Benchmarks for the Life3D engine.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use rand::SeedableRng;
use rand::rngs::StdRng;

use life3d::{Grid, RulePreset};

fn seeded_grid(dimension: u8, preset: RulePreset) -> Grid {
    let rule = preset.rule();
    let mut grid = Grid::new(dimension).expect("benchmark dimension is valid");
    let mut rng = StdRng::seed_from_u64(42);
    grid.init_full_random_with(rule.state_count, rule.start_dead_chance, &mut rng);
    grid
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for dimension in [16u8, 32, 64, 100] {
        let rule = RulePreset::Clouds.rule();
        let mut grid = seeded_grid(dimension, RulePreset::Clouds);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{0}x{0}x{0}", dimension)),
            &dimension,
            |b, _| {
                b.iter(|| {
                    grid.update(black_box(&rule));
                });
            },
        );
    }

    group.finish();
}

fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw");

    for preset in RulePreset::ALL {
        let rule = preset.rule();
        let grid = seeded_grid(64, preset);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", preset)),
            &preset,
            |b, _| {
                b.iter(|| black_box(grid.draw_rule(&rule)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_update, bench_draw);
criterion_main!(benches);
