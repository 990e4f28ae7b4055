// Neighborhood scan and cache materialization benchmarks.
//
// `scan_radius_8` is the per-move cost of deciding which of the 256 cells
// around the player hold caches. `materialize_*` measures the redraw path:
// first discovery (spawn + memento) versus restoring from mementos.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use geocache_core::GameState;
use geocache_core::config::GameConfig;
use geocache_core::persistence::MemoryStore;
use geocache_core::store::CacheStore;
use geocache_core::types::Cell;

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    group.throughput(Throughput::Elements(256));

    let store = CacheStore::new(0.1, 10);
    group.bench_function("scan_radius_8", |b| {
        let mut center = 0;
        b.iter(|| {
            center += 1;
            let hits = geocache_core::grid::neighborhood(Cell::new(center, -center), 8)
                .filter(|&cell| store.exists_at(cell))
                .count();
            black_box(hits)
        });
    });

    group.finish();
}

fn bench_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize");
    group.sample_size(50);

    let config = GameConfig {
        spawn_probability: 1.0,
        ..GameConfig::default()
    };

    group.bench_function("materialize_fresh", |b| {
        b.iter(|| {
            let mut game = GameState::load(config.clone(), MemoryStore::new()).unwrap();
            black_box(game.materialize_nearby().len())
        });
    });

    group.bench_function("materialize_restored", |b| {
        let mut game = GameState::load(config.clone(), MemoryStore::new()).unwrap();
        game.materialize_nearby();
        b.iter(|| black_box(game.materialize_nearby().len()));
    });

    group.finish();
}

criterion_group!(benches, bench_scan, bench_materialize);
criterion_main!(benches);
