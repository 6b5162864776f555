use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use avl_map::AvlMap;

const N: usize = 100_000;

fn filled(keys: &[i32]) -> AvlMap<i32, i32> {
    keys.iter().map(|&key| (key, key)).collect()
}

pub fn benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let keys: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    let mut removal_order = keys.clone();
    removal_order.shuffle(&mut rng);
    let sorted: Vec<i32> = (0..N as i32).collect();
    let map = filled(&keys);

    c.bench_function("map_insert", |b| {
        b.iter_batched(
            AvlMap::new,
            |mut map| {
                for &key in &keys {
                    map.insert(key, key);
                }
                map
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("map_insert_sorted", |b| {
        b.iter(|| filled(&sorted))
    });

    c.bench_function("map_get", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(map.get(key));
            }
        })
    });

    c.bench_function("map_iter", |b| {
        b.iter(|| {
            for entry in &map {
                black_box(entry);
            }
        })
    });

    c.bench_function("map_clone", |b| b.iter(|| black_box(map.clone())));

    // Every removal hits a present key, so each pass walks the full
    // rebalancing path back to the root.
    c.bench_function("map_remove", |b| {
        b.iter_batched(
            || map.clone(),
            |mut map| {
                for key in &removal_order {
                    map.remove(key);
                }
                map
            },
            BatchSize::LargeInput,
        )
    });

    // Steady-state churn: the map stays around N / 2 entries while the
    // insert and remove paths alternate.
    c.bench_function("map_insert_remove_interleaved", |b| {
        b.iter_batched(
            AvlMap::new,
            |mut map| {
                for (i, &key) in keys.iter().enumerate() {
                    map.insert(key, key);
                    if i % 2 == 1 {
                        map.remove(&keys[i / 2]);
                    }
                }
                map
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
