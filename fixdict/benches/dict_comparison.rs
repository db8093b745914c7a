use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fixdict::{FixedDict, PutMode};
use rand::Rng;
use rustc_hash::FxBuildHasher;
use std::collections::HashMap;

const KEY_SIZE: usize = 8;
const VALUE_SIZE: usize = 16;

/// Generates fixed-width key/value pairs for benchmarking.
fn generate_data(size: usize) -> Vec<([u8; KEY_SIZE], [u8; VALUE_SIZE])> {
    let mut rng = rand::rng();
    (0..size)
        .map(|_| {
            let mut key = [0u8; KEY_SIZE];
            let mut value = [0u8; VALUE_SIZE];
            rng.fill(&mut key[..]);
            rng.fill(&mut value[..]);
            (key, value)
        })
        .collect()
}

fn benchmark_dict_comparisons(c: &mut Criterion) {
    for &size in &[10_000, 100_000] {
        let mut group = c.benchmark_group(format!("size={size}"));
        let data = generate_data(size);

        group.bench_function("FixedDict<Fnv> - insert", |b| {
            b.iter(|| {
                let mut dict = FixedDict::new(KEY_SIZE, VALUE_SIZE).unwrap();
                for (key, value) in &data {
                    dict.put(key, value, PutMode::Overwrite).unwrap();
                }
                black_box(dict.len())
            })
        });

        group.bench_function("FixedDict<Fx> - insert", |b| {
            b.iter(|| {
                let mut dict =
                    FixedDict::with_hasher(KEY_SIZE, VALUE_SIZE, FxBuildHasher).unwrap();
                for (key, value) in &data {
                    dict.put(key, value, PutMode::Overwrite).unwrap();
                }
                black_box(dict.len())
            })
        });

        group.bench_function("std HashMap - insert", |b| {
            b.iter(|| {
                let mut map = HashMap::new();
                for (key, value) in &data {
                    map.insert(*key, *value);
                }
                black_box(map.len())
            })
        });

        let mut dict = FixedDict::new(KEY_SIZE, VALUE_SIZE).unwrap();
        let mut map = HashMap::new();
        for (key, value) in &data {
            dict.put(key, value, PutMode::Overwrite).unwrap();
            map.insert(*key, *value);
        }

        group.bench_function("FixedDict<Fnv> - get", |b| {
            b.iter(|| {
                for (key, _) in &data {
                    black_box(dict.get(key));
                }
            })
        });

        group.bench_function("std HashMap - get", |b| {
            b.iter(|| {
                for (key, _) in &data {
                    black_box(map.get(key));
                }
            })
        });

        group.finish();
    }
}

criterion_group!(benches, benchmark_dict_comparisons);
criterion_main!(benches);
