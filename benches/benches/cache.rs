// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `touchstory_cache`.

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use touchstory_cache::{ScopedCache, VirtualRoot};

const NAMES: [&str; 4] = ["click", "touchstart", "touchend", ".item_click"];

fn filled(handles: u32) -> ScopedCache<u32, u32> {
    let mut cache = ScopedCache::new();
    cache.reserve(VirtualRoot::Document, u32::MAX);
    for h in 0..handles {
        for (i, name) in NAMES.iter().enumerate() {
            cache.set(h, name, i as u32);
        }
    }
    cache
}

fn bench_cache(c: &mut Criterion) {
    let cache = filled(1_000);
    c.bench_function("cache_get_hit", |b| {
        let mut h = 0_u32;
        b.iter(|| {
            h = (h + 7) % 1_000;
            black_box(cache.get(&h, "touchend"))
        });
    });
    c.bench_function("cache_get_miss", |b| {
        b.iter(|| black_box(cache.get(&5_000, "click")));
    });
    c.bench_function("cache_fill_and_release_1000", |b| {
        b.iter_batched(
            || filled(1_000),
            |mut cache| {
                for h in 0..1_000_u32 {
                    cache.remove(&h, None);
                }
                black_box(cache.len())
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, bench_cache);
criterion_main!(benches);
