// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for the local parallel engine across thread counts.

use cluster_engine::{ComputeEngine, LocalEngine};
use compute_kernel::random_matrix;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

fn bench_local_multiply(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let a = Arc::new(random_matrix(128, 128, &mut rng));
    let bt = Arc::new(random_matrix(128, 128, &mut rng));

    let mut group = c.benchmark_group("local_multiply_128");
    for threads in [1usize, 2, 4, 8] {
        let engine = LocalEngine::new(threads);
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, _| {
            b.iter(|| {
                rt.block_on(engine.multiply(Arc::clone(&a), Arc::clone(&bt)))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_local_pi(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("local_pi_100k");
    for threads in [1usize, 2, 4, 8] {
        let engine = LocalEngine::new(threads).with_seed(7);
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, _| {
            b.iter(|| rt.block_on(engine.pi(100_000)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_local_multiply, bench_local_pi);
criterion_main!(benches);
