// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for the sequential kernels.

use compute_kernel::{multiply_sequential, pi_sequential, random_matrix};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply_sequential");
    for dim in [32usize, 64, 128] {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let a = random_matrix(dim, dim, &mut rng);
        let bt = random_matrix(dim, dim, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |b, _| {
            b.iter(|| multiply_sequential(black_box(a.view()), black_box(bt.view())).unwrap())
        });
    }
    group.finish();
}

fn bench_pi(c: &mut Criterion) {
    let mut group = c.benchmark_group("pi_sequential");
    for samples in [10_000u64, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(samples), &samples, |b, &n| {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            b.iter(|| pi_sequential(black_box(n), &mut rng))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_multiply, bench_pi);
criterion_main!(benches);
