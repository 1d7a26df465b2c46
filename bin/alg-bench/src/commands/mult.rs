// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `alg-bench mult`: time `rows × cols` by `cols × 1` products across engines.

use super::SweepOptions;
use cluster_engine::JobMetrics;
use compute_kernel::{random_matrix, Matrix};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

#[derive(Debug, serde::Serialize)]
struct MultRecord {
    repeat: u64,
    num_servers: usize,
    threads_per_server: usize,
    seconds: f64,
    metrics: JobMetrics,
}

pub async fn execute(
    options: &SweepOptions,
    rows: usize,
    cols: usize,
    repeats: u64,
    seed: u64,
) -> anyhow::Result<()> {
    options.banner("alg-bench · Matrix multiply");
    if !options.json {
        println!("  Operands: {rows}x{cols} times {cols}x1, {repeats} repeats, seed {seed}");
        println!();
    }
    let entries = options.engines();

    // Warm-up on a small product.
    let warm_a = Arc::new(Matrix::zeros((8, 8)));
    let warm_bt = Arc::new(Matrix::zeros((1, 8)));
    for entry in &entries {
        if let Err(e) = entry
            .engine
            .multiply(Arc::clone(&warm_a), Arc::clone(&warm_bt))
            .await
        {
            tracing::warn!("warm-up on {} failed: {e}", entry.engine.name());
        }
    }

    if !options.json {
        println!("{:>10} {:>20} {:>12}", "NumServers", "NumThreadsPerServer", "TimeSeconds");
    }

    let mut records = Vec::new();
    for repeat in 0..repeats {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(repeat));
        let a = Arc::new(random_matrix(rows, cols, &mut rng));
        let b = random_matrix(cols, 1, &mut rng);

        for entry in &entries {
            match entry.engine.multiply_untransposed(Arc::clone(&a), &b).await {
                Ok(out) => {
                    let seconds = out.metrics.total_duration.as_secs_f64();
                    if !options.json {
                        println!(
                            "{:>10} {:>20} {:>12.6}",
                            entry.num_servers, entry.threads, seconds,
                        );
                    }
                    records.push(MultRecord {
                        repeat,
                        num_servers: entry.num_servers,
                        threads_per_server: entry.threads,
                        seconds,
                        metrics: out.metrics,
                    });
                }
                Err(e) => {
                    tracing::warn!("{} failed: {e}", entry.engine.name());
                    if !options.json {
                        println!(
                            "{:>10} {:>20}     FAILED: {e}",
                            entry.num_servers, entry.threads,
                        );
                    }
                }
            }
        }
    }

    options.emit_json(&records)
}
