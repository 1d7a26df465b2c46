// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `alg-bench pi`: time π estimation across engines and sample counts.
//!
//! Sample counts run 12, 120, 1200, … up to `--max-samples`. Accuracy is
//! the absolute error against `std::f64::consts::PI`.

use super::SweepOptions;
use cluster_engine::JobMetrics;
use std::f64::consts::PI;

#[derive(Debug, serde::Serialize)]
struct PiRecord {
    num_servers: usize,
    threads_per_server: usize,
    samples: u64,
    seconds: f64,
    estimate: f64,
    accuracy: f64,
    metrics: JobMetrics,
}

pub async fn execute(options: &SweepOptions, max_samples: u64) -> anyhow::Result<()> {
    options.banner("alg-bench · Monte-Carlo pi");
    let entries = options.engines();

    // Warm-up: first use pays thread-pool and connection start-up.
    for entry in &entries {
        if let Err(e) = entry.engine.pi(1_000).await {
            tracing::warn!("warm-up on {} failed: {e}", entry.engine.name());
        }
    }

    if !options.json {
        println!(
            "{:>10} {:>20} {:>12} {:>12} {:>12}",
            "NumServers", "NumThreadsPerServer", "NumSamples", "TimeSeconds", "Accuracy",
        );
    }

    let mut records = Vec::new();
    let mut samples = 12u64;
    while samples <= max_samples {
        for entry in &entries {
            match entry.engine.pi(samples).await {
                Ok(out) => {
                    let seconds = out.metrics.total_duration.as_secs_f64();
                    let accuracy = (out.value - PI).abs();
                    if !options.json {
                        println!(
                            "{:>10} {:>20} {:>12} {:>12.6} {:>12.6e}",
                            entry.num_servers, entry.threads, samples, seconds, accuracy,
                        );
                    }
                    records.push(PiRecord {
                        num_servers: entry.num_servers,
                        threads_per_server: entry.threads,
                        samples,
                        seconds,
                        estimate: out.value,
                        accuracy,
                        metrics: out.metrics,
                    });
                }
                Err(e) => {
                    tracing::warn!("{} failed: {e}", entry.engine.name());
                    if !options.json {
                        println!(
                            "{:>10} {:>20} {:>12}     FAILED: {e}",
                            entry.num_servers, entry.threads, samples,
                        );
                    }
                }
            }
        }
        samples = match samples.checked_mul(10) {
            Some(next) => next,
            None => break,
        };
    }

    options.emit_json(&records)
}
