// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommands and the helpers they share.

pub mod mult;
pub mod pi;

use cluster_engine::{ClusterConfig, ComputeEngine, DistributedEngine, LocalEngine, SequentialEngine};
use std::path::Path;
use std::time::Duration;

/// Installs the global subscriber; `-v` repetitions raise the level.
pub fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Settings shared by both sweeps, after merging file and CLI.
pub struct SweepOptions {
    pub config: ClusterConfig,
    pub max_threads: usize,
    pub json: bool,
}

impl SweepOptions {
    pub fn resolve(
        config_path: Option<&Path>,
        servers: Option<&str>,
        master_threads: Option<usize>,
        max_threads: Option<usize>,
        json: bool,
    ) -> anyhow::Result<Self> {
        let mut config = match config_path {
            Some(path) => ClusterConfig::from_file(path)?,
            None => ClusterConfig::default(),
        };
        if let Some(list) = servers {
            config.servers = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(m) = master_threads {
            config.master_threads = m;
        }
        if let Some(t) = max_threads {
            config.threads = Some(t);
        }

        let max_threads = config.resolve_threads();
        if max_threads == 0 {
            anyhow::bail!("--max-threads must be at least 1");
        }
        tracing::info!(
            "sweeping 1..={max_threads} threads over {} servers",
            config.servers.len()
        );
        Ok(Self {
            config,
            max_threads,
            json,
        })
    }

    /// Engines in sweep order: the sequential baseline at `(0, 0)`, then
    /// for each thread count `t` in 1..=max the local engine at `(0, t)`
    /// followed by the distributed engine over each growing prefix of the
    /// server list at `(prefix, t)`.
    pub fn engines(&self) -> Vec<SweepEntry> {
        let seed = self.config.seed;
        let mut baseline = SequentialEngine::new();
        if let Some(seed) = seed {
            baseline = baseline.with_seed(seed);
        }
        let mut entries = vec![SweepEntry {
            num_servers: 0,
            threads: 0,
            engine: Box::new(baseline),
        }];

        let servers = self.config.server_addresses();
        for threads in 1..=self.max_threads {
            let mut local = LocalEngine::new(threads);
            if let Some(seed) = seed {
                local = local.with_seed(seed);
            }
            entries.push(SweepEntry {
                num_servers: 0,
                threads,
                engine: Box::new(local),
            });

            for count in 1..=servers.len() {
                let mut engine =
                    DistributedEngine::new(&servers[..count], threads, self.config.master_threads);
                if let Some(ms) = self.config.connect_timeout_ms {
                    engine = engine.with_connect_timeout(Duration::from_millis(ms));
                }
                if let Some(seed) = seed {
                    engine = engine.with_master_seed(seed);
                }
                entries.push(SweepEntry {
                    num_servers: count,
                    threads,
                    engine: Box::new(engine),
                });
            }
        }
        entries
    }

    pub fn banner(&self, title: &str) {
        if self.json {
            return;
        }
        println!("╔══════════════════════════════════════════════════════╗");
        println!("║  {title:<52}║");
        println!("╚══════════════════════════════════════════════════════╝");
        println!();
        let servers = self.config.server_addresses();
        println!("  Max threads:    {}", self.max_threads);
        println!(
            "  Servers:        {}",
            if servers.is_empty() {
                "(none)".to_string()
            } else {
                servers.join(", ")
            }
        );
        println!("  Master threads: {}", self.config.master_threads);
        println!();
    }

    /// Prints `records` as pretty JSON when `--json` was given.
    pub fn emit_json<T: serde::Serialize>(&self, records: &[T]) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        Ok(())
    }
}

/// One engine of a sweep and its table coordinates.
pub struct SweepEntry {
    pub num_servers: usize,
    pub threads: usize,
    pub engine: Box<dyn ComputeEngine>,
}
