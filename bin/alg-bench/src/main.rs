// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # alg-bench
//!
//! Timing harness for the compute cluster.
//!
//! ## Usage
//! ```bash
//! # pi: sequential baseline, then for each of 1..=4 threads the local
//! # engine and every growing prefix of the server list
//! alg-bench pi --max-samples 1200000 --max-threads 4 --servers rpi1,rpi2,rpi3
//!
//! # mult: 1000x1000 times 1000x1 over the same engines, three repeats
//! alg-bench mult --rows 1000 --cols 1000 --repeats 3 --servers rpi1,rpi2
//!
//! # Read servers, master threads and seed from a file, dump JSON metrics
//! alg-bench -c cluster.toml --json pi
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "alg-bench",
    about = "Time pi and matrix multiply on local and distributed engines",
    version,
    author
)]
struct Cli {
    /// Path to a TOML cluster configuration (CLI arguments override it).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print job records as JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    /// Comma-separated worker hosts (`host` or `host:port`).
    #[arg(short, long, global = true)]
    servers: Option<String>,

    /// Threads for the master-local slot of the distributed engine.
    #[arg(short, long, global = true)]
    master_threads: Option<usize>,

    /// Largest thread count swept, locally and per server
    /// (defaults to the configured threads or the number of cores).
    #[arg(short = 't', long, global = true)]
    max_threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep Monte-Carlo pi over sample counts 12, 120, 1200, ...
    Pi {
        /// Largest sample count in the sweep.
        #[arg(long, default_value_t = 1_200_000)]
        max_samples: u64,
    },

    /// Sweep matrix-vector multiply over random operands.
    Mult {
        /// Rows of the random matrix.
        #[arg(long, default_value_t = 1000)]
        rows: usize,

        /// Columns of the random matrix and length of the vector.
        #[arg(long, default_value_t = 1000)]
        cols: usize,

        /// Number of random operand pairs.
        #[arg(long, default_value_t = 3)]
        repeats: u64,

        /// Base seed; repeat `r` uses `seed + r`.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let options = commands::SweepOptions::resolve(
        cli.config.as_deref(),
        cli.servers.as_deref(),
        cli.master_threads,
        cli.max_threads,
        cli.json,
    )?;

    match cli.command {
        Commands::Pi { max_samples } => commands::pi::execute(&options, max_samples).await,
        Commands::Mult {
            rows,
            cols,
            repeats,
            seed,
        } => commands::mult::execute(&options, rows, cols, repeats, seed).await,
    }
}
