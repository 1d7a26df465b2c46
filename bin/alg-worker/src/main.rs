// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # alg-worker
//!
//! Worker node: warms up, registers the `Alg` service and serves clients on
//! port 1099 until interrupted.
//!
//! ## Usage
//! ```bash
//! alg-worker          # warm up with 128x128 operands
//! alg-worker 512      # warm up with 512x512 operands
//! ```

use clap::Parser;
use wire_protocol::DEFAULT_PORT;
use worker_server::WorkerServer;

#[derive(Parser)]
#[command(name = "alg-worker", about = "Serve pi and matrix multiply to cluster clients", version)]
struct Cli {
    /// Side length of the square matrices used to warm up.
    #[arg(default_value_t = 128)]
    warmup_dim: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let address = format!("0.0.0.0:{DEFAULT_PORT}");
    let server = WorkerServer::launch(&address, cli.warmup_dim).await?;
    tracing::info!("service bound, waiting for clients");

    server
        .serve_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("cannot listen for interrupt: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    Ok(())
}
