// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # cluster-engine
//!
//! The two-level work-partitioning and recombination engine.
//!
//! Three engines implement the same [`ComputeEngine`] capability, so callers
//! can swap them freely:
//!
//! | Engine | Slots | Executor per slot |
//! |---|---|---|
//! | [`SequentialEngine`] | 1 | the kernel, on one blocking thread |
//! | [`LocalEngine`] | `T` threads | the kernel, on tokio's blocking pool |
//! | [`DistributedEngine`] | `S` servers (+1 master-local) | a remote [`LocalEngine`] over RPC |
//!
//! ```text
//! client ──▶ S servers ──▶ T threads each ──▶ partials
//!        ◀── client combine ◀── server combine ◀──┘
//! ```
//!
//! Partials are awaited and combined strictly in slot order. A slot that
//! fails (panics, loses its connection, finds no service) aborts the whole
//! job with a typed [`EngineError`]; no partial result is ever returned.
//!
//! # Example
//! ```no_run
//! use cluster_engine::{ComputeEngine, LocalEngine};
//! use ndarray::array;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), cluster_engine::EngineError> {
//! let engine = LocalEngine::new(4);
//! let a = Arc::new(array![[1.0, 2.0], [3.0, 4.0]]);
//! let bt = Arc::new(array![[5.0, 7.0], [6.0, 8.0]]);
//! let out = engine.multiply(a, bt).await?;
//! assert_eq!(out.value, array![[19.0, 22.0], [43.0, 50.0]]);
//! println!("{}", out.metrics.summary());
//! # Ok(())
//! # }
//! ```

mod combine;
mod config;
mod distributed;
mod engine;
mod error;
mod local;
mod metrics;
mod remote;
mod slot;

pub use config::{ClusterConfig, EngineKind};
pub use distributed::DistributedEngine;
pub use engine::{ComputeEngine, JobOutput, SequentialEngine};
pub use error::EngineError;
pub use local::LocalEngine;
pub use metrics::{JobKind, JobMetrics, SlotMetrics};
pub use slot::SlotKind;
