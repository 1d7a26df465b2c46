// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The distributed engine: `S` workers plus an optional master-local slot.
//!
//! ```text
//!   slot 0 ── remote servers[0] ─┐
//!   slot 1 ── remote servers[1] ─┤
//!     ⋮                          ├─▶ combine in slot order
//!   slot k-1 ── master-local (M) ┘      (only when M > 0)
//! ```
//!
//! Every remote slot asks its worker to run a [`LocalEngine`] with
//! `threads_per_server` threads, so a job fans out to at most
//! `S · T + M` kernel slots.

use crate::combine::{join_in_order, Dispatched, MatrixStitcher};
use crate::engine::{check_operands, check_samples};
use crate::remote::StubCache;
use crate::slot::{spawn_async, SlotKind};
use crate::{ComputeEngine, EngineError, JobKind, JobMetrics, JobOutput, LocalEngine};
use async_trait::async_trait;
use compute_kernel::{Matrix, RunningMean};
use ndarray::s;
use partition_planner::{Axis, MultiplyPlan, PiPlan};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wire_protocol::{resolve_address, DEFAULT_PORT};

/// Splits jobs across remote workers and, optionally, the local machine.
#[derive(Debug, Clone)]
pub struct DistributedEngine {
    servers: Vec<String>,
    threads_per_server: usize,
    master_threads: usize,
    master_seed: Option<u64>,
    stubs: StubCache,
}

impl DistributedEngine {
    /// Creates an engine over `servers`. Entries without a port get
    /// [`DEFAULT_PORT`]. `master_threads == 0` disables the master-local slot.
    pub fn new<I, S>(servers: I, threads_per_server: usize, master_threads: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let servers: Vec<String> = servers
            .into_iter()
            .map(|s| resolve_address(s.as_ref(), DEFAULT_PORT))
            .collect();
        tracing::info!(
            "distributed engine: {} servers x {} threads, {} master threads",
            servers.len(),
            threads_per_server,
            master_threads,
        );
        Self {
            servers,
            threads_per_server,
            master_threads,
            master_seed: None,
            stubs: StubCache::new(None),
        }
    }

    /// Bounds how long connecting to a worker may take.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.stubs = StubCache::new(Some(timeout));
        self
    }

    /// Seeds the master-local slot's RNG streams. Workers always draw
    /// from entropy, so only a master-only π job becomes reproducible.
    pub fn with_master_seed(mut self, seed: u64) -> Self {
        self.master_seed = Some(seed);
        self
    }

    /// Resolved `host:port` of every server, in slot order.
    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    pub fn threads_per_server(&self) -> usize {
        self.threads_per_server
    }

    pub fn master_threads(&self) -> usize {
        self.master_threads
    }

    fn check(&self) -> Result<(), EngineError> {
        if self.servers.is_empty() && self.master_threads == 0 {
            return Err(EngineError::InvalidJob(
                "no servers and no master-local threads".into(),
            ));
        }
        if self.threads_per_server == 0 {
            return Err(EngineError::InvalidJob(
                "threads per server must be at least one".into(),
            ));
        }
        Ok(())
    }

    fn master_engine(&self, threads: usize) -> LocalEngine {
        match self.master_seed {
            Some(seed) => LocalEngine::new(threads).with_seed(seed),
            None => LocalEngine::new(threads),
        }
    }

    /// Slots requested before clamping.
    fn slot_count(&self) -> usize {
        self.servers.len() + usize::from(self.master_threads > 0)
    }

    /// Executors for the first `used` slots. The master-local slot is
    /// always last; servers at the tail of the list go unused when clamped.
    fn executors(&self, used: usize) -> Vec<Executor> {
        let remote = if self.master_threads > 0 {
            used.saturating_sub(1)
        } else {
            used
        };
        let mut executors: Vec<Executor> = self.servers[..remote]
            .iter()
            .cloned()
            .map(Executor::Remote)
            .collect();
        if self.master_threads > 0 && used > 0 {
            executors.push(Executor::MasterLocal(self.master_threads));
        }
        executors
    }
}

#[derive(Debug, Clone)]
enum Executor {
    Remote(String),
    MasterLocal(usize),
}

impl Executor {
    fn kind(&self) -> SlotKind {
        match self {
            Executor::Remote(address) => SlotKind::Remote {
                address: address.clone(),
            },
            Executor::MasterLocal(threads) => SlotKind::MasterLocal { threads: *threads },
        }
    }
}

fn transport(slot: usize, server: String) -> impl FnOnce(wire_protocol::ProtocolError) -> EngineError {
    move |source| EngineError::Transport {
        slot,
        server,
        source,
    }
}

#[async_trait]
impl ComputeEngine for DistributedEngine {
    fn name(&self) -> &str {
        "distributed"
    }

    async fn multiply(
        &self,
        a: Arc<Matrix>,
        b_transpose: Arc<Matrix>,
    ) -> Result<JobOutput<Matrix>, EngineError> {
        self.check()?;
        check_operands(&a, &b_transpose)?;
        let start = Instant::now();

        let plan = MultiplyPlan::new(a.nrows(), b_transpose.nrows(), self.slot_count())?;
        tracing::debug!("distributed multiply: {}", plan.summary());

        let executors = self.executors(plan.partition.num_parts());
        let slots = plan
            .partition
            .parts
            .iter()
            .zip(executors)
            .map(|(part, executor)| {
                let a = Arc::clone(&a);
                let bt = Arc::clone(&b_transpose);
                let range = part.range();
                let axis = plan.axis;
                let slot = part.index;
                let kind = executor.kind();
                let handle = match executor {
                    Executor::Remote(address) => {
                        let stubs = self.stubs.clone();
                        let threads = self.threads_per_server;
                        spawn_async(async move {
                            let (a_part, bt_part) = match axis {
                                Axis::RowsOfA => (a.slice(s![range, ..]), bt.view()),
                                Axis::RowsOfBt => (a.view(), bt.slice(s![range, ..])),
                            };
                            stubs
                                .multiply(&address, threads, a_part, bt_part)
                                .await
                                .map_err(transport(slot, address.clone()))
                        })
                    }
                    Executor::MasterLocal(threads) => {
                        let engine = self.master_engine(threads);
                        spawn_async(async move {
                            let (a_part, bt_part) = match axis {
                                Axis::RowsOfA => (Arc::new(a.slice(s![range, ..]).to_owned()), bt),
                                Axis::RowsOfBt => (a, Arc::new(bt.slice(s![range, ..]).to_owned())),
                            };
                            Ok(engine.multiply(a_part, bt_part).await?.value)
                        })
                    }
                };
                Dispatched {
                    kind,
                    units: part.len as u64,
                    handle,
                }
            })
            .collect();

        let mut metrics = JobMetrics::new(JobKind::Multiply, self.name());
        let mut stitcher = MatrixStitcher::new(&plan);
        join_in_order(slots, &mut metrics, |slot, partial| {
            stitcher.place(slot, &partial)
        })
        .await?;
        metrics.finalise(start.elapsed());

        Ok(JobOutput {
            value: stitcher.finish(),
            metrics,
        })
    }

    async fn pi(&self, samples: u64) -> Result<JobOutput<f64>, EngineError> {
        self.check()?;
        check_samples(samples)?;
        let start = Instant::now();

        let plan = PiPlan::new(samples, self.slot_count())?;
        tracing::debug!("distributed pi: {}", plan.summary());
        let per_slot = plan.per_slot;

        let mut slots = Vec::with_capacity(plan.slots);
        for (slot, executor) in self.executors(plan.slots).into_iter().enumerate() {
            let kind = executor.kind();
            let (units, handle) = match executor {
                Executor::Remote(address) => {
                    let stubs = self.stubs.clone();
                    let threads = self.threads_per_server;
                    let units = PiPlan::new(per_slot, threads)?.effective_samples();
                    let handle = spawn_async(async move {
                        stubs
                            .pi(&address, per_slot, threads)
                            .await
                            .map_err(transport(slot, address.clone()))
                    });
                    (units, handle)
                }
                Executor::MasterLocal(threads) => {
                    let engine = self.master_engine(threads);
                    let units = PiPlan::new(per_slot, threads)?.effective_samples();
                    let handle =
                        spawn_async(async move { Ok(engine.pi(per_slot).await?.value) });
                    (units, handle)
                }
            };
            slots.push(Dispatched {
                kind,
                units,
                handle,
            });
        }

        let mut metrics = JobMetrics::new(JobKind::Pi, self.name());
        let mut mean = RunningMean::new();
        join_in_order(slots, &mut metrics, |_, estimate| {
            mean.push(estimate);
            Ok(())
        })
        .await?;
        metrics.finalise(start.elapsed());

        Ok(JobOutput {
            value: mean.mean(),
            metrics,
        })
    }
}
