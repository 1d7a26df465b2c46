// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The local parallel engine: one machine, `T` kernel slots.

use crate::combine::{join_in_order, Dispatched, MatrixStitcher};
use crate::engine::{check_operands, check_samples};
use crate::slot::{spawn_kernel, SlotKind};
use crate::{ComputeEngine, EngineError, JobKind, JobMetrics, JobOutput};
use async_trait::async_trait;
use compute_kernel::{multiply_sequential, pi_sequential, slot_rng, Matrix, RunningMean};
use ndarray::s;
use partition_planner::{Axis, MultiplyPlan, PiPlan};
use std::sync::Arc;
use std::time::Instant;

/// Splits jobs over `threads` kernel slots on tokio's blocking pool.
///
/// The pool is elastic, so `threads` may exceed the number of cores; slots
/// then time-share. This is also the engine a worker runs for each RPC
/// call, with the caller's thread count.
#[derive(Debug, Clone)]
pub struct LocalEngine {
    threads: usize,
    seed: Option<u64>,
}

impl LocalEngine {
    /// Creates an engine with `threads` slots. Zero is rejected per job.
    pub fn new(threads: usize) -> Self {
        Self {
            threads,
            seed: None,
        }
    }

    /// Seeds slot `i`'s π stream with `seed + i`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    fn check_threads(&self) -> Result<(), EngineError> {
        if self.threads == 0 {
            return Err(EngineError::InvalidJob(
                "local engine needs at least one thread".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ComputeEngine for LocalEngine {
    fn name(&self) -> &str {
        "local"
    }

    async fn multiply(
        &self,
        a: Arc<Matrix>,
        b_transpose: Arc<Matrix>,
    ) -> Result<JobOutput<Matrix>, EngineError> {
        self.check_threads()?;
        check_operands(&a, &b_transpose)?;
        let start = Instant::now();

        let plan = MultiplyPlan::new(a.nrows(), b_transpose.nrows(), self.threads)?;
        tracing::debug!("local multiply: {}", plan.summary());

        let slots = plan
            .partition
            .parts
            .iter()
            .map(|part| {
                let a = Arc::clone(&a);
                let bt = Arc::clone(&b_transpose);
                let range = part.range();
                let axis = plan.axis;
                Dispatched {
                    kind: SlotKind::Kernel,
                    units: part.len as u64,
                    handle: spawn_kernel(move || {
                        let c = match axis {
                            Axis::RowsOfA => multiply_sequential(a.slice(s![range, ..]), bt.view()),
                            Axis::RowsOfBt => multiply_sequential(a.view(), bt.slice(s![range, ..])),
                        }?;
                        Ok(c)
                    }),
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
        self.check_threads()?;
        check_samples(samples)?;
        let start = Instant::now();

        let plan = PiPlan::new(samples, self.threads)?;
        tracing::debug!("local pi: {}", plan.summary());

        let slots = (0..plan.slots)
            .map(|slot| {
                let seed = self.seed;
                let per_slot = plan.per_slot;
                Dispatched {
                    kind: SlotKind::Kernel,
                    units: per_slot,
                    handle: spawn_kernel(move || {
                        Ok(pi_sequential(per_slot, &mut slot_rng(seed, slot)))
                    }),
                }
            })
            .collect();

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
