// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The engine capability shared by every execution tier.
//!
//! ```text
//!   SequentialEngine ─┐
//!        LocalEngine ─┼─▶ dyn ComputeEngine ─▶ JobOutput { value, metrics }
//!  DistributedEngine ─┘
//! ```
//!
//! For the same inputs every engine produces the same `multiply` result,
//! bit for bit, and a `pi` estimate with the same distribution.

use crate::slot::{join_slot, spawn_kernel, SlotKind};
use crate::{EngineError, JobKind, JobMetrics};
use async_trait::async_trait;
use compute_kernel::{
    multiply_sequential, pi_sequential, slot_rng, transpose, KernelError, Matrix,
};
use std::sync::Arc;
use std::time::Instant;

// ── Job output ─────────────────────────────────────────────────

/// The result of one job.
#[derive(Debug, Clone)]
pub struct JobOutput<T> {
    /// The combined value.
    pub value: T,
    /// Per-slot and overall timing.
    pub metrics: JobMetrics,
}

// ── Capability ─────────────────────────────────────────────────

/// Something that can run `pi` and `multiply` jobs.
///
/// Inputs are taken as shared [`Arc`]s so slots can borrow disjoint row
/// ranges without copying.
#[async_trait]
pub trait ComputeEngine: Send + Sync {
    /// Short engine name used in logs and metrics.
    fn name(&self) -> &str;

    /// Computes `C = A · Bᵀ` where `b_transpose` is already `Bᵀ`.
    ///
    /// # Errors
    /// [`EngineError::Kernel`] if `cols(A) ≠ cols(Bᵀ)`; otherwise any slot
    /// failure.
    async fn multiply(
        &self,
        a: Arc<Matrix>,
        b_transpose: Arc<Matrix>,
    ) -> Result<JobOutput<Matrix>, EngineError>;

    /// Estimates π from at least `samples` samples.
    async fn pi(&self, samples: u64) -> Result<JobOutput<f64>, EngineError>;

    /// Computes `C = A · B` for a `B` given untransposed.
    async fn multiply_untransposed(
        &self,
        a: Arc<Matrix>,
        b: &Matrix,
    ) -> Result<JobOutput<Matrix>, EngineError> {
        if a.ncols() != b.nrows() {
            return Err(KernelError::ShapeMismatch {
                op: "multiply_untransposed",
                lhs: a.dim(),
                rhs: b.dim(),
            }
            .into());
        }
        let b_transpose = Arc::new(transpose(b.view()));
        self.multiply(a, b_transpose).await
    }
}

/// Rejects operands whose inner dimensions differ.
pub(crate) fn check_operands(a: &Matrix, b_transpose: &Matrix) -> Result<(), EngineError> {
    if a.ncols() != b_transpose.ncols() {
        return Err(KernelError::ShapeMismatch {
            op: "multiply",
            lhs: a.dim(),
            rhs: b_transpose.dim(),
        }
        .into());
    }
    Ok(())
}

pub(crate) fn check_samples(samples: u64) -> Result<(), EngineError> {
    if samples == 0 {
        return Err(EngineError::InvalidJob(
            "pi needs at least one sample".into(),
        ));
    }
    Ok(())
}

// ── Sequential ─────────────────────────────────────────────────

/// The kernel behind the engine interface: one slot, no partitioning.
///
/// Serves as the reference every parallel engine is compared against.
#[derive(Debug, Clone, Default)]
pub struct SequentialEngine {
    seed: Option<u64>,
}

impl SequentialEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws π samples from a deterministic stream.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[async_trait]
impl ComputeEngine for SequentialEngine {
    fn name(&self) -> &str {
        "sequential"
    }

    async fn multiply(
        &self,
        a: Arc<Matrix>,
        b_transpose: Arc<Matrix>,
    ) -> Result<JobOutput<Matrix>, EngineError> {
        check_operands(&a, &b_transpose)?;
        let start = Instant::now();
        let rows = a.nrows() as u64;
        let handle = spawn_kernel(move || Ok(multiply_sequential(a.view(), b_transpose.view())?));
        let partial = join_slot(0, handle).await?;

        let mut metrics = JobMetrics::new(JobKind::Multiply, self.name());
        metrics.record_slot(0, SlotKind::Kernel.to_string(), rows, partial.elapsed);
        metrics.finalise(start.elapsed());
        Ok(JobOutput {
            value: partial.value,
            metrics,
        })
    }

    async fn pi(&self, samples: u64) -> Result<JobOutput<f64>, EngineError> {
        check_samples(samples)?;
        let start = Instant::now();
        let seed = self.seed;
        let handle = spawn_kernel(move || Ok(pi_sequential(samples, &mut slot_rng(seed, 0))));
        let partial = join_slot(0, handle).await?;

        let mut metrics = JobMetrics::new(JobKind::Pi, self.name());
        metrics.record_slot(0, SlotKind::Kernel.to_string(), samples, partial.elapsed);
        metrics.finalise(start.elapsed());
        Ok(JobOutput {
            value: partial.value,
            metrics,
        })
    }
}
