// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The remotely callable algorithm service.

use async_trait::async_trait;
use cluster_engine::{ComputeEngine, EngineError, LocalEngine};
use compute_kernel::Matrix;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Operations a worker exposes to clients.
#[async_trait]
pub trait RemoteAlgorithms: Send + Sync {
    /// π estimated from at least `samples` samples over `threads` threads.
    async fn pi(&self, samples: u64, threads: usize) -> Result<f64, EngineError>;

    /// `A · Bᵀ` computed over `threads` threads.
    async fn multiply(
        &self,
        threads: usize,
        a: Matrix,
        b_transpose: Matrix,
    ) -> Result<Matrix, EngineError>;
}

/// Runs every call on a fresh [`LocalEngine`] sized by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlgorithmService;

impl AlgorithmService {
    pub fn new() -> Self {
        Self
    }

    /// Runs a `dim × dim` multiply on 4 threads and a 100-sample π job so
    /// later calls do not pay first-use costs. Returns the time taken.
    pub async fn warm_up(&self, dim: usize) -> Result<Duration, EngineError> {
        let start = Instant::now();
        let zeros = Matrix::zeros((dim, dim));
        self.multiply(4, zeros.clone(), zeros).await?;
        self.pi(100, 4).await?;
        Ok(start.elapsed())
    }
}

#[async_trait]
impl RemoteAlgorithms for AlgorithmService {
    async fn pi(&self, samples: u64, threads: usize) -> Result<f64, EngineError> {
        let out = LocalEngine::new(threads).pi(samples).await?;
        tracing::debug!("{}", out.metrics.summary());
        Ok(out.value)
    }

    async fn multiply(
        &self,
        threads: usize,
        a: Matrix,
        b_transpose: Matrix,
    ) -> Result<Matrix, EngineError> {
        let out = LocalEngine::new(threads)
            .multiply(Arc::new(a), Arc::new(b_transpose))
            .await?;
        tracing::debug!("{}", out.metrics.summary());
        Ok(out.value)
    }
}
