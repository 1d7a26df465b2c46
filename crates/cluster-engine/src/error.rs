// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the engines.

/// Errors that abort a job.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The job parameters cannot be executed (zero threads, no servers, …).
    #[error("invalid job: {0}")]
    InvalidJob(String),

    /// The kernel rejected its operands.
    #[error("kernel error: {0}")]
    Kernel(#[from] compute_kernel::KernelError),

    /// The planner could not split the job.
    #[error("planner error: {0}")]
    Planner(#[from] partition_planner::PlannerError),

    /// A remote slot could not reach its server or its call failed.
    #[error("slot {slot} on server '{server}' failed: {source}")]
    Transport {
        slot: usize,
        server: String,
        #[source]
        source: wire_protocol::ProtocolError,
    },

    /// A slot's task panicked or was cancelled before producing a partial.
    #[error("slot {slot} did not complete: {detail}")]
    SlotAborted { slot: usize, detail: String },

    /// A partial came back with a shape other than its plan entry.
    #[error("slot {slot} returned a {actual:?} partial, expected {expected:?}")]
    PartialShape {
        slot: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl EngineError {
    /// Short machine-readable class of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidJob(_) => "invalid-job",
            EngineError::Kernel(_) => "kernel",
            EngineError::Planner(_) => "planner",
            EngineError::Transport { .. } => "transport",
            EngineError::SlotAborted { .. } => "slot-aborted",
            EngineError::PartialShape { .. } => "partial-shape",
            EngineError::ConfigError(_) => "config",
        }
    }
}
