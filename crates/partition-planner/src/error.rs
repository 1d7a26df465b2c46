// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the partition planner.

/// Errors that can occur while planning a split.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    /// A split was requested into zero parts.
    #[error("cannot partition {total} units into zero parts")]
    ZeroParts { total: u64 },

    /// A plan broke one of its structural invariants.
    #[error("invalid plan: {detail}")]
    InvalidPlan { detail: String },
}
