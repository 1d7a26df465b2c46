// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # partition-planner
//!
//! Decides how a job is split into slots, both across servers and across
//! the threads of one server. Planning is purely arithmetic (no I/O, no
//! threads) so the same plan drives the local and the distributed engine.
//!
//! # Plans
//!
//! | Plan | Used for | Rule |
//! |---|---|---|
//! | [`PartitionPlan`] | matrix rows / columns | `⌊N/k⌋` or `⌊N/k⌋+1` units, larger parts first, `k` clamped to `N` |
//! | [`PiPlan`] | Monte-Carlo samples | every slot draws `⌈n/k⌉`, total rounded up to a multiple of `k` |
//! | [`MultiplyPlan`] | `A · Bᵀ` | picks an [`Axis`], then a [`PartitionPlan`] along it |
//!
//! # Example
//! ```
//! use partition_planner::PartitionPlan;
//!
//! let plan = PartitionPlan::even(7, 4).unwrap();
//! assert_eq!(plan.sizes(), vec![2, 2, 2, 1]);
//! ```

mod axis;
mod error;
pub(crate) mod plan;

pub use axis::{Axis, MultiplyPlan};
pub use error::PlannerError;
pub use plan::{Part, PartitionPlan, PiPlan};
