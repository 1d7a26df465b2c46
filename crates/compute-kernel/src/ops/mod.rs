// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Sequential kernel operations.
//!
//! Each operation is single-threaded and allocation-light. The engines call
//! them unchanged on every slot, which is what makes a parallel or remote
//! result bit-identical to the sequential one.

mod multiply_op;
mod pi_op;

pub use multiply_op::{multiply_sequential, multiply_untransposed, transpose};
pub use pi_op::pi_sequential;
