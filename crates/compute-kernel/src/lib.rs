// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # compute-kernel
//!
//! Single-threaded numerical primitives shared by every level of the cluster.
//!
//! This crate provides:
//! - [`Matrix`]: a dense, row-major `f64` matrix backed by `ndarray`.
//! - [`pi_sequential`]: a Monte-Carlo estimate of π using an online mean.
//! - [`multiply_sequential`]: `C = A · Bᵀ` with the second operand already
//!   transposed, contracted left-to-right so results are reproducible.
//! - [`RunningMean`]: the streaming mean used both inside the π kernel and
//!   by the engines when combining per-slot estimates.
//!
//! Nothing here spawns threads or touches the network; the parallel and
//! distributed engines are built on top of these functions so that every
//! slot, local or remote, runs exactly the same arithmetic.

mod error;
mod matrix;
mod mean;
mod ops;

pub use error::KernelError;
pub use matrix::{random_matrix, shape_of, slot_rng, Matrix, MatrixView};
pub use mean::RunningMean;
pub use ops::{multiply_sequential, multiply_untransposed, pi_sequential, transpose};
