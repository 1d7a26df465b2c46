// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dense matrix type and helpers.

use ndarray::{Array2, ArrayView2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A dense real-valued matrix in row-major order.
///
/// Matrices are plain values: they are built once, shared read-only with
/// the slots that need them, and never mutated after a job starts.
pub type Matrix = Array2<f64>;

/// A borrowed view over a [`Matrix`] or a contiguous block of its rows.
pub type MatrixView<'a> = ArrayView2<'a, f64>;

/// Returns `(rows, cols)` for a matrix or view.
pub fn shape_of(m: &MatrixView<'_>) -> (usize, usize) {
    m.dim()
}

/// Builds a `rows × cols` matrix with entries drawn uniformly from `[0, 1)`.
pub fn random_matrix<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
    Array2::from_shape_simple_fn((rows, cols), || rng.gen::<f64>())
}

/// Creates the RNG for one π slot.
///
/// With a base seed, slot `i` is seeded with `seed + i` so repeated runs are
/// reproducible; without one, every slot draws its own entropy.
pub fn slot_rng(seed: Option<u64>, slot: usize) -> ChaCha8Rng {
    match seed {
        Some(base) => ChaCha8Rng::seed_from_u64(base.wrapping_add(slot as u64)),
        None => ChaCha8Rng::from_entropy(),
    }
}
