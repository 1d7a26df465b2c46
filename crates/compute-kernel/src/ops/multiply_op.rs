// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Matrix multiplication against a pre-transposed right operand.

use crate::{KernelError, Matrix, MatrixView};

/// Computes `C = A · B` given `A` (`ra × ca`) and `Bᵀ` (`cb × ca`).
///
/// `C[i][j] = Σₖ A[i][k] · Bᵀ[j][k]`, summed left-to-right from `0.0` with
/// no fused multiply-add, so identical inputs always give identical bits.
/// The result is freshly allocated with shape `(ra, cb)`.
///
/// # Errors
/// Returns [`KernelError::ShapeMismatch`] if `A` and `Bᵀ` disagree on the
/// contracted (column) dimension.
pub fn multiply_sequential(
    a: MatrixView<'_>,
    b_transpose: MatrixView<'_>,
) -> Result<Matrix, KernelError> {
    if a.ncols() != b_transpose.ncols() {
        return Err(KernelError::ShapeMismatch {
            op: "multiply",
            lhs: a.dim(),
            rhs: b_transpose.dim(),
        });
    }

    let ra = a.nrows();
    let cb = b_transpose.nrows();
    let mut c = Matrix::zeros((ra, cb));

    for (a_row, mut c_row) in a.rows().into_iter().zip(c.rows_mut()) {
        for (b_row, c_ij) in b_transpose.rows().into_iter().zip(c_row.iter_mut()) {
            let mut acc = 0.0;
            for (x, y) in a_row.iter().zip(b_row.iter()) {
                acc += x * y;
            }
            *c_ij = acc;
        }
    }

    Ok(c)
}

/// Computes `C = A · B` for an untransposed `B` (`ca × cb`).
///
/// Transposes `B` once and delegates to [`multiply_sequential`].
pub fn multiply_untransposed(a: MatrixView<'_>, b: MatrixView<'_>) -> Result<Matrix, KernelError> {
    if a.ncols() != b.nrows() {
        return Err(KernelError::ShapeMismatch {
            op: "multiply (untransposed)",
            lhs: a.dim(),
            rhs: b.dim(),
        });
    }
    let b_transpose = transpose(b);
    multiply_sequential(a, b_transpose.view())
}

/// Returns the transpose of `m` as a new row-major matrix.
pub fn transpose(m: MatrixView<'_>) -> Matrix {
    m.t().as_standard_layout().into_owned()
}
