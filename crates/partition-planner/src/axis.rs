// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Axis choice for splitting `A · Bᵀ`.

use crate::{PartitionPlan, PlannerError};

/// Which operand's rows are distributed across slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Axis {
    /// Rows of `A`; each partial is a block of whole output rows.
    RowsOfA,
    /// Rows of `Bᵀ` (columns of `B`); each partial is a block of output columns.
    RowsOfBt,
}

impl Axis {
    /// Splits along rows of `A` iff `rows(A) ≥ rows(Bᵀ)`; ties go to `A`.
    pub fn choose(rows_a: usize, rows_bt: usize) -> Self {
        if rows_a >= rows_bt {
            Axis::RowsOfA
        } else {
            Axis::RowsOfBt
        }
    }

    /// Number of units along this axis.
    pub fn extent(&self, rows_a: usize, rows_bt: usize) -> usize {
        match self {
            Axis::RowsOfA => rows_a,
            Axis::RowsOfBt => rows_bt,
        }
    }

    /// Short label used in plan summaries and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Axis::RowsOfA => "rows-of-A",
            Axis::RowsOfBt => "rows-of-Bt",
        }
    }
}

/// The complete split of one `A · Bᵀ` job.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MultiplyPlan {
    /// The operand whose rows are split.
    pub axis: Axis,
    /// Output rows, `rows(A)`.
    pub rows: usize,
    /// Output columns, `rows(Bᵀ)`.
    pub cols: usize,
    /// Even split of the axis extent; part `i` is slot `i`'s share.
    pub partition: PartitionPlan,
}

impl MultiplyPlan {
    /// Chooses the axis and splits it evenly over at most `slots` parts.
    pub fn new(rows_a: usize, rows_bt: usize, slots: usize) -> Result<Self, PlannerError> {
        let axis = Axis::choose(rows_a, rows_bt);
        let partition = PartitionPlan::even(axis.extent(rows_a, rows_bt), slots)?;
        Ok(Self {
            axis,
            rows: rows_a,
            cols: rows_bt,
            partition,
        })
    }

    /// Expected `(rows, cols)` of the partial produced for `part_index`.
    pub fn partial_shape(&self, part_index: usize) -> Option<(usize, usize)> {
        let part = self.partition.parts.get(part_index)?;
        Some(match self.axis {
            Axis::RowsOfA => (part.len, self.cols),
            Axis::RowsOfBt => (self.rows, part.len),
        })
    }

    /// Returns a human-readable summary of the plan.
    pub fn summary(&self) -> String {
        format!(
            "{}x{} output split along {}: {}",
            self.rows,
            self.cols,
            self.axis.name(),
            self.partition.summary(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_ties_go_to_a() {
        assert_eq!(Axis::choose(4, 4), Axis::RowsOfA);
        assert_eq!(Axis::choose(5, 1), Axis::RowsOfA);
        assert_eq!(Axis::choose(2, 7), Axis::RowsOfBt);
    }

    #[test]
    fn test_plan_tall_a() {
        let plan = MultiplyPlan::new(5, 1, 4).unwrap();
        assert_eq!(plan.axis, Axis::RowsOfA);
        assert_eq!(plan.partition.sizes(), vec![2, 1, 1, 1]);
        assert_eq!(plan.partial_shape(0), Some((2, 1)));
    }

    #[test]
    fn test_plan_wide_b() {
        let plan = MultiplyPlan::new(2, 7, 4).unwrap();
        assert_eq!(plan.axis, Axis::RowsOfBt);
        assert_eq!(plan.partition.sizes(), vec![2, 2, 2, 1]);
        assert_eq!(plan.partial_shape(3), Some((2, 1)));
        assert_eq!(plan.partial_shape(4), None);
    }

    #[test]
    fn test_plan_clamps_to_extent() {
        let plan = MultiplyPlan::new(1, 1, 8).unwrap();
        assert_eq!(plan.partition.num_parts(), 1);
    }

    #[test]
    fn test_summary_mentions_axis() {
        let s = MultiplyPlan::new(2, 7, 4).unwrap().summary();
        assert!(s.contains("rows-of-Bt"));
    }
}
