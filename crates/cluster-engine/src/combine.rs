// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! In-order recombination of slot partials.

use crate::slot::{abort_all, join_slot, SlotHandle, SlotKind};
use crate::{EngineError, JobMetrics};
use compute_kernel::Matrix;
use ndarray::s;
use partition_planner::{Axis, MultiplyPlan};

/// A slot that has been dispatched and not yet joined.
pub(crate) struct Dispatched<T> {
    pub kind: SlotKind,
    /// Work the slot performs, for metrics.
    pub units: u64,
    pub handle: SlotHandle<T>,
}

/// Awaits `slots` in index order, feeding each partial to `fold`.
///
/// The first failure, whether from the slot itself or from `fold`, aborts
/// every slot not yet joined and is returned as is.
pub(crate) async fn join_in_order<T>(
    slots: Vec<Dispatched<T>>,
    metrics: &mut JobMetrics,
    mut fold: impl FnMut(usize, T) -> Result<(), EngineError>,
) -> Result<(), EngineError> {
    let mut pending = slots.into_iter().enumerate();
    while let Some((index, slot)) = pending.next() {
        let result = match join_slot(index, slot.handle).await {
            Ok(partial) => fold(index, partial.value).map(|()| partial.elapsed),
            Err(e) => Err(e),
        };
        match result {
            Ok(elapsed) => {
                metrics.record_slot(index, slot.kind.to_string(), slot.units, elapsed);
            }
            Err(e) => {
                tracing::warn!("slot {index} ({}) failed: {e}", slot.kind);
                abort_all(pending.map(|(_, rest)| rest.handle));
                return Err(e);
            }
        }
    }
    Ok(())
}

/// Places partial blocks of `C = A · Bᵀ` into the output matrix.
///
/// Row blocks (axis A) or column blocks (axis Bᵀ) are written at a running
/// offset that advances by each partial's realised extent.
pub(crate) struct MatrixStitcher<'p> {
    plan: &'p MultiplyPlan,
    out: Matrix,
    offset: usize,
}

impl<'p> MatrixStitcher<'p> {
    pub fn new(plan: &'p MultiplyPlan) -> Self {
        Self {
            plan,
            out: Matrix::zeros((plan.rows, plan.cols)),
            offset: 0,
        }
    }

    /// Writes the partial of slot `slot`. Partials must arrive in slot order.
    pub fn place(&mut self, slot: usize, partial: &Matrix) -> Result<(), EngineError> {
        let actual = partial.dim();
        let expected = self.plan.partial_shape(slot).unwrap_or((0, 0));
        if self.plan.partial_shape(slot) != Some(actual) {
            return Err(EngineError::PartialShape {
                slot,
                expected,
                actual,
            });
        }

        match self.plan.axis {
            Axis::RowsOfA => {
                let end = self.offset + actual.0;
                self.out.slice_mut(s![self.offset..end, ..]).assign(partial);
                self.offset = end;
            }
            Axis::RowsOfBt => {
                let end = self.offset + actual.1;
                self.out.slice_mut(s![.., self.offset..end]).assign(partial);
                self.offset = end;
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Matrix {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::spawn_kernel;
    use crate::JobKind;
    use ndarray::array;

    #[test]
    fn test_stitch_rows() {
        let plan = MultiplyPlan::new(3, 2, 2).unwrap();
        let mut st = MatrixStitcher::new(&plan);
        st.place(0, &array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        st.place(1, &array![[5.0, 6.0]]).unwrap();
        assert_eq!(st.finish(), array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
    }

    #[test]
    fn test_stitch_columns() {
        let plan = MultiplyPlan::new(1, 3, 2).unwrap();
        assert_eq!(plan.axis, Axis::RowsOfBt);
        let mut st = MatrixStitcher::new(&plan);
        st.place(0, &array![[1.0, 2.0]]).unwrap();
        st.place(1, &array![[3.0]]).unwrap();
        assert_eq!(st.finish(), array![[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn test_wrong_partial_shape() {
        let plan = MultiplyPlan::new(4, 2, 2).unwrap();
        let mut st = MatrixStitcher::new(&plan);
        let err = st.place(0, &array![[1.0, 2.0]]).unwrap_err();
        match err {
            EngineError::PartialShape {
                slot,
                expected,
                actual,
            } => {
                assert_eq!(slot, 0);
                assert_eq!(expected, (2, 2));
                assert_eq!(actual, (1, 2));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_partial_beyond_plan() {
        let plan = MultiplyPlan::new(1, 1, 4).unwrap();
        let mut st = MatrixStitcher::new(&plan);
        st.place(0, &array![[1.0]]).unwrap();
        assert!(st.place(1, &array![[1.0]]).is_err());
    }

    #[tokio::test]
    async fn test_join_in_order_folds_by_index() {
        let slots = (0..4u64)
            .map(|i| Dispatched {
                kind: SlotKind::Kernel,
                units: 1,
                handle: spawn_kernel(move || {
                    // Later slots finish first.
                    std::thread::sleep(std::time::Duration::from_millis(20 - 5 * i));
                    Ok(i)
                }),
            })
            .collect();
        let mut metrics = JobMetrics::new(JobKind::Pi, "test");
        let mut seen = Vec::new();
        join_in_order(slots, &mut metrics, |index, v| {
            seen.push((index, v));
            Ok(())
        })
        .await
        .unwrap();
        assert_eq!(seen, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
        assert_eq!(metrics.slots.len(), 4);
        assert_eq!(metrics.total_units, 4);
    }

    #[tokio::test]
    async fn test_join_in_order_stops_at_first_failure() {
        let slots = vec![
            Dispatched {
                kind: SlotKind::Kernel,
                units: 1,
                handle: spawn_kernel(|| Ok(1u8)),
            },
            Dispatched {
                kind: SlotKind::Kernel,
                units: 1,
                handle: spawn_kernel(|| Err(EngineError::InvalidJob("slot 1".into()))),
            },
            Dispatched {
                kind: SlotKind::Kernel,
                units: 1,
                handle: spawn_kernel(|| Ok(3u8)),
            },
        ];
        let mut metrics = JobMetrics::new(JobKind::Pi, "test");
        let mut seen = Vec::new();
        let err = join_in_order(slots, &mut metrics, |_, v| {
            seen.push(v);
            Ok(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidJob(_)));
        assert_eq!(seen, vec![1]);
        assert_eq!(metrics.slots.len(), 1);
    }
}
