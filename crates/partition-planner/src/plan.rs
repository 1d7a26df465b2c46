// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Partition plans: the contract between a planner and an engine.
//!
//! A [`PartitionPlan`] is an ordered list of contiguous [`Part`]s covering
//! `0..total`. Slot `i` of an engine processes part `i`, and partials are
//! stitched back in part order at each part's realised offset.

use crate::PlannerError;
use std::ops::Range;

/// One contiguous block of units assigned to a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Part {
    /// Slot index this part is assigned to.
    pub index: usize,
    /// First unit (row or column) of the block.
    pub offset: usize,
    /// Number of units in the block.
    pub len: usize,
}

impl Part {
    /// Returns the half-open unit range `offset..offset + len`.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// One past the last unit of this part.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// An even split of `total` units into at most `requested` parts.
///
/// When `requested > total` the part count is clamped to `total` and the
/// surplus slots get nothing. Otherwise the first `total % parts` parts get
/// `⌊total/parts⌋ + 1` units and the rest get `⌊total/parts⌋`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PartitionPlan {
    /// Units to divide.
    pub total: usize,
    /// Part count asked for before clamping.
    pub requested: usize,
    /// Parts in slot order.
    pub parts: Vec<Part>,
}

impl PartitionPlan {
    /// Builds the front-loaded even split of `total` into `requested` parts.
    ///
    /// # Errors
    /// Returns [`PlannerError::ZeroParts`] when `requested` is zero.
    pub fn even(total: usize, requested: usize) -> Result<Self, PlannerError> {
        if requested == 0 {
            return Err(PlannerError::ZeroParts {
                total: total as u64,
            });
        }

        let effective = requested.min(total);
        let mut builder = PlanBuilder::new(total, requested);
        if effective > 0 {
            let base = total / effective;
            let with_extra = total % effective;
            for i in 0..effective {
                builder.add_part(if i < with_extra { base + 1 } else { base });
            }
        }

        let plan = builder.build();
        plan.validate()?;
        Ok(plan)
    }

    /// Number of parts that actually carry work.
    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }

    /// `true` when fewer parts were produced than requested.
    pub fn is_clamped(&self) -> bool {
        self.parts.len() < self.requested
    }

    /// Part sizes in slot order.
    pub fn sizes(&self) -> Vec<usize> {
        self.parts.iter().map(|p| p.len).collect()
    }

    /// Checks the structural invariants of the plan.
    ///
    /// - Part indices run `0, 1, 2, …`.
    /// - Parts are non-empty and contiguous, starting at 0 and ending at `total`.
    /// - Sizes differ by at most one, larger parts first.
    /// - No more parts than requested.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.parts.len() > self.requested {
            return Err(PlannerError::InvalidPlan {
                detail: format!(
                    "{} parts exceed the {} requested",
                    self.parts.len(),
                    self.requested
                ),
            });
        }

        let mut expected_offset = 0;
        for (i, part) in self.parts.iter().enumerate() {
            if part.index != i {
                return Err(PlannerError::InvalidPlan {
                    detail: format!("expected part index {i}, got {}", part.index),
                });
            }
            if part.len == 0 {
                return Err(PlannerError::InvalidPlan {
                    detail: format!("part {i} is empty"),
                });
            }
            if part.offset != expected_offset {
                return Err(PlannerError::InvalidPlan {
                    detail: format!(
                        "part {i} starts at {} but previous part ended at {expected_offset}",
                        part.offset
                    ),
                });
            }
            expected_offset = part.end();
        }

        if expected_offset != self.total {
            return Err(PlannerError::InvalidPlan {
                detail: format!("parts cover {expected_offset} of {} units", self.total),
            });
        }

        for pair in self.parts.windows(2) {
            if pair[1].len > pair[0].len || pair[0].len - pair[1].len > 1 {
                return Err(PlannerError::InvalidPlan {
                    detail: format!(
                        "uneven parts {} ({} units) and {} ({} units)",
                        pair[0].index, pair[0].len, pair[1].index, pair[1].len
                    ),
                });
            }
        }

        Ok(())
    }

    /// Returns a human-readable summary of the plan.
    pub fn summary(&self) -> String {
        format!(
            "{} units over {} parts (requested {}{}), sizes {:?}",
            self.total,
            self.num_parts(),
            self.requested,
            if self.is_clamped() { ", clamped" } else { "" },
            self.sizes(),
        )
    }
}

/// Sample split for the Monte-Carlo π workload.
///
/// Every slot draws `⌈samples / slots⌉` samples, so the effective sample
/// count is `slots · ⌈samples / slots⌉ ≥ samples`. Slots are never clamped:
/// equal per-slot counts are what make the unweighted mean of slot
/// estimates the exact overall mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PiPlan {
    /// Minimum number of samples asked for.
    pub samples: u64,
    /// Number of slots.
    pub slots: usize,
    /// Samples drawn by each slot.
    pub per_slot: u64,
}

impl PiPlan {
    /// Builds the ceiling split of `samples` over `slots`.
    ///
    /// # Errors
    /// Returns [`PlannerError::ZeroParts`] when `slots` is zero.
    pub fn new(samples: u64, slots: usize) -> Result<Self, PlannerError> {
        if slots == 0 {
            return Err(PlannerError::ZeroParts { total: samples });
        }
        Ok(Self {
            samples,
            slots,
            per_slot: samples.div_ceil(slots as u64),
        })
    }

    /// Samples actually drawn across all slots.
    pub fn effective_samples(&self) -> u64 {
        self.per_slot * self.slots as u64
    }

    /// Returns a human-readable summary of the plan.
    pub fn summary(&self) -> String {
        format!(
            "{} samples requested, {} slots x {} = {} effective",
            self.samples,
            self.slots,
            self.per_slot,
            self.effective_samples(),
        )
    }
}

/// Builder helper for constructing a `PartitionPlan` incrementally.
pub(crate) struct PlanBuilder {
    total: usize,
    requested: usize,
    parts: Vec<Part>,
    next_offset: usize,
}

impl PlanBuilder {
    /// Creates a new builder.
    pub fn new(total: usize, requested: usize) -> Self {
        Self {
            total,
            requested,
            parts: Vec::new(),
            next_offset: 0,
        }
    }

    /// Appends a part of `len` units directly after the previous one.
    pub fn add_part(&mut self, len: usize) {
        let index = self.parts.len();
        self.parts.push(Part {
            index,
            offset: self.next_offset,
            len,
        });
        self.next_offset += len;
    }

    /// Consumes the builder and returns the finished plan.
    pub fn build(self) -> PartitionPlan {
        PartitionPlan {
            total: self.total,
            requested: self.requested,
            parts: self.parts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_divisible() {
        let plan = PartitionPlan::even(8, 4).unwrap();
        assert_eq!(plan.sizes(), vec![2, 2, 2, 2]);
        assert!(!plan.is_clamped());
    }

    #[test]
    fn test_remainder_goes_to_front() {
        let plan = PartitionPlan::even(7, 4).unwrap();
        assert_eq!(plan.sizes(), vec![2, 2, 2, 1]);
        assert_eq!(plan.parts[3].offset, 6);
    }

    #[test]
    fn test_clamped_to_total() {
        let plan = PartitionPlan::even(3, 8).unwrap();
        assert_eq!(plan.sizes(), vec![1, 1, 1]);
        assert!(plan.is_clamped());
        assert_eq!(plan.requested, 8);
    }

    #[test]
    fn test_five_rows_four_slots() {
        let plan = PartitionPlan::even(5, 4).unwrap();
        assert_eq!(plan.sizes(), vec![2, 1, 1, 1]);
        let ranges: Vec<_> = plan.parts.iter().map(|p| p.range()).collect();
        assert_eq!(ranges, vec![0..2, 2..3, 3..4, 4..5]);
    }

    #[test]
    fn test_single_part() {
        let plan = PartitionPlan::even(10, 1).unwrap();
        assert_eq!(plan.sizes(), vec![10]);
    }

    #[test]
    fn test_zero_total_has_no_parts() {
        let plan = PartitionPlan::even(0, 3).unwrap();
        assert_eq!(plan.num_parts(), 0);
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_zero_parts_rejected() {
        assert_eq!(
            PartitionPlan::even(10, 0),
            Err(PlannerError::ZeroParts { total: 10 })
        );
    }

    #[test]
    fn test_validate_catches_gap() {
        let mut plan = PartitionPlan::even(6, 3).unwrap();
        plan.parts[1].offset = 3;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_validate_catches_back_loaded_remainder() {
        let plan = PartitionPlan {
            total: 5,
            requested: 2,
            parts: vec![
                Part { index: 0, offset: 0, len: 2 },
                Part { index: 1, offset: 2, len: 3 },
            ],
        };
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_summary_format() {
        let s = PartitionPlan::even(3, 5).unwrap().summary();
        assert!(s.contains("3 units over 3 parts"));
        assert!(s.contains("clamped"));
    }

    #[test]
    fn test_pi_plan_rounds_up() {
        let plan = PiPlan::new(1_000_001, 4).unwrap();
        assert_eq!(plan.per_slot, 250_001);
        assert_eq!(plan.effective_samples(), 1_000_004);
    }

    #[test]
    fn test_pi_plan_exact_division() {
        let plan = PiPlan::new(1200, 4).unwrap();
        assert_eq!(plan.per_slot, 300);
        assert_eq!(plan.effective_samples(), 1200);
    }

    #[test]
    fn test_pi_plan_more_slots_than_samples() {
        let plan = PiPlan::new(3, 8).unwrap();
        assert_eq!(plan.per_slot, 1);
        assert_eq!(plan.effective_samples(), 8);
    }

    #[test]
    fn test_pi_plan_zero_slots() {
        assert!(PiPlan::new(100, 0).is_err());
    }
}
