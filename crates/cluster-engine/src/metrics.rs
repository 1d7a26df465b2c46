// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Job timing metrics.
//!
//! [`JobMetrics`] collects per-slot and aggregate timing for one `pi` or
//! `multiply` job. The benchmark harness prints these instead of timing
//! engines from the outside.

use std::time::Duration;

/// The workload a job ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Pi,
    Multiply,
}

impl JobKind {
    /// Unit of work counted by [`JobMetrics::total_units`].
    pub fn unit(&self) -> &'static str {
        match self {
            JobKind::Pi => "samples",
            JobKind::Multiply => "lines",
        }
    }
}

/// Metrics for one slot's execution.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SlotMetrics {
    /// Slot index in combine order.
    pub slot: usize,
    /// Executor description (`kernel`, `remote 10.0.0.2:1099`, …).
    pub executor: String,
    /// Samples drawn (pi) or output lines produced (multiply).
    pub units: u64,
    /// Time from dispatch until the partial was available.
    pub elapsed: Duration,
}

/// Aggregate metrics for a complete job.
#[derive(Debug, Clone, serde::Serialize)]
pub struct JobMetrics {
    pub kind: JobKind,
    /// Name of the engine that ran the job.
    pub engine: String,
    /// Wall-clock time from planning until the combined result.
    pub total_duration: Duration,
    /// Work actually performed, summed over slots.
    pub total_units: u64,
    /// Per-slot metrics in slot order.
    pub slots: Vec<SlotMetrics>,
}

impl JobMetrics {
    /// Creates an empty metrics container.
    pub fn new(kind: JobKind, engine: impl Into<String>) -> Self {
        Self {
            kind,
            engine: engine.into(),
            total_duration: Duration::ZERO,
            total_units: 0,
            slots: Vec::new(),
        }
    }

    /// Records metrics for a single slot.
    pub fn record_slot(&mut self, slot: usize, executor: String, units: u64, elapsed: Duration) {
        self.total_units += units;
        self.slots.push(SlotMetrics {
            slot,
            executor,
            units,
            elapsed,
        });
    }

    /// Finalises metrics with the total wall-clock time.
    pub fn finalise(&mut self, total: Duration) {
        self.total_duration = total;
    }

    /// The slot that took longest, if any ran.
    pub fn slowest_slot(&self) -> Option<&SlotMetrics> {
        self.slots.iter().max_by_key(|s| s.elapsed)
    }

    /// Returns units per second throughput.
    pub fn units_per_second(&self) -> f64 {
        let secs = self.total_duration.as_secs_f64();
        if secs <= 0.0 || self.total_units == 0 {
            return 0.0;
        }
        self.total_units as f64 / secs
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        let slowest = match self.slowest_slot() {
            Some(s) => format!(
                "slowest slot {} ({}) {:.2}ms",
                s.slot,
                s.executor,
                s.elapsed.as_secs_f64() * 1000.0
            ),
            None => "no slots".to_string(),
        };
        format!(
            "{} via {}: {:.2}ms total, {} slots, {} {} ({:.1} {}/s), {}",
            match self.kind {
                JobKind::Pi => "pi",
                JobKind::Multiply => "multiply",
            },
            self.engine,
            self.total_duration.as_secs_f64() * 1000.0,
            self.slots.len(),
            self.total_units,
            self.kind.unit(),
            self.units_per_second(),
            self.kind.unit(),
            slowest,
        )
    }
}
