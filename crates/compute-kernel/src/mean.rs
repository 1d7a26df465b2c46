// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Streaming arithmetic mean.

/// Online mean updated as `mean ← mean + (x − mean) / i`.
///
/// Every input carries equal weight. The engines rely on this when they
/// combine per-slot π estimates: it is only the exact overall mean when all
/// slots drew the same number of samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMean {
    mean: f64,
    count: u64,
}

impl RunningMean {
    /// Creates an empty mean (value `0.0`, count `0`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one observation into the mean.
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        self.mean += (x - self.mean) / self.count as f64;
    }

    /// Current mean, `0.0` when nothing has been pushed.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Number of observations folded in so far.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Extend<f64> for RunningMean {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.push(x);
        }
    }
}

impl FromIterator<f64> for RunningMean {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut m = Self::new();
        m.extend(iter);
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let m = RunningMean::new();
        assert_eq!(m.mean(), 0.0);
        assert_eq!(m.count(), 0);
    }

    #[test]
    fn test_matches_arithmetic_mean() {
        let xs = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let m: RunningMean = xs.iter().copied().collect();
        let expected = xs.iter().sum::<f64>() / xs.len() as f64;
        assert!((m.mean() - expected).abs() < 1e-12);
        assert_eq!(m.count(), 8);
    }

    #[test]
    fn test_single_value_is_exact() {
        let mut m = RunningMean::new();
        m.push(std::f64::consts::PI);
        assert_eq!(m.mean(), std::f64::consts::PI);
    }

    #[test]
    fn test_equal_values_stay_put() {
        let m: RunningMean = std::iter::repeat(2.5).take(1000).collect();
        assert!((m.mean() - 2.5).abs() < 1e-12);
    }
}
