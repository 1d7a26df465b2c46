// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Monte-Carlo estimate of π.

use crate::RunningMean;
use rand::Rng;

/// Estimates π from `samples` draws as `4 · E[√(1 − x²)]`, `x ∼ U[0, 1)`.
///
/// The expectation is accumulated with a [`RunningMean`] rather than a sum,
/// so the kernel never divides a large total. Zero samples yield `0.0`.
///
/// Each caller must supply its own RNG; slots never share one.
pub fn pi_sequential<R: Rng + ?Sized>(samples: u64, rng: &mut R) -> f64 {
    let mut mean = RunningMean::new();
    for _ in 0..samples {
        let x: f64 = rng.gen();
        mean.push((1.0 - x * x).sqrt());
    }
    4.0 * mean.mean()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pi_million_samples_is_close() {
        let mut rng = ChaCha8Rng::seed_from_u64(2017);
        let pi = pi_sequential(1_000_000, &mut rng);
        assert!((pi - std::f64::consts::PI).abs() < 0.01, "estimate {pi}");
    }

    #[test]
    fn test_pi_is_in_open_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for n in [1, 2, 10, 100] {
            let pi = pi_sequential(n, &mut rng);
            assert!(pi > 0.0 && pi <= 4.0, "n = {n}, estimate {pi}");
        }
    }

    #[test]
    fn test_pi_zero_samples() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(pi_sequential(0, &mut rng), 0.0);
    }

    #[test]
    fn test_pi_same_seed_same_value() {
        let a = pi_sequential(1000, &mut ChaCha8Rng::seed_from_u64(9));
        let b = pi_sequential(1000, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
