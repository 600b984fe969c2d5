//! Optimal number of Grover iterations for a known solution count.

use std::{f64::consts::FRAC_PI_4, num::NonZeroUsize};

/// Number of Grover iterations for `m` solutions among `2^n` states:
/// `floor(pi/4 * sqrt(2^n / m))`, never less than one.
pub fn plan(n: usize, m: NonZeroUsize) -> usize {
    let ratio = search_space(n) / m.get() as f64;
    let iterations = (FRAC_PI_4 * ratio.sqrt()).floor() as usize;
    iterations.max(1)
}

/// Probability of measuring a solution after `k` iterations,
/// `sin^2((2k + 1) theta)` with `sin(theta) = sqrt(m / 2^n)`.
pub fn success_probability(n: usize, m: NonZeroUsize, k: usize) -> f64 {
    let density = (m.get() as f64 / search_space(n)).min(1.0);
    let theta = density.sqrt().asin();
    ((2 * k + 1) as f64 * theta).sin().powi(2)
}

fn search_space(n: usize) -> f64 {
    2f64.powi(n as i32)
}
