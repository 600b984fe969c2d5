//! Dense matrices for circuit plans.
//!
//! Matrices act on `2^n`-dimensional column vectors indexed by assignment index.
//! They grow as `4^n`, so they are meant for inspection and checking of small plans.

use std::f64::consts::FRAC_1_SQRT_2;

use faer::{Mat, mat};
use num_complex::Complex;

use crate::circuit::{CircuitPlan, Operation};

const CISQRT2: Complex<f64> = Complex::new(FRAC_1_SQRT_2, 0.0);

/// Largest qubit count for which dense matrices are built.
pub const MAX_DENSE_QUBITS: usize = 10;

fn hadamard() -> Mat<Complex<f64>> {
    mat![[CISQRT2, CISQRT2], [CISQRT2, -CISQRT2]]
}

impl Operation {
    pub fn to_unitary(&self, qubits: usize) -> Option<Mat<Complex<f64>>> {
        let dim = 1 << qubits;
        match self {
            Operation::PrepareUniformSuperposition => Some(
                (0..qubits).fold(Mat::identity(1, 1), |x, _| x.kron(hadamard())),
            ),
            Operation::ApplyOracle(oracle) => Some(Mat::from_fn(dim, dim, |i, j| {
                if i == j {
                    Complex::new(f64::from(oracle.phases()[i]), 0.0)
                } else {
                    Complex::ZERO
                }
            })),
            Operation::ApplyDiffuser => {
                let mean = 2.0 / dim as f64;
                Some(Mat::from_fn(dim, dim, |i, j| {
                    let delta = if i == j { 1.0 } else { 0.0 };
                    Complex::new(mean - delta, 0.0)
                }))
            }
            Operation::MeasureAll => None,
        }
    }
}

impl CircuitPlan {
    /// The product of every unitary operation of the plan, in execution order.
    /// Returns `None` when the plan is wider than `MAX_DENSE_QUBITS`.
    pub fn to_unitary(&self) -> Option<Mat<Complex<f64>>> {
        if self.qubits() > MAX_DENSE_QUBITS {
            return None;
        }
        let dim = 1 << self.qubits();
        Some(
            self.operations()
                .iter()
                .filter_map(|op| op.to_unitary(self.qubits()))
                .fold(Mat::identity(dim, dim), |x, y| y * x),
        )
    }
}
