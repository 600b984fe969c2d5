//! The execution boundary: running a circuit plan and collecting measurement counts.

use std::collections::BTreeMap;

use miette::Diagnostic;
use num_complex::Complex;
use rand::{
    SeedableRng,
    distributions::{Distribution, WeightedIndex},
    rngs::StdRng,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    circuit::{CircuitPlan, Operation},
    variables::bitstring,
};

/// Errors raised by an execution engine.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
pub enum EngineError {
    /// The plan is wider than the engine can hold.
    #[error("circuit needs {qubits} qubits but the engine supports at most {max}")]
    #[diagnostic(code(engine::too_many_qubits), help("raise --max-qubits if memory allows"))]
    TooManyQubits {
        qubits: usize,
        max: usize,
    },
    /// The plan never measures, so there is nothing to sample.
    #[error("circuit has no measurement")]
    #[diagnostic(code(engine::missing_measurement))]
    MissingMeasurement,
    /// The final distribution could not be sampled.
    #[error("cannot sample measurement distribution: {0}")]
    #[diagnostic(code(engine::sampling))]
    Sampling(String),
}

/// Observation counts per measured bitstring.
///
/// Bitstrings are written most significant bit first, so character `j` is the
/// value of variable `j` of the plan's variable list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Counts(BTreeMap<String, u64>);

impl Counts {
    /// Record `count` more observations of `bits`.
    pub fn record(&mut self, bits: impl Into<String>, count: u64) {
        *self.0.entry(bits.into()).or_insert(0) += count;
    }

    pub fn get(&self, bits: &str) -> u64 {
        self.0.get(bits).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(bitstring, count)` in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Pairs sorted by descending count; ties keep bitstring order.
    pub fn by_frequency(&self) -> Vec<(&str, u64)> {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        pairs
    }

    /// The most frequently observed bitstring; ties go to the smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.by_frequency().into_iter().next()
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = Counts::default();
        for (bits, count) in iter {
            counts.record(bits, count);
        }
        counts
    }
}

/// Something that can run a circuit plan for a number of shots.
///
/// A call either returns counts summing to `shots` or fails; there is no retry.
pub trait ExecutionEngine {
    /// Execute `plan`, sampling the final measurement `shots` times.
    fn execute(&self, plan: &CircuitPlan, shots: u64) -> Result<Counts, EngineError>;
}

/// Ideal, noiseless state-vector execution on the local machine.
#[derive(Clone, Debug)]
pub struct StateVectorEngine {
    max_qubits: usize,
    seed: Option<u64>,
}

impl Default for StateVectorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateVectorEngine {
    /// Default limit on the qubit count.
    pub const DEFAULT_MAX_QUBITS: usize = 20;

    /// State vectors at least this wide log a warning.
    const LARGE_QUBITS: usize = 16;

    /// Engine with the default qubit limit and an entropy-seeded sampler.
    pub fn new() -> Self {
        StateVectorEngine {
            max_qubits: Self::DEFAULT_MAX_QUBITS,
            seed: None,
        }
    }

    /// Use a fixed sampler seed, making counts reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Final amplitudes of `plan`, indexed by assignment index.
    /// Stops at the first measurement.
    pub fn statevector(&self, plan: &CircuitPlan) -> Result<Vec<Complex<f64>>, EngineError> {
        let qubits = plan.qubits();
        if qubits > self.max_qubits {
            return Err(EngineError::TooManyQubits {
                qubits,
                max: self.max_qubits,
            });
        }
        if qubits >= Self::LARGE_QUBITS {
            warn!(qubits, "allocating a large state vector");
        }

        let dim = 1usize << qubits;
        let mut state = vec![Complex::ZERO; dim];
        state[0] = Complex::ONE;
        for op in plan.operations() {
            match op {
                Operation::PrepareUniformSuperposition => {
                    // Every plan prepares from |0...0>, where H^n gives the uniform state.
                    let amp = Complex::new(1.0 / (dim as f64).sqrt(), 0.0);
                    state.iter_mut().for_each(|a| *a = amp);
                }
                Operation::ApplyOracle(oracle) => {
                    for (a, phase) in state.iter_mut().zip(oracle.phases()) {
                        *a *= f64::from(*phase);
                    }
                }
                Operation::ApplyDiffuser => {
                    let mean = state.iter().sum::<Complex<f64>>() / dim as f64;
                    state.iter_mut().for_each(|a| *a = mean * 2.0 - *a);
                }
                Operation::MeasureAll => return Ok(state),
            }
        }
        Err(EngineError::MissingMeasurement)
    }

    /// Measurement probabilities of `plan`, indexed by assignment index.
    pub fn probabilities(&self, plan: &CircuitPlan) -> Result<Vec<f64>, EngineError> {
        Ok(self
            .statevector(plan)?
            .iter()
            .map(Complex::norm_sqr)
            .collect())
    }
}

impl ExecutionEngine for StateVectorEngine {
    fn execute(&self, plan: &CircuitPlan, shots: u64) -> Result<Counts, EngineError> {
        let probabilities = self.probabilities(plan)?;
        let dist =
            WeightedIndex::new(&probabilities).map_err(|e| EngineError::Sampling(e.to_string()))?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut hits = vec![0u64; probabilities.len()];
        for _ in 0..shots {
            hits[dist.sample(&mut rng)] += 1;
        }
        let counts: Counts = hits
            .into_iter()
            .enumerate()
            .filter(|(_, n)| *n > 0)
            .map(|(i, n)| (bitstring(i, plan.qubits()), n))
            .collect();

        debug!(distinct = counts.len(), "sampled outcomes");
        info!(shots, qubits = plan.qubits(), "executed circuit");
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{circuit::assemble, extract::extract, iterations::plan, oracle::build};

    fn grover(src: &str) -> CircuitPlan {
        let (expr, vars) = extract(src).unwrap();
        let oracle = build(&expr, &vars).unwrap();
        let m = std::num::NonZeroUsize::new(oracle.solution_count()).unwrap();
        assemble(Arc::new(oracle), vars.len(), plan(vars.len(), m)).unwrap()
    }

    #[test]
    fn counts_report_most_frequent_with_ties_to_smallest() {
        let counts: Counts = [("10".to_owned(), 5), ("01".to_owned(), 5), ("11".to_owned(), 2)]
            .into_iter()
            .collect();
        assert_eq!(counts.most_frequent(), Some(("01", 5)));
        assert_eq!(counts.total(), 12);
        assert_eq!(counts.get("00"), 0);
        assert_eq!(
            counts.by_frequency(),
            vec![("01", 5), ("10", 5), ("11", 2)]
        );
    }

    #[test]
    fn two_qubit_search_is_exact() {
        let plan = grover("out <= a and b;");
        let engine = StateVectorEngine::new().with_seed(7);
        let counts = engine.execute(&plan, 1024).unwrap();
        assert_eq!(counts.total(), 1024);
        assert_eq!(counts.get("11"), 1024);
    }

    #[test]
    fn state_vector_agrees_with_dense_unitary() {
        let plan = grover("y <= (a or b) and not (c xor d);");
        let state = StateVectorEngine::new().statevector(&plan).unwrap();
        let u = plan.to_unitary().unwrap();
        for (i, amp) in state.iter().enumerate() {
            assert!((u[(i, 0)] - amp).norm() < 1e-10, "index {i}");
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let plan = grover("y <= a and (b xor c);");
        let engine = StateVectorEngine::new().with_seed(42);
        assert_eq!(
            engine.execute(&plan, 500).unwrap(),
            engine.execute(&plan, 500).unwrap()
        );
    }

    #[test]
    fn solutions_dominate_three_qubit_search() {
        // Two solutions among eight: one iteration is exact.
        let plan = grover("y <= a and (b xor c);");
        let probabilities = StateVectorEngine::new().probabilities(&plan).unwrap();
        assert!((probabilities[0b101] + probabilities[0b110] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn rejects_plans_over_the_qubit_limit() {
        let plan = grover("y <= a and b and c;");
        let engine = StateVectorEngine::new().with_max_qubits(2);
        assert_eq!(
            engine.execute(&plan, 10),
            Err(EngineError::TooManyQubits { qubits: 3, max: 2 })
        );
    }
}
