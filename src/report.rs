//! Interpretation of measurement counts against the variables and the oracle.

use crate::{engine::Counts, oracle::OracleSpec, text::Name, variables::VariableList};

/// The most frequent measurement, decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Measured bitstring, first variable first
    pub bitstring: String,
    /// Times it was observed
    pub count: u64,
    /// The variable values it encodes
    pub assignment: Vec<(Name, bool)>,
    /// Whether it satisfies the expression
    pub is_solution: bool,
}

/// Decode the most frequent bitstring in `counts`.
/// Returns `None` when `counts` is empty or the bitstring does not fit `vars`.
pub fn top_outcome(counts: &Counts, vars: &VariableList, oracle: &OracleSpec) -> Option<Outcome> {
    let (bits, count) = counts.most_frequent()?;
    let assignment = vars
        .decode(bits)?
        .into_iter()
        .map(|(name, value)| (name.clone(), value))
        .collect();
    Some(Outcome {
        bitstring: bits.to_owned(),
        count,
        assignment,
        is_solution: is_solution(bits, oracle),
    })
}

/// Fraction of shots that measured a satisfying assignment.
pub fn observed_success_rate(counts: &Counts, oracle: &OracleSpec) -> f64 {
    let total = counts.total();
    if total == 0 {
        return 0.0;
    }
    let hits: u64 = counts
        .iter()
        .filter(|(bits, _)| is_solution(bits, oracle))
        .map(|(_, n)| n)
        .sum();
    hits as f64 / total as f64
}

/// Bitstrings of the wrong width, or with characters other than `0`/`1`, never match.
fn is_solution(bits: &str, oracle: &OracleSpec) -> bool {
    if bits.len() != oracle.qubits() {
        return false;
    }
    bits.chars()
        .try_fold(0usize, |i, c| match c {
            '0' => Some(i << 1),
            '1' => Some((i << 1) | 1),
            _ => None,
        })
        .is_some_and(|i| oracle.is_solution(i))
}
