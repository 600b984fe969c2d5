//! Abstract Grover circuit plans.
//!
//! A plan is a flat list of operations over `n` qubits:
//! superposition, then `(oracle, diffuser)` repeated, then measurement.

use std::sync::Arc;

use indexmap::IndexMap;
use miette::Diagnostic;
use pretty::RcDoc;
use thiserror::Error;
use tracing::debug;

use crate::{oracle::OracleSpec, text::ToDoc};

/// One step of a circuit plan.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Hadamard on every qubit, starting from the all-zero state
    PrepareUniformSuperposition,
    /// Diagonal phase flip of the marked states
    ApplyOracle(Arc<OracleSpec>),
    /// Inversion about the mean, `2|s><s| - I`; depends only on the qubit count
    ApplyDiffuser,
    /// Measure every qubit in the computational basis
    MeasureAll,
}

impl Operation {
    /// A short name for the kind of operation.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::PrepareUniformSuperposition => "superposition",
            Operation::ApplyOracle(_) => "oracle",
            Operation::ApplyDiffuser => "diffuser",
            Operation::MeasureAll => "measure",
        }
    }
}

impl ToDoc for Operation {
    fn to_doc(&self) -> RcDoc {
        match self {
            Operation::ApplyOracle(oracle) => RcDoc::text("oracle").append(format!(
                " (marks {} of {})",
                oracle.solution_count(),
                oracle.len()
            )),
            _ => RcDoc::text(self.kind()),
        }
    }
}

/// An immutable Grover circuit over a fixed number of qubits.
#[derive(Clone, Debug, PartialEq)]
pub struct CircuitPlan {
    qubits: usize,
    operations: Vec<Operation>,
}

impl CircuitPlan {
    pub fn qubits(&self) -> usize {
        self.qubits
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn oracle_calls(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, Operation::ApplyOracle(_)))
            .count()
    }

    /// Count of each operation kind, in order of first appearance.
    pub fn operation_counts(&self) -> IndexMap<&'static str, usize> {
        let mut counts = IndexMap::new();
        for op in &self.operations {
            *counts.entry(op.kind()).or_insert(0) += 1;
        }
        counts
    }
}

impl ToDoc for CircuitPlan {
    fn to_doc(&self) -> RcDoc {
        RcDoc::text(format!("circuit on {} qubits:", self.qubits))
            .append(
                RcDoc::hardline()
                    .append(RcDoc::intersperse(
                        self.operations.iter().map(Operation::to_doc),
                        RcDoc::hardline(),
                    ))
                    .nest(2),
            )
    }
}

/// Errors raised while assembling a circuit.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
pub enum CircuitError {
    /// The oracle was built for a different number of variables.
    #[error("oracle acts on {oracle} qubits but the circuit has {qubits}")]
    #[diagnostic(code(circuit::qubit_mismatch))]
    QubitMismatch {
        /// Qubits of the oracle
        oracle: usize,
        /// Qubits requested for the circuit
        qubits: usize,
    },
}

/// Build the Grover circuit: superposition, `iterations` rounds of oracle then diffuser,
/// and a final measurement. Only the oracle's width is checked, never its entries.
pub fn assemble(
    oracle: Arc<OracleSpec>,
    qubits: usize,
    iterations: usize,
) -> Result<CircuitPlan, CircuitError> {
    if oracle.qubits() != qubits {
        return Err(CircuitError::QubitMismatch {
            oracle: oracle.qubits(),
            qubits,
        });
    }
    let mut operations = Vec::with_capacity(2 * iterations + 2);
    operations.push(Operation::PrepareUniformSuperposition);
    for _ in 0..iterations {
        operations.push(Operation::ApplyOracle(Arc::clone(&oracle)));
        operations.push(Operation::ApplyDiffuser);
    }
    operations.push(Operation::MeasureAll);

    debug!(qubits, iterations, operations = operations.len(), "assembled circuit");
    Ok(CircuitPlan { qubits, operations })
}
