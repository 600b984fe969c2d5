//! Truth-table construction of the diagonal phase oracle.

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

use crate::{typed_syntax::BoolExpr, variables::VariableList};

/// Largest number of variables a truth table is built for.
pub const MAX_VARIABLES: usize = 24;

/// Errors raised while building an oracle.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
pub enum OracleError {
    /// The truth table would have more than `2^MAX_VARIABLES` rows.
    #[error("{count} variables exceed the truth-table limit of {max}")]
    #[diagnostic(code(oracle::too_many_variables))]
    TooManyVariables {
        /// Number of variables in the expression
        count: usize,
        /// The limit
        max: usize,
    },
}

/// The diagonal of a phase oracle: `-1` on satisfying assignments, `+1` elsewhere.
///
/// Entries are in assignment-index order (see `crate::variables` for the bit order).
/// The number of `-1` entries always equals `solution_count()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleSpec {
    qubits: usize,
    phases: Vec<i8>,
    solution_count: usize,
}

impl OracleSpec {
    pub fn qubits(&self) -> usize {
        self.qubits
    }

    /// The signed diagonal, one entry per assignment index.
    pub fn phases(&self) -> &[i8] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn solution_count(&self) -> usize {
        self.solution_count
    }

    /// True when no assignment satisfies the expression. There is nothing to search for.
    pub fn is_unsatisfiable(&self) -> bool {
        self.solution_count == 0
    }

    /// Whether assignment index `i` is marked.
    pub fn is_solution(&self, i: usize) -> bool {
        self.phases.get(i) == Some(&-1)
    }

    /// Indices of the satisfying assignments, ascending.
    pub fn solutions(&self) -> impl Iterator<Item = usize> + '_ {
        self.phases
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == -1)
            .map(|(i, _)| i)
    }
}

/// Evaluate `expr` on every assignment of `vars` and record the phase diagonal.
pub fn build(expr: &BoolExpr, vars: &VariableList) -> Result<OracleSpec, OracleError> {
    let qubits = vars.len();
    if qubits > MAX_VARIABLES {
        return Err(OracleError::TooManyVariables {
            count: qubits,
            max: MAX_VARIABLES,
        });
    }

    let mut phases = Vec::with_capacity(vars.search_space());
    let mut solution_count = 0;
    for i in 0..vars.search_space() {
        if expr.eval(&vars.assignment(i)) {
            phases.push(-1);
            solution_count += 1;
        } else {
            phases.push(1);
        }
    }

    debug!(rows = phases.len(), "evaluated truth table");
    info!(solutions = solution_count, qubits, "built phase oracle");
    Ok(OracleSpec {
        qubits,
        phases,
        solution_count,
    })
}
