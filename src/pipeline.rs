//! The end-to-end compilation of an HDL assignment into a Grover search.

use std::{num::NonZeroUsize, sync::Arc};

use miette::Diagnostic;
use thiserror::Error;
use tracing::info;

use crate::{
    circuit::{CircuitError, CircuitPlan, assemble},
    engine::{Counts, EngineError, ExecutionEngine},
    extract::{ExtractError, parse_assignment},
    iterations,
    oracle::{self, OracleError, OracleSpec},
    typed_syntax::BoolExpr,
    variables::VariableList,
};

/// Errors from any stage of the pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
pub enum PipelineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Oracle(#[from] OracleError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Circuit(#[from] CircuitError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),
}

/// Everything compiled for a satisfiable expression.
#[derive(Clone, Debug, PartialEq)]
pub struct GroverSearch {
    /// The assigned signal name, as written
    pub target: String,
    /// Sorted free variables
    pub variables: VariableList,
    pub expr: BoolExpr,
    /// The phase oracle, shared with `circuit`
    pub oracle: Arc<OracleSpec>,
    pub iterations: usize,
    pub circuit: CircuitPlan,
}

impl GroverSearch {
    /// Number of satisfying assignments.
    pub fn solution_count(&self) -> NonZeroUsize {
        // Only built for satisfiable oracles.
        NonZeroUsize::new(self.oracle.solution_count()).unwrap_or(NonZeroUsize::MIN)
    }

    /// Ideal probability of measuring a solution with the planned iterations.
    pub fn success_probability(&self) -> f64 {
        iterations::success_probability(
            self.variables.len(),
            self.solution_count(),
            self.iterations,
        )
    }

    /// Run the circuit on `engine` for `shots` shots.
    pub fn run(&self, engine: &impl ExecutionEngine, shots: u64) -> Result<Counts, PipelineError> {
        Ok(engine.execute(&self.circuit, shots)?)
    }
}

/// The result of compiling a source text.
#[derive(Clone, Debug, PartialEq)]
pub enum Compiled {
    /// No assignment satisfies the expression; no circuit is built.
    Unsatisfiable {
        /// The assigned signal name
        target: String,
        /// Sorted free variables
        variables: VariableList,
    },
    /// A circuit ready to run
    Search(GroverSearch),
}

/// Extract, build the oracle, plan and assemble.
/// Stops after the oracle when there is nothing to search for.
pub fn compile(source: &str) -> Result<Compiled, PipelineError> {
    let assignment = parse_assignment(source)?;
    let target = assignment.target.inner;
    let variables = assignment.variables;
    info!(target_signal = %target, variables = variables.len(), "extracted expression");

    let oracle = oracle::build(&assignment.expr, &variables)?;
    let Some(m) = NonZeroUsize::new(oracle.solution_count()) else {
        info!("expression is unsatisfiable");
        return Ok(Compiled::Unsatisfiable { target, variables });
    };

    let iterations = iterations::plan(variables.len(), m);
    info!(iterations, solutions = m.get(), "planned iterations");

    let oracle = Arc::new(oracle);
    let circuit = assemble(Arc::clone(&oracle), variables.len(), iterations)?;
    info!(operations = circuit.operations().len(), "assembled circuit");

    Ok(Compiled::Search(GroverSearch {
        target,
        variables,
        expr: assignment.expr,
        oracle,
        iterations,
        circuit,
    }))
}
