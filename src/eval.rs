//! Evaluation of resolved expressions.

use crate::typed_syntax::BoolExpr;

impl BoolExpr {
    /// Evaluate under `assignment`, where `assignment[j]` is the value of variable `j`.
    ///
    /// Only the supplied bits are visible to the expression. Variables outside the
    /// assignment read as `false`; resolution against the same `VariableList` rules
    /// this out.
    pub fn eval(&self, assignment: &[bool]) -> bool {
        match self {
            BoolExpr::Const(b) => *b,
            BoolExpr::Var(j) => assignment.get(*j).copied().unwrap_or(false),
            BoolExpr::Not(inner) => !inner.eval(assignment),
            BoolExpr::Binary(op, lhs, rhs) => op.apply(lhs.eval(assignment), rhs.eval(assignment)),
        }
    }
}
