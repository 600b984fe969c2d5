//! Resolved syntax definitions
//!
//! The core syntax of the tool: boolean expressions whose variables are
//! positions in a `VariableList`. Built once by extraction and never mutated.

use pretty::RcDoc;

use crate::{text::ToDoc, variables::VariableList};

/// A binary boolean operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
}

impl BinOp {
    /// Apply the operator to two booleans.
    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            BinOp::And => lhs && rhs,
            BinOp::Or => lhs || rhs,
            BinOp::Xor => lhs ^ rhs,
            BinOp::Nand => !(lhs && rhs),
            BinOp::Nor => !(lhs || rhs),
            BinOp::Xnor => lhs == rhs,
        }
    }

    /// The keyword spelling of the operator.
    pub fn keyword(self) -> &'static str {
        match self {
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Xor => "xor",
            BinOp::Nand => "nand",
            BinOp::Nor => "nor",
            BinOp::Xnor => "xnor",
        }
    }
}

impl ToDoc for BinOp {
    fn to_doc(&self) -> RcDoc {
        RcDoc::text(self.keyword())
    }
}

/// A boolean expression over the variables of a `VariableList`.
#[derive(Clone, Debug, PartialEq)]
pub enum BoolExpr {
    /// A constant
    Const(bool),
    /// The variable at this position of the variable list
    Var(usize),
    /// Negation
    Not(Box<BoolExpr>),
    /// Binary operator application
    Binary(BinOp, Box<BoolExpr>, Box<BoolExpr>),
}

impl BoolExpr {
    /// Number of operator and leaf nodes.
    pub fn size(&self) -> usize {
        match self {
            BoolExpr::Const(_) | BoolExpr::Var(_) => 1,
            BoolExpr::Not(inner) => 1 + inner.size(),
            BoolExpr::Binary(_, lhs, rhs) => 1 + lhs.size() + rhs.size(),
        }
    }

    /// Pretty-print the expression with variable names taken from `vars`.
    /// Parentheses are placed around every compound operand.
    pub fn to_doc<'a>(&'a self, vars: &'a VariableList) -> RcDoc<'a> {
        match self {
            BoolExpr::Const(b) => RcDoc::text(if *b { "'1'" } else { "'0'" }),
            BoolExpr::Var(i) => match vars.get(*i) {
                Some(name) => name.to_doc(),
                None => RcDoc::text(format!("#{i}")),
            },
            BoolExpr::Not(inner) => RcDoc::text("not ").append(inner.operand_doc(vars)),
            BoolExpr::Binary(op, lhs, rhs) => lhs
                .operand_doc(vars)
                .append(RcDoc::line())
                .append(op.to_doc())
                .append(" ")
                .append(rhs.operand_doc(vars))
                .group(),
        }
    }

    fn operand_doc<'a>(&'a self, vars: &'a VariableList) -> RcDoc<'a> {
        match self {
            BoolExpr::Const(_) | BoolExpr::Var(_) => self.to_doc(vars),
            _ => RcDoc::text("(")
                .append(self.to_doc(vars).nest(1))
                .append(")"),
        }
    }
}
