//! Extraction of the boolean expression and its free variables from HDL source.
//!
//! The source must contain an assignment `target <= expression;`. Only the first
//! such statement is used. The whole text is ASCII-lowercased before scanning,
//! which keeps byte offsets intact, so every span reported here indexes the
//! caller's original text.

use std::ops::Range;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;
use tracing::debug;
use winnow::{
    LocatingSlice, Parser,
    combinator::{preceded, terminated},
    error::ContextError,
    token::take,
};

use crate::{
    lexer,
    raw_syntax::{ExprR, expr, locate},
    text::{Spanned, ToDoc, char_offset, trivia},
    typed_syntax::BoolExpr,
    variables::VariableList,
};

/// Errors raised while extracting the expression.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
pub enum ExtractError {
    /// No `target <= expression;` statement in the source.
    #[error("no assignment of the form `target <= expression;` found")]
    #[diagnostic(
        code(extract::no_assignment),
        help("the input needs one statement such as `out <= a and (b xor c);`")
    )]
    NoAssignmentFound,

    /// A token that is neither a variable, a literal, a parenthesis nor a keyword.
    #[error("unsupported operator `{token}`")]
    #[diagnostic(
        code(extract::unsupported_operator),
        help("use identifiers, parentheses, '0', '1' and the keywords and, or, not, xor, nand, nor, xnor")
    )]
    UnsupportedOperator {
        token: String,
        /// Location of the token
        #[label("not a variable or boolean keyword")]
        span: SourceSpan,
    },

    /// The tokens are all valid but do not form an expression.
    #[error("malformed expression: {message}")]
    #[diagnostic(code(extract::malformed_expression))]
    MalformedExpression {
        /// Parser description of the problem
        message: String,
        /// Where parsing stopped
        #[label("parsing stopped here")]
        span: SourceSpan,
    },

    /// A variable that is not in the variable list the expression was resolved against.
    #[error("unknown variable `{name}`")]
    #[diagnostic(code(extract::unknown_variable))]
    UnknownVariable {
        name: String,
        /// Location of the variable
        #[label("not in the variable list")]
        span: SourceSpan,
    },
}

/// A parsed and resolved assignment statement.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    /// The assigned signal, with its span
    pub target: Spanned<Range<usize>, String>,
    /// The right-hand side as parsed
    pub raw: ExprR<Range<usize>>,
    /// The right-hand side resolved against `variables`
    pub expr: BoolExpr,
    /// Sorted free variables of the right-hand side
    pub variables: VariableList,
}

fn describe(err: &ContextError) -> String {
    let message = err.to_string();
    if message.is_empty() {
        "unexpected input".to_owned()
    } else {
        message.replace('\n', "; ")
    }
}

/// Parse the first assignment in `source`.
pub fn parse_assignment(source: &str) -> Result<Assignment, ExtractError> {
    let normalized = source.to_ascii_lowercase();
    let site = locate(&normalized).ok_or(ExtractError::NoAssignmentFound)?;

    let tokens = lexer::tokenize(&normalized, site.rhs.clone());
    if let Some(bad) = lexer::first_unsupported(&tokens) {
        return Err(ExtractError::UnsupportedOperator {
            token: source[bad.span.clone()].to_owned(),
            span: bad.span.clone().into(),
        });
    }
    let variables = VariableList::from_names(lexer::identifiers(&tokens).cloned());

    let region = &normalized[..site.rhs.end];
    let raw = preceded(
        take(char_offset(&normalized, site.rhs.start)),
        terminated(expr, trivia),
    )
    .parse(LocatingSlice::new(region))
    .map_err(|e| ExtractError::MalformedExpression {
        message: describe(e.inner()),
        span: (e.offset(), 0).into(),
    })?;
    let expr = raw.resolve(&variables)?;

    debug!(
        target_signal = %site.target.inner,
        parsed = %raw.to_doc().pretty(80),
        variables = %variables,
        nodes = expr.size(),
        "extracted assignment"
    );
    Ok(Assignment {
        target: Spanned {
            inner: source[site.target.span.clone()].to_owned(),
            span: site.target.span,
        },
        raw,
        expr,
        variables,
    })
}

/// Extract the expression and its sorted variable list from `source`.
pub fn extract(source: &str) -> Result<(BoolExpr, VariableList), ExtractError> {
    parse_assignment(source).map(|a| (a.expr, a.variables))
}
