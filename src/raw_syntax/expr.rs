//! Raw syntax boolean expressions.

use std::ops::Range;

use pretty::RcDoc;
use winnow::{
    LocatingSlice, ModalResult, Parser,
    combinator::{alt, cut_err, delimited, preceded, repeat},
    error::{StrContext, StrContextValue},
};

use crate::{
    extract::ExtractError,
    lexer::bit_literal,
    text::{HasParser, Name, Spanned, ToDoc, keyword, trivia},
    typed_syntax::{BinOp, BoolExpr},
    variables::VariableList,
};

/// Raw syntax expression with text span.
pub type ExprR<S> = Spanned<S, ExprRInner<S>>;

/// Raw syntax expression without text span.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprRInner<S> {
    /// An expression enclosed in parentheses
    Brackets(Box<ExprR<S>>),
    /// A bit literal, `'0'` or `'1'`
    Bit(bool),
    /// A free variable
    Var(Name),
    /// Negation "not e"
    Not(Box<ExprR<S>>),
    /// A binary operator application "lhs op rhs"
    Binary {
        /// The operator
        op: BinOp,
        /// Left operand
        lhs: Box<ExprR<S>>,
        /// Right operand
        rhs: Box<ExprR<S>>,
    },
}

impl<S> ToDoc for ExprRInner<S> {
    fn to_doc(&self) -> RcDoc {
        match self {
            ExprRInner::Brackets(inner) => RcDoc::text("(")
                .append(RcDoc::line_().append(inner.to_doc()).nest(2))
                .append(RcDoc::line_())
                .append(")")
                .group(),
            ExprRInner::Bit(b) => RcDoc::text(if *b { "'1'" } else { "'0'" }),
            ExprRInner::Var(name) => name.to_doc(),
            ExprRInner::Not(inner) => RcDoc::text("not ").append(inner.to_doc()),
            ExprRInner::Binary { op, lhs, rhs } => lhs
                .to_doc()
                .append(RcDoc::line())
                .append(op.to_doc())
                .append(" ")
                .append(rhs.to_doc())
                .group(),
        }
    }
}

impl ExprR<Range<usize>> {
    /// Resolve variable names to positions in `vars`, producing an evaluable expression.
    pub fn resolve(&self, vars: &VariableList) -> Result<BoolExpr, ExtractError> {
        match &self.inner {
            ExprRInner::Brackets(inner) => inner.resolve(vars),
            ExprRInner::Bit(b) => Ok(BoolExpr::Const(*b)),
            ExprRInner::Var(name) => vars.position(name).map(BoolExpr::Var).ok_or_else(|| {
                ExtractError::UnknownVariable {
                    name: name.to_string(),
                    span: self.span.clone().into(),
                }
            }),
            ExprRInner::Not(inner) => Ok(BoolExpr::Not(Box::new(inner.resolve(vars)?))),
            ExprRInner::Binary { op, lhs, rhs } => Ok(BoolExpr::Binary(
                *op,
                Box::new(lhs.resolve(vars)?),
                Box::new(rhs.resolve(vars)?),
            )),
        }
    }
}

type Level = fn(&mut LocatingSlice<&str>) -> ModalResult<ExprR<Range<usize>>>;
type OpParser = fn(&mut LocatingSlice<&str>) -> ModalResult<BinOp>;

/// Parse a left-associative chain `operand (op operand)*`.
fn left_assoc(
    input: &mut LocatingSlice<&str>,
    operand: Level,
    op: OpParser,
) -> ModalResult<ExprR<Range<usize>>> {
    let first = operand(input)?;
    let rest: Vec<(BinOp, ExprR<Range<usize>>)> = repeat(
        0..,
        (
            preceded(trivia, op),
            cut_err(operand).context(StrContext::Label("operand")),
        ),
    )
    .parse_next(input)?;
    Ok(rest.into_iter().fold(first, |lhs, (op, rhs)| Spanned {
        span: lhs.span.start..rhs.span.end,
        inner: ExprRInner::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
    }))
}

fn or_op(input: &mut LocatingSlice<&str>) -> ModalResult<BinOp> {
    alt((keyword("or").value(BinOp::Or), keyword("nor").value(BinOp::Nor))).parse_next(input)
}

fn and_op(input: &mut LocatingSlice<&str>) -> ModalResult<BinOp> {
    alt((
        keyword("and").value(BinOp::And),
        keyword("nand").value(BinOp::Nand),
    ))
    .parse_next(input)
}

fn xor_op(input: &mut LocatingSlice<&str>) -> ModalResult<BinOp> {
    alt((
        keyword("xor").value(BinOp::Xor),
        keyword("xnor").value(BinOp::Xnor),
    ))
    .parse_next(input)
}

/// Parser for expressions.
///
/// Precedence from loosest to tightest: `or`/`nor`, `and`/`nand`, `not`, `xor`/`xnor`.
pub fn expr(input: &mut LocatingSlice<&str>) -> ModalResult<ExprR<Range<usize>>> {
    left_assoc(input, and_level, or_op)
}

fn and_level(input: &mut LocatingSlice<&str>) -> ModalResult<ExprR<Range<usize>>> {
    left_assoc(input, not_level, and_op)
}

fn not_level(input: &mut LocatingSlice<&str>) -> ModalResult<ExprR<Range<usize>>> {
    trivia.parse_next(input)?;
    alt((
        preceded(keyword("not"), cut_err(not_level))
            .with_span()
            .map(|(inner, span)| Spanned {
                inner: ExprRInner::Not(Box::new(inner)),
                span,
            }),
        xor_level,
    ))
    .parse_next(input)
}

fn xor_level(input: &mut LocatingSlice<&str>) -> ModalResult<ExprR<Range<usize>>> {
    left_assoc(input, atom, xor_op)
}

fn atom(input: &mut LocatingSlice<&str>) -> ModalResult<ExprR<Range<usize>>> {
    trivia.parse_next(input)?;
    alt((
        delimited(
            '(',
            cut_err(expr),
            cut_err(preceded(trivia, ')'))
                .context(StrContext::Expected(StrContextValue::CharLiteral(')'))),
        )
        .with_span()
        .map(|(inner, span)| Spanned {
            inner: ExprRInner::Brackets(Box::new(inner)),
            span,
        }),
        bit_literal.with_span().map(|(b, span)| Spanned {
            inner: ExprRInner::Bit(b),
            span,
        }),
        Name::parser.with_span().map(|(name, span)| Spanned {
            inner: ExprRInner::Var(name),
            span,
        }),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "variable, bit literal or parenthesised expression",
    )))
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use winnow::combinator::terminated;

    use super::*;

    fn parse(src: &str) -> ExprR<Range<usize>> {
        terminated(expr, trivia)
            .parse(LocatingSlice::new(src))
            .unwrap()
    }

    fn show(src: &str) -> String {
        parse(src).to_doc().pretty(200).to_string()
    }

    fn vars(names: &[&str]) -> VariableList {
        VariableList::from_names(names.iter().map(|n| Name::new(*n)))
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let e = parse("a or b and c");
        let ExprRInner::Binary { op, rhs, .. } = &e.inner else {
            panic!("expected binary, got {e:?}");
        };
        assert_eq!(*op, BinOp::Or);
        assert!(matches!(
            rhs.inner,
            ExprRInner::Binary { op: BinOp::And, .. }
        ));
    }

    #[test]
    fn xor_binds_tighter_than_not() {
        let e = parse("not a xor b");
        let ExprRInner::Not(inner) = &e.inner else {
            panic!("expected not, got {e:?}");
        };
        assert!(matches!(
            inner.inner,
            ExprRInner::Binary { op: BinOp::Xor, .. }
        ));
    }

    #[test]
    fn binary_chains_are_left_associative() {
        let e = parse("a and b and c");
        let ExprRInner::Binary { lhs, rhs, .. } = &e.inner else {
            panic!("expected binary, got {e:?}");
        };
        assert!(matches!(lhs.inner, ExprRInner::Binary { .. }));
        assert_eq!(rhs.inner, ExprRInner::Var(Name::new("c")));
        assert_eq!(e.span, 0..13);
    }

    #[test]
    fn spans_exclude_leading_whitespace() {
        let e = parse("   a");
        assert_eq!(e.span, 3..4);
    }

    #[test]
    fn pretty_printing_round_trips_layout() {
        assert_eq!(show("a  and (b xor  '1')"), "a and (b xor '1')");
        assert_eq!(show("not(a)"), "not (a)");
    }

    #[test]
    fn unbalanced_parentheses_fail() {
        assert!(
            terminated(expr, trivia)
                .parse(LocatingSlice::new("a and (b or c"))
                .is_err()
        );
    }

    #[test]
    fn dangling_operator_fails() {
        assert!(
            terminated(expr, trivia)
                .parse(LocatingSlice::new("a and"))
                .is_err()
        );
    }

    #[test]
    fn resolve_maps_names_to_positions() {
        let e = parse("b and not a").resolve(&vars(&["a", "b"])).unwrap();
        assert_eq!(
            e,
            BoolExpr::Binary(
                BinOp::And,
                Box::new(BoolExpr::Var(1)),
                Box::new(BoolExpr::Not(Box::new(BoolExpr::Var(0)))),
            )
        );
    }

    #[test]
    fn resolve_rejects_foreign_names() {
        let err = parse("a and z").resolve(&vars(&["a"])).unwrap_err();
        assert_eq!(
            err,
            ExtractError::UnknownVariable {
                name: "z".to_owned(),
                span: (6..7).into(),
            }
        );
    }
}
