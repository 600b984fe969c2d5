//! Locating the assignment statement `target <= expression;`.

use std::ops::Range;

use winnow::{
    LocatingSlice, ModalResult, Parser,
    combinator::{alt, repeat_till, terminated},
    token::any,
};

use crate::text::{Spanned, comment, trivia, word};

/// Where an assignment sits in the source text.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentSite {
    /// Assigned signal name, as written
    pub target: Spanned<Range<usize>, String>,
    /// Byte range of the right-hand side, excluding the terminating `;`
    pub rhs: Range<usize>,
}

fn head(input: &mut LocatingSlice<&str>) -> ModalResult<Spanned<Range<usize>, String>> {
    terminated(word.with_span(), (trivia, "<="))
        .map(|(w, span): (&str, Range<usize>)| Spanned {
            inner: w.to_owned(),
            span,
        })
        .parse_next(input)
}

/// Skip a comment, a whole word or a single other character.
/// Whole words are skipped so that a target always starts at a word boundary.
fn filler(input: &mut LocatingSlice<&str>) -> ModalResult<()> {
    alt((comment, word.void(), any.void())).parse_next(input)
}

/// Find the first `target <= ... ;` statement in `source`.
pub fn locate(source: &str) -> Option<AssignmentSite> {
    let mut input = LocatingSlice::new(source);
    let ((), (target, statement)) = repeat_till(0.., filler, head.with_span())
        .parse_next(&mut input)
        .ok()?;
    let ((), terminator) = repeat_till(0.., alt((comment, any.void())), ';'.span())
        .parse_next(&mut input)
        .ok()?;
    Some(AssignmentSite {
        rhs: statement.end..terminator.start,
        target,
    })
}
