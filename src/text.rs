//! Helpers for parsing and pretty printing.

use std::fmt;

use pretty::RcDoc;
use winnow::{
    LocatingSlice, ModalResult, Parser,
    ascii::multispace0,
    combinator::{not, repeat, terminated},
    error::{ContextError, ErrMode, StrContext, StrContextValue},
    token::{one_of, take_till, take_while},
};

/// Reserved operator keywords. These never name a variable.
pub const KEYWORDS: [&str; 7] = ["and", "or", "not", "xor", "nand", "nor", "xnor"];

/// Trait for types which can be pretty-printed
pub trait ToDoc {
    /// Produce an `RcDoc` for pretty-printing.
    fn to_doc(&self) -> RcDoc;
}

/// Trait for types which can be parsed
pub trait HasParser: Sized {
    /// Parse an element of this type.
    fn parser(input: &mut LocatingSlice<&str>) -> ModalResult<Self>;
}

/// Wraps data of type `T` in a span of type `S`, locating it in the source text.
/// The span is ignored when printing.
#[derive(Clone, Debug, PartialEq)]
pub struct Spanned<S, T> {
    /// Wrapped data
    pub inner: T,
    /// Text span
    pub span: S,
}

impl<S, T: ToDoc> ToDoc for Spanned<S, T> {
    fn to_doc(&self) -> RcDoc {
        self.inner.to_doc()
    }
}

/// Returns true for characters that may continue an identifier.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Returns true if `word` is one of the reserved operator keywords.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Number of characters before byte offset `byte` of `source`.
/// Parsers consume `char` tokens, so skipping to a byte offset needs this count.
pub fn char_offset(source: &str, byte: usize) -> usize {
    source[..byte].chars().count()
}

/// A VHDL line comment, `--` up to the end of the line.
pub fn comment(input: &mut LocatingSlice<&str>) -> ModalResult<()> {
    ("--", take_till(0.., '\n')).void().parse_next(input)
}

/// Skip whitespace and VHDL line comments.
pub fn trivia(input: &mut LocatingSlice<&str>) -> ModalResult<()> {
    (
        multispace0,
        repeat::<_, _, (), _, _>(0.., (comment, multispace0).void()),
    )
        .void()
        .parse_next(input)
}

/// Parse the keyword `kw`, which must not be followed by another word character.
pub fn keyword<'s>(
    kw: &'static str,
) -> impl Parser<LocatingSlice<&'s str>, &'s str, ErrMode<ContextError>> {
    terminated(kw, not(one_of(is_word_char)))
        .context(StrContext::Expected(StrContextValue::StringLiteral(kw)))
}

/// Parse a maximal run of word characters.
pub fn word<'s>(input: &mut LocatingSlice<&'s str>) -> ModalResult<&'s str> {
    take_while(1.., is_word_char).parse_next(input)
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// An identifier
pub struct Name(String);

impl Name {
    /// Create a name from a string, which is stored as given.
    pub fn new(name: impl Into<String>) -> Self {
        Name(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ToDoc for Name {
    fn to_doc(&self) -> RcDoc {
        RcDoc::text(&self.0)
    }
}

impl HasParser for Name {
    fn parser(input: &mut LocatingSlice<&str>) -> ModalResult<Self> {
        (
            one_of(|c: char| c.is_ascii_alphabetic()),
            take_while(0.., is_word_char),
        )
            .take()
            .verify(|s: &str| !is_keyword(s))
            .map(|s: &str| Name(s.to_owned()))
            .context(StrContext::Label("identifier"))
            .context(StrContext::Expected(StrContextValue::Description(
                "alphanumeric string",
            )))
            .parse_next(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivia_skips_comments_and_whitespace() {
        let mut input = LocatingSlice::new("  -- a comment\n  -- another\n a");
        trivia(&mut input).unwrap();
        assert_eq!(*input, "a");
    }

    #[test]
    fn trivia_handles_comment_at_end_of_input() {
        let mut input = LocatingSlice::new("-- trailing");
        trivia(&mut input).unwrap();
        assert_eq!(*input, "");
    }

    #[test]
    fn keyword_requires_word_boundary() {
        let mut input = LocatingSlice::new("andy");
        assert!(keyword("and").parse_next(&mut input).is_err());
        let mut input = LocatingSlice::new("and y");
        assert_eq!(keyword("and").parse_next(&mut input).unwrap(), "and");
    }

    #[test]
    fn name_rejects_keywords_and_leading_digits() {
        assert!(Name::parser.parse(LocatingSlice::new("xor")).is_err());
        assert!(Name::parser.parse(LocatingSlice::new("1a")).is_err());
        assert_eq!(
            Name::parser.parse(LocatingSlice::new("sel_2")).unwrap(),
            Name::new("sel_2")
        );
    }
}
