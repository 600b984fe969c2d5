//! Token scan of an expression region.
//!
//! The scan runs before parsing so that stray symbols are reported as unsupported
//! operators at their own position, and so that the free variables are known
//! without relying on the parse succeeding.

use std::ops::Range;

use winnow::{
    LocatingSlice, ModalResult, Parser,
    combinator::{alt, delimited, preceded, repeat, terminated},
    token::{one_of, take, take_while},
};

use crate::text::{Name, Spanned, char_offset, is_keyword, is_word_char, trivia, word};

/// A lexical token of a boolean expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// One of the reserved operator keywords
    Keyword(String),
    /// A variable name
    Ident(Name),
    /// A bit literal `'0'` or `'1'`
    Bit(bool),
    /// Anything else, kept verbatim for diagnostics
    Unsupported(String),
}

fn classify(w: &str) -> Token {
    if is_keyword(w) {
        Token::Keyword(w.to_owned())
    } else if w.starts_with(|c: char| c.is_ascii_alphabetic()) {
        Token::Ident(Name::new(w))
    } else {
        Token::Unsupported(w.to_owned())
    }
}

/// Parser for a bit literal `'0'` or `'1'`.
pub fn bit_literal(input: &mut LocatingSlice<&str>) -> ModalResult<bool> {
    delimited('\'', one_of(['0', '1']), '\'')
        .map(|c: char| c == '1')
        .parse_next(input)
}

fn token(input: &mut LocatingSlice<&str>) -> ModalResult<Spanned<Range<usize>, Token>> {
    preceded(
        trivia,
        alt((
            '('.value(Token::LParen),
            ')'.value(Token::RParen),
            bit_literal.map(Token::Bit),
            word.map(classify),
            take_while(1.., |c: char| {
                !is_word_char(c) && !matches!(c, ' ' | '\t' | '\r' | '\n' | '(' | ')')
            })
            .map(|s: &str| Token::Unsupported(s.to_owned())),
        ))
        .with_span(),
    )
    .map(|(inner, span)| Spanned { inner, span })
    .parse_next(input)
}

/// Scan `source[range]` into tokens. Spans are byte offsets into `source`.
pub fn tokenize(source: &str, range: Range<usize>) -> Vec<Spanned<Range<usize>, Token>> {
    let region = &source[..range.end];
    preceded(
        take(char_offset(source, range.start)),
        terminated(repeat(0.., token), trivia),
    )
    .parse(LocatingSlice::new(region))
    // Every non-whitespace character starts some token, so the scan cannot fail.
    .unwrap_or_default()
}

/// The first unsupported token, if any.
pub fn first_unsupported(
    tokens: &[Spanned<Range<usize>, Token>],
) -> Option<&Spanned<Range<usize>, Token>> {
    tokens
        .iter()
        .find(|t| matches!(t.inner, Token::Unsupported(_)))
}

/// Iterator over the identifiers in a token list, in textual order.
pub fn identifiers(tokens: &[Spanned<Range<usize>, Token>]) -> impl Iterator<Item = &Name> {
    tokens.iter().filter_map(|t| match &t.inner {
        Token::Ident(name) => Some(name),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        tokenize(src, 0..src.len())
            .into_iter()
            .map(|t| t.inner)
            .collect()
    }

    #[test]
    fn scans_keywords_identifiers_and_literals() {
        assert_eq!(
            kinds("not (a xor b1) and '1'"),
            vec![
                Token::Keyword("not".to_owned()),
                Token::LParen,
                Token::Ident(Name::new("a")),
                Token::Keyword("xor".to_owned()),
                Token::Ident(Name::new("b1")),
                Token::RParen,
                Token::Keyword("and".to_owned()),
                Token::Bit(true),
            ]
        );
    }

    #[test]
    fn unsupported_symbols_keep_their_span() {
        let src = "x <= a & b;";
        let tokens = tokenize(src, 4..10);
        let bad = first_unsupported(&tokens).unwrap();
        assert_eq!(bad.inner, Token::Unsupported("&".to_owned()));
        assert_eq!(bad.span, 7..8);
    }

    #[test]
    fn numbers_are_unsupported() {
        assert_eq!(kinds("2"), vec![Token::Unsupported("2".to_owned())]);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("a -- and b\n or c"),
            vec![
                Token::Ident(Name::new("a")),
                Token::Keyword("or".to_owned()),
                Token::Ident(Name::new("c")),
            ]
        );
    }
}
