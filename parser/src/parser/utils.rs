use chumsky::prelude::*;

use crate::tokens::*;

/// `Psr` is short for "Parser". The short name avoids a clash with Chumsky's own `Parser` trait,
/// which it wraps.
///
/// Without [trait aliases][1] we cannot write this as a type alias:
///
/// ```rs
/// pub type Psr<T> = Parser<char, T, Error = Simple<char>> + Clone + 'static;
/// ```
///
/// [1]: https://github.com/rust-lang/rust/issues/41517
pub trait Psr<T>: Parser<char, T, Error = Simple<char>> + Clone + 'static {}
impl<S, T> Psr<T> for S where S: Parser<char, T, Error = Simple<char>> + Clone + 'static {}

pub fn exactly(s: &str) -> impl Psr<String> {
    just(s.chars().collect::<Vec<char>>()).collect::<String>()
}

/// A run of text enclosed in `quote`.
///
/// Inside the quotes, a backslash escapes the character after it and a doubled quote stands for
/// a single one.
pub fn quoted(quote: char) -> impl Psr<String> {
    just(quote)
        .ignore_then(
            filter(move |c| *c != STRING_ESCAPE_PREFIX && *c != quote)
                .or(escape())
                .or(just(quote).then_ignore(just(quote)))
                .repeated(),
        )
        .then_ignore(just(quote))
        .collect::<String>()
}

pub fn escape() -> impl Psr<char> {
    just(STRING_ESCAPE_PREFIX).ignore_then(any())
}

/// One part of a dotted database identifier, either bare or quoted.
pub fn identifier_part() -> impl Psr<String> {
    quoted(DB_IDENTIFIER_QUOTE)
        .or(quoted(DB_IDENTIFIER_QUOTE_ALT))
        .or(filter(|c: &char| {
            !c.is_whitespace()
                && *c != QUALIFIER_SEPARATOR
                && *c != DB_IDENTIFIER_QUOTE
                && *c != DB_IDENTIFIER_QUOTE_ALT
                && *c != STRING_QUOTE
                && *c != LIST_OPEN
                && *c != LIST_CLOSE
        })
        .repeated()
        .at_least(1)
        .collect::<String>())
}

pub fn qualified_identifier() -> impl Psr<Vec<String>> {
    identifier_part()
        .separated_by(just(QUALIFIER_SEPARATOR))
        .at_least(1)
}
