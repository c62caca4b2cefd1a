mod parser;

pub mod ast;
pub mod tokens;

use chumsky::Parser;
use parser::{in_list, sequence_default};

/// Parse a check constraint of the form `<column> IN (<item>, ...)`.
///
/// Only a prefix of the input has to match. Anything after the closing parenthesis is ignored.
pub fn parse_in_list(input: &str) -> Result<ast::InList, String> {
    in_list()
        .parse(input)
        .map_err(|_| format!("Not an IN list: `{input}`"))
}

/// Parse a PostgreSQL `nextval('<sequence>'::regclass)` server default.
pub fn parse_sequence_default(input: &str) -> Result<ast::SequenceRef, String> {
    sequence_default()
        .parse(input)
        .map_err(|_| format!("Not a sequence default: `{input}`"))
}
