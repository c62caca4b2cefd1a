use chumsky::prelude::*;

use crate::{ast::SequenceRef, parser::utils::*, tokens::*};

pub fn sequence_default() -> impl Psr<SequenceRef> {
    exactly(NEXTVAL_OPEN)
        .ignore_then(
            sequence_name_part()
                .separated_by(just(QUALIFIER_SEPARATOR))
                .at_least(1),
        )
        .then_ignore(exactly(NEXTVAL_CLOSE))
        .then_ignore(end())
        .try_map(|mut parts, span| {
            let name = parts.pop().unwrap_or_default();
            let schema = parts.pop();
            if !parts.is_empty() {
                return Err(Simple::custom(span, "too many qualifiers"));
            }
            Ok(SequenceRef { schema, name })
        })
}

fn sequence_name_part() -> impl Psr<String> {
    quoted(DB_IDENTIFIER_QUOTE).or(filter(|c: &char| {
        *c != QUALIFIER_SEPARATOR && *c != STRING_QUOTE && *c != DB_IDENTIFIER_QUOTE
    })
    .repeated()
    .at_least(1)
    .collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(schema: Option<&str>, name: &str) -> SequenceRef {
        SequenceRef {
            schema: schema.map(str::to_string),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_unqualified_sequence() {
        assert_eq!(
            sequence_default().parse("nextval('simple_items_id_seq'::regclass)"),
            Ok(seq(None, "simple_items_id_seq"))
        );
    }

    #[test]
    fn test_qualified_sequence() {
        assert_eq!(
            sequence_default().parse("nextval('myschema.test_seq'::regclass)"),
            Ok(seq(Some("myschema"), "test_seq"))
        );
        assert_eq!(
            sequence_default().parse(r#"nextval('myschema."test_seq"'::regclass)"#),
            Ok(seq(Some("myschema"), "test_seq"))
        );
        assert_eq!(
            sequence_default().parse(r#"nextval('"my.schema".test_seq'::regclass)"#),
            Ok(seq(Some("my.schema"), "test_seq"))
        );
    }

    #[test]
    fn test_not_a_sequence() {
        assert!(sequence_default().parse("now()").is_err());
        assert!(sequence_default().parse(r#"nextval("foo")"#).is_err());
        assert!(sequence_default()
            .parse("nextval('a.b.c'::regclass)")
            .is_err());
    }
}
