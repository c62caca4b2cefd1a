use chumsky::prelude::*;

use crate::{
    ast::{InList, Literal},
    parser::utils::*,
    tokens::*,
};

pub fn in_list() -> impl Psr<InList> {
    qualified_identifier()
        .then_ignore(exactly(IN_OPERATOR))
        .then(item())
        .then(separator().then(item()).repeated())
        .then_ignore(just(LIST_CLOSE))
        .then_ignore(any().repeated())
        .map(|((column, first), rest)| {
            let spaced = rest.iter().all(|(separator, _)| separator == LIST_SEPARATOR);
            let mut items = vec![first];
            items.extend(rest.into_iter().map(|(_, item)| item));
            InList {
                column,
                items,
                spaced,
            }
        })
}

/// A comma followed by any amount of whitespace.
fn separator() -> impl Psr<String> {
    just(LIST_ITEM_SEPARATOR)
        .chain(filter(|c: &char| c.is_whitespace()).repeated())
        .collect::<String>()
}

fn item() -> impl Psr<Literal> {
    quoted(STRING_QUOTE).map(Literal::String).or(filter(|c: &char| {
        *c != LIST_CLOSE && *c != LIST_ITEM_SEPARATOR
    })
    .repeated()
    .at_least(1)
    .collect::<String>()
    .map(|text| match text.trim().parse::<i64>() {
        Ok(value) => Literal::Integer(value),
        Err(_) => Literal::Other(text),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<Literal> {
        values
            .iter()
            .map(|v| Literal::String(v.to_string()))
            .collect()
    }

    #[test]
    fn test_boolean_list() {
        let list = in_list().parse("number IN (0, 1)").unwrap();
        assert_eq!(list.column, vec!["number".to_string()]);
        assert_eq!(list.items, vec![Literal::Integer(0), Literal::Integer(1)]);
        assert!(list.is_boolean());
        assert_eq!(list.enum_values(), None);
    }

    #[test]
    fn test_integer_list_is_not_boolean() {
        let list = in_list().parse("number IN (0, 1, 2)").unwrap();
        assert!(!list.is_boolean());
        assert_eq!(list.enum_values(), None);
    }

    #[test]
    fn test_enum_list_with_escaped_quote() {
        let list = in_list()
            .parse(r"simple_items.enum IN ('A', '\'B', 'C')")
            .unwrap();
        assert_eq!(list.column_name(), "enum");
        assert_eq!(list.items, strings(&["A", "'B", "C"]));
        assert_eq!(
            list.enum_values(),
            Some(vec!["A".to_string(), "'B".to_string(), "C".to_string()])
        );
    }

    #[test]
    fn test_compact_separators() {
        let list = in_list().parse("status IN ('active','inactive')").unwrap();
        assert!(!list.spaced);
        assert_eq!(list.items, strings(&["active", "inactive"]));
        let list = in_list().parse("status IN ('a',\n    'b')").unwrap();
        assert_eq!(list.enum_values(), Some(vec!["a".to_string(), "b".to_string()]));

        let list = in_list().parse("flag IN (0,1)").unwrap();
        assert_eq!(list.items, vec![Literal::Integer(0), Literal::Integer(1)]);
        assert!(!list.is_boolean());
    }

    #[test]
    fn test_quoted_qualifiers() {
        let list = in_list()
            .parse(r#""public"."simple items"."my col" IN ('x')"#)
            .unwrap();
        assert_eq!(
            list.column,
            vec![
                "public".to_string(),
                "simple items".to_string(),
                "my col".to_string()
            ]
        );
        assert_eq!(list.column_name(), "my col");
    }

    #[test]
    fn test_trailing_text_is_ignored() {
        let list = in_list().parse("flag IN (0, 1) AND flag IS NOT NULL").unwrap();
        assert!(list.is_boolean());
    }

    #[test]
    fn test_mixed_items() {
        let list = in_list().parse("code IN ('a', 2, now())").unwrap();
        assert_eq!(list.enum_values(), None);
        assert!(in_list().parse("code IN ('a', 2)").unwrap().items[1] == Literal::Integer(2));
    }

    #[test]
    fn test_rejects_other_expressions() {
        assert!(in_list().parse("number > 5").is_err());
        assert!(in_list().parse("number IN ()").is_err());
        assert!(in_list().parse("number in (0, 1)").is_err());
    }
}
