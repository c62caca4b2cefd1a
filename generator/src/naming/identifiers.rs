use crate::errors::{Error, ErrorKind, Result};

use super::{inflect::Inflector, keywords::is_keyword};

/// The name that would shadow the generated module's schema container.
const METADATA: &str = "metadata";

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Turn a raw database identifier into a valid attribute or class identifier.
pub fn to_valid_identifier(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(Error::new(ErrorKind::EmptyIdentifier {
            context: "identifier".to_string(),
        }));
    }
    let mut identifier = String::with_capacity(name.len());
    let mut in_invalid_run = false;
    for c in name.chars() {
        if is_word_char(c) {
            identifier.push(c);
            in_invalid_run = false;
        } else if !in_invalid_run {
            identifier.push('_');
            in_invalid_run = true;
        }
    }
    let starts_with_digit = identifier.starts_with(|c: char| c.is_ascii_digit());
    if starts_with_digit || is_keyword(&identifier) {
        identifier.insert(0, '_');
    } else if identifier == METADATA {
        identifier.push('_');
    }
    Ok(identifier)
}

/// Derive a class name from a table name: `simple_items` becomes `SimpleItem`.
///
/// * `prefix` - Removed from the table name first, unless that would leave nothing
/// * `inflector` - Singularizes the result; `None` keeps it plural
pub fn table_name_to_class_name(
    table_name: &str,
    prefix: &str,
    inflector: Option<&dyn Inflector>,
) -> Result<String> {
    let stripped = match table_name.strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() && !rest.is_empty() => rest,
        _ => table_name,
    };
    let identifier = to_valid_identifier(stripped)?;
    let camel_cased: String = identifier.split('_').map(upper_first).collect();
    // A name made only of underscores has no parts to camel case.
    let name = if camel_cased.is_empty() {
        identifier
    } else {
        camel_cased
    };
    Ok(match inflector {
        Some(inflector) => inflector.singularize(&name),
        None => name,
    })
}

pub fn upper_first(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use crate::naming::{EnglishInflector, FeebleInflector};

    use super::*;

    #[test]
    fn test_to_valid_identifier() {
        assert_eq!(to_valid_identifier("name").unwrap(), "name");
        assert_eq!(to_valid_identifier("first name").unwrap(), "first_name");
        assert_eq!(to_valid_identifier("a - b").unwrap(), "a_b");
        assert_eq!(to_valid_identifier("2fast").unwrap(), "_2fast");
        assert_eq!(to_valid_identifier("class").unwrap(), "_class");
        assert_eq!(to_valid_identifier("metadata").unwrap(), "metadata_");
        assert_eq!(to_valid_identifier("Metadata").unwrap(), "Metadata");
    }

    #[test]
    fn test_empty_identifier() {
        assert!(matches!(
            to_valid_identifier("").unwrap_err().kind(),
            ErrorKind::EmptyIdentifier { .. }
        ));
    }

    #[test]
    fn test_table_name_to_class_name() {
        let feeble = FeebleInflector;
        let english = EnglishInflector;
        assert_eq!(
            table_name_to_class_name("simple_items", "", Some(&feeble)).unwrap(),
            "SimpleItem"
        );
        assert_eq!(
            table_name_to_class_name("simple_items", "", None).unwrap(),
            "SimpleItems"
        );
        assert_eq!(
            table_name_to_class_name("companies", "", Some(&feeble)).unwrap(),
            "Company"
        );
        assert_eq!(
            table_name_to_class_name("addresses", "", Some(&feeble)).unwrap(),
            "Addresse"
        );
        assert_eq!(
            table_name_to_class_name("glass", "", Some(&feeble)).unwrap(),
            "Glass"
        );
        assert_eq!(
            table_name_to_class_name("order statuses", "", Some(&english)).unwrap(),
            "OrderStatus"
        );
        assert_eq!(
            table_name_to_class_name("tbl_users", "tbl_", Some(&feeble)).unwrap(),
            "User"
        );
        assert_eq!(
            table_name_to_class_name("tbl_", "tbl_", None).unwrap(),
            "Tbl"
        );
    }
}
