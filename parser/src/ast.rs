/// A `<column> IN (<item>, ...)` check constraint as written in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct InList {
    /// The column reference, split on its qualifier separators. The last part names the column.
    pub column: Vec<String>,
    pub items: Vec<Literal>,
    /// Every separator between items is exactly `, `
    pub spaced: bool,
}

impl InList {
    pub fn column_name(&self) -> &str {
        self.column.last().map(String::as_str).unwrap_or_default()
    }

    /// True for the `IN (0, 1)` shape used to emulate booleans, written exactly that way.
    pub fn is_boolean(&self) -> bool {
        self.spaced && self.items == [Literal::Integer(0), Literal::Integer(1)]
    }

    /// The string members of the list, when every item is a string literal.
    pub fn enum_values(&self) -> Option<Vec<String>> {
        if self.items.is_empty() {
            return None;
        }
        self.items
            .iter()
            .map(|item| match item {
                Literal::String(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    String(String),
    Other(String),
}

/// The sequence named by a `nextval('<sequence>'::regclass)` column default.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRef {
    pub schema: Option<String>,
    pub name: String,
}
