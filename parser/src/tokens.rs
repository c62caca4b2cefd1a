pub const STRING_QUOTE: char = '\'';
pub const STRING_ESCAPE_PREFIX: char = '\\';
pub const DB_IDENTIFIER_QUOTE: char = '"';
pub const DB_IDENTIFIER_QUOTE_ALT: char = '`';
pub const QUALIFIER_SEPARATOR: char = '.';
pub const LIST_OPEN: char = '(';
pub const LIST_CLOSE: char = ')';
pub const LIST_ITEM_SEPARATOR: char = ',';
/// The separator as the catalog usually writes it
pub const LIST_SEPARATOR: &str = ", ";
pub const IN_OPERATOR: &str = " IN (";
pub const NEXTVAL_OPEN: &str = "nextval('";
pub const NEXTVAL_CLOSE: &str = "'::regclass)";
