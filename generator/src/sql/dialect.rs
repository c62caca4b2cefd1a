use modelgen_parser::ast::SequenceRef;

use crate::schema::ColumnType;

pub trait Dialect {
    fn name(&self) -> &'static str;

    /// Render a column type the way the dialect's DDL spells it.
    ///
    /// Returns `None` when the dialect cannot express the type.
    fn compile_type(&self, column_type: &ColumnType) -> Option<String>;

    /// Types that a native type may be replaced with, most specific first.
    ///
    /// * `name` - The native type name as reflected
    /// * `args` - The native type arguments, e.g. a length or a precision
    fn adaptation_candidates(&self, name: &str, args: &[String]) -> Vec<ColumnType>;

    /// True when values of the type are stored as strings.
    fn is_textual(&self, column_type: &ColumnType) -> bool {
        column_type.is_textual()
    }

    /// Extract the sequence from a column default that draws from one.
    fn decode_sequence(&self, _server_default: &str) -> Option<SequenceRef> {
        None
    }
}

pub(crate) fn with_args(name: &str, args: &[String]) -> String {
    if args.is_empty() {
        name.to_string()
    } else {
        format!("{}({})", name, args.join(", "))
    }
}

pub(crate) fn with_optional_args(name: &str, args: &[Option<u32>]) -> String {
    let args: Vec<String> = args.iter().flatten().map(u32::to_string).collect();
    with_args(name, &args)
}

pub(crate) fn parse_arg(args: &[String], index: usize) -> Option<u32> {
    args.get(index).and_then(|a| a.trim().parse().ok())
}
