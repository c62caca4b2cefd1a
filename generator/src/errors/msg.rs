//! Messages for conditions that are logged rather than raised.

pub fn unparsed_check_constraint(table: &str, sqltext: &str) -> String {
    format!("Check constraint `{sqltext}` on table `{table}` is not an IN list; keeping it.")
}

pub fn check_constraint_unknown_column(table: &str, column: &str) -> String {
    format!("Check constraint on table `{table}` names unknown column `{column}`; keeping it.")
}

pub fn type_adaptation_abandoned(table: &str, column: &str, type_name: &str) -> String {
    format!(
        "Keeping type `{type_name}` of column `{table}.{column}`: no generic type renders the same."
    )
}

pub fn unresolved_foreign_keys(source: &str, target: &str, columns: &[String]) -> String {
    format!(
        "Cannot resolve foreign key columns [{}] for the relationship from `{source}` to `{target}`; the join may need manual correction.",
        columns.join(", ")
    )
}
