//! Pure functions that categorize constraints and indexes.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use itertools::Itertools;

use crate::schema::{Constraint, ConstraintKind, Index, Schema, Table, TableId};

/// Points at one constraint of one table.
pub type ConstraintId = (TableId, usize);

/// Python's `repr` of a string, which is how column lists appear in sort keys.
fn repr_str(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        format!("\"{s}\"")
    } else {
        format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

/// A deterministic ordering key, e.g. `F['author_id']` or `Cprice > 0`.
pub fn constraint_sort_key(constraint: &Constraint) -> String {
    match &constraint.kind {
        ConstraintKind::Check { sqltext } => format!("C{sqltext}"),
        _ => format!(
            "{}[{}]",
            &constraint.kind_name()[..1],
            constraint.columns().iter().map(|c| repr_str(c)).join(", ")
        ),
    }
}

/// The table's constraints with their positions, in sort key order.
pub fn sorted_constraints(table: &Table) -> Vec<(usize, &Constraint)> {
    table
        .constraints
        .iter()
        .enumerate()
        .sorted_by_key(|(_, c)| constraint_sort_key(c))
        .collect()
}

/// The table's indexes, ordered by name.
pub fn sorted_indexes(table: &Table) -> Vec<&Index> {
    table
        .indexes
        .iter()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect()
}

/// A table that only links two other tables: exactly two foreign keys, and every column is
/// part of one of them.
pub fn is_association_table(table: &Table) -> bool {
    table.foreign_keys().count() == 2
        && table
            .columns
            .iter()
            .all(|column| table.has_foreign_key(&column.name))
}

/// Foreign keys from `a` to `b` together with those from `b` to `a`.
///
/// More than one member means that joining the two tables is ambiguous.
pub fn common_foreign_key_constraints(
    schema: &Schema,
    a: TableId,
    b: TableId,
) -> BTreeSet<ConstraintId> {
    let pointing = |from: TableId, to: TableId| {
        schema
            .table(from)
            .foreign_keys()
            .filter(move |(_, fk)| fk.referred_table_id == to)
            .map(move |(i, _)| (from, i))
    };
    pointing(a, b).chain(pointing(b, a)).collect()
}

/// Something that carries a name subject to the naming convention.
#[derive(Debug, Clone, Copy)]
pub enum Named<'a> {
    Constraint(&'a Constraint),
    Index(&'a Index),
}

/// True when the item is unnamed or its name is what the naming convention would produce.
///
/// Such names need not be spelled out by a renderer.
pub fn uses_default_name(
    named: Named,
    table: &Table,
    naming_convention: &BTreeMap<String, String>,
) -> bool {
    let name = match named {
        Named::Constraint(constraint) => constraint.name.as_deref(),
        Named::Index(index) => Some(index.name.as_str()),
    };
    let name = match name {
        Some(name) if !name.is_empty() => name,
        _ => return true,
    };

    let mut values: HashMap<&str, String> = HashMap::new();
    values.insert("table_name", table.name.clone());
    values.insert("constraint_name", name.to_string());

    let columns: &[String] = match named {
        Named::Constraint(constraint) => constraint.columns(),
        Named::Index(index) => &index.columns,
    };
    let is_check = matches!(
        named,
        Named::Constraint(Constraint {
            kind: ConstraintKind::Check { .. },
            ..
        })
    );
    if !is_check {
        for key in ["column_0N_name", "column_0N_label", "column_0N_key"] {
            values.insert(key, columns.concat());
        }
        for key in ["column_0_N_name", "column_0_N_label", "column_0_N_key"] {
            values.insert(key, columns.join("_"));
        }
        if let Some(first) = columns.first() {
            for key in ["column_0_name", "column_0_label", "column_0_key"] {
                values.insert(key, first.clone());
            }
        }
    }

    let key = match named {
        Named::Index(_) => "ix",
        Named::Constraint(constraint) => match &constraint.kind {
            ConstraintKind::Check { .. } => "ck",
            ConstraintKind::Unique { .. } => "uq",
            ConstraintKind::PrimaryKey { .. } => "pk",
            ConstraintKind::ForeignKey(fk) => {
                values.insert("referred_table_name", fk.referred_table.clone());
                values.insert("referred_column_0N_name", fk.referred_columns.concat());
                values.insert("referred_column_0_N_name", fk.referred_columns.join("_"));
                if let Some(first) = fk.referred_columns.first() {
                    values.insert("referred_column_0_name", first.clone());
                }
                "fk"
            }
        },
    };

    match naming_convention.get(key) {
        Some(template) => expand_template(template, &values).as_deref() == Some(name),
        None => false,
    }
}

/// Substitute `%(key)s` tokens. Returns `None` when a key has no value.
fn expand_template(template: &str, values: &HashMap<&str, String>) -> Option<String> {
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('%') {
        expanded.push_str(&rest[..start]);
        let token = &rest[start..];
        if let Some(after) = token.strip_prefix("%%") {
            expanded.push('%');
            rest = after;
            continue;
        }
        let inner = token.strip_prefix("%(")?;
        let end = inner.find(")s")?;
        expanded.push_str(values.get(&inner[..end])?);
        rest = &inner[end + 2..];
    }
    expanded.push_str(rest);
    Some(expanded)
}
