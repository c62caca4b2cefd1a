use crate::{
    classify::{sorted_constraints, sorted_indexes, uses_default_name, Named},
    schema::{Column, ConstraintKind, Table},
    Options,
};

use super::model::{ColumnDeclaration, ForeignKeyTarget, TableDeclaration};

impl From<&Column> for ColumnDeclaration {
    fn from(column: &Column) -> Self {
        ColumnDeclaration {
            name: column.name.clone(),
            column_type: column.column_type.clone(),
            nullable: column.nullable,
            primary_key: false,
            unique: false,
            index: false,
            foreign_key: None,
            autoincrement: column.autoincrement,
            server_default: column.server_default.clone(),
            comment: column.comment.clone(),
            sequence: column.sequence.clone(),
        }
    }
}

pub(crate) fn build_declaration(table: &Table, options: &Options) -> TableDeclaration {
    let convention = &options.naming_convention;
    let mut columns: Vec<ColumnDeclaration> =
        table.columns.iter().map(ColumnDeclaration::from).collect();
    let position = |name: &str| table.column_lookup.get(name).copied();

    let mut constraints = vec![];
    for (_, constraint) in sorted_constraints(table) {
        let is_default_named = uses_default_name(Named::Constraint(constraint), table, convention);
        if is_default_named {
            match &constraint.kind {
                ConstraintKind::PrimaryKey { columns: pk_columns } => {
                    for id in pk_columns.iter().filter_map(|c| position(c)) {
                        columns[id].primary_key = true;
                    }
                    continue;
                }
                ConstraintKind::ForeignKey(fk) if fk.columns.len() == 1 => {
                    if let Some(id) = position(&fk.columns[0]) {
                        columns[id].foreign_key = Some(ForeignKeyTarget {
                            column: format!("{}.{}", fk.referred_table, fk.referred_columns[0]),
                            options: fk.options.clone(),
                        });
                        continue;
                    }
                }
                ConstraintKind::Unique { columns: unique_columns } if unique_columns.len() == 1 => {
                    if let Some(id) = position(&unique_columns[0]) {
                        columns[id].unique = true;
                        continue;
                    }
                }
                _ => {}
            }
        }
        let mut declared = constraint.clone();
        if is_default_named {
            declared.name = None;
        }
        constraints.push(declared);
    }

    let mut indexes = vec![];
    for index in sorted_indexes(table) {
        let folded_into = match index.columns.as_slice() {
            [column] if uses_default_name(Named::Index(index), table, convention) => {
                position(column)
            }
            _ => None,
        };
        match folded_into {
            Some(id) => {
                columns[id].index = true;
                columns[id].unique |= index.unique;
            }
            None => indexes.push(index.clone()),
        }
    }

    TableDeclaration {
        table_name: table.name.clone(),
        schema: table.schema.clone(),
        comment: table.comment.clone(),
        columns,
        constraints,
        indexes,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use crate::schema::{primitive_schema::PrimitiveSchema, Schema};

    use super::*;

    fn schema_from(value: serde_json::Value) -> Schema {
        let primitive_schema: PrimitiveSchema = serde_json::from_value(value).unwrap();
        Schema::try_from(primitive_schema).unwrap()
    }

    fn simple_items() -> Schema {
        schema_from(json!({"tables": [
            {"name": "owners", "columns": [{"name": "id", "primary_key": true}]},
            {
                "name": "simple_items",
                "columns": [
                    {"name": "id"},
                    {"name": "owner_id"},
                    {"name": "number"},
                    {"name": "text"}
                ],
                "constraints": [
                    {"type": "primary_key", "columns": ["id"]},
                    {
                        "type": "foreign_key",
                        "columns": ["owner_id"],
                        "referred_table": "owners",
                        "referred_columns": ["id"],
                        "ondelete": "CASCADE"
                    },
                    {"type": "unique", "name": "uq_number_text", "columns": ["number", "text"]},
                    {"type": "check", "name": "positive", "sqltext": "number > 0"}
                ],
                "indexes": [
                    {"name": "ix_text_number", "columns": ["text", "number"], "unique": true},
                    {"name": "ix_text", "columns": ["text"], "unique": true},
                    {"name": "ix_number", "columns": ["number"]},
                    {"name": "idx_owner", "columns": ["owner_id"]}
                ]
            }
        ]}))
    }

    #[test]
    fn test_folding() {
        let schema = simple_items();
        let table = schema.get_table_by_name("simple_items").unwrap();
        let declaration = build_declaration(table, &Options::default());

        let id = &declaration.columns[0];
        assert!(id.primary_key);
        let owner_id = &declaration.columns[1];
        let fk = owner_id.foreign_key.as_ref().unwrap();
        assert_eq!(fk.column, "owners.id");
        assert_eq!(fk.options.ondelete.as_deref(), Some("CASCADE"));
        assert!(!owner_id.index);
        let number = &declaration.columns[2];
        assert!(number.index && !number.unique);
        let text = &declaration.columns[3];
        assert!(text.index && text.unique);

        // Sorted by key: "Cnumber > 0" before "U['number', 'text']"
        assert_eq!(declaration.constraints.len(), 2);
        assert_eq!(declaration.constraints[0].name.as_deref(), Some("positive"));
        assert_eq!(
            declaration.constraints[1].name.as_deref(),
            Some("uq_number_text")
        );
        let index_names: Vec<&str> = declaration
            .indexes
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(index_names, vec!["idx_owner", "ix_text_number"]);
    }

    #[test]
    fn test_named_primary_key_is_kept() {
        let schema = schema_from(json!({"tables": [{
            "name": "things",
            "columns": [{"name": "id"}],
            "constraints": [{"type": "primary_key", "name": "things_pkey", "columns": ["id"]}]
        }]}));
        let table = &schema.tables[0];
        let declaration = build_declaration(table, &Options::default());
        assert!(!declaration.columns[0].primary_key);
        assert_eq!(declaration.constraints.len(), 1);

        let options = Options {
            naming_convention: BTreeMap::from([(
                "pk".to_string(),
                "%(table_name)s_pkey".to_string(),
            )]),
            ..Options::default()
        };
        let declaration = build_declaration(table, &options);
        assert!(declaration.columns[0].primary_key);
        assert!(declaration.constraints.is_empty());
    }
}
