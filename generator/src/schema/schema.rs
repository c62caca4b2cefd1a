use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::errors::{Error, ErrorKind, Result};

use super::{
    constraints::{Constraint, ConstraintKind, ForeignKey, ForeignKeyOptions, Index},
    primitive_schema::{PrimitiveConstraint, PrimitiveSchema, PrimitiveTable},
    types::ColumnType,
};

pub type TableName = String;
pub type ColumnName = String;
pub type TableId = usize;
pub type ColumnId = usize;

#[derive(Debug, Clone)]
pub struct Schema {
    /// Every `TableId` is an index into this list.
    pub tables: Vec<Table>,
    /// Keys are qualified table names
    pub table_lookup: HashMap<TableName, TableId>,
}

impl Schema {
    pub fn table(&self, id: TableId) -> &Table {
        &self.tables[id]
    }

    pub fn get_table_by_name(&self, qualified_name: &str) -> Option<&Table> {
        self.table_lookup
            .get(qualified_name)
            .map(|id| &self.tables[*id])
    }

    /// Table ids ordered so that referred tables come before the tables referring to them.
    ///
    /// Ties are broken by qualified name. Self references are ignored, and a reference cycle is
    /// broken by taking the first pending table by name.
    pub fn sorted_table_ids(&self) -> Vec<TableId> {
        let dependencies: Vec<BTreeSet<TableId>> = self
            .tables
            .iter()
            .map(|table| {
                table
                    .foreign_keys()
                    .map(|(_, fk)| fk.referred_table_id)
                    .filter(|id| *id != table.id)
                    .collect()
            })
            .collect();
        let mut pending: BTreeMap<TableName, TableId> = self
            .tables
            .iter()
            .map(|table| (table.qualified_name(), table.id))
            .collect();
        let mut done = vec![false; self.tables.len()];
        let mut sorted = Vec::with_capacity(self.tables.len());
        while !pending.is_empty() {
            let next = pending
                .iter()
                .find(|(_, id)| dependencies[**id].iter().all(|d| done[*d]))
                .or_else(|| pending.iter().next())
                .map(|(name, id)| (name.clone(), *id));
            let Some((name, id)) = next else {
                break;
            };
            pending.remove(&name);
            done[id] = true;
            sorted.push(id);
        }
        sorted
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub id: TableId,
    pub name: TableName,
    pub schema: Option<String>,
    pub comment: Option<String>,
    /// In declaration order. A `ColumnId` is an index into this list.
    pub columns: Vec<Column>,
    pub column_lookup: HashMap<ColumnName, ColumnId>,
    pub constraints: Vec<Constraint>,
    pub indexes: Vec<Index>,
}

impl Table {
    pub fn qualified_name(&self) -> TableName {
        qualify(self.schema.as_deref(), &self.name)
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.column_lookup.get(name).map(|id| &self.columns[*id])
    }

    pub fn get_column_mut(&mut self, name: &str) -> Option<&mut Column> {
        let id = *self.column_lookup.get(name)?;
        self.columns.get_mut(id)
    }

    pub fn primary_key(&self) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.is_primary_key())
    }

    pub fn primary_key_columns(&self) -> BTreeSet<&str> {
        self.primary_key()
            .map(|pk| pk.columns().iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Foreign keys along with their position in `constraints`.
    pub fn foreign_keys(&self) -> impl Iterator<Item = (usize, &ForeignKey)> + '_ {
        self.constraints
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_foreign_key().map(|fk| (i, fk)))
    }

    pub fn has_foreign_key(&self, column_name: &str) -> bool {
        self.foreign_keys()
            .any(|(_, fk)| fk.columns.iter().any(|c| c == column_name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub id: ColumnId,
    pub name: ColumnName,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub autoincrement: Option<bool>,
    pub server_default: Option<String>,
    pub comment: Option<String>,
    pub sequence: Option<Sequence>,
}

/// An explicit sequence backing a column's default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sequence {
    pub name: String,
    pub schema: Option<String>,
}

pub fn qualify(schema: Option<&str>, name: &str) -> TableName {
    match schema {
        Some(schema) => format!("{schema}.{name}"),
        None => name.to_string(),
    }
}

fn make_table(id: TableId, primitive_table: &PrimitiveTable) -> Result<Table> {
    let mut columns = Vec::<Column>::new();
    let mut column_lookup = HashMap::<ColumnName, ColumnId>::new();
    for primitive_column in &primitive_table.columns {
        let column_id = columns.len();
        if column_lookup
            .insert(primitive_column.name.clone(), column_id)
            .is_some()
        {
            return Err(Error::new(ErrorKind::DuplicateColumn {
                table: primitive_table.name.clone(),
                column: primitive_column.name.clone(),
            }));
        }
        columns.push(Column {
            id: column_id,
            name: primitive_column.name.clone(),
            column_type: primitive_column.column_type.clone(),
            nullable: primitive_column.nullable,
            primary_key: false,
            autoincrement: primitive_column.autoincrement,
            server_default: primitive_column.server_default.clone(),
            comment: primitive_column.comment.clone(),
            sequence: None,
        });
    }
    Ok(Table {
        id,
        name: primitive_table.name.clone(),
        schema: primitive_table.schema.clone(),
        comment: primitive_table.comment.clone(),
        columns,
        column_lookup,
        constraints: vec![],
        indexes: vec![],
    })
}

struct ConstraintBuilder<'a> {
    tables: &'a [Table],
    table_lookup: &'a HashMap<TableName, TableId>,
    table: &'a Table,
}

impl<'a> ConstraintBuilder<'a> {
    fn check_columns(&self, table: &Table, columns: &[String]) -> Result<()> {
        for column in columns {
            if table.get_column(column).is_none() {
                return Err(Error::new(ErrorKind::UnknownColumn {
                    table: table.qualified_name(),
                    column: column.clone(),
                }));
            }
        }
        Ok(())
    }

    fn malformed(&self, primitive: &PrimitiveConstraint, reason: &str) -> Error {
        Error::new(ErrorKind::MalformedConstraint {
            table: self.table.qualified_name(),
            constraint: primitive.name.clone().unwrap_or_default(),
            reason: reason.to_string(),
        })
    }

    fn build(&self, primitive: PrimitiveConstraint) -> Result<Constraint> {
        let kind = match primitive.kind.as_str() {
            "primary_key" | "unique" => {
                if primitive.columns.is_empty() {
                    return Err(self.malformed(&primitive, "no columns given"));
                }
                self.check_columns(self.table, &primitive.columns)?;
                let columns = primitive.columns.clone();
                if primitive.kind == "primary_key" {
                    ConstraintKind::PrimaryKey { columns }
                } else {
                    ConstraintKind::Unique { columns }
                }
            }
            "foreign_key" => ConstraintKind::ForeignKey(self.build_foreign_key(&primitive)?),
            "check" => match &primitive.sqltext {
                Some(sqltext) => ConstraintKind::Check {
                    sqltext: sqltext.clone(),
                },
                None => return Err(self.malformed(&primitive, "no SQL text given")),
            },
            other => {
                return Err(Error::new(ErrorKind::UnsupportedConstraint {
                    table: self.table.qualified_name(),
                    constraint: primitive.name.clone().unwrap_or_default(),
                    kind: other.to_string(),
                }))
            }
        };
        Ok(Constraint {
            name: primitive.name,
            kind,
        })
    }

    fn build_foreign_key(&self, primitive: &PrimitiveConstraint) -> Result<ForeignKey> {
        let referred_name = primitive
            .referred_table
            .as_deref()
            .ok_or_else(|| self.malformed(primitive, "no referred table given"))?;
        let referred_table_name = qualify(primitive.referred_schema.as_deref(), referred_name);
        let referred_table_id = *self.table_lookup.get(&referred_table_name).ok_or_else(|| {
            Error::new(ErrorKind::UnknownTable {
                table: referred_table_name.clone(),
                referenced_by: self.table.qualified_name(),
            })
        })?;
        let referred_table = &self.tables[referred_table_id];
        if primitive.columns.is_empty() {
            return Err(self.malformed(primitive, "no columns given"));
        }
        if primitive.columns.len() != primitive.referred_columns.len() {
            return Err(self.malformed(
                primitive,
                "local and referred column counts differ",
            ));
        }
        self.check_columns(self.table, &primitive.columns)?;
        self.check_columns(referred_table, &primitive.referred_columns)?;
        Ok(ForeignKey {
            columns: primitive.columns.clone(),
            referred_table_id,
            referred_table: referred_table_name,
            referred_columns: primitive.referred_columns.clone(),
            options: ForeignKeyOptions {
                ondelete: primitive.ondelete.clone(),
                onupdate: primitive.onupdate.clone(),
                deferrable: primitive.deferrable,
                initially: primitive.initially.clone(),
                match_type: primitive.match_type.clone(),
            },
        })
    }
}

impl TryFrom<PrimitiveSchema> for Schema {
    type Error = Error;

    fn try_from(primitive_schema: PrimitiveSchema) -> Result<Schema> {
        let mut tables = Vec::<Table>::new();
        let mut table_lookup = HashMap::<TableName, TableId>::new();
        for primitive_table in &primitive_schema.tables {
            let table = make_table(tables.len(), primitive_table)?;
            let qualified_name = table.qualified_name();
            if table_lookup.insert(qualified_name.clone(), table.id).is_some() {
                return Err(Error::new(ErrorKind::DuplicateTable {
                    table: qualified_name,
                }));
            }
            tables.push(table);
        }

        let mut resolved = Vec::<(Vec<Constraint>, Vec<Index>)>::new();
        for (table, primitive_table) in tables.iter().zip(primitive_schema.tables) {
            let builder = ConstraintBuilder {
                tables: &tables,
                table_lookup: &table_lookup,
                table,
            };
            let mut constraints = primitive_table
                .constraints
                .into_iter()
                .map(|c| builder.build(c))
                .collect::<Result<Vec<_>>>()?;
            match constraints.iter().filter(|c| c.is_primary_key()).count() {
                0 => {
                    let flagged: Vec<ColumnName> = primitive_table
                        .columns
                        .iter()
                        .filter(|c| c.primary_key)
                        .map(|c| c.name.clone())
                        .collect();
                    if !flagged.is_empty() {
                        constraints.push(Constraint {
                            name: None,
                            kind: ConstraintKind::PrimaryKey { columns: flagged },
                        });
                    }
                }
                1 => {}
                _ => {
                    return Err(Error::new(ErrorKind::MalformedConstraint {
                        table: table.qualified_name(),
                        constraint: String::new(),
                        reason: "more than one primary key".to_string(),
                    }))
                }
            }
            let mut indexes = vec![];
            for primitive_index in primitive_table.indexes {
                builder.check_columns(table, &primitive_index.columns)?;
                indexes.push(Index {
                    name: primitive_index.name,
                    columns: primitive_index.columns,
                    unique: primitive_index.unique,
                });
            }
            resolved.push((constraints, indexes));
        }

        for (table, (constraints, indexes)) in tables.iter_mut().zip(resolved) {
            let pk_columns: BTreeSet<ColumnName> = constraints
                .iter()
                .filter(|c| c.is_primary_key())
                .flat_map(|c| c.columns().to_vec())
                .collect();
            for column in table.columns.iter_mut() {
                column.primary_key = pk_columns.contains(&column.name);
            }
            table.constraints = constraints;
            table.indexes = indexes;
        }

        Ok(Schema {
            tables,
            table_lookup,
        })
    }
}
