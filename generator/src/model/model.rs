use std::collections::BTreeSet;

use serde::Serialize;

use crate::schema::{
    ColumnName, ColumnType, Constraint, ForeignKeyOptions, Index, Sequence, TableId, TableName,
};

pub type ModelId = usize;
pub type RelationshipId = usize;

/// Everything decided about a schema: one model per table, the relationships between class
/// models, the enums in use and every top-level name that was claimed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelGraph {
    /// In dependency order. A `ModelId` is an index into this list.
    pub models: Vec<Model>,
    /// A `RelationshipId` is an index into this list.
    pub relationships: Vec<Relationship>,
    pub enums: Vec<EnumDefinition>,
    /// Imported symbols, class names, table variable names and enum names
    pub claimed_names: BTreeSet<String>,
}

impl ModelGraph {
    pub fn model(&self, id: ModelId) -> &Model {
        &self.models[id]
    }

    pub fn relationship(&self, id: RelationshipId) -> &Relationship {
        &self.relationships[id]
    }

    pub fn get_model_by_table_name(&self, table_name: &str) -> Option<&Model> {
        self.models
            .iter()
            .find(|m| m.declaration().table_name == table_name)
    }

    pub fn get_class_by_table_name(&self, table_name: &str) -> Option<&ClassModel> {
        match self.get_model_by_table_name(table_name)? {
            Model::Class(class) => Some(class),
            Model::Table(_) => None,
        }
    }

    /// The relationships declared on a class, in attribute order.
    pub fn relationships_of(&self, class: &ClassModel) -> Vec<&Relationship> {
        class
            .attributes
            .iter()
            .filter_map(|a| match a.value {
                AttributeValue::Relationship { relationship } => {
                    Some(&self.relationships[relationship])
                }
                AttributeValue::Column { .. } => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum Model {
    Table(TableModel),
    Class(ClassModel),
}

impl Model {
    pub fn id(&self) -> ModelId {
        match self {
            Model::Table(m) => m.id,
            Model::Class(m) => m.id,
        }
    }

    pub fn table_id(&self) -> TableId {
        match self {
            Model::Table(m) => m.table_id,
            Model::Class(m) => m.table_id,
        }
    }

    /// The class name or the table variable name.
    pub fn name(&self) -> &str {
        match self {
            Model::Table(m) => &m.variable_name,
            Model::Class(m) => &m.name,
        }
    }

    pub fn declaration(&self) -> &TableDeclaration {
        match self {
            Model::Table(m) => &m.declaration,
            Model::Class(m) => &m.declaration,
        }
    }

    pub fn as_class(&self) -> Option<&ClassModel> {
        match self {
            Model::Class(class) => Some(class),
            Model::Table(_) => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassModel> {
        match self {
            Model::Class(class) => Some(class),
            Model::Table(_) => None,
        }
    }
}

/// A bare table declaration bound to a module-level variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableModel {
    pub id: ModelId,
    #[serde(skip)]
    pub table_id: TableId,
    pub variable_name: String,
    pub declaration: TableDeclaration,
}

/// A mapped class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassModel {
    pub id: ModelId,
    #[serde(skip)]
    pub table_id: TableId,
    pub name: String,
    pub declaration: TableDeclaration,
    /// Column attributes in table order, then relationships in the order they were derived
    pub attributes: Vec<Attribute>,
    /// Set for joined-table inheritance
    pub parent: Option<ModelId>,
    pub children: Vec<ModelId>,
}

impl ClassModel {
    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// The attribute mapping a physical column.
    pub fn attribute_for_column(&self, column_name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| {
            matches!(&a.value, AttributeValue::Column { column, .. } if column == column_name)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(flatten)]
    pub value: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeValue {
    Column {
        column: ColumnName,
        /// The attribute name differs from the column name, so a renderer must spell out the
        /// column name
        explicit_name: bool,
    },
    Relationship { relationship: RelationshipId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    ManyToOne,
    OneToMany,
    OneToOne,
    ManyToMany,
}

impl RelationshipKind {
    pub fn is_collection(&self) -> bool {
        matches!(self, RelationshipKind::OneToMany | RelationshipKind::ManyToMany)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub name: String,
    pub kind: RelationshipKind,
    pub source: ModelId,
    pub target: ModelId,
    /// The foreign key backing the relationship, absent for many-to-many
    pub constraint: Option<ConstraintRef>,
    /// The association table of a many-to-many relationship
    pub secondary: Option<SecondaryTable>,
    /// Set when the join between the two models is ambiguous
    pub foreign_keys: Vec<AttributeRef>,
    /// Set for self-referential relationships
    pub remote_side: Vec<AttributeRef>,
    /// Set for self-referential many-to-many relationships
    pub primaryjoin: Vec<JoinTerm>,
    pub secondaryjoin: Vec<JoinTerm>,
    pub back_populates: Option<RelationshipId>,
}

impl Relationship {
    pub(crate) fn new(
        id: RelationshipId,
        name: String,
        kind: RelationshipKind,
        source: ModelId,
        target: ModelId,
    ) -> Self {
        Relationship {
            id,
            name,
            kind,
            source,
            target,
            constraint: None,
            secondary: None,
            foreign_keys: vec![],
            remote_side: vec![],
            primaryjoin: vec![],
            secondaryjoin: vec![],
            back_populates: None,
        }
    }

    pub fn is_self_referential(&self) -> bool {
        self.source == self.target
    }
}

/// A foreign key constraint, identified by the model of the table that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintRef {
    pub model: ModelId,
    pub name: Option<String>,
    pub columns: Vec<ColumnName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryTable {
    /// Schema qualified when the table has a schema
    pub name: TableName,
    pub model: ModelId,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct AttributeRef {
    pub model: ModelId,
    pub attribute: String,
}

/// `<attribute> == <association table>.<column>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinTerm {
    pub attribute: AttributeRef,
    pub table: ModelId,
    pub column: ColumnName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDefinition {
    pub name: String,
    /// The type name in the database, if it has one
    pub db_name: Option<String>,
    pub values: Vec<String>,
    pub columns: Vec<ColumnRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRef {
    pub model: ModelId,
    pub column: ColumnName,
}

/// Rendering-ready table data.
///
/// Default-named single-column constraints and indexes are folded into the column
/// declarations; everything else is listed in sort order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDeclaration {
    pub table_name: TableName,
    pub schema: Option<String>,
    pub comment: Option<String>,
    pub columns: Vec<ColumnDeclaration>,
    /// Names are cleared where they follow the naming convention
    pub constraints: Vec<Constraint>,
    pub indexes: Vec<Index>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDeclaration {
    pub name: ColumnName,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub index: bool,
    pub foreign_key: Option<ForeignKeyTarget>,
    pub autoincrement: Option<bool>,
    pub server_default: Option<String>,
    pub comment: Option<String>,
    pub sequence: Option<Sequence>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKeyTarget {
    /// `<qualified table>.<column>`
    pub column: String,
    #[serde(flatten)]
    pub options: ForeignKeyOptions,
}
