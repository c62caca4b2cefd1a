use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::debug;

use crate::{
    classify::{is_association_table, sorted_constraints, ConstraintId},
    errors::Result,
    naming::{table_name_to_class_name, to_valid_identifier, upper_first, Inflector, NameRegistry},
    schema::{ColumnType, Schema, Table, TableId},
    Options,
};

use super::{
    declaration::build_declaration,
    model::{
        Attribute, AttributeValue, ClassModel, ColumnRef, EnumDefinition, Model, ModelGraph,
        ModelId, TableModel,
    },
    relationships::RelationshipSynthesizer,
};

/// The module-level schema container every rendered module declares.
const METADATA_VARIABLE: &str = "metadata";

/// A table that links two others, recorded against the table its first foreign key refers to.
#[derive(Debug, Clone)]
pub(crate) struct AssociationLink {
    pub table: TableId,
    pub source: TableId,
    pub target: TableId,
    /// Positions of the two foreign keys in the association table, in sort key order
    pub source_fk: usize,
    pub target_fk: usize,
}

/// Walks the normalized schema and produces the model graph.
pub struct ModelBuilder<'a> {
    schema: &'a Schema,
    options: &'a Options,
    inflector: Box<dyn Inflector>,
    registry: NameRegistry,
    models: Vec<Model>,
    model_lookup: HashMap<TableId, ModelId>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(schema: &'a Schema, options: &'a Options) -> Self {
        Self {
            schema,
            options,
            inflector: options.get_inflector(),
            registry: NameRegistry::new(),
            models: vec![],
            model_lookup: HashMap::new(),
        }
    }

    pub fn build(mut self) -> Result<ModelGraph> {
        let table_ids: Vec<TableId> = self
            .schema
            .sorted_table_ids()
            .into_iter()
            .filter(|id| !self.options.is_ignored(&self.schema.table(*id).name))
            .collect();

        self.reserve_imported_names(&table_ids);
        let association_links = self.find_association_links(&table_ids);
        for table_id in &table_ids {
            self.add_model(*table_id, &association_links)?;
        }
        let enums = self.collect_enums()?;
        self.add_column_attributes()?;
        let inherited = if self.options.detect_joined_inheritance {
            self.detect_joined_inheritance()
        } else {
            BTreeSet::new()
        };

        let relationships = RelationshipSynthesizer {
            schema: self.schema,
            options: self.options,
            inflector: self.inflector.as_ref(),
            registry: &mut self.registry,
            models: &mut self.models,
            model_lookup: &self.model_lookup,
            relationships: vec![],
        }
        .synthesize(&inherited, &association_links)?;

        Ok(ModelGraph {
            models: self.models,
            relationships,
            enums,
            claimed_names: self.registry.global_names().clone(),
        })
    }

    /// Claim the symbols a renderer will import, so no generated name can shadow them.
    fn reserve_imported_names(&mut self, table_ids: &[TableId]) {
        for name in &self.options.reserved_names {
            self.registry.reserve(name.clone());
        }
        self.registry.reserve(METADATA_VARIABLE);
        for table_id in table_ids {
            for column in &self.schema.table(*table_id).columns {
                for symbol in column.column_type.symbol_names() {
                    self.registry.reserve(symbol);
                }
            }
        }
    }

    fn find_association_links(&self, table_ids: &[TableId]) -> Vec<AssociationLink> {
        let mut links = vec![];
        for table_id in table_ids {
            let table = self.schema.table(*table_id);
            if !is_association_table(table) {
                continue;
            }
            let fks: Vec<(usize, TableId)> = sorted_constraints(table)
                .into_iter()
                .filter_map(|(i, c)| c.as_foreign_key().map(|fk| (i, fk.referred_table_id)))
                .collect();
            if let &[(source_fk, source), (target_fk, target)] = fks.as_slice() {
                debug!(
                    "Table `{}` links `{}` to `{}`",
                    table.qualified_name(),
                    self.schema.table(source).qualified_name(),
                    self.schema.table(target).qualified_name()
                );
                links.push(AssociationLink {
                    table: *table_id,
                    source,
                    target,
                    source_fk,
                    target_fk,
                });
            }
        }
        links
    }

    fn add_model(&mut self, table_id: TableId, association_links: &[AssociationLink]) -> Result<()> {
        let table = self.schema.table(table_id);
        let id = self.models.len();
        let declaration = build_declaration(table, self.options);
        let is_association = association_links.iter().any(|l| l.table == table_id);
        let model = if table.primary_key().is_none() || is_association || self.options.tables_only
        {
            let variable_name = to_valid_identifier(&format!("t_{}", table.name))?;
            Model::Table(TableModel {
                id,
                table_id,
                variable_name: self.registry.claim_global(&variable_name)?,
                declaration,
            })
        } else {
            let inflector = if self.options.keep_plural_class_names {
                None
            } else {
                Some(self.inflector.as_ref())
            };
            let class_name =
                table_name_to_class_name(&table.name, &self.options.table_name_prefix, inflector)?;
            Model::Class(ClassModel {
                id,
                table_id,
                name: self.registry.claim_global(&class_name)?,
                declaration,
                attributes: vec![],
                parent: None,
                children: vec![],
            })
        };
        debug!("Table `{}` becomes `{}`", table.qualified_name(), model.name());
        self.models.push(model);
        self.model_lookup.insert(table_id, id);
        Ok(())
    }

    /// One definition per distinct enum, named after its database type or its first column.
    fn collect_enums(&mut self) -> Result<Vec<EnumDefinition>> {
        let mut enums: Vec<EnumDefinition> = vec![];
        let mut seen: BTreeMap<(Option<String>, Vec<String>), usize> = BTreeMap::new();
        for model in &self.models {
            let table = self.schema.table(model.table_id());
            for column in &table.columns {
                let ColumnType::Enum(enum_type) = &column.column_type else {
                    continue;
                };
                let column_ref = ColumnRef {
                    model: model.id(),
                    column: column.name.clone(),
                };
                let key = (enum_type.name.clone(), enum_type.values.clone());
                if let Some(index) = seen.get(&key) {
                    enums[*index].columns.push(column_ref);
                    continue;
                }
                let raw_name = match &enum_type.name {
                    Some(name) => name.clone(),
                    None => format!("{}_{}", table.name, column.name),
                };
                let identifier = to_valid_identifier(&raw_name)?;
                let camel_cased: String = identifier.split('_').map(upper_first).collect();
                let candidate = if camel_cased.is_empty() {
                    identifier
                } else {
                    camel_cased
                };
                seen.insert(key, enums.len());
                enums.push(EnumDefinition {
                    name: self.registry.claim_global(&candidate)?,
                    db_name: enum_type.name.clone(),
                    values: enum_type.values.clone(),
                    columns: vec![column_ref],
                });
            }
        }
        Ok(enums)
    }

    fn add_column_attributes(&mut self) -> Result<()> {
        for model in self.models.iter_mut() {
            let Model::Class(class) = model else {
                continue;
            };
            let table = self.schema.table(class.table_id);
            for column in &table.columns {
                let identifier = to_valid_identifier(&column.name)?;
                let name = self.registry.claim_local(class.id, &identifier)?;
                class.attributes.push(Attribute {
                    value: AttributeValue::Column {
                        column: column.name.clone(),
                        explicit_name: name != column.name,
                    },
                    name,
                });
            }
        }
        Ok(())
    }

    /// Make a class the child of the class its primary key refers to.
    ///
    /// Returns the foreign keys that now express inheritance instead of a relationship.
    fn detect_joined_inheritance(&mut self) -> BTreeSet<ConstraintId> {
        let mut inherited = BTreeSet::new();
        for id in 0..self.models.len() {
            if self.models[id].as_class().is_none() {
                continue;
            }
            let table = self.schema.table(self.models[id].table_id());
            if let Some((constraint, parent)) = self.find_parent(id, table) {
                debug!(
                    "`{}` inherits from `{}`",
                    self.models[id].name(),
                    self.models[parent].name()
                );
                if let Some(class) = self.models[id].as_class_mut() {
                    class.parent = Some(parent);
                }
                if let Some(parent_class) = self.models[parent].as_class_mut() {
                    parent_class.children.push(id);
                }
                inherited.insert((table.id, constraint));
            }
        }
        inherited
    }

    fn find_parent(&self, id: ModelId, table: &Table) -> Option<(usize, ModelId)> {
        let pk_columns = table.primary_key_columns();
        for (i, constraint) in sorted_constraints(table) {
            let Some(fk) = constraint.as_foreign_key() else {
                continue;
            };
            let Some(&target) = self.model_lookup.get(&fk.referred_table_id) else {
                continue;
            };
            if target == id || self.models[target].as_class().is_none() {
                continue;
            }
            let columns: BTreeSet<&str> = fk.columns.iter().map(String::as_str).collect();
            let referred: BTreeSet<&str> = fk.referred_columns.iter().map(String::as_str).collect();
            let target_pk = self.schema.table(fk.referred_table_id).primary_key_columns();
            if columns == pk_columns && referred == target_pk && !self.is_ancestor(id, target) {
                return Some((i, target));
            }
        }
        None
    }

    /// True when `ancestor` is `model` or one of its parents.
    fn is_ancestor(&self, ancestor: ModelId, model: ModelId) -> bool {
        let mut current = Some(model);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.models[id].as_class().and_then(|c| c.parent);
        }
        false
    }
}
