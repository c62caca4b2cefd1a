use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};

use crate::{
    classify::{common_foreign_key_constraints, sorted_constraints, ConstraintId},
    errors::{msg, Result},
    naming::{to_valid_identifier, Inflector, NameRegistry},
    schema::{ConstraintKind, ForeignKey, Schema, Table, TableId},
    Options,
};

use super::{
    builder::AssociationLink,
    model::{
        Attribute, AttributeRef, AttributeValue, ConstraintRef, JoinTerm, Model, ModelId,
        Relationship, RelationshipId, RelationshipKind, SecondaryTable,
    },
};

pub(crate) struct RelationshipSynthesizer<'a> {
    pub schema: &'a Schema,
    pub options: &'a Options,
    pub inflector: &'a dyn Inflector,
    pub registry: &'a mut NameRegistry,
    pub models: &'a mut Vec<Model>,
    pub model_lookup: &'a HashMap<TableId, ModelId>,
    pub relationships: Vec<Relationship>,
}

/// The facts about one foreign key that decide how its relationships look.
struct ForeignKeyLink<'s> {
    fk: &'s ForeignKey,
    constraint_name: Option<String>,
    source: ModelId,
    target: ModelId,
    one_to_one: bool,
    ambiguous: bool,
}

impl<'s> ForeignKeyLink<'s> {
    fn is_self_referential(&self) -> bool {
        self.source == self.target
    }
}

impl<'a> RelationshipSynthesizer<'a> {
    pub fn synthesize(
        mut self,
        inherited: &BTreeSet<ConstraintId>,
        association_links: &[AssociationLink],
    ) -> Result<Vec<Relationship>> {
        for id in 0..self.models.len() {
            let table = self.schema.table(self.models[id].table_id());
            if self.models[id].as_class().is_some() {
                self.add_class_relationships(id, table, inherited)?;
            } else if let Some(link) = association_links.iter().find(|l| l.table == table.id) {
                self.add_many_to_many_relationships(id, table, link)?;
            }
        }
        Ok(self.relationships)
    }

    fn add_class_relationships(
        &mut self,
        id: ModelId,
        table: &Table,
        inherited: &BTreeSet<ConstraintId>,
    ) -> Result<()> {
        for (i, constraint) in sorted_constraints(table) {
            let ConstraintKind::ForeignKey(fk) = &constraint.kind else {
                continue;
            };
            if inherited.contains(&(table.id, i)) {
                continue;
            }
            let Some(target) = self.class_for_table(fk.referred_table_id) else {
                continue;
            };
            let common = common_foreign_key_constraints(self.schema, table.id, fk.referred_table_id);
            let link = ForeignKeyLink {
                fk,
                constraint_name: constraint.name.clone(),
                source: id,
                target,
                one_to_one: is_unique_column_set(table, &fk.columns),
                ambiguous: common.len() > 1,
            };
            self.add_foreign_key_relationships(table, &link)?;
        }
        Ok(())
    }

    fn class_for_table(&self, table_id: TableId) -> Option<ModelId> {
        let id = *self.model_lookup.get(&table_id)?;
        self.models[id].as_class().map(|_| id)
    }

    fn add_foreign_key_relationships(&mut self, table: &Table, link: &ForeignKeyLink) -> Result<()> {
        let target_table = self.schema.table(link.fk.referred_table_id);

        let forward_candidate = self.forward_name(table, target_table, link);
        let forward_name = self.claim_name(link.source, &forward_candidate)?;
        let forward_kind = if link.one_to_one {
            RelationshipKind::OneToOne
        } else {
            RelationshipKind::ManyToOne
        };
        let constraint = ConstraintRef {
            model: link.source,
            name: link.constraint_name.clone(),
            columns: link.fk.columns.clone(),
        };
        let foreign_keys = if link.ambiguous {
            self.resolve_foreign_keys(link)
        } else {
            vec![]
        };

        let mut forward = Relationship::new(
            self.relationships.len(),
            forward_name.clone(),
            forward_kind,
            link.source,
            link.target,
        );
        forward.constraint = Some(constraint.clone());
        forward.foreign_keys = foreign_keys.clone();
        if link.is_self_referential() {
            forward.remote_side = target_table
                .primary_key()
                .map(|pk| self.attribute_refs(link.target, pk.columns()))
                .unwrap_or_default();
        }
        let forward_id = self.push(forward);

        if !self.options.bidirectional_relationships {
            return Ok(());
        }

        let reverse_candidate = self.reverse_name(table, &forward_name, link);
        let reverse_name = self.claim_name(link.target, &reverse_candidate)?;
        let reverse_kind = if link.one_to_one {
            RelationshipKind::OneToOne
        } else {
            RelationshipKind::OneToMany
        };
        let mut reverse = Relationship::new(
            self.relationships.len(),
            reverse_name,
            reverse_kind,
            link.target,
            link.source,
        );
        reverse.constraint = Some(constraint);
        reverse.foreign_keys = foreign_keys;
        if link.is_self_referential() {
            reverse.remote_side = self.attribute_refs(link.source, &link.fk.columns);
        }
        reverse.back_populates = Some(forward_id);
        let reverse_id = self.push(reverse);
        self.relationships[forward_id].back_populates = Some(reverse_id);
        Ok(())
    }

    fn forward_name(&self, table: &Table, target_table: &Table, link: &ForeignKeyLink) -> String {
        let name = if let Some(stripped) = self.strip_foreign_key_suffix(&link.fk.columns) {
            stripped
        } else if link.is_self_referential() {
            "parent".to_string()
        } else if link.fk.columns.len() > 1 && link.ambiguous {
            let mut parts = vec![target_table.name.clone()];
            parts.extend(link.fk.columns.iter().cloned());
            parts.join("_")
        } else {
            target_table.name.clone()
        };
        debug!("Foreign key {:?} of `{}` names `{name}`", link.fk.columns, table.name);
        if self.options.inflect_relationship_names {
            self.inflector.singularize(&name)
        } else {
            name
        }
    }

    fn reverse_name(&self, table: &Table, forward_name: &str, link: &ForeignKeyLink) -> String {
        if link.is_self_referential() {
            return format!("{forward_name}_reverse");
        }
        let base = match (self.options.inflect_relationship_names, link.one_to_one) {
            (true, true) => self.inflector.singularize(&table.name),
            (true, false) => self.plural(&table.name),
            (false, _) => table.name.clone(),
        };
        if link.ambiguous {
            format!("{base}_{forward_name}")
        } else {
            base
        }
    }

    /// The name of a single foreign key column with its suffix removed, e.g. `author_id`
    /// becomes `author`.
    fn strip_foreign_key_suffix(&self, columns: &[String]) -> Option<String> {
        let [column] = columns else {
            return None;
        };
        self.options
            .foreign_key_suffixes
            .iter()
            .find_map(|suffix| column.strip_suffix(suffix.as_str()))
            .filter(|stripped| !stripped.is_empty())
            .map(str::to_string)
    }

    /// The source attributes of an ambiguous foreign key, or nothing if any is missing.
    fn resolve_foreign_keys(&self, link: &ForeignKeyLink) -> Vec<AttributeRef> {
        let refs = self.attribute_refs(link.source, &link.fk.columns);
        if refs.len() == link.fk.columns.len() {
            refs
        } else {
            warn!(
                "{}",
                msg::unresolved_foreign_keys(
                    self.models[link.source].name(),
                    self.models[link.target].name(),
                    &link.fk.columns,
                )
            );
            vec![]
        }
    }

    fn add_many_to_many_relationships(
        &mut self,
        association_id: ModelId,
        association_table: &Table,
        link: &AssociationLink,
    ) -> Result<()> {
        let (Some(source), Some(target)) = (
            self.class_for_table(link.source),
            self.class_for_table(link.target),
        ) else {
            return Ok(());
        };
        let (Some(source_fk), Some(target_fk)) = (
            association_table.constraints[link.source_fk].as_foreign_key(),
            association_table.constraints[link.target_fk].as_foreign_key(),
        ) else {
            return Ok(());
        };
        let secondary = SecondaryTable {
            name: association_table.qualified_name(),
            model: association_id,
        };
        let source_table = self.schema.table(link.source);
        let target_table = self.schema.table(link.target);

        let forward_candidate = self.many_to_many_name(target_fk, target_table);
        let forward_name = self.claim_name(source, &forward_candidate)?;
        let mut forward = Relationship::new(
            self.relationships.len(),
            forward_name,
            RelationshipKind::ManyToMany,
            source,
            target,
        );
        forward.secondary = Some(secondary.clone());

        let mut reverse = None;
        if self.options.bidirectional_relationships {
            let reverse_candidate = self.many_to_many_name(source_fk, source_table);
            let reverse_name = self.claim_name(target, &reverse_candidate)?;
            reverse = Some(Relationship::new(
                0,
                reverse_name,
                RelationshipKind::ManyToMany,
                target,
                source,
            ));
        }

        if source == target {
            let primaryjoin = self.join_terms(source, association_id, source_fk);
            let secondaryjoin = self.join_terms(source, association_id, target_fk);
            if let Some(reverse) = reverse.as_mut() {
                reverse.primaryjoin = secondaryjoin.clone();
                reverse.secondaryjoin = primaryjoin.clone();
            }
            forward.primaryjoin = primaryjoin;
            forward.secondaryjoin = secondaryjoin;
        }

        let forward_id = self.push(forward);
        if let Some(mut reverse) = reverse {
            reverse.id = self.relationships.len();
            reverse.secondary = Some(secondary);
            reverse.back_populates = Some(forward_id);
            let reverse_id = self.push(reverse);
            self.relationships[forward_id].back_populates = Some(reverse_id);
        }
        Ok(())
    }

    fn many_to_many_name(&self, fk: &ForeignKey, referred_table: &Table) -> String {
        let name = self
            .strip_foreign_key_suffix(&fk.columns)
            .unwrap_or_else(|| referred_table.name.clone());
        if self.options.inflect_relationship_names {
            self.plural(&name)
        } else {
            name
        }
    }

    /// Table names are often plural already, so the singular form is pluralized.
    fn plural(&self, name: &str) -> String {
        self.inflector.pluralize(&self.inflector.singularize(name))
    }

    /// `<referred key attribute> == <association table>.<foreign key column>` for each column.
    fn join_terms(&self, class: ModelId, association: ModelId, fk: &ForeignKey) -> Vec<JoinTerm> {
        let referred = self.attribute_refs(class, &fk.referred_columns);
        referred
            .into_iter()
            .zip(fk.columns.iter())
            .map(|(attribute, column)| JoinTerm {
                attribute,
                table: association,
                column: column.clone(),
            })
            .collect()
    }

    /// References to the attributes mapping `columns`, skipping columns without one.
    fn attribute_refs(&self, model: ModelId, columns: &[String]) -> Vec<AttributeRef> {
        let Some(class) = self.models[model].as_class() else {
            return vec![];
        };
        columns
            .iter()
            .filter_map(|column| class.attribute_for_column(column))
            .map(|attribute| AttributeRef {
                model,
                attribute: attribute.name.clone(),
            })
            .collect()
    }

    fn claim_name(&mut self, model: ModelId, candidate: &str) -> Result<String> {
        let identifier = to_valid_identifier(candidate)?;
        self.registry.claim_local(model, &identifier)
    }

    /// Store a relationship and append it to its source's attributes.
    fn push(&mut self, relationship: Relationship) -> RelationshipId {
        let id = relationship.id;
        if let Some(class) = self.models[relationship.source].as_class_mut() {
            class.attributes.push(Attribute {
                name: relationship.name.clone(),
                value: AttributeValue::Relationship { relationship: id },
            });
        }
        self.relationships.push(relationship);
        id
    }
}

/// True when `columns` is exactly the column set of the primary key or a unique constraint.
fn is_unique_column_set(table: &Table, columns: &[String]) -> bool {
    let columns: BTreeSet<&str> = columns.iter().map(String::as_str).collect();
    table.constraints.iter().any(|constraint| {
        matches!(
            constraint.kind,
            ConstraintKind::PrimaryKey { .. } | ConstraintKind::Unique { .. }
        ) && constraint.columns().iter().map(String::as_str).collect::<BTreeSet<_>>() == columns
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{model::ModelBuilder, schema::primitive_schema::PrimitiveSchema};

    use super::*;

    fn schema() -> Schema {
        let primitive_schema: PrimitiveSchema = serde_json::from_value(json!({"tables": [
            {"name": "users", "columns": [{"name": "id", "primary_key": true}]},
            {
                "name": "notes",
                "columns": [
                    {"name": "id", "primary_key": true},
                    {"name": "owner_ref"},
                    {"name": "reviewer_ref"}
                ],
                "constraints": [
                    {"type": "foreign_key", "columns": ["owner_ref"], "referred_table": "users", "referred_columns": ["id"]},
                    {"type": "unique", "columns": ["reviewer_ref", "owner_ref"]}
                ]
            }
        ]}))
        .unwrap();
        Schema::try_from(primitive_schema).unwrap()
    }

    #[test]
    fn test_unique_column_set() {
        let schema = schema();
        let notes = schema.get_table_by_name("notes").unwrap();
        assert!(is_unique_column_set(notes, &["id".to_string()]));
        assert!(is_unique_column_set(
            notes,
            &["owner_ref".to_string(), "reviewer_ref".to_string()]
        ));
        assert!(!is_unique_column_set(notes, &["owner_ref".to_string()]));
    }

    #[test]
    fn test_foreign_key_suffixes() {
        let schema = schema();
        let options = Options {
            foreign_key_suffixes: vec!["_ref".to_string()],
            ..Options::default()
        };
        let graph = ModelBuilder::new(&schema, &options).build().unwrap();
        let names: Vec<&str> = graph.relationships.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["owner", "notes"]);

        let graph = ModelBuilder::new(&schema, &Options::default()).build().unwrap();
        assert_eq!(graph.relationships[0].name, "users");
    }
}
