use log::info;

use crate::{
    errors::{Error, ErrorKind, Result},
    model::{ModelBuilder, ModelGraph},
    normalize::normalize_schema,
    schema::{primitive_schema::PrimitiveSchema, Schema},
    Options,
};

pub struct Generator {
    options: Options,
    schema: Schema,
}

impl Generator {
    pub fn new(schema_json: &str, options: Options) -> Result<Self> {
        let primitive_schema = serde_json::from_str::<PrimitiveSchema>(schema_json)
            .map_err(|e| Error::new(ErrorKind::InvalidSchema(e.to_string())))?;
        let schema = Schema::try_from(primitive_schema)?;
        Ok(Self::from_schema(schema, options))
    }

    pub fn from_schema(schema: Schema, options: Options) -> Self {
        Self { options, schema }
    }

    /// The schema as it stands, normalized once `generate` has run.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn generate(&mut self) -> Result<ModelGraph> {
        let dialect = self.options.get_dialect();
        info!(
            "Generating models for {} tables ({} dialect)",
            self.schema.tables.len(),
            dialect.name()
        );
        normalize_schema(&mut self.schema, &self.options, dialect.as_ref());
        ModelBuilder::new(&self.schema, &self.options).build()
    }
}
