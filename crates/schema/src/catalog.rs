//! Name lookup for schema and model types.
//!
//! Field declarations and JSON schema definitions refer to other schemas and
//! to models by name. The catalog maps those names to something callable:
//! a compile function for schemas, a [`ModelDef`] for models.

use std::sync::LazyLock;

use dashmap::DashMap;
use serde::Serialize;

use crate::error::{Result, SchemaError};
use crate::factory::SchemaResolver;
use crate::model::{ModelDef, short_type_name};
use crate::schema::{DeclareSchema, Schema};

static GLOBAL: LazyLock<Catalog> = LazyLock::new(Catalog::new);

/// Known schema and model types, addressable by name.
///
/// Typed registrations are reachable under both the full type path and
/// the bare type name.
#[derive(Debug, Default)]
pub struct Catalog {
    schemas: DashMap<String, SchemaResolver>,
    models: DashMap<String, ModelDef>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide catalog consulted by [`FieldFactory`](crate::FieldFactory).
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Make schema `S` available to field declarations by type name.
    pub fn register_schema<S: DeclareSchema>(&self) {
        let id = S::id();
        let short = short_type_name(&id).to_owned();
        tracing::debug!(schema = %id, "catalogued schema type");
        self.schemas.insert(short, Schema::of::<S>);
        self.schemas.insert(id, Schema::of::<S>);
    }

    /// Register a schema under an arbitrary name.
    pub fn register_schema_fn(&self, name: impl Into<String>, resolve: SchemaResolver) {
        self.schemas.insert(name.into(), resolve);
    }

    #[must_use]
    pub fn schema_resolver(&self, name: &str) -> Option<SchemaResolver> {
        self.schemas.get(name).map(|entry| *entry.value())
    }

    #[must_use]
    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Make model `T` available to JSON schema definitions by type name.
    pub fn register_model<T: Serialize + Default>(&self) -> Result<()> {
        self.register_model_def(ModelDef::of::<T>()?);
        Ok(())
    }

    /// Register a hand-built model descriptor under its name and short name.
    pub fn register_model_def(&self, model: ModelDef) {
        tracing::debug!(model = %model.name(), "catalogued model type");
        let short = model.short_name().to_owned();
        if short != model.name() {
            self.models.insert(short, model.clone());
        }
        self.models.insert(model.name().to_owned(), model);
    }

    /// Look up a model by name.
    pub fn model(&self, name: &str) -> Result<ModelDef> {
        self.models
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| SchemaError::ModelNotFound {
                model: name.to_owned(),
            })
    }

    #[must_use]
    pub fn has_model(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Serialize)]
    struct Invoice {
        number: i64,
        total: f64,
    }

    #[test]
    fn models_resolve_by_full_and_short_name() {
        let catalog = Catalog::new();
        catalog.register_model::<Invoice>().unwrap();

        let by_short = catalog.model("Invoice").unwrap();
        assert_eq!(by_short.attributes(), ["number", "total"]);
        assert!(catalog.has_model(std::any::type_name::<Invoice>()));
    }

    #[test]
    fn unknown_model_fails() {
        let catalog = Catalog::new();
        assert_eq!(
            catalog.model("Ghost").unwrap_err(),
            SchemaError::ModelNotFound {
                model: "Ghost".into()
            }
        );
    }

    #[test]
    fn hand_built_models() {
        let catalog = Catalog::new();
        catalog.register_model_def(ModelDef::new("Point", ["x", "y"]));
        assert_eq!(catalog.model("Point").unwrap().attributes(), ["x", "y"]);
    }

    fn ledger_schema() -> Result<Schema> {
        Schema::lookup("catalog::tests::Ledger")
    }

    #[test]
    fn schemas_register_under_any_name() {
        let catalog = Catalog::new();
        catalog.register_schema_fn("Ledger", ledger_schema);
        assert!(catalog.has_schema("Ledger"));

        let resolve = catalog.schema_resolver("Ledger").unwrap();
        assert!(matches!(
            resolve(),
            Err(SchemaError::NotRegistered { .. })
        ));
    }

    #[test]
    fn schema_names_start_unknown() {
        let catalog = Catalog::new();
        assert!(!catalog.has_schema("TokenSchema"));
        assert!(catalog.schema_resolver("TokenSchema").is_none());
    }
}
