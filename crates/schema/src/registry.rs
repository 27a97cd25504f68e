//! Process-wide store of compiled schemas.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use indexmap::IndexMap;

use crate::error::{Result, SchemaError};
use crate::field::Field;
use crate::model::ModelDef;

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Compiled fields keyed by attribute name.
pub type FieldMap = IndexMap<String, Field>;

/// The compiled form of one schema: its bound model and field map.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    model: Arc<ModelDef>,
    fields: Arc<FieldMap>,
}

impl SchemaEntry {
    #[must_use]
    pub fn new(model: ModelDef, fields: FieldMap) -> Self {
        Self {
            model: Arc::new(model),
            fields: Arc::new(fields),
        }
    }

    #[must_use]
    pub fn model(&self) -> &Arc<ModelDef> {
        &self.model
    }

    /// Attribute names governed by the schema, in model order.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        self.model.attributes()
    }

    #[must_use]
    pub fn fields(&self) -> &Arc<FieldMap> {
        &self.fields
    }

    fn check(&self, id: &str) -> Result<()> {
        if self.model.attributes().is_empty() {
            return Err(SchemaError::invalid_argument(format!(
                "`{id}` binds a model without attributes"
            )));
        }
        if self.fields.is_empty() {
            return Err(SchemaError::invalid_argument(format!(
                "`{id}` declares no fields"
            )));
        }
        Ok(())
    }
}

/// Thread-safe map from schema id to compiled schema.
///
/// Ids are opaque strings; typed schemas use their Rust type path. An id is
/// registered at most once. Reads never block writers on other ids.
#[derive(Debug)]
pub struct Registry {
    schemas: DashMap<String, Arc<SchemaEntry>>,
}

impl Registry {
    /// Create an empty registry, independent of the global one.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schemas: DashMap::new(),
        }
    }

    /// The process-wide registry that schema compilation writes to.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    #[must_use]
    pub fn registered(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    /// Register a schema. Fails when `id` is taken, or when the model has no
    /// attributes or `fields` is empty.
    pub fn add(&self, id: impl Into<String>, model: ModelDef, fields: FieldMap) -> Result<()> {
        let id = id.into();
        let entry = SchemaEntry::new(model, fields);
        entry.check(&id)?;

        match self.schemas.entry(id) {
            Entry::Occupied(occupied) => Err(SchemaError::AlreadyRegistered {
                schema: occupied.key().clone(),
            }),
            Entry::Vacant(vacant) => {
                tracing::info!(
                    schema = %vacant.key(),
                    fields = entry.fields.len(),
                    "registered schema"
                );
                vacant.insert(Arc::new(entry));
                Ok(())
            }
        }
    }

    /// Insert a freshly compiled schema unless another thread got there
    /// first. Returns whichever entry ends up registered.
    pub fn insert_compiled(&self, id: &str, entry: SchemaEntry) -> Result<Arc<SchemaEntry>> {
        entry.check(id)?;

        match self.schemas.entry(id.to_owned()) {
            Entry::Occupied(occupied) => {
                tracing::warn!(schema = %id, "schema compiled concurrently, keeping first");
                Ok(Arc::clone(occupied.get()))
            }
            Entry::Vacant(vacant) => {
                tracing::info!(
                    schema = %id,
                    fields = entry.fields.len(),
                    "registered schema"
                );
                Ok(Arc::clone(vacant.insert(Arc::new(entry)).value()))
            }
        }
    }

    /// Remove a schema. Fails when `id` is not registered.
    pub fn remove(&self, id: &str) -> Result<()> {
        match self.schemas.remove(id) {
            Some(_) => {
                tracing::info!(schema = %id, "removed schema");
                Ok(())
            }
            None => Err(SchemaError::not_registered(id)),
        }
    }

    pub fn get(&self, id: &str) -> Result<Arc<SchemaEntry>> {
        self.schemas
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| SchemaError::not_registered(id))
    }

    /// The model bound to `id`.
    pub fn model(&self, id: &str) -> Result<Arc<ModelDef>> {
        self.get(id).map(|entry| Arc::clone(&entry.model))
    }

    /// The compiled fields of `id`.
    pub fn fields(&self, id: &str) -> Result<Arc<FieldMap>> {
        self.get(id).map(|entry| Arc::clone(&entry.fields))
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let count = self.schemas.len();
        self.schemas.clear();
        tracing::info!(count, "cleared schema registry");
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.schemas.len()
    }

    /// Registered ids, in no particular order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.schemas.iter().map(|e| e.key().clone()).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{IntField, StringField};

    fn user_model() -> ModelDef {
        ModelDef::new("User", ["id", "username"])
    }

    fn user_fields() -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("id".into(), IntField::new("id").unwrap().into());
        fields.insert("username".into(), StringField::new("username").unwrap().into());
        fields
    }

    #[test]
    fn add_and_lookup() {
        let reg = Registry::new();
        assert!(!reg.registered("UserSchema"));

        reg.add("UserSchema", user_model(), user_fields()).unwrap();
        assert!(reg.registered("UserSchema"));
        assert_eq!(reg.count(), 1);
        assert_eq!(reg.model("UserSchema").unwrap().name(), "User");
        assert_eq!(reg.fields("UserSchema").unwrap().len(), 2);
        assert_eq!(reg.get("UserSchema").unwrap().attributes(), ["id", "username"]);
    }

    #[test]
    fn add_twice_fails() {
        let reg = Registry::new();
        reg.add("UserSchema", user_model(), user_fields()).unwrap();
        let err = reg.add("UserSchema", user_model(), user_fields()).unwrap_err();
        assert!(matches!(err, SchemaError::AlreadyRegistered { .. }));
    }

    #[test]
    fn add_rejects_empty_model_or_fields() {
        let reg = Registry::new();
        let empty_model = ModelDef::new("Empty", Vec::<String>::new());
        assert!(matches!(
            reg.add("A", empty_model, user_fields()),
            Err(SchemaError::InvalidArgument { .. })
        ));
        assert!(matches!(
            reg.add("B", user_model(), FieldMap::new()),
            Err(SchemaError::InvalidArgument { .. })
        ));
        assert_eq!(reg.count(), 0);
    }

    #[test]
    fn missing_ids_fail_with_not_registered() {
        let reg = Registry::new();
        assert!(matches!(reg.get("Nope"), Err(SchemaError::NotRegistered { .. })));
        assert!(matches!(reg.model("Nope"), Err(SchemaError::NotRegistered { .. })));
        assert!(matches!(reg.fields("Nope"), Err(SchemaError::NotRegistered { .. })));
        assert!(matches!(reg.remove("Nope"), Err(SchemaError::NotRegistered { .. })));
    }

    #[test]
    fn remove_then_lookup_fails() {
        let reg = Registry::new();
        reg.add("UserSchema", user_model(), user_fields()).unwrap();
        reg.remove("UserSchema").unwrap();
        assert!(!reg.registered("UserSchema"));
        assert!(matches!(
            reg.fields("UserSchema"),
            Err(SchemaError::NotRegistered { .. })
        ));
    }

    #[test]
    fn clear_empties_everything() {
        let reg = Registry::new();
        reg.add("A", user_model(), user_fields()).unwrap();
        reg.add("B", user_model(), user_fields()).unwrap();
        assert_eq!(reg.count(), 2);

        reg.clear();
        assert_eq!(reg.count(), 0);
        assert!(!reg.registered("A"));
        assert!(!reg.registered("B"));
    }

    #[test]
    fn insert_compiled_keeps_the_first_entry() {
        let reg = Registry::new();
        let first = reg
            .insert_compiled("S", SchemaEntry::new(user_model(), user_fields()))
            .unwrap();

        let mut other = FieldMap::new();
        other.insert("id".into(), IntField::new("id").unwrap().into());
        let second = reg
            .insert_compiled("S", SchemaEntry::new(user_model(), other))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.fields().len(), 2);
    }

    #[test]
    fn concurrent_adds_register_once() {
        let reg = Arc::new(Registry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&reg);
                std::thread::spawn(move || reg.add("Shared", user_model(), user_fields()).is_ok())
            })
            .collect();
        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(reg.count(), 1);
    }

    #[test]
    fn ids_lists_everything() {
        let reg = Registry::new();
        reg.add("b", user_model(), user_fields()).unwrap();
        reg.add("a", user_model(), user_fields()).unwrap();
        let mut ids = reg.ids();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
