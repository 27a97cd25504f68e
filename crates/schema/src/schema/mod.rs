//! Schemas: a model binding plus compiled fields, registered once per id.

mod definition;

pub use definition::{ModelRef, SchemaDefinition};

use std::cell::RefCell;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Result, SchemaError};
use crate::factory::FieldFactory;
use crate::model::{ModelDef, Record};
use crate::registry::{FieldMap, Registry, SchemaEntry};
use crate::value::Value;

thread_local! {
    static COMPILING: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Marks a schema id as being compiled on this thread; a nested compile of
/// the same id is a cycle.
struct CompileGuard;

impl CompileGuard {
    fn enter(id: &str) -> Result<Self> {
        COMPILING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.iter().any(|open| open == id) {
                let mut path = stack.join(" -> ");
                path.push_str(" -> ");
                path.push_str(id);
                return Err(SchemaError::CyclicSchema { path });
            }
            stack.push(id.to_owned());
            Ok(Self)
        })
    }
}

impl Drop for CompileGuard {
    fn drop(&mut self) {
        COMPILING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// A record shape declared in Rust.
///
/// ```rust,ignore
/// struct UserSchema;
///
/// impl DeclareSchema for UserSchema {
///     fn definition() -> SchemaDefinition {
///         SchemaDefinition::new()
///             .model::<User>()
///             .field("id", FieldSpec::integer().required(true))
///     }
/// }
///
/// let schema = Schema::of::<UserSchema>()?;
/// ```
pub trait DeclareSchema: 'static {
    fn definition() -> SchemaDefinition;

    /// Registry id. Defaults to the full type path.
    fn id() -> String {
        std::any::type_name::<Self>().to_owned()
    }
}

/// Handle to a compiled schema in the global [`Registry`].
///
/// Cheap to clone; all state lives in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Schema {
    id: Arc<str>,
}

impl Schema {
    /// Compile `S` on first use; later calls return the registered schema.
    pub fn of<S: DeclareSchema>() -> Result<Self> {
        Self::compile_with(S::id(), S::definition)
    }

    /// Compile a definition under `id` unless `id` is already registered.
    pub fn compile(id: impl Into<String>, definition: SchemaDefinition) -> Result<Self> {
        Self::compile_with(id, || definition)
    }

    /// Compile a JSON definition under `id`.
    pub fn from_json(id: impl Into<String>, json: &str) -> Result<Self> {
        let id = id.into();
        if Registry::global().registered(&id) {
            return Ok(Self::handle(id));
        }
        Self::compile(id, SchemaDefinition::from_json(json)?)
    }

    /// A handle to an already registered schema.
    pub fn lookup(id: &str) -> Result<Self> {
        if Registry::global().registered(id) {
            Ok(Self::handle(id.to_owned()))
        } else {
            Err(SchemaError::not_registered(id))
        }
    }

    fn handle(id: String) -> Self {
        Self { id: id.into() }
    }

    fn compile_with(
        id: impl Into<String>,
        definition: impl FnOnce() -> SchemaDefinition,
    ) -> Result<Self> {
        let id = id.into();
        let registry = Registry::global();
        if registry.registered(&id) {
            tracing::trace!(schema = %id, "schema already compiled");
            return Ok(Self::handle(id));
        }

        let _guard = CompileGuard::enter(&id)?;
        tracing::debug!(schema = %id, "compiling schema");

        let definition = definition();
        let model = definition.resolve_model(&id)?;

        let mut fields = FieldMap::with_capacity(definition.fields.len());
        for (key, spec) in &definition.fields {
            let field = FieldFactory::create(spec, Some(key.as_str()))?;
            if !model.has_attribute(field.name()) {
                return Err(SchemaError::invalid_argument(format!(
                    "field `{}` is not an attribute of model `{}`",
                    field.name(),
                    model.name()
                )));
            }
            fields.insert(field.name().to_owned(), field);
        }

        let entry = registry.insert_compiled(&id, SchemaEntry::new(model, fields))?;
        tracing::debug!(schema = %id, fields = entry.fields().len(), "compiled schema");
        Ok(Self::handle(id))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn entry(&self) -> Result<Arc<SchemaEntry>> {
        Registry::global().get(&self.id)
    }

    /// The bound model.
    pub fn model(&self) -> Result<Arc<ModelDef>> {
        Registry::global().model(&self.id)
    }

    pub fn fields(&self) -> Result<Arc<FieldMap>> {
        Registry::global().fields(&self.id)
    }

    /// A blank instance of the bound model.
    pub fn new_record(&self) -> Result<Record> {
        let model = self.model()?;
        Ok(Record::new(&model))
    }

    /// Whether every governed attribute of a mapping or record validates.
    /// Other shapes are simply invalid.
    pub fn validate(&self, value: &Value) -> Result<bool> {
        if !value.is_structured() {
            return Ok(false);
        }
        let entry = self.entry()?;
        for attr in entry.attributes() {
            let Some(field) = entry.fields().get(attr) else {
                continue;
            };
            let item = value.attribute(attr).unwrap_or(&Value::Null);
            if !field.validate(item)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Validate any serde model.
    pub fn validate_model<T: Serialize>(&self, model: &T) -> Result<bool> {
        self.validate(&Value::Record(Record::from_model(model)?))
    }

    /// Dump a model instance into its typed attribute map.
    ///
    /// Only records are accepted. With `stop_on_error` the first failing
    /// attribute aborts the dump; otherwise every failure is collected and
    /// reported together as [`SchemaError::DumpFailed`].
    pub fn dump(&self, instance: &Value, stop_on_error: bool) -> Result<IndexMap<String, Value>> {
        match instance {
            Value::Record(record) => self.dump_record(record, stop_on_error),
            other => Err(SchemaError::invalid_argument(format!(
                "dump expects a model instance, got {}",
                other.type_name()
            ))),
        }
    }

    pub fn dump_record(
        &self,
        record: &Record,
        stop_on_error: bool,
    ) -> Result<IndexMap<String, Value>> {
        let entry = self.entry()?;
        let mut result = IndexMap::with_capacity(entry.fields().len());
        let mut errors = IndexMap::new();

        for attr in entry.attributes() {
            let Some(field) = entry.fields().get(attr) else {
                continue;
            };
            let item = record.get(attr).unwrap_or(&Value::Null);
            match field.dump(item) {
                Ok(value) => {
                    result.insert(attr.clone(), value);
                }
                Err(err) if stop_on_error => return Err(err),
                Err(err) => {
                    tracing::debug!(schema = %self.id, attribute = %attr, error = %err, "attribute failed to dump");
                    errors.insert(attr.clone(), err.to_string());
                }
            }
        }

        if errors.is_empty() {
            Ok(result)
        } else {
            Err(SchemaError::DumpFailed { errors })
        }
    }

    /// Dump any serde model.
    pub fn dump_model<T: Serialize>(
        &self,
        model: &T,
        stop_on_error: bool,
    ) -> Result<IndexMap<String, Value>> {
        self.dump_record(&Record::from_model(model)?, stop_on_error)
    }

    /// Dump and encode as a JSON object, keys in attribute order.
    pub fn dump_to_json(&self, instance: &Value, stop_on_error: bool) -> Result<String> {
        let dumped = self.dump(instance, stop_on_error)?;
        Ok(serde_json::to_string(&dumped)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::FieldSpec;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Article {
        id: i64,
        title: String,
        views: Option<i64>,
    }

    struct ArticleSchema;

    impl DeclareSchema for ArticleSchema {
        fn definition() -> SchemaDefinition {
            SchemaDefinition::new()
                .model::<Article>()
                .field("ID", FieldSpec::integer().required(true))
                .field("title", FieldSpec::string().required(true).max(80))
        }
    }

    #[test]
    fn compiles_once_and_keys_fields_by_name() {
        let first = Schema::of::<ArticleSchema>().unwrap();
        let second = Schema::of::<ArticleSchema>().unwrap();
        assert_eq!(first, second);
        assert!(first.id().ends_with("ArticleSchema"));

        let fields = first.fields().unwrap();
        let names: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["id", "title"]);
        assert_eq!(first.model().unwrap().attributes(), ["id", "title", "views"]);
    }

    #[test]
    fn attributes_without_fields_are_skipped() {
        let schema = Schema::of::<ArticleSchema>().unwrap();
        let article = Article {
            id: 1,
            title: " Hello ".into(),
            views: None,
        };
        let dumped = schema.dump_model(&article, true).unwrap();
        assert_eq!(dumped.len(), 2);
        assert_eq!(dumped["title"], Value::from("Hello"));
        assert!(schema.validate_model(&article).unwrap());
    }

    #[test]
    fn dump_requires_a_record() {
        let schema = Schema::of::<ArticleSchema>().unwrap();
        let map: Value = vec![("id", 1)].into_iter().collect();
        assert!(matches!(
            schema.dump(&map, false),
            Err(SchemaError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn validate_rejects_scalars() {
        let schema = Schema::of::<ArticleSchema>().unwrap();
        assert!(!schema.validate(&Value::Int(1)).unwrap());
        assert!(!schema.validate(&Value::Null).unwrap());
    }

    #[test]
    fn new_record_has_every_attribute() {
        let schema = Schema::of::<ArticleSchema>().unwrap();
        let record = schema.new_record().unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("views"), Some(&Value::Null));
    }

    #[test]
    fn lookup_requires_registration() {
        assert!(matches!(
            Schema::lookup("schema::tests::NeverCompiled"),
            Err(SchemaError::NotRegistered { .. })
        ));
        let compiled = Schema::of::<ArticleSchema>().unwrap();
        assert_eq!(Schema::lookup(compiled.id()).unwrap(), compiled);
    }

    #[test]
    fn missing_model_is_reported() {
        let def = SchemaDefinition::new().field("id", FieldSpec::integer());
        assert_eq!(
            Schema::compile("schema::tests::NoModel", def).unwrap_err(),
            SchemaError::NoModelDefined {
                schema: "schema::tests::NoModel".into()
            }
        );
        assert!(!Registry::global().registered("schema::tests::NoModel"));
    }

    #[test]
    fn guard_unwinds_after_failure() {
        let def = SchemaDefinition::new().field("id", FieldSpec::integer());
        let _ = Schema::compile("schema::tests::Unwind", def.clone());
        // A second attempt must not be mistaken for a cycle.
        assert!(matches!(
            Schema::compile("schema::tests::Unwind", def),
            Err(SchemaError::NoModelDefined { .. })
        ));
    }
}
