use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog::Catalog;
use crate::error::{Result, SchemaError};
use crate::factory::FieldSpec;
use crate::model::ModelDef;

/// How a schema names the model it is bound to.
#[derive(Clone)]
pub enum ModelRef {
    /// A model registered in the [`Catalog`].
    Named(String),
    /// A descriptor built by hand.
    Def(ModelDef),
    /// Computed on demand, typically `ModelDef::of::<T>`.
    Resolver(fn() -> Result<ModelDef>),
}

impl ModelRef {
    pub fn resolve(&self) -> Result<ModelDef> {
        match self {
            Self::Named(name) => Catalog::global().model(name),
            Self::Def(def) => Ok(def.clone()),
            Self::Resolver(resolve) => resolve(),
        }
    }
}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Def(def) => f.debug_tuple("Def").field(def).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl Serialize for ModelRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Named(name) => serializer.serialize_str(name),
            Self::Def(def) => def.serialize(serializer),
            Self::Resolver(resolve) => resolve()
                .map_err(<S::Error as serde::ser::Error>::custom)?
                .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ModelRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Named(String),
            Def(ModelDef),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Named(name) => Self::Named(name),
            Raw::Def(def) => Self::Def(def),
        })
    }
}

/// A schema's declaration: the bound model and its fields in order.
///
/// Built in code:
///
/// ```rust,ignore
/// SchemaDefinition::new()
///     .model::<User>()
///     .field("id", FieldSpec::integer().required(true))
///     .field("username", FieldSpec::string().required(true));
/// ```
///
/// or read from JSON, with the model named:
///
/// ```json
/// { "model": "User", "fields": { "id": { "type": "integer" } } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelRef>,

    #[serde(default)]
    pub fields: IndexMap<String, FieldSpec>,
}

impl SchemaDefinition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to a serde model type.
    #[must_use]
    pub fn model<T: Serialize + Default>(mut self) -> Self {
        self.model = Some(ModelRef::Resolver(ModelDef::of::<T>));
        self
    }

    /// Bind to a model by catalog name.
    #[must_use]
    pub fn model_named(mut self, name: impl Into<String>) -> Self {
        self.model = Some(ModelRef::Named(name.into()));
        self
    }

    /// Bind to a hand-built model descriptor.
    #[must_use]
    pub fn model_def(mut self, model: ModelDef) -> Self {
        self.model = Some(ModelRef::Def(model));
        self
    }

    /// Declare a field. The key names the field unless the spec sets one.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(key.into(), spec);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub(crate) fn resolve_model(&self, schema: &str) -> Result<ModelDef> {
        self.model
            .as_ref()
            .ok_or_else(|| SchemaError::NoModelDefined {
                schema: schema.to_owned(),
            })?
            .resolve()
    }
}
