//! Model descriptors and model-shaped records.
//!
//! A model is any plain data holder with named public attributes. Rust has
//! no runtime reflection, so a [`ModelDef`] captures the model's name and
//! attribute order up front (usually derived through serde), and a
//! [`Record`] is an instance of that shape holding [`Value`]s.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Result, SchemaError};
use crate::value::Value;

/// Name and ordered attribute list of a model type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDef {
    name: String,
    attributes: Vec<String>,
}

impl ModelDef {
    pub fn new<I, S>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }

    /// Describe `T` by serializing its default instance and reading the
    /// object keys in declaration order.
    ///
    /// Only keys the default instance actually serializes are attributes, so
    /// fields behind `#[serde(skip)]` or a `skip_serializing_if` that holds
    /// for the default are left out. Schemas declaring such a field fail to
    /// compile; list the attributes with [`ModelDef::new`] instead.
    pub fn of<T: Serialize + Default>() -> Result<Self> {
        let name = std::any::type_name::<T>();
        match serde_json::to_value(T::default())? {
            serde_json::Value::Object(map) => Ok(Self::new(name, map.keys().cloned())),
            other => Err(SchemaError::invalid_argument(format!(
                "model `{name}` serializes to {other}, not an object"
            ))),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last path segment of [`name`](Self::name).
    #[must_use]
    pub fn short_name(&self) -> &str {
        short_type_name(&self.name)
    }

    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr == name)
    }
}

/// An instance of a model: its name plus attribute values in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    model: String,
    values: IndexMap<String, Value>,
}

impl Record {
    /// A blank instance with every attribute set to `Null`.
    #[must_use]
    pub fn new(model: &ModelDef) -> Self {
        Self {
            model: model.name().to_owned(),
            values: model
                .attributes()
                .iter()
                .map(|attr| (attr.clone(), Value::Null))
                .collect(),
        }
    }

    /// Snapshot a serde-serializable struct. Nested structs become maps.
    pub fn from_model<T: Serialize>(model: &T) -> Result<Self> {
        let name = std::any::type_name::<T>();
        match serde_json::to_value(model)? {
            serde_json::Value::Object(map) => Ok(Self {
                model: name.to_owned(),
                values: map
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            }),
            other => Err(SchemaError::invalid_argument(format!(
                "model `{name}` serializes to {other}, not an object"
            ))),
        }
    }

    /// Rebuild a typed model from this record.
    pub fn into_model<T: DeserializeOwned>(&self) -> Result<T> {
        let json = serde_json::to_value(self)?;
        Ok(serde_json::from_value(json)?)
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Assign an attribute. Keys outside the model's attribute list are
    /// appended.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    #[must_use]
    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

pub(crate) fn short_type_name(full: &str) -> &str {
    // Generic arguments may contain `::` too; cut at the first `<`.
    let head = full.split('<').next().unwrap_or(full);
    head.rsplit("::").next().unwrap_or(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct User {
        id: i64,
        username: String,
        description: Option<String>,
    }

    #[test]
    fn model_def_reads_attribute_order_from_serde() {
        let def = ModelDef::of::<User>().unwrap();
        assert_eq!(def.attributes(), ["id", "username", "description"]);
        assert_eq!(def.short_name(), "User");
        assert!(def.name().ends_with("::User"));
        assert!(def.has_attribute("username"));
        assert!(!def.has_attribute("token"));
    }

    #[test]
    fn model_def_rejects_non_struct_models() {
        assert!(matches!(
            ModelDef::of::<i64>(),
            Err(SchemaError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn new_record_starts_with_nulls() {
        let def = ModelDef::new("User", ["id", "username"]);
        let record = Record::new(&def);
        assert_eq!(record.model(), "User");
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("id"), Some(&Value::Null));
        assert_eq!(record.get("token"), None);
    }

    #[test]
    fn record_round_trips_through_a_typed_model() {
        let user = User {
            id: 7,
            username: "testuser".into(),
            description: None,
        };
        let record = Record::from_model(&user).unwrap();
        assert_eq!(record.get("id"), Some(&Value::Int(7)));
        assert_eq!(record.get("description"), Some(&Value::Null));

        let back: User = record.into_model().unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn set_appends_unknown_keys() {
        let def = ModelDef::new("User", ["id"]);
        let record = Record::new(&def).with("id", 1).with("extra", "x");
        let keys: Vec<&str> = record.values().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "extra"]);

        let pairs: Vec<(&str, &Value)> = record.iter().map(|(k, v)| (k.as_str(), v)).collect();
        assert_eq!(pairs, vec![("id", &Value::Int(1)), ("extra", &Value::from("x"))]);
    }

    #[test]
    fn records_serialize_as_objects() {
        let def = ModelDef::new("User", ["id", "username"]);
        let record = Record::new(&def).with("id", 2).with("username", "u");
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":2,"username":"u"}"#
        );
    }

    #[test]
    fn short_type_names() {
        assert_eq!(short_type_name("app::model::User"), "User");
        assert_eq!(short_type_name("User"), "User");
        assert_eq!(short_type_name("app::Wrapper<app::Inner>"), "Wrapper");
    }
}
