use crate::error::{Result, SchemaError};
use crate::field::FieldBase;
use crate::kind::FieldKind;
use crate::model::Record;
use crate::schema::Schema;
use crate::value::Value;

/// An attribute that is itself a record governed by another schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub(crate) base: FieldBase,
    schema: Schema,
}

field_common!(SchemaField);

impl SchemaField {
    pub fn new(name: impl Into<String>, schema: Schema) -> Result<Self> {
        Ok(Self {
            base: FieldBase::new(FieldKind::Schema, name)?,
            schema,
        })
    }

    /// The nested schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Every nested field must accept its attribute; missing attributes are
    /// checked as null and extra ones are ignored.
    ///
    /// Fails only when the nested schema is not registered.
    pub fn validate(&self, value: &Value) -> Result<bool> {
        match value {
            Value::Null => return Ok(self.base.nullable),
            Value::Map(_) | Value::Record(_) => {}
            _ => return Ok(false),
        }
        let fields = self.schema.fields()?;
        for (name, field) in fields.iter() {
            let item = value.attribute(name).unwrap_or(&Value::Null);
            if !field.validate(item)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Records pass through; mappings are copied key by key into a new
    /// instance of the nested model without validation.
    pub fn dump(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Record(record) => Ok(Value::Record(record.clone())),
            Value::Map(map) => {
                let model = self.schema.model()?;
                let mut record = Record::new(&model);
                for (key, item) in map {
                    record.set(key.clone(), item.clone());
                }
                Ok(Value::Record(record))
            }
            _ => Err(SchemaError::InvalidValue),
        }
    }
}
