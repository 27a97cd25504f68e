use crate::error::{Result, SchemaError};
use crate::field::{Bounds, FieldBase, RangedField};
use crate::kind::FieldKind;
use crate::value::{Number, Value, numeric};

/// An integer, optionally bounded. Integral numeric strings are accepted;
/// floats and fractional strings are not.
#[derive(Debug, Clone, PartialEq)]
pub struct IntField {
    pub(crate) base: FieldBase,
    bounds: Bounds<i64>,
}

field_common!(IntField);

impl IntField {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::ranged(name, None, None)
    }

    /// Fails when both bounds are set and `min > max`.
    pub fn ranged(name: impl Into<String>, min: Option<i64>, max: Option<i64>) -> Result<Self> {
        let bounds = Bounds::new(min, max)?;
        Ok(Self {
            base: FieldBase::new(FieldKind::Integer, name)?,
            bounds,
        })
    }

    #[must_use]
    pub fn validate(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.base.nullable;
        }
        match numeric(value) {
            Ok(Number::Int(i)) => self.bounds.contains(&i),
            _ => false,
        }
    }

    pub fn dump(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Int(i) => Ok(Value::Int(*i)),
            Value::String(_) => match numeric(value)? {
                Number::Int(i) => Ok(Value::Int(i)),
                Number::Float(_) => Err(SchemaError::InvalidValue),
            },
            _ => Err(SchemaError::InvalidValue),
        }
    }
}

impl RangedField for IntField {
    type Bound = i64;

    fn bounds(&self) -> &Bounds<i64> {
        &self.bounds
    }
}
