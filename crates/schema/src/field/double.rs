use crate::error::{Result, SchemaError};
use crate::field::{Bounds, FieldBase, RangedField};
use crate::kind::FieldKind;
use crate::value::{Value, numeric};

/// A floating point number, optionally bounded. Integers and numeric
/// strings are accepted and widened.
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleField {
    pub(crate) base: FieldBase,
    bounds: Bounds<f64>,
}

field_common!(DoubleField);

impl DoubleField {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::ranged(name, None, None)
    }

    pub fn ranged(name: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Result<Self> {
        let bounds = Bounds::new(min, max)?;
        Ok(Self {
            base: FieldBase::new(FieldKind::Double, name)?,
            bounds,
        })
    }

    #[must_use]
    pub fn validate(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.base.nullable;
        }
        numeric(value).is_ok_and(|n| self.bounds.contains(&n.as_f64()))
    }

    pub fn dump(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Int(_) | Value::Float(_) | Value::String(_) => {
                Ok(Value::Float(numeric(value)?.as_f64()))
            }
            _ => Err(SchemaError::InvalidValue),
        }
    }
}

impl RangedField for DoubleField {
    type Bound = f64;

    fn bounds(&self) -> &Bounds<f64> {
        &self.bounds
    }
}
