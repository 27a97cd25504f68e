use crate::error::{Result, SchemaError};
use crate::field::FieldBase;
use crate::kind::FieldKind;
use crate::value::Value;

const TRUE_TOKENS: [&str; 5] = ["y", "yes", "true", "on", "1"];
const FALSE_TOKENS: [&str; 5] = ["n", "no", "false", "off", "0"];

/// A boolean flag. Accepts native booleans, any number, and the yes/no
/// style tokens in any case.
#[derive(Debug, Clone, PartialEq)]
pub struct BoolField {
    pub(crate) base: FieldBase,
}

field_common!(BoolField);

impl BoolField {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base: FieldBase::new(FieldKind::Bool, name)?,
        })
    }

    #[must_use]
    pub fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Null => self.base.nullable,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => true,
            Value::String(s) => token(s).is_some(),
            _ => false,
        }
    }

    pub fn dump(&self, value: &Value) -> Result<Value> {
        let flag = match value {
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => token(s).ok_or(SchemaError::InvalidValue)?,
            _ => return Err(SchemaError::InvalidValue),
        };
        Ok(Value::Bool(flag))
    }
}

fn token(raw: &str) -> Option<bool> {
    let folded = raw.trim().to_lowercase();
    if TRUE_TOKENS.contains(&folded.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&folded.as_str()) {
        Some(false)
    } else {
        None
    }
}
