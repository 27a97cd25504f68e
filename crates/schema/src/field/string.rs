use crate::error::{Result, SchemaError};
use crate::field::{Bounds, FieldBase, RangedField};
use crate::kind::FieldKind;
use crate::value::Value;

/// A string whose length, counted in characters, may be bounded.
#[derive(Debug, Clone, PartialEq)]
pub struct StringField {
    pub(crate) base: FieldBase,
    bounds: Bounds<usize>,
}

field_common!(StringField);

impl StringField {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::ranged(name, None, None)
    }

    /// With both bounds set each must be non-negative; a lone bound must be
    /// at least 1.
    pub fn ranged(name: impl Into<String>, min: Option<i64>, max: Option<i64>) -> Result<Self> {
        let (min, max) = match (min, max) {
            (Some(lo), Some(hi)) if lo < 0 || hi < 0 => {
                return Err(SchemaError::invalid_argument(
                    "length bounds must not be negative",
                ));
            }
            (Some(bound), None) | (None, Some(bound)) if bound < 1 => {
                return Err(SchemaError::invalid_argument(
                    "a single length bound must be at least 1",
                ));
            }
            other => other,
        };
        let bounds = Bounds::new(min.map(|n| n as usize), max.map(|n| n as usize))?;
        Ok(Self {
            base: FieldBase::new(FieldKind::String, name)?,
            bounds,
        })
    }

    #[must_use]
    pub fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Null => self.base.nullable,
            Value::String(s) => self.bounds.contains(&s.chars().count()),
            _ => false,
        }
    }

    pub fn dump(&self, value: &Value) -> Result<Value> {
        match value {
            Value::String(s) => Ok(Value::String(s.trim().to_owned())),
            _ => Err(SchemaError::InvalidValue),
        }
    }
}

impl RangedField for StringField {
    type Bound = usize;

    fn bounds(&self) -> &Bounds<usize> {
        &self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_rules() {
        assert!(StringField::ranged("s", Some(0), Some(0)).is_ok());
        assert!(StringField::ranged("s", Some(1), None).is_ok());
        assert!(StringField::ranged("s", None, Some(1)).is_ok());

        assert!(StringField::ranged("s", Some(-1), Some(3)).is_err());
        assert!(StringField::ranged("s", Some(1), Some(-3)).is_err());
        assert!(StringField::ranged("s", Some(-1), None).is_err());
        assert!(StringField::ranged("s", Some(0), None).is_err());
        assert!(StringField::ranged("s", None, Some(0)).is_err());
        assert!(StringField::ranged("s", Some(4), Some(3)).is_err());
    }

    #[test]
    fn only_strings_validate() {
        let f = StringField::new("username").unwrap();
        assert!(f.validate(&Value::from("")));
        assert!(f.validate(&Value::from("testuser")));
        assert!(!f.validate(&Value::Int(7)));
        assert!(!f.validate(&Value::Bool(true)));
    }

    #[test]
    fn length_is_counted_in_characters() {
        let f = StringField::ranged("s", Some(2), Some(3)).unwrap();
        assert_eq!(f.min(), Some(&2));
        assert_eq!(f.max(), Some(&3));
        assert!(f.validate(&Value::from("ab")));
        assert!(f.validate(&Value::from("äöü")));
        assert!(!f.validate(&Value::from("a")));
        assert!(!f.validate(&Value::from("abcd")));
    }

    #[test]
    fn one_sided_lengths() {
        let min = StringField::ranged("s", Some(3), None).unwrap();
        assert!(!min.validate(&Value::from("ab")));
        assert!(min.validate(&Value::from("abcdefgh")));

        let max = StringField::ranged("s", None, Some(3)).unwrap();
        assert!(max.validate(&Value::from("")));
        assert!(!max.validate(&Value::from("abcd")));
    }

    #[test]
    fn dump_trims() {
        let f = StringField::new("s").unwrap();
        assert_eq!(f.dump(&Value::from("  hi \n")).unwrap(), Value::from("hi"));
        assert_eq!(f.dump(&Value::Int(7)), Err(SchemaError::InvalidValue));
        assert_eq!(f.dump(&Value::Null), Err(SchemaError::InvalidValue));
    }
}
