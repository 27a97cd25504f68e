use crate::datetime::{DEFAULT_FORMAT, Timestamp};
use crate::error::{Result, SchemaError};
use crate::field::{Bounds, FieldBase, RangedField};
use crate::kind::FieldKind;
use crate::value::{Number, Value, parse_numeric};

/// A point in time, optionally bounded.
///
/// `format` only affects how dumped timestamps render; it plays no part in
/// validation.
#[derive(Debug, Clone, PartialEq)]
pub struct DateTimeField {
    pub(crate) base: FieldBase,
    bounds: Bounds<Timestamp>,
    format: String,
}

field_common!(DateTimeField);

impl DateTimeField {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::ranged(name, None, None)
    }

    pub fn ranged(
        name: impl Into<String>,
        min: Option<Timestamp>,
        max: Option<Timestamp>,
    ) -> Result<Self> {
        let bounds = Bounds::new(min, max)?;
        Ok(Self {
            base: FieldBase::new(FieldKind::DateTime, name)?,
            bounds,
            format: DEFAULT_FORMAT.to_owned(),
        })
    }

    /// Set the display format token (`c`, `Y-m-d H:i:s`, ...).
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    #[must_use]
    pub fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Null => self.base.nullable,
            Value::DateTime(ts) => self.bounds.contains(ts),
            Value::String(s) => Timestamp::parse(s).is_ok_and(|ts| self.bounds.contains(&ts)),
            _ => false,
        }
    }

    /// Numbers and all-digit strings are read as Unix epoch seconds.
    pub fn dump(&self, value: &Value) -> Result<Value> {
        let ts = match value {
            Value::DateTime(ts) => return Ok(Value::DateTime(ts.clone())),
            Value::Int(secs) => Timestamp::from_epoch(*secs)?,
            Value::Float(secs) => Timestamp::from_epoch_f64(*secs)?,
            Value::String(s) => {
                let trimmed = s.trim();
                match parse_numeric(trimmed) {
                    Some(Number::Int(secs)) => Timestamp::from_epoch(secs)?,
                    Some(Number::Float(secs)) => Timestamp::from_epoch_f64(secs)?,
                    None => Timestamp::parse(trimmed)?,
                }
            }
            _ => return Err(SchemaError::InvalidValue),
        };
        Ok(Value::DateTime(ts.with_format(self.format.clone())))
    }
}

impl RangedField for DateTimeField {
    type Bound = Timestamp;

    fn bounds(&self) -> &Bounds<Timestamp> {
        &self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_630_311_855;

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_epoch(secs).unwrap()
    }

    #[test]
    fn kind_and_default_format() {
        let f = DateTimeField::new("created").unwrap();
        assert_eq!(f.kind(), FieldKind::DateTime);
        assert_eq!(f.format(), "c");
        assert_eq!(f.with_format("Y-m-d").format(), "Y-m-d");
    }

    #[test]
    fn min_after_max_fails() {
        assert!(DateTimeField::ranged("t", Some(at(T + 1)), Some(at(T))).is_err());
        assert!(DateTimeField::ranged("t", Some(at(T)), Some(at(T))).is_ok());
    }

    #[test]
    fn validates_instants_and_parseable_strings() {
        let f = DateTimeField::new("t").unwrap();
        assert!(f.validate(&Value::DateTime(at(T))));
        assert!(f.validate(&Value::from("2021-08-30 08:24:15")));
        assert!(f.validate(&Value::from("2021-08-30T08:24:15+00:00")));
        assert!(!f.validate(&Value::from("invalid")));
        assert!(!f.validate(&Value::from("")));
        assert!(!f.validate(&Value::Bool(true)));
    }

    #[test]
    fn range_is_inclusive_at_both_ends() {
        let f = DateTimeField::ranged("t", Some(at(T)), Some(at(T))).unwrap();
        assert!(f.validate(&Value::DateTime(at(T))));
        assert!(f.validate(&Value::from("2021-08-30T08:24:15Z")));
        assert!(!f.validate(&Value::DateTime(at(T - 1))));
        assert!(!f.validate(&Value::DateTime(at(T + 1))));
    }

    #[test]
    fn range_is_exact_to_the_microsecond() {
        let t = Timestamp::parse("2021-01-01T15:03:01.012345Z").unwrap();
        let f = DateTimeField::ranged("t", Some(t.clone()), Some(t)).unwrap();
        assert!(f.validate(&Value::from("2021-01-01T15:03:01.012345Z")));
        assert!(f.validate(&Value::from("2021-01-01T16:03:01.012345+01:00")));
        assert!(!f.validate(&Value::from("2021-01-01T15:03:01.012344Z")));
        assert!(!f.validate(&Value::from("2021-01-01T15:03:01.012346Z")));
    }

    #[test]
    fn dump_reads_epochs() {
        let f = DateTimeField::new("t").unwrap();
        let from_int = f.dump(&Value::Int(T)).unwrap();
        let from_str = f.dump(&Value::from(T.to_string())).unwrap();
        assert_eq!(from_int, from_str);
        assert_eq!(from_int, Value::DateTime(at(T)));
        assert_eq!(f.dump(&Value::from(" 0 ")).unwrap(), Value::DateTime(at(0)));
    }

    #[test]
    fn dump_parses_strings_and_applies_format() {
        let f = DateTimeField::new("t").unwrap().with_format("Y-m-d H:i:s");
        let dumped = f.dump(&Value::from(" 2021-08-30T08:24:15+00:00 ")).unwrap();
        let ts = dumped.as_timestamp().unwrap();
        assert_eq!(ts, &at(T));
        assert_eq!(ts.render(), "2021-08-30 08:24:15");
    }

    #[test]
    fn typed_instants_pass_through() {
        let f = DateTimeField::new("t").unwrap().with_format("U");
        let original = at(T).with_format("Y");
        let dumped = f.dump(&Value::DateTime(original)).unwrap();
        assert_eq!(dumped.as_timestamp().unwrap().format(), "Y");
    }

    #[test]
    fn dump_failures() {
        let f = DateTimeField::new("t").unwrap();
        assert_eq!(f.dump(&Value::from("invalid")), Err(SchemaError::InvalidValue));
        assert_eq!(f.dump(&Value::Null), Err(SchemaError::InvalidValue));
        assert_eq!(f.dump(&Value::Bool(true)), Err(SchemaError::InvalidValue));
    }
}
