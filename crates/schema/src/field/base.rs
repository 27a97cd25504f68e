use crate::error::{Result, SchemaError};
use crate::kind::FieldKind;
use crate::value::Value;

/// Attributes shared by every field kind.
///
/// `required` is advisory: neither `validate` nor `dump` enforce it. The
/// default is descriptive metadata for callers and is never applied
/// automatically.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBase {
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) required: bool,
    pub(crate) nullable: bool,
    pub(crate) default: Option<Value>,
}

impl FieldBase {
    /// Fails when `name` is empty.
    pub fn new(kind: FieldKind, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::invalid_argument("name is required"));
        }
        Ok(Self {
            name,
            kind,
            required: false,
            nullable: true,
            default: None,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_optional_and_nullable() {
        let base = FieldBase::new(FieldKind::Integer, "id").unwrap();
        assert_eq!(base.name(), "id");
        assert_eq!(base.kind(), FieldKind::Integer);
        assert!(!base.is_required());
        assert!(base.is_nullable());
        assert!(base.default_value().is_none());
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(
            FieldBase::new(FieldKind::String, ""),
            Err(SchemaError::InvalidArgument { .. })
        ));
    }
}
