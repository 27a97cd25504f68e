//! Field definitions: one struct per kind, unified by the [`Field`] enum.
//!
//! Every field answers two questions about an untyped [`Value`]:
//!
//! - `validate`: is this value acceptable? Total and boolean; bad shapes
//!   give `false`, never an error.
//! - `dump`: convert an accepted value to its canonical typed form. Null
//!   and unconvertible shapes are errors.

use crate::error::Result;
use crate::kind::FieldKind;
use crate::value::Value;

/// Accessors and builder methods shared by every concrete field.
macro_rules! field_common {
    ($ty:ident) => {
        impl $ty {
            #[must_use]
            pub fn name(&self) -> &str {
                self.base.name()
            }

            #[must_use]
            pub fn kind(&self) -> $crate::kind::FieldKind {
                self.base.kind()
            }

            #[must_use]
            pub fn is_required(&self) -> bool {
                self.base.is_required()
            }

            #[must_use]
            pub fn is_nullable(&self) -> bool {
                self.base.is_nullable()
            }

            #[must_use]
            pub fn default_value(&self) -> Option<&$crate::value::Value> {
                self.base.default_value()
            }

            #[must_use]
            pub fn base(&self) -> &$crate::field::FieldBase {
                &self.base
            }

            /// Mark the field as required (advisory only).
            #[must_use]
            pub fn required(mut self, required: bool) -> Self {
                self.base.required = required;
                self
            }

            /// Whether `validate(null)` succeeds.
            #[must_use]
            pub fn nullable(mut self, nullable: bool) -> Self {
                self.base.nullable = nullable;
                self
            }

            /// Attach a default, stored as given.
            #[must_use]
            pub fn with_default(mut self, default: impl Into<$crate::value::Value>) -> Self {
                self.base.default = Some(default.into());
                self
            }
        }
    };
}

mod base;
mod boolean;
mod datetime;
mod double;
mod email;
mod integer;
mod nested;
mod pattern;
mod ranged;
mod string;

pub use base::FieldBase;
pub use boolean::BoolField;
pub use datetime::DateTimeField;
pub use double::DoubleField;
pub use email::{EmailField, is_valid_email};
pub use integer::IntField;
pub use nested::SchemaField;
pub use pattern::RegExField;
pub use ranged::{Bounds, RangedField};
pub use string::StringField;

/// A compiled field of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Bool(BoolField),
    Int(IntField),
    Double(DoubleField),
    String(StringField),
    Email(EmailField),
    RegEx(RegExField),
    DateTime(DateTimeField),
    Schema(SchemaField),
}

macro_rules! delegate_base {
    ($self:ident) => {
        match $self {
            Self::Bool(f) => f.base(),
            Self::Int(f) => f.base(),
            Self::Double(f) => f.base(),
            Self::String(f) => f.base(),
            Self::Email(f) => f.base(),
            Self::RegEx(f) => f.base(),
            Self::DateTime(f) => f.base(),
            Self::Schema(f) => f.base(),
        }
    };
}

impl Field {
    #[must_use]
    pub fn name(&self) -> &str {
        delegate_base!(self).name()
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        delegate_base!(self).kind()
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        delegate_base!(self).is_required()
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        delegate_base!(self).is_nullable()
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        delegate_base!(self).default_value()
    }

    /// Check `value` against the field.
    ///
    /// Only a nested schema field can fail, and only when its schema is
    /// missing from the registry.
    pub fn validate(&self, value: &Value) -> Result<bool> {
        Ok(match self {
            Self::Bool(f) => f.validate(value),
            Self::Int(f) => f.validate(value),
            Self::Double(f) => f.validate(value),
            Self::String(f) => f.validate(value),
            Self::Email(f) => f.validate(value),
            Self::RegEx(f) => f.validate(value),
            Self::DateTime(f) => f.validate(value),
            Self::Schema(f) => return f.validate(value),
        })
    }

    /// Convert `value` to the canonical typed form for this field's kind.
    pub fn dump(&self, value: &Value) -> Result<Value> {
        match self {
            Self::Bool(f) => f.dump(value),
            Self::Int(f) => f.dump(value),
            Self::Double(f) => f.dump(value),
            Self::String(f) => f.dump(value),
            Self::Email(f) => f.dump(value),
            Self::RegEx(f) => f.dump(value),
            Self::DateTime(f) => f.dump(value),
            Self::Schema(f) => f.dump(value),
        }
    }

    /// Set the stored default. Used by the factory after typing it.
    pub(crate) fn set_default(&mut self, default: Value) {
        let base = match self {
            Self::Bool(f) => &mut f.base,
            Self::Int(f) => &mut f.base,
            Self::Double(f) => &mut f.base,
            Self::String(f) => &mut f.base,
            Self::Email(f) => &mut f.base,
            Self::RegEx(f) => &mut f.base,
            Self::DateTime(f) => &mut f.base,
            Self::Schema(f) => &mut f.base,
        };
        base.default = Some(default);
    }

    /// Apply the flags common to every kind.
    pub(crate) fn set_flags(&mut self, required: bool, nullable: bool) {
        let base = match self {
            Self::Bool(f) => &mut f.base,
            Self::Int(f) => &mut f.base,
            Self::Double(f) => &mut f.base,
            Self::String(f) => &mut f.base,
            Self::Email(f) => &mut f.base,
            Self::RegEx(f) => &mut f.base,
            Self::DateTime(f) => &mut f.base,
            Self::Schema(f) => &mut f.base,
        };
        base.required = required;
        base.nullable = nullable;
    }
}

macro_rules! impl_from_field {
    ($($variant:ident($ty:ident)),* $(,)?) => {
        $(
            impl From<$ty> for Field {
                fn from(field: $ty) -> Self {
                    Self::$variant(field)
                }
            }
        )*
    };
}

impl_from_field!(
    Bool(BoolField),
    Int(IntField),
    Double(DoubleField),
    String(StringField),
    Email(EmailField),
    RegEx(RegExField),
    DateTime(DateTimeField),
    Schema(SchemaField),
);
