use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::value::Value;

/// The kind of a field, determining which input shapes it accepts and what
/// `dump` produces.
///
/// Each kind has a stable numeric id and a symbolic upper-case name; both
/// resolve to the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldKind {
    Integer = 1,
    String = 2,
    Double = 3,
    Regex = 4,
    Email = 5,
    Bool = 6,
    DateTime = 7,
    Schema = 8,
}

impl FieldKind {
    /// Every kind, in id order.
    pub const ALL: [FieldKind; 8] = [
        Self::Integer,
        Self::String,
        Self::Double,
        Self::Regex,
        Self::Email,
        Self::Bool,
        Self::DateTime,
        Self::Schema,
    ];

    const NAMES: [&'static str; 8] = [
        "INTEGER", "STRING", "DOUBLE", "REGEX", "EMAIL", "BOOL", "DATETIME", "SCHEMA",
    ];

    /// Resolve a kind from either its name (string value) or its id
    /// (integer value).
    pub fn of(key: &Value) -> Result<Self> {
        match key {
            Value::Int(id) => Self::from_id(*id),
            Value::String(name) => Self::from_name(name),
            other => Err(SchemaError::InvalidKind {
                value: other.type_name().to_owned(),
            }),
        }
    }

    /// Resolve a kind by its stable numeric id.
    pub fn from_id(id: i64) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| i64::from(kind.id()) == id)
            .ok_or_else(|| SchemaError::InvalidKind {
                value: id.to_string(),
            })
    }

    /// Resolve a kind by its exact symbolic name (`"INTEGER"`, `"BOOL"`, ...).
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| SchemaError::InvalidKind {
                value: name.to_owned(),
            })
    }

    /// The stable numeric id.
    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// The symbolic name.
    #[must_use]
    pub fn name(self) -> &'static str {
        Self::NAMES[usize::from(self.id()) - 1]
    }

    /// The closed catalog of symbolic names.
    #[must_use]
    pub fn known_names() -> &'static [&'static str] {
        &Self::NAMES
    }

    /// Whether `name` is one of the builtin kind names.
    #[must_use]
    pub fn is_known(name: &str) -> bool {
        Self::NAMES.contains(&name)
    }

    /// Kinds that accept a `min`/`max` bound.
    #[must_use]
    pub fn is_ranged(self) -> bool {
        matches!(
            self,
            Self::Integer | Self::String | Self::Double | Self::DateTime
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = SchemaError;

    /// Case-insensitive lookup by name.
    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(&s.trim().to_ascii_uppercase())
    }
}

impl TryFrom<i64> for FieldKind {
    type Error = SchemaError;

    fn try_from(id: i64) -> Result<Self> {
        Self::from_id(id)
    }
}
