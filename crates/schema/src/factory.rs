//! Field declarations and the factory that turns them into [`Field`]s.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::datetime::Timestamp;
use crate::error::{Result, SchemaError};
use crate::field::{
    BoolField, DateTimeField, DoubleField, EmailField, Field, IntField, RegExField, SchemaField,
    StringField,
};
use crate::kind::FieldKind;
use crate::schema::{DeclareSchema, Schema};
use crate::value::{Number, Value, numeric};

/// Resolves the schema a nested field points at.
pub type SchemaResolver = fn() -> Result<Schema>;

const fn default_nullable() -> bool {
    true
}

/// The declaration of a single field: kind plus constraints.
///
/// Deserializes from the usual parameter-bag shape:
///
/// ```json
/// { "type": "integer", "required": true, "min": 1 }
/// ```
///
/// `type` is case-insensitive for builtin kinds and defaults to `string`.
/// Any other type name refers to a schema registered in the [`Catalog`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default = "default_nullable")]
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Direct reference to a nested schema type, bypassing the catalog.
    #[serde(skip)]
    pub nested: Option<SchemaResolver>,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            field_type: None,
            name: None,
            required: false,
            nullable: true,
            min: None,
            max: None,
            pattern: None,
            format: None,
            default: None,
            nested: None,
        }
    }
}

impl FieldSpec {
    /// A declaration of the given type name.
    #[must_use]
    pub fn of_type(type_name: impl Into<String>) -> Self {
        Self {
            field_type: Some(type_name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn integer() -> Self {
        Self::of_type(FieldKind::Integer.name())
    }

    #[must_use]
    pub fn string() -> Self {
        Self::of_type(FieldKind::String.name())
    }

    #[must_use]
    pub fn double() -> Self {
        Self::of_type(FieldKind::Double.name())
    }

    #[must_use]
    pub fn boolean() -> Self {
        Self::of_type(FieldKind::Bool.name())
    }

    #[must_use]
    pub fn email() -> Self {
        Self::of_type(FieldKind::Email.name())
    }

    #[must_use]
    pub fn datetime() -> Self {
        Self::of_type(FieldKind::DateTime.name())
    }

    #[must_use]
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::of_type(FieldKind::Regex.name()).pattern(pattern)
    }

    /// A nested record validated by schema `S`.
    #[must_use]
    pub fn nested<S: DeclareSchema>() -> Self {
        Self {
            nested: Some(Schema::of::<S>),
            ..Self::of_type(FieldKind::Schema.name())
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[must_use]
    pub fn min(mut self, min: impl Into<Value>) -> Self {
        self.min = Some(min.into());
        self
    }

    #[must_use]
    pub fn max(mut self, max: impl Into<Value>) -> Self {
        self.max = Some(max.into());
        self
    }

    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// The declared type name, or `string` when absent.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.field_type.as_deref().unwrap_or("string")
    }

    fn has_range(&self) -> bool {
        self.min.as_ref().is_some_and(|v| !v.is_null())
            || self.max.as_ref().is_some_and(|v| !v.is_null())
    }
}

/// Builds fields from [`FieldSpec`]s. Holds no state.
pub struct FieldFactory;

impl FieldFactory {
    /// Build a field. `default_name` is used, lower-cased, when the spec
    /// carries no explicit name.
    pub fn create(spec: &FieldSpec, default_name: Option<&str>) -> Result<Field> {
        let name = match (spec.name.as_deref(), default_name) {
            (Some(name), _) if !name.is_empty() => name.to_owned(),
            (None, Some(fallback)) if !fallback.is_empty() => fallback.to_lowercase(),
            _ => return Err(SchemaError::MissingName),
        };
        let type_name = spec.type_name();
        let upper = type_name.to_uppercase();
        let kind = FieldKind::from_name(&upper).ok();

        if spec.has_range() && !kind.is_some_and(FieldKind::is_ranged) {
            return Err(SchemaError::unsupported(&upper, "range"));
        }
        if spec.format.is_some() && kind != Some(FieldKind::DateTime) {
            return Err(SchemaError::unsupported(&upper, "format"));
        }
        if spec.pattern.is_some() && kind != Some(FieldKind::Regex) {
            return Err(SchemaError::unsupported(&upper, "pattern"));
        }

        let mut field: Field = match kind {
            Some(FieldKind::Integer) => IntField::ranged(
                name.as_str(),
                int_bound(spec.min.as_ref())?,
                int_bound(spec.max.as_ref())?,
            )?
            .into(),
            Some(FieldKind::String) => StringField::ranged(
                name.as_str(),
                int_bound(spec.min.as_ref())?,
                int_bound(spec.max.as_ref())?,
            )?
            .into(),
            Some(FieldKind::Double) => DoubleField::ranged(
                name.as_str(),
                float_bound(spec.min.as_ref())?,
                float_bound(spec.max.as_ref())?,
            )?
            .into(),
            Some(FieldKind::DateTime) => {
                let field = DateTimeField::ranged(
                    name.as_str(),
                    instant_bound(spec.min.as_ref())?,
                    instant_bound(spec.max.as_ref())?,
                )?;
                match &spec.format {
                    Some(format) => field.with_format(format.as_str()).into(),
                    None => field.into(),
                }
            }
            Some(FieldKind::Regex) => {
                RegExField::new(name.as_str(), spec.pattern.clone().unwrap_or_default())?.into()
            }
            Some(FieldKind::Email) => EmailField::new(name.as_str())?.into(),
            Some(FieldKind::Bool) => BoolField::new(name.as_str())?.into(),
            Some(FieldKind::Schema) | None => {
                SchemaField::new(name.as_str(), Self::resolve_schema(spec, type_name)?)?.into()
            }
        };

        field.set_flags(spec.required, spec.nullable);
        if let Some(default) = spec.default.as_ref().filter(|v| !v.is_null()) {
            let typed = field.dump(default).map_err(|err| {
                SchemaError::invalid_argument(format!("default for `{name}`: {err}"))
            })?;
            field.set_default(typed);
        }
        Ok(field)
    }

    fn resolve_schema(spec: &FieldSpec, type_name: &str) -> Result<Schema> {
        if let Some(resolve) = spec.nested {
            return resolve();
        }
        match Catalog::global().schema_resolver(type_name) {
            Some(resolve) => resolve(),
            None => Err(SchemaError::UnknownType {
                type_name: type_name.to_owned(),
            }),
        }
    }
}

fn int_bound(bound: Option<&Value>) -> Result<Option<i64>> {
    match bound {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match numeric(value) {
            Ok(Number::Int(i)) => Ok(Some(i)),
            _ => Err(SchemaError::invalid_argument(format!(
                "bound must be an integer, got {}",
                value.type_name()
            ))),
        },
    }
}

fn float_bound(bound: Option<&Value>) -> Result<Option<f64>> {
    match bound {
        None | Some(Value::Null) => Ok(None),
        Some(value) => numeric(value).map(|n| Some(n.as_f64())).map_err(|_| {
            SchemaError::invalid_argument(format!(
                "bound must be a number, got {}",
                value.type_name()
            ))
        }),
    }
}

fn instant_bound(bound: Option<&Value>) -> Result<Option<Timestamp>> {
    let ts = match bound {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::DateTime(ts)) => ts.clone(),
        Some(Value::Int(secs)) => Timestamp::from_epoch(*secs)?,
        Some(Value::String(s)) => Timestamp::parse(s)?,
        Some(other) => {
            return Err(SchemaError::invalid_argument(format!(
                "bound must be a date-time, got {}",
                other.type_name()
            )));
        }
    };
    Ok(Some(ts))
}
