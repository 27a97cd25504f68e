use indexmap::IndexMap;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Error type for field, registry and schema operations.
///
/// Validation never produces these for bad data: `validate` answers with a
/// boolean. Errors come from construction, from `dump` conversions and from
/// registry lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A constructor received an argument that breaks one of its invariants.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Neither a known kind name nor a known kind id.
    #[error("invalid field kind `{value}`")]
    InvalidKind { value: String },

    /// Numeric coercion was attempted on a non-numeric value.
    #[error("Not a numeric value")]
    NotNumeric,

    /// `dump` received a value it cannot convert for the field's kind.
    #[error("Invalid value")]
    InvalidValue,

    /// The schema id has no registry entry.
    #[error("`{schema}` has not been registered")]
    NotRegistered { schema: String },

    /// The schema id already has a registry entry.
    #[error("`{schema}` has already been registered")]
    AlreadyRegistered { schema: String },

    /// A constraint was supplied for a kind that does not support it.
    #[error("{kind} does not support {constraint}")]
    UnsupportedConstraint { kind: String, constraint: String },

    /// The type name is neither a builtin kind nor a known schema type.
    #[error("unknown field type `{type_name}`")]
    UnknownType { type_name: String },

    /// A field declaration resolved to no name.
    #[error("name is missing")]
    MissingName,

    /// The schema declaration does not bind a model.
    #[error("`{schema}` has no model defined")]
    NoModelDefined { schema: String },

    /// The bound model name does not resolve to a known model.
    #[error("model `{model}` does not exist")]
    ModelNotFound { model: String },

    /// Compiling the schema re-entered its own compilation.
    #[error("cyclic schema reference: {path}")]
    CyclicSchema { path: String },

    /// One or more attributes failed to dump; messages keyed by attribute.
    #[error("{}", render_errors(.errors))]
    DumpFailed { errors: IndexMap<String, String> },

    /// JSON encoding or decoding failed.
    #[error("serialization failed: {error}")]
    Serialization { error: String },
}

impl SchemaError {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn not_registered(schema: impl Into<String>) -> Self {
        Self::NotRegistered {
            schema: schema.into(),
        }
    }

    pub(crate) fn unsupported(kind: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::UnsupportedConstraint {
            kind: kind.into(),
            constraint: constraint.into(),
        }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::InvalidArgument { .. } | Self::InvalidKind { .. } => "argument",
            Self::NotNumeric | Self::InvalidValue | Self::DumpFailed { .. } => "value",
            Self::NotRegistered { .. } | Self::AlreadyRegistered { .. } => "registry",
            Self::UnsupportedConstraint { .. }
            | Self::UnknownType { .. }
            | Self::MissingName => "factory",
            Self::NoModelDefined { .. }
            | Self::ModelNotFound { .. }
            | Self::CyclicSchema { .. } => "schema",
            Self::Serialization { .. } => "serialization",
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidArgument { .. } => "SCHEMA_INVALID_ARGUMENT",
            Self::InvalidKind { .. } => "SCHEMA_INVALID_KIND",
            Self::NotNumeric => "SCHEMA_NOT_NUMERIC",
            Self::InvalidValue => "SCHEMA_INVALID_VALUE",
            Self::NotRegistered { .. } => "SCHEMA_NOT_REGISTERED",
            Self::AlreadyRegistered { .. } => "SCHEMA_ALREADY_REGISTERED",
            Self::UnsupportedConstraint { .. } => "SCHEMA_UNSUPPORTED_CONSTRAINT",
            Self::UnknownType { .. } => "SCHEMA_UNKNOWN_TYPE",
            Self::MissingName => "SCHEMA_MISSING_NAME",
            Self::NoModelDefined { .. } => "SCHEMA_NO_MODEL",
            Self::ModelNotFound { .. } => "SCHEMA_MODEL_NOT_FOUND",
            Self::CyclicSchema { .. } => "SCHEMA_CYCLE",
            Self::DumpFailed { .. } => "SCHEMA_DUMP_FAILED",
            Self::Serialization { .. } => "SCHEMA_SER",
        }
    }

    /// Whether the operation might succeed if retried with the same input.
    ///
    /// Everything here is deterministic, so this is always `false`.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            error: err.to_string(),
        }
    }
}

fn render_errors(errors: &IndexMap<String, String>) -> String {
    serde_json::to_string(errors).unwrap_or_else(|_| format!("{errors:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_messages_are_stable() {
        assert_eq!(SchemaError::InvalidValue.to_string(), "Invalid value");
        assert_eq!(SchemaError::NotNumeric.to_string(), "Not a numeric value");
    }

    #[test]
    fn display_messages() {
        let err = SchemaError::NotRegistered {
            schema: "app::UserSchema".into(),
        };
        assert_eq!(err.to_string(), "`app::UserSchema` has not been registered");

        let err = SchemaError::unsupported("BOOL", "range");
        assert_eq!(err.to_string(), "BOOL does not support range");

        let err = SchemaError::invalid_argument("min greater than max");
        assert_eq!(err.to_string(), "invalid argument: min greater than max");
    }

    #[test]
    fn dump_failed_renders_as_json_in_insertion_order() {
        let mut errors = IndexMap::new();
        errors.insert("id".to_owned(), "Invalid value".to_owned());
        errors.insert("username".to_owned(), "Not a numeric value".to_owned());

        let err = SchemaError::DumpFailed { errors };
        assert_eq!(
            err.to_string(),
            r#"{"id":"Invalid value","username":"Not a numeric value"}"#
        );
    }

    #[test]
    fn codes_are_unique_per_variant() {
        let errors = vec![
            SchemaError::invalid_argument(""),
            SchemaError::InvalidKind {
                value: String::new(),
            },
            SchemaError::NotNumeric,
            SchemaError::InvalidValue,
            SchemaError::not_registered(""),
            SchemaError::AlreadyRegistered {
                schema: String::new(),
            },
            SchemaError::unsupported("", ""),
            SchemaError::UnknownType {
                type_name: String::new(),
            },
            SchemaError::MissingName,
            SchemaError::NoModelDefined {
                schema: String::new(),
            },
            SchemaError::ModelNotFound {
                model: String::new(),
            },
            SchemaError::CyclicSchema {
                path: String::new(),
            },
            SchemaError::DumpFailed {
                errors: IndexMap::new(),
            },
            SchemaError::Serialization {
                error: String::new(),
            },
        ];

        let codes: Vec<&str> = errors.iter().map(SchemaError::code).collect();
        for code in &codes {
            assert!(code.starts_with("SCHEMA_"), "unexpected code: {code}");
        }

        let mut sorted = codes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len(), "codes should be unique");

        for err in &errors {
            assert!(!err.is_retryable(), "should not be retryable: {err:?}");
        }
    }

    #[test]
    fn categories() {
        assert_eq!(SchemaError::NotNumeric.category(), "value");
        assert_eq!(SchemaError::MissingName.category(), "factory");
        assert_eq!(SchemaError::not_registered("x").category(), "registry");
    }
}
