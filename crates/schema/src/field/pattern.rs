use regex::Regex;

use crate::error::{Result, SchemaError};
use crate::field::FieldBase;
use crate::kind::FieldKind;
use crate::value::Value;

const DELIMITERS: [char; 6] = ['/', '#', '~', '!', '@', '%'];

/// A string that must match a regular expression somewhere.
///
/// The pattern may be written bare (`^[a-z]+$`) or slash-delimited with
/// trailing flags (`/Ain/i`); the flags `i m s x U` are honored and `u` is
/// accepted as a no-op. The pattern is compiled at construction.
#[derive(Debug, Clone)]
pub struct RegExField {
    pub(crate) base: FieldBase,
    pattern: String,
    regex: Regex,
}

field_common!(RegExField);

impl RegExField {
    /// Fails when the pattern is empty or does not compile.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        let regex = compile(&pattern)?;
        Ok(Self {
            base: FieldBase::new(FieldKind::Regex, name)?,
            pattern,
            regex,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    #[must_use]
    pub fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Null => self.base.nullable,
            Value::String(s) => self.regex.is_match(s),
            _ => false,
        }
    }

    /// Trims only; the pattern is not re-checked.
    pub fn dump(&self, value: &Value) -> Result<Value> {
        match value {
            Value::String(s) => Ok(Value::String(s.trim().to_owned())),
            _ => Err(SchemaError::InvalidValue),
        }
    }
}

impl PartialEq for RegExField {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.pattern == other.pattern
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    if pattern.is_empty() {
        return Err(SchemaError::invalid_argument("pattern must not be empty"));
    }
    let (body, flags) = split_delimited(pattern);
    if body.is_empty() {
        return Err(SchemaError::invalid_argument("pattern must not be empty"));
    }

    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' | 'x' | 'U' => inline.push(flag),
            'u' => {}
            other => {
                return Err(SchemaError::invalid_argument(format!(
                    "unsupported pattern flag `{other}`"
                )));
            }
        }
    }

    let source = if inline.is_empty() {
        body.to_owned()
    } else {
        format!("(?{inline}){body}")
    };
    Regex::new(&source)
        .map_err(|err| SchemaError::invalid_argument(format!("invalid pattern: {err}")))
}

/// Split `/body/flags` into body and flags. Anything else is a bare pattern.
fn split_delimited(pattern: &str) -> (&str, &str) {
    let Some(open) = pattern.chars().next() else {
        return (pattern, "");
    };
    if !DELIMITERS.contains(&open) {
        return (pattern, "");
    }
    let rest = &pattern[open.len_utf8()..];
    match rest.rfind(open) {
        Some(end) => {
            let flags = &rest[end + open.len_utf8()..];
            if flags.chars().all(|c| c.is_ascii_alphabetic()) {
                (&rest[..end], flags)
            } else {
                (pattern, "")
            }
        }
        None => (pattern, ""),
    }
}
