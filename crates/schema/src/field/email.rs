use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, SchemaError};
use crate::field::FieldBase;
use crate::kind::FieldKind;
use crate::value::Value;

const MAX_LOCAL_LEN: usize = 64;
const MAX_ADDRESS_LEN: usize = 254;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let atom = r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+";
    let quoted = r#""(?:[^"\\\r\n]|\\.)*""#;
    let octet = r"(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])";
    let hostname = r"(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}";
    let pattern = format!(
        r"^(?:{atom}|{quoted})(?:\.(?:{atom}|{quoted}))*@(?:{hostname}|\[{octet}(?:\.{octet}){{3}}\]|\[IPv6:[0-9A-Fa-f:.]+\])$"
    );
    Regex::new(&pattern).expect("email regex is valid")
});

/// Whether `address` is a syntactically valid email address.
///
/// Supports dot-atom and quoted local parts, hostnames, and bracketed IPv4
/// or `IPv6:` literals.
#[must_use]
pub fn is_valid_email(address: &str) -> bool {
    if address.len() > MAX_ADDRESS_LEN {
        return false;
    }
    match address.rsplit_once('@') {
        Some((local, _)) if local.len() <= MAX_LOCAL_LEN => EMAIL_REGEX.is_match(address),
        _ => false,
    }
}

/// An email address.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailField {
    pub(crate) base: FieldBase,
}

field_common!(EmailField);

impl EmailField {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base: FieldBase::new(FieldKind::Email, name)?,
        })
    }

    #[must_use]
    pub fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Null => self.base.nullable,
            Value::String(s) => is_valid_email(s),
            _ => false,
        }
    }

    /// Trims only; the address is not re-checked.
    pub fn dump(&self, value: &Value) -> Result<Value> {
        match value {
            Value::String(s) => Ok(Value::String(s.trim().to_owned())),
            _ => Err(SchemaError::InvalidValue),
        }
    }
}
