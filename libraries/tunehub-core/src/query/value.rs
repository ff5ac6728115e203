/// Typed scalar values used in predicates
use crate::error::{Result, TuneError};
use crate::query::schema::{FieldDef, FieldKind};
use crate::types::timestamp;
use std::fmt;

/// A request value after coercion against its field
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Bool(bool),
}

impl ScalarValue {
    /// Coerce a raw query-string value to the kind of `field`
    pub fn coerce(field: &FieldDef, raw: &str) -> Result<Self> {
        let invalid = || {
            TuneError::invalid_query(format!(
                "'{}' is not a valid value for field '{}'",
                raw, field.name
            ))
        };

        match field.kind {
            FieldKind::Text | FieldKind::List => Ok(Self::Text(raw.to_string())),
            FieldKind::Integer => raw.trim().parse().map(Self::Integer).map_err(|_| invalid()),
            FieldKind::Real => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Self::Real)
                .ok_or_else(invalid),
            FieldKind::Bool => match raw.trim() {
                "true" | "1" => Ok(Self::Bool(true)),
                "false" | "0" => Ok(Self::Bool(false)),
                _ => Err(invalid()),
            },
            FieldKind::Timestamp => timestamp::normalize(raw)
                .map(Self::Text)
                .ok_or_else(invalid),
        }
    }

    /// Whether a value of this shape may be compared against a field of `kind`
    pub fn fits(&self, kind: FieldKind) -> bool {
        match self {
            Self::Text(_) => matches!(
                kind,
                FieldKind::Text | FieldKind::Timestamp | FieldKind::List
            ),
            Self::Integer(_) => matches!(kind, FieldKind::Integer | FieldKind::Real),
            Self::Real(_) => kind == FieldKind::Real,
            Self::Bool(_) => kind == FieldKind::Bool,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
