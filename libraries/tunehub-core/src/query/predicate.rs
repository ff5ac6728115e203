/// Filter predicates
use crate::error::{Result, TuneError};
use crate::query::value::ScalarValue;

/// Ordering comparison accepted in `field[op]=value` parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// Parse the keyword found between brackets
    pub fn from_keyword(keyword: &str) -> Result<Self> {
        match keyword {
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            other => Err(TuneError::invalid_query(format!(
                "Unsupported filter operator '{other}' (expected gt, gte, lt or lte)"
            ))),
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }

    pub fn sql_operator(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

/// Condition a single field must satisfy
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals(ScalarValue),
    Compare(CompareOp, ScalarValue),
}

impl Predicate {
    pub fn equals(value: impl Into<ScalarValue>) -> Self {
        Self::Equals(value.into())
    }

    pub fn compare(op: CompareOp, value: impl Into<ScalarValue>) -> Self {
        Self::Compare(op, value.into())
    }

    pub fn value(&self) -> &ScalarValue {
        match self {
            Self::Equals(v) | Self::Compare(_, v) => v,
        }
    }
}
