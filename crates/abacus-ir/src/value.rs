//! Runtime values.

use crate::{Date, DateError, Type};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("invalid {ty} value: {text}")]
    Invalid { ty: Type, text: String },

    #[error(transparent)]
    Date(#[from] DateError),
}

/// A value of one of the Abacus [`Type`]s.
///
/// Equality and ordering never coerce between kinds; callers widen operands
/// with [`Value::convert`] first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "UPPERCASE")]
pub enum Value {
    String(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    Date(Date),
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::String(_) => Type::String,
            Value::Integer(_) => Type::Integer,
            Value::Decimal(_) => Type::Decimal,
            Value::Boolean(_) => Type::Boolean,
            Value::Date(_) => Type::Date,
        }
    }

    /// Converts the value to `to`, returning `None` when the value model has
    /// no such conversion.
    pub fn convert(&self, to: Type) -> Option<Value> {
        match (self, to) {
            (value, to) if value.ty() == to => Some(value.clone()),
            (Value::Integer(n), Type::Decimal) => Some(Value::Decimal(*n as f64)),
            _ => None,
        }
    }

    /// Parses the textual form used by variable declarations (`5`, `1.5`,
    /// `true`, `2024-01-31`; strings are taken verbatim).
    pub fn parse_typed(ty: Type, text: &str) -> Result<Value, ValueError> {
        let invalid = || ValueError::Invalid {
            ty,
            text: text.to_string(),
        };
        match ty {
            Type::String => Ok(Value::String(text.to_string())),
            Type::Integer => text.trim().parse().map(Value::Integer).map_err(|_| invalid()),
            Type::Decimal => {
                let value: f64 = text.trim().parse().map_err(|_| invalid())?;
                if value.is_finite() {
                    Ok(Value::Decimal(value))
                } else {
                    Err(invalid())
                }
            }
            Type::Boolean => match text.trim() {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                _ => Err(invalid()),
            },
            Type::Date => Ok(Value::Date(text.trim().parse()?)),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Value::Decimal(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Orders two values of the same kind. Returns `None` across kinds, for
    /// booleans, and for NaN decimals.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Decimal(a), Value::Decimal(b)) => a.partial_cmp(b),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Decimal(n) => write!(f, "{:?}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Decimal(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Value::Date(value)
    }
}
