//! The Abacus type system.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of value kinds an expression can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Type {
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
}

impl Type {
    pub const ALL: [Type; 5] = [
        Type::String,
        Type::Integer,
        Type::Decimal,
        Type::Boolean,
        Type::Date,
    ];

    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Integer | Type::Decimal)
    }

    /// Whether values of this type have an ordering usable by `<`, `<=`, `>`, `>=`.
    pub fn is_ordered(self) -> bool {
        !matches!(self, Type::Boolean)
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::String => "STRING",
            Type::Integer => "INTEGER",
            Type::Decimal => "DECIMAL",
            Type::Boolean => "BOOLEAN",
            Type::Date => "DATE",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Type {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Type::ALL
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown type: {}", s))
    }
}

/// A single implicit conversion `from -> to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WideningRule {
    pub from: Type,
    pub to: Type,
}

impl WideningRule {
    /// Whether the value model can carry out this conversion at runtime.
    pub fn is_supported(&self) -> bool {
        matches!((self.from, self.to), (Type::Integer, Type::Decimal))
    }
}

impl fmt::Display for WideningRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// The table of implicit conversions operator typing may apply.
///
/// The default policy only promotes INTEGER to DECIMAL. An empty policy
/// makes every mixed-type operation a type error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WideningPolicy {
    #[serde(default)]
    pub rules: Vec<WideningRule>,
}

impl WideningPolicy {
    /// A policy without any implicit conversions.
    pub fn strict() -> Self {
        Self { rules: Vec::new() }
    }

    /// Whether a value of type `from` is acceptable where `to` is expected.
    pub fn widens(&self, from: Type, to: Type) -> bool {
        from == to || self.rules.iter().any(|rule| rule.from == from && rule.to == to)
    }

    /// The common type both operands widen to, if any.
    pub fn unify(&self, left: Type, right: Type) -> Option<Type> {
        if self.widens(left, right) {
            Some(right)
        } else if self.widens(right, left) {
            Some(left)
        } else {
            None
        }
    }
}

impl Default for WideningPolicy {
    fn default() -> Self {
        Self {
            rules: vec![WideningRule {
                from: Type::Integer,
                to: Type::Decimal,
            }],
        }
    }
}
