//! Variable bindings.

use rhizome_abacus_ir::{Type, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolError {
    #[error("variable '{0}' is already declared")]
    AlreadyDeclared(String),

    #[error("unknown variable '{0}'")]
    Unknown(String),

    #[error("variable '{name}' is declared {expected}, got a {actual} value")]
    TypeMismatch {
        name: String,
        expected: Type,
        actual: Type,
    },
}

/// A declared variable and its current value, if it has one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub ty: Type,
    pub value: Option<Value>,
}

/// Maps variable names to their declared type and current value.
///
/// Checking reads declared types; evaluation reads and assigns values.
/// A table shared between evaluations carries assignments from one run to
/// the next.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    symbols: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new variable. The initial value, if any, must have the
    /// declared type.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        ty: Type,
        value: Option<Value>,
    ) -> Result<(), SymbolError> {
        let name = name.into();
        if self.symbols.contains_key(&name) {
            return Err(SymbolError::AlreadyDeclared(name));
        }
        if let Some(value) = &value {
            if value.ty() != ty {
                return Err(SymbolError::TypeMismatch {
                    name,
                    expected: ty,
                    actual: value.ty(),
                });
            }
        }
        self.symbols.insert(name, Symbol { ty, value });
        Ok(())
    }

    /// Declares a variable typed after its initial value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<Self, SymbolError> {
        let value = value.into();
        self.declare(name, value.ty(), Some(value))?;
        Ok(self)
    }

    pub fn lookup(&self, name: &str) -> Result<&Symbol, SymbolError> {
        self.symbols
            .get(name)
            .ok_or_else(|| SymbolError::Unknown(name.to_string()))
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.symbols.get(name).and_then(|symbol| symbol.value.as_ref())
    }

    /// Replaces the value of a declared variable.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), SymbolError> {
        let symbol = self
            .symbols
            .get_mut(name)
            .ok_or_else(|| SymbolError::Unknown(name.to_string()))?;
        if value.ty() != symbol.ty {
            return Err(SymbolError::TypeMismatch {
                name: name.to_string(),
                expected: symbol.ty,
                actual: value.ty(),
            });
        }
        symbol.value = Some(value);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterates variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.symbols.iter().map(|(name, symbol)| (name.as_str(), symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_lookup() {
        let mut symbols = SymbolTable::new();
        symbols
            .declare("a", Type::Integer, Some(Value::Integer(5)))
            .unwrap();
        symbols.declare("b", Type::String, None).unwrap();

        assert_eq!(symbols.lookup("a").unwrap().ty, Type::Integer);
        assert_eq!(symbols.value("a"), Some(&Value::Integer(5)));
        assert_eq!(symbols.value("b"), None);
        assert_eq!(
            symbols.lookup("c"),
            Err(SymbolError::Unknown("c".to_string()))
        );
    }

    #[test]
    fn test_keys_are_unique() {
        let mut symbols = SymbolTable::new();
        symbols.declare("a", Type::Integer, None).unwrap();
        assert_eq!(
            symbols.declare("a", Type::String, None),
            Err(SymbolError::AlreadyDeclared("a".to_string()))
        );
    }

    #[test]
    fn test_declared_value_must_match_type() {
        let mut symbols = SymbolTable::new();
        assert!(matches!(
            symbols.declare("a", Type::Integer, Some(Value::from("x"))),
            Err(SymbolError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_assign() {
        let mut symbols = SymbolTable::new().with("a", 1i64).unwrap();
        symbols.assign("a", Value::Integer(2)).unwrap();
        assert_eq!(symbols.value("a"), Some(&Value::Integer(2)));

        assert!(symbols.assign("a", Value::Decimal(2.0)).is_err());
        assert!(symbols.assign("missing", Value::Integer(2)).is_err());
    }

    #[test]
    fn test_iter_is_ordered() {
        let symbols = SymbolTable::new()
            .with("b", true)
            .unwrap()
            .with("a", "x")
            .unwrap();
        let names: Vec<_> = symbols.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
