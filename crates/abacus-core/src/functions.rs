//! The function registry and builtin functions.

use crate::error::TypeErrorKind;
use crate::interpreter::EvalError;
use rhizome_abacus_ir::{Type, Value, WideningPolicy};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Native implementation of a function. Arguments arrive already converted
/// to the parameter types of the resolved overload.
pub type NativeFn = Arc<dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync>;

/// One overload of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Type>,
    pub returns: Type,
}

impl Signature {
    pub fn new(params: impl Into<Vec<Type>>, returns: Type) -> Self {
        Self {
            params: params.into(),
            returns,
        }
    }
}

#[derive(Clone)]
pub struct Function {
    pub name: String,
    pub overloads: Vec<Signature>,
    /// Pure functions always return the same result for the same arguments
    /// and may be folded at compile time.
    pub pure: bool,
    pub native: NativeFn,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("overloads", &self.overloads)
            .field("pure", &self.pure)
            .finish_non_exhaustive()
    }
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        overloads: Vec<Signature>,
        pure: bool,
        native: impl Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            overloads,
            pure,
            native: Arc::new(native),
        }
    }

    /// Picks the overload for the given argument types. An exact match wins
    /// over one that needs widening; among widening matches the first
    /// declared overload wins.
    pub fn resolve(&self, args: &[Type], widening: &WideningPolicy) -> Result<&Signature, TypeErrorKind> {
        let candidates: Vec<&Signature> = self
            .overloads
            .iter()
            .filter(|sig| sig.params.len() == args.len())
            .collect();

        let Some(&first) = candidates.first() else {
            let mut arities: Vec<usize> = self.overloads.iter().map(|sig| sig.params.len()).collect();
            arities.sort_unstable();
            arities.dedup();
            let expected = arities
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(TypeErrorKind::Arity {
                function: self.name.clone(),
                expected,
                actual: args.len(),
            });
        };

        if let Some(&exact) = candidates.iter().find(|sig| sig.params == args) {
            return Ok(exact);
        }
        let widened = candidates.iter().find(|sig| {
            sig.params
                .iter()
                .zip(args)
                .all(|(param, arg)| widening.widens(*arg, *param))
        });
        if let Some(&sig) = widened {
            return Ok(sig);
        }

        // Report against the first overload of the right arity.
        let mismatch = first
            .params
            .iter()
            .zip(args)
            .position(|(param, arg)| !widening.widens(*arg, *param));
        match mismatch {
            Some(position) => Err(TypeErrorKind::Argument {
                function: self.name.clone(),
                position: position + 1,
                expected: first.params[position],
                actual: args[position],
            }),
            None => Ok(first),
        }
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        (self.native)(args)
    }
}

/// Functions callable from expressions, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, Function>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the builtin functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for function in builtins() {
            registry.register(function);
        }
        registry
    }

    /// Adds a function, replacing any function of the same name.
    pub fn register(&mut self, function: Function) {
        self.functions.insert(function.name.clone(), function);
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn is_pure(&self, name: &str) -> bool {
        self.get(name).is_some_and(|function| function.pure)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

fn function_error(function: &str, message: impl Into<String>) -> EvalError {
    EvalError::Function {
        function: function.to_string(),
        message: message.into(),
    }
}

fn bad_arguments(function: &str, args: &[Value]) -> EvalError {
    let types: Vec<&str> = args.iter().map(|arg| arg.ty().name()).collect();
    function_error(function, format!("unexpected arguments ({})", types.join(", ")))
}

/// Converts a rounded decimal to an integer, failing outside the i64 range.
fn to_integer(function: &str, value: f64) -> Result<Value, EvalError> {
    // 2^63 is exactly representable; every finite value below it fits.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if value.is_finite() && value >= -LIMIT && value < LIMIT {
        Ok(Value::Integer(value as i64))
    } else {
        Err(EvalError::Overflow {
            op: function.to_string(),
        })
    }
}

fn numeric_overloads(arity: usize) -> Vec<Signature> {
    vec![
        Signature::new(vec![Type::Integer; arity], Type::Integer),
        Signature::new(vec![Type::Decimal; arity], Type::Decimal),
    ]
}

fn rounding(name: &'static str, op: fn(f64) -> f64) -> Function {
    Function::new(
        name,
        vec![Signature::new([Type::Decimal], Type::Integer)],
        true,
        move |args| match args {
            [Value::Decimal(x)] => to_integer(name, op(*x)),
            _ => Err(bad_arguments(name, args)),
        },
    )
}

/// NaN in either argument yields NaN, as `Math.min`/`Math.max` do.
fn extremum(name: &'static str, pick_left: fn(&Value, &Value) -> bool) -> Function {
    Function::new(name, numeric_overloads(2), true, move |args| match args {
        [Value::Decimal(a), Value::Decimal(b)] if a.is_nan() || b.is_nan() => {
            Ok(Value::Decimal(f64::NAN))
        }
        [a @ Value::Integer(_), b @ Value::Integer(_)]
        | [a @ Value::Decimal(_), b @ Value::Decimal(_)] => {
            Ok(if pick_left(a, b) { a.clone() } else { b.clone() })
        }
        _ => Err(bad_arguments(name, args)),
    })
}

fn string_map(name: &'static str, op: fn(&str) -> String) -> Function {
    Function::new(
        name,
        vec![Signature::new([Type::String], Type::String)],
        true,
        move |args| match args {
            [Value::String(s)] => Ok(Value::String(op(s))),
            _ => Err(bad_arguments(name, args)),
        },
    )
}

/// The builtin function set.
pub fn builtins() -> Vec<Function> {
    vec![
        Function::new("abs", numeric_overloads(1), true, |args| match args {
            [Value::Integer(n)] => n
                .checked_abs()
                .map(Value::Integer)
                .ok_or_else(|| EvalError::Overflow { op: "abs".into() }),
            [Value::Decimal(x)] => Ok(Value::Decimal(x.abs())),
            _ => Err(bad_arguments("abs", args)),
        }),
        // f64::round rounds half away from zero.
        rounding("round", f64::round),
        rounding("floor", f64::floor),
        rounding("ceil", f64::ceil),
        extremum("min", |a, b| a.compare(b).is_some_and(|ord| ord.is_le())),
        extremum("max", |a, b| a.compare(b).is_some_and(|ord| ord.is_ge())),
        Function::new(
            "length",
            vec![Signature::new([Type::String], Type::Integer)],
            true,
            |args| match args {
                [Value::String(s)] => Ok(Value::Integer(s.chars().count() as i64)),
                _ => Err(bad_arguments("length", args)),
            },
        ),
        string_map("upper", |s| s.to_ascii_uppercase()),
        string_map("lower", |s| s.to_ascii_lowercase()),
        Function::new(
            "rand",
            vec![Signature::new(Vec::new(), Type::Decimal)],
            false,
            |args| match args {
                [] => Ok(Value::Decimal(rand::random::<f64>())),
                _ => Err(bad_arguments("rand", args)),
            },
        ),
    ]
}
