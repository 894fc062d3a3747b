//! Executes translated Lua and reads the results back as Abacus values.

use crate::{LuaTranslator, to_lua_name};
use mlua::Lua;
use rhizome_abacus_core::{SymbolError, SymbolTable, TranslationError, Translator};
use rhizome_abacus_ir::{Date, Node, Type, Value};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during execution.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("lua error: {0}")]
    Lua(#[from] mlua::Error),

    #[error("translation error: {0}")]
    Translation(#[from] TranslationError),

    #[error("{what}: expected {expected}, lua returned {found}")]
    Conversion {
        what: String,
        expected: Type,
        found: String,
    },

    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// The outcome of one run: the expression's value and the variables as
/// they stand afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub value: Value,
    pub symbols: SymbolTable,
}

/// Translate and execute a checked tree.
pub fn execute(node: &Node, symbols: &SymbolTable) -> Result<Execution, ExecutionError> {
    let code = LuaTranslator.translate(node)?;
    let return_type = node
        .ty()
        .ok_or(TranslationError::UntypedNode { span: node.span })?;
    execute_source(&code, return_type, symbols)
}

/// Execute a translated chunk with `symbols` declared as locals.
///
/// The result is held in `_result`, which [`to_lua_name`] never produces.
pub fn execute_source(
    code: &str,
    return_type: Type,
    symbols: &SymbolTable,
) -> Result<Execution, ExecutionError> {
    let captures: Vec<String> = symbols
        .iter()
        .map(|(name, _)| {
            let name = to_lua_name(name);
            format!("{name} = {name}")
        })
        .collect();
    let script = format!(
        "{}\nlocal _result = (function()\n{}\nend)()\nreturn _result, {{ {} }}",
        LuaTranslator.render_symbols(symbols),
        code,
        captures.join(", ")
    );
    debug!(%script, "executing lua");

    let lua = Lua::new();
    let (result, variables): (mlua::Value, mlua::Table) = lua.load(&script).set_name("abacus").eval()?;

    let value = from_lua("result", return_type, result)?.ok_or_else(|| ExecutionError::Conversion {
        what: "result".to_string(),
        expected: return_type,
        found: "nil".to_string(),
    })?;

    let mut after = SymbolTable::new();
    for (name, symbol) in symbols.iter() {
        let raw: mlua::Value = variables.get(to_lua_name(name))?;
        let value = from_lua(name, symbol.ty, raw)?;
        after.declare(name, symbol.ty, value)?;
    }

    Ok(Execution {
        value,
        symbols: after,
    })
}

/// Convert a Lua value to an Abacus value of type `ty`. `nil` maps to `None`.
fn from_lua(what: &str, ty: Type, value: mlua::Value) -> Result<Option<Value>, ExecutionError> {
    let mismatch = |value: &mlua::Value| ExecutionError::Conversion {
        what: what.to_string(),
        expected: ty,
        found: format!("{:?}", value),
    };
    let converted = match (ty, &value) {
        (_, mlua::Value::Nil) => return Ok(None),
        (Type::String, mlua::Value::String(s)) => Value::String(s.to_string_lossy()),
        (Type::Integer, mlua::Value::Integer(n)) => Value::Integer(*n as i64),
        (Type::Integer, mlua::Value::Number(n)) if n.fract() == 0.0 => Value::Integer(*n as i64),
        (Type::Decimal, mlua::Value::Integer(n)) => Value::Decimal(*n as f64),
        (Type::Decimal, mlua::Value::Number(n)) => Value::Decimal(*n),
        (Type::Boolean, mlua::Value::Boolean(b)) => Value::Boolean(*b),
        (Type::Date, mlua::Value::String(s)) => {
            let date: Date = s.to_string_lossy().parse().map_err(|_| mismatch(&value))?;
            Value::Date(date)
        }
        _ => return Err(mismatch(&value)),
    };
    Ok(Some(converted))
}
