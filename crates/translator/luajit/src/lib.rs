//! LuaJIT backend for Abacus.
//!
//! Compiles checked Abacus trees to Lua source and executes them via LuaJIT.

mod codegen;
mod runtime;

pub use codegen::{BACKEND, compile, lua_literal, read_variable, to_lua_name};
pub use runtime::{Execution, ExecutionError, execute, execute_source};

use rhizome_abacus_core::{TranslationError, Translator};
use rhizome_abacus_ir::{Node, Type, Value};

/// The [`Translator`] for LuaJIT (Lua 5.1 syntax).
#[derive(Debug, Clone, Copy, Default)]
pub struct LuaTranslator;

impl Translator for LuaTranslator {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn translate(&self, node: &Node) -> Result<String, TranslationError> {
        compile(node)
    }

    fn render_value(&self, value: Option<&Value>) -> String {
        value.map_or_else(|| "nil".to_string(), lua_literal)
    }

    fn render_declaration(&self, name: &str, _ty: Type, value: Option<&Value>) -> String {
        format!("local {} = {}", to_lua_name(name), self.render_value(value))
    }
}
