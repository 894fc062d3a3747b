//! JavaScript backend for Abacus.

mod codegen;

pub use codegen::{BACKEND, compile, js_literal, read_variable, to_js_name};

use rhizome_abacus_core::{TranslationError, Translator};
use rhizome_abacus_ir::{Node, Type, Value};

/// The [`Translator`] for JavaScript (ES5 syntax).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsTranslator;

impl Translator for JsTranslator {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn translate(&self, node: &Node) -> Result<String, TranslationError> {
        compile(node)
    }

    fn render_value(&self, value: Option<&Value>) -> String {
        value.map_or_else(|| "null".to_string(), js_literal)
    }

    fn render_declaration(&self, name: &str, _ty: Type, value: Option<&Value>) -> String {
        format!("var {} = {};", to_js_name(name), self.render_value(value))
    }
}

#[cfg(test)]
mod tests;
