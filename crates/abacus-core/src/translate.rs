//! The interface between compiled trees and target-language backends.

use crate::symbols::SymbolTable;
use rhizome_abacus_ir::{Node, Span, Type, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslationError {
    #[error("the {backend} backend does not support function '{name}'")]
    UnsupportedFunction { backend: &'static str, name: String },

    #[error("node at {span} has not been type checked")]
    UntypedNode { span: Span },
}

/// A backend that renders a checked tree as target-language source.
///
/// The tree must be fully typed; some constructs translate differently
/// depending on the type the checker resolved. Translators never mutate the
/// tree, so one tree can be handed to several backends.
pub trait Translator {
    /// Short backend name, used in messages and on the command line.
    fn name(&self) -> &'static str;

    /// Renders a complete expression.
    fn translate(&self, node: &Node) -> Result<String, TranslationError>;

    /// Renders a value as a target-language literal. `None` renders the
    /// target's representation of "no value".
    fn render_value(&self, value: Option<&Value>) -> String;

    /// Renders one variable declaration with an optional initial value.
    fn render_declaration(&self, name: &str, ty: Type, value: Option<&Value>) -> String;

    /// Renders declarations for every variable in the table, one per line.
    fn render_symbols(&self, symbols: &SymbolTable) -> String {
        symbols
            .iter()
            .map(|(name, symbol)| self.render_declaration(name, symbol.ty, symbol.value.as_ref()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The type of a node, or the error every backend reports for untyped input.
pub fn node_type(node: &Node) -> Result<Type, TranslationError> {
    node.ty()
        .ok_or(TranslationError::UntypedNode { span: node.span })
}
