//! Semantic checking, constant folding, evaluation and backend interfaces
//! for Abacus expressions.
//!
//! [`compile`] runs the whole front end: parse, check, simplify. The result
//! can be evaluated directly or handed to any [`Translator`].
//!
//! ```
//! use rhizome_abacus_core::{compile, Context, SymbolTable};
//! use rhizome_abacus_ir::{Type, Value};
//!
//! let mut symbols = SymbolTable::new().with("x", 5i64).unwrap();
//! let context = Context::default();
//! let compiled = compile("x > 3 ? 'big' : 'small'", &symbols, &context).unwrap();
//! assert_eq!(compiled.return_type, Type::String);
//! assert_eq!(
//!     compiled.evaluate(&mut symbols, &context).unwrap(),
//!     Value::from("big")
//! );
//! ```

pub mod checker;
pub mod config;
mod context;
pub mod error;
pub mod functions;
pub mod interpreter;
pub mod simplifier;
pub mod symbols;
pub mod translate;

pub use checker::SemanticChecker;
pub use config::{CompilerConfig, ConfigError, MAX_DEPTH};
pub use context::Context;
pub use error::{CompileError, TypeError, TypeErrorKind};
pub use functions::{Function, FunctionRegistry, Signature};
pub use interpreter::{EvalError, Evaluator};
pub use simplifier::Simplifier;
pub use symbols::{Symbol, SymbolError, SymbolTable};
pub use translate::{TranslationError, Translator};

use rhizome_abacus_ir::{AbacusNodeFactory, Node, Type, Value};
use tracing::debug;

/// A checked and simplified expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub node: Node,
    pub return_type: Type,
}

impl Compilation {
    pub fn evaluate(&self, symbols: &mut SymbolTable, context: &Context) -> Result<Value, EvalError> {
        Evaluator::new(context, symbols).evaluate(&self.node)
    }

    pub fn translate(&self, translator: &dyn Translator) -> Result<String, TranslationError> {
        translator.translate(&self.node)
    }
}

/// Parses, checks and simplifies `source`.
///
/// Only declared types are read from `symbols`; values are never folded in.
pub fn compile(source: &str, symbols: &SymbolTable, context: &Context) -> Result<Compilation, CompileError> {
    debug!(source, "compiling");
    let raw = rhizome_abacus_syntax::parse_with(source, AbacusNodeFactory, context.config.depth_limit())?;
    let (typed, return_type) = SemanticChecker::new(symbols, context).check_typed(raw)?;
    let node = Simplifier::new(context).simplify(typed);
    Ok(Compilation { node, return_type })
}
