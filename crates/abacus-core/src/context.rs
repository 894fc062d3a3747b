use crate::config::CompilerConfig;
use crate::functions::FunctionRegistry;
use rhizome_abacus_ir::WideningPolicy;

/// Everything a compilation reads besides the source and the symbol table.
#[derive(Debug, Clone)]
pub struct Context {
    pub functions: FunctionRegistry,
    pub config: CompilerConfig,
}

impl Context {
    /// A context with the builtin functions and the given config.
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            functions: FunctionRegistry::with_builtins(),
            config,
        }
    }

    pub fn widening(&self) -> &WideningPolicy {
        &self.config.widening
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}
