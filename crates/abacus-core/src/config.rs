//! Compiler configuration, loaded from TOML.
//!
//! ```toml
//! max_depth = 64
//!
//! [[widening.rules]]
//! from = "INTEGER"
//! to = "DECIMAL"
//! ```

use rhizome_abacus_ir::{WideningPolicy, WideningRule};
use rhizome_abacus_syntax::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unsupported widening rule {0}")]
    UnsupportedWidening(WideningRule),

    #[error("max_depth must be between 1 and {MAX_DEPTH}, got {0}")]
    InvalidDepth(usize),
}

/// Upper bound for `max_depth`. Checking, folding, evaluation and
/// translation all recurse once per tree level.
pub const MAX_DEPTH: usize = 256;

/// Settings shared by every pass of a compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Maximum nesting depth accepted by the parser.
    pub max_depth: usize,
    /// Implicit conversions applied when typing operators.
    pub widening: WideningPolicy,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            widening: WideningPolicy::default(),
        }
    }
}

impl CompilerConfig {
    /// Load a config from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// The nesting limit handed to the parser. Configs built in code skip
    /// [`validate`](Self::validate), so the bound is applied here too.
    pub fn depth_limit(&self) -> usize {
        self.max_depth.clamp(1, MAX_DEPTH)
    }

    /// Rejects settings the compiler cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_DEPTH).contains(&self.max_depth) {
            return Err(ConfigError::InvalidDepth(self.max_depth));
        }
        match self.widening.rules.iter().find(|rule| !rule.is_supported()) {
            Some(rule) => Err(ConfigError::UnsupportedWidening(*rule)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhizome_abacus_ir::Type;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CompilerConfig::from_toml("").unwrap();
        assert_eq!(config, CompilerConfig::default());
        assert!(config.widening.widens(Type::Integer, Type::Decimal));
    }

    #[test]
    fn test_strict_widening() {
        let config = CompilerConfig::from_toml("max_depth = 16\n[widening]\nrules = []\n").unwrap();
        assert_eq!(config.max_depth, 16);
        assert_eq!(config.widening, WideningPolicy::strict());
    }

    #[test]
    fn test_rejects_unsupported_rules() {
        let source = "[[widening.rules]]\nfrom = \"INTEGER\"\nto = \"STRING\"\n";
        assert!(matches!(
            CompilerConfig::from_toml(source),
            Err(ConfigError::UnsupportedWidening(WideningRule {
                from: Type::Integer,
                to: Type::String,
            }))
        ));
    }

    #[test]
    fn test_rejects_zero_depth() {
        assert!(matches!(
            CompilerConfig::from_toml("max_depth = 0"),
            Err(ConfigError::InvalidDepth(0))
        ));
    }

    #[test]
    fn test_rejects_unbounded_depth() {
        assert!(matches!(
            CompilerConfig::from_toml("max_depth = 1000000"),
            Err(ConfigError::InvalidDepth(1_000_000))
        ));
        assert!(CompilerConfig::from_toml(&format!("max_depth = {}", MAX_DEPTH)).is_ok());

        let config = CompilerConfig {
            max_depth: 1_000_000,
            ..CompilerConfig::default()
        };
        assert_eq!(config.depth_limit(), MAX_DEPTH);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_depth = 32").unwrap();
        writeln!(file, "[[widening.rules]]").unwrap();
        writeln!(file, "from = \"integer\"").unwrap();
        writeln!(file, "to = \"decimal\"").unwrap();

        // Type names are uppercase in TOML.
        assert!(matches!(
            CompilerConfig::from_file(file.path()),
            Err(ConfigError::Parse(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_depth = 32").unwrap();
        let config = CompilerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_depth, 32);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            CompilerConfig::from_file(dir.path().join("abacus.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
