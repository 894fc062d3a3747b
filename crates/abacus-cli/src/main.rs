//! Abacus CLI entry point.

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rhizome_abacus_core::{CompilerConfig, Context, SymbolTable, Translator, compile};
use rhizome_abacus_ir::sexpr::SExprFactory;
use rhizome_abacus_ir::{Type, Value};
use rhizome_abacus_translator_javascript::JsTranslator;
use rhizome_abacus_translator_luajit::LuaTranslator;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "abacus")]
#[command(about = "Abacus expression compiler")]
struct Cli {
    /// Compiler config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Declare a variable as name:TYPE or name:TYPE=value
    #[arg(long = "var", global = true, value_parser = parse_declaration)]
    vars: Vec<Declaration>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type-check an expression and print its type
    Check {
        /// Expression (or - for stdin)
        expr: String,
    },

    /// Print the simplified, typed tree as JSON
    Simplify {
        /// Expression (or - for stdin)
        expr: String,
    },

    /// Print the parse tree as an S-expression
    Sexpr {
        /// Expression (or - for stdin)
        expr: String,
    },

    /// Evaluate an expression directly
    Eval {
        /// Expression (or - for stdin)
        expr: String,
    },

    /// Translate an expression to a target language
    Translate {
        /// Expression (or - for stdin)
        expr: String,

        /// Target language
        #[arg(short, long, value_enum, default_value = "lua")]
        target: Target,

        /// Also print variable declarations
        #[arg(long)]
        declarations: bool,
    },

    /// Translate to Lua and execute with LuaJIT
    Run {
        /// Expression (or - for stdin)
        expr: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Lua,
    Javascript,
}

#[derive(Clone)]
struct Declaration {
    name: String,
    ty: Type,
    value: Option<Value>,
}

fn parse_declaration(arg: &str) -> Result<Declaration, String> {
    let (name, rest) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected name:TYPE[=value], got '{}'", arg))?;
    let (ty, value) = match rest.split_once('=') {
        Some((ty, value)) => (ty, Some(value)),
        None => (rest, None),
    };
    let ty: Type = ty.parse()?;
    let value = value
        .map(|text| Value::parse_typed(ty, text))
        .transpose()
        .map_err(|err| err.to_string())?;
    Ok(Declaration {
        name: name.to_string(),
        ty,
        value,
    })
}

fn read_expr(expr: &str) -> std::io::Result<String> {
    if expr == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf.trim_end().to_string())
    } else {
        Ok(expr.to_string())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("abacus=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            CompilerConfig::from_file(path)?
        }
        None => CompilerConfig::default(),
    };
    let context = Context::new(config);

    let mut symbols = SymbolTable::new();
    for declaration in cli.vars {
        symbols.declare(declaration.name, declaration.ty, declaration.value)?;
    }

    match cli.command {
        Commands::Check { expr } => {
            let compiled = compile(&read_expr(&expr)?, &symbols, &context)?;
            println!("{}", compiled.return_type);
        }

        Commands::Simplify { expr } => {
            let compiled = compile(&read_expr(&expr)?, &symbols, &context)?;
            println!("{}", serde_json::to_string_pretty(&compiled.node)?);
        }

        Commands::Sexpr { expr } => {
            let tree =
                rhizome_abacus_syntax::parse_with(&read_expr(&expr)?, SExprFactory, context.config.depth_limit())?;
            println!("{}", serde_json::to_string(&tree)?);
        }

        Commands::Eval { expr } => {
            let compiled = compile(&read_expr(&expr)?, &symbols, &context)?;
            let value = compiled.evaluate(&mut symbols, &context)?;
            let report = serde_json::json!({
                "value": value,
                "variables": symbols,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Translate {
            expr,
            target,
            declarations,
        } => {
            let compiled = compile(&read_expr(&expr)?, &symbols, &context)?;
            let translator: &dyn Translator = match target {
                Target::Lua => &LuaTranslator,
                Target::Javascript => &JsTranslator,
            };
            if declarations && !symbols.is_empty() {
                println!("{}", translator.render_symbols(&symbols));
            }
            println!("{}", compiled.translate(translator)?);
        }

        Commands::Run { expr } => {
            let compiled = compile(&read_expr(&expr)?, &symbols, &context)?;
            let execution = rhizome_abacus_translator_luajit::execute(&compiled.node, &symbols)?;
            let report = serde_json::json!({
                "value": execution.value,
                "variables": execution.symbols,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
