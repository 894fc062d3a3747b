//! Integration tests for the source → typed tree → backend pipeline.

use rhizome_abacus_core::{Context, SymbolTable, Translator, compile};
use rhizome_abacus_ir::Value;
use rhizome_abacus_translator_javascript::JsTranslator;
use rhizome_abacus_translator_luajit::{LuaTranslator, execute};

// =============================================================================
// Test Helpers
// =============================================================================

fn symbols() -> SymbolTable {
    SymbolTable::new()
        .with("price", 12.5)
        .unwrap()
        .with("qty", 4i64)
        .unwrap()
        .with("name", "widget")
        .unwrap()
}

fn run(source: &str) -> (Value, Value) {
    let context = Context::default();
    let compiled = compile(source, &symbols(), &context).expect("compile failed");

    let mut direct = symbols();
    let expected = compiled
        .evaluate(&mut direct, &context)
        .expect("evaluate failed");
    let executed = execute(&compiled.node, &symbols()).expect("execute failed");
    assert_eq!(executed.symbols, direct, "post-run tables differ for {}", source);
    (expected, executed.value)
}

// =============================================================================
// Pipeline
// =============================================================================

#[test]
fn test_pricing_expression() {
    let (direct, lua) = run("qty > 3 ? price * qty * 0.5 : price * qty");
    assert_eq!(direct, Value::Decimal(25.0));
    assert_eq!(lua, direct);
}

#[test]
fn test_string_expression() {
    let (direct, lua) = run("upper(name) + ' x' + lower('ABC')");
    assert_eq!(direct, Value::from("WIDGET xabc"));
    assert_eq!(lua, direct);
}

#[test]
fn test_assignment_expression() {
    let (direct, lua) = run("qty = qty / 3");
    assert_eq!(direct, Value::Integer(1));
    assert_eq!(lua, direct);
}

#[test]
fn test_both_backends_translate() {
    let context = Context::default();
    let compiled = compile("round(price) + length(name)", &symbols(), &context).unwrap();
    let lua = compiled.translate(&LuaTranslator).unwrap();
    let js = compiled.translate(&JsTranslator).unwrap();
    assert!(lua.contains("math.floor"));
    assert!(js.contains("Math.floor"));
    assert!(!JsTranslator.render_symbols(&symbols()).is_empty());
}
