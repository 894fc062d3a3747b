//! Tests for the JavaScript backend.

use super::*;
use rhizome_abacus_core::{Context, Function, Signature, SymbolTable, compile as compile_source};

fn symbols() -> SymbolTable {
    SymbolTable::new()
        .with("a", 5i64)
        .unwrap()
        .with("d", 1.5)
        .unwrap()
        .with("s", "hi")
        .unwrap()
        .with("flag", true)
        .unwrap()
        .with("var", 1i64)
        .unwrap()
}

fn js(source: &str) -> String {
    let compiled = compile_source(source, &symbols(), &Context::default()).expect("compile failed");
    JsTranslator.translate(&compiled.node).expect("translate failed")
}

#[test]
fn test_compile_literals() {
    assert_eq!(js("42"), "42");
    assert_eq!(js("2 * (3 + 4)"), "14");
    assert_eq!(js("2 * 7.0"), "14.0");
    assert_eq!(js("-3"), "(-3)");
    assert_eq!(js("'hello'"), "'hello'");
    assert_eq!(js("false"), "false");
    assert_eq!(js("#2024-01-31#"), "'2024-01-31'");
}

#[test]
fn test_literal_rendering() {
    assert_eq!(js_literal(&Value::Decimal(0.1)), "0.1");
    assert_eq!(js_literal(&Value::Decimal(-0.0)), "(-0.0)");
    assert_eq!(js_literal(&Value::Decimal(1e-7)), "1e-7");
    assert_eq!(js_literal(&Value::Decimal(f64::NAN)), "NaN");
    assert_eq!(js_literal(&Value::Decimal(f64::INFINITY)), "Infinity");
    assert_eq!(js_literal(&Value::Decimal(f64::NEG_INFINITY)), "(-Infinity)");
}

#[test]
fn test_string_escaping() {
    assert_eq!(js_literal(&Value::from("it's")), "'it\\'s'");
    assert_eq!(js_literal(&Value::from("a\\b\n")), "'a\\\\b\\n'");
    assert_eq!(js_literal(&Value::from("\u{0}\u{1f}")), "'\\u0000\\u001f'");
    assert_eq!(js_literal(&Value::from("x\u{2028}y")), "'x\\u2028y'");
    assert_eq!(js_literal(&Value::from("\"double\"")), "'\"double\"'");
}

#[test]
fn test_compile_operators() {
    let a = read_variable("a");
    let d = read_variable("d");
    let s = read_variable("s");
    let flag = read_variable("flag");
    assert_eq!(js("a + 1"), format!("({a} + 1)"));
    assert_eq!(js("s + 'x'"), format!("({s} + 'x')"));
    assert_eq!(js("a == 1"), format!("({a} === 1)"));
    assert_eq!(js("a != d"), format!("({a} !== {d})"));
    assert_eq!(js("flag and a > 1"), format!("({flag} && ({a} > 1))"));
    assert_eq!(js("not flag or false"), format!("(!{flag})"));
    assert_eq!(js("-a"), format!("(-({a}))"));
}

#[test]
fn test_variable_reads_are_guarded() {
    assert_eq!(
        read_variable("a"),
        "(a != null ? a : (function () { throw new Error('variable \\'a\\' has no value'); })())"
    );
    assert!(read_variable("Math").starts_with("(_Math != null ? _Math :"));
}

#[test]
fn test_names_are_escaped() {
    assert_eq!(to_js_name("total"), "total");
    assert_eq!(to_js_name("var"), "_var");
    assert_eq!(to_js_name("_var"), "__var");
    assert_eq!(to_js_name("Math"), "_Math");
    assert_eq!(to_js_name("Error"), "_Error");
    assert_eq!(to_js_name("undefined"), "_undefined");
}

#[test]
fn test_compile_division() {
    assert_eq!(
        js("a / 2"),
        format!(
            "(function (a, b) {{ if (b === 0) {{ throw new Error('division by zero'); }} \
             return (a - a % b) / b; }})({}, 2)",
            read_variable("a")
        )
    );
    assert!(js("d / 2").contains("return a / b;"));
    assert!(js("a % 2").contains("return a % b;"));
}

#[test]
fn test_compile_ternary_and_assignment() {
    let a = read_variable("a");
    assert_eq!(js("flag ? a : 2"), format!("({} ? {a} : 2)", read_variable("flag")));
    assert_eq!(js("a = a + 1"), format!("(a = ({a} + 1))"));
    assert_eq!(js("var = 2"), "(_var = 2)");
}

#[test]
fn test_compile_calls() {
    let a = read_variable("a");
    let d = read_variable("d");
    let s = read_variable("s");
    assert_eq!(js("abs(a)"), format!("Math.abs({a})"));
    assert_eq!(js("min(a, d)"), format!("Math.min({a}, {d})"));
    assert_eq!(js("rand()"), "Math.random()");
    assert!(js("round(d)").contains("Math.floor(x)"));
    assert!(js("upper(s)").starts_with(&format!("{s}.replace(/[a-z]+/g")));
    assert!(js("length(s)").ends_with(".length"));
}

#[test]
fn test_unsupported_function() {
    let mut context = Context::default();
    context.functions.register(Function::new(
        "twice",
        vec![Signature::new([Type::Integer], Type::Integer)],
        true,
        |args| Ok(args[0].clone()),
    ));
    let compiled = compile_source("twice(a)", &symbols(), &context).unwrap();
    assert!(matches!(
        compiled.node.kind,
        rhizome_abacus_ir::NodeKind::Call { .. }
    ));
    assert_eq!(
        JsTranslator.translate(&compiled.node),
        Err(TranslationError::UnsupportedFunction {
            backend: "javascript",
            name: "twice".into(),
        })
    );
}

#[test]
fn test_untyped_tree_is_rejected() {
    let raw = rhizome_abacus_syntax::parse("a").unwrap();
    assert!(matches!(
        JsTranslator.translate(&raw),
        Err(TranslationError::UntypedNode { .. })
    ));
}

#[test]
fn test_render_declarations() {
    assert_eq!(
        JsTranslator.render_declaration("s", Type::String, Some(&Value::from("it's"))),
        "var s = 'it\\'s';"
    );
    assert_eq!(
        JsTranslator.render_declaration("var", Type::Integer, None),
        "var _var = null;"
    );
    assert_eq!(JsTranslator.render_value(None), "null");
}
