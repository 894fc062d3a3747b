//! String functions and literals.

/// Compile a string builtin. Returns None if the name doesn't match.
pub fn compile_str(name: &str, args: &[String]) -> Option<String> {
    let result = match (name, args) {
        // Count code points, not UTF-16 units.
        ("length", [s]) => format!("{}.replace(/[\\uD800-\\uDBFF][\\uDC00-\\uDFFF]/g, '_').length", s),
        // ASCII-only case mapping.
        ("upper", [s]) => format!(
            "{}.replace(/[a-z]+/g, function (c) {{ return c.toUpperCase(); }})",
            s
        ),
        ("lower", [s]) => format!(
            "{}.replace(/[A-Z]+/g, function (c) {{ return c.toLowerCase(); }})",
            s
        ),
        _ => return None,
    };
    Some(result)
}

/// Quote a string as a single-quoted JavaScript literal.
pub fn js_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Line terminators inside string literals are syntax errors before ES2019.
            c if c.is_ascii_control() || c == '\u{2028}' || c == '\u{2029}' => {
                out.push_str(&format!("\\u{:04x}", c as u32))
            }
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
