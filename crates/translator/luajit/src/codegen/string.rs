//! String functions and literals.

/// Compile a string builtin. Returns None if the name doesn't match.
pub fn compile_str(name: &str, args: &[String]) -> Option<String> {
    let result = match (name, args) {
        // Counts characters rather than bytes by skipping UTF-8 continuation bytes.
        ("length", [s]) => format!("(select(2, string.gsub({}, \"[^\\128-\\191]\", \"\")))", s),
        ("upper", [s]) => format!("string.upper({})", s),
        ("lower", [s]) => format!("string.lower({})", s),
        _ => return None,
    };
    Some(result)
}

/// Quote a string as a Lua literal. Control characters use decimal escapes.
pub fn lua_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
