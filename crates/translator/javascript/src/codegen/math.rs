//! Numeric functions and checked arithmetic.

const DIVISION_BY_ZERO: &str = "if (b === 0) { throw new Error('division by zero'); }";

/// Fails like direct evaluation when a rounded value has no INTEGER form.
const RANGE_CHECK: &str = "if (r !== r || r >= 9223372036854775808 || r < -9223372036854775808) \
                           { throw new Error('integer overflow'); }";

fn call(params: &str, body: &str, args: &str) -> String {
    format!("(function ({}) {{ {} }})({})", params, body, args)
}

/// Truncating division. `a - a % b` is an exact multiple of `b`, so the
/// quotient needs no rounding.
pub fn integer_division(left: &str, right: &str) -> String {
    call(
        "a, b",
        &format!("{} return (a - a % b) / b;", DIVISION_BY_ZERO),
        &format!("{}, {}", left, right),
    )
}

pub fn decimal_division(left: &str, right: &str) -> String {
    call(
        "a, b",
        &format!("{} return a / b;", DIVISION_BY_ZERO),
        &format!("{}, {}", left, right),
    )
}

/// `%` already takes the sign of the dividend.
pub fn remainder(left: &str, right: &str) -> String {
    call(
        "a, b",
        &format!("{} return a % b;", DIVISION_BY_ZERO),
        &format!("{}, {}", left, right),
    )
}

fn rounding(body: &str, arg: &str) -> String {
    call("x", &format!("var r = {} {} return r;", body, RANGE_CHECK), arg)
}

/// Compile a numeric builtin. Returns None if the name doesn't match.
pub fn compile_math(name: &str, args: &[String]) -> Option<String> {
    let result = match (name, args) {
        ("abs", [x]) => format!("Math.abs({})", x),
        ("min", [a, b]) => format!("Math.min({}, {})", a, b),
        ("max", [a, b]) => format!("Math.max({}, {})", a, b),
        ("floor", [x]) => rounding("Math.floor(x);", x),
        ("ceil", [x]) => rounding("Math.ceil(x);", x),
        // Half away from zero; Math.round rounds half up.
        ("round", [x]) => rounding(
            "x >= 0 ? Math.floor(x) : Math.ceil(x); \
             if (x >= 0 ? x - r >= 0.5 : r - x >= 0.5) { r += x >= 0 ? 1 : -1; }",
            x,
        ),
        ("rand", []) => "Math.random()".to_string(),
        _ => return None,
    };
    Some(result)
}
