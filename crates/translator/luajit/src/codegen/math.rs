//! Numeric functions and checked arithmetic.

/// Raises the same error class direct evaluation reports.
fn zero_check(divisor: &str) -> String {
    format!("if {} == 0 then error(\"division by zero\", 0) end", divisor)
}

/// Fails like direct evaluation when a rounded value has no INTEGER form.
const RANGE_CHECK: &str =
    "if r ~= r or r >= 2^63 or r < -2^63 then error(\"integer overflow\", 0) end";

fn call(function: &str, args: &str) -> String {
    format!("({})({})", function, args)
}

/// Truncating division. `a - fmod(a, b)` is an exact multiple of `b`, so the
/// quotient needs no rounding.
pub fn integer_division(left: &str, right: &str) -> String {
    call(
        &format!(
            "function(a, b) {} return (a - math.fmod(a, b)) / b end",
            zero_check("b")
        ),
        &format!("{}, {}", left, right),
    )
}

pub fn decimal_division(left: &str, right: &str) -> String {
    call(
        &format!("function(a, b) {} return a / b end", zero_check("b")),
        &format!("{}, {}", left, right),
    )
}

/// Remainder with the sign of the dividend, for both numeric types.
pub fn remainder(left: &str, right: &str) -> String {
    call(
        &format!("function(a, b) {} return math.fmod(a, b) end", zero_check("b")),
        &format!("{}, {}", left, right),
    )
}

/// `math.min`/`math.max` ignore NaN depending on argument order.
fn extremum(function: &str, left: &str, right: &str) -> String {
    call(
        &format!(
            "function(a, b) if a ~= a or b ~= b then return 0/0 end return math.{}(a, b) end",
            function
        ),
        &format!("{}, {}", left, right),
    )
}

fn rounding(body: &str, arg: &str) -> String {
    call(
        &format!("function(x) local r {} {} return r end", body, RANGE_CHECK),
        arg,
    )
}

/// Compile a numeric builtin. Returns None if the name doesn't match.
pub fn compile_math(name: &str, args: &[String]) -> Option<String> {
    let result = match (name, args) {
        ("abs", [x]) => format!("math.abs({})", x),
        ("min", [a, b]) => extremum("min", a, b),
        ("max", [a, b]) => extremum("max", a, b),
        ("floor", [x]) => rounding("= math.floor(x)", x),
        ("ceil", [x]) => rounding("= math.ceil(x)", x),
        // Half away from zero. `x - floor(x)` is exact, unlike `floor(x + 0.5)`.
        ("round", [x]) => rounding(
            "if x >= 0 then r = math.floor(x) if x - r >= 0.5 then r = r + 1 end \
             else r = math.ceil(x) if r - x >= 0.5 then r = r - 1 end end",
            x,
        ),
        ("rand", []) => "math.random()".to_string(),
        _ => return None,
    };
    Some(result)
}
