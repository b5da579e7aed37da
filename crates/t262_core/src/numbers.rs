//! Define shared number semantics: the ECMAScript `ToString(Number)` and `ToNumber(String)` conversions.
//!
//! Both the parser (numeric property keys) and the runtime (string concatenation, `String(n)`, `Number(s)`)
//! need these conversions to agree.
//!
//! ## Notes
//! - `number_to_string` uses the shortest digit string that round-trips, which is what Rust's `{:e}` formatting
//!   produces. Only the placement of the decimal point and exponent is ECMAScript specific.

/// Render `n` the way ECMAScript `ToString` does.
///
/// ## Examples
/// ```rust
/// use t262_core::numbers::number_to_string;
/// assert_eq!(number_to_string(1.0), "1");
/// assert_eq!(number_to_string(-0.0), "0");
/// assert_eq!(number_to_string(0.000001), "0.000001");
/// assert_eq!(number_to_string(1e21), "1e+21");
/// assert_eq!(number_to_string(f64::NAN), "NaN");
/// ```
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n < 0.0 {
        return format!("-{}", number_to_string(-n));
    }

    // `{:e}` yields the shortest round-trip form: "d.ddde±x" or "de±x".
    let sci = format!("{n:e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exp: i32 = exp.parse().unwrap_or(0);
    let k = digits.len() as i32;
    let point = exp + 1;

    if k <= point && point <= 21 {
        let mut out = digits;
        out.extend(std::iter::repeat_n('0', (point - k) as usize));
        out
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let sign = if point - 1 >= 0 { '+' } else { '-' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{sign}{}", (point - 1).abs())
        } else {
            format!("{first}.{rest}e{sign}{}", (point - 1).abs())
        }
    }
}

/// Return `true` for characters ECMAScript treats as white space or line terminators.
pub fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}' | '\u{000B}' | '\u{000C}' | ' ' | '\u{00A0}' | '\u{FEFF}' | '\n' | '\r' | '\u{2028}' | '\u{2029}'
    ) || (c != '\u{0085}' && c.is_whitespace())
}

/// Convert a string to a number the way ECMAScript `ToNumber` does.
///
/// Surrounding white space is ignored, the empty string is `0`, and anything that is not a complete numeric literal
/// is `NaN`.
///
/// ## Examples
/// ```rust
/// use t262_core::numbers::string_to_number;
/// assert_eq!(string_to_number("  42 "), 42.0);
/// assert_eq!(string_to_number(""), 0.0);
/// assert_eq!(string_to_number("0x1F"), 31.0);
/// assert!(string_to_number("12px").is_nan());
/// assert!(string_to_number("inf").is_nan());
/// ```
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim_matches(is_js_whitespace);
    if trimmed.is_empty() {
        return 0.0;
    }

    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return f64::NAN;
        }
        return hex
            .chars()
            .filter_map(|c| c.to_digit(16))
            .fold(0.0, |acc, d| acc * 16.0 + f64::from(d));
    }

    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return if trimmed.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
    }
    if !is_decimal_literal(unsigned) {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// `digits [. digits] [e [+-] digits]` or `. digits [e ...]`, with at least one mantissa digit.
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut mantissa_digits = 0;

    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        mantissa_digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return false;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}

/// Parse a canonical array index (`"0"`, `"17"`, not `"017"` or `"4294967295"`).
///
/// ## Examples
/// ```rust
/// use t262_core::numbers::array_index;
/// assert_eq!(array_index("3"), Some(3));
/// assert_eq!(array_index("03"), None);
/// assert_eq!(array_index("length"), None);
/// ```
pub fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|i| *i != u32::MAX)
}

/// ECMAScript `ToUint32`, used for array lengths.
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    let int = n.trunc().rem_euclid(4_294_967_296.0);
    int as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_to_string_forms() {
        assert_eq!(number_to_string(123.0), "123");
        assert_eq!(number_to_string(1.5), "1.5");
        assert_eq!(number_to_string(-2.25), "-2.25");
        assert_eq!(number_to_string(0.1), "0.1");
        assert_eq!(number_to_string(1e-7), "1e-7");
        assert_eq!(number_to_string(123e20), "1.23e+22");
        assert_eq!(number_to_string(1e20), "100000000000000000000");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_string_to_number_rejects_rust_only_spellings() {
        assert!(string_to_number("nan").is_nan());
        assert!(string_to_number("infinity").is_nan());
        assert!(string_to_number("1e").is_nan());
        assert!(string_to_number(".").is_nan());
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert_eq!(string_to_number(" .5e1\n"), 5.0);
    }

    #[test]
    fn test_to_uint32_wraps() {
        assert_eq!(to_uint32(-1.0), u32::MAX);
        assert_eq!(to_uint32(4_294_967_296.0 + 3.0), 3);
        assert_eq!(to_uint32(f64::NAN), 0);
    }
}
