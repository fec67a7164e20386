//! Numeric-ish coercion policy
//!
//! Input elements are untyped JSON values. Classification follows the
//! ECMAScript conversion rules the public contract was defined against:
//!
//! - `string_form` is `String(value)`
//! - `to_number` is `Number(value)` (`None` stands for `NaN`)
//! - `parse_int` is `parseInt(String(value), 10)`
//!
//! Quirks that follow from these rules and are kept on purpose:
//! - `""` and whitespace-only strings coerce to `0`, so they count as numbers
//! - `true`, `false` and `null` coerce to `1`, `0` and `0`
//! - `"0x1F"`, `"0o17"` and `"0b11"` are numbers, but `parse_int` reads them as `0`
//! - arrays coerce through their joined string form: `[]` is `0`, `["7"]` is `7`
//! - objects never coerce

use serde_json::{Number, Value};

/// 2^63, the first float outside the `i64` range
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// `String(value)` for a JSON value
pub fn string_form(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), number_to_string),
        Value::String(s) => s.clone(),
        Value::Array(items) => join_array(items),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// `Array.prototype.join` with the default separator; null becomes empty
fn join_array(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::Null => String::new(),
            other => string_form(other),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// `Number(value)`; `None` means the value coerces to `NaN`
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => string_to_number(s),
        Value::Array(items) => string_to_number(&join_array(items)),
        Value::Object(_) => None,
    }
}

/// Whether `isNaN(value)` would be false
pub fn is_numeric(value: &Value) -> bool {
    to_number(value).is_some()
}

/// `parseInt(String(value), 10)`; `None` means `NaN`
pub fn parse_int(value: &Value) -> Option<f64> {
    let text = string_form(value);
    let trimmed = text.trim_start_matches(is_js_whitespace);

    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: f64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// JS `StringToNumber`: trims JS whitespace, then accepts the
/// `StringNumericLiteral` grammar only
fn string_to_number(s: &str) -> Option<f64> {
    let trimmed = s.trim_matches(is_js_whitespace);
    if trimmed.is_empty() {
        return Some(0.0);
    }

    if let Some(value) = parse_non_decimal(trimmed) {
        return Some(value);
    }

    let (negative, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let magnitude = if unsigned == "Infinity" {
        f64::INFINITY
    } else if is_decimal_literal(unsigned) {
        unsigned.parse::<f64>().ok()?
    } else {
        return None;
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// `0x`, `0o` and `0b` integer literals (unsigned only)
fn parse_non_decimal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };

    s[2..].chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|digit| acc.mul_add(f64::from(radix), f64::from(digit)))
    })
}

/// `DecimalDigits [. DecimalDigits] [ExponentPart]` or `. DecimalDigits [ExponentPart]`
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut pos = 0;

    let int_digits = count_digits(&bytes[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        frac_digits = count_digits(&bytes[pos..]);
        pos += frac_digits;
    }

    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let exp_digits = count_digits(&bytes[pos..]);
        if exp_digits == 0 {
            return false;
        }
        pos += exp_digits;
    }

    pos == bytes.len()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// ECMAScript `WhiteSpace` and `LineTerminator` code points
const fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'
            | '\u{000A}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Number as `JSON.stringify` lays it out: integral floats drop the `.0`
#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
pub fn js_number(n: Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.trunc() == f && (-TWO_POW_63..TWO_POW_63).contains(&f) => {
            Number::from(f as i64)
        }
        _ => n,
    }
}

/// `js_number` applied to every number inside `value`
pub fn js_layout(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(js_number(n)),
        Value::Array(items) => Value::Array(items.into_iter().map(js_layout).collect()),
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, js_layout(v))).collect())
        }
        other => other,
    }
}

/// `Number.prototype.toString()` for finite values
///
/// Uses the shortest round-trip digits, laid out with the same
/// fixed/exponent thresholds as JS (`1e21` and `1e-7` switch to exponent form).
fn number_to_string(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_string()
        } else if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }

    let sign = if value < 0.0 { "-" } else { "" };
    // `{:e}` yields the shortest digits, e.g. "1.2345e-7"
    let scientific = format!("{:e}", value.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return format!("{value}");
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return format!("{value}");
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = i32::try_from(digits.len()).unwrap_or(i32::MAX);
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat(usize::try_from(n - k).unwrap_or(0)))
    } else if 0 < n && n <= 21 {
        let split = usize::try_from(n).unwrap_or(0);
        format!("{}.{}", &digits[..split], &digits[split..])
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat(usize::try_from(-n).unwrap_or(0)))
    } else {
        let exp_sign = if n - 1 < 0 { '-' } else { '+' };
        let exp = (n - 1).abs();
        if digits.len() == 1 {
            format!("{digits}e{exp_sign}{exp}")
        } else {
            format!("{}.{}e{exp_sign}{exp}", &digits[..1], &digits[1..])
        }
    };

    format!("{sign}{body}")
}
