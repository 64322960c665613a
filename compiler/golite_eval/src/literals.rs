//! Literal decoding.
//!
//! The front-end keeps literal texts raw; this module turns them into
//! values of their default types: `int`, `float64`, `complex128`, `rune`
//! and `string`.

use golite_ir::LitKind;
use golite_value::{literal_parse, EvalError, Value};
use std::str::Chars;

/// Decode `text` as a literal of `kind`.
pub fn decode(kind: LitKind, text: &str) -> Result<Value, EvalError> {
    match kind {
        LitKind::Int => parse_int(text).map(Value::int),
        LitKind::Float => parse_float(text).map(Value::float),
        LitKind::Imag => parse_imag(text).map(|im| Value::complex(0.0, im)),
        LitKind::Char => parse_char(text).map(Value::rune),
        LitKind::String => parse_string(text).map(Value::byte_string),
    }
}

/// Decode the integer literal `text` under a unary minus, so the
/// magnitude of `i64::MIN` is accepted.
pub fn decode_negated_int(text: &str) -> Result<Value, EvalError> {
    let negated = -i128::try_from(parse_magnitude(text)?)
        .map_err(|_| literal_parse(text, "value out of range for int"))?;
    i64::try_from(negated)
        .map(Value::int)
        .map_err(|_| literal_parse(text, "value out of range for int"))
}

fn parse_int(text: &str) -> Result<i64, EvalError> {
    i64::try_from(parse_magnitude(text)?)
        .map_err(|_| literal_parse(text, "value out of range for int"))
}

fn parse_magnitude(text: &str) -> Result<u128, EvalError> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    let (radix, body) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        _ if digits.len() > 1 && digits.starts_with('0') => (8, &digits[1..]),
        _ => (10, digits.as_str()),
    };
    if body.is_empty() {
        return Err(literal_parse(text, "missing digits"));
    }
    u128::from_str_radix(body, radix).map_err(|e| literal_parse(text, e))
}

fn parse_float(text: &str) -> Result<f64, EvalError> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    let value: f64 = digits.parse().map_err(|e| literal_parse(text, e))?;
    if value.is_infinite() {
        return Err(literal_parse(text, "value out of range for float64"));
    }
    Ok(value)
}

/// Imaginary literals are decimal even with a leading `0`.
fn parse_imag(text: &str) -> Result<f64, EvalError> {
    let Some(body) = text.strip_suffix('i') else {
        return Err(literal_parse(text, "missing imaginary suffix"));
    };
    parse_float(body).map_err(|_| literal_parse(text, "malformed imaginary literal"))
}

fn parse_char(text: &str) -> Result<char, EvalError> {
    let Some(body) = text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) else {
        return Err(literal_parse(text, "missing quotes"));
    };
    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return Err(literal_parse(text, "empty rune literal"));
    };
    let ch = if first == '\\' {
        match unescape(&mut chars, '\'').map_err(|e| literal_parse(text, e))? {
            Escaped::Char(c) => c,
            Escaped::Byte(b) => char::from(b),
        }
    } else {
        first
    };
    if chars.next().is_some() {
        return Err(literal_parse(text, "more than one character in rune literal"));
    }
    Ok(ch)
}

/// String literals decode to bytes: `\x` and octal escapes may produce
/// sequences that are not valid UTF-8.
fn parse_string(text: &str) -> Result<Vec<u8>, EvalError> {
    if let Some(raw) = text.strip_prefix('`').and_then(|t| t.strip_suffix('`')) {
        return Ok(raw.replace('\r', "").into_bytes());
    }
    let Some(body) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) else {
        return Err(literal_parse(text, "missing quotes"));
    };
    if !body.contains('\\') {
        return Ok(body.as_bytes().to_vec());
    }

    let mut bytes = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    let mut buf = [0u8; 4];
    while let Some(c) = chars.next() {
        let decoded = if c == '\\' {
            unescape(&mut chars, '"').map_err(|e| literal_parse(text, e))?
        } else {
            Escaped::Char(c)
        };
        match decoded {
            Escaped::Char(c) => bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes()),
            Escaped::Byte(b) => bytes.push(b),
        }
    }
    Ok(bytes)
}

enum Escaped {
    Char(char),
    /// `\x` and octal escapes name a single byte.
    Byte(u8),
}

/// Decode the escape after a backslash. `quote` is the one quote character
/// that may be escaped in this context.
fn unescape(chars: &mut Chars<'_>, quote: char) -> Result<Escaped, String> {
    let Some(c) = chars.next() else {
        return Err("escape sequence not terminated".into());
    };
    let simple = match c {
        'a' => Some('\u{07}'),
        'b' => Some('\u{08}'),
        'f' => Some('\u{0C}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\u{0B}'),
        '\\' => Some('\\'),
        c if c == quote => Some(c),
        _ => None,
    };
    if let Some(ch) = simple {
        return Ok(Escaped::Char(ch));
    }

    match c {
        '0'..='7' => {
            let mut value = u32::from(c) - u32::from('0');
            for _ in 0..2 {
                let digit = chars
                    .next()
                    .and_then(|d| d.to_digit(8))
                    .ok_or("invalid octal escape")?;
                value = value * 8 + digit;
            }
            u8::try_from(value)
                .map(Escaped::Byte)
                .map_err(|_| format!("octal escape value {value} > 255"))
        }
        'x' => hex_digits(chars, 2)
            .and_then(|v| u8::try_from(v).ok())
            .map(Escaped::Byte)
            .ok_or_else(|| "invalid hex escape".into()),
        'u' => hex_digits(chars, 4)
            .and_then(char::from_u32)
            .map(Escaped::Char)
            .ok_or_else(|| "invalid unicode escape".into()),
        'U' => hex_digits(chars, 8)
            .and_then(char::from_u32)
            .map(Escaped::Char)
            .ok_or_else(|| "invalid unicode escape".into()),
        other => Err(format!("unknown escape sequence \\{other}")),
    }
}

fn hex_digits(chars: &mut Chars<'_>, count: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..count {
        value = value.checked_mul(16)? + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

#[cfg(test)]
mod tests;
