use super::Expression;
use std::fmt::Write as _;

/// Literal values of the target language (Python).
///
/// Composite literals hold full expressions, so an f-string or a symbol can
/// appear inside a list or a dict and still be rendered as code.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    /// Wide enough for any JSON integer, signed or not.
    Int(i128),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Expression>),
    Tuple(Vec<Expression>),
    Dict(Vec<(Expression, Expression)>),
}

impl Literal {
    /// Converts a JSON document into the equivalent Python literal.
    /// Object keys keep their document order.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value as J;
        match value {
            J::Null => Literal::None,
            J::Bool(b) => Literal::Bool(*b),
            J::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Literal::Int(i.into()),
                (None, Some(u)) => Literal::Int(u.into()),
                (None, None) => Literal::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            J::String(s) => Literal::Str(s.clone()),
            J::Array(items) => Literal::List(
                items
                    .iter()
                    .map(|v| Expression::Literal(Literal::from_json(v)))
                    .collect(),
            ),
            J::Object(map) => Literal::Dict(
                map.iter()
                    .map(|(k, v)| {
                        (
                            Expression::Literal(Literal::Str(k.clone())),
                            Expression::Literal(Literal::from_json(v)),
                        )
                    })
                    .collect(),
            ),
        }
    }

    pub fn str(s: impl Into<String>) -> Self {
        Literal::Str(s.into())
    }
}

/// Python's `repr` of a float.
pub fn repr_float(n: f64) -> String {
    if n.is_nan() {
        return "float('nan')".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 {
            "float('inf')".to_string()
        } else {
            "-float('inf')".to_string()
        };
    }
    // Python switches to exponent notation from 1e16 upward and below 1e-4.
    let abs = n.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        let raw = format!("{:e}", n);
        let (mantissa, exponent) = raw.split_once('e').unwrap_or((&raw, "0"));
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(d) => ('-', d),
            None => ('+', exponent),
        };
        return format!("{}e{}{:0>2}", mantissa, sign, digits);
    }
    let s = format!("{:?}", n);
    if s.contains('.') { s } else { format!("{}.0", s) }
}

fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double { '"' } else { '\'' }
}

/// Python's `repr` of a `str`.
pub fn repr_str(s: &str) -> String {
    let quote = pick_quote(s.contains('\''), s.contains('"'));
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let code = c as u32;
                let _ = match code {
                    0..=0xff => write!(out, "\\x{:02x}", code),
                    0x100..=0xffff => write!(out, "\\u{:04x}", code),
                    _ => write!(out, "\\U{:08x}", code),
                };
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Python's `repr` of a `bytes` value.
pub fn repr_bytes(bytes: &[u8]) -> String {
    let quote = pick_quote(bytes.contains(&b'\''), bytes.contains(&b'"'));
    let mut out = String::with_capacity(bytes.len() + 3);
    out.push('b');
    out.push(quote);
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b if b as char == quote => {
                out.push('\\');
                out.push(quote);
            }
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\x{:02x}", b);
            }
        }
    }
    out.push(quote);
    out
}
