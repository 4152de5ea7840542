//! Lenient numeric parsing for command-line and case-file input.
//!
//! Every function here is total: malformed input becomes zero instead of an error so the
//! policy engine never has to branch on bad data.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use regex::Regex;

/// Raw value as it arrives from a command line argument or a case file field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Real(value)
    }
}

/// Numeric kinds the sanitizer can coerce into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Real,
}

/// Result of sanitizing a raw value into a requested kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Integer(i64),
    Real(f64),
}

impl Numeric {
    pub fn zero(kind: NumericKind) -> Self {
        match kind {
            NumericKind::Integer => Numeric::Integer(0),
            NumericKind::Real => Numeric::Real(0.0),
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Integer(value) => value as f64,
            Numeric::Real(value) => value,
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            Numeric::Integer(value) => value,
            Numeric::Real(value) => truncate(value),
        }
    }
}

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[-+]?[\d,.]+").expect("numeric pattern compiles"))
}

/// Coerces `raw` into `kind`, returning zero of that kind when nothing numeric is found.
pub fn sanitize(raw: &RawValue, kind: NumericKind) -> Numeric {
    let value = match raw {
        RawValue::Integer(value) => return coerce_integer(*value, kind),
        RawValue::Real(value) => *value,
        RawValue::Text(text) => match parse_text(text) {
            Some(value) => value,
            None => return Numeric::zero(kind),
        },
    };

    if !value.is_finite() {
        return Numeric::zero(kind);
    }

    match kind {
        NumericKind::Integer => Numeric::Integer(truncate(value)),
        NumericKind::Real => Numeric::Real(value),
    }
}

/// Shorthand for sanitizing a day count.
pub fn sanitize_integer(raw: impl Into<RawValue>) -> i64 {
    sanitize(&raw.into(), NumericKind::Integer).as_i64()
}

/// Shorthand for sanitizing a mileage or currency amount.
pub fn sanitize_real(raw: impl Into<RawValue>) -> f64 {
    sanitize(&raw.into(), NumericKind::Real).as_f64()
}

fn coerce_integer(value: i64, kind: NumericKind) -> Numeric {
    match kind {
        NumericKind::Integer => Numeric::Integer(value),
        NumericKind::Real => Numeric::Real(value as f64),
    }
}

fn parse_text(text: &str) -> Option<f64> {
    let candidate = numeric_pattern().find(text)?;
    let cleaned = candidate.as_str().replace(',', "");
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

// `as` saturates at the i64 bounds and maps NaN to zero.
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}
