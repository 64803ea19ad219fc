//! Decoded record values: rendering to text and parsing from text tokens.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::element::ElementKind;
use crate::errors::EncodeError;

/// ISO basic timestamp, microsecond precision, e.g. `20140101T000000.000000`.
const TIME_FORMAT: &str = "%Y%m%dT%H%M%S%.6f";
const TIME_PARSE_FORMAT: &str = "%Y%m%dT%H%M%S%.f";

/// A single decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Single byte rendered as a character.
    Char(u8),
    /// Any signed integer element, widened to 64 bits.
    Int(i64),
    /// Any unsigned integer element, widened to 64 bits.
    UInt(u64),
    Float32(f32),
    Float64(f64),
    Time(DateTime<Utc>),
    Str(String),
}

impl Value {
    /// Renders the value as a text token.
    ///
    /// `precision` applies to floating-point values only: `Some(p)` writes
    /// `p` fractional digits and trims trailing zeros; `None` uses the
    /// shortest representation that round-trips.
    pub fn render(&self, precision: Option<usize>) -> String {
        match self {
            Value::Char(b) => (*b as char).to_string(),
            Value::Int(v) => v.to_string(),
            Value::UInt(v) => v.to_string(),
            // Each float width renders with its own shortest representation;
            // widening f32 to f64 first would print spurious digits.
            Value::Float32(v) => match precision {
                None => v.to_string(),
                Some(p) => trim_fraction(format!("{:.*}", p, v)),
            },
            Value::Float64(v) => match precision {
                None => v.to_string(),
                Some(p) => trim_fraction(format!("{:.*}", p, v)),
            },
            Value::Time(t) => t.format(TIME_FORMAT).to_string(),
            Value::Str(s) => s.clone(),
        }
    }

    /// Parses a text token as a value of the given element kind. `index` is
    /// the field position, reported on error.
    pub(crate) fn parse_token(
        kind: ElementKind,
        token: &str,
        index: usize,
    ) -> Result<Value, EncodeError> {
        let invalid = || EncodeError::InvalidToken {
            index,
            kind,
            token: token.to_string(),
        };

        let value = match kind {
            ElementKind::Char => {
                // Inverse of rendering `b as char`: one character, and its
                // code point must fit a byte (U+0000..=U+00FF).
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if (c as u32) <= 0xFF => Value::Char(c as u8),
                    _ => return Err(invalid()),
                }
            }
            ElementKind::Int8 => Value::Int(token.parse::<i8>().map_err(|_| invalid())? as i64),
            ElementKind::UInt8 => {
                Value::UInt(token.parse::<u8>().map_err(|_| invalid())? as u64)
            }
            ElementKind::Int16 => {
                Value::Int(token.parse::<i16>().map_err(|_| invalid())? as i64)
            }
            ElementKind::UInt16 => {
                Value::UInt(token.parse::<u16>().map_err(|_| invalid())? as u64)
            }
            ElementKind::Int32 => {
                Value::Int(token.parse::<i32>().map_err(|_| invalid())? as i64)
            }
            ElementKind::UInt32 => {
                Value::UInt(token.parse::<u32>().map_err(|_| invalid())? as u64)
            }
            ElementKind::Int64 => Value::Int(token.parse::<i64>().map_err(|_| invalid())?),
            ElementKind::UInt64 => Value::UInt(token.parse::<u64>().map_err(|_| invalid())?),
            ElementKind::Float32 => {
                Value::Float32(token.parse::<f32>().map_err(|_| invalid())?)
            }
            ElementKind::Float64 => {
                Value::Float64(token.parse::<f64>().map_err(|_| invalid())?)
            }
            ElementKind::Time => {
                let time = NaiveDateTime::parse_from_str(token, TIME_PARSE_FORMAT)
                    .map_err(|_| invalid())?;
                Value::Time(time.and_utc())
            }
            ElementKind::Str(len) => {
                if token.len() != len {
                    return Err(EncodeError::WrongStringLength {
                        index,
                        expected: len,
                        actual: token.len(),
                    });
                }
                Value::Str(token.to_string())
            }
        };

        Ok(value)
    }
}

fn trim_fraction(mut rendered: String) -> String {
    if rendered.contains('.') {
        let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
        rendered.truncate(trimmed.len());
    }
    rendered
}
