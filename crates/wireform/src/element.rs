//! Primitive element kinds: the fixed-width types a record format is built
//! from, with their byte-level codec.
//!
//! Every multi-byte element is stored in network (big-endian) order, the
//! same convention as the packed field types, so records convert identically
//! on any host.

use chrono::DateTime;

use crate::errors::{DecodeError, EncodeError};
use crate::value::Value;

/// Fixed-width primitive type of a single record element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Single byte rendered as a character (`c`).
    Char,
    /// Signed 8-bit integer (`b`).
    Int8,
    /// Unsigned 8-bit integer (`ub`).
    UInt8,
    /// Signed 16-bit integer (`w`).
    Int16,
    /// Unsigned 16-bit integer (`uw`).
    UInt16,
    /// Signed 32-bit integer (`i`).
    Int32,
    /// Unsigned 32-bit integer (`ui`).
    UInt32,
    /// Signed 64-bit integer (`l`).
    Int64,
    /// Unsigned 64-bit integer (`ul`).
    UInt64,
    /// IEEE 754 single-precision float (`f`).
    Float32,
    /// IEEE 754 double-precision float (`d`).
    Float64,
    /// Timestamp: signed microseconds since the Unix epoch (`t`).
    Time,
    /// Fixed string of exactly this many bytes (`s[N]`).
    Str(usize),
}

impl ElementKind {
    /// On-wire width in bytes.
    pub fn width(&self) -> usize {
        match self {
            ElementKind::Char | ElementKind::Int8 | ElementKind::UInt8 => 1,
            ElementKind::Int16 | ElementKind::UInt16 => 2,
            ElementKind::Int32 | ElementKind::UInt32 | ElementKind::Float32 => 4,
            ElementKind::Int64
            | ElementKind::UInt64
            | ElementKind::Float64
            | ElementKind::Time => 8,
            ElementKind::Str(len) => *len,
        }
    }

    /// Decodes exactly [width](ElementKind::width) bytes into a [Value].
    pub(crate) fn read_value(&self, bytes: &[u8]) -> Result<Value, DecodeError> {
        debug_assert_eq!(bytes.len(), self.width());

        let value = match self {
            ElementKind::Char => Value::Char(bytes[0]),
            ElementKind::Int8 => Value::Int(bytes[0] as i8 as i64),
            ElementKind::UInt8 => Value::UInt(bytes[0] as u64),
            ElementKind::Int16 => {
                Value::Int(i16::from_be_bytes(bytes.try_into().unwrap()) as i64)
            }
            ElementKind::UInt16 => {
                Value::UInt(u16::from_be_bytes(bytes.try_into().unwrap()) as u64)
            }
            ElementKind::Int32 => {
                Value::Int(i32::from_be_bytes(bytes.try_into().unwrap()) as i64)
            }
            ElementKind::UInt32 => {
                Value::UInt(u32::from_be_bytes(bytes.try_into().unwrap()) as u64)
            }
            ElementKind::Int64 => Value::Int(i64::from_be_bytes(bytes.try_into().unwrap())),
            ElementKind::UInt64 => Value::UInt(u64::from_be_bytes(bytes.try_into().unwrap())),
            ElementKind::Float32 => {
                Value::Float32(f32::from_be_bytes(bytes.try_into().unwrap()))
            }
            ElementKind::Float64 => {
                Value::Float64(f64::from_be_bytes(bytes.try_into().unwrap()))
            }
            ElementKind::Time => {
                let micros = i64::from_be_bytes(bytes.try_into().unwrap());
                let time = DateTime::from_timestamp_micros(micros)
                    .ok_or(DecodeError::TimeOutOfRange(micros))?;
                Value::Time(time)
            }
            ElementKind::Str(_) => Value::Str(String::from_utf8_lossy(bytes).into_owned()),
        };

        Ok(value)
    }

    /// Encodes `value` as exactly [width](ElementKind::width) bytes appended
    /// to `out`. `index` is the field position, reported on error.
    pub(crate) fn write_value(
        &self,
        index: usize,
        value: &Value,
        out: &mut Vec<u8>,
    ) -> Result<(), EncodeError> {
        let mismatch = || EncodeError::KindMismatch { index, kind: *self };
        let out_of_range = |shown: String| EncodeError::OutOfRange {
            index,
            kind: *self,
            value: shown,
        };

        match (self, value) {
            (ElementKind::Char, Value::Char(b)) => out.push(*b),
            (ElementKind::Int8, Value::Int(v)) => {
                let v = i8::try_from(*v).map_err(|_| out_of_range(v.to_string()))?;
                out.push(v as u8);
            }
            (ElementKind::UInt8, Value::UInt(v)) => {
                let v = u8::try_from(*v).map_err(|_| out_of_range(v.to_string()))?;
                out.push(v);
            }
            (ElementKind::Int16, Value::Int(v)) => {
                let v = i16::try_from(*v).map_err(|_| out_of_range(v.to_string()))?;
                out.extend_from_slice(&v.to_be_bytes());
            }
            (ElementKind::UInt16, Value::UInt(v)) => {
                let v = u16::try_from(*v).map_err(|_| out_of_range(v.to_string()))?;
                out.extend_from_slice(&v.to_be_bytes());
            }
            (ElementKind::Int32, Value::Int(v)) => {
                let v = i32::try_from(*v).map_err(|_| out_of_range(v.to_string()))?;
                out.extend_from_slice(&v.to_be_bytes());
            }
            (ElementKind::UInt32, Value::UInt(v)) => {
                let v = u32::try_from(*v).map_err(|_| out_of_range(v.to_string()))?;
                out.extend_from_slice(&v.to_be_bytes());
            }
            (ElementKind::Int64, Value::Int(v)) => out.extend_from_slice(&v.to_be_bytes()),
            (ElementKind::UInt64, Value::UInt(v)) => out.extend_from_slice(&v.to_be_bytes()),
            (ElementKind::Float32, Value::Float32(v)) => {
                out.extend_from_slice(&v.to_be_bytes());
            }
            (ElementKind::Float64, Value::Float64(v)) => {
                out.extend_from_slice(&v.to_be_bytes());
            }
            (ElementKind::Time, Value::Time(t)) => {
                out.extend_from_slice(&t.timestamp_micros().to_be_bytes());
            }
            (ElementKind::Str(len), Value::Str(s)) => {
                if s.len() != *len {
                    return Err(EncodeError::WrongStringLength {
                        index,
                        expected: *len,
                        actual: s.len(),
                    });
                }
                out.extend_from_slice(s.as_bytes());
            }
            _ => return Err(mismatch()),
        }

        Ok(())
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Char => write!(f, "c"),
            ElementKind::Int8 => write!(f, "b"),
            ElementKind::UInt8 => write!(f, "ub"),
            ElementKind::Int16 => write!(f, "w"),
            ElementKind::UInt16 => write!(f, "uw"),
            ElementKind::Int32 => write!(f, "i"),
            ElementKind::UInt32 => write!(f, "ui"),
            ElementKind::Int64 => write!(f, "l"),
            ElementKind::UInt64 => write!(f, "ul"),
            ElementKind::Float32 => write!(f, "f"),
            ElementKind::Float64 => write!(f, "d"),
            ElementKind::Time => write!(f, "t"),
            ElementKind::Str(len) => write!(f, "s[{}]", len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(ElementKind::Char.width(), 1);
        assert_eq!(ElementKind::Int8.width(), 1);
        assert_eq!(ElementKind::UInt16.width(), 2);
        assert_eq!(ElementKind::Int32.width(), 4);
        assert_eq!(ElementKind::Float32.width(), 4);
        assert_eq!(ElementKind::UInt64.width(), 8);
        assert_eq!(ElementKind::Float64.width(), 8);
        assert_eq!(ElementKind::Time.width(), 8);
        assert_eq!(ElementKind::Str(17).width(), 17);
    }

    #[test]
    fn test_int_byte_order() {
        let mut out = Vec::new();
        ElementKind::UInt32
            .write_value(0, &Value::UInt(0x01020304), &mut out)
            .unwrap();
        assert_eq!(out, vec![0x01, 0x02, 0x03, 0x04]);
        assert_eq!(
            ElementKind::UInt32.read_value(&out).unwrap(),
            Value::UInt(0x01020304)
        );
    }

    #[test]
    fn test_signed_round_trip() {
        for v in [i64::from(i16::MIN), -1, 0, 1, i64::from(i16::MAX)] {
            let mut out = Vec::new();
            ElementKind::Int16
                .write_value(0, &Value::Int(v), &mut out)
                .unwrap();
            assert_eq!(ElementKind::Int16.read_value(&out).unwrap(), Value::Int(v));
        }
    }

    #[test]
    fn test_out_of_range() {
        let mut out = Vec::new();
        let err = ElementKind::Int8
            .write_value(3, &Value::Int(128), &mut out)
            .unwrap_err();
        assert_eq!(
            err,
            EncodeError::OutOfRange {
                index: 3,
                kind: ElementKind::Int8,
                value: "128".to_string(),
            }
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_kind_mismatch() {
        let mut out = Vec::new();
        let err = ElementKind::Float64
            .write_value(1, &Value::Int(0), &mut out)
            .unwrap_err();
        assert_eq!(
            err,
            EncodeError::KindMismatch {
                index: 1,
                kind: ElementKind::Float64,
            }
        );
    }

    #[test]
    fn test_str_length_enforced() {
        let mut out = Vec::new();
        let err = ElementKind::Str(4)
            .write_value(0, &Value::Str("abc".to_string()), &mut out)
            .unwrap_err();
        assert_eq!(
            err,
            EncodeError::WrongStringLength {
                index: 0,
                expected: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_display_codes() {
        assert_eq!(ElementKind::UInt32.to_string(), "ui");
        assert_eq!(ElementKind::Time.to_string(), "t");
        assert_eq!(ElementKind::Str(8).to_string(), "s[8]");
    }
}
