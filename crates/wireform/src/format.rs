//! Format: a parsed record shape used to convert between fixed-size binary
//! records and delimited text lines.
//!
//! A format is parsed once from a compact specification string and is
//! immutable afterwards, so it can be shared read-only across threads. Each
//! token is `[count]code[[N]]`: an optional decimal repeat count, a type code
//! from [crate::element::ElementKind], and a bracketed byte length for `s`.
//! Commas between tokens are accepted and ignored, so `"t,2d,ui"` and
//! `"t2dui"` describe the same record.

use std::io;

use crate::element::ElementKind;
use crate::errors::{DecodeError, EncodeError, FormatError};
use crate::value::Value;

/// One parsed element: a primitive kind and its repeat count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub count: usize,
}

/// A compiled record format: ordered elements, total byte size, and total
/// scalar field count. Use [Format::parse] to build from a specification
/// string, then [Format::bin_to_csv] / [Format::csv_to_bin] per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    elements: Vec<Element>,
    size: usize,
    count: usize,
}

impl Format {
    /// Parses a specification string into a format. Fails on an empty
    /// specification, an unknown type code, a zero repeat count, or a
    /// missing/invalid string length.
    pub fn parse(spec: &str) -> Result<Self, FormatError> {
        let bytes = spec.as_bytes();
        let mut elements = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            if bytes[pos] == b',' {
                pos += 1;
                continue;
            }

            let start = pos;
            let count = match take_number(bytes, &mut pos) {
                Some(0) => return Err(FormatError::ZeroCount(start)),
                Some(n) => n,
                None => 1,
            };

            let kind = take_kind(bytes, &mut pos)?;
            elements.push(Element { kind, count });
        }

        Self::from_elements(elements)
    }

    /// Builds a format from already-constructed elements.
    pub fn from_elements(elements: Vec<Element>) -> Result<Self, FormatError> {
        if elements.is_empty() {
            return Err(FormatError::Empty);
        }

        let mut size: usize = 0;
        let mut count: usize = 0;
        for element in &elements {
            if element.count == 0 {
                return Err(FormatError::ZeroCount(0));
            }
            if let ElementKind::Str(0) = element.kind {
                return Err(FormatError::InvalidLength(0));
            }
            size = element
                .kind
                .width()
                .checked_mul(element.count)
                .and_then(|bytes| size.checked_add(bytes))
                .ok_or(FormatError::SizeOverflow)?;
            count = count
                .checked_add(element.count)
                .ok_or(FormatError::SizeOverflow)?;
        }

        Ok(Format {
            elements,
            size,
            count,
        })
    }

    /// Record size in bytes: the sum of element widths times repeat counts.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total scalar field count: the sum of repeat counts.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Parsed elements in declaration order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Iterates the flattened scalar kinds (each element repeated `count`
    /// times), in record order.
    fn kinds(&self) -> impl Iterator<Item = ElementKind> + '_ {
        self.elements
            .iter()
            .flat_map(|e| std::iter::repeat(e.kind).take(e.count))
    }

    /// Decodes a binary record into one [Value] per scalar field.
    ///
    /// `buf` must be exactly [size](Format::size) bytes.
    pub fn decode(&self, buf: &[u8]) -> Result<Vec<Value>, DecodeError> {
        if buf.len() != self.size {
            return Err(DecodeError::LengthMismatch {
                expected: self.size,
                actual: buf.len(),
            });
        }

        let mut values = Vec::with_capacity(self.count);
        let mut offset = 0;
        for kind in self.kinds() {
            let width = kind.width();
            values.push(kind.read_value(&buf[offset..offset + width])?);
            offset += width;
        }

        Ok(values)
    }

    /// Encodes one [Value] per scalar field into a binary record of exactly
    /// [size](Format::size) bytes. Nothing is emitted on error.
    pub fn encode(&self, values: &[Value]) -> Result<Vec<u8>, EncodeError> {
        if values.len() != self.count {
            return Err(EncodeError::TokenCountMismatch {
                expected: self.count,
                actual: values.len(),
            });
        }

        let mut out = Vec::with_capacity(self.size);
        for (index, (kind, value)) in self.kinds().zip(values).enumerate() {
            kind.write_value(index, value, &mut out)?;
        }

        debug_assert_eq!(out.len(), self.size);
        Ok(out)
    }

    /// Converts a binary record into a delimited text line (no trailing
    /// newline). `precision` controls floating-point rendering; `None` uses
    /// the shortest round-tripping representation.
    pub fn bin_to_csv(
        &self,
        buf: &[u8],
        delimiter: char,
        precision: Option<usize>,
    ) -> Result<String, DecodeError> {
        let values = self.decode(buf)?;
        let rendered: Vec<String> = values.iter().map(|v| v.render(precision)).collect();
        Ok(rendered.join(&delimiter.to_string()))
    }

    /// Converts a delimited text line into a binary record.
    ///
    /// The line must split into exactly [count](Format::count) tokens; a
    /// trailing line ending is ignored. Every token must parse as its
    /// field's logical type.
    pub fn csv_to_bin(&self, line: &str, delimiter: char) -> Result<Vec<u8>, EncodeError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let tokens: Vec<&str> = line.split(delimiter).collect();
        if tokens.len() != self.count {
            return Err(EncodeError::TokenCountMismatch {
                expected: self.count,
                actual: tokens.len(),
            });
        }

        let mut out = Vec::with_capacity(self.size);
        for (index, (kind, token)) in self.kinds().zip(tokens).enumerate() {
            let value = Value::parse_token(kind, token, index)?;
            kind.write_value(index, &value, &mut out)?;
        }

        Ok(out)
    }

    /// Like [csv_to_bin](Format::csv_to_bin), writing the record to a byte
    /// sink. The record is converted fully before any byte is written.
    pub fn csv_to_bin_into<W: io::Write>(
        &self,
        out: &mut W,
        line: &str,
        delimiter: char,
    ) -> Result<(), EncodeError> {
        let record = self.csv_to_bin(line, delimiter)?;
        out.write_all(&record)?;
        Ok(())
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            if element.count > 1 {
                write!(f, "{}", element.count)?;
            }
            write!(f, "{}", element.kind)?;
        }
        Ok(())
    }
}

/// Consumes a run of decimal digits at `*pos`, if any.
fn take_number(bytes: &[u8], pos: &mut usize) -> Option<usize> {
    let start = *pos;
    while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if *pos == start {
        return None;
    }

    // Digit runs in a format string are short; saturate instead of failing.
    let mut n = 0usize;
    for &b in &bytes[start..*pos] {
        n = n.saturating_mul(10).saturating_add((b - b'0') as usize);
    }
    Some(n)
}

/// Consumes one type code (and its bracketed length for `s`) at `*pos`.
fn take_kind(bytes: &[u8], pos: &mut usize) -> Result<ElementKind, FormatError> {
    let start = *pos;
    let unknown = |code: &[u8], at: usize| {
        FormatError::UnknownTypeCode(String::from_utf8_lossy(code).into_owned(), at)
    };

    let first = *bytes
        .get(*pos)
        .ok_or_else(|| unknown(&bytes[start..], start))?;
    *pos += 1;

    let kind = match first {
        b'c' => ElementKind::Char,
        b'b' => ElementKind::Int8,
        b'w' => ElementKind::Int16,
        b'i' => ElementKind::Int32,
        b'l' => ElementKind::Int64,
        b'f' => ElementKind::Float32,
        b'd' => ElementKind::Float64,
        b't' => ElementKind::Time,
        b'u' => {
            let second = *bytes
                .get(*pos)
                .ok_or_else(|| unknown(&bytes[start..*pos], start))?;
            *pos += 1;
            match second {
                b'b' => ElementKind::UInt8,
                b'w' => ElementKind::UInt16,
                b'i' => ElementKind::UInt32,
                b'l' => ElementKind::UInt64,
                _ => return Err(unknown(&bytes[start..*pos], start)),
            }
        }
        b's' => {
            if bytes.get(*pos) != Some(&b'[') {
                return Err(FormatError::MissingLength(start));
            }
            *pos += 1;
            let len = take_number(bytes, pos).ok_or(FormatError::InvalidLength(start))?;
            if bytes.get(*pos) != Some(&b']') {
                return Err(FormatError::InvalidLength(start));
            }
            *pos += 1;
            if len == 0 {
                return Err(FormatError::InvalidLength(start));
            }
            ElementKind::Str(len)
        }
        _ => return Err(unknown(&bytes[start..*pos], start)),
    };

    if !matches!(kind, ElementKind::Str(_)) && bytes.get(*pos) == Some(&b'[') {
        return Err(FormatError::UnexpectedLength(kind.to_string(), start));
    }

    Ok(kind)
}
