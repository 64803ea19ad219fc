//! Error types, one enum per phase: format parsing, layout checking,
//! field packing, and record decode/encode.

use crate::element::ElementKind;

/// Errors produced when parsing a format specification string into a
/// [crate::format::Format].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Specification string contains no elements.
    #[error("empty format specification")]
    Empty,
    /// Type code is not one of the known primitives.
    #[error("unknown type code {0:?} at byte {1}")]
    UnknownTypeCode(String, usize),
    /// Repeat count is zero.
    #[error("zero repeat count at byte {0}")]
    ZeroCount(usize),
    /// A string element has no bracketed byte length.
    #[error("string element at byte {0} requires a [length]")]
    MissingLength(usize),
    /// A bracketed length is empty, non-numeric, unterminated, or zero.
    #[error("invalid [length] at byte {0}")]
    InvalidLength(usize),
    /// A bracketed length follows a type that does not take one.
    #[error("type code {0:?} at byte {1} does not take a [length]")]
    UnexpectedLength(String, usize),
    /// Total record size does not fit in `usize`.
    #[error("record size overflows")]
    SizeOverflow,
}

/// Errors produced by the composite layout check in [crate::layout::check].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// In-memory size of the composite differs from the sum of its declared
    /// field widths (host padding, or a wrong declaration).
    #[error("layout size mismatch: declared {declared} bytes, in-memory {actual} bytes")]
    SizeMismatch { declared: usize, actual: usize },
}

/// Field-level domain errors: a logical value that cannot occupy its fixed
/// byte width, or raw bytes that violate a field's construction invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    /// Byte length of the input differs from the field width.
    #[error("length mismatch: expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    /// Byte does not match the field's mandated constant.
    #[error("value {actual:#04x} does not match required byte {expected:#04x}")]
    InvalidConstByte { expected: u8, actual: u8 },
}

/// Errors produced when decoding a binary record (e.g. during
/// [crate::format::Format::bin_to_csv]).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Buffer length differs from the format's record size.
    #[error("record length mismatch: format needs {expected} bytes, buffer has {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// Timestamp microseconds are outside the representable date range.
    #[error("timestamp out of range: {0} microseconds since epoch")]
    TimeOutOfRange(i64),
}

/// Errors produced when encoding a text record (e.g. during
/// [crate::format::Format::csv_to_bin]).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// Token count of the line differs from the format's field count.
    #[error("token count mismatch: format has {expected} fields, line has {actual} tokens")]
    TokenCountMismatch { expected: usize, actual: usize },
    /// A token failed to parse as its field's logical type.
    #[error("field {index}: cannot parse {token:?} as {kind}")]
    InvalidToken {
        index: usize,
        kind: ElementKind,
        token: String,
    },
    /// A value's type does not match its element kind.
    #[error("field {index}: value does not match element kind {kind}")]
    KindMismatch { index: usize, kind: ElementKind },
    /// A numeric value does not fit the element's fixed width.
    #[error("field {index}: value {value} out of range for {kind}")]
    OutOfRange {
        index: usize,
        kind: ElementKind,
        value: String,
    },
    /// A string value's byte length differs from its element's fixed length.
    #[error("field {index}: string of {actual} bytes in a field of {expected}")]
    WrongStringLength {
        index: usize,
        expected: usize,
        actual: usize,
    },
    /// Writing to the output sink failed.
    #[error("write to output sink failed: {0}")]
    Io(String),
}

impl From<std::io::Error> for EncodeError {
    fn from(err: std::io::Error) -> Self {
        EncodeError::Io(err.to_string())
    }
}
