//! JSON-deserializable format description.
//!
//! These types describe the *shape* of a binary record. They are intended to
//! be constructed from JSON (for example a format file shipped with your
//! application) and then converted into a [crate::format::Format], when the
//! compact type-code string is not convenient to ship.

use serde::{Deserialize, Serialize};

use crate::element::ElementKind;
use crate::errors::FormatError;
use crate::format::{Element, Format};

/// Top-level format definition: an ordered list of elements.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FormatDef {
    /// Elements in record order.
    pub elements: Vec<ElementDef>,
}

/// One element: a primitive kind and an optional repeat count (default 1).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ElementDef {
    pub kind: ElementKindDef,
    #[serde(default = "one")]
    pub count: usize,
}

fn one() -> usize {
    1
}

/// Primitive kind of an element.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type")]
pub enum ElementKindDef {
    Char,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Time,
    /// Fixed string of exactly `len` bytes.
    Str { len: usize },
}

impl From<ElementKindDef> for ElementKind {
    fn from(value: ElementKindDef) -> Self {
        match value {
            ElementKindDef::Char => ElementKind::Char,
            ElementKindDef::Int8 => ElementKind::Int8,
            ElementKindDef::UInt8 => ElementKind::UInt8,
            ElementKindDef::Int16 => ElementKind::Int16,
            ElementKindDef::UInt16 => ElementKind::UInt16,
            ElementKindDef::Int32 => ElementKind::Int32,
            ElementKindDef::UInt32 => ElementKind::UInt32,
            ElementKindDef::Int64 => ElementKind::Int64,
            ElementKindDef::UInt64 => ElementKind::UInt64,
            ElementKindDef::Float32 => ElementKind::Float32,
            ElementKindDef::Float64 => ElementKind::Float64,
            ElementKindDef::Time => ElementKind::Time,
            ElementKindDef::Str { len } => ElementKind::Str(len),
        }
    }
}

impl From<ElementKind> for ElementKindDef {
    fn from(value: ElementKind) -> Self {
        match value {
            ElementKind::Char => ElementKindDef::Char,
            ElementKind::Int8 => ElementKindDef::Int8,
            ElementKind::UInt8 => ElementKindDef::UInt8,
            ElementKind::Int16 => ElementKindDef::Int16,
            ElementKind::UInt16 => ElementKindDef::UInt16,
            ElementKind::Int32 => ElementKindDef::Int32,
            ElementKind::UInt32 => ElementKindDef::UInt32,
            ElementKind::Int64 => ElementKindDef::Int64,
            ElementKind::UInt64 => ElementKindDef::UInt64,
            ElementKind::Float32 => ElementKindDef::Float32,
            ElementKind::Float64 => ElementKindDef::Float64,
            ElementKind::Time => ElementKindDef::Time,
            ElementKind::Str(len) => ElementKindDef::Str { len },
        }
    }
}

impl TryFrom<FormatDef> for Format {
    type Error = FormatError;

    fn try_from(value: FormatDef) -> Result<Self, Self::Error> {
        let elements = value
            .elements
            .into_iter()
            .map(|e| Element {
                kind: e.kind.into(),
                count: e.count,
            })
            .collect();
        Format::from_elements(elements)
    }
}

impl From<&Format> for FormatDef {
    fn from(value: &Format) -> Self {
        FormatDef {
            elements: value
                .elements()
                .iter()
                .map(|e| ElementDef {
                    kind: e.kind.into(),
                    count: e.count,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_def_to_format() {
        let def = FormatDef {
            elements: vec![
                ElementDef {
                    kind: ElementKindDef::Time,
                    count: 1,
                },
                ElementDef {
                    kind: ElementKindDef::Float64,
                    count: 2,
                },
                ElementDef {
                    kind: ElementKindDef::Str { len: 4 },
                    count: 1,
                },
            ],
        };

        let format = Format::try_from(def).unwrap();
        assert_eq!(format, Format::parse("t,2d,s[4]").unwrap());
    }

    #[test]
    fn test_format_to_def_round_trip() {
        let format = Format::parse("c,3uw,s[8]").unwrap();
        let def = FormatDef::from(&format);
        assert_eq!(Format::try_from(def).unwrap(), format);
    }

    #[test]
    fn test_empty_def_rejected() {
        let def = FormatDef { elements: vec![] };
        assert_eq!(Format::try_from(def).unwrap_err(), FormatError::Empty);
    }
}
