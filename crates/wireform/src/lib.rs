//! # wireform
//!
//! Fixed-width binary record layouts and schema-driven binary/CSV conversion.
//!
//! Two layers share one set of packing rules. The packed field types
//! ([field], [layout]) bind logical values to exact on-wire byte widths for
//! record shapes known at compile time. The [format] descriptor generalizes
//! the same rules to a runtime-specified record shape, parsed once from a
//! compact type-code string, and drives conversion between binary records and
//! delimited text lines in both directions.
//!
//! All multi-byte values are big-endian (network order) on the wire.
//!
//! ## Example
//!
//! ```
//! use wireform::format::Format;
//!
//! let format = Format::parse("t,2d,ui").unwrap();
//! assert_eq!(format.size(), 8 + 16 + 4);
//! assert_eq!(format.count(), 4);
//!
//! let record = format.csv_to_bin("20200101T000000.000000,1.5,-2,42", ',').unwrap();
//! assert_eq!(record.len(), format.size());
//! assert_eq!(
//!     format.bin_to_csv(&record, ',', None).unwrap(),
//!     "20200101T000000.000000,1.5,-2,42",
//! );
//! ```

pub mod element;
pub mod errors;
pub mod field;
pub mod format;
pub mod layout;
pub mod value;

#[cfg(feature = "serde")]
pub mod serde;
