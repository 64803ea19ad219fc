//! Composite packed layouts: fixed-size structs built from packed fields.
//!
//! A composite declares its members in order and its `WIDTH` as the sum of
//! member widths. [check] validates once, at setup, that the host has not
//! inserted padding and the declared width is honest; a mismatch is a
//! configuration error, not a data error.

use crate::errors::{LayoutError, PackError};
use crate::field::PackedField;

/// A fixed-size byte layout: a packed field or a composite of them.
///
/// `write` and `read` move the whole layout through a byte slice in
/// declaration order with no implicit gaps. Equality of composites is the
/// derived member-wise comparison, which for packed fields is byte-wise.
pub trait PackedLayout: Sized {
    /// Total byte width, the sum of member widths.
    const WIDTH: usize;

    /// Writes the packed bytes into `out[..WIDTH]`.
    ///
    /// Callers pass a slice of at least `WIDTH` bytes.
    fn write(&self, out: &mut [u8]);

    /// Reads a layout from `bytes[..WIDTH]`, validating field invariants.
    fn read(bytes: &[u8]) -> Result<Self, PackError>;

    /// Packs the layout into a fresh buffer of exactly `WIDTH` bytes.
    fn to_vec(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::WIDTH];
        self.write(&mut out);
        out
    }
}

// Every packed field is a one-member layout.
impl<F: PackedField> PackedLayout for F {
    const WIDTH: usize = F::WIDTH;

    fn write(&self, out: &mut [u8]) {
        debug_assert!(
            out.len() >= F::WIDTH,
            "output buffer shorter than layout width"
        );
        out[..F::WIDTH].copy_from_slice(self.as_bytes());
    }

    fn read(bytes: &[u8]) -> Result<Self, PackError> {
        if bytes.len() < F::WIDTH {
            return Err(PackError::WrongLength {
                expected: F::WIDTH,
                actual: bytes.len(),
            });
        }
        F::from_bytes(&bytes[..F::WIDTH])
    }
}

/// Checks that `T` occupies exactly its declared width in memory.
///
/// Fails when the in-memory size differs from `T::WIDTH`: either the host
/// inserted alignment padding (a member is not a packed field) or the
/// declared width is wrong. Run once per composite type at setup.
pub fn check<T: PackedLayout>() -> Result<(), LayoutError> {
    let actual = std::mem::size_of::<T>();
    if actual != T::WIDTH {
        return Err(LayoutError::SizeMismatch {
            declared: T::WIDTH,
            actual,
        });
    }
    Ok(())
}
