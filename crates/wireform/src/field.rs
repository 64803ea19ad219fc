//! Fixed-width packed field types.
//!
//! Each field is a newtype over `[u8; WIDTH]`: the in-memory size of a field
//! equals its on-wire size, so composites of fields have no hidden state.
//! Values move in and out only through [PackedField::pack] and
//! [PackedField::unpack], which are exact inverses over the field's domain.
//! Multi-byte integers are stored in network (big-endian) order.

use std::marker::PhantomData;

use crate::errors::PackError;

/// A logical value bound to an exact on-wire byte width.
///
/// Implementors store exactly `WIDTH` bytes. `pack` is total and
/// deterministic; it fails with [PackError] rather than truncating when the
/// value cannot occupy `WIDTH` bytes. `unpack(pack(v)) == v` for every `v`
/// in the field's domain.
pub trait PackedField: Sized {
    /// On-wire width in bytes. Equals `size_of::<Self>()`.
    const WIDTH: usize;
    /// Logical value type.
    type Value;

    /// Packs a logical value into its byte representation.
    fn pack(value: Self::Value) -> Result<Self, PackError>;
    /// Unpacks the stored bytes into the logical value.
    fn unpack(&self) -> Self::Value;
    /// Raw stored bytes, always `WIDTH` long.
    fn as_bytes(&self) -> &[u8];
    /// Builds a field from exactly `WIDTH` raw bytes, validating any
    /// construction invariant (e.g. a const byte).
    fn from_bytes(bytes: &[u8]) -> Result<Self, PackError>;
}

fn exact<const N: usize>(bytes: &[u8]) -> Result<[u8; N], PackError> {
    bytes.try_into().map_err(|_| PackError::WrongLength {
        expected: N,
        actual: bytes.len(),
    })
}

/// Single unsigned byte with identity packing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Byte([u8; 1]);

impl Byte {
    pub fn new(value: u8) -> Self {
        Byte([value])
    }
}

impl PackedField for Byte {
    const WIDTH: usize = 1;
    type Value = u8;

    fn pack(value: u8) -> Result<Self, PackError> {
        Ok(Byte([value]))
    }

    fn unpack(&self) -> u8 {
        self.0[0]
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PackError> {
        Ok(Byte(exact(bytes)?))
    }
}

impl PartialEq<u8> for Byte {
    fn eq(&self, other: &u8) -> bool {
        self.unpack() == *other
    }
}

/// Explicit one-byte codec for a logical flag/enum type.
///
/// The Rust stand-in for reinterpreting a raw byte as an arbitrary one-byte
/// type: decoding always goes through an explicit conversion, never aliasing.
pub trait ByteRepr {
    fn to_byte(&self) -> u8;
    fn from_byte(byte: u8) -> Self;
}

impl ByteRepr for u8 {
    fn to_byte(&self) -> u8 {
        *self
    }

    fn from_byte(byte: u8) -> Self {
        byte
    }
}

/// One-byte bitmask field decoded through a [ByteRepr] type `B`.
pub struct Flags<B: ByteRepr>([u8; 1], PhantomData<B>);

impl<B: ByteRepr> Flags<B> {
    pub fn new(value: B) -> Self {
        Flags([value.to_byte()], PhantomData)
    }
}

impl<B: ByteRepr> PackedField for Flags<B> {
    const WIDTH: usize = 1;
    type Value = B;

    fn pack(value: B) -> Result<Self, PackError> {
        Ok(Flags::new(value))
    }

    fn unpack(&self) -> B {
        B::from_byte(self.0[0])
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PackError> {
        Ok(Flags(exact(bytes)?, PhantomData))
    }
}

// Manual impls so `B` needs no Clone/Eq bounds of its own.
impl<B: ByteRepr> Clone for Flags<B> {
    fn clone(&self) -> Self {
        Flags(self.0, PhantomData)
    }
}

impl<B: ByteRepr> Copy for Flags<B> {}

impl<B: ByteRepr> PartialEq for Flags<B> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<B: ByteRepr> Eq for Flags<B> {}

impl<B: ByteRepr> std::fmt::Debug for Flags<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Flags({:#04x})", self.0[0])
    }
}

impl<B: ByteRepr> Default for Flags<B> {
    fn default() -> Self {
        Flags([0], PhantomData)
    }
}

/// 16-bit unsigned integer in network byte order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Be16([u8; 2]);

impl Be16 {
    pub fn new(value: u16) -> Self {
        Be16(value.to_be_bytes())
    }
}

impl PackedField for Be16 {
    const WIDTH: usize = 2;
    type Value = u16;

    fn pack(value: u16) -> Result<Self, PackError> {
        Ok(Be16(value.to_be_bytes()))
    }

    fn unpack(&self) -> u16 {
        u16::from_be_bytes(self.0)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PackError> {
        Ok(Be16(exact(bytes)?))
    }
}

impl PartialEq<u16> for Be16 {
    fn eq(&self, other: &u16) -> bool {
        self.unpack() == *other
    }
}

/// 32-bit unsigned integer in network byte order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Be32([u8; 4]);

impl Be32 {
    pub fn new(value: u32) -> Self {
        Be32(value.to_be_bytes())
    }
}

impl PackedField for Be32 {
    const WIDTH: usize = 4;
    type Value = u32;

    fn pack(value: u32) -> Result<Self, PackError> {
        Ok(Be32(value.to_be_bytes()))
    }

    fn unpack(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PackError> {
        Ok(Be32(exact(bytes)?))
    }
}

impl PartialEq<u32> for Be32 {
    fn eq(&self, other: &u32) -> bool {
        self.unpack() == *other
    }
}

/// Fixed-length string of exactly `N` bytes, padded with `PAD` by default.
///
/// Packing a string whose byte length differs from `N` fails; padding is part
/// of the stored value and survives unpacking verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedStr<const N: usize, const PAD: u8 = b' '>([u8; N]);

impl<const N: usize, const PAD: u8> FixedStr<N, PAD> {
    /// Packs a string slice of exactly `N` bytes.
    pub fn new(value: &str) -> Result<Self, PackError> {
        if value.len() != N {
            return Err(PackError::WrongLength {
                expected: N,
                actual: value.len(),
            });
        }

        let mut bytes = [0u8; N];
        bytes.copy_from_slice(value.as_bytes());
        Ok(FixedStr(bytes))
    }
}

impl<const N: usize, const PAD: u8> Default for FixedStr<N, PAD> {
    fn default() -> Self {
        FixedStr([PAD; N])
    }
}

impl<const N: usize, const PAD: u8> PackedField for FixedStr<N, PAD> {
    const WIDTH: usize = N;
    type Value = String;

    fn pack(value: String) -> Result<Self, PackError> {
        FixedStr::new(&value)
    }

    fn unpack(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PackError> {
        Ok(FixedStr(exact(bytes)?))
    }
}

impl<const N: usize, const PAD: u8> PartialEq<&str> for FixedStr<N, PAD> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

/// Field pinned to the literal byte `C`.
///
/// Construction always yields `C`; packing or loading any other byte fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstByte<const C: u8>([u8; 1]);

impl<const C: u8> ConstByte<C> {
    pub fn new() -> Self {
        ConstByte([C])
    }
}

impl<const C: u8> Default for ConstByte<C> {
    fn default() -> Self {
        ConstByte::new()
    }
}

impl<const C: u8> PackedField for ConstByte<C> {
    const WIDTH: usize = 1;
    type Value = u8;

    fn pack(value: u8) -> Result<Self, PackError> {
        if value != C {
            return Err(PackError::InvalidConstByte {
                expected: C,
                actual: value,
            });
        }
        Ok(ConstByte([C]))
    }

    fn unpack(&self) -> u8 {
        C
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PackError> {
        let bytes: [u8; 1] = exact(bytes)?;
        if bytes[0] != C {
            return Err(PackError::InvalidConstByte {
                expected: C,
                actual: bytes[0],
            });
        }
        Ok(ConstByte(bytes))
    }
}

impl<const C: u8> PartialEq<u8> for ConstByte<C> {
    fn eq(&self, other: &u8) -> bool {
        C == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_sizes_match_widths() {
        assert_eq!(std::mem::size_of::<Byte>(), Byte::WIDTH);
        assert_eq!(std::mem::size_of::<Be16>(), Be16::WIDTH);
        assert_eq!(std::mem::size_of::<Be32>(), Be32::WIDTH);
        assert_eq!(std::mem::size_of::<FixedStr<5>>(), 5);
        assert_eq!(std::mem::size_of::<ConstByte<0x7E>>(), 1);
        assert_eq!(std::mem::size_of::<Flags<u8>>(), 1);
    }

    #[test]
    fn test_be16_network_order() {
        let field = Be16::pack(0x0102).unwrap();
        assert_eq!(field.as_bytes(), &[0x01, 0x02]);
        assert_eq!(field.unpack(), 0x0102);
    }

    #[test]
    fn test_be32_network_order() {
        let field = Be32::pack(0x01020304).unwrap();
        assert_eq!(field.as_bytes(), &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(field.unpack(), 0x01020304);
    }

    #[test]
    fn test_be_round_trip_extremes() {
        for v in [0u16, 1, 0x00FF, 0xFF00, u16::MAX] {
            assert_eq!(Be16::pack(v).unwrap().unpack(), v);
        }
        for v in [0u32, 1, 0x0000FFFF, 0xFFFF0000, u32::MAX] {
            assert_eq!(Be32::pack(v).unwrap().unpack(), v);
        }
    }

    #[test]
    fn test_field_equals_logical_value() {
        assert_eq!(Be16::pack(513).unwrap(), 513u16);
        assert_eq!(Byte::new(7), 7u8);
        assert_eq!(FixedStr::<3>::new("abc").unwrap(), "abc");
    }

    #[test]
    fn test_fixed_str_wrong_length() {
        assert_eq!(
            FixedStr::<4>::new("abc").unwrap_err(),
            PackError::WrongLength {
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(
            FixedStr::<4>::new("abcde").unwrap_err(),
            PackError::WrongLength {
                expected: 4,
                actual: 5
            }
        );
    }

    #[test]
    fn test_fixed_str_round_trip_with_padding() {
        let field = FixedStr::<5>::new("ab   ").unwrap();
        assert_eq!(field.unpack(), "ab   ");
        assert_eq!(field.as_bytes(), b"ab   ");
    }

    #[test]
    fn test_fixed_str_default_is_padding() {
        let field: FixedStr<4> = Default::default();
        assert_eq!(field.unpack(), "    ");

        let field: FixedStr<4, b'0'> = Default::default();
        assert_eq!(field.unpack(), "0000");
    }

    #[test]
    fn test_const_byte() {
        let field = ConstByte::<0x7E>::new();
        assert_eq!(field.unpack(), 0x7E);
        assert_eq!(field.as_bytes(), &[0x7E]);

        assert!(ConstByte::<0x7E>::pack(0x7E).is_ok());
        assert_eq!(
            ConstByte::<0x7E>::pack(0x00).unwrap_err(),
            PackError::InvalidConstByte {
                expected: 0x7E,
                actual: 0x00
            }
        );
        assert!(ConstByte::<0x7E>::from_bytes(&[0x00]).is_err());
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Status {
        armed: bool,
        fault: bool,
    }

    impl ByteRepr for Status {
        fn to_byte(&self) -> u8 {
            (self.armed as u8) | ((self.fault as u8) << 1)
        }

        fn from_byte(byte: u8) -> Self {
            Status {
                armed: byte & 1 != 0,
                fault: byte & 2 != 0,
            }
        }
    }

    #[test]
    fn test_flags_round_trip() {
        let status = Status {
            armed: true,
            fault: false,
        };
        let field = Flags::pack(status).unwrap();
        assert_eq!(field.as_bytes(), &[0x01]);
        assert_eq!(field.unpack(), status);
    }

    #[test]
    fn test_byte_equality_is_byte_wise() {
        assert_eq!(Be32::pack(42).unwrap(), Be32::from_bytes(&[0, 0, 0, 42]).unwrap());
        assert_ne!(Be32::pack(42).unwrap(), Be32::pack(43).unwrap());
    }

    #[test]
    fn test_from_bytes_wrong_length() {
        assert_eq!(
            Be16::from_bytes(&[1, 2, 3]).unwrap_err(),
            PackError::WrongLength {
                expected: 2,
                actual: 3
            }
        );
    }
}

#[cfg(test)]
mod prop_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        // Big-endian round trip, and the packed bytes are the network-order
        // representation regardless of host endianness.
        #[test]
        fn prop_be16_round_trip(v in any::<u16>()) {
            let field = Be16::pack(v).unwrap();
            prop_assert_eq!(field.unpack(), v);
            prop_assert_eq!(field.as_bytes(), &v.to_be_bytes());
            prop_assert_eq!(Be16::from_bytes(field.as_bytes()).unwrap(), field);
        }

        #[test]
        fn prop_be32_round_trip(v in any::<u32>()) {
            let field = Be32::pack(v).unwrap();
            prop_assert_eq!(field.unpack(), v);
            prop_assert_eq!(field.as_bytes(), &v.to_be_bytes());
            prop_assert_eq!(Be32::from_bytes(field.as_bytes()).unwrap(), field);
        }

        #[test]
        fn prop_fixed_str_exact_length_round_trips(s in "[ -~]{6}") {
            let field = FixedStr::<6>::new(&s).unwrap();
            prop_assert_eq!(field.unpack(), s);
        }
    }
}
