//!
//! The variable length integer used for every element identifier and element size in EBML.
//!
//! A vint of length `L` occupies `L` bytes.  The first byte carries a single "marker" bit at position `8 - L` (counting
//! from the most significant bit) and the remaining `7 * L` bits hold the big-endian value.  A value whose data bits are
//! all ones is reserved - as an element size it means "unknown".
//!

use super::errors::vint::VIntError;

pub const MAX_LENGTH: usize = 8;

#[inline]
fn data_mask(length: usize) -> u64 {
    (1u64 << (7 * length)) - 1
}

///
/// An immutable, already encoded vint.
///
/// ## Example
///
/// ```
/// use ebml_editable::vint::VInt;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let size = VInt::encode_size(127)?;
/// assert_eq!(2, size.length());
/// assert_eq!(0x407F, size.encoded());
/// assert_eq!(vec![0x40, 0x7F], size.to_bytes());
///
/// let decoded = VInt::from_encoded(0x407F)?;
/// assert_eq!(127, decoded.value());
/// # Ok(())
/// # }
/// ```
///
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VInt {
    encoded: u64,
    length: usize,
}

impl VInt {
    ///
    /// Encodes `value` using the smallest length whose data bits can hold it without producing the reserved pattern.
    ///
    /// # Errors
    ///
    /// Returns [`VIntError::ValueOutOfRange`] if the value needs more than 8 bytes.
    ///
    pub fn encode_size(value: u64) -> Result<VInt, VIntError> {
        for length in 1..=MAX_LENGTH {
            if value < data_mask(length) {
                return Ok(Self::new_unchecked(value, length));
            }
        }
        Err(VIntError::ValueOutOfRange(value))
    }

    ///
    /// Encodes `value` using exactly `length` bytes.
    ///
    /// Used to write size fields that must keep a width reserved earlier.
    ///
    /// # Errors
    ///
    /// Returns [`VIntError::LengthOutOfRange`] if `length` isn't in `1..=8`, or [`VIntError::ValueDoesNotFit`] if the value
    /// can't be held by `7 * length` data bits without colliding with the reserved pattern.
    ///
    pub fn encode_size_with_length(value: u64, length: usize) -> Result<VInt, VIntError> {
        check_length(length)?;
        if value >= data_mask(length) {
            return Err(VIntError::ValueDoesNotFit { value, length });
        }
        Ok(Self::new_unchecked(value, length))
    }

    ///
    /// Returns the reserved (all data bits set) vint of the given length, used as the "unknown size" marker.
    ///
    pub fn unknown_size(length: usize) -> Result<VInt, VIntError> {
        check_length(length)?;
        Ok(Self::new_unchecked(data_mask(length), length))
    }

    ///
    /// Builds an element identifier from its data value, e.g. `make_id(0x6C)` yields the `0xEC` Void id.
    ///
    /// # Errors
    ///
    /// Returns [`VIntError::ValueOutOfRange`] if the value is reserved or too large to be a valid identifier.
    ///
    pub fn make_id(value: u64) -> Result<VInt, VIntError> {
        let id = Self::encode_size(value)?;
        if id.is_valid_identifier() {
            Ok(id)
        } else {
            Err(VIntError::ValueOutOfRange(value))
        }
    }

    ///
    /// Interprets `bits` as a complete encoded vint (marker bit included).
    ///
    /// The length is recovered from the position of the highest set bit, which must sit on a 7-bit boundary.
    ///
    /// # Errors
    ///
    /// Returns [`VIntError::InvalidEncoding`] for zero or for a marker bit in an impossible position.
    ///
    pub fn from_encoded(bits: u64) -> Result<VInt, VIntError> {
        if bits == 0 {
            return Err(VIntError::InvalidEncoding(bits));
        }

        let marker = 63 - bits.leading_zeros() as usize;
        if marker % 7 != 0 {
            return Err(VIntError::InvalidEncoding(bits));
        }

        let length = marker / 7;
        if !(1..=MAX_LENGTH).contains(&length) {
            return Err(VIntError::InvalidEncoding(bits));
        }

        Ok(VInt { encoded: bits, length })
    }

    #[inline]
    fn new_unchecked(value: u64, length: usize) -> VInt {
        VInt {
            encoded: value | (1 << (7 * length)),
            length,
        }
    }

    /// Number of bytes taken by the encoded form.
    pub fn length(&self) -> usize {
        self.length
    }

    /// The decoded value, without the marker bit.
    pub fn value(&self) -> u64 {
        self.encoded & data_mask(self.length)
    }

    /// The encoded form as a big-endian packed integer, marker bit included.
    pub fn encoded(&self) -> u64 {
        self.encoded
    }

    pub fn is_reserved(&self) -> bool {
        self.value() == data_mask(self.length)
    }

    ///
    /// Element ids must be minimally encoded and must not use the reserved pattern.
    ///
    pub fn is_valid_identifier(&self) -> bool {
        !self.is_reserved() && matches!(Self::encode_size(self.value()), Ok(minimal) if minimal.length == self.length)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.encoded.to_be_bytes()[(8 - self.length)..].to_vec()
    }
}

#[inline]
fn check_length(length: usize) -> Result<(), VIntError> {
    if (1..=MAX_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(VIntError::LengthOutOfRange(length))
    }
}
