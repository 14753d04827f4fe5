use crate::vint::VInt;

///
/// The declared size of an element as read from its header.
///
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ElementSize {
    Known(u64),

    ///
    /// The reserved size pattern.  The element extends to the end of its container (or of the stream).
    ///
    Unknown
}

impl ElementSize {
    pub fn new(size: VInt) -> Self {
        if size.is_reserved() {
            ElementSize::Unknown
        } else {
            ElementSize::Known(size.value())
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, ElementSize::Known(_))
    }
}

///
/// Used to relax rules on how strictly an [`ElementReader`](crate::ElementReader) should validate the read stream.
///
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AllowableErrors {
    ///
    /// Accepts element identifiers that are not minimally encoded or that use the reserved pattern instead of
    /// returning [`ReaderError::InvalidIdentifier`](crate::error::element_reader::ReaderError::InvalidIdentifier).
    ///
    InvalidIdentifiers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_sizes_are_unknown() {
        for length in 1..=8 {
            assert_eq!(ElementSize::Unknown, ElementSize::new(VInt::unknown_size(length).unwrap()));
        }
        assert_eq!(ElementSize::Known(126), ElementSize::new(VInt::encode_size(126).unwrap()));
        assert_eq!(ElementSize::Known(127), ElementSize::new(VInt::encode_size_with_length(127, 2).unwrap()));
    }
}
