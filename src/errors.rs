use std::fmt;
use std::error::Error;

pub mod vint {
    use super::fmt;
    use super::Error;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum VIntError {
        InvalidEncoding(u64),
        LengthOutOfRange(usize),
        ValueOutOfRange(u64),
        ValueDoesNotFit {
            value: u64,
            length: usize,
        },
    }

    impl fmt::Display for VIntError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                VIntError::InvalidEncoding(bits) => write!(f, "Bit pattern 0x{:x} is not a valid vint encoding.", bits),
                VIntError::LengthOutOfRange(length) => write!(f, "Vint length must be between 1 and 8, got {}.", length),
                VIntError::ValueOutOfRange(value) => write!(f, "Value too large to be written as a vint: {}", value),
                VIntError::ValueDoesNotFit { value, length } => write!(f, "Value {} does not fit in a vint of length {}.", value, length),
            }
        }
    }

    impl Error for VIntError {}
}

pub mod tools {
    use super::fmt;
    use super::Error;

    #[derive(Debug)]
    pub enum ToolError {
        ReadU64Overflow(Vec<u8>),
        ReadI64Overflow(Vec<u8>),
        ReadF64Mismatch(Vec<u8>),
        ReadDateMismatch(Vec<u8>),
    }

    impl fmt::Display for ToolError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ToolError::ReadU64Overflow(arr) => write!(f, "Could not read unsigned int from array: {:?}", arr),
                ToolError::ReadI64Overflow(arr) => write!(f, "Could not read int from array: {:?}", arr),
                ToolError::ReadF64Mismatch(arr) => write!(f, "Could not read float from array: {:?}", arr),
                ToolError::ReadDateMismatch(arr) => write!(f, "Could not read date from array: {:?}", arr),
            }
        }
    }

    impl Error for ToolError {}
}

pub mod element_reader {
    use super::fmt;
    use super::Error;
    use super::vint::VIntError;
    use super::tools::ToolError;
    use std::{io, string};

    #[derive(Debug)]
    pub enum ReaderError {
        InvalidVInt {
            position: u64,
            source: VIntError,
        },
        InvalidIdentifier {
            position: u64,
            id: u64,
        },
        UnexpectedEndOfStream {
            position: u64,
        },
        SizeMismatch {
            element_id: u64,
            source: ToolError,
        },
        Utf8ParseError {
            element_id: u64,
            source: string::FromUtf8Error,
        },
        ElementOverflowsContainer {
            element_id: u64,
            element_end: u64,
            container_end: u64,
        },
        NoCurrentElement,
        NoOpenContainer,
        CannotDecodeMaster {
            element_id: u64,
        },
        ReadError {
            source: io::Error,
        },
    }

    impl fmt::Display for ReaderError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ReaderError::InvalidVInt { position, source: _ } => write!(f, "Encountered corrupted vint at position {}.  See `source()` for details.", position),
                ReaderError::InvalidIdentifier { position, id } => write!(f, "Element id 0x{:x} at position {} is not a valid (minimally encoded, non-reserved) identifier.", id, position),
                ReaderError::UnexpectedEndOfStream { position } => write!(f, "Expected element data at position {}, but reached end of source.", position),
                ReaderError::SizeMismatch { element_id, source } => write!(f, "Size of element 0x{:x} does not match the requested type. {}", element_id, source),
                ReaderError::Utf8ParseError { element_id, source: _ } => write!(f, "Error parsing element 0x{:x} as Utf8.  See `source()` for details.", element_id),
                ReaderError::ElementOverflowsContainer { element_id, element_end, container_end } => write!(f, "Element 0x{:x} ends at {} which is past its container's end at {}.", element_id, element_end, container_end),
                ReaderError::NoCurrentElement => write!(f, "No element header has been read."),
                ReaderError::NoOpenContainer => write!(f, "No container has been entered."),
                ReaderError::CannotDecodeMaster { element_id } => write!(f, "Element 0x{:x} is a master element and has no scalar value.", element_id),
                ReaderError::ReadError { source: _ } => write!(f, "Error reading from source."),
            }
        }
    }

    impl Error for ReaderError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            match self {
                ReaderError::InvalidVInt { position: _, source } => Some(source),
                ReaderError::SizeMismatch { element_id: _, source } => Some(source),
                ReaderError::Utf8ParseError { element_id: _, source } => Some(source),
                ReaderError::ReadError { source } => Some(source),
                _ => None,
            }
        }
    }
}

pub mod element_writer {
    use super::fmt;
    use super::Error;
    use super::vint::VIntError;
    use std::io;

    #[derive(Debug)]
    pub enum WriterError {
        InvalidIdentifier(u64),
        TagSizeError(VIntError),
        DateOutOfRange(String),
        InvalidSizeWidth(usize),
        WriteError {
            source: io::Error,
        },
    }

    impl fmt::Display for WriterError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                WriterError::InvalidIdentifier(id) => write!(f, "0x{:x} is not a valid element identifier.", id),
                WriterError::TagSizeError(source) => write!(f, "Problem writing element size. {}", source),
                WriterError::DateOutOfRange(date) => write!(f, "Date {} cannot be expressed as nanoseconds from 2001-01-01.", date),
                WriterError::InvalidSizeWidth(width) => write!(f, "Size field width must be between 1 and 8, got {}.", width),
                WriterError::WriteError { source: _ } => write!(f, "Error writing to destination."),
            }
        }
    }

    impl Error for WriterError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            match self {
                WriterError::TagSizeError(source) => Some(source),
                WriterError::WriteError { source } => Some(source),
                _ => None,
            }
        }
    }
}

pub mod segment_info {
    use super::fmt;
    use super::Error;
    use super::element_reader::ReaderError;
    use super::element_writer::WriterError;
    use super::vint::VIntError;
    use std::io;

    #[derive(Debug)]
    pub enum UpdaterError {
        SegmentNotFound,
        InfoNotFound,
        UnknownSizeInfo,
        InsufficientSpace {
            required: u64,
            available: u64,
        },
        Encoding(VIntError),
        Reader(ReaderError),
        Writer(WriterError),
        Io(io::Error),
    }

    impl fmt::Display for UpdaterError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                UpdaterError::SegmentNotFound => write!(f, "Source does not contain a Segment element."),
                UpdaterError::InfoNotFound => write!(f, "Segment does not contain an Info element."),
                UpdaterError::UnknownSizeInfo => write!(f, "Info element has an unknown size and cannot be rewritten in place."),
                UpdaterError::InsufficientSpace { required, available } => write!(f, "Updated Info needs {} bytes but only {} can be reused in place.", required, available),
                UpdaterError::Encoding(_) => write!(f, "Error encoding an element identifier.  See `source()` for details."),
                UpdaterError::Reader(_) => write!(f, "Error reading segment info.  See `source()` for details."),
                UpdaterError::Writer(_) => write!(f, "Error encoding segment info.  See `source()` for details."),
                UpdaterError::Io(_) => write!(f, "Error accessing the underlying stream."),
            }
        }
    }

    impl Error for UpdaterError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            match self {
                UpdaterError::Encoding(source) => Some(source),
                UpdaterError::Reader(source) => Some(source),
                UpdaterError::Writer(source) => Some(source),
                UpdaterError::Io(source) => Some(source),
                _ => None,
            }
        }
    }

    impl From<VIntError> for UpdaterError {
        fn from(source: VIntError) -> Self {
            UpdaterError::Encoding(source)
        }
    }

    impl From<ReaderError> for UpdaterError {
        fn from(source: ReaderError) -> Self {
            UpdaterError::Reader(source)
        }
    }

    impl From<WriterError> for UpdaterError {
        fn from(source: WriterError) -> Self {
            UpdaterError::Writer(source)
        }
    }

    impl From<io::Error> for UpdaterError {
        fn from(source: io::Error) -> Self {
            UpdaterError::Io(source)
        }
    }
}
