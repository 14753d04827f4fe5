use std::io::{self, Read, Seek, SeekFrom};
use std::convert::TryInto;

use log::{debug, trace};

use super::tools;
use super::vint::VInt;
use super::values::ElementValue;
use super::specs::ElementType;
use super::reader_util::{AllowableErrors, ElementSize};
use super::errors::element_reader::ReaderError;
use super::errors::vint::VIntError;

///
/// The header of the element a reader is currently positioned on, along with where it lives in the stream.
///
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ElementHeader {
    pub id: VInt,

    /// The raw size field.  Its length is the width reserved for the size in the stream.
    pub size_field: VInt,

    /// Offset of the first byte of the identifier.
    pub position: u64,

    /// Offset of the first payload byte.
    pub data_start: u64,

    ///
    /// Payload length.  For an unknown-size element this is the distance to the end of the enclosing container (or
    /// of the stream when no container has been entered).
    ///
    pub data_size: u64,
}

impl ElementHeader {
    pub fn size(&self) -> ElementSize {
        ElementSize::new(self.size_field)
    }

    pub fn data_end(&self) -> u64 {
        self.data_start + self.data_size
    }

    pub fn header_len(&self) -> u64 {
        self.data_start - self.position
    }
}

///
/// Provides a forward cursor over EBML elements read from a source implementing [`std::io::Read`] and [`std::io::Seek`].
///
/// The reader decodes one element header at a time with [`Self::read_next()`].  Scalar payloads are decoded on demand
/// with the `read_*` methods; a payload that is never read is skipped by the next call to `read_next`.  Master elements
/// are walked by calling [`Self::enter_container()`], iterating the children, and then [`Self::leave_container()`] - which
/// always lands on the byte following the container no matter how many children were read.
///
/// No specification is needed to walk a document.  Callers decide how to decode a payload from the element id, for
/// example with [`ebml_editable_specification::get_descriptor`] and [`Self::read_value()`].
///
/// ## Example
///
/// ```
/// use std::io::Cursor;
/// use ebml_editable::{ElementReader, ElementWriter};
/// use ebml_editable::vint::VInt;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut dest = Cursor::new(Vec::new());
/// let mut writer = ElementWriter::new(&mut dest);
/// writer.write_utf(VInt::make_id(1)?, "Hello")?;
/// writer.write_unsigned(VInt::make_id(2)?, 12345)?;
///
/// dest.set_position(0);
/// let mut reader = ElementReader::new(&mut dest);
/// assert!(reader.read_next()?);
/// assert_eq!(Some(VInt::make_id(1)?), reader.element_id());
/// assert_eq!("Hello", reader.read_utf()?);
/// assert!(reader.read_next()?);
/// assert_eq!(12345, reader.read_uint()?);
/// assert!(!reader.read_next()?);
/// # Ok(())
/// # }
/// ```
///
pub struct ElementReader<R: Read + Seek> {
    source: R,
    stream_end: Option<u64>,
    container_ends: Vec<u64>,
    current: Option<ElementHeader>,
    entered: bool,
    allow_invalid_ids: bool,
}

impl<R: Read + Seek> ElementReader<R> {

    ///
    /// Returns a new `ElementReader` that starts at the current position of `source`.
    ///
    pub fn new(source: R) -> Self {
        ElementReader {
            source,
            stream_end: None,
            container_ends: Vec::new(),
            current: None,
            entered: false,
            allow_invalid_ids: false,
        }
    }

    ///
    /// Configures which errors should be tolerated while reading.  See [`AllowableErrors`].
    ///
    pub fn allow_errors(&mut self, errors: &[AllowableErrors]) {
        self.allow_invalid_ids = errors.iter().any(|e| matches!(e, AllowableErrors::InvalidIdentifiers));
    }

    ///
    /// Consumes self and returns the underlying source.
    ///
    pub fn into_inner(self) -> R {
        self.source
    }

    ///
    /// Gets a mutable reference to the underlying source.  Moving the source position will confuse the reader.
    ///
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.source
    }

    pub fn header(&self) -> Option<&ElementHeader> {
        self.current.as_ref()
    }

    pub fn element_id(&self) -> Option<VInt> {
        self.current.map(|h| h.id)
    }

    pub fn element_size(&self) -> Option<u64> {
        self.current.map(|h| h.data_size)
    }

    pub fn element_position(&self) -> Option<u64> {
        self.current.map(|h| h.position)
    }

    pub fn payload_position(&self) -> Option<u64> {
        self.current.map(|h| h.data_start)
    }

    pub fn element_end(&self) -> Option<u64> {
        self.current.map(|h| h.data_end())
    }

    pub fn is_unknown_size(&self) -> bool {
        matches!(self.current, Some(h) if !h.size().is_known())
    }

    ///
    /// Number of containers currently entered.
    ///
    pub fn depth(&self) -> usize {
        self.container_ends.len()
    }

    pub fn position(&mut self) -> Result<u64, ReaderError> {
        self.source.stream_position().map_err(|source| ReaderError::ReadError { source })
    }

    fn seek_to(&mut self, position: u64) -> Result<(), ReaderError> {
        self.source.seek(SeekFrom::Start(position)).map_err(|source| ReaderError::ReadError { source })?;
        Ok(())
    }

    fn stream_end(&mut self) -> Result<u64, ReaderError> {
        if let Some(end) = self.stream_end {
            return Ok(end);
        }

        let position = self.position()?;
        let end = self.source.seek(SeekFrom::End(0)).map_err(|source| ReaderError::ReadError { source })?;
        self.seek_to(position)?;
        self.stream_end = Some(end);
        Ok(end)
    }

    fn scope_end(&mut self) -> Result<u64, ReaderError> {
        match self.container_ends.last() {
            Some(end) => Ok(*end),
            None => self.stream_end(),
        }
    }

    fn read_exact_at(&mut self, buf: &mut [u8], position: u64) -> Result<(), ReaderError> {
        self.source.read_exact(buf).map_err(|source| match source.kind() {
            io::ErrorKind::UnexpectedEof => ReaderError::UnexpectedEndOfStream { position },
            _ => ReaderError::ReadError { source },
        })
    }

    fn read_vint(&mut self, position: u64) -> Result<VInt, ReaderError> {
        let mut first = [0u8; 1];
        self.read_exact_at(&mut first, position)?;

        if first[0] == 0 {
            return Err(ReaderError::InvalidVInt { position, source: VIntError::InvalidEncoding(0) });
        }

        let length = first[0].leading_zeros() as usize + 1;
        let mut rest = [0u8; 7];
        self.read_exact_at(&mut rest[..(length - 1)], position)?;

        let bits = rest[..(length - 1)].iter().fold(first[0] as u64, |acc, b| (acc << 8) | *b as u64);
        VInt::from_encoded(bits).map_err(|source| ReaderError::InvalidVInt { position, source })
    }

    ///
    /// Moves to the next sibling element and decodes its header.
    ///
    /// Any unread payload of the previous element is skipped first.  Returns `false` once the end of the current
    /// container (or of the stream, at the top level) has been reached.
    ///
    pub fn read_next(&mut self) -> Result<bool, ReaderError> {
        if let Some(previous) = self.current.take() {
            if !self.entered {
                self.seek_to(previous.data_end())?;
            }
        }
        self.entered = false;

        let position = self.position()?;
        let end = self.scope_end()?;
        if position >= end {
            return Ok(false);
        }

        let id = self.read_vint(position)?;
        if !self.allow_invalid_ids && !id.is_valid_identifier() {
            return Err(ReaderError::InvalidIdentifier { position, id: id.encoded() });
        }

        let size_position = position + id.length() as u64;
        let size_field = self.read_vint(size_position)?;
        let data_start = size_position + size_field.length() as u64;

        let data_size = match ElementSize::new(size_field) {
            ElementSize::Known(size) => size,
            ElementSize::Unknown => end.saturating_sub(data_start),
        };

        if !self.container_ends.is_empty() && data_start.saturating_add(data_size) > end {
            return Err(ReaderError::ElementOverflowsContainer {
                element_id: id.encoded(),
                element_end: data_start.saturating_add(data_size),
                container_end: end,
            });
        }

        trace!("element 0x{:x} at {} with {} payload bytes", id.encoded(), position, data_size);
        self.current = Some(ElementHeader { id, size_field, position, data_start, data_size });
        Ok(true)
    }

    ///
    /// Calls [`Self::read_next()`] until an element with the encoded identifier `id` is found among the remaining
    /// siblings.  Returns `false` if the container ran out first.
    ///
    pub fn locate_element(&mut self, id: u64) -> Result<bool, ReaderError> {
        while self.read_next()? {
            if matches!(self.element_id(), Some(found) if found.encoded() == id) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    ///
    /// Treats the current element's payload as a sequence of child elements.
    ///
    pub fn enter_container(&mut self) -> Result<(), ReaderError> {
        let header = match self.current {
            Some(header) if !self.entered => header,
            _ => return Err(ReaderError::NoCurrentElement),
        };

        self.seek_to(header.data_start)?;
        self.container_ends.push(header.data_end());
        self.entered = true;
        debug!("entered container 0x{:x} ending at {}", header.id.encoded(), header.data_end());
        Ok(())
    }

    ///
    /// Leaves the innermost container, positioning the reader on the byte following it.
    ///
    pub fn leave_container(&mut self) -> Result<(), ReaderError> {
        let end = self.container_ends.pop().ok_or(ReaderError::NoOpenContainer)?;
        self.seek_to(end)?;
        self.current = None;
        self.entered = false;
        debug!("left container at {}", end);
        Ok(())
    }

    fn current_payload_header(&mut self) -> Result<ElementHeader, ReaderError> {
        match self.current {
            Some(header) if !self.entered => {
                if self.position()? != header.data_start {
                    self.seek_to(header.data_start)?;
                }
                Ok(header)
            },
            _ => Err(ReaderError::NoCurrentElement),
        }
    }

    fn read_scalar_payload(&mut self) -> Result<(u64, Vec<u8>), ReaderError> {
        let header = self.current_payload_header()?;

        // Scalars are at most 8 bytes; a longer payload only needs one extra byte to be reported as a mismatch
        let length: usize = header.data_size.min(9).try_into().unwrap_or(9);
        let mut data = vec![0u8; length];
        self.read_exact_at(&mut data, header.data_start)?;
        Ok((header.id.encoded(), data))
    }

    ///
    /// Reads the whole payload of the current element as uninterpreted bytes.
    ///
    pub fn read_binary(&mut self) -> Result<Vec<u8>, ReaderError> {
        let header = self.current_payload_header()?;

        let mut data = Vec::new();
        (&mut self.source).take(header.data_size).read_to_end(&mut data).map_err(|source| ReaderError::ReadError { source })?;
        if (data.len() as u64) < header.data_size {
            return Err(ReaderError::UnexpectedEndOfStream { position: header.data_start + data.len() as u64 });
        }
        Ok(data)
    }

    ///
    /// Reads a big-endian signed integer of 0 to 8 bytes.  An empty payload reads as `0`.
    ///
    pub fn read_int(&mut self) -> Result<i64, ReaderError> {
        let (element_id, data) = self.read_scalar_payload()?;
        tools::arr_to_i64(&data).map_err(|source| ReaderError::SizeMismatch { element_id, source })
    }

    ///
    /// Reads a big-endian unsigned integer of 0 to 8 bytes.  An empty payload reads as `0`.
    ///
    pub fn read_uint(&mut self) -> Result<u64, ReaderError> {
        let (element_id, data) = self.read_scalar_payload()?;
        tools::arr_to_u64(&data).map_err(|source| ReaderError::SizeMismatch { element_id, source })
    }

    ///
    /// Reads a 4 or 8 byte IEEE-754 float, widened to `f64`.
    ///
    pub fn read_float(&mut self) -> Result<f64, ReaderError> {
        let (element_id, data) = self.read_scalar_payload()?;
        tools::arr_to_f64(&data).map_err(|source| ReaderError::SizeMismatch { element_id, source })
    }

    ///
    /// Reads an 8 byte (or empty) date element.
    ///
    pub fn read_date(&mut self) -> Result<chrono::DateTime<chrono::Utc>, ReaderError> {
        let (element_id, data) = self.read_scalar_payload()?;
        tools::arr_to_date(&data).map_err(|source| ReaderError::SizeMismatch { element_id, source })
    }

    pub fn read_utf(&mut self) -> Result<String, ReaderError> {
        let element_id = self.current.map(|h| h.id.encoded()).unwrap_or_default();
        let data = self.read_binary()?;
        String::from_utf8(data).map_err(|source| ReaderError::Utf8ParseError { element_id, source })
    }

    ///
    /// Decodes the current payload according to `element_type`, typically taken from an element descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::CannotDecodeMaster`] for [`ElementType::Master`] - use [`Self::enter_container()`] instead.
    ///
    pub fn read_value(&mut self, element_type: ElementType) -> Result<ElementValue, ReaderError> {
        match element_type {
            ElementType::UnsignedInt => Ok(ElementValue::UnsignedInt(self.read_uint()?)),
            ElementType::Integer => Ok(ElementValue::Integer(self.read_int()?)),
            ElementType::Utf8 => Ok(ElementValue::Utf8(self.read_utf()?)),
            ElementType::Binary => Ok(ElementValue::Binary(self.read_binary()?)),
            ElementType::Float => Ok(ElementValue::Float(self.read_float()?)),
            ElementType::Date => Ok(ElementValue::Date(self.read_date()?)),
            ElementType::Master => Err(ReaderError::CannotDecodeMaster {
                element_id: self.current.map(|h| h.id.encoded()).unwrap_or_default(),
            }),
        }
    }
}
