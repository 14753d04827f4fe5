use std::io::{Seek, SeekFrom, Write};
use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use log::{debug, warn};

use super::tools;
use super::vint::{self, VInt};
use super::values::ElementValue;
use super::errors::element_writer::WriterError;

///
/// Width of the size field reserved for master elements unless configured otherwise.  Eight bytes can hold any size.
///
pub const DEFAULT_MASTER_SIZE_WIDTH: usize = vint::MAX_LENGTH;

///
/// Provides a tool to write EBML elements to a destination that implements [`std::io::Write`].
///
/// Every scalar element is appended with a single `write_all`: the identifier, the minimal size vint, then the
/// payload.  Master elements need a destination that also implements [`std::io::Seek`] - see
/// [`Self::start_master_element()`].
///
/// ## Example
///
/// ```
/// use std::io::Cursor;
/// use ebml_editable::ElementWriter;
/// use ebml_editable::vint::VInt;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut dest = Cursor::new(Vec::new());
/// let mut writer = ElementWriter::new(&mut dest);
/// {
///     let mut segment = writer.start_master_element(VInt::from_encoded(0x18538067)?)?;
///     segment.write_utf(VInt::from_encoded(0x7BA9)?, "title")?;
///     segment.finish()?;
/// }
/// // id, 8 byte size field, then the 8 byte title element
/// assert_eq!(4 + 8 + 8, dest.get_ref().len());
/// # Ok(())
/// # }
/// ```
///
pub struct ElementWriter<W: Write> {
    dest: W,
    master_size_width: usize,
}

impl<W: Write> ElementWriter<W> {
    pub fn new(dest: W) -> Self {
        ElementWriter {
            dest,
            master_size_width: DEFAULT_MASTER_SIZE_WIDTH,
        }
    }

    ///
    /// Returns a writer that reserves `width` bytes for the size of every master element it starts.
    ///
    /// # Errors
    ///
    /// Returns [`WriterError::InvalidSizeWidth`] unless `width` is between 1 and 8.
    ///
    pub fn with_master_size_width(dest: W, width: usize) -> Result<Self, WriterError> {
        if !(1..=vint::MAX_LENGTH).contains(&width) {
            return Err(WriterError::InvalidSizeWidth(width));
        }

        Ok(ElementWriter {
            dest,
            master_size_width: width,
        })
    }

    pub fn into_inner(self) -> W {
        self.dest
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.dest
    }

    fn write_element(&mut self, id: VInt, payload: &[u8]) -> Result<(), WriterError> {
        if !id.is_valid_identifier() {
            return Err(WriterError::InvalidIdentifier(id.encoded()));
        }
        let size = VInt::encode_size(payload.len() as u64).map_err(WriterError::TagSizeError)?;

        let mut buffer = Vec::with_capacity(id.length() + size.length() + payload.len());
        buffer.extend_from_slice(&id.to_bytes());
        buffer.extend_from_slice(&size.to_bytes());
        buffer.extend_from_slice(payload);

        self.dest.write_all(&buffer).map_err(|source| WriterError::WriteError { source })
    }

    pub fn write_unsigned(&mut self, id: VInt, data: u64) -> Result<(), WriterError> {
        self.write_element(id, &tools::u64_to_arr(data))
    }

    pub fn write_signed(&mut self, id: VInt, data: i64) -> Result<(), WriterError> {
        self.write_element(id, &tools::i64_to_arr(data))
    }

    pub fn write_f32(&mut self, id: VInt, data: f32) -> Result<(), WriterError> {
        self.write_element(id, &data.to_be_bytes())
    }

    pub fn write_f64(&mut self, id: VInt, data: f64) -> Result<(), WriterError> {
        self.write_element(id, &data.to_be_bytes())
    }

    pub fn write_utf(&mut self, id: VInt, data: &str) -> Result<(), WriterError> {
        self.write_element(id, data.as_bytes())
    }

    ///
    /// Writes a date as an 8 byte count of nanoseconds since 2001-01-01T00:00:00 UTC.
    ///
    /// # Errors
    ///
    /// Returns [`WriterError::DateOutOfRange`] if that count doesn't fit in an `i64` (roughly 292 years either side).
    ///
    pub fn write_date(&mut self, id: VInt, data: &DateTime<Utc>) -> Result<(), WriterError> {
        let nanos = tools::date_to_nanos(data).ok_or_else(|| WriterError::DateOutOfRange(format!("{:?}", data)))?;
        self.write_element(id, &nanos.to_be_bytes())
    }

    pub fn write_binary(&mut self, id: VInt, data: &[u8]) -> Result<(), WriterError> {
        self.write_element(id, data)
    }

    ///
    /// Writes a tagged value.  Floats are always written with 8 bytes.
    ///
    pub fn write_value(&mut self, id: VInt, value: &ElementValue) -> Result<(), WriterError> {
        match value {
            ElementValue::UnsignedInt(val) => self.write_unsigned(id, *val),
            ElementValue::Integer(val) => self.write_signed(id, *val),
            ElementValue::Utf8(val) => self.write_utf(id, val),
            ElementValue::Binary(val) => self.write_binary(id, val),
            ElementValue::Float(val) => self.write_f64(id, *val),
            ElementValue::Date(val) => self.write_date(id, val),
        }
    }
}

impl<W: Write + Seek> ElementWriter<W> {

    ///
    /// Starts a master element and returns a writer for its children.
    ///
    /// The final size isn't known yet, so a size field of the configured width is reserved (filled with the unknown
    /// size marker).  When the returned [`MasterElementWriter`] is finished or dropped, the number of bytes written
    /// through it is backpatched into that field at the same width and the destination is positioned after the
    /// element again.
    ///
    pub fn start_master_element(&mut self, id: VInt) -> Result<MasterElementWriter<'_, W>, WriterError> {
        if !id.is_valid_identifier() {
            return Err(WriterError::InvalidIdentifier(id.encoded()));
        }
        let width = self.master_size_width;
        let placeholder = VInt::unknown_size(width).map_err(WriterError::TagSizeError)?;

        let position = self.dest.stream_position().map_err(|source| WriterError::WriteError { source })?;
        let mut header = id.to_bytes();
        header.extend_from_slice(&placeholder.to_bytes());
        self.dest.write_all(&header).map_err(|source| WriterError::WriteError { source })?;

        let size_position = position + id.length() as u64;
        Ok(MasterElementWriter {
            writer: ElementWriter {
                dest: &mut self.dest,
                master_size_width: width,
            },
            id,
            size_position,
            data_start: size_position + width as u64,
            width,
            closed: false,
        })
    }
}

///
/// Writes the children of a master element started with [`ElementWriter::start_master_element()`].
///
/// Dereferences to an [`ElementWriter`] sharing the parent's destination, so children - including nested master
/// elements - are written with the usual methods.  Call [`Self::finish()`] to observe backpatching errors; otherwise
/// the size is backpatched on drop and failures are only logged.
///
pub struct MasterElementWriter<'a, W: Write + Seek> {
    writer: ElementWriter<&'a mut W>,
    id: VInt,
    size_position: u64,
    data_start: u64,
    width: usize,
    closed: bool,
}

impl<'a, W: Write + Seek> MasterElementWriter<'a, W> {

    ///
    /// Closes the element, writing its final size.
    ///
    /// # Errors
    ///
    /// Returns [`WriterError::TagSizeError`] if the payload grew too large for the reserved width, or
    /// [`WriterError::WriteError`] if the destination could not be repositioned.
    ///
    pub fn finish(mut self) -> Result<(), WriterError> {
        self.close()
    }

    fn close(&mut self) -> Result<(), WriterError> {
        self.closed = true;

        let dest = &mut self.writer.dest;
        let end = dest.stream_position().map_err(|source| WriterError::WriteError { source })?;
        let size = end.saturating_sub(self.data_start);
        let size_field = VInt::encode_size_with_length(size, self.width).map_err(WriterError::TagSizeError)?;

        dest.seek(SeekFrom::Start(self.size_position)).map_err(|source| WriterError::WriteError { source })?;
        dest.write_all(&size_field.to_bytes()).map_err(|source| WriterError::WriteError { source })?;
        dest.seek(SeekFrom::Start(end)).map_err(|source| WriterError::WriteError { source })?;

        debug!("closed master element 0x{:x} with {} payload bytes", self.id.encoded(), size);
        Ok(())
    }
}

impl<'a, W: Write + Seek> Deref for MasterElementWriter<'a, W> {
    type Target = ElementWriter<&'a mut W>;

    fn deref(&self) -> &Self::Target {
        &self.writer
    }
}

impl<'a, W: Write + Seek> DerefMut for MasterElementWriter<'a, W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.writer
    }
}

impl<'a, W: Write + Seek> Drop for MasterElementWriter<'a, W> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.close() {
                warn!("could not backpatch size of master element 0x{:x}: {}", self.id.encoded(), e);
            }
        }
    }
}
