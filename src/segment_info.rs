//!
//! Rewrites the Info element of an existing Matroska file in place.
//!
//! Matroska muxers usually leave a Void element next to Info so that metadata can be edited later.  Instead of
//! rewriting the whole file, [`SegmentInfoUpdater`] re-encodes Info and lets it grow into (or shrink back into) the
//! adjacent Void, so that no byte outside the Info + Void region ever moves.
//!

use std::io::{Read, Seek, SeekFrom, Write};
use std::ops::Range;
use std::time::Duration;

use log::{debug, info};

use super::element_reader::{ElementHeader, ElementReader};
use super::element_writer::ElementWriter;
use super::specs::{matroska, standard};
use super::vint::{self, VInt};
use super::errors::segment_info::UpdaterError;

///
/// Byte range and size field width of a Void element found next to Info.
///
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Filler {
    pub start: u64,
    pub end: u64,
    pub size_width: usize,
}

impl Filler {
    fn from_header(header: &ElementHeader) -> Self {
        Filler {
            start: header.position,
            end: header.data_end(),
            size_width: header.size_field.length(),
        }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

enum InfoField {
    Title,
    WritingApp,
    MuxingApp,
    Duration,
    Other(VInt, Vec<u8>),
}

///
/// Reads the segment information (title, writing and muxing applications, duration) of a Matroska stream and writes
/// changes back into the same stream.
///
/// The first top-level Segment and its first Info child are used.  Children of Info that aren't exposed here
/// (SegmentUID, DateUTC, TimecodeScale, ...) are kept as-is and in their original order.
///
/// [`Self::write()`] overwrites Info in place when its encoded length is unchanged.  Otherwise Info is written at the
/// start of the region formed by Info and the Void element(s) directly before and after it, and a single Void covers
/// whatever is left of that region.  If the region is too small, nothing is written and
/// [`UpdaterError::InsufficientSpace`] is returned.
///
/// A CRC-32 child of Info is recomputed over the rewritten children and written as the first child, where EBML
/// requires it.
///
/// The rewrite is not atomic: an I/O failure between the Info and Void writes leaves the Void header stale.  Work on a
/// copy if that matters.
///
/// ## Example
///
/// ```
/// use std::io::Cursor;
/// use ebml_editable::{ElementWriter, SegmentInfoUpdater};
/// use ebml_editable::specs::{matroska, standard};
/// use ebml_editable::vint::VInt;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut stream = Cursor::new(Vec::new());
/// {
///     let mut writer = ElementWriter::new(&mut stream);
///     let mut segment = writer.start_master_element(VInt::from_encoded(matroska::SEGMENT.id)?)?;
///     {
///         let mut info = segment.start_master_element(VInt::from_encoded(matroska::INFO.id)?)?;
///         info.write_utf(VInt::from_encoded(matroska::TITLE.id)?, "draft")?;
///         info.finish()?;
///     }
///     segment.write_binary(VInt::from_encoded(standard::VOID.id)?, &[0; 64])?;
///     segment.finish()?;
/// }
/// let length = stream.get_ref().len();
///
/// stream.set_position(0);
/// let mut updater = SegmentInfoUpdater::open(&mut stream)?;
/// assert_eq!("draft", updater.title());
/// updater.set_title("A considerably longer final title");
/// updater.write()?;
///
/// assert_eq!(length, stream.get_ref().len());
/// stream.set_position(0);
/// assert_eq!("A considerably longer final title", SegmentInfoUpdater::open(&mut stream)?.title());
/// # Ok(())
/// # }
/// ```
///
pub struct SegmentInfoUpdater<S: Read + Write + Seek> {
    stream: S,
    segment: Range<u64>,
    info: Range<u64>,
    info_size_width: usize,
    leading_filler: Option<Filler>,
    trailing_filler: Option<Filler>,

    fields: Vec<InfoField>,
    title: Option<String>,
    writing_app: Option<String>,
    muxing_app: Option<String>,
    duration: Option<f64>,
    duration_width: usize,
    timecode_scale: u64,
    has_crc: bool,
}

struct ParsedInfo {
    fields: Vec<InfoField>,
    title: Option<String>,
    writing_app: Option<String>,
    muxing_app: Option<String>,
    duration: Option<f64>,
    duration_width: usize,
    timecode_scale: Option<u64>,
    has_crc: bool,
}

fn is_id(reader_id: Option<VInt>, id: u64) -> bool {
    matches!(reader_id, Some(found) if found.encoded() == id)
}

fn read_info<R: Read + Seek>(reader: &mut ElementReader<R>) -> Result<ParsedInfo, UpdaterError> {
    let mut parsed = ParsedInfo {
        fields: Vec::new(),
        title: None,
        writing_app: None,
        muxing_app: None,
        duration: None,
        duration_width: 8,
        timecode_scale: None,
        has_crc: false,
    };

    reader.enter_container()?;
    while reader.read_next()? {
        let id = match reader.element_id() {
            Some(id) => id,
            None => break,
        };
        let encoded = id.encoded();

        if encoded == matroska::TITLE.id && parsed.title.is_none() {
            parsed.title = Some(reader.read_utf()?);
            parsed.fields.push(InfoField::Title);
        } else if encoded == matroska::WRITING_APP.id && parsed.writing_app.is_none() {
            parsed.writing_app = Some(reader.read_utf()?);
            parsed.fields.push(InfoField::WritingApp);
        } else if encoded == matroska::MUXING_APP.id && parsed.muxing_app.is_none() {
            parsed.muxing_app = Some(reader.read_utf()?);
            parsed.fields.push(InfoField::MuxingApp);
        } else if encoded == matroska::DURATION.id && parsed.duration.is_none() {
            parsed.duration_width = reader.element_size().unwrap_or(8) as usize;
            parsed.duration = Some(reader.read_float()?);
            parsed.fields.push(InfoField::Duration);
        } else if encoded == standard::CRC32.id {
            // recomputed on write
            parsed.has_crc = true;
        } else {
            if encoded == matroska::TIMECODE_SCALE.id && parsed.timecode_scale.is_none() {
                parsed.timecode_scale = Some(reader.read_uint()?);
            }
            parsed.fields.push(InfoField::Other(id, reader.read_binary()?));
        }
    }
    reader.leave_container()?;

    Ok(parsed)
}

///
/// Encodes a Void element header covering exactly `total` bytes, preferring a size field of `preferred_width`.
///
fn void_header(total: u64, preferred_width: Option<usize>) -> Option<Vec<u8>> {
    let id = VInt::from_encoded(standard::VOID.id).ok()?;
    for width in preferred_width.into_iter().chain(1..=vint::MAX_LENGTH) {
        let header_len = (id.length() + width) as u64;
        if total < header_len {
            continue;
        }
        if let Ok(size) = VInt::encode_size_with_length(total - header_len, width) {
            let mut header = id.to_bytes();
            header.extend_from_slice(&size.to_bytes());
            return Some(header);
        }
    }
    None
}

impl<S: Read + Write + Seek> SegmentInfoUpdater<S> {

    ///
    /// Locates the first Segment in `stream` (starting at its current position), then the Info element among the
    /// Segment's children, and decodes it.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::SegmentNotFound`] or [`UpdaterError::InfoNotFound`] if either element is missing, and
    /// [`UpdaterError::UnknownSizeInfo`] if Info doesn't declare its size.
    ///
    pub fn open(mut stream: S) -> Result<Self, UpdaterError> {
        let mut reader = ElementReader::new(&mut stream);

        if !reader.locate_element(matroska::SEGMENT.id)? {
            return Err(UpdaterError::SegmentNotFound);
        }
        let segment = *reader.header().ok_or(UpdaterError::SegmentNotFound)?;
        reader.enter_container()?;

        let mut previous_filler = None;
        let mut found = None;
        while reader.read_next()? {
            let header = *reader.header().ok_or(UpdaterError::InfoNotFound)?;

            if is_id(Some(header.id), standard::VOID.id) {
                previous_filler = Some(Filler::from_header(&header));
                continue;
            }

            if is_id(Some(header.id), matroska::INFO.id) {
                if !header.size().is_known() {
                    return Err(UpdaterError::UnknownSizeInfo);
                }
                let parsed = read_info(&mut reader)?;
                let next_filler = if reader.read_next()? && is_id(reader.element_id(), standard::VOID.id) {
                    reader.header().map(Filler::from_header)
                } else {
                    None
                };
                found = Some((header, previous_filler, parsed, next_filler));
                break;
            }

            previous_filler = None;
        }

        let (info, leading_filler, parsed, trailing_filler) = found.ok_or(UpdaterError::InfoNotFound)?;
        debug!(
            "found Info at {}..{} (leading filler: {:?}, trailing filler: {:?})",
            info.position, info.data_end(), leading_filler, trailing_filler
        );

        let timecode_scale = match parsed.timecode_scale {
            Some(scale) if scale > 0 => scale,
            _ => matroska::DEFAULT_TIMECODE_SCALE,
        };

        Ok(SegmentInfoUpdater {
            stream,
            segment: segment.position..segment.data_end(),
            info: info.position..info.data_end(),
            info_size_width: info.size_field.length(),
            leading_filler,
            trailing_filler,
            fields: parsed.fields,
            title: parsed.title,
            writing_app: parsed.writing_app,
            muxing_app: parsed.muxing_app,
            duration: parsed.duration,
            duration_width: parsed.duration_width,
            timecode_scale,
            has_crc: parsed.has_crc,
        })
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn writing_app(&self) -> &str {
        self.writing_app.as_deref().unwrap_or_default()
    }

    pub fn set_writing_app(&mut self, writing_app: impl Into<String>) {
        self.writing_app = Some(writing_app.into());
    }

    pub fn muxing_app(&self) -> &str {
        self.muxing_app.as_deref().unwrap_or_default()
    }

    pub fn set_muxing_app(&mut self, muxing_app: impl Into<String>) {
        self.muxing_app = Some(muxing_app.into());
    }

    ///
    /// The segment duration.  Zero if Info has no (or a negative / non-finite) Duration.
    ///
    pub fn duration(&self) -> Duration {
        let nanos = self.duration.unwrap_or(0.0) * self.timecode_scale as f64;
        if nanos.is_finite() && nanos > 0.0 {
            Duration::from_nanos(nanos.round() as u64)
        } else {
            Duration::ZERO
        }
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = Some(duration.as_nanos() as f64 / self.timecode_scale as f64);
    }

    ///
    /// The Duration value as stored, in units of [`Self::timecode_scale()`] nanoseconds.
    ///
    pub fn raw_duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn set_raw_duration(&mut self, duration: f64) {
        self.duration = Some(duration);
    }

    pub fn timecode_scale(&self) -> u64 {
        self.timecode_scale
    }

    /// Byte range of the Segment, header included.
    pub fn segment_range(&self) -> Range<u64> {
        self.segment.clone()
    }

    /// Byte range of the Info element, header included.
    pub fn info_range(&self) -> Range<u64> {
        self.info.clone()
    }

    pub fn leading_filler(&self) -> Option<Filler> {
        self.leading_filler
    }

    pub fn trailing_filler(&self) -> Option<Filler> {
        self.trailing_filler
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    fn write_duration<W: Write>(&self, writer: &mut ElementWriter<W>, id: VInt, duration: f64) -> Result<(), UpdaterError> {
        let narrow = duration as f32;
        if self.duration_width == 4 && (narrow as f64 == duration || duration.is_nan()) {
            writer.write_f32(id, narrow)?;
        } else {
            writer.write_f64(id, duration)?;
        }
        Ok(())
    }

    fn encode_info_payload(&self) -> Result<Vec<u8>, UpdaterError> {
        let title_id = VInt::from_encoded(matroska::TITLE.id)?;
        let writing_app_id = VInt::from_encoded(matroska::WRITING_APP.id)?;
        let muxing_app_id = VInt::from_encoded(matroska::MUXING_APP.id)?;
        let duration_id = VInt::from_encoded(matroska::DURATION.id)?;

        let mut writer = ElementWriter::new(Vec::new());
        let (mut title_written, mut writing_app_written, mut muxing_app_written, mut duration_written) = (false, false, false, false);

        for field in self.fields.iter() {
            match field {
                InfoField::Title => if let Some(title) = &self.title {
                    writer.write_utf(title_id, title)?;
                    title_written = true;
                },
                InfoField::WritingApp => if let Some(app) = &self.writing_app {
                    writer.write_utf(writing_app_id, app)?;
                    writing_app_written = true;
                },
                InfoField::MuxingApp => if let Some(app) = &self.muxing_app {
                    writer.write_utf(muxing_app_id, app)?;
                    muxing_app_written = true;
                },
                InfoField::Duration => if let Some(duration) = self.duration {
                    self.write_duration(&mut writer, duration_id, duration)?;
                    duration_written = true;
                },
                InfoField::Other(id, data) => writer.write_binary(*id, data)?,
            }
        }

        // Fields that were absent when the stream was opened go after everything else
        if let (Some(title), false) = (&self.title, title_written) {
            writer.write_utf(title_id, title)?;
        }
        if let (Some(app), false) = (&self.writing_app, writing_app_written) {
            writer.write_utf(writing_app_id, app)?;
        }
        if let (Some(app), false) = (&self.muxing_app, muxing_app_written) {
            writer.write_utf(muxing_app_id, app)?;
        }
        if let (Some(duration), false) = (self.duration, duration_written) {
            self.write_duration(&mut writer, duration_id, duration)?;
        }

        let children = writer.into_inner();
        if !self.has_crc {
            return Ok(children);
        }

        let mut writer = ElementWriter::new(Vec::with_capacity(children.len() + 6));
        writer.write_binary(VInt::from_encoded(standard::CRC32.id)?, &crc32fast::hash(&children).to_le_bytes())?;
        let mut payload = writer.into_inner();
        payload.extend_from_slice(&children);
        Ok(payload)
    }

    fn encode_info_element(payload: &[u8], size_width: usize) -> Option<Vec<u8>> {
        let id = VInt::from_encoded(matroska::INFO.id).ok()?;
        let size = VInt::encode_size_with_length(payload.len() as u64, size_width).ok()?;

        let mut element = id.to_bytes();
        element.extend_from_slice(&size.to_bytes());
        element.extend_from_slice(payload);
        Some(element)
    }

    ///
    /// Re-encodes Info and writes it back into the stream, reusing adjacent Void space as needed.
    ///
    /// Every byte to be written is computed before the stream is touched.  On success the recorded ranges are updated
    /// to the new layout, so the updater can be modified and written again.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::InsufficientSpace`] if the new Info can't fit in the region formed by the old Info and
    /// its adjacent Void elements.  The stream is unchanged in that case.
    ///
    pub fn write(&mut self) -> Result<(), UpdaterError> {
        let payload = self.encode_info_payload()?;
        let old_len = self.info.end - self.info.start;

        if let Some(element) = Self::encode_info_element(&payload, self.info_size_width) {
            if element.len() as u64 == old_len {
                info!("rewriting Info in place at {}", self.info.start);
                let start = self.info.start;
                return self.apply(&[(start, element)]);
            }
        }

        let region_start = self.leading_filler.map(|f| f.start).unwrap_or(self.info.start);
        let region_end = self.trailing_filler.map(|f| f.end).unwrap_or(self.info.end);
        let available = region_end - region_start;

        // A leftover byte is too small to hold a Void, so the size field width is varied until none remains
        let preferred_width = self.trailing_filler.or(self.leading_filler).map(|f| f.size_width);
        let widths = std::iter::once(self.info_size_width).chain(1..=vint::MAX_LENGTH);
        let (element, width, void) = widths
            .filter_map(|width| {
                let element = Self::encode_info_element(&payload, width)?;
                let remainder = available.checked_sub(element.len() as u64)?;
                let void = match remainder {
                    0 => None,
                    _ => Some(void_header(remainder, preferred_width)?),
                };
                Some((element, width, void))
            })
            .next()
            .ok_or_else(|| UpdaterError::InsufficientSpace {
                required: (1..=vint::MAX_LENGTH)
                    .filter_map(|width| Self::encode_info_element(&payload, width))
                    .map(|element| element.len() as u64)
                    .min()
                    .unwrap_or(u64::MAX),
                available,
            })?;

        let info_end = region_start + element.len() as u64;
        let mut patches = vec![(region_start, element)];
        let filler = void.map(|header| {
            let filler = Filler { start: info_end, end: region_end, size_width: header.len() - 1 };
            patches.push((info_end, header));
            filler
        });

        info!(
            "moving Info from {}..{} to {}..{} (filler: {:?})",
            self.info.start, self.info.end, region_start, info_end, filler
        );
        self.apply(&patches)?;

        self.info = region_start..info_end;
        self.info_size_width = width;
        self.leading_filler = None;
        self.trailing_filler = filler;
        Ok(())
    }

    fn apply(&mut self, patches: &[(u64, Vec<u8>)]) -> Result<(), UpdaterError> {
        for (position, bytes) in patches {
            self.stream.seek(SeekFrom::Start(*position))?;
            self.stream.write_all(bytes)?;
        }
        self.stream.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_header_covers_exact_length() {
        assert_eq!(Some(vec![0xEC, 0x80]), void_header(2, None));
        assert_eq!(Some(vec![0xEC, 0x40, 0x02]), void_header(5, Some(2)));
        assert_eq!(Some(vec![0xEC, 0xFE]), void_header(128, None));
        // 129 bytes would need a payload of 127 in a single byte size, which is the reserved pattern
        assert_eq!(Some(vec![0xEC, 0x40, 0x7E]), void_header(129, None));
        assert_eq!(None, void_header(1, None));
        assert_eq!(None, void_header(0, None));
    }

    #[test]
    fn filler_length() {
        let filler = Filler { start: 10, end: 1013, size_width: 2 };
        assert_eq!(1003, filler.len());
        assert!(!filler.is_empty());
    }
}
