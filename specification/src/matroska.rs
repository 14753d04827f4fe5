use super::{ElementDescriptor, ElementType};

pub const SEGMENT: ElementDescriptor = ElementDescriptor::new("Segment", 0x18538067, ElementType::Master);
pub const SEEK_HEAD: ElementDescriptor = ElementDescriptor::new("SeekHead", 0x114D9B74, ElementType::Master);
pub const INFO: ElementDescriptor = ElementDescriptor::new("Info", 0x1549A966, ElementType::Master);
pub const TRACKS: ElementDescriptor = ElementDescriptor::new("Tracks", 0x1654AE6B, ElementType::Master);
pub const CLUSTER: ElementDescriptor = ElementDescriptor::new("Cluster", 0x1F43B675, ElementType::Master);
pub const CUES: ElementDescriptor = ElementDescriptor::new("Cues", 0x1C53BB6B, ElementType::Master);
pub const CHAPTERS: ElementDescriptor = ElementDescriptor::new("Chapters", 0x1043A770, ElementType::Master);
pub const ATTACHMENTS: ElementDescriptor = ElementDescriptor::new("Attachments", 0x1941A469, ElementType::Master);
pub const TAGS: ElementDescriptor = ElementDescriptor::new("Tags", 0x1254C367, ElementType::Master);

// Children of Info
pub const SEGMENT_UID: ElementDescriptor = ElementDescriptor::new("SegmentUID", 0x73A4, ElementType::Binary);
pub const SEGMENT_FILENAME: ElementDescriptor = ElementDescriptor::new("SegmentFilename", 0x7384, ElementType::Utf8);
pub const PREV_UID: ElementDescriptor = ElementDescriptor::new("PrevUID", 0x3CB923, ElementType::Binary);
pub const NEXT_UID: ElementDescriptor = ElementDescriptor::new("NextUID", 0x3EB923, ElementType::Binary);
pub const TIMECODE_SCALE: ElementDescriptor = ElementDescriptor::new("TimecodeScale", 0x2AD7B1, ElementType::UnsignedInt);
pub const DURATION: ElementDescriptor = ElementDescriptor::new("Duration", 0x4489, ElementType::Float);
pub const DATE_UTC: ElementDescriptor = ElementDescriptor::new("DateUTC", 0x4461, ElementType::Date);
pub const TITLE: ElementDescriptor = ElementDescriptor::new("Title", 0x7BA9, ElementType::Utf8);
pub const MUXING_APP: ElementDescriptor = ElementDescriptor::new("MuxingApp", 0x4D80, ElementType::Utf8);
pub const WRITING_APP: ElementDescriptor = ElementDescriptor::new("WritingApp", 0x5741, ElementType::Utf8);

/// Nanoseconds per Duration tick when an Info element carries no TimecodeScale.
pub const DEFAULT_TIMECODE_SCALE: u64 = 1_000_000;

pub const ALL: &[&ElementDescriptor] = &[
    &SEGMENT,
    &SEEK_HEAD,
    &INFO,
    &TRACKS,
    &CLUSTER,
    &CUES,
    &CHAPTERS,
    &ATTACHMENTS,
    &TAGS,
    &SEGMENT_UID,
    &SEGMENT_FILENAME,
    &PREV_UID,
    &NEXT_UID,
    &TIMECODE_SCALE,
    &DURATION,
    &DATE_UTC,
    &TITLE,
    &MUXING_APP,
    &WRITING_APP,
];
