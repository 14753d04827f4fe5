use std::io::Cursor;

use ebml_editable::specs::{matroska, standard, ElementDescriptor};
use ebml_editable::vint::VInt;
use ebml_editable::{ElementReader, ElementWriter};

pub fn id(descriptor: &ElementDescriptor) -> VInt {
    VInt::from_encoded(descriptor.id).expect("catalog ids are valid")
}

///
/// Describes a small Matroska file: an EBML header followed by a Segment holding Info, optional Void elements around
/// it, Tracks and a Cluster.
///
pub struct SampleFile {
    pub void_before: Option<usize>,
    pub void_after: Option<usize>,
    pub title: Option<&'static str>,
    pub duration: Option<f64>,
    pub timecode_scale: u64,
}

impl Default for SampleFile {
    fn default() -> Self {
        SampleFile {
            void_before: None,
            void_after: Some(100),
            title: Some("Title"),
            duration: Some(4321.0),
            timecode_scale: matroska::DEFAULT_TIMECODE_SCALE,
        }
    }
}

pub const SEGMENT_UID: [u8; 16] = [0x5A; 16];

impl SampleFile {
    pub fn build(&self) -> Cursor<Vec<u8>> {
        let mut dest = Cursor::new(Vec::new());
        let mut writer = ElementWriter::new(&mut dest);

        {
            let mut ebml = writer.start_master_element(id(&standard::EBML)).unwrap();
            ebml.write_unsigned(id(&standard::EBML_VERSION), 1).unwrap();
            ebml.write_utf(id(&standard::DOC_TYPE), "matroska").unwrap();
            ebml.finish().unwrap();
        }

        {
            let mut segment = writer.start_master_element(id(&matroska::SEGMENT)).unwrap();
            if let Some(size) = self.void_before {
                segment.write_binary(id(&standard::VOID), &vec![0; size]).unwrap();
            }

            {
                let mut info = segment.start_master_element(id(&matroska::INFO)).unwrap();
                info.write_binary(id(&matroska::SEGMENT_UID), &SEGMENT_UID).unwrap();
                info.write_unsigned(id(&matroska::TIMECODE_SCALE), self.timecode_scale).unwrap();
                info.write_utf(id(&matroska::MUXING_APP), "libebml").unwrap();
                info.write_utf(id(&matroska::WRITING_APP), "mkvmerge").unwrap();
                if let Some(title) = self.title {
                    info.write_utf(id(&matroska::TITLE), title).unwrap();
                }
                if let Some(duration) = self.duration {
                    info.write_f64(id(&matroska::DURATION), duration).unwrap();
                }
                info.finish().unwrap();
            }

            if let Some(size) = self.void_after {
                segment.write_binary(id(&standard::VOID), &vec![0; size]).unwrap();
            }

            {
                let mut tracks = segment.start_master_element(id(&matroska::TRACKS)).unwrap();
                tracks.write_binary(VInt::from_encoded(0xAE).unwrap(), &[0xD7, 0x81, 0x01]).unwrap();
                tracks.finish().unwrap();
            }
            segment.write_binary(id(&matroska::CLUSTER), &[0xE7, 0x81, 0x00, 0xA3, 0x84, 0x81, 0x00, 0x00, 0x80]).unwrap();
            segment.finish().unwrap();
        }

        dest.set_position(0);
        dest
    }
}

///
/// Lists the encoded id and byte range of every child of the first Segment, failing if the tree can't be walked.
///
pub fn segment_children(data: &[u8]) -> Vec<(u64, u64, u64)> {
    let mut reader = ElementReader::new(Cursor::new(data));
    assert!(reader.locate_element(matroska::SEGMENT.id).unwrap());
    reader.enter_container().unwrap();

    let mut children = Vec::new();
    while reader.read_next().unwrap() {
        let header = *reader.header().unwrap();
        children.push((header.id.encoded(), header.position, header.data_end()));
    }
    reader.leave_container().unwrap();
    assert!(!reader.read_next().unwrap());
    children
}
