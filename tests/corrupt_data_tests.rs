mod test_files;

pub mod corrupt_data_tests {
    use std::io::Cursor;

    use ebml_editable::error::element_reader::ReaderError;
    use ebml_editable::error::segment_info::UpdaterError;
    use ebml_editable::{AllowableErrors, ElementReader, SegmentInfoUpdater};

    use super::test_files::SampleFile;

    fn get_data_with_invalid_ids() -> Cursor<Vec<u8>> {
        // Segment holding a valid child, a non-minimal id (0x4001) and another valid child
        Cursor::new(vec![
            0x18, 0x53, 0x80, 0x67, 0x8A,
            0x83, 0x81, 0x01,
            0x40, 0x01, 0x81, 0x01,
            0x84, 0x81, 0x02,
        ])
    }

    #[test]
    pub fn error_on_invalid_ids() {
        let mut reader = ElementReader::new(get_data_with_invalid_ids());
        assert!(reader.read_next().unwrap());
        reader.enter_container().unwrap();
        assert!(reader.read_next().unwrap());
        assert!(matches!(reader.read_next(), Err(ReaderError::InvalidIdentifier { id: 0x4001, position: 8 })));
    }

    #[test]
    pub fn allow_invalid_ids() {
        let mut reader = ElementReader::new(get_data_with_invalid_ids());
        reader.allow_errors(&[AllowableErrors::InvalidIdentifiers]);
        assert!(reader.read_next().unwrap());
        reader.enter_container().unwrap();

        let mut ids = Vec::new();
        while reader.read_next().unwrap() {
            ids.push(reader.element_id().unwrap().encoded());
        }
        assert_eq!(vec![0x83, 0x4001, 0x84], ids);
    }

    #[test]
    pub fn truncated_payload() {
        let mut reader = ElementReader::new(Cursor::new(vec![0x7B, 0xA9, 0x88, b'a', b'b']));
        assert!(reader.read_next().unwrap());
        assert!(matches!(reader.read_utf(), Err(ReaderError::UnexpectedEndOfStream { position: _ })));
    }

    #[test]
    pub fn truncated_size() {
        let mut reader = ElementReader::new(Cursor::new(vec![0x7B, 0xA9, 0x40]));
        assert!(matches!(reader.read_next(), Err(ReaderError::UnexpectedEndOfStream { position: 2 })));
    }

    #[test]
    pub fn corrupt_segment_is_reported() {
        let mut data = SampleFile::default().build().into_inner();
        let segment_start = data.windows(4).position(|w| w == [0x18, 0x53, 0x80, 0x67]).unwrap();
        // zero the first byte of the first Segment child
        data[segment_start + 12] = 0x00;

        let result = SegmentInfoUpdater::open(Cursor::new(data));
        assert!(matches!(result, Err(UpdaterError::Reader(ReaderError::InvalidVInt { position: _, source: _ }))));
    }

    #[test]
    pub fn unknown_size_info_is_rejected() {
        let data = vec![
            0x18, 0x53, 0x80, 0x67, 0xFF,
            0x15, 0x49, 0xA9, 0x66, 0xFF,
            0x7B, 0xA9, 0x81, b'T',
        ];
        let result = SegmentInfoUpdater::open(Cursor::new(data));
        assert!(matches!(result, Err(UpdaterError::UnknownSizeInfo)));
    }
}
