mod test_files;

pub mod write_read_tests {
    use std::io::Cursor;

    use chrono::{Duration, TimeZone, Utc};
    use ebml_editable::specs::{get_descriptor, matroska, standard};
    use ebml_editable::tools::ebml_epoch;
    use ebml_editable::vint::VInt;
    use ebml_editable::{ElementReader, ElementValue, ElementWriter};

    use super::test_files::id;

    fn written(write: impl FnOnce(&mut ElementWriter<&mut Cursor<Vec<u8>>>)) -> Cursor<Vec<u8>> {
        let mut dest = Cursor::new(Vec::new());
        {
            let mut writer = ElementWriter::new(&mut dest);
            write(&mut writer);
        }
        dest.set_position(0);
        dest
    }

    #[test]
    pub fn signed_integers() {
        let values = [0, 1, -1, 127, 128, -128, -129, 0x7FFF, i32::MIN as i64, i64::MAX, i64::MIN];
        let mut src = written(|writer| {
            for value in values.iter() {
                writer.write_signed(VInt::make_id(1).unwrap(), *value).unwrap();
            }
        });

        let mut reader = ElementReader::new(&mut src);
        for value in values.iter() {
            assert!(reader.read_next().unwrap());
            assert_eq!(*value, reader.read_int().unwrap());
        }
        assert!(!reader.read_next().unwrap());
    }

    #[test]
    pub fn unsigned_integers() {
        let values = [0, 1, 255, 256, 0xFFFF_FFFF, u64::MAX];
        let mut src = written(|writer| {
            for value in values.iter() {
                writer.write_unsigned(VInt::make_id(2).unwrap(), *value).unwrap();
            }
        });

        let mut reader = ElementReader::new(&mut src);
        for value in values.iter() {
            assert!(reader.read_next().unwrap());
            assert_eq!(*value, reader.read_uint().unwrap());
        }
        assert!(!reader.read_next().unwrap());
    }

    #[test]
    pub fn integers_are_minimal() {
        let src = written(|writer| {
            writer.write_unsigned(VInt::make_id(2).unwrap(), 0).unwrap();
            writer.write_signed(VInt::make_id(1).unwrap(), -1).unwrap();
            writer.write_unsigned(VInt::make_id(2).unwrap(), 0x100).unwrap();
        });
        assert_eq!(vec![0x82, 0x81, 0x00, 0x81, 0x81, 0xFF, 0x82, 0x82, 0x01, 0x00], src.into_inner());
    }

    #[test]
    pub fn floats() {
        let singles = [0.0f32, -1.5, f32::MIN, f32::MAX, f32::MIN_POSITIVE, f32::INFINITY, f32::NEG_INFINITY];
        let doubles = [0.0f64, 3.14159, f64::MIN, f64::MAX, f64::EPSILON, f64::INFINITY, f64::NEG_INFINITY];
        let mut src = written(|writer| {
            for value in singles.iter() {
                writer.write_f32(id(&matroska::DURATION), *value).unwrap();
            }
            for value in doubles.iter() {
                writer.write_f64(id(&matroska::DURATION), *value).unwrap();
            }
            writer.write_f32(id(&matroska::DURATION), f32::NAN).unwrap();
            writer.write_f64(id(&matroska::DURATION), f64::NAN).unwrap();
        });

        let mut reader = ElementReader::new(&mut src);
        for value in singles.iter() {
            assert!(reader.read_next().unwrap());
            assert_eq!(Some(4), reader.element_size());
            assert_eq!(*value as f64, reader.read_float().unwrap());
        }
        for value in doubles.iter() {
            assert!(reader.read_next().unwrap());
            assert_eq!(Some(8), reader.element_size());
            assert_eq!(*value, reader.read_float().unwrap());
        }
        assert!(reader.read_next().unwrap());
        assert!(reader.read_float().unwrap().is_nan());
        assert!(reader.read_next().unwrap());
        assert!(reader.read_float().unwrap().is_nan());
        assert!(!reader.read_next().unwrap());
    }

    #[test]
    pub fn dates() {
        let dates = [
            ebml_epoch(),
            Utc.with_ymd_and_hms(2001, 1, 1, 12, 10, 5).unwrap() + Duration::milliseconds(123),
            Utc.with_ymd_and_hms(2101, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(1812, 1, 1, 0, 0, 0).unwrap(),
            ebml_epoch() + Duration::nanoseconds(i64::MAX / 2),
            ebml_epoch() - Duration::nanoseconds(i64::MAX / 2),
        ];
        let mut src = written(|writer| {
            for date in dates.iter() {
                writer.write_date(id(&matroska::DATE_UTC), date).unwrap();
            }
        });

        let mut reader = ElementReader::new(&mut src);
        for date in dates.iter() {
            assert!(reader.read_next().unwrap());
            assert_eq!(Some(8), reader.element_size());
            assert_eq!(*date, reader.read_date().unwrap());
        }
        assert!(!reader.read_next().unwrap());
    }

    #[test]
    pub fn date_out_of_range() {
        let mut dest = Cursor::new(Vec::new());
        let mut writer = ElementWriter::new(&mut dest);
        let date = Utc.with_ymd_and_hms(2500, 1, 1, 0, 0, 0).unwrap();
        assert!(writer.write_date(id(&matroska::DATE_UTC), &date).is_err());
        assert!(dest.get_ref().is_empty());
    }

    #[test]
    pub fn strings() {
        let strings = ["", "ASCII", "Йцукенг12345Qwerty\u{1fa8}\u{263a}"];
        let mut src = written(|writer| {
            for s in strings.iter() {
                writer.write_utf(id(&matroska::TITLE), s).unwrap();
            }
        });

        let mut reader = ElementReader::new(&mut src);
        for s in strings.iter() {
            assert!(reader.read_next().unwrap());
            assert_eq!(Some(s.len() as u64), reader.element_size());
            assert_eq!(*s, reader.read_utf().unwrap());
        }
        assert!(!reader.read_next().unwrap());
    }

    #[test]
    pub fn values_by_descriptor() {
        let values = vec![
            (matroska::TIMECODE_SCALE.id, ElementValue::UnsignedInt(1_000_000)),
            (matroska::TITLE.id, ElementValue::Utf8(String::from("Name"))),
            (matroska::DURATION.id, ElementValue::Float(1234.5)),
            (matroska::DATE_UTC.id, ElementValue::Date(ebml_epoch() + Duration::days(365))),
            (standard::VOID.id, ElementValue::Binary(vec![0; 5])),
        ];
        let mut src = written(|writer| {
            for (element_id, value) in values.iter() {
                writer.write_value(VInt::from_encoded(*element_id).unwrap(), value).unwrap();
            }
        });

        let mut reader = ElementReader::new(&mut src);
        for (element_id, value) in values.iter() {
            assert!(reader.read_next().unwrap());
            let descriptor = get_descriptor(reader.element_id().unwrap().encoded()).unwrap();
            assert_eq!(*element_id, descriptor.id);
            assert_eq!(value.element_type(), descriptor.element_type);
            assert_eq!(*value, reader.read_value(descriptor.element_type).unwrap());
        }
    }

    #[test]
    pub fn masters_are_backpatched() {
        let mut src = written(|writer| {
            let mut segment = writer.start_master_element(id(&matroska::SEGMENT)).unwrap();
            {
                let mut info = segment.start_master_element(id(&matroska::INFO)).unwrap();
                info.write_utf(id(&matroska::TITLE), "Nested").unwrap();
                info.write_unsigned(id(&matroska::TIMECODE_SCALE), 1_000_000).unwrap();
                info.finish().unwrap();
            }
            {
                // dropped without finish()
                let mut tracks = segment.start_master_element(id(&matroska::TRACKS)).unwrap();
                tracks.write_binary(VInt::from_encoded(0xAE).unwrap(), &[1, 2, 3]).unwrap();
            }
            segment.finish().unwrap();
            writer.write_unsigned(VInt::make_id(2).unwrap(), 9).unwrap();
        });

        let mut reader = ElementReader::new(&mut src);
        assert!(reader.read_next().unwrap());
        assert_eq!(matroska::SEGMENT.id, reader.element_id().unwrap().encoded());
        assert!(!reader.is_unknown_size());
        assert_eq!(8, reader.header().unwrap().size_field.length());
        reader.enter_container().unwrap();

        assert!(reader.read_next().unwrap());
        assert_eq!(matroska::INFO.id, reader.element_id().unwrap().encoded());
        assert_eq!(Some(9 + 7), reader.element_size());
        reader.enter_container().unwrap();
        assert_eq!(2, reader.depth());
        assert!(reader.read_next().unwrap());
        assert_eq!("Nested", reader.read_utf().unwrap());
        assert!(reader.read_next().unwrap());
        assert_eq!(1_000_000, reader.read_uint().unwrap());
        assert!(!reader.read_next().unwrap());
        reader.leave_container().unwrap();

        assert!(reader.read_next().unwrap());
        assert_eq!(matroska::TRACKS.id, reader.element_id().unwrap().encoded());
        assert_eq!(Some(5), reader.element_size());
        assert!(!reader.read_next().unwrap());
        reader.leave_container().unwrap();

        assert!(reader.read_next().unwrap());
        assert_eq!(9, reader.read_uint().unwrap());
        assert!(!reader.read_next().unwrap());
    }

    #[test]
    pub fn leave_container_skips_unread_children() {
        let mut src = written(|writer| {
            let mut segment = writer.start_master_element(id(&matroska::SEGMENT)).unwrap();
            for i in 0..10 {
                segment.write_unsigned(VInt::make_id(2).unwrap(), i).unwrap();
            }
            segment.finish().unwrap();
            writer.write_utf(id(&matroska::TITLE), "after").unwrap();
        });

        let mut reader = ElementReader::new(&mut src);
        assert!(reader.read_next().unwrap());
        let segment_end = reader.element_end().unwrap();
        reader.enter_container().unwrap();
        assert!(reader.read_next().unwrap());
        assert_eq!(0, reader.read_uint().unwrap());
        reader.leave_container().unwrap();

        assert_eq!(segment_end, reader.position().unwrap());
        assert_eq!(0, reader.depth());
        assert!(reader.read_next().unwrap());
        assert_eq!("after", reader.read_utf().unwrap());
    }

    #[test]
    pub fn narrow_master_size_width() {
        let mut dest = Cursor::new(Vec::new());
        {
            let mut writer = ElementWriter::with_master_size_width(&mut dest, 1).unwrap();
            let mut info = writer.start_master_element(id(&matroska::INFO)).unwrap();
            info.write_utf(id(&matroska::TITLE), "T").unwrap();
            info.finish().unwrap();
        }
        assert_eq!(vec![0x15, 0x49, 0xA9, 0x66, 0x84, 0x7B, 0xA9, 0x81, b'T'], dest.into_inner());

        assert!(ElementWriter::with_master_size_width(Cursor::new(Vec::new()), 0).is_err());
        assert!(ElementWriter::with_master_size_width(Cursor::new(Vec::new()), 9).is_err());
    }

    #[test]
    pub fn master_outgrowing_its_size_width() {
        let mut dest = Cursor::new(Vec::new());
        let mut writer = ElementWriter::with_master_size_width(&mut dest, 1).unwrap();
        let mut info = writer.start_master_element(id(&matroska::INFO)).unwrap();
        info.write_binary(id(&standard::VOID), &[0; 200]).unwrap();
        assert!(info.finish().is_err());
    }

    #[test]
    pub fn rejects_invalid_identifiers() {
        let mut dest = Cursor::new(Vec::new());
        let mut writer = ElementWriter::new(&mut dest);
        assert!(writer.write_unsigned(VInt::from_encoded(0x4001).unwrap(), 1).is_err());
        assert!(writer.write_unsigned(VInt::from_encoded(0xFF).unwrap(), 1).is_err());
        assert!(writer.start_master_element(VInt::from_encoded(0x7FFF).unwrap()).is_err());
        assert!(dest.get_ref().is_empty());
    }
}
