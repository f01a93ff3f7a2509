//! Tests of the filesystem entry point.

use std::io::Write;

use minidicom_core::{DataSet, Tag};
use minidicom_parser::read::Error;
use minidicom_parser::{DicomReader, FullReadHandler};

#[test]
fn read_file_goes_through_the_whole_protocol() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let mut bytes = vec![0u8; 128];
    bytes.extend_from_slice(b"DICM");
    // (0008,0060) CS "CT"
    bytes.extend_from_slice(&[0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'C', b'T']);
    // (0028,0010) US 512
    bytes.extend_from_slice(&[0x28, 0x00, 0x10, 0x00, b'U', b'S', 0x02, 0x00, 0x00, 0x02]);
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();

    let mut root = DataSet::default();
    {
        let mut reader = DicomReader::new(FullReadHandler::new(&mut root));
        reader.read_file(file.path()).unwrap();
    }

    assert_eq!(root.len(), 2);
    assert_eq!(root.string_of(Tag(0x0008, 0x0060)), Some("CT"));
    assert_eq!(root.u16_of(Tag(0x0028, 0x0010)), Some(512));
}

#[test]
fn read_file_reports_open_failures() {
    let mut root = DataSet::default();
    let mut reader = DicomReader::new(FullReadHandler::new(&mut root));
    let outcome = reader.read_file("/no/such/file.dcm");
    assert!(matches!(outcome, Err(Error::OpenFile { .. })));
}
