//! End to end decoding tests over hand-crafted DICOM streams.

use std::io::Cursor;

use minidicom_core::{DataElement, DataSet, DataSetNode, Endianness, Tag, VR};
use minidicom_parser::read::Error;
use minidicom_parser::{DicomReader, FullReadHandler, ReadHandler, TagsReadHandler};

/// A 128-byte zeroed preamble plus the magic code.
fn preamble() -> Vec<u8> {
    let mut bytes = vec![0u8; 128];
    bytes.extend_from_slice(b"DICM");
    bytes
}

/// Frame an element in the explicit-VR little-endian short form.
fn explicit_le_short(group: u16, element: u16, vr: &[u8; 2], value: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&group.to_le_bytes());
    bytes.extend_from_slice(&element.to_le_bytes());
    bytes.extend_from_slice(vr);
    bytes.extend_from_slice(&(value.len() as u16).to_le_bytes());
    bytes.extend_from_slice(value);
    bytes
}

/// Frame an element header in the explicit-VR little-endian long form.
fn explicit_le_long(group: u16, element: u16, vr: &[u8; 2], length: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&group.to_le_bytes());
    bytes.extend_from_slice(&element.to_le_bytes());
    bytes.extend_from_slice(vr);
    bytes.extend_from_slice(&[0, 0]);
    bytes.extend_from_slice(&length.to_le_bytes());
    bytes
}

fn read_full(bytes: &[u8]) -> (DataSet, Result<(), Error>) {
    let mut root = DataSet::default();
    let outcome = {
        let mut reader = DicomReader::new(FullReadHandler::new(&mut root));
        reader.read_from(Cursor::new(bytes))
    };
    (root, outcome)
}

#[test]
fn minimal_explicit_le_file_with_preamble() {
    let mut bytes = preamble();
    bytes.extend(explicit_le_short(0x0008, 0x0005, b"CS", b"ISO_IR 100"));

    let (root, outcome) = read_full(&bytes);
    outcome.unwrap();

    assert_eq!(root.len(), 1);
    assert!(root.explicit_vr());
    assert_eq!(root.endianness(), Endianness::Little);
    let element = root.get(Tag(0x0008, 0x0005)).unwrap();
    assert_eq!(element.vr(), VR::CS);
    assert_eq!(element.length().get(), Some(10));
    assert_eq!(root.string_of(Tag(0x0008, 0x0005)), Some("ISO_IR 100"));
}

#[test]
fn headerless_implicit_file_falls_back_to_offset_zero() {
    // (0008,0000) UL, length 4, value 256: a bare group length element
    // in implicit VR, in a file much shorter than a preamble
    let bytes = [
        0x08u8, 0x00, 0x00, 0x00, // tag
        0x04, 0x00, 0x00, 0x00, // length
        0x00, 0x01, 0x00, 0x00, // value
    ];

    let (root, outcome) = read_full(&bytes);
    outcome.unwrap();

    assert!(!root.explicit_vr());
    assert_eq!(root.len(), 1);
    assert_eq!(root.u32_of(Tag(0x0008, 0x0000)), Some(256));
}

#[test]
fn big_endian_data_set_is_detected_after_the_meta_group() {
    // little-endian explicit meta group, then a big-endian data set
    let mut bytes = preamble();
    bytes.extend(explicit_le_short(
        0x0002,
        0x0010,
        b"UI",
        b"1.2.840.10008.1.2.2\0",
    ));
    // (0008,0005) CS "ISO_IR 100" in big-endian framing
    bytes.extend_from_slice(&[0x00, 0x08, 0x00, 0x05]);
    bytes.extend_from_slice(b"CS");
    bytes.extend_from_slice(&[0x00, 0x0A]);
    bytes.extend_from_slice(b"ISO_IR 100");

    let (root, outcome) = read_full(&bytes);
    outcome.unwrap();

    assert_eq!(root.endianness(), Endianness::Big);
    assert_eq!(root.len(), 2);
    assert_eq!(
        root.string_of(Tag(0x0002, 0x0010)),
        Some("1.2.840.10008.1.2.2")
    );
    let element = root.get(Tag(0x0008, 0x0005)).unwrap();
    assert_eq!(element.endianness(), Endianness::Big);
    assert_eq!(element.to_str(), Some("ISO_IR 100"));
}

#[test]
fn delimited_sequence_with_one_item() {
    let mut bytes = Vec::new();
    // (0040,0275) SQ with undefined length
    bytes.extend(explicit_le_long(0x0040, 0x0275, b"SQ", 0xFFFF_FFFF));
    // (FFFE,E000) item prefix with undefined length
    bytes.extend_from_slice(&[0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF]);
    // one element inside the item
    bytes.extend(explicit_le_short(0x0040, 0x1001, b"SH", b"B7"));
    // (FFFE,E00D) item delimiter
    bytes.extend_from_slice(&[0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00]);
    // (FFFE,E0DD) sequence delimiter
    bytes.extend_from_slice(&[0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00]);
    // and one trailing element after the sequence
    bytes.extend(explicit_le_short(0x0008, 0x0060, b"CS", b"MR"));

    let (root, outcome) = read_full(&bytes);
    outcome.unwrap();

    assert_eq!(root.len(), 2);
    let sequence = root.sequence(Tag(0x0040, 0x0275)).unwrap();
    assert!(sequence.length().is_undefined());
    assert!(sequence.explicit_vr());
    assert_eq!(sequence.string_of(Tag(0x0040, 0x1001)), Some("B7"));

    // the item scope is marked by its prefix and delimitation records
    match sequence.node_at(0) {
        Some(DataSetNode::Element(marker)) => {
            assert!(marker.tag().is_item());
            assert_eq!(marker.vr(), VR::Unknown);
            assert!(marker.length().is_undefined());
            assert!(marker.data().is_empty());
        }
        other => panic!("expected an item marker, got {:?}", other),
    }
    assert!(sequence
        .nodes()
        .iter()
        .any(|node| matches!(node, DataSetNode::Element(e) if e.tag().is_item_delimiter())));
    assert!(sequence
        .nodes()
        .iter()
        .any(|node| matches!(node, DataSetNode::Element(e) if e.tag().is_sequence_delimiter())));

    assert_eq!(root.string_of(Tag(0x0008, 0x0060)), Some("MR"));
}

#[test]
fn length_prefixed_sequence_ends_by_byte_budget() {
    let mut bytes = Vec::new();
    // item prefix (8) + framed element (14) = 22 bytes of sequence value
    bytes.extend(explicit_le_long(0x0008, 0x1110, b"SQ", 22));
    bytes.extend_from_slice(&[0xFE, 0xFF, 0x00, 0xE0, 0x0E, 0x00, 0x00, 0x00]);
    bytes.extend(explicit_le_short(0x0008, 0x1150, b"UI", b"1.len1"));
    // a sibling element which must not be swallowed by the sequence
    bytes.extend(explicit_le_short(0x0008, 0x0060, b"CS", b"CT"));

    let (root, outcome) = read_full(&bytes);
    outcome.unwrap();

    let sequence = root.sequence(Tag(0x0008, 0x1110)).unwrap();
    assert_eq!(sequence.length().get(), Some(22));
    assert_eq!(sequence.string_of(Tag(0x0008, 0x1150)), Some("1.len1"));
    assert_eq!(root.string_of(Tag(0x0008, 0x0060)), Some("CT"));
}

#[test]
fn tag_filter_retains_only_the_wanted_buffers() {
    let pixels = [0x10u8, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80];
    let mut bytes = preamble();
    bytes.extend(explicit_le_short(0x0008, 0x0060, b"CS", b"CT"));
    bytes.extend(explicit_le_short(0x0028, 0x0010, b"US", &[0x00, 0x02]));
    bytes.extend(explicit_le_short(0x0028, 0x0011, b"US", &[0x00, 0x01]));
    bytes.extend(explicit_le_long(0x7FE0, 0x0010, b"OW", pixels.len() as u32));
    bytes.extend_from_slice(&pixels);
    // the wanted set is exhausted before this one
    bytes.extend(explicit_le_short(0x0008, 0x0070, b"LO", b"ACME"));

    let mut root = DataSet::default();
    {
        let mut handler = TagsReadHandler::new(&mut root);
        handler
            .add_tag(Tag(0x7FE0, 0x0010))
            .add_tag(Tag(0x0028, 0x0010))
            .add_tag(Tag(0x0028, 0x0011));
        let mut reader = DicomReader::new(handler);
        reader.read_from(Cursor::new(&bytes)).unwrap();
        assert!(reader.handler().remaining().is_empty());
    }

    assert_eq!(root.len(), 3);
    assert!(root.get(Tag(0x0008, 0x0060)).is_none());
    assert!(root.get(Tag(0x0008, 0x0070)).is_none());
    assert_eq!(root.u16_of(Tag(0x0028, 0x0010)), Some(512));
    assert_eq!(root.u16_of(Tag(0x0028, 0x0011)), Some(256));
    assert_eq!(root.buffer_of(Tag(0x7FE0, 0x0010)), Some(&pixels[..]));
}

#[test]
fn zero_short_length_on_a_short_form_vr_has_no_length_continuation() {
    let mut bytes = Vec::new();
    bytes.extend(explicit_le_short(0x0008, 0x0060, b"CS", b""));
    bytes.extend(explicit_le_short(0x0008, 0x0070, b"LO", b"ACME"));

    let (root, outcome) = read_full(&bytes);
    outcome.unwrap();

    assert_eq!(root.len(), 2);
    assert_eq!(root.string_of(Tag(0x0008, 0x0060)), Some(""));
    assert_eq!(root.string_of(Tag(0x0008, 0x0070)), Some("ACME"));
}

#[test]
fn zero_short_length_on_a_long_form_vr_reads_the_long_length() {
    let mut bytes = Vec::new();
    bytes.extend(explicit_le_long(0x7FE0, 0x0010, b"OW", 0));
    bytes.extend(explicit_le_short(0x0008, 0x0060, b"CS", b"CT"));

    let (root, outcome) = read_full(&bytes);
    outcome.unwrap();

    assert_eq!(root.len(), 2);
    assert_eq!(root.buffer_of(Tag(0x7FE0, 0x0010)), Some(&[][..]));
    assert_eq!(root.string_of(Tag(0x0008, 0x0060)), Some("CT"));
}

#[test]
fn truncated_value_aborts_but_keeps_prior_elements() {
    let mut bytes = preamble();
    bytes.extend(explicit_le_short(0x0008, 0x0060, b"CS", b"CT"));
    // one million declared bytes, sixteen actual ones
    bytes.extend(explicit_le_long(0x7FE0, 0x0010, b"OW", 1_000_000));
    bytes.extend_from_slice(&[0u8; 16]);

    let (root, outcome) = read_full(&bytes);
    match outcome {
        Err(Error::ReadValueData { tag, length, .. }) => {
            assert_eq!(tag, Tag(0x7FE0, 0x0010));
            assert_eq!(length, 1_000_000);
        }
        other => panic!("expected a truncation error, got {:?}", other),
    }

    assert_eq!(root.len(), 1);
    assert_eq!(root.string_of(Tag(0x0008, 0x0060)), Some("CT"));
}

#[test]
fn undefined_length_on_a_scalar_element_is_an_error() {
    let mut bytes = Vec::new();
    bytes.extend(explicit_le_long(0x7FE0, 0x0010, b"OW", 0xFFFF_FFFF));

    let (_, outcome) = read_full(&bytes);
    assert!(matches!(
        outcome,
        Err(Error::UndefinedValueLength { tag, .. }) if tag == Tag(0x7FE0, 0x0010)
    ));
}

#[test]
fn invalid_explicit_vr_symbol_is_an_error() {
    let mut bytes = preamble();
    bytes.extend(explicit_le_short(0x0008, 0x0060, b"CS", b"CT"));
    // a corrupted element header follows
    bytes.extend(explicit_le_short(0x0008, 0x0070, b"q3", b"ACME"));

    let (root, outcome) = read_full(&bytes);
    assert!(matches!(outcome, Err(Error::InvalidVr { .. })));
    assert_eq!(root.len(), 1);
}

#[test]
fn private_tag_under_implicit_vr_is_an_error() {
    let bytes = [
        // (0008,0000) UL 4, a group length to fix the encoding probes
        0x08u8, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00,
        // (0009,0001), not resolvable without a private dictionary
        0x09, 0x00, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0xAB, 0xCD,
    ];

    let (root, outcome) = read_full(&bytes);
    assert!(matches!(
        outcome,
        Err(Error::UnresolvedVr { tag, .. }) if tag == Tag(0x0009, 0x0001)
    ));
    assert_eq!(root.len(), 1);
}

/// A handler which requests a stop after a fixed number of elements.
struct CountingHandler {
    seen: usize,
    limit: usize,
}

impl ReadHandler for CountingHandler {
    fn should_stop(&self) -> bool {
        self.seen >= self.limit
    }

    fn on_element(&mut self, _element: DataElement) {
        self.seen += 1;
    }
}

#[test]
fn requested_stop_is_honored_between_elements() {
    let mut bytes = preamble();
    bytes.extend(explicit_le_short(0x0008, 0x0060, b"CS", b"CT"));
    bytes.extend(explicit_le_short(0x0008, 0x0070, b"LO", b"ACME"));
    bytes.extend(explicit_le_short(0x0028, 0x0010, b"US", &[0x00, 0x02]));
    bytes.extend(explicit_le_short(0x0028, 0x0011, b"US", &[0x00, 0x01]));

    let mut reader = DicomReader::new(CountingHandler { seen: 0, limit: 2 });
    reader.read_from(Cursor::new(&bytes)).unwrap();
    assert_eq!(reader.handler().seen, 2);
}
