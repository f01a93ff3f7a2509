#![deny(trivial_casts, trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(missing_docs, unused_qualifications, unused_import_braces)]

//! This crate implements the standard DICOM attribute dictionary.
//!
//! The records are collected from [DICOM PS3.6] offline
//! and laid out as a table sorted by tag,
//! so that look-ups resolve through a binary search
//! with no run-time initialization.
//! The table is read-only and safe for concurrent access.
//!
//! [DICOM PS3.6]: https://dicom.nema.org/medical/dicom/current/output/chtml/part06/ps3.6.html

mod entries;
pub mod tags;

use minidicom_core::dictionary::{DataDictionary, DictionaryEntryRef};
use minidicom_core::Tag;

use crate::entries::ENTRIES;

/// An attribute dictionary which consults
/// the table of standard DICOM attributes.
///
/// This is the type to use
/// whenever a data element dictionary is needed,
/// such as when reading data sets in implicit-VR encodings.
/// It is a unit type backed by a compile-time table,
/// so it can be summoned anywhere at no cost.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StandardDataDictionary;

impl DataDictionary for StandardDataDictionary {
    fn entry(&self, tag: Tag) -> Option<&DictionaryEntryRef> {
        ENTRIES
            .binary_search_by_key(&tag.to_u32(), |e| e.tag.to_u32())
            .ok()
            .map(|i| &ENTRIES[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minidicom_core::VR;

    #[test]
    fn entries_are_sorted_strictly_ascending() {
        for window in ENTRIES.windows(2) {
            assert!(
                window[0].tag.to_u32() < window[1].tag.to_u32(),
                "entries out of order: {} before {}",
                window[0].tag,
                window[1].tag,
            );
        }
    }

    #[test]
    fn binary_search_agrees_with_linear_scan() {
        let dict = StandardDataDictionary;
        // every registered tag resolves to its own entry
        for entry in ENTRIES {
            let linear = ENTRIES.iter().find(|e| e.tag == entry.tag);
            assert_eq!(dict.entry(entry.tag), linear);
        }
        // and a few absent tags resolve to nothing either way
        for &tag in &[
            Tag(0x0001, 0x0001),
            Tag(0x0800, 0x0500),
            Tag(0x0029, 0x1010),
            Tag(0xFFFE, 0xE000),
        ] {
            assert!(dict.entry(tag).is_none());
            assert!(ENTRIES.iter().all(|e| e.tag != tag));
        }
    }

    #[test]
    fn well_known_attributes_resolve() {
        let dict = StandardDataDictionary;
        assert_eq!(dict.vr_of(Tag(0x0008, 0x0005)), Some(VR::CS));
        assert_eq!(dict.name_of(Tag(0x0008, 0x0005)), Some("SpecificCharacterSet"));
        assert_eq!(dict.vr_of(Tag(0x0010, 0x0010)), Some(VR::PN));
        assert_eq!(dict.vr_of(Tag(0x0028, 0x0010)), Some(VR::US));
        assert_eq!(dict.vr_of(Tag(0x0040, 0x0275)), Some(VR::SQ));
        assert_eq!(dict.vr_of(Tag(0x7FE0, 0x0010)), Some(VR::OW));
        assert_eq!(dict.name_of(Tag(0x7FE0, 0x0010)), Some("PixelData"));
    }

    #[test]
    fn tag_constants_match_the_table() {
        let dict = StandardDataDictionary;
        assert_eq!(tags::SPECIFIC_CHARACTER_SET, Tag(0x0008, 0x0005));
        assert_eq!(tags::MODALITY, Tag(0x0008, 0x0060));
        assert_eq!(tags::PIXEL_DATA, Tag(0x7FE0, 0x0010));
        assert_eq!(dict.name_of(tags::TRANSFER_SYNTAX_UID), Some("TransferSyntaxUID"));
        assert_eq!(dict.name_of(tags::ROWS), Some("Rows"));
    }
}
