//! This module contains the concept of a DICOM data dictionary,
//! which maps attribute tags to their names and value representations.
//!
//! The standard attribute dictionary is provided by
//! the `minidicom-dictionary-std` crate.

use crate::header::{Tag, VR};

/// Type trait for a dictionary of DICOM attributes.
///
/// The dictionary provides the VR hint required for decoding
/// data sets in implicit-VR encodings,
/// as well as a human readable name for presentation purposes.
/// The methods herein have no generic parameters,
/// so as to enable being used as a trait object.
pub trait DataDictionary {
    /// Fetch the full entry for the given tag, if it is known.
    fn entry(&self, tag: Tag) -> Option<&DictionaryEntryRef>;

    /// Fetch the value representation hint for the given tag.
    fn vr_of(&self, tag: Tag) -> Option<VR> {
        self.entry(tag).map(|e| e.vr)
    }

    /// Fetch the name of the attribute with the given tag.
    fn name_of(&self, tag: Tag) -> Option<&'static str> {
        self.entry(tag).map(|e| e.alias)
    }
}

/// An entry of an attribute dictionary backed by static data.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DictionaryEntryRef {
    /// The attribute tag.
    pub tag: Tag,
    /// The name of the attribute, with no spaces, in UpperCamelCase.
    pub alias: &'static str,
    /// The typical value representation of the attribute.
    pub vr: VR,
}
