//! In-memory representation of a single parsed data element,
//! with typed accessors over its raw value buffer.

use byteordered::byteorder::{BigEndian, ByteOrder, LittleEndian};
use byteordered::Endianness;

use crate::header::{Length, Tag, VR};

/// A parsed DICOM data element which owns its value bytes.
///
/// The buffer holds the value exactly as it appeared on the wire;
/// the element records the byte order it was encoded in
/// so that the typed accessors can decode numbers on demand.
/// Sequence elements and delimitation records carry no buffer,
/// the latter also having the synthetic [`VR::Unknown`].
///
/// Typed accessors never panic:
/// they return `None` when the value representation is incompatible
/// or the buffer does not have the exact width of the requested type.
#[derive(Debug, Clone, PartialEq)]
pub struct DataElement {
    tag: Tag,
    vr: VR,
    endianness: Endianness,
    length: Length,
    data: Vec<u8>,
}

impl DataElement {
    /// Create a data element carrying the given value bytes.
    /// The recorded length is the buffer's size.
    pub fn with_value(tag: Tag, vr: VR, endianness: Endianness, data: Vec<u8>) -> Self {
        let length = Length(data.len() as u32);
        DataElement {
            tag,
            vr,
            endianness,
            length,
            data,
        }
    }

    /// Create a marker element with no value buffer,
    /// as used for item and delimitation records.
    /// The given length is informational only.
    pub fn marker(tag: Tag, endianness: Endianness, length: Length) -> Self {
        DataElement {
            tag,
            vr: VR::Unknown,
            endianness,
            length,
            data: Vec::new(),
        }
    }

    /// Retrieve the element's tag.
    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Retrieve the element's value representation.
    #[inline]
    pub fn vr(&self) -> VR {
        self.vr
    }

    /// Retrieve the byte order the element's value was encoded in.
    #[inline]
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Retrieve the value length as declared by the element.
    /// For marker records this may differ from the buffer size.
    #[inline]
    pub fn length(&self) -> Length {
        self.length
    }

    /// Retrieve the raw value bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Decode the value as a single string,
    /// with trailing space padding removed
    /// (and trailing NUL padding, in the case of unique identifiers).
    ///
    /// Returns `None` when the VR is not a textual one
    /// or the bytes are not valid UTF-8.
    pub fn to_str(&self) -> Option<&str> {
        use VR::*;
        if !matches!(
            self.vr,
            AE | AS | CS | DA | DS | DT | IS | LO | LT | PN | SH | ST | TM | UC | UI | UR | UT
        ) {
            return None;
        }
        let mut bytes: &[u8] = &self.data;
        while let Some((&b, rest)) = bytes.split_last() {
            if b == b' ' || (self.vr == UI && b == 0) {
                bytes = rest;
            } else {
                break;
            }
        }
        std::str::from_utf8(bytes).ok()
    }

    /// Decode the value as a single unsigned 16-bit integer (`US`).
    pub fn to_u16(&self) -> Option<u16> {
        if self.vr != VR::US || self.data.len() != 2 {
            return None;
        }
        Some(match self.endianness {
            Endianness::Little => LittleEndian::read_u16(&self.data),
            Endianness::Big => BigEndian::read_u16(&self.data),
        })
    }

    /// Decode the value as a single signed 16-bit integer (`SS`).
    pub fn to_i16(&self) -> Option<i16> {
        if self.vr != VR::SS || self.data.len() != 2 {
            return None;
        }
        Some(match self.endianness {
            Endianness::Little => LittleEndian::read_i16(&self.data),
            Endianness::Big => BigEndian::read_i16(&self.data),
        })
    }

    /// Decode the value as a single unsigned 32-bit integer (`UL`).
    pub fn to_u32(&self) -> Option<u32> {
        if self.vr != VR::UL || self.data.len() != 4 {
            return None;
        }
        Some(match self.endianness {
            Endianness::Little => LittleEndian::read_u32(&self.data),
            Endianness::Big => BigEndian::read_u32(&self.data),
        })
    }

    /// Decode the value as a single signed 32-bit integer (`SL`).
    pub fn to_i32(&self) -> Option<i32> {
        if self.vr != VR::SL || self.data.len() != 4 {
            return None;
        }
        Some(match self.endianness {
            Endianness::Little => LittleEndian::read_i32(&self.data),
            Endianness::Big => BigEndian::read_i32(&self.data),
        })
    }

    /// Decode the value as a single 32-bit floating point number (`FL`).
    pub fn to_f32(&self) -> Option<f32> {
        if self.vr != VR::FL || self.data.len() != 4 {
            return None;
        }
        Some(match self.endianness {
            Endianness::Little => LittleEndian::read_f32(&self.data),
            Endianness::Big => BigEndian::read_f32(&self.data),
        })
    }

    /// Decode the value as a single 64-bit floating point number (`FD`).
    pub fn to_f64(&self) -> Option<f64> {
        if self.vr != VR::FD || self.data.len() != 8 {
            return None;
        }
        Some(match self.endianness {
            Endianness::Little => LittleEndian::read_f64(&self.data),
            Endianness::Big => BigEndian::read_f64(&self.data),
        })
    }
}
