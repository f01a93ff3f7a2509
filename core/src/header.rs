//! The basic types used to frame a DICOM data element:
//! the attribute tag, the value representation code,
//! and the value length with its undefined-length sentinel.

use std::cmp::Ordering;
use std::fmt;
use std::str::{from_utf8, FromStr};

/// Idiomatic alias for a tag's group number.
pub type GroupNumber = u16;
/// Idiomatic alias for a tag's element number.
pub type ElementNumber = u16;

/// The data type for DICOM data element tags.
///
/// A tag is a `(group, element)` pair of 16-bit numbers.
/// Ordering and equality are equivalent to those of
/// the composed 32-bit value (group in the high half),
/// as obtained through [`to_u32`](Tag::to_u32).
/// Both `(u16, u16)` and `[u16; 2]` can be
/// efficiently converted to this type.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct Tag(pub GroupNumber, pub ElementNumber);

impl Tag {
    /// The tag of an item prefix record, `(FFFE,E000)`.
    pub const ITEM: Tag = Tag(0xFFFE, 0xE000);

    /// The tag of an item delimitation record, `(FFFE,E00D)`.
    pub const ITEM_DELIMITER: Tag = Tag(0xFFFE, 0xE00D);

    /// The tag of a sequence delimitation record, `(FFFE,E0DD)`.
    pub const SEQUENCE_DELIMITER: Tag = Tag(0xFFFE, 0xE0DD);

    /// Getter for the tag's group value.
    #[inline]
    pub fn group(self) -> GroupNumber {
        self.0
    }

    /// Getter for the tag's element value.
    #[inline]
    pub fn element(self) -> ElementNumber {
        self.1
    }

    /// Compose the tag into a single 32-bit value,
    /// with the group number in the upper half.
    #[inline]
    pub fn to_u32(self) -> u32 {
        (u32::from(self.0) << 16) | u32::from(self.1)
    }

    /// Swap the bytes of both tag halves independently,
    /// yielding the tag as it would be read
    /// under the opposite byte order.
    ///
    /// ```
    /// # use minidicom_core::Tag;
    /// let tag = Tag(0x0008, 0x0005);
    /// assert_eq!(tag.swap_bytes(), Tag(0x0800, 0x0500));
    /// assert_eq!(tag.swap_bytes().swap_bytes(), tag);
    /// ```
    #[inline]
    pub fn swap_bytes(self) -> Tag {
        Tag(self.0.swap_bytes(), self.1.swap_bytes())
    }

    /// Check whether this is the tag of an item prefix.
    #[inline]
    pub fn is_item(self) -> bool {
        self == Tag::ITEM
    }

    /// Check whether this is the tag of an item delimiter.
    #[inline]
    pub fn is_item_delimiter(self) -> bool {
        self == Tag::ITEM_DELIMITER
    }

    /// Check whether this is the tag of a sequence delimiter.
    #[inline]
    pub fn is_sequence_delimiter(self) -> bool {
        self == Tag::SEQUENCE_DELIMITER
    }

    /// Check whether this is a Group Length tag (element number zero).
    /// The VR of group length elements is always `UL`.
    #[inline]
    pub fn is_group_length(self) -> bool {
        self.1 == 0
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({:#06X?}, {:#06X?})", self.0, self.1)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

impl From<(u16, u16)> for Tag {
    #[inline]
    fn from(value: (u16, u16)) -> Tag {
        Tag(value.0, value.1)
    }
}

impl From<[u16; 2]> for Tag {
    #[inline]
    fn from(value: [u16; 2]) -> Tag {
        Tag(value[0], value[1])
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

/// A type for representing data element value lengths in bytes.
/// An internal value of `0xFFFF_FFFF` represents an undefined
/// (unspecified) length, meaning that the element's extent
/// is determined by a delimitation record rather than a byte count.
///
/// Numeric comparisons do not function the same way
/// as in primitive number types:
/// two undefined lengths are not equal,
/// and comparing with at least one undefined length is always `false`.
///
/// ```
/// # use minidicom_core::Length;
/// assert_ne!(Length::UNDEFINED, Length::UNDEFINED);
/// assert!(Length(16) < Length(64));
/// assert!(!(Length::UNDEFINED < Length(64)));
/// assert!(!(Length::UNDEFINED > Length(64)));
/// ```
#[derive(Clone, Copy)]
pub struct Length(pub u32);

const UNDEFINED_LEN: u32 = 0xFFFF_FFFF;

impl Length {
    /// A length that is undefined.
    pub const UNDEFINED: Self = Length(UNDEFINED_LEN);

    /// Create a new length value from its internal representation.
    /// This is equivalent to `Length(len)`.
    pub fn new(len: u32) -> Self {
        Length(len)
    }

    /// Check whether this length is undefined.
    #[inline]
    pub fn is_undefined(self) -> bool {
        self.0 == UNDEFINED_LEN
    }

    /// Check whether this length is well defined (not undefined).
    #[inline]
    pub fn is_defined(self) -> bool {
        !self.is_undefined()
    }

    /// Fetch the concrete length value, if available.
    /// Returns `None` if it represents an undefined length.
    #[inline]
    pub fn get(self) -> Option<u32> {
        match self.0 {
            UNDEFINED_LEN => None,
            v => Some(v),
        }
    }
}

impl From<u32> for Length {
    fn from(o: u32) -> Self {
        Length(o)
    }
}

impl PartialEq<Length> for Length {
    fn eq(&self, rhs: &Length) -> bool {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => false,
            (l1, l2) => l1 == l2,
        }
    }
}

impl PartialOrd<Length> for Length {
    fn partial_cmp(&self, rhs: &Length) -> Option<Ordering> {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => None,
            (l1, l2) => Some(l1.cmp(&l2)),
        }
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("Length(Undefined)"),
            l => f.debug_tuple("Length").field(&l).finish(),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("U/L"),
            l => write!(f, "{}", &l),
        }
    }
}

/// An enum type for a DICOM value representation.
///
/// The `Unknown` variant is not part of the standard's repertoire:
/// it is assigned to records which carry no VR on the wire
/// and cannot be resolved through a dictionary,
/// such as item and delimitation records.
/// [`from_symbol`](VR::from_symbol) never yields `Unknown`.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Ord, PartialOrd)]
pub enum VR {
    /// Application Entity
    AE,
    /// Age String
    AS,
    /// Attribute Tag
    AT,
    /// Code String
    CS,
    /// Date
    DA,
    /// Decimal String
    DS,
    /// Date Time
    DT,
    /// Floating Point Single
    FL,
    /// Floating Point Double
    FD,
    /// Integer String
    IS,
    /// Long String
    LO,
    /// Long Text
    LT,
    /// Other Byte
    OB,
    /// Other Double
    OD,
    /// Other Float
    OF,
    /// Other Long
    OL,
    /// Other Very Long
    OV,
    /// Other Word
    OW,
    /// Person Name
    PN,
    /// Short String
    SH,
    /// Signed Long
    SL,
    /// Sequence of Items
    SQ,
    /// Signed Short
    SS,
    /// Short Text
    ST,
    /// Signed Very Long
    SV,
    /// Time
    TM,
    /// Unlimited Characters
    UC,
    /// Unique Identifier (UID)
    UI,
    /// Unsigned Long
    UL,
    /// Unknown
    UN,
    /// Universal Resource Identifier or Universal Resource Locator (URI/URL)
    UR,
    /// Unsigned Short
    US,
    /// Unlimited Text
    UT,
    /// Unsigned Very Long
    UV,
    /// Synthetic code for records without a resolvable VR
    Unknown,
}

impl VR {
    /// Obtain the value representation corresponding to the given two bytes.
    /// Each byte should represent an alphabetic character in upper case,
    /// otherwise no match is made.
    pub fn from_symbol(symbol: [u8; 2]) -> Option<Self> {
        from_utf8(symbol.as_ref())
            .ok()
            .and_then(|s| VR::from_str(s).ok())
    }

    /// Retrieve a string representation of this VR.
    /// The synthetic `Unknown` variant is rendered as `"??"`.
    pub fn to_string(self) -> &'static str {
        use VR::*;
        match self {
            AE => "AE",
            AS => "AS",
            AT => "AT",
            CS => "CS",
            DA => "DA",
            DS => "DS",
            DT => "DT",
            FL => "FL",
            FD => "FD",
            IS => "IS",
            LO => "LO",
            LT => "LT",
            OB => "OB",
            OD => "OD",
            OF => "OF",
            OL => "OL",
            OV => "OV",
            OW => "OW",
            PN => "PN",
            SH => "SH",
            SL => "SL",
            SQ => "SQ",
            SS => "SS",
            ST => "ST",
            SV => "SV",
            TM => "TM",
            UC => "UC",
            UI => "UI",
            UL => "UL",
            UN => "UN",
            UR => "UR",
            US => "US",
            UT => "UT",
            UV => "UV",
            Unknown => "??",
        }
    }

    /// Check whether an explicit-VR data element with this VR
    /// uses the long header form,
    /// in which the 16 bits following the VR symbol are reserved
    /// and the value length is carried by a subsequent 32-bit field.
    ///
    /// See PS3.5 section 7.1.2, Data Element Structure with Explicit VR.
    pub fn has_long_length(self) -> bool {
        use VR::*;
        matches!(
            self,
            OB | OD | OF | OL | OV | OW | SQ | SV | UC | UN | UR | UT | UV
        )
    }
}

/// Obtain the value representation corresponding to the given string.
/// The string should hold exactly two UTF-8 encoded alphabetic characters
/// in upper case, otherwise no match is made.
impl FromStr for VR {
    type Err = &'static str;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        use VR::*;
        match string {
            "AE" => Ok(AE),
            "AS" => Ok(AS),
            "AT" => Ok(AT),
            "CS" => Ok(CS),
            "DA" => Ok(DA),
            "DS" => Ok(DS),
            "DT" => Ok(DT),
            "FL" => Ok(FL),
            "FD" => Ok(FD),
            "IS" => Ok(IS),
            "LO" => Ok(LO),
            "LT" => Ok(LT),
            "OB" => Ok(OB),
            "OD" => Ok(OD),
            "OF" => Ok(OF),
            "OL" => Ok(OL),
            "OV" => Ok(OV),
            "OW" => Ok(OW),
            "PN" => Ok(PN),
            "SH" => Ok(SH),
            "SL" => Ok(SL),
            "SQ" => Ok(SQ),
            "SS" => Ok(SS),
            "ST" => Ok(ST),
            "SV" => Ok(SV),
            "TM" => Ok(TM),
            "UC" => Ok(UC),
            "UI" => Ok(UI),
            "UL" => Ok(UL),
            "UN" => Ok(UN),
            "UR" => Ok(UR),
            "US" => Ok(US),
            "UT" => Ok(UT),
            "UV" => Ok(UV),
            _ => Err("no such value representation"),
        }
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(VR::to_string(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::{Length, Tag, VR};

    #[test]
    fn tag_from_u16_pair() {
        let t = Tag::from((0x0010u16, 0x0020u16));
        assert_eq!(0x0010u16, t.group());
        assert_eq!(0x0020u16, t.element());
        assert_eq!(0x0010_0020, t.to_u32());
    }

    #[test]
    fn tag_ordering_follows_composed_value() {
        assert!(Tag(0x0008, 0x0005) < Tag(0x0008, 0x0060));
        assert!(Tag(0x0008, 0xFFFF) < Tag(0x0010, 0x0000));
        assert!(Tag(0x7FE0, 0x0010) < Tag::SEQUENCE_DELIMITER);
    }

    #[test]
    fn tag_byte_swap_involution() {
        for &tag in &[
            Tag(0x0008, 0x0005),
            Tag(0x0800, 0x0500),
            Tag(0x7FE0, 0x0010),
            Tag::ITEM,
        ] {
            assert_eq!(tag.swap_bytes().swap_bytes(), tag);
        }
        assert_eq!(Tag(0x0102, 0x0304).swap_bytes(), Tag(0x0201, 0x0403));
    }

    #[test]
    fn delimiter_predicates() {
        assert!(Tag(0xFFFE, 0xE000).is_item());
        assert!(Tag(0xFFFE, 0xE00D).is_item_delimiter());
        assert!(Tag(0xFFFE, 0xE0DD).is_sequence_delimiter());
        assert!(Tag(0x0008, 0x0000).is_group_length());
        assert!(!Tag(0x0008, 0x0005).is_group_length());
    }

    #[test]
    fn vr_from_symbol() {
        assert_eq!(VR::from_symbol(*b"CS"), Some(VR::CS));
        assert_eq!(VR::from_symbol(*b"OB"), Some(VR::OB));
        assert_eq!(VR::from_symbol(*b"ZZ"), None);
        // arbitrary binary data is not a VR
        assert_eq!(VR::from_symbol([0x00, 0x01]), None);
        assert_eq!(VR::from_symbol([0xFF, 0xFE]), None);
    }

    #[test]
    fn vr_length_form() {
        assert!(VR::OB.has_long_length());
        assert!(VR::SQ.has_long_length());
        assert!(VR::UN.has_long_length());
        assert!(VR::UT.has_long_length());
        assert!(!VR::CS.has_long_length());
        assert!(!VR::US.has_long_length());
        assert!(!VR::UI.has_long_length());
    }

    #[test]
    fn undefined_length_is_viral() {
        assert_eq!(Length(8), Length(8));
        assert_ne!(Length(8), Length(9));
        assert_eq!(Length::UNDEFINED.get(), None);
        assert_eq!(Length(16).get(), Some(16));
        assert!(Length::UNDEFINED.is_undefined());
        assert!(Length(0).is_defined());
    }
}
