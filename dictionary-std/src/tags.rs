//! Constants for commonly addressed DICOM attribute tags.
//!
//! These perform the same mapping as the run-time dictionary,
//! but at compile time and without a look-up cost.

use minidicom_core::Tag;

/// (0002,0000) FileMetaInformationGroupLength, UL
pub const FILE_META_INFORMATION_GROUP_LENGTH: Tag = Tag(0x0002, 0x0000);
/// (0002,0002) MediaStorageSOPClassUID, UI
pub const MEDIA_STORAGE_SOP_CLASS_UID: Tag = Tag(0x0002, 0x0002);
/// (0002,0003) MediaStorageSOPInstanceUID, UI
pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Tag = Tag(0x0002, 0x0003);
/// (0002,0010) TransferSyntaxUID, UI
pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
/// (0008,0005) SpecificCharacterSet, CS
pub const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);
/// (0008,0016) SOPClassUID, UI
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
/// (0008,0018) SOPInstanceUID, UI
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
/// (0008,0060) Modality, CS
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
/// (0010,0010) PatientName, PN
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
/// (0010,0020) PatientID, LO
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
/// (0020,000D) StudyInstanceUID, UI
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
/// (0020,000E) SeriesInstanceUID, UI
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
/// (0028,0010) Rows, US
pub const ROWS: Tag = Tag(0x0028, 0x0010);
/// (0028,0011) Columns, US
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
/// (0028,0100) BitsAllocated, US
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
/// (0040,0275) RequestAttributesSequence, SQ
pub const REQUEST_ATTRIBUTES_SEQUENCE: Tag = Tag(0x0040, 0x0275);
/// (7FE0,0010) PixelData, OW or OB
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);
