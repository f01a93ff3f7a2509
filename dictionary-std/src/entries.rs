//! Automatically generated from DICOM PS3.6. DO NOT EDIT!

use minidicom_core::dictionary::DictionaryEntryRef;
use minidicom_core::{Tag, VR};

type E = DictionaryEntryRef;

pub(crate) const ENTRIES: &[E] = &[
    E { tag: Tag(0x0002, 0x0000), alias: "FileMetaInformationGroupLength", vr: VR::UL },
    E { tag: Tag(0x0002, 0x0001), alias: "FileMetaInformationVersion", vr: VR::OB },
    E { tag: Tag(0x0002, 0x0002), alias: "MediaStorageSOPClassUID", vr: VR::UI },
    E { tag: Tag(0x0002, 0x0003), alias: "MediaStorageSOPInstanceUID", vr: VR::UI },
    E { tag: Tag(0x0002, 0x0010), alias: "TransferSyntaxUID", vr: VR::UI },
    E { tag: Tag(0x0002, 0x0012), alias: "ImplementationClassUID", vr: VR::UI },
    E { tag: Tag(0x0002, 0x0013), alias: "ImplementationVersionName", vr: VR::SH },
    E { tag: Tag(0x0002, 0x0016), alias: "SourceApplicationEntityTitle", vr: VR::AE },
    E { tag: Tag(0x0008, 0x0005), alias: "SpecificCharacterSet", vr: VR::CS },
    E { tag: Tag(0x0008, 0x0008), alias: "ImageType", vr: VR::CS },
    E { tag: Tag(0x0008, 0x0012), alias: "InstanceCreationDate", vr: VR::DA },
    E { tag: Tag(0x0008, 0x0013), alias: "InstanceCreationTime", vr: VR::TM },
    E { tag: Tag(0x0008, 0x0014), alias: "InstanceCreatorUID", vr: VR::UI },
    E { tag: Tag(0x0008, 0x0016), alias: "SOPClassUID", vr: VR::UI },
    E { tag: Tag(0x0008, 0x0018), alias: "SOPInstanceUID", vr: VR::UI },
    E { tag: Tag(0x0008, 0x0020), alias: "StudyDate", vr: VR::DA },
    E { tag: Tag(0x0008, 0x0021), alias: "SeriesDate", vr: VR::DA },
    E { tag: Tag(0x0008, 0x0022), alias: "AcquisitionDate", vr: VR::DA },
    E { tag: Tag(0x0008, 0x0023), alias: "ContentDate", vr: VR::DA },
    E { tag: Tag(0x0008, 0x0030), alias: "StudyTime", vr: VR::TM },
    E { tag: Tag(0x0008, 0x0031), alias: "SeriesTime", vr: VR::TM },
    E { tag: Tag(0x0008, 0x0032), alias: "AcquisitionTime", vr: VR::TM },
    E { tag: Tag(0x0008, 0x0033), alias: "ContentTime", vr: VR::TM },
    E { tag: Tag(0x0008, 0x0050), alias: "AccessionNumber", vr: VR::SH },
    E { tag: Tag(0x0008, 0x0060), alias: "Modality", vr: VR::CS },
    E { tag: Tag(0x0008, 0x0064), alias: "ConversionType", vr: VR::CS },
    E { tag: Tag(0x0008, 0x0070), alias: "Manufacturer", vr: VR::LO },
    E { tag: Tag(0x0008, 0x0080), alias: "InstitutionName", vr: VR::LO },
    E { tag: Tag(0x0008, 0x0081), alias: "InstitutionAddress", vr: VR::ST },
    E { tag: Tag(0x0008, 0x0090), alias: "ReferringPhysicianName", vr: VR::PN },
    E { tag: Tag(0x0008, 0x1010), alias: "StationName", vr: VR::SH },
    E { tag: Tag(0x0008, 0x1030), alias: "StudyDescription", vr: VR::LO },
    E { tag: Tag(0x0008, 0x103E), alias: "SeriesDescription", vr: VR::LO },
    E { tag: Tag(0x0008, 0x1040), alias: "InstitutionalDepartmentName", vr: VR::LO },
    E { tag: Tag(0x0008, 0x1048), alias: "PhysiciansOfRecord", vr: VR::PN },
    E { tag: Tag(0x0008, 0x1050), alias: "PerformingPhysicianName", vr: VR::PN },
    E { tag: Tag(0x0008, 0x1060), alias: "NameOfPhysiciansReadingStudy", vr: VR::PN },
    E { tag: Tag(0x0008, 0x1070), alias: "OperatorsName", vr: VR::PN },
    E { tag: Tag(0x0008, 0x1080), alias: "AdmittingDiagnosesDescription", vr: VR::LO },
    E { tag: Tag(0x0008, 0x1090), alias: "ManufacturerModelName", vr: VR::LO },
    E { tag: Tag(0x0008, 0x1110), alias: "ReferencedStudySequence", vr: VR::SQ },
    E { tag: Tag(0x0008, 0x1111), alias: "ReferencedPerformedProcedureStepSequence", vr: VR::SQ },
    E { tag: Tag(0x0008, 0x1115), alias: "ReferencedSeriesSequence", vr: VR::SQ },
    E { tag: Tag(0x0008, 0x1140), alias: "ReferencedImageSequence", vr: VR::SQ },
    E { tag: Tag(0x0008, 0x1150), alias: "ReferencedSOPClassUID", vr: VR::UI },
    E { tag: Tag(0x0008, 0x1155), alias: "ReferencedSOPInstanceUID", vr: VR::UI },
    E { tag: Tag(0x0008, 0x2111), alias: "DerivationDescription", vr: VR::ST },
    E { tag: Tag(0x0008, 0x9215), alias: "DerivationCodeSequence", vr: VR::SQ },
    E { tag: Tag(0x0010, 0x0010), alias: "PatientName", vr: VR::PN },
    E { tag: Tag(0x0010, 0x0020), alias: "PatientID", vr: VR::LO },
    E { tag: Tag(0x0010, 0x0021), alias: "IssuerOfPatientID", vr: VR::LO },
    E { tag: Tag(0x0010, 0x0030), alias: "PatientBirthDate", vr: VR::DA },
    E { tag: Tag(0x0010, 0x0032), alias: "PatientBirthTime", vr: VR::TM },
    E { tag: Tag(0x0010, 0x0040), alias: "PatientSex", vr: VR::CS },
    E { tag: Tag(0x0010, 0x1000), alias: "OtherPatientIDs", vr: VR::LO },
    E { tag: Tag(0x0010, 0x1010), alias: "PatientAge", vr: VR::AS },
    E { tag: Tag(0x0010, 0x1020), alias: "PatientSize", vr: VR::DS },
    E { tag: Tag(0x0010, 0x1030), alias: "PatientWeight", vr: VR::DS },
    E { tag: Tag(0x0010, 0x2160), alias: "EthnicGroup", vr: VR::SH },
    E { tag: Tag(0x0010, 0x21B0), alias: "AdditionalPatientHistory", vr: VR::LT },
    E { tag: Tag(0x0010, 0x4000), alias: "PatientComments", vr: VR::LT },
    E { tag: Tag(0x0018, 0x0015), alias: "BodyPartExamined", vr: VR::CS },
    E { tag: Tag(0x0018, 0x0020), alias: "ScanningSequence", vr: VR::CS },
    E { tag: Tag(0x0018, 0x0021), alias: "SequenceVariant", vr: VR::CS },
    E { tag: Tag(0x0018, 0x0022), alias: "ScanOptions", vr: VR::CS },
    E { tag: Tag(0x0018, 0x0023), alias: "MRAcquisitionType", vr: VR::CS },
    E { tag: Tag(0x0018, 0x0050), alias: "SliceThickness", vr: VR::DS },
    E { tag: Tag(0x0018, 0x0060), alias: "KVP", vr: VR::DS },
    E { tag: Tag(0x0018, 0x0080), alias: "RepetitionTime", vr: VR::DS },
    E { tag: Tag(0x0018, 0x0081), alias: "EchoTime", vr: VR::DS },
    E { tag: Tag(0x0018, 0x0082), alias: "InversionTime", vr: VR::DS },
    E { tag: Tag(0x0018, 0x0083), alias: "NumberOfAverages", vr: VR::DS },
    E { tag: Tag(0x0018, 0x0084), alias: "ImagingFrequency", vr: VR::DS },
    E { tag: Tag(0x0018, 0x0085), alias: "ImagedNucleus", vr: VR::SH },
    E { tag: Tag(0x0018, 0x0086), alias: "EchoNumbers", vr: VR::IS },
    E { tag: Tag(0x0018, 0x0087), alias: "MagneticFieldStrength", vr: VR::DS },
    E { tag: Tag(0x0018, 0x0088), alias: "SpacingBetweenSlices", vr: VR::DS },
    E { tag: Tag(0x0018, 0x0091), alias: "EchoTrainLength", vr: VR::IS },
    E { tag: Tag(0x0018, 0x0095), alias: "PixelBandwidth", vr: VR::DS },
    E { tag: Tag(0x0018, 0x1000), alias: "DeviceSerialNumber", vr: VR::LO },
    E { tag: Tag(0x0018, 0x1020), alias: "SoftwareVersions", vr: VR::LO },
    E { tag: Tag(0x0018, 0x1030), alias: "ProtocolName", vr: VR::LO },
    E { tag: Tag(0x0018, 0x1050), alias: "SpatialResolution", vr: VR::DS },
    E { tag: Tag(0x0018, 0x1088), alias: "HeartRate", vr: VR::IS },
    E { tag: Tag(0x0018, 0x1100), alias: "ReconstructionDiameter", vr: VR::DS },
    E { tag: Tag(0x0018, 0x1110), alias: "DistanceSourceToDetector", vr: VR::DS },
    E { tag: Tag(0x0018, 0x1111), alias: "DistanceSourceToPatient", vr: VR::DS },
    E { tag: Tag(0x0018, 0x1120), alias: "GantryDetectorTilt", vr: VR::DS },
    E { tag: Tag(0x0018, 0x1130), alias: "TableHeight", vr: VR::DS },
    E { tag: Tag(0x0018, 0x1140), alias: "RotationDirection", vr: VR::CS },
    E { tag: Tag(0x0018, 0x1150), alias: "ExposureTime", vr: VR::IS },
    E { tag: Tag(0x0018, 0x1151), alias: "XRayTubeCurrent", vr: VR::IS },
    E { tag: Tag(0x0018, 0x1152), alias: "Exposure", vr: VR::IS },
    E { tag: Tag(0x0018, 0x1160), alias: "FilterType", vr: VR::SH },
    E { tag: Tag(0x0018, 0x1190), alias: "FocalSpots", vr: VR::DS },
    E { tag: Tag(0x0018, 0x1210), alias: "ConvolutionKernel", vr: VR::SH },
    E { tag: Tag(0x0018, 0x5100), alias: "PatientPosition", vr: VR::CS },
    E { tag: Tag(0x0020, 0x000D), alias: "StudyInstanceUID", vr: VR::UI },
    E { tag: Tag(0x0020, 0x000E), alias: "SeriesInstanceUID", vr: VR::UI },
    E { tag: Tag(0x0020, 0x0010), alias: "StudyID", vr: VR::SH },
    E { tag: Tag(0x0020, 0x0011), alias: "SeriesNumber", vr: VR::IS },
    E { tag: Tag(0x0020, 0x0012), alias: "AcquisitionNumber", vr: VR::IS },
    E { tag: Tag(0x0020, 0x0013), alias: "InstanceNumber", vr: VR::IS },
    E { tag: Tag(0x0020, 0x0020), alias: "PatientOrientation", vr: VR::CS },
    E { tag: Tag(0x0020, 0x0032), alias: "ImagePositionPatient", vr: VR::DS },
    E { tag: Tag(0x0020, 0x0037), alias: "ImageOrientationPatient", vr: VR::DS },
    E { tag: Tag(0x0020, 0x0052), alias: "FrameOfReferenceUID", vr: VR::UI },
    E { tag: Tag(0x0020, 0x0060), alias: "Laterality", vr: VR::CS },
    E { tag: Tag(0x0020, 0x1002), alias: "ImagesInAcquisition", vr: VR::IS },
    E { tag: Tag(0x0020, 0x1040), alias: "PositionReferenceIndicator", vr: VR::LO },
    E { tag: Tag(0x0020, 0x1041), alias: "SliceLocation", vr: VR::DS },
    E { tag: Tag(0x0020, 0x4000), alias: "ImageComments", vr: VR::LT },
    E { tag: Tag(0x0028, 0x0002), alias: "SamplesPerPixel", vr: VR::US },
    E { tag: Tag(0x0028, 0x0004), alias: "PhotometricInterpretation", vr: VR::CS },
    E { tag: Tag(0x0028, 0x0006), alias: "PlanarConfiguration", vr: VR::US },
    E { tag: Tag(0x0028, 0x0008), alias: "NumberOfFrames", vr: VR::IS },
    E { tag: Tag(0x0028, 0x0010), alias: "Rows", vr: VR::US },
    E { tag: Tag(0x0028, 0x0011), alias: "Columns", vr: VR::US },
    E { tag: Tag(0x0028, 0x0030), alias: "PixelSpacing", vr: VR::DS },
    E { tag: Tag(0x0028, 0x0034), alias: "PixelAspectRatio", vr: VR::IS },
    E { tag: Tag(0x0028, 0x0100), alias: "BitsAllocated", vr: VR::US },
    E { tag: Tag(0x0028, 0x0101), alias: "BitsStored", vr: VR::US },
    E { tag: Tag(0x0028, 0x0102), alias: "HighBit", vr: VR::US },
    E { tag: Tag(0x0028, 0x0103), alias: "PixelRepresentation", vr: VR::US },
    E { tag: Tag(0x0028, 0x0106), alias: "SmallestImagePixelValue", vr: VR::US/* or SS */ },
    E { tag: Tag(0x0028, 0x0107), alias: "LargestImagePixelValue", vr: VR::US/* or SS */ },
    E { tag: Tag(0x0028, 0x0120), alias: "PixelPaddingValue", vr: VR::US/* or SS */ },
    E { tag: Tag(0x0028, 0x1050), alias: "WindowCenter", vr: VR::DS },
    E { tag: Tag(0x0028, 0x1051), alias: "WindowWidth", vr: VR::DS },
    E { tag: Tag(0x0028, 0x1052), alias: "RescaleIntercept", vr: VR::DS },
    E { tag: Tag(0x0028, 0x1053), alias: "RescaleSlope", vr: VR::DS },
    E { tag: Tag(0x0028, 0x1054), alias: "RescaleType", vr: VR::LO },
    E { tag: Tag(0x0028, 0x2110), alias: "LossyImageCompression", vr: VR::CS },
    E { tag: Tag(0x0028, 0x2112), alias: "LossyImageCompressionRatio", vr: VR::DS },
    E { tag: Tag(0x0032, 0x1032), alias: "RequestingPhysician", vr: VR::PN },
    E { tag: Tag(0x0032, 0x1060), alias: "RequestedProcedureDescription", vr: VR::LO },
    E { tag: Tag(0x0032, 0x4000), alias: "StudyComments", vr: VR::LT },
    E { tag: Tag(0x0038, 0x0010), alias: "AdmissionID", vr: VR::LO },
    E { tag: Tag(0x0038, 0x0050), alias: "SpecialNeeds", vr: VR::LO },
    E { tag: Tag(0x0038, 0x0300), alias: "CurrentPatientLocation", vr: VR::LO },
    E { tag: Tag(0x0038, 0x0500), alias: "PatientState", vr: VR::LO },
    E { tag: Tag(0x0040, 0x0001), alias: "ScheduledStationAETitle", vr: VR::AE },
    E { tag: Tag(0x0040, 0x0002), alias: "ScheduledProcedureStepStartDate", vr: VR::DA },
    E { tag: Tag(0x0040, 0x0003), alias: "ScheduledProcedureStepStartTime", vr: VR::TM },
    E { tag: Tag(0x0040, 0x0006), alias: "ScheduledPerformingPhysicianName", vr: VR::PN },
    E { tag: Tag(0x0040, 0x0007), alias: "ScheduledProcedureStepDescription", vr: VR::LO },
    E { tag: Tag(0x0040, 0x0009), alias: "ScheduledProcedureStepID", vr: VR::SH },
    E { tag: Tag(0x0040, 0x0010), alias: "ScheduledStationName", vr: VR::SH },
    E { tag: Tag(0x0040, 0x0011), alias: "ScheduledProcedureStepLocation", vr: VR::SH },
    E { tag: Tag(0x0040, 0x0100), alias: "ScheduledProcedureStepSequence", vr: VR::SQ },
    E { tag: Tag(0x0040, 0x0241), alias: "PerformedStationAETitle", vr: VR::AE },
    E { tag: Tag(0x0040, 0x0244), alias: "PerformedProcedureStepStartDate", vr: VR::DA },
    E { tag: Tag(0x0040, 0x0245), alias: "PerformedProcedureStepStartTime", vr: VR::TM },
    E { tag: Tag(0x0040, 0x0253), alias: "PerformedProcedureStepID", vr: VR::SH },
    E { tag: Tag(0x0040, 0x0254), alias: "PerformedProcedureStepDescription", vr: VR::LO },
    E { tag: Tag(0x0040, 0x0260), alias: "PerformedProtocolCodeSequence", vr: VR::SQ },
    E { tag: Tag(0x0040, 0x0275), alias: "RequestAttributesSequence", vr: VR::SQ },
    E { tag: Tag(0x0040, 0x1001), alias: "RequestedProcedureID", vr: VR::SH },
    E { tag: Tag(0x0040, 0xA730), alias: "ContentSequence", vr: VR::SQ },
    E { tag: Tag(0x0054, 0x0011), alias: "NumberOfEnergyWindows", vr: VR::US },
    E { tag: Tag(0x0054, 0x0016), alias: "RadiopharmaceuticalInformationSequence", vr: VR::SQ },
    E { tag: Tag(0x0054, 0x0081), alias: "NumberOfSlices", vr: VR::US },
    E { tag: Tag(0x0054, 0x0410), alias: "PatientOrientationCodeSequence", vr: VR::SQ },
    E { tag: Tag(0x7FE0, 0x0010), alias: "PixelData", vr: VR::OW/* or OB */ },
];
