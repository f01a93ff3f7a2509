#![deny(trivial_casts, trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(missing_docs, unused_qualifications, unused_import_braces)]

//! This is the core library for DICOM content,
//! containing the basic concepts around data elements:
//! the attribute tag, the value representation, the value length,
//! and the in-memory tree of parsed data elements.
//!
//! Decoding DICOM data from a byte source
//! is the responsibility of the `minidicom-parser` crate,
//! which builds trees out of the types declared here.

pub mod dataset;
pub mod dictionary;
pub mod element;
pub mod header;

pub use byteordered::Endianness;
pub use dataset::{DataSet, DataSetNode, Visit};
pub use dictionary::{DataDictionary, DictionaryEntryRef};
pub use element::DataElement;
pub use header::{Length, Tag, VR};
