//! This crate provides a streaming parser of DICOM data sets.
//!
//! Decoding is event driven: [`DicomReader`] walks the framed records
//! of a file and dispatches each of them to a [`ReadHandler`],
//! which owns every constructed node.
//! This decouples parsing from the in-memory representation:
//! the same decoder serves full tree builds,
//! selective extraction of a few attributes without materializing
//! the rest of the file, and plain text dumps.
//!
//! # Example
//!
//! Extract image dimensions and pixel data from a file,
//! skipping the value bytes of everything else:
//!
//! ```no_run
//! use minidicom_core::DataSet;
//! use minidicom_dictionary_std::tags;
//! use minidicom_parser::{DicomReader, TagsReadHandler};
//!
//! let mut data_set = DataSet::default();
//! let mut handler = TagsReadHandler::new(&mut data_set);
//! handler
//!     .add_tag(tags::PIXEL_DATA)
//!     .add_tag(tags::ROWS)
//!     .add_tag(tags::COLUMNS);
//! DicomReader::new(handler).read_file("path/to/file.dcm")?;
//!
//! let rows = data_set.u16_of(tags::ROWS);
//! let columns = data_set.u16_of(tags::COLUMNS);
//! let pixel_data = data_set.buffer_of(tags::PIXEL_DATA);
//! # Result::<(), minidicom_parser::read::Error>::Ok(())
//! ```

pub mod handler;
pub mod read;
pub mod source;

pub use handler::{DumpReadHandler, FullReadHandler, ReadHandler, TagsReadHandler};
pub use read::DicomReader;
pub use source::ByteSource;
