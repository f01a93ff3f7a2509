//! The streaming DICOM data set decoder.
//!
//! [`DicomReader`] consumes framed records from a [`ByteSource`]
//! and delivers each of them to a [`ReadHandler`] in strict file order,
//! without retaining any element itself.
//! The decoder detects the file's encoding from its own content:
//! whether value representations are explicit on the wire,
//! and which byte order the data set proper is encoded in.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use byteordered::Endianness;
use minidicom_core::dictionary::DataDictionary;
use minidicom_core::{DataElement, DataSet, Length, Tag, VR};
use minidicom_dictionary_std::StandardDataDictionary;
use snafu::{ensure, Backtrace, ResultExt, Snafu};
use tracing::{debug, warn};

use crate::handler::ReadHandler;
use crate::source::ByteSource;

const DICM_MAGIC_CODE: &str = "DICM";
const PREAMBLE_LENGTH: u64 = 128;
const UNDEFINED_LENGTH: u32 = 0xFFFF_FFFF;

/// Module-level error type:
/// for problems which may occur while decoding a DICOM data set.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The file could not be opened for reading.
    #[snafu(display("could not open file {}", path.display()))]
    OpenFile {
        /// path to the offending file
        path: PathBuf,
        backtrace: Backtrace,
        source: std::io::Error,
    },

    /// The 4-byte magic code after the preamble could not be read,
    /// meaning that the source holds no DICOM data at all.
    #[snafu(display("could not read the DICOM magic code"))]
    ReadMagicCode {
        backtrace: Backtrace,
        source: std::io::Error,
    },

    /// The probe for the VR encoding could not inspect the stream.
    #[snafu(display("could not probe the VR encoding at position {}", position))]
    ProbeEncoding {
        /// position of the probed element header
        position: u64,
        backtrace: Backtrace,
        source: std::io::Error,
    },

    /// The probe for the data set byte order could not inspect the stream.
    #[snafu(display("could not probe the byte order at position {}", position))]
    ProbeByteOrder {
        /// position of the probed element header
        position: u64,
        backtrace: Backtrace,
        source: std::io::Error,
    },

    /// The reader could not reposition the stream.
    #[snafu(display("could not reposition the stream at position {}", position))]
    SeekSource {
        /// position before the seek
        position: u64,
        backtrace: Backtrace,
        source: std::io::Error,
    },

    /// An explicit VR symbol could not be read.
    #[snafu(display("could not read the VR of the element at position {}", position))]
    ReadVr {
        /// position of the element header
        position: u64,
        backtrace: Backtrace,
        source: std::io::Error,
    },

    /// The two bytes at the VR position do not name
    /// a known value representation.
    #[snafu(display(
        "invalid VR symbol {:?} in the element at position {}",
        symbol,
        position
    ))]
    InvalidVr {
        /// the offending bytes
        symbol: [u8; 2],
        /// position of the element header
        position: u64,
        backtrace: Backtrace,
    },

    /// A private tag was found in an implicit-VR data set:
    /// without an extension dictionary its VR cannot be resolved.
    #[snafu(display(
        "cannot resolve the VR of tag {} (implicit VR) at position {}",
        tag,
        position
    ))]
    UnresolvedVr {
        /// the unresolvable tag
        tag: Tag,
        /// position of the element header
        position: u64,
        backtrace: Backtrace,
    },

    /// A value length field could not be read.
    #[snafu(display(
        "could not read the value length of {} at position {}",
        tag,
        position
    ))]
    ReadLength {
        /// tag of the element being read
        tag: Tag,
        /// position of the element header
        position: u64,
        backtrace: Backtrace,
        source: std::io::Error,
    },

    /// The zero length of a delimitation record could not be consumed.
    #[snafu(display("could not read the delimiter at position {}", position))]
    ReadDelimiter {
        /// position of the delimitation record
        position: u64,
        backtrace: Backtrace,
        source: std::io::Error,
    },

    /// A non-sequence element declared the undefined length sentinel.
    #[snafu(display(
        "undefined length in non-sequence element {} at position {}",
        tag,
        position
    ))]
    UndefinedValueLength {
        /// tag of the offending element
        tag: Tag,
        /// position of the element header
        position: u64,
        backtrace: Backtrace,
    },

    /// The value bytes of an element could not be read in full,
    /// usually because the source is truncated.
    #[snafu(display(
        "could not read the {}-byte value of {} at position {}",
        length,
        tag,
        position
    ))]
    ReadValueData {
        /// tag of the element being read
        tag: Tag,
        /// declared value length
        length: u32,
        /// position of the element header
        position: u64,
        backtrace: Backtrace,
        source: std::io::Error,
    },
}

/// Module-level result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A streaming reader of DICOM files and data set streams.
///
/// The reader delivers every decoded record to its [`ReadHandler`]
/// and owns no elements itself;
/// partial trees observed by the handler remain valid
/// when decoding is interrupted by an error or a requested stop.
///
/// A reader instance is not meant to be shared across threads,
/// but independent readers over distinct sources may run in parallel.
///
/// # Example
///
/// ```no_run
/// use minidicom_core::DataSet;
/// use minidicom_parser::{DicomReader, FullReadHandler};
///
/// let mut data_set = DataSet::default();
/// let mut reader = DicomReader::new(FullReadHandler::new(&mut data_set));
/// reader.read_file("path/to/file.dcm")?;
/// # Result::<(), minidicom_parser::read::Error>::Ok(())
/// ```
#[derive(Debug)]
pub struct DicomReader<H, D = StandardDataDictionary> {
    handler: H,
    dict: D,
    endianness: Endianness,
    explicit_vr: bool,
}

impl<H> DicomReader<H>
where
    H: ReadHandler,
{
    /// Create a new reader delivering records to the given handler,
    /// consulting the standard attribute dictionary.
    pub fn new(handler: H) -> Self {
        DicomReader::new_with_dictionary(handler, StandardDataDictionary)
    }
}

impl<H, D> DicomReader<H, D>
where
    H: ReadHandler,
    D: DataDictionary,
{
    /// Create a new reader with a custom attribute dictionary,
    /// which resolves VRs in implicit-VR data sets
    /// and drives byte order detection.
    pub fn new_with_dictionary(handler: H, dict: D) -> Self {
        DicomReader {
            handler,
            dict,
            endianness: Endianness::Little,
            explicit_vr: true,
        }
    }

    /// Borrow the handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Retrieve the handler, consuming the reader.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// The byte order in effect after the last decoding run.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Whether the last decoding run found explicit VRs on the wire.
    pub fn explicit_vr(&self) -> bool {
        self.explicit_vr
    }

    /// Open the file at the given path and decode it to completion,
    /// to a handler-requested stop, or to the first malformed record.
    pub fn read_file<P>(&mut self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).context(OpenFileSnafu { path })?;
        self.read_from(BufReader::new(file))
    }

    /// Decode a DICOM stream from the given random access source.
    ///
    /// The source is expected to follow the DICOM file structure:
    /// an optional 128-byte preamble followed by the `"DICM"` magic code,
    /// then data elements until the end of the stream.
    /// When the magic code is missing,
    /// data elements are assumed to begin at offset 0.
    pub fn read_from<R>(&mut self, from: R) -> Result<()>
    where
        R: Read + Seek,
    {
        let mut source = ByteSource::new(from);

        source
            .seek_to(PREAMBLE_LENGTH)
            .context(ReadMagicCodeSnafu)?;
        match source.read_str(4) {
            Ok(magic) if magic == DICM_MAGIC_CODE => {}
            Ok(_) => {
                // the preamble is omitted, data elements begin at offset 0
                debug!("no magic code found, assuming a headerless file");
                source
                    .undo(PREAMBLE_LENGTH + 4)
                    .context(ReadMagicCodeSnafu)?;
            }
            Err(_) => {
                // too short for a preamble, which headerless files
                // under 132 bytes legitimately are
                debug!("no room for a magic code, assuming a headerless file");
                source.seek_to(0).context(ReadMagicCodeSnafu)?;
            }
        }

        // the (0002,xxxx) file meta group is always little-endian,
        // so only the VR encoding can be probed at this point
        self.endianness = Endianness::Little;
        let explicit_vr = self.probe_explicit_vr(&mut source)?;
        self.explicit_vr = explicit_vr;
        self.handler.on_encoding(explicit_vr);

        self.read_elements(&mut source, Length::UNDEFINED, true)?;
        Ok(())
    }

    /// Check whether the element header at the current position
    /// carries a valid VR symbol after its tag,
    /// leaving the stream where it was.
    fn probe_explicit_vr<R>(&self, source: &mut ByteSource<R>) -> Result<bool>
    where
        R: Read + Seek,
    {
        let position = source.position();
        source.skip(4).context(ProbeEncodingSnafu { position })?;
        let mut symbol = [0u8; 2];
        source
            .read_exact(&mut symbol)
            .context(ProbeEncodingSnafu { position })?;
        source.undo(6).context(ProbeEncodingSnafu { position })?;
        Ok(VR::from_symbol(symbol).is_some())
    }

    /// Decide the byte order of the data set proper
    /// by interpreting the tag at the current position both ways
    /// and checking which of the two is a registered attribute.
    /// The stream is left where it was.
    fn probe_byte_order<R>(&self, source: &mut ByteSource<R>) -> Result<Endianness>
    where
        R: Read + Seek,
    {
        let position = source.position();
        let mut bytes = [0u8; 4];
        source
            .read_exact(&mut bytes)
            .context(ProbeByteOrderSnafu { position })?;
        source.undo(4).context(ProbeByteOrderSnafu { position })?;

        let tag_le = Tag(
            u16::from(bytes[0]) | (u16::from(bytes[1]) << 8),
            u16::from(bytes[2]) | (u16::from(bytes[3]) << 8),
        );
        let tag_be = tag_le.swap_bytes();

        // a group number in the hundreds is far more probable
        // than one in the thousands, e.g. 0008 rather than 0800
        let by_group_number = if tag_le.group() > 0xFF && tag_be.group() <= 0xFF {
            Endianness::Big
        } else {
            Endianness::Little
        };

        let endianness = match (self.dict.entry(tag_le), self.dict.entry(tag_be)) {
            // group length tags are often absent from the dictionary
            (None, None) if tag_le.is_group_length() => by_group_number,
            // an unregistered tag either way, assume little endian
            (None, None) => Endianness::Little,
            (Some(_), None) => Endianness::Little,
            (None, Some(_)) => Endianness::Big,
            (Some(_), Some(_)) => by_group_number,
        };
        debug!(
            "byte order probe at position {}: {:?} as LE, {:?} as BE -> {:?}",
            position, tag_le, tag_be, endianness
        );
        Ok(endianness)
    }

    /// Decode data elements until the given byte budget is exhausted,
    /// a delimiter terminates the scope,
    /// the handler requests a stop,
    /// or the source runs out of records.
    ///
    /// An undefined `max_length` means that the scope
    /// is only terminated by a delimiter or the end of the stream.
    /// Returns the number of bytes consumed.
    fn read_elements<R>(
        &mut self,
        source: &mut ByteSource<R>,
        max_length: Length,
        check_endian: bool,
    ) -> Result<u32>
    where
        R: Read + Seek,
    {
        let mut read_length: u32 = 0;
        let mut endian_checked = false;

        loop {
            if let Some(max) = max_length.get() {
                if read_length >= max {
                    break;
                }
            }
            if self.handler.should_stop() {
                break;
            }

            let tag = match self.read_tag(source) {
                Ok(tag) => tag,
                // no more records in this source
                Err(_) => break,
            };

            // The (0002,xxxx) file meta group is always little-endian
            // explicit-VR regardless of the data set proper, so the
            // encoding of the latter can only be decided at the first
            // tag past that group. Rewind and probe once.
            if check_endian && !endian_checked && tag.group() != 2 {
                let position = source.position();
                source.undo(4).context(SeekSourceSnafu { position })?;

                let endianness = self.probe_byte_order(source)?;
                self.endianness = endianness;
                self.handler.on_endianness(endianness);

                // some generators write explicit VRs in the meta group
                // and implicit VRs in the data set proper, so the VR
                // encoding has to be probed again as well
                let explicit_vr = self.probe_explicit_vr(source)?;
                self.explicit_vr = explicit_vr;
                self.handler.on_encoding(explicit_vr);

                endian_checked = true;
                continue;
            }
            read_length += 4;

            if tag.is_sequence_delimiter() {
                let position = source.position();
                source.skip(4).context(ReadDelimiterSnafu { position })?;
                read_length += 4;
                if self.handler.want_element(tag) {
                    self.handler.on_element(DataElement::marker(
                        tag,
                        self.endianness,
                        Length(0),
                    ));
                }
                break;
            }

            if tag.is_item_delimiter() {
                let position = source.position();
                source.skip(4).context(ReadDelimiterSnafu { position })?;
                read_length += 4;
                if self.handler.want_element(tag) {
                    self.handler.on_element(DataElement::marker(
                        tag,
                        self.endianness,
                        Length(0),
                    ));
                }
                continue;
            }

            if tag.is_item() {
                let position = source.position();
                let item_length = self
                    .read_u32(source)
                    .context(ReadDelimiterSnafu { position })?;
                read_length += 4;
                if self.handler.want_element(tag) {
                    self.handler.on_element(DataElement::marker(
                        tag,
                        self.endianness,
                        Length(item_length),
                    ));
                }
                // The item length is informational only. An undefined
                // length is closed by an item delimiter, and a defined
                // one ends within the enclosing sequence's budget.
                continue;
            }

            let position = source.position();

            let vr = if self.explicit_vr {
                let mut symbol = [0u8; 2];
                source
                    .read_exact(&mut symbol)
                    .context(ReadVrSnafu { position })?;
                read_length += 2;
                match VR::from_symbol(symbol) {
                    Some(vr) => vr,
                    None => {
                        warn!(
                            "abandoning scope: invalid VR symbol {:?} at position {}",
                            symbol, position
                        );
                        return InvalidVrSnafu { symbol, position }.fail();
                    }
                }
            } else if tag.is_group_length() {
                // group length elements are always UL
                VR::UL
            } else {
                match self.dict.vr_of(tag) {
                    Some(vr) => vr,
                    None => {
                        warn!(
                            "abandoning scope: no VR for tag {} in an implicit-VR data set",
                            tag
                        );
                        return UnresolvedVrSnafu { tag, position }.fail();
                    }
                }
            };

            let length: u32 = if self.explicit_vr {
                let short = self
                    .read_u16(source)
                    .context(ReadLengthSnafu { tag, position })?;
                read_length += 2;
                if short != 0 {
                    u32::from(short)
                } else if vr.has_long_length() {
                    // the zeroed 16 bits were the reserved field,
                    // the value length follows as 32 bits
                    let long = self
                        .read_u32(source)
                        .context(ReadLengthSnafu { tag, position })?;
                    read_length += 4;
                    long
                } else {
                    0
                }
            } else {
                let long = self
                    .read_u32(source)
                    .context(ReadLengthSnafu { tag, position })?;
                read_length += 4;
                long
            };

            if vr == VR::SQ {
                let mut sequence = DataSet::new(tag, self.endianness);
                sequence.set_explicit_vr(self.explicit_vr);
                sequence.set_length(Length(length));
                self.handler.on_sequence_start(sequence);
                if length > 0 {
                    // an undefined length (0xFFFF_FFFF) also enters here;
                    // the nested scope then runs until its delimiter
                    read_length += self.read_elements(source, Length(length), false)?;
                }
                self.handler.on_sequence_end();
                continue;
            }

            ensure!(
                length != UNDEFINED_LENGTH,
                UndefinedValueLengthSnafu { tag, position }
            );

            if self.handler.want_element(tag) {
                let mut data = vec![0; length as usize];
                source.read_exact(&mut data).context(ReadValueDataSnafu {
                    tag,
                    length,
                    position,
                })?;
                self.handler.on_element(DataElement::with_value(
                    tag,
                    vr,
                    self.endianness,
                    data,
                ));
            } else {
                // unwanted values are consumed without materializing
                source
                    .skip(u64::from(length))
                    .context(ReadValueDataSnafu {
                        tag,
                        length,
                        position,
                    })?;
            }
            read_length += length;
        }

        Ok(read_length)
    }

    /// Read a tag in the byte order of the data set.
    fn read_tag<R>(&self, source: &mut ByteSource<R>) -> std::io::Result<Tag>
    where
        R: Read + Seek,
    {
        let group = self.read_u16(source)?;
        let element = self.read_u16(source)?;
        Ok(Tag(group, element))
    }

    /// Read an unsigned 16-bit integer in the byte order of the data set.
    fn read_u16<R>(&self, source: &mut ByteSource<R>) -> std::io::Result<u16>
    where
        R: Read + Seek,
    {
        let value = source.read_u16()?;
        Ok(match self.endianness {
            Endianness::Little => value,
            Endianness::Big => value.swap_bytes(),
        })
    }

    /// Read an unsigned 32-bit integer in the byte order of the data set.
    fn read_u32<R>(&self, source: &mut ByteSource<R>) -> std::io::Result<u32>
    where
        R: Read + Seek,
    {
        let value = source.read_u32()?;
        Ok(match self.endianness {
            Endianness::Little => value,
            Endianness::Big => value.swap_bytes(),
        })
    }
}
