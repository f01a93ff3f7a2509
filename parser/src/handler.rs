//! Read handlers: the strategy objects which receive decoder events.
//!
//! The decoder owns no elements. Every constructed record is handed
//! over to the handler, which decides whether to attach it to a target
//! data set, print it, or discard it. Handlers can also skip the
//! construction of unwanted values and request an early stop.

use std::io::Write;

use byteordered::Endianness;
use minidicom_core::dictionary::DataDictionary;
use minidicom_core::{DataElement, DataSet, Tag, VR};
use minidicom_dictionary_std::StandardDataDictionary;

/// The capability set of a decoder event sink.
///
/// Events arrive in strict file order. For sequence elements,
/// [`on_sequence_start`](ReadHandler::on_sequence_start) precedes all
/// child events and [`on_sequence_end`](ReadHandler::on_sequence_end)
/// follows them; the sequence node is owned by the handler from the
/// start event onwards.
pub trait ReadHandler {
    /// Whether the decoder should stop before the next record.
    /// Polled at the top of each element iteration.
    fn should_stop(&self) -> bool {
        false
    }

    /// Called when the VR encoding of the stream is detected,
    /// possibly twice: once for the file meta group and once more
    /// for the data set proper.
    fn on_encoding(&mut self, _explicit_vr: bool) {}

    /// Called once when the byte order of the data set proper
    /// is detected.
    fn on_endianness(&mut self, _endianness: Endianness) {}

    /// Whether the value of the element with the given tag should be
    /// materialized. Returning `false` skips buffer allocation
    /// entirely, but the value bytes are still consumed.
    fn want_element(&mut self, _tag: Tag) -> bool {
        true
    }

    /// Receive ownership of a decoded element.
    fn on_element(&mut self, _element: DataElement) {}

    /// Receive ownership of a freshly opened sequence node.
    /// Elements delivered until the matching
    /// [`on_sequence_end`](ReadHandler::on_sequence_end) are its children.
    fn on_sequence_start(&mut self, _sequence: DataSet) {}

    /// The most recently opened sequence node is complete.
    fn on_sequence_end(&mut self) {}
}

/// A handler which retains every record,
/// building the full element tree in a caller-owned root data set.
#[derive(Debug)]
pub struct FullReadHandler<'a> {
    root: &'a mut DataSet,
    open: Vec<DataSet>,
}

impl<'a> FullReadHandler<'a> {
    /// Create a handler appending to the given root data set.
    pub fn new(root: &'a mut DataSet) -> Self {
        FullReadHandler {
            root,
            open: Vec::new(),
        }
    }

    fn attach_element(&mut self, element: DataElement) {
        match self.open.last_mut() {
            Some(sequence) => sequence.push_element(element),
            None => self.root.push_element(element),
        }
    }
}

impl ReadHandler for FullReadHandler<'_> {
    fn on_encoding(&mut self, explicit_vr: bool) {
        self.root.set_explicit_vr(explicit_vr);
    }

    fn on_endianness(&mut self, endianness: Endianness) {
        self.root.set_endianness(endianness);
    }

    fn on_element(&mut self, element: DataElement) {
        self.attach_element(element);
    }

    fn on_sequence_start(&mut self, sequence: DataSet) {
        self.open.push(sequence);
    }

    fn on_sequence_end(&mut self) {
        if let Some(sequence) = self.open.pop() {
            match self.open.last_mut() {
                Some(parent) => parent.push_sequence(sequence),
                None => self.root.push_sequence(sequence),
            }
        }
    }
}

/// A handler which retains only the elements with the wanted tags,
/// attaching matches flat to a caller-owned root data set.
///
/// Unwanted values are never materialized,
/// and decoding stops as soon as the last wanted tag has been seen,
/// so extracting a handful of attributes from a large file
/// costs little more memory than the extracted values themselves.
#[derive(Debug)]
pub struct TagsReadHandler<'a> {
    root: &'a mut DataSet,
    wanted: Vec<Tag>,
}

impl<'a> TagsReadHandler<'a> {
    /// Create a handler with an empty wanted set,
    /// appending matches to the given root data set.
    pub fn new(root: &'a mut DataSet) -> Self {
        TagsReadHandler {
            root,
            wanted: Vec::new(),
        }
    }

    /// Register a tag to extract. The order of registration
    /// does not matter.
    pub fn add_tag(&mut self, tag: Tag) -> &mut Self {
        if let Err(i) = self.wanted.binary_search(&tag) {
            self.wanted.insert(i, tag);
        }
        self
    }

    /// The tags which have not been seen yet.
    pub fn remaining(&self) -> &[Tag] {
        &self.wanted
    }
}

impl ReadHandler for TagsReadHandler<'_> {
    fn should_stop(&self) -> bool {
        self.wanted.is_empty()
    }

    fn on_encoding(&mut self, explicit_vr: bool) {
        self.root.set_explicit_vr(explicit_vr);
    }

    fn on_endianness(&mut self, endianness: Endianness) {
        self.root.set_endianness(endianness);
    }

    fn want_element(&mut self, tag: Tag) -> bool {
        self.wanted.binary_search(&tag).is_ok()
    }

    fn on_element(&mut self, element: DataElement) {
        if let Ok(i) = self.wanted.binary_search(&element.tag()) {
            self.wanted.remove(i);
            self.root.push_element(element);
        }
    }
}

/// A handler which prints a human readable line per record
/// and retains nothing.
#[derive(Debug)]
pub struct DumpReadHandler<W> {
    out: W,
    depth: usize,
}

impl<W> DumpReadHandler<W>
where
    W: Write,
{
    /// Create a handler printing to the given writer.
    pub fn new(out: W) -> Self {
        DumpReadHandler { out, depth: 0 }
    }

    fn print_line(&mut self, tag: Tag, vr: VR, details: &str) {
        let name = StandardDataDictionary
            .name_of(tag)
            .unwrap_or("(unregistered)");
        let indent = "  ".repeat(self.depth);
        // dump output is best effort, a broken pipe is not our problem
        let _ = writeln!(self.out, "{}{} {} {} {}", indent, tag, vr, name, details);
    }
}

/// Render the element's value for presentation,
/// through the first typed accessor compatible with its VR.
pub fn format_value(element: &DataElement) -> String {
    if let Some(s) = element.to_str() {
        return format!("\"{}\"", s);
    }
    if let Some(v) = element.to_u16() {
        return v.to_string();
    }
    if let Some(v) = element.to_i16() {
        return v.to_string();
    }
    if let Some(v) = element.to_u32() {
        return v.to_string();
    }
    if let Some(v) = element.to_i32() {
        return v.to_string();
    }
    if let Some(v) = element.to_f32() {
        return v.to_string();
    }
    if let Some(v) = element.to_f64() {
        return v.to_string();
    }
    if element.data().is_empty() {
        String::new()
    } else {
        format!("<{} bytes>", element.data().len())
    }
}

impl<W> ReadHandler for DumpReadHandler<W>
where
    W: Write,
{
    fn on_element(&mut self, element: DataElement) {
        let details = format!("#{} {}", element.length(), format_value(&element));
        self.print_line(element.tag(), element.vr(), details.trim_end());
    }

    fn on_sequence_start(&mut self, sequence: DataSet) {
        let details = format!("#{}", sequence.length());
        self.print_line(sequence.tag(), VR::SQ, &details);
        self.depth += 1;
    }

    fn on_sequence_end(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
