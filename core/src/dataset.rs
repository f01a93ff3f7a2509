//! The tree of parsed data elements.
//!
//! A [`DataSet`] owns an ordered sequence of child nodes,
//! each of which is either a leaf [`DataElement`]
//! or a nested data set built from a sequence (`SQ`) element.
//! A whole DICOM file is modeled as a root data set with an empty tag.

use byteordered::Endianness;

use crate::element::DataElement;
use crate::header::{Length, Tag, VR};

/// A node of the element tree: either a leaf data element
/// or a nested data set originating from a sequence element.
/// Nodes are owned exclusively by their parent data set.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSetNode {
    /// A leaf data element, owning its value bytes.
    Element(DataElement),
    /// A nested data set built from a sequence element.
    Sequence(DataSet),
}

/// An ordered collection of parsed data elements.
///
/// Children appear in the order they were read from the file,
/// and lookup by tag is a linear scan.
/// A data set built from a sequence element carries that element's tag;
/// the root data set of a file has the empty tag `(0000,0000)`
/// and records the encoding detected for the file
/// (byte order and whether VRs were explicit).
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    tag: Tag,
    length: Length,
    endianness: Endianness,
    explicit_vr: bool,
    nodes: Vec<DataSetNode>,
}

impl Default for DataSet {
    fn default() -> Self {
        DataSet::new(Tag(0, 0), Endianness::Little)
    }
}

impl DataSet {
    /// Create an empty data set.
    /// The length defaults to undefined,
    /// which is the natural extent of a delimited data set.
    pub fn new(tag: Tag, endianness: Endianness) -> Self {
        DataSet {
            tag,
            length: Length::UNDEFINED,
            endianness,
            explicit_vr: true,
            nodes: Vec::new(),
        }
    }

    /// Retrieve the tag of the sequence element this data set came from,
    /// or the empty tag for a root data set.
    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The value representation of a data set is always `SQ`,
    /// except for the root data set, which has no resolvable VR.
    #[inline]
    pub fn vr(&self) -> VR {
        if self.tag == Tag(0, 0) {
            VR::Unknown
        } else {
            VR::SQ
        }
    }

    /// Retrieve the declared value length of the originating element.
    #[inline]
    pub fn length(&self) -> Length {
        self.length
    }

    /// Set the declared value length of the originating element.
    pub fn set_length(&mut self, length: Length) {
        self.length = length;
    }

    /// Retrieve the byte order of the elements in this data set.
    #[inline]
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Set the byte order of the elements in this data set.
    pub fn set_endianness(&mut self, endianness: Endianness) {
        self.endianness = endianness;
    }

    /// Whether the elements of this data set carry their VR on the wire.
    #[inline]
    pub fn explicit_vr(&self) -> bool {
        self.explicit_vr
    }

    /// Set whether the elements of this data set carry their VR on the wire.
    pub fn set_explicit_vr(&mut self, explicit_vr: bool) {
        self.explicit_vr = explicit_vr;
    }

    /// Retrieve the child nodes in file order.
    #[inline]
    pub fn nodes(&self) -> &[DataSetNode] {
        &self.nodes
    }

    /// The number of direct child nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether this data set has no children.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Retrieve the child node at the given position, if it exists.
    pub fn node_at(&self, index: usize) -> Option<&DataSetNode> {
        self.nodes.get(index)
    }

    /// Append a leaf element to this data set.
    pub fn push_element(&mut self, element: DataElement) {
        self.nodes.push(DataSetNode::Element(element));
    }

    /// Append a nested data set to this data set.
    pub fn push_sequence(&mut self, sequence: DataSet) {
        self.nodes.push(DataSetNode::Sequence(sequence));
    }

    /// Remove all children and reset the recorded encoding.
    pub fn clear(&mut self) {
        self.endianness = Endianness::Little;
        self.explicit_vr = true;
        self.nodes.clear();
    }

    /// Look up a direct child element by tag, by linear scan.
    pub fn get(&self, tag: Tag) -> Option<&DataElement> {
        self.nodes.iter().find_map(|node| match node {
            DataSetNode::Element(e) if e.tag() == tag => Some(e),
            _ => None,
        })
    }

    /// Look up a direct child sequence by tag, by linear scan.
    pub fn sequence(&self, tag: Tag) -> Option<&DataSet> {
        self.nodes.iter().find_map(|node| match node {
            DataSetNode::Sequence(ds) if ds.tag() == tag => Some(ds),
            _ => None,
        })
    }

    /// Retrieve the raw value bytes of a direct child element.
    pub fn buffer_of(&self, tag: Tag) -> Option<&[u8]> {
        self.get(tag).map(DataElement::data)
    }

    /// Retrieve the string value of a direct child element.
    pub fn string_of(&self, tag: Tag) -> Option<&str> {
        self.get(tag).and_then(DataElement::to_str)
    }

    /// Retrieve the unsigned 16-bit value of a direct child element.
    pub fn u16_of(&self, tag: Tag) -> Option<u16> {
        self.get(tag).and_then(DataElement::to_u16)
    }

    /// Retrieve the signed 16-bit value of a direct child element.
    pub fn i16_of(&self, tag: Tag) -> Option<i16> {
        self.get(tag).and_then(DataElement::to_i16)
    }

    /// Retrieve the unsigned 32-bit value of a direct child element.
    pub fn u32_of(&self, tag: Tag) -> Option<u32> {
        self.get(tag).and_then(DataElement::to_u32)
    }

    /// Retrieve the signed 32-bit value of a direct child element.
    pub fn i32_of(&self, tag: Tag) -> Option<i32> {
        self.get(tag).and_then(DataElement::to_i32)
    }

    /// Retrieve the 32-bit floating point value of a direct child element.
    pub fn f32_of(&self, tag: Tag) -> Option<f32> {
        self.get(tag).and_then(DataElement::to_f32)
    }

    /// Retrieve the 64-bit floating point value of a direct child element.
    pub fn f64_of(&self, tag: Tag) -> Option<f64> {
        self.get(tag).and_then(DataElement::to_f64)
    }

    /// Walk the tree in file order,
    /// announcing nested data sets before descending into them.
    pub fn accept<V>(&self, visitor: &mut V)
    where
        V: Visit,
    {
        for node in &self.nodes {
            match node {
                DataSetNode::Element(e) => visitor.visit_data_element(e),
                DataSetNode::Sequence(ds) => {
                    visitor.visit_data_set(ds);
                    ds.accept(visitor);
                }
            }
        }
    }
}

impl std::ops::Index<usize> for DataSet {
    type Output = DataSetNode;

    fn index(&self, index: usize) -> &Self::Output {
        &self.nodes[index]
    }
}

/// A read-side traversal over an assembled data set.
///
/// [`DataSet::accept`] calls [`visit_data_element`](Visit::visit_data_element)
/// on leaves and [`visit_data_set`](Visit::visit_data_set) on nested
/// sequences, in file order. Implementations that accumulate state across
/// the tree are responsible for their own re-entrancy.
pub trait Visit {
    /// Called for every leaf element.
    fn visit_data_element(&mut self, element: &DataElement);

    /// Called for every nested data set, before its children.
    fn visit_data_set(&mut self, data_set: &DataSet);
}
