//! This crate provides the element catalog used by the ebml-editable crate.
//!
//! The codec itself only needs to recognize a handful of identifiers (Void, Segment and Info), but callers walking a
//! document usually want to know how to interpret the payload of the element they are positioned on.  The descriptors
//! defined here map an encoded element identifier to a name and a value kind.
//!

///
/// Standard EBML elements that may appear in any EBML document.
///
pub mod standard;

///
/// The subset of the Matroska element catalog used when reading and updating segment information.
///
pub mod matroska;

///
/// Different data types defined in the EBML specification.
///
/// This is a closed set - a reader decodes a payload by matching on the kind rather than by inspecting the bytes.
///
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ElementType {
    Master,
    UnsignedInt,
    Integer,
    Utf8,
    Binary,
    Float,
    Date,
}

///
/// Describes a single element of a specification: its name, its identifier (with the vint marker bits included, as it
/// appears in the stream) and the type of data it holds.
///
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ElementDescriptor {
    pub name: &'static str,
    pub id: u64,
    pub element_type: ElementType,
}

impl ElementDescriptor {
    pub const fn new(name: &'static str, id: u64, element_type: ElementType) -> Self {
        ElementDescriptor { name, id, element_type }
    }

    pub fn is_master(&self) -> bool {
        matches!(self.element_type, ElementType::Master)
    }
}

///
/// Looks up the descriptor for an encoded element id in the standard and Matroska catalogs.
///
/// Returns [`None`] for identifiers that aren't catalogued.
///
/// ```
/// use ebml_editable_specification::{get_descriptor, ElementType};
///
/// let info = get_descriptor(0x1549A966).unwrap();
/// assert_eq!("Info", info.name);
/// assert_eq!(ElementType::Master, info.element_type);
/// assert!(get_descriptor(0xFB).is_none());
/// ```
///
pub fn get_descriptor(id: u64) -> Option<&'static ElementDescriptor> {
    standard::ALL.iter()
        .chain(matroska::ALL.iter())
        .copied()
        .find(|d| d.id == id)
}
