//!
//! Element descriptors for the EBML header and the Matroska elements this crate works with.
//!
//! The catalog lives in the `ebml-editable-specification` crate and is re-exported here.
//!

pub use ebml_editable_specification::ElementType as ElementType;
pub use ebml_editable_specification::ElementDescriptor as ElementDescriptor;
pub use ebml_editable_specification::get_descriptor as get_descriptor;
pub use ebml_editable_specification::standard as standard;
pub use ebml_editable_specification::matroska as matroska;
