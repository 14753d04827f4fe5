//! This crate provides a reader, a writer and an in-place metadata editor for [EBML][EBML] files.
//! 
//! [EBML][EBML] stands for Extensible Binary Meta-Language and is somewhat of a
//! binary version of XML. It's used for container formats like [WebM][webm] or
//! [MKV][mkv].
//! 
//! # Overview
//! * [`vint`] encodes and decodes the variable-length integers used for element ids and sizes.
//! * [`ElementReader`] walks the element tree of a seekable source, entering and leaving master elements and decoding scalar payloads on demand.  Payloads that aren't read are skipped by seeking past them.
//! * [`ElementWriter`] serializes elements.  Master elements are written with a placeholder size that gets backpatched once the element is finished.
//! * [`SegmentInfoUpdater`] edits the title, writing/muxing application and duration of a Matroska file without rewriting it, by growing or shrinking the Info element into the Void element next to it.
//! 
//! # Unknown Sizes
//! Elements declaring an "Unknown Data Size" as defined in [RFC8794][rfc8794] are read as extending to the end of their container (or of the source).  The writer never produces them except as a temporary placeholder.
//! 
//! [EBML]: http://ebml.sourceforge.net/
//! [webm]: https://www.webmproject.org/
//! [mkv]: http://www.matroska.org/technical/specs/index.html
//! [rfc8794]: https://datatracker.ietf.org/doc/rfc8794/
//! 

mod errors;
mod reader_util;
mod element_reader;
mod element_writer;
mod segment_info;
pub mod vint;
pub mod tools;
pub mod specs;
pub mod values;

pub use self::element_reader::{ElementHeader, ElementReader};
pub use self::element_writer::{ElementWriter, MasterElementWriter, DEFAULT_MASTER_SIZE_WIDTH};
pub use self::segment_info::{Filler, SegmentInfoUpdater};
pub use self::reader_util::{AllowableErrors, ElementSize};
pub use self::values::ElementValue;

pub mod error {
    //!
    //! Errors returned by the modules of this crate.
    //!

    pub use super::errors::vint;
    pub use super::errors::tools;
    pub use super::errors::element_reader;
    pub use super::errors::element_writer;
    pub use super::errors::segment_info;
}
