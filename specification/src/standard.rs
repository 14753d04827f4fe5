use super::{ElementDescriptor, ElementType};

pub const EBML: ElementDescriptor = ElementDescriptor::new("EBML", 0x1A45DFA3, ElementType::Master);
pub const EBML_VERSION: ElementDescriptor = ElementDescriptor::new("EBMLVersion", 0x4286, ElementType::UnsignedInt);
pub const EBML_READ_VERSION: ElementDescriptor = ElementDescriptor::new("EBMLReadVersion", 0x42F7, ElementType::UnsignedInt);
pub const EBML_MAX_ID_LENGTH: ElementDescriptor = ElementDescriptor::new("EBMLMaxIDLength", 0x42F2, ElementType::UnsignedInt);
pub const EBML_MAX_SIZE_LENGTH: ElementDescriptor = ElementDescriptor::new("EBMLMaxSizeLength", 0x42F3, ElementType::UnsignedInt);
pub const DOC_TYPE: ElementDescriptor = ElementDescriptor::new("DocType", 0x4282, ElementType::Utf8);
pub const DOC_TYPE_VERSION: ElementDescriptor = ElementDescriptor::new("DocTypeVersion", 0x4287, ElementType::UnsignedInt);
pub const DOC_TYPE_READ_VERSION: ElementDescriptor = ElementDescriptor::new("DocTypeReadVersion", 0x4285, ElementType::UnsignedInt);

/// Padding.  Its payload is ignored by readers and may be reused to grow neighbouring elements.
pub const VOID: ElementDescriptor = ElementDescriptor::new("Void", 0xEC, ElementType::Binary);
pub const CRC32: ElementDescriptor = ElementDescriptor::new("CRC-32", 0xBF, ElementType::Binary);

pub const ALL: &[&ElementDescriptor] = &[
    &EBML,
    &EBML_VERSION,
    &EBML_READ_VERSION,
    &EBML_MAX_ID_LENGTH,
    &EBML_MAX_SIZE_LENGTH,
    &DOC_TYPE,
    &DOC_TYPE_VERSION,
    &DOC_TYPE_READ_VERSION,
    &VOID,
    &CRC32,
];
