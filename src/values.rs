//!
//! Contains the decoded content of a scalar element.
//!
//! Produced by [`ElementReader::read_value`][`super::ElementReader::read_value`] and consumed by
//! [`ElementWriter::write_value`][`super::ElementWriter::write_value`].
//!

use chrono::{DateTime, Utc};

use super::specs::ElementType;

///
/// The payload of a non-master element, tagged with its kind.
///
#[derive(PartialEq, Debug, Clone)]
pub enum ElementValue {

    ///
    /// An unsigned integer.
    ///
    UnsignedInt(u64),

    ///
    /// A signed integer.
    ///
    Integer(i64),

    ///
    /// A Unicode text string.  ASCII strings are read and written through this variant as well.
    ///
    Utf8(String),

    ///
    /// Binary data, otherwise uninterpreted.
    ///
    Binary(Vec<u8>),

    ///
    /// IEEE-754 floating point number.  Single precision payloads are widened.
    ///
    Float(f64),

    ///
    /// A point in time, stored in the stream as nanoseconds relative to 2001-01-01T00:00:00 UTC.
    ///
    Date(DateTime<Utc>),
}

impl ElementValue {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementValue::UnsignedInt(_) => ElementType::UnsignedInt,
            ElementValue::Integer(_) => ElementType::Integer,
            ElementValue::Utf8(_) => ElementType::Utf8,
            ElementValue::Binary(_) => ElementType::Binary,
            ElementValue::Float(_) => ElementType::Float,
            ElementValue::Date(_) => ElementType::Date,
        }
    }

    pub fn unsigned_int(&self) -> Option<u64> {
        match &self {
            ElementValue::UnsignedInt(val) => Some(*val),
            _ => None
        }
    }

    pub fn integer(&self) -> Option<i64> {
        match &self {
            ElementValue::Integer(val) => Some(*val),
            _ => None
        }
    }

    pub fn utf8(&self) -> Option<&str> {
        match self {
            ElementValue::Utf8(val) => Some(val),
            _ => None
        }
    }

    pub fn binary(&self) -> Option<&[u8]> {
        match self {
            ElementValue::Binary(val) => Some(val),
            _ => None
        }
    }

    pub fn float(&self) -> Option<f64> {
        match &self {
            ElementValue::Float(val) => Some(*val),
            _ => None
        }
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        match &self {
            ElementValue::Date(val) => Some(*val),
            _ => None
        }
    }
}
