//!
//! Contains a number of tools that are useful when encoding and decoding EBML element payloads.
//!

use std::convert::TryInto;

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::errors::tools::ToolError;

/// Seconds between the unix epoch and 2001-01-01T00:00:00 UTC, the origin of EBML dates.
const EBML_EPOCH_UNIX_SECONDS: i64 = 978_307_200;

///
/// Returns 2001-01-01T00:00:00 UTC, the instant an EBML date of `0` refers to.
///
pub fn ebml_epoch() -> DateTime<Utc> {
    Utc.timestamp_nanos(EBML_EPOCH_UNIX_SECONDS * 1_000_000_000)
}

///
/// Reads a `u64` value from any length array slice.
///
/// Rather than forcing the input to be a `[u8; 8]` like standard library methods, this can interpret a `u64` from a slice of any length <= 8.  Bytes are big-endian - i.e. an array of `[4, 0]` would return a value of `1024`.  An empty slice reads as `0`.
///
/// # Errors
///
/// This method will return an error if the input slice has a length > 8.
///
/// ## Example
///
/// ```
/// # use ebml_editable::tools::arr_to_u64;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let result = arr_to_u64(&[16,0])?;
/// assert_eq!(result, 4096);
/// # Ok(())
/// # }
/// ```
///
pub fn arr_to_u64(arr: &[u8]) -> Result<u64, ToolError> {
    if arr.len() > 8 {
        return Err(ToolError::ReadU64Overflow(Vec::from(arr)));
    }

    Ok(arr.iter().fold(0u64, |val, byte| (val << 8) | *byte as u64))
}

///
/// Reads an `i64` value from any length array slice, sign extending from the most significant byte.
///
/// ## Example
///
/// ```
/// # use ebml_editable::tools::arr_to_i64;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// assert_eq!(arr_to_i64(&[4,0])?, 1024);
/// assert_eq!(arr_to_i64(&[0xFF, 0xFE])?, -2);
/// # Ok(())
/// # }
/// ```
///
pub fn arr_to_i64(arr: &[u8]) -> Result<i64, ToolError> {
    if arr.len() > 8 {
        return Err(ToolError::ReadI64Overflow(Vec::from(arr)));
    }

    let fill = match arr.first() {
        Some(first) if *first > 127 => 0xFF,
        _ => 0x00,
    };
    let mut bytes = [fill; 8];
    bytes[(8 - arr.len())..].copy_from_slice(arr);
    Ok(i64::from_be_bytes(bytes))
}

///
/// Reads an `f64` value from an array slice of length 4 or 8.
///
/// This method wraps `f32` and `f64` conversions from big endian byte arrays and casts the result as an `f64`.
///
/// # Errors
///
/// This method will return an error if the input slice length is not 4 or 8.
///
pub fn arr_to_f64(arr: &[u8]) -> Result<f64, ToolError> {
    match arr.len() {
        4 => Ok(f32::from_be_bytes(arr.try_into().map_err(|_| ToolError::ReadF64Mismatch(Vec::from(arr)))?) as f64),
        8 => Ok(f64::from_be_bytes(arr.try_into().map_err(|_| ToolError::ReadF64Mismatch(Vec::from(arr)))?)),
        _ => Err(ToolError::ReadF64Mismatch(Vec::from(arr))),
    }
}

///
/// Reads an EBML date: a signed count of nanoseconds relative to 2001-01-01T00:00:00 UTC.
///
/// An empty slice is the epoch itself.
///
/// # Errors
///
/// This method will return an error if the input slice length is not 0 or 8.
///
pub fn arr_to_date(arr: &[u8]) -> Result<DateTime<Utc>, ToolError> {
    let nanos = match arr.len() {
        0 => 0,
        8 => arr_to_i64(arr)?,
        _ => return Err(ToolError::ReadDateMismatch(Vec::from(arr))),
    };

    ebml_epoch().checked_add_signed(Duration::nanoseconds(nanos))
        .ok_or_else(|| ToolError::ReadDateMismatch(Vec::from(arr)))
}

///
/// Converts a date to its EBML payload representation.  Returns `None` if the date is too far from 2001-01-01 to be
/// expressed as an `i64` count of nanoseconds.
///
pub fn date_to_nanos(date: &DateTime<Utc>) -> Option<i64> {
    date.signed_duration_since(ebml_epoch()).num_nanoseconds()
}

///
/// Returns the shortest big-endian representation of an unsigned integer (at least one byte).
///
pub fn u64_to_arr(val: u64) -> Vec<u8> {
    let bytes = val.to_be_bytes();
    let skip = (val.leading_zeros() as usize / 8).min(7);
    bytes[skip..].to_vec()
}

///
/// Returns the shortest big-endian two's complement representation of a signed integer (at least one byte).
///
pub fn i64_to_arr(val: i64) -> Vec<u8> {
    let bytes = val.to_be_bytes();
    let mut skip = 0;
    while skip < 7 {
        let redundant = (bytes[skip] == 0x00 && bytes[skip + 1] & 0x80 == 0) ||
            (bytes[skip] == 0xFF && bytes[skip + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        skip += 1;
    }
    bytes[skip..].to_vec()
}
