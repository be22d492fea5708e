//! Field-level decoding primitives.
//!
//! Raw integers are assembled big-endian into an `i128`, wide enough for any
//! supported width (1 to 8 bytes per value) in both signed and unsigned
//! interpretation. Other widths are rejected with
//! [`DecodeError::UnsupportedWidth`].

use super::error::DecodeError;
use super::reader::PayloadReader;
use super::schema::{FieldSchema, MAX_BYTES_PER_VALUE};

/// Decoded sub-values of one field; `None` marks a sentinel-invalid reading.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldReading {
    Single(Option<f64>),
    Multiple(Vec<Option<f64>>),
}

/// Read `width` bytes at `start_offset`, most significant byte first.
///
/// With `signed` the bytes are read as a `width * 8`-bit two's-complement
/// integer and sign-extended. `width` must be within `1..=8`.
///
/// # Examples
/// ```
/// use sensorport_core::payload::extract_integer;
///
/// assert_eq!(extract_integer(&[0xFF, 0xFF], 0, 2, true).unwrap(), -1);
/// assert_eq!(extract_integer(&[0xFF, 0xFF], 0, 2, false).unwrap(), 65_535);
/// ```
pub fn extract_integer(
    buffer: &[u8],
    start_offset: usize,
    width: usize,
    signed: bool,
) -> Result<i128, DecodeError> {
    check_width(width)?;
    let bytes = PayloadReader::new(buffer).read_span(start_offset, width)?;
    let unsigned = bytes
        .iter()
        .fold(0u128, |acc, byte| (acc << 8) | u128::from(*byte));
    if !signed {
        return Ok(unsigned as i128);
    }
    let shift = 128 - 8 * width as u32;
    Ok(((unsigned << shift) as i128) >> shift)
}

fn check_width(width: usize) -> Result<(), DecodeError> {
    if width == 0 || width > MAX_BYTES_PER_VALUE {
        return Err(DecodeError::UnsupportedWidth { width });
    }
    Ok(())
}

/// Raw value a device sends for "no reading": `0xFF` repeated for unsigned
/// fields, `0x7F` repeated for signed ones.
///
/// The signed pattern is the firmware convention, not the two's-complement
/// maximum for widths above one byte. Keep it as is.
pub fn sentinel(width: usize, signed: bool) -> Result<i128, DecodeError> {
    check_width(width)?;
    let pattern: u128 = if signed { 0x7F } else { 0xFF };
    let value = (0..width).fold(0u128, |acc, _| (acc << 8) | pattern);
    Ok(value as i128)
}

/// Whether `raw` carries a reading. Single-byte fields have no spare
/// encoding for a sentinel and are always valid.
pub fn is_valid(raw: i128, width: usize, signed: bool) -> Result<bool, DecodeError> {
    check_width(width)?;
    if width == 1 {
        return Ok(true);
    }
    Ok(raw != sentinel(width, signed)?)
}

/// Decode every sub-value of `schema` starting at `start_offset`.
///
/// The whole span is bounds-checked before any value is produced.
pub fn decode_field(
    schema: &FieldSchema,
    buffer: &[u8],
    start_offset: usize,
) -> Result<FieldReading, DecodeError> {
    let reader = PayloadReader::new(buffer);
    reader.read_span(start_offset, schema.total_bytes())?;

    let width = schema.bytes_per_value();
    let mut values = Vec::with_capacity(schema.value_count());
    for index in 0..schema.value_count() {
        let raw = extract_integer(buffer, start_offset + index * width, width, schema.signed())?;
        let value = if is_valid(raw, width, schema.signed())? {
            Some(scale(raw, schema))
        } else {
            None
        };
        values.push(value);
    }

    if values.len() == 1 {
        return Ok(FieldReading::Single(values[0]));
    }
    Ok(FieldReading::Multiple(values))
}

fn scale(raw: i128, schema: &FieldSchema) -> f64 {
    let value = raw as f64 / schema.scale_factor();
    match schema.round_decimals() {
        Some(decimals) => round_to(value, decimals),
        None => value,
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(i32::MAX as u32) as i32);
    let shifted = value * factor;
    if !factor.is_finite() || !shifted.is_finite() {
        return value;
    }
    shifted.round() / factor
}
