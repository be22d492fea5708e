use super::codec::{FieldReading, decode_field};
use super::error::DecodeError;
use super::layout::{FieldKind, layout_for};
use super::reader::PayloadReader;
use crate::{DecodedRecord, FieldValue, LocationEntry};

/// Decode a sensor payload received on `port`.
///
/// Fields enabled by the port layout are read in payload order from a
/// cursor starting at byte 0. Bytes past the last field are ignored.
///
/// # Examples
/// ```
/// use sensorport_core::{DecodeError, decode};
///
/// assert!(matches!(decode(&[], 999), Err(DecodeError::UnknownPort { port: 999 })));
/// ```
pub fn decode(payload: &[u8], port: u32) -> Result<DecodedRecord, DecodeError> {
    let layout = layout_for(port).ok_or(DecodeError::UnknownPort { port })?;
    let reader = PayloadReader::new(payload);
    reader.require_len(layout.payload_len())?;

    let mut record = DecodedRecord::default();
    let mut cursor = 0usize;
    for field in layout.fields() {
        let schema = field.schema();
        let reading = decode_field(schema, payload, cursor)?;
        tracing::debug!(port, field = field.name(), offset = cursor, ?reading, "decoded field");
        record.insert(field, into_value(field, reading));
        cursor += schema.total_bytes();
    }

    if reader.len() > cursor {
        tracing::debug!(
            port,
            consumed = cursor,
            trailing = reader.len() - cursor,
            "ignoring trailing payload bytes"
        );
    }
    Ok(record)
}

fn into_value(field: FieldKind, reading: FieldReading) -> FieldValue {
    match (field, reading) {
        (FieldKind::Location, FieldReading::Multiple(values)) => {
            let lat = values.first().copied().flatten();
            let lng = values.get(1).copied().flatten();
            FieldValue::Location(LocationEntry::new(lat, lng))
        }
        (_, FieldReading::Single(Some(value))) => FieldValue::Number(value),
        (_, FieldReading::Single(None)) => FieldValue::Invalid,
        (_, FieldReading::Multiple(values)) => FieldValue::List(values),
    }
}
