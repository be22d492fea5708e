//! SensorPort core library for decoding LoRaWAN sensor telemetry.
//!
//! Devices pack a fixed set of sensor readings into a compact big-endian
//! payload; the LoRaWAN port number selects which readings are present.
//! This crate turns such a payload back into named, scaled values:
//! the `payload` module holds the byte-level decoder (layout/schema/reader/
//! codec/parser), and the `uplink` module wraps it for network-server
//! uplink documents destined for a storage/visualization platform.
//!
//! Invariants:
//! - Fields are always packed in the global order battery, temperature,
//!   humidity, pressure, gas, location.
//! - A field that is present but carries the device's "no reading" sentinel
//!   decodes to `null`; a field the port does not carry is absent.
//! - Decoding is atomic: an unknown port or a short buffer yields an error
//!   and no record.
//!
//! # Examples
//! ```
//! use sensorport_core::{FieldValue, decode};
//!
//! let record = decode(&[0x0C, 0x80], 1)?;
//! assert_eq!(record.battery, Some(FieldValue::Number(3200.0)));
//! # Ok::<(), sensorport_core::DecodeError>(())
//! ```

use serde::Serialize;

pub mod payload;
pub mod uplink;

pub use payload::{DecodeError, FieldKind, FieldSchema, PORTS, PortLayout, decode, layout_for};
pub use uplink::{FormatOptions, Uplink, UplinkError, format_uplink};

/// Value stored under one field of a [`DecodedRecord`].
///
/// Serializes as a bare number, `null`, a list, or the location pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Scaled reading.
    Number(f64),
    /// Multi-value field other than location, in payload order.
    List(Vec<Option<f64>>),
    /// Latitude/longitude packaged for automatic geolocation.
    Location(LocationEntry),
    /// Present in the payload but flagged with the sentinel.
    Invalid,
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, FieldValue::Invalid)
    }
}

/// Location entry: a nominal `value` of 0 carrying coordinates as context.
///
/// # Examples
/// ```
/// use sensorport_core::LocationEntry;
///
/// let entry = LocationEntry::new(Some(10.0), Some(-20.0));
/// let json = serde_json::to_value(&entry).unwrap();
/// assert_eq!(json["value"], 0);
/// assert_eq!(json["context"]["lng"], -20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationEntry {
    pub value: u8,
    pub context: Coordinates,
}

impl LocationEntry {
    pub fn new(lat: Option<f64>, lng: Option<f64>) -> Self {
        Self {
            value: 0,
            context: Coordinates { lat, lng },
        }
    }
}

/// Latitude and longitude in degrees; `None` when the device sent the
/// sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Decoded sensor payload.
///
/// Fields the port does not carry are `None` and omitted from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodedRecord {
    /// Battery voltage in millivolts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<FieldValue>,
    /// Temperature in degrees Celsius.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<FieldValue>,
    /// Relative humidity in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<FieldValue>,
    /// Air pressure in pascals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<FieldValue>,
    /// Gas resistance in ohms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<FieldValue>,
}

impl DecodedRecord {
    pub fn get(&self, field: FieldKind) -> Option<&FieldValue> {
        self.slot(field).as_ref()
    }

    pub(crate) fn insert(&mut self, field: FieldKind, value: FieldValue) {
        *self.slot_mut(field) = Some(value);
    }

    /// Present fields in payload order.
    pub fn entries(&self) -> impl Iterator<Item = (FieldKind, &FieldValue)> + '_ {
        FieldKind::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    fn slot(&self, field: FieldKind) -> &Option<FieldValue> {
        match field {
            FieldKind::Battery => &self.battery,
            FieldKind::Temperature => &self.temperature,
            FieldKind::Humidity => &self.humidity,
            FieldKind::Pressure => &self.pressure,
            FieldKind::Gas => &self.gas,
            FieldKind::Location => &self.location,
        }
    }

    fn slot_mut(&mut self, field: FieldKind) -> &mut Option<FieldValue> {
        match field {
            FieldKind::Battery => &mut self.battery,
            FieldKind::Temperature => &mut self.temperature,
            FieldKind::Humidity => &mut self.humidity,
            FieldKind::Pressure => &mut self.pressure,
            FieldKind::Gas => &mut self.gas,
            FieldKind::Location => &mut self.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_omits_absent_fields_and_keeps_invalid_as_null() {
        let mut record = DecodedRecord::default();
        record.insert(FieldKind::Temperature, FieldValue::Number(21.5));
        record.insert(FieldKind::Humidity, FieldValue::Invalid);

        let value = serde_json::to_value(&record).expect("record json");
        let object = value.as_object().expect("object");
        assert_eq!(object.len(), 2);
        assert_eq!(value["temperature"], 21.5);
        assert!(value.get("humidity").expect("humidity").is_null());
        assert!(value.get("battery").is_none());
    }

    #[test]
    fn location_serializes_as_value_with_context() {
        let mut record = DecodedRecord::default();
        record.insert(
            FieldKind::Location,
            FieldValue::Location(LocationEntry::new(Some(10.0), None)),
        );
        let value = serde_json::to_value(&record).expect("record json");
        assert_eq!(
            value,
            serde_json::json!({ "location": { "value": 0, "context": { "lat": 10.0, "lng": null } } })
        );
    }

    #[test]
    fn entries_follow_payload_order() {
        let mut record = DecodedRecord::default();
        record.insert(FieldKind::Gas, FieldValue::Number(1.0));
        record.insert(FieldKind::Battery, FieldValue::Number(2.0));
        let fields: Vec<_> = record.entries().map(|(field, _)| field).collect();
        assert_eq!(fields, vec![FieldKind::Battery, FieldKind::Gas]);
        assert!(!record.is_empty());
        assert!(DecodedRecord::default().is_empty());
    }
}
