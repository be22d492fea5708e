use serde_json::{Map, Value};

use super::envelope::Uplink;
use super::error::UplinkError;
use super::gateway::summarize_gateways;
use crate::payload::decode;

/// Options controlling the platform document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Attach the `gateways` summary. Disable to save data points.
    pub collect_gateway_metadata: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            collect_gateway_metadata: true,
        }
    }
}

/// Build the platform document for one uplink.
///
/// The document holds `timestamp` (epoch milliseconds), an optional
/// `gateways` summary and every decoded field at top level. Any decode
/// failure fails the whole document.
///
/// # Examples
/// ```
/// use sensorport_core::{FormatOptions, Uplink, format_uplink};
///
/// let uplink = Uplink::from_json(
///     r#"{"uplink_message":{"received_at":"1970-01-01T00:00:01Z","f_port":1,"frm_payload":"DIA="}}"#,
/// )?;
/// let doc = format_uplink(&uplink, &FormatOptions::default())?;
/// assert_eq!(doc["timestamp"], 1000);
/// assert_eq!(doc["battery"], 3200.0);
/// assert_eq!(doc["gateways"]["value"], 0);
/// # Ok::<(), sensorport_core::UplinkError>(())
/// ```
pub fn format_uplink(
    uplink: &Uplink,
    options: &FormatOptions,
) -> Result<Map<String, Value>, UplinkError> {
    let message = &uplink.uplink_message;
    let timestamp = message.timestamp_ms()?;
    let payload = message.payload_bytes()?;
    let record = decode(&payload, message.f_port)?;

    let mut document = Map::new();
    document.insert("timestamp".to_string(), Value::from(timestamp));
    if options.collect_gateway_metadata {
        let gateways = summarize_gateways(&message.rx_metadata);
        document.insert("gateways".to_string(), serde_json::to_value(gateways)?);
    }
    if let Value::Object(fields) = serde_json::to_value(&record)? {
        document.extend(fields);
    }
    tracing::debug!(
        port = message.f_port,
        fields = document.len(),
        "formatted uplink document"
    );
    Ok(document)
}
