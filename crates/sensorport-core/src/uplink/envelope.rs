use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::error::UplinkError;

/// Uplink document as delivered by the network server.
///
/// Only the members needed for decoding are modelled; anything else in the
/// document is ignored.
///
/// # Examples
/// ```
/// use sensorport_core::Uplink;
///
/// let uplink = Uplink::from_json(
///     r#"{"uplink_message":{"received_at":"1970-01-01T00:00:01Z","f_port":1,"frm_payload":"DIA="}}"#,
/// )?;
/// assert_eq!(uplink.uplink_message.payload_bytes()?, vec![0x0C, 0x80]);
/// assert_eq!(uplink.uplink_message.timestamp_ms()?, 1000);
/// # Ok::<(), sensorport_core::UplinkError>(())
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Uplink {
    pub uplink_message: UplinkMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UplinkMessage {
    /// RFC3339 reception time.
    pub received_at: String,
    /// LoRaWAN port; selects the payload layout.
    pub f_port: u32,
    /// Base64-encoded application payload.
    pub frm_payload: String,
    #[serde(default)]
    pub rx_metadata: Vec<RxMetadata>,
}

/// Reception metadata reported by one gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct RxMetadata {
    pub gateway_ids: GatewayIds,
    #[serde(default)]
    pub rssi: Option<f64>,
    #[serde(default)]
    pub snr: Option<f64>,
    #[serde(default)]
    pub location: Option<GatewayLocation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayIds {
    pub gateway_id: String,
    #[serde(default)]
    pub eui: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayLocation {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Uplink {
    pub fn from_json(input: &str) -> Result<Self, UplinkError> {
        Ok(serde_json::from_str(input)?)
    }
}

impl UplinkMessage {
    pub fn payload_bytes(&self) -> Result<Vec<u8>, UplinkError> {
        Ok(STANDARD.decode(self.frm_payload.trim())?)
    }

    /// Reception time in Unix epoch milliseconds.
    pub fn timestamp_ms(&self) -> Result<i64, UplinkError> {
        let parsed = OffsetDateTime::parse(&self.received_at, &Rfc3339).map_err(|err| {
            UplinkError::InvalidTimestamp {
                value: self.received_at.clone(),
                message: err.to_string(),
            }
        })?;
        let millis = parsed.unix_timestamp_nanos() / 1_000_000;
        i64::try_from(millis).map_err(|_| UplinkError::InvalidTimestamp {
            value: self.received_at.clone(),
            message: "out of range".to_string(),
        })
    }
}
