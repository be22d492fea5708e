use thiserror::Error;

use crate::payload::DecodeError;

/// Errors returned while turning an uplink into a platform document.
#[derive(Debug, Error)]
pub enum UplinkError {
    #[error("invalid uplink document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid frm_payload encoding: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
    #[error("invalid received_at timestamp '{value}': {message}")]
    InvalidTimestamp { value: String, message: String },
    #[error("payload decode failed: {0}")]
    Decode(#[from] DecodeError),
}
