use thiserror::Error;

/// Errors returned by payload decoding.
///
/// A sentinel-invalid reading is not an error; it decodes to `null`.
///
/// # Examples
/// ```
/// use sensorport_core::DecodeError;
///
/// let err = DecodeError::UnknownPort { port: 999 };
/// assert!(err.to_string().contains("unknown port"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown port: {port}")]
    UnknownPort { port: u32 },
    #[error("payload too short: need {needed} bytes, got {actual}")]
    BufferTooShort { needed: usize, actual: usize },
    #[error("unsupported value width: {width} bytes (expected 1 to 8)")]
    UnsupportedWidth { width: usize },
}
