//! Network-server uplink handling.
//!
//! An uplink document carries the base64 payload, the LoRaWAN port, the
//! reception time and metadata for every gateway that heard the device.
//! `envelope` extracts those inputs, `gateway` summarizes reception, and
//! `formatter` assembles the platform document around the decoded record.

pub mod envelope;
pub mod error;
pub mod formatter;
pub mod gateway;

pub use envelope::{GatewayIds, GatewayLocation, RxMetadata, Uplink, UplinkMessage};
pub use error::UplinkError;
pub use formatter::{FormatOptions, format_uplink};
pub use gateway::{GatewayContext, GatewaySummary, summarize_gateways};
