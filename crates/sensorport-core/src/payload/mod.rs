//! Sensor payload decoding.
//!
//! The payload module follows the same layered structure as every wire
//! format in this crate:
//! - `layout`: the port table and the global field order (source of truth)
//! - `schema`: per-field width, sign and scaling descriptions
//! - `reader`: bounds-checked byte access
//! - `codec`: raw integer extraction, sentinel detection, scaled decode
//! - `parser`: port-driven orchestration into a [`crate::DecodedRecord`]
//! - `error`: explicit, actionable errors
//!
//! Everything here is pure and synchronous. Tables are immutable statics and
//! the input buffer is only borrowed for the duration of a call.

pub mod codec;
pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod schema;

pub use codec::{FieldReading, decode_field, extract_integer, is_valid, sentinel};
pub use error::DecodeError;
pub use layout::{FieldKind, PORTS, PortLayout, layout_for};
pub use parser::decode;
pub use schema::{FieldSchema, SchemaAdjustment};
