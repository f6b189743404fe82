//! Core wire types for the Momo memory/document/search API.
//!
//! Request bodies and response payloads use camelCase field names on the wire.
//! Responses decode leniently: unknown fields are ignored and optional fields default.

mod dto;
mod envelope;
mod error_code;

pub use dto::*;
pub use envelope::*;
pub use error_code::*;
