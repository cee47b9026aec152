//! # Error Types
//!
//! Error handling for Selene packet operations.
//!
//! Two layers are defined here:
//! - [`ValidationError`]: a single violated packet invariant, as reported by
//!   [`PacketView::check`](crate::core::packet::PacketView::check). Malformed
//!   packets are expected on any wire link, so these are plain data.
//! - [`ProtocolError`]: the crate-wide error for operations that can fail
//!   (buffer sizing, typed payload decoding, topic parsing, configuration).
//!
//! ## Example Usage
//! ```rust
//! use selene_protocol::error::{ProtocolError, ValidationError};
//! use selene_protocol::Message;
//! use tracing::{error, info};
//!
//! let bytes = [b'R', 0, 0, 0, 0, 1, 0, 0, 0, 0, 0];
//! match Message::from_bytes(&bytes) {
//!     Ok(msg) => info!(address = msg.address, "Decoded packet"),
//!     Err(ProtocolError::Invalid(ValidationError::BadPrefix(found))) => {
//!         error!(found, "Not a Selene packet")
//!     }
//!     Err(e) => error!(error = %e, "Rejected packet"),
//! }
//! ```

use crate::core::packet_type::TypeCode;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Static reasons attached to [`ProtocolError::InvalidTopic`] and
/// [`ProtocolError::InvalidPayload`].
pub mod constants {
    /// Topic errors
    pub const ERR_TOPIC_PREFIX: &str = "topic must start with 'Se'";
    pub const ERR_TOPIC_ADDRESS: &str = "address segment is not canonical uppercase hex";
    pub const ERR_TOPIC_TYPE: &str = "unknown packet type name";
    pub const ERR_TOPIC_PIN: &str = "pin segment is not canonical uppercase hex";
    pub const ERR_TOPIC_TRAILING: &str = "unexpected trailing topic segments";

    /// Payload errors
    pub const ERR_CONNECTION_FLAG: &str = "connection flag must be 0 or 1";
    pub const ERR_PAYLOAD_UTF8: &str = "info payload is not valid UTF-8";
    pub const ERR_PAYLOAD_LENGTH: &str = "payload length does not match packet type";
}

/// A violated Selene packet invariant.
///
/// Variants follow the order in which [`PacketView::check`](crate::core::packet::PacketView::check)
/// evaluates them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Bad prefix byte 0x{0:02X} (expected 'S')")]
    BadPrefix(u8),

    #[error("Unknown type code: {0}")]
    UnknownType(u8),

    #[error("Pin field {pin} set on type {type_code} packet, which has no pin")]
    IllegalPinField { type_code: u8, pin: u8 },

    #[error("Reserved bits set (flags 0x{flags:02X}, reserved bytes {reserved:02X?})")]
    ReservedBitsSet { flags: u8, reserved: [u8; 2] },

    #[error("Payload size {actual} does not match fixed size {expected} of {type_code} packet")]
    PayloadSizeMismatch {
        type_code: TypeCode,
        expected: u8,
        actual: u8,
    },

    #[error("Packet truncated: needs {needed} bytes, buffer holds {available}")]
    Truncated { needed: usize, available: usize },
}

// ProtocolError is the primary error type for all fallible operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid packet: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Buffer too short: needs {needed} bytes, got {available}")]
    BufferTooShort { needed: usize, available: usize },

    #[error("Payload too large: {0} bytes")]
    OversizedPayload(usize),

    #[error("Invalid payload: {0}")]
    InvalidPayload(&'static str),

    #[error("Invalid topic '{topic}': {reason}")]
    InvalidTopic { topic: String, reason: &'static str },

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Deserialize error: {0}")]
    DeserializeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProtocolError {
    /// Returns the packet invariant behind this error, if any.
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            ProtocolError::Invalid(v) => Some(*v),
            _ => None,
        }
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
