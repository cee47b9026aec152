//! # JSON Form
//!
//! Human-readable rendition of a [`Message`] for consoles, logs and bridges
//! that speak JSON rather than Selene bytes.
//!
//! ```json
//! {"address":3120,"is_request":false,"type":"pin","pin":210,"value":258}
//! ```
//!
//! Decoding applies the same payload limits as the wire decoder, so any
//! message accepted here can also be encoded under the same configuration.

use crate::config::PacketConfig;
use crate::error::{ProtocolError, Result};
use crate::protocol::message::Message;

impl Message {
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ProtocolError::SerializeError(e.to_string()))
    }

    /// Indented output, for debugging.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ProtocolError::SerializeError(e.to_string()))
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        Self::from_json_with(data, &PacketConfig::default())
    }

    pub fn from_json_with(data: &[u8], config: &PacketConfig) -> Result<Self> {
        let msg: Message = serde_json::from_slice(data)
            .map_err(|e| ProtocolError::DeserializeError(e.to_string()))?;
        msg.check_payload_limit(config)?;
        Ok(msg)
    }
}
