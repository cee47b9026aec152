//! # Typed Messages
//!
//! Owned representation of a Selene packet with its payload decoded by type.
//!
//! `Message` sits on top of [`PacketView`]: decoding runs the header checks,
//! the bounds check and then the per-type payload rules; encoding writes
//! through the same view setters a hand-built packet would use.
//!
//! | Type | Payload |
//! |---|---|
//! | discovery | empty |
//! | connection | 1 byte, 0 or 1 |
//! | devinfo | UTF-8, up to 144 bytes |
//! | pininfo | UTF-8, up to 144 bytes |
//! | pin | u32 little-endian |

use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PacketConfig;
use crate::core::layout::HEADER_SIZE;
use crate::core::packet::PacketView;
use crate::core::packet_type::TypeCode;
use crate::core::pin_update::PinUpdate;
use crate::error::constants::{ERR_CONNECTION_FLAG, ERR_PAYLOAD_LENGTH, ERR_PAYLOAD_UTF8};
use crate::error::{ProtocolError, Result, ValidationError};
use crate::utils::metrics::global_metrics;

/// Type-specific content of a message. The pin number only exists on the
/// variants whose wire type carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Body {
    Discovery,
    Connection { connected: bool },
    DevInfo { info: String },
    PinInfo { pin: u8, info: String },
    Pin { pin: u8, value: u32 },
}

impl Body {
    pub fn type_code(&self) -> TypeCode {
        match self {
            Body::Discovery => TypeCode::Discovery,
            Body::Connection { .. } => TypeCode::Connection,
            Body::DevInfo { .. } => TypeCode::DevInfo,
            Body::PinInfo { .. } => TypeCode::PinInfo,
            Body::Pin { .. } => TypeCode::Pin,
        }
    }

    pub fn pin(&self) -> Option<u8> {
        match self {
            Body::PinInfo { pin, .. } | Body::Pin { pin, .. } => Some(*pin),
            _ => None,
        }
    }

    /// Runs `f` over the encoded payload without allocating.
    pub(crate) fn with_payload<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        match self {
            Body::Discovery => f(&[]),
            Body::Connection { connected } => f(&[u8::from(*connected)]),
            Body::DevInfo { info } | Body::PinInfo { info, .. } => f(info.as_bytes()),
            Body::Pin { value, .. } => f(&value.to_le_bytes()),
        }
    }

    pub fn payload_len(&self) -> usize {
        self.with_payload(<[u8]>::len)
    }

    /// Decodes a payload already cut to its declared length.
    pub(crate) fn decode(
        type_code: TypeCode,
        pin: u8,
        payload: &[u8],
        max_payload_size: usize,
    ) -> Result<Self> {
        match type_code.fixed_payload_size() {
            Some(fixed) if payload.len() != fixed as usize => {
                return Err(ProtocolError::InvalidPayload(ERR_PAYLOAD_LENGTH));
            }
            None if payload.len() > max_payload_size => {
                return Err(ProtocolError::OversizedPayload(payload.len()));
            }
            _ => {}
        }

        let body = match type_code {
            TypeCode::Discovery => Body::Discovery,
            TypeCode::Connection => match payload[0] {
                0 => Body::Connection { connected: false },
                1 => Body::Connection { connected: true },
                _ => return Err(ProtocolError::InvalidPayload(ERR_CONNECTION_FLAG)),
            },
            TypeCode::DevInfo => Body::DevInfo {
                info: decode_text(payload)?,
            },
            TypeCode::PinInfo => Body::PinInfo {
                pin,
                info: decode_text(payload)?,
            },
            TypeCode::Pin => Body::Pin {
                pin,
                value: u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]),
            },
        };
        Ok(body)
    }
}

fn decode_text(payload: &[u8]) -> Result<String> {
    std::str::from_utf8(payload)
        .map(str::to_owned)
        .map_err(|_| ProtocolError::InvalidPayload(ERR_PAYLOAD_UTF8))
}

/// A complete Selene packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub address: u32,
    #[serde(default)]
    pub is_request: bool,
    #[serde(flatten)]
    pub body: Body,
}

impl Message {
    pub fn new(address: u32, body: Body) -> Self {
        Self {
            address,
            is_request: false,
            body,
        }
    }

    pub fn discovery(address: u32) -> Self {
        Self::new(address, Body::Discovery)
    }

    pub fn connection(address: u32, connected: bool) -> Self {
        Self::new(address, Body::Connection { connected })
    }

    pub fn devinfo(address: u32, info: impl Into<String>) -> Self {
        Self::new(address, Body::DevInfo { info: info.into() })
    }

    pub fn pininfo(address: u32, pin: u8, info: impl Into<String>) -> Self {
        Self::new(
            address,
            Body::PinInfo {
                pin,
                info: info.into(),
            },
        )
    }

    pub fn pin(address: u32, pin: u8, value: u32) -> Self {
        Self::new(address, Body::Pin { pin, value })
    }

    /// Marks the message as a request (`/r` on MQTT, flag bit 7 on the wire).
    pub fn request(mut self) -> Self {
        self.is_request = true;
        self
    }

    pub fn type_code(&self) -> TypeCode {
        self.body.type_code()
    }

    /// Decodes a packet from the front of `bytes` with default limits.
    /// Bytes past the packet's `size()` are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(bytes, &PacketConfig::default())
    }

    pub fn from_bytes_with(bytes: &[u8], config: &PacketConfig) -> Result<Self> {
        let result = Self::decode(bytes, config.max_payload_size);
        observe(&result, bytes.len(), config);
        result
    }

    fn decode(bytes: &[u8], max_payload_size: usize) -> Result<Self> {
        let view = PacketView::new(bytes)?;
        view.check()?;
        view.check_bounds()?;

        let raw = view.raw_type_code();
        let type_code = view
            .type_code()
            .ok_or(ValidationError::UnknownType(raw))?;
        let payload = view.payload().ok_or(ValidationError::Truncated {
            needed: view.size(),
            available: view.capacity(),
        })?;

        Ok(Self {
            address: view.address(),
            is_request: view.is_request(),
            body: Body::decode(type_code, view.pin(), payload, max_payload_size)?,
        })
    }

    /// Bytes needed on the wire.
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.body.payload_len()
    }

    /// Fails with `OversizedPayload` if the payload exceeds the type's limit
    /// under `config`.
    pub(crate) fn check_payload_limit(&self, config: &PacketConfig) -> Result<()> {
        let len = self.body.payload_len();
        if len > self.type_code().payload_limit(config.max_payload_size) {
            return Err(ProtocolError::OversizedPayload(len));
        }
        Ok(())
    }

    /// Writes the packet to the front of `buf` with default limits and
    /// returns its length.
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<usize> {
        self.encode_into_with(buf, &PacketConfig::default())
    }

    /// Same limits as [`from_bytes_with`](Self::from_bytes_with), so anything
    /// decoded under `config` encodes under it too.
    pub fn encode_into_with(&self, buf: &mut [u8], config: &PacketConfig) -> Result<usize> {
        self.check_payload_limit(config)?;
        let len = self.encoded_len();
        if buf.len() < len {
            return Err(ProtocolError::BufferTooShort {
                needed: len,
                available: buf.len(),
            });
        }

        let mut view = PacketView::new(&mut buf[..len])?;
        view.initialize();
        view.set_address(self.address);
        view.set_type_code(self.type_code());
        if let Some(pin) = self.body.pin() {
            view.set_pin(pin);
        }
        view.set_is_request(self.is_request);
        self.body.with_payload(|p| view.set_payload(p))?;

        global_metrics().packet_encoded(len as u64);
        Ok(len)
    }

    /// Encodes into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Result<Bytes> {
        self.to_bytes_with(&PacketConfig::default())
    }

    pub fn to_bytes_with(&self, config: &PacketConfig) -> Result<Bytes> {
        let mut buf = BytesMut::zeroed(self.encoded_len());
        self.encode_into_with(&mut buf, config)?;
        Ok(buf.freeze())
    }
}

impl From<PinUpdate> for Message {
    fn from(update: PinUpdate) -> Self {
        Message::pin(update.address(), update.pin(), update.value())
    }
}

impl TryFrom<&[u8]> for Message {
    type Error = ProtocolError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Message::from_bytes(bytes)
    }
}

/// Records the outcome of an inbound decode.
pub(crate) fn observe(result: &Result<Message>, len: usize, config: &PacketConfig) {
    let metrics = global_metrics();
    match result {
        Ok(_) => metrics.packet_decoded(len as u64),
        Err(e) => {
            metrics.packet_rejected(e);
            if config.log_rejections {
                debug!(error = %e, len, "Rejected Selene packet");
            }
        }
    }
}
