//! Selene message types and their per-type payload rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::MAX_PAYLOAD_SIZE;

/// Message type carried in header byte 5.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCode {
    /// Device announcement / discovery probe
    Discovery = 1,
    /// Connection state, one boolean byte
    Connection = 2,
    /// Device description text
    DevInfo = 3,
    /// Pin description text
    PinInfo = 4,
    /// Pin value, u32 little-endian
    Pin = 5,
}

impl TypeCode {
    pub const ALL: [TypeCode; 5] = [
        TypeCode::Discovery,
        TypeCode::Connection,
        TypeCode::DevInfo,
        TypeCode::PinInfo,
        TypeCode::Pin,
    ];

    #[inline(always)]
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Discovery),
            2 => Some(Self::Connection),
            3 => Some(Self::DevInfo),
            4 => Some(Self::PinInfo),
            5 => Some(Self::Pin),
            _ => None,
        }
    }

    /// Wire value.
    #[inline(always)]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether header byte 6 carries a pin number for this type.
    #[inline(always)]
    pub fn has_pin(self) -> bool {
        matches!(self, Self::PinInfo | Self::Pin)
    }

    /// Payload size fixed by the type, `None` for variable-size types.
    #[inline(always)]
    pub fn fixed_payload_size(self) -> Option<u8> {
        match self {
            Self::Discovery => Some(0),
            Self::Connection => Some(1),
            Self::Pin => Some(4),
            Self::DevInfo | Self::PinInfo => None,
        }
    }

    /// Largest payload a typed [`Message`](crate::protocol::message::Message) accepts
    /// under the default limits.
    pub fn max_payload_size(self) -> usize {
        self.payload_limit(MAX_PAYLOAD_SIZE)
    }

    /// The fixed size, or `variable_max` for devinfo / pininfo.
    pub fn payload_limit(self, variable_max: usize) -> usize {
        match self.fixed_payload_size() {
            Some(n) => n as usize,
            None => variable_max,
        }
    }

    /// Name used in MQTT topics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Connection => "connection",
            Self::DevInfo => "devinfo",
            Self::PinInfo => "pininfo",
            Self::Pin => "pin",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
