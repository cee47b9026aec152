//! # Selene Protocol
//!
//! Reader, writer and validator for Selene packets: the fixed-layout binary
//! format used between a controller and addressed devices for discovery,
//! connection state, device and pin metadata, and pin value updates.
//!
//! ## Layers
//! - [`core::packet::PacketView`]: zero-copy view over a caller-owned buffer,
//!   any message type.
//! - [`core::pin_update::PinUpdate`]: pre-shaped 15-byte pin value packet for
//!   the high-frequency broadcast path.
//! - [`protocol::message::Message`]: owned, typed packet with decoding,
//!   encoding and MQTT topic mapping.
//!
//! ## Wire Format
//! ```text
//! ['S'(1)] [Address LE(4)] [Type(1)] [Pin(1)] [Flags(1)] [Reserved(2)] [PSize(1)] [Payload(PSize)]
//! ```
//!
//! ## Example
//! ```rust
//! use selene_protocol::{PacketView, PinUpdate, TypeCode};
//!
//! let mut buf = [0u8; 15];
//! let mut view = PacketView::new(&mut buf[..]).expect("header fits");
//! view.initialize();
//! view.set_address(0xC30);
//! view.set_type_code(TypeCode::Pin);
//! view.set_pin(0xD2);
//! view.set_payload_u32(0x102).expect("payload fits");
//! assert!(view.validate());
//!
//! let update = PinUpdate::new(0xC30);
//! assert!(update.view().validate());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::layout::HEADER_SIZE;
pub use crate::core::packet::PacketView;
pub use crate::core::packet_type::TypeCode;
pub use crate::core::pin_update::{PinUpdate, PIN_UPDATE_SIZE};
pub use crate::error::{ProtocolError, Result, ValidationError};
pub use crate::protocol::message::{Body, Message};
pub use crate::protocol::topic::MqttMessage;
