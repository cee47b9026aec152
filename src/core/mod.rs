//! # Core Packet Components
//!
//! Byte-level handling of Selene packets.
//!
//! ## Components
//! - **Layout**: header offsets shared by every representation
//! - **Packet Type**: type codes, pin-field and payload-size rules
//! - **Packet**: zero-copy view over a caller-owned buffer
//! - **Pin Update**: fixed 15-byte PIN packet for the broadcast hot path
//!
//! ## Wire Format
//! ```text
//! ['S'(1)] [Address LE(4)] [Type(1)] [Pin(1)] [Flags(1)] [Reserved(2)] [PSize(1)] [Payload(PSize)]
//! ```
//!
//! ## Safety
//! - No unsafe code; all payload access is bounds-checked against the buffer
//! - Header accessors are infallible once a view is constructed
//! - Nothing here allocates except `PacketView::violations`

pub mod layout;
pub mod packet;
pub mod packet_type;
pub mod pin_update;
