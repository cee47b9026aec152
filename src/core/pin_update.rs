//! # Pin Update Packet
//!
//! Pre-shaped PIN packet for broadcasting pin values at high frequency.
//!
//! The 15-byte buffer is built once, fully valid, and afterwards only the
//! address, pin and value bytes are touched. No type lookup, size bookkeeping
//! or re-validation happens per update. Offsets come from the shared
//! [`layout`](super::layout) table.
//!
//! Request packets (`pin/r`) are not expressible here; build those through
//! [`PacketView`] or [`Message`](crate::protocol::message::Message).

use crate::core::layout::{
    self, ADDRESS, HEADER_SIZE, PAYLOAD_OFFSET, PIN_OFFSET, PREFIX, PREFIX_OFFSET, PSIZE_OFFSET,
    TYPE_OFFSET,
};
use crate::core::packet::PacketView;
use crate::core::packet_type::TypeCode;

/// PIN payload width.
const PIN_PAYLOAD_SIZE: usize = 4;

/// Total size of a pin update packet.
pub const PIN_UPDATE_SIZE: usize = HEADER_SIZE + PIN_PAYLOAD_SIZE;

const TEMPLATE: [u8; PIN_UPDATE_SIZE] = {
    let mut t = [0u8; PIN_UPDATE_SIZE];
    t[PREFIX_OFFSET] = PREFIX;
    t[TYPE_OFFSET] = TypeCode::Pin as u8;
    t[PSIZE_OFFSET] = PIN_PAYLOAD_SIZE as u8;
    t
};

/// Always-valid PIN packet owning its 15-byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinUpdate {
    buf: [u8; PIN_UPDATE_SIZE],
}

impl PinUpdate {
    /// Builds a PIN packet for `address` with pin 0, value 0, no flags.
    #[inline]
    pub fn new(address: u32) -> Self {
        let mut update = Self { buf: TEMPLATE };
        update.set_address(address);
        update
    }

    /// Always [`PIN_UPDATE_SIZE`].
    #[inline(always)]
    pub const fn size(&self) -> usize {
        PIN_UPDATE_SIZE
    }

    #[inline(always)]
    pub fn set_address(&mut self, v: u32) {
        layout::write_u32_le(&mut self.buf, ADDRESS.start, v);
    }

    #[inline(always)]
    pub fn set_pin(&mut self, v: u8) {
        self.buf[PIN_OFFSET] = v;
    }

    /// Sets the pin value (the u32 payload).
    #[inline(always)]
    pub fn set_payload_u32(&mut self, v: u32) {
        layout::write_u32_le(&mut self.buf, PAYLOAD_OFFSET, v);
    }

    /// Sets pin and value in one call, the usual per-update mutation.
    #[inline(always)]
    pub fn update(&mut self, pin: u8, value: u32) -> &[u8] {
        self.set_pin(pin);
        self.set_payload_u32(value);
        &self.buf
    }

    pub fn address(&self) -> u32 {
        layout::read_u32_le(&self.buf, ADDRESS.start)
    }

    pub fn pin(&self) -> u8 {
        self.buf[PIN_OFFSET]
    }

    pub fn value(&self) -> u32 {
        layout::read_u32_le(&self.buf, PAYLOAD_OFFSET)
    }

    /// Wire bytes, ready for the transport.
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8; PIN_UPDATE_SIZE] {
        &self.buf
    }

    /// Read-only generic view over the same bytes.
    pub fn view(&self) -> PacketView<&[u8]> {
        // header always fits in PIN_UPDATE_SIZE bytes
        PacketView::wrap(&self.buf[..])
    }
}

impl AsRef<[u8]> for PinUpdate {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

impl From<PinUpdate> for [u8; PIN_UPDATE_SIZE] {
    fn from(update: PinUpdate) -> Self {
        update.buf
    }
}
