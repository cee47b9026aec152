//! Header layout shared by every packet representation.
//!
//! ```text
//! offset  0      1..5       5     6    7      8..10      10     11..
//!        ['S'] [address LE] [type] [pin] [flags] [reserved] [psize] [payload]
//! ```
//!
//! [`PacketView`](super::packet::PacketView) and
//! [`PinUpdate`](super::pin_update::PinUpdate) both read and write through
//! these offsets, so the two cannot drift apart.

use std::ops::Range;

/// Leading byte of every Selene packet.
pub const PREFIX: u8 = b'S';

pub const PREFIX_OFFSET: usize = 0;
pub const ADDRESS: Range<usize> = 1..5;
pub const TYPE_OFFSET: usize = 5;
pub const PIN_OFFSET: usize = 6;
pub const FLAGS_OFFSET: usize = 7;
pub const RESERVED: Range<usize> = 8..10;
pub const PSIZE_OFFSET: usize = 10;
pub const PAYLOAD_OFFSET: usize = 11;

/// Header length in bytes.
pub const HEADER_SIZE: usize = PAYLOAD_OFFSET;

/// isRequest bit of the flags byte.
pub const FLAG_REQUEST: u8 = 0x80;

/// Flag bits that must stay zero.
pub const FLAG_RESERVED_MASK: u8 = !FLAG_REQUEST;

/// Bytes zeroed by `initialize`: everything between the prefix and the payload.
pub const INIT_ZERO: Range<usize> = 1..HEADER_SIZE;

#[inline(always)]
pub(crate) fn read_u32_le(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

#[inline(always)]
pub(crate) fn write_u32_le(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_contiguous() {
        assert_eq!(PREFIX_OFFSET + 1, ADDRESS.start);
        assert_eq!(ADDRESS.end, TYPE_OFFSET);
        assert_eq!(TYPE_OFFSET + 1, PIN_OFFSET);
        assert_eq!(PIN_OFFSET + 1, FLAGS_OFFSET);
        assert_eq!(FLAGS_OFFSET + 1, RESERVED.start);
        assert_eq!(RESERVED.end, PSIZE_OFFSET);
        assert_eq!(PSIZE_OFFSET + 1, PAYLOAD_OFFSET);
        assert_eq!(HEADER_SIZE, 11);
    }

    #[test]
    fn test_u32_little_endian() {
        let mut buf = [0u8; 6];
        write_u32_le(&mut buf, 1, 0x0102_0304);
        assert_eq!(buf, [0, 0x04, 0x03, 0x02, 0x01, 0]);
        assert_eq!(read_u32_le(&buf, 1), 0x0102_0304);
    }
}
