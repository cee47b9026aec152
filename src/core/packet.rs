//! # Packet View
//!
//! Zero-copy accessor, mutator and validator over a caller-owned buffer.
//!
//! `PacketView` never allocates and never owns the memory it interprets: it
//! wraps anything that derefs to bytes (`&[u8]`, `&mut [u8]`, `[u8; N]`,
//! `Vec<u8>`, `BytesMut`). Read accessors need `AsRef<[u8]>`, mutators
//! additionally need `AsMut<[u8]>`.
//!
//! ## Bounds
//! Construction checks only that the 11-byte header fits, after which every
//! header accessor is infallible. Payload access is checked against the actual
//! buffer length on every call and reports a short buffer as `None` / `Err`
//! instead of reading past the end.
//!
//! ## Validation
//! [`PacketView::validate`] holds iff the five header invariants hold:
//! prefix, known type, pin field only on pin-bearing types, reserved bits
//! clear, fixed payload size respected. Whether the payload actually fits in
//! the buffer is a separate question answered by [`PacketView::check_bounds`].

use crate::core::layout::{
    self, ADDRESS, FLAGS_OFFSET, FLAG_REQUEST, FLAG_RESERVED_MASK, HEADER_SIZE, INIT_ZERO,
    PAYLOAD_OFFSET, PIN_OFFSET, PREFIX, PREFIX_OFFSET, PSIZE_OFFSET, RESERVED, TYPE_OFFSET,
};
use crate::core::packet_type::TypeCode;
use crate::error::{ProtocolError, Result, ValidationError};

/// A Selene packet interpreted in place over `B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketView<B> {
    buf: B,
}

impl<B: AsRef<[u8]>> PacketView<B> {
    /// Binds a view to `buf`. No content validation or initialization is done.
    ///
    /// Fails only when `buf` cannot hold the header.
    pub fn new(buf: B) -> Result<Self> {
        let available = buf.as_ref().len();
        if available < HEADER_SIZE {
            return Err(ProtocolError::BufferTooShort {
                needed: HEADER_SIZE,
                available,
            });
        }
        Ok(Self { buf })
    }

    /// Wraps a buffer already known to hold the header.
    #[inline(always)]
    pub(crate) fn wrap(buf: B) -> Self {
        Self { buf }
    }

    #[inline(always)]
    fn bytes(&self) -> &[u8] {
        self.buf.as_ref()
    }

    /// Length of the underlying buffer, which may exceed [`size`](Self::size).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes().len()
    }

    pub fn get_ref(&self) -> &B {
        &self.buf
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    /// `true` iff all five header invariants hold.
    #[inline]
    pub fn validate(&self) -> bool {
        self.check().is_ok()
    }

    /// Like [`validate`](Self::validate), but names the first violated invariant.
    pub fn check(&self) -> std::result::Result<(), ValidationError> {
        let b = self.bytes();

        if b[PREFIX_OFFSET] != PREFIX {
            return Err(ValidationError::BadPrefix(b[PREFIX_OFFSET]));
        }

        let raw = b[TYPE_OFFSET];
        let type_code = TypeCode::from_u8(raw).ok_or(ValidationError::UnknownType(raw))?;

        if !type_code.has_pin() && b[PIN_OFFSET] != 0 {
            return Err(ValidationError::IllegalPinField {
                type_code: raw,
                pin: b[PIN_OFFSET],
            });
        }

        self.check_reserved()?;

        if let Some(expected) = type_code.fixed_payload_size() {
            if b[PSIZE_OFFSET] != expected {
                return Err(ValidationError::PayloadSizeMismatch {
                    type_code,
                    expected,
                    actual: b[PSIZE_OFFSET],
                });
            }
        }

        Ok(())
    }

    /// Evaluates every invariant and returns all violations, in check order.
    ///
    /// An unknown type code is treated as a type without a pin field and
    /// without a fixed payload size.
    pub fn violations(&self) -> Vec<ValidationError> {
        let b = self.bytes();
        let mut errors = Vec::new();

        if b[PREFIX_OFFSET] != PREFIX {
            errors.push(ValidationError::BadPrefix(b[PREFIX_OFFSET]));
        }

        let raw = b[TYPE_OFFSET];
        let type_code = TypeCode::from_u8(raw);
        if type_code.is_none() {
            errors.push(ValidationError::UnknownType(raw));
        }

        let has_pin = type_code.map(TypeCode::has_pin).unwrap_or(false);
        if !has_pin && b[PIN_OFFSET] != 0 {
            errors.push(ValidationError::IllegalPinField {
                type_code: raw,
                pin: b[PIN_OFFSET],
            });
        }

        if let Err(e) = self.check_reserved() {
            errors.push(e);
        }

        if let Some(t) = type_code {
            if let Some(expected) = t.fixed_payload_size() {
                if b[PSIZE_OFFSET] != expected {
                    errors.push(ValidationError::PayloadSizeMismatch {
                        type_code: t,
                        expected,
                        actual: b[PSIZE_OFFSET],
                    });
                }
            }
        }

        errors
    }

    fn check_reserved(&self) -> std::result::Result<(), ValidationError> {
        let b = self.bytes();
        let flags = b[FLAGS_OFFSET];
        let reserved = [b[RESERVED.start], b[RESERVED.start + 1]];
        if flags & FLAG_RESERVED_MASK != 0 || reserved != [0, 0] {
            return Err(ValidationError::ReservedBitsSet { flags, reserved });
        }
        Ok(())
    }

    /// Checks that the buffer holds the whole `size()` bytes.
    pub fn check_bounds(&self) -> std::result::Result<(), ValidationError> {
        let needed = self.size();
        let available = self.capacity();
        if available < needed {
            return Err(ValidationError::Truncated { needed, available });
        }
        Ok(())
    }

    /// Header length plus the payload-size field: the meaningful byte count.
    #[inline]
    pub fn size(&self) -> usize {
        HEADER_SIZE + self.payload_size() as usize
    }

    /// The `size()` meaningful bytes, or `None` if the buffer is shorter.
    pub fn packet_bytes(&self) -> Option<&[u8]> {
        self.bytes().get(..self.size())
    }

    #[inline]
    pub fn address(&self) -> u32 {
        layout::read_u32_le(self.bytes(), ADDRESS.start)
    }

    /// Type byte as stored, whether or not it names a known type.
    #[inline]
    pub fn raw_type_code(&self) -> u8 {
        self.bytes()[TYPE_OFFSET]
    }

    #[inline]
    pub fn type_code(&self) -> Option<TypeCode> {
        TypeCode::from_u8(self.raw_type_code())
    }

    #[inline]
    pub fn pin(&self) -> u8 {
        self.bytes()[PIN_OFFSET]
    }

    /// Whole flags byte, reserved bits included.
    #[inline]
    pub fn flags(&self) -> u8 {
        self.bytes()[FLAGS_OFFSET]
    }

    #[inline]
    pub fn is_request(&self) -> bool {
        self.flags() & FLAG_REQUEST != 0
    }

    #[inline]
    pub fn payload_size(&self) -> u8 {
        self.bytes()[PSIZE_OFFSET]
    }

    /// Exactly `payload_size()` bytes of payload, or `None` if the buffer ends early.
    pub fn payload(&self) -> Option<&[u8]> {
        let end = PAYLOAD_OFFSET + self.payload_size() as usize;
        self.bytes().get(PAYLOAD_OFFSET..end)
    }

    /// First four payload bytes as a little-endian u32. Ignores the payload-size field.
    pub fn payload_u32(&self) -> Option<u32> {
        let b = self.bytes();
        if b.len() < PAYLOAD_OFFSET + 4 {
            return None;
        }
        Some(layout::read_u32_le(b, PAYLOAD_OFFSET))
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> PacketView<B> {
    #[inline(always)]
    fn bytes_mut(&mut self) -> &mut [u8] {
        self.buf.as_mut()
    }

    /// Writes the prefix and zeroes address, type, pin, flags, reserved and
    /// payload size. Type, address, pin and payload still need setting.
    pub fn initialize(&mut self) {
        let b = self.bytes_mut();
        b[PREFIX_OFFSET] = PREFIX;
        b[INIT_ZERO].fill(0);
    }

    #[inline]
    pub fn set_address(&mut self, v: u32) {
        layout::write_u32_le(self.bytes_mut(), ADDRESS.start, v);
    }

    /// Sets the type byte. Types with a fixed payload size also write it into
    /// the payload-size field; variable-size types leave that field untouched.
    pub fn set_type_code(&mut self, v: TypeCode) {
        let b = self.bytes_mut();
        b[TYPE_OFFSET] = v.code();
        if let Some(size) = v.fixed_payload_size() {
            b[PSIZE_OFFSET] = size;
        }
    }

    /// Raw pin byte. Not checked against the type until validation.
    #[inline]
    pub fn set_pin(&mut self, v: u8) {
        self.bytes_mut()[PIN_OFFSET] = v;
    }

    /// Rewrites the entire flags byte: bit 7 from `v`, bits 0-6 cleared.
    #[inline]
    pub fn set_is_request(&mut self, v: bool) {
        self.bytes_mut()[FLAGS_OFFSET] = if v { FLAG_REQUEST } else { 0 };
    }

    #[inline]
    pub fn set_payload_size(&mut self, v: u8) {
        self.bytes_mut()[PSIZE_OFFSET] = v;
    }

    /// Mutable counterpart of [`payload`](PacketView::payload).
    pub fn payload_mut(&mut self) -> Option<&mut [u8]> {
        let end = PAYLOAD_OFFSET + self.payload_size() as usize;
        self.bytes_mut().get_mut(PAYLOAD_OFFSET..end)
    }

    /// Writes `v` little-endian into the first four payload bytes.
    /// The payload-size field is left alone.
    pub fn set_payload_u32(&mut self, v: u32) -> Result<()> {
        let available = self.capacity();
        if available < PAYLOAD_OFFSET + 4 {
            return Err(ProtocolError::BufferTooShort {
                needed: PAYLOAD_OFFSET + 4,
                available,
            });
        }
        layout::write_u32_le(self.bytes_mut(), PAYLOAD_OFFSET, v);
        Ok(())
    }

    /// Copies `data` into the payload region and sets the payload-size field.
    pub fn set_payload(&mut self, data: &[u8]) -> Result<()> {
        let len = u8::try_from(data.len())
            .map_err(|_| ProtocolError::OversizedPayload(data.len()))?;
        let needed = PAYLOAD_OFFSET + data.len();
        let available = self.capacity();
        if available < needed {
            return Err(ProtocolError::BufferTooShort { needed, available });
        }
        let b = self.bytes_mut();
        b[PAYLOAD_OFFSET..needed].copy_from_slice(data);
        b[PSIZE_OFFSET] = len;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn fresh(buf: &mut [u8], t: TypeCode) -> PacketView<&mut [u8]> {
        let mut view = PacketView::new(buf).unwrap();
        view.initialize();
        view.set_type_code(t);
        view
    }

    #[test]
    fn test_header_must_fit() {
        let short = [0u8; HEADER_SIZE - 1];
        match PacketView::new(&short[..]) {
            Err(ProtocolError::BufferTooShort { needed, available }) => {
                assert_eq!(needed, 11);
                assert_eq!(available, 10);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(PacketView::new([0u8; HEADER_SIZE]).is_ok());
    }

    #[test]
    fn test_new_does_not_touch_buffer() {
        let buf = [0xAAu8; 16];
        let view = PacketView::new(buf).unwrap();
        assert_eq!(view.into_inner(), [0xAA; 16]);
    }

    #[test]
    fn test_initialize_layout() {
        let mut buf = [0xFFu8; 15];
        let size = {
            let mut view = PacketView::new(&mut buf[..]).unwrap();
            view.initialize();
            view.size()
        };
        assert_eq!(size, 11);
        assert_eq!(&buf[..11], &[b'S', 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        // payload bytes are not part of the header and stay as they were
        assert_eq!(&buf[11..], &[0xFF; 4]);
    }

    #[test]
    fn test_initialized_discovery_is_valid() {
        let mut buf = [0u8; HEADER_SIZE];
        let view = fresh(&mut buf, TypeCode::Discovery);
        assert!(view.validate());
        assert_eq!(view.size(), HEADER_SIZE);
    }

    #[test]
    fn test_fixed_size_types_set_payload_size() {
        for t in TypeCode::ALL {
            let Some(fixed) = t.fixed_payload_size() else {
                continue;
            };
            let mut buf = [0u8; 32];
            let view = fresh(&mut buf, t);
            assert_eq!(view.payload_size(), fixed);
            assert_eq!(view.size(), HEADER_SIZE + fixed as usize);
        }
    }

    #[test]
    fn test_variable_size_type_keeps_payload_size() {
        let mut buf = [0u8; 32];
        let mut view = PacketView::new(&mut buf[..]).unwrap();
        view.initialize();
        view.set_payload_size(9);
        view.set_type_code(TypeCode::DevInfo);
        assert_eq!(view.payload_size(), 9);
        view.set_type_code(TypeCode::Pin);
        assert_eq!(view.payload_size(), 4);
    }

    #[test]
    fn test_check_reports_first_violation() {
        let mut buf = [0u8; 15];
        let mut view = fresh(&mut buf, TypeCode::Pin);
        view.set_payload_size(3);
        assert_eq!(
            view.check(),
            Err(ValidationError::PayloadSizeMismatch {
                type_code: TypeCode::Pin,
                expected: 4,
                actual: 3
            })
        );

        view.bytes_mut()[0] = b'X';
        assert_eq!(view.check(), Err(ValidationError::BadPrefix(b'X')));
    }

    #[test]
    fn test_violations_collects_everything() {
        let mut buf = [0u8; 15];
        buf.copy_from_slice(&[b'R', 0, 0, 0, 0, 1, 7, 0x01, 0, 2, 3, 0, 0, 0, 0]);
        let view = PacketView::new(&buf[..]).unwrap();
        let errors = view.violations();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], ValidationError::BadPrefix(b'R'));
        assert!(matches!(errors[1], ValidationError::IllegalPinField { pin: 7, .. }));
        assert!(matches!(
            errors[2],
            ValidationError::ReservedBitsSet {
                flags: 0x01,
                reserved: [0, 2]
            }
        ));
        assert!(matches!(
            errors[3],
            ValidationError::PayloadSizeMismatch { actual: 3, .. }
        ));
        assert!(!view.validate());
    }

    #[test]
    fn test_unknown_type_with_pin_is_two_violations() {
        let buf = [b'S', 0, 0, 0, 0, 9, 1, 0, 0, 0, 0];
        let view = PacketView::new(&buf[..]).unwrap();
        assert_eq!(
            view.violations(),
            vec![
                ValidationError::UnknownType(9),
                ValidationError::IllegalPinField {
                    type_code: 9,
                    pin: 1
                }
            ]
        );
        assert_eq!(view.check(), Err(ValidationError::UnknownType(9)));
    }

    #[test]
    fn test_set_is_request_clears_reserved_bits() {
        let mut buf = [0u8; 15];
        let mut view = fresh(&mut buf, TypeCode::Pin);
        view.bytes_mut()[FLAGS_OFFSET] = 0x7F;
        assert!(!view.validate());

        view.set_is_request(true);
        assert_eq!(view.flags(), 0x80);
        assert!(view.is_request());
        assert!(view.validate());

        view.set_is_request(false);
        assert_eq!(view.flags(), 0);
    }

    #[test]
    fn test_payload_is_exactly_payload_size() {
        let mut buf = [0u8; 16];
        let mut view = fresh(&mut buf, TypeCode::DevInfo);
        view.set_payload(b"hello").unwrap();
        assert_eq!(view.size(), 16);
        assert_eq!(view.payload(), Some(&b"hello"[..]));
        assert_eq!(view.packet_bytes().map(<[u8]>::len), Some(16));
        assert!(view.check_bounds().is_ok());

        view.set_payload_size(6);
        assert_eq!(view.payload(), None);
        assert_eq!(
            view.check_bounds(),
            Err(ValidationError::Truncated {
                needed: 17,
                available: 16
            })
        );
        // header invariants do not look at the buffer length
        assert!(view.validate());
    }

    #[test]
    fn test_payload_mut_edits_in_place() {
        let mut buf = [0u8; 13];
        {
            let mut view = fresh(&mut buf, TypeCode::PinInfo);
            view.set_payload_size(2);
            view.payload_mut().unwrap().copy_from_slice(b"ok");
        }
        assert_eq!(&buf[11..], b"ok");
    }

    #[test]
    fn test_payload_u32_needs_four_bytes() {
        let mut buf = [0u8; 14];
        let mut view = fresh(&mut buf, TypeCode::Pin);
        assert_eq!(view.payload_u32(), None);
        assert!(matches!(
            view.set_payload_u32(1),
            Err(ProtocolError::BufferTooShort {
                needed: 15,
                available: 14
            })
        ));
    }

    #[test]
    fn test_payload_u32_ignores_payload_size() {
        let mut buf = [0u8; 15];
        let mut view = fresh(&mut buf, TypeCode::DevInfo);
        view.set_payload_u32(0xDEAD_BEEF).unwrap();
        assert_eq!(view.payload_size(), 0);
        assert_eq!(view.payload_u32(), Some(0xDEAD_BEEF));
        assert_eq!(&buf[11..], &[0xEF, 0xBE, 0xAD, 0xDE]);
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let mut buf = vec![0u8; 300];
        let mut view = PacketView::new(&mut buf[..]).unwrap();
        view.initialize();
        assert!(matches!(
            view.set_payload(&[0u8; 256]),
            Err(ProtocolError::OversizedPayload(256))
        ));
    }

    #[test]
    fn test_works_over_owned_buffers() {
        let mut view = PacketView::new(vec![0u8; 15]).unwrap();
        view.initialize();
        view.set_type_code(TypeCode::Pin);
        view.set_address(7);
        assert!(view.validate());
        assert_eq!(view.into_inner()[1], 7);
    }
}
