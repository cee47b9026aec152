// test-only module included via protocol/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::core::packet::PacketView;
use crate::core::packet_type::TypeCode;
use crate::error::{ProtocolError, ValidationError};
use crate::protocol::message::{Body, Message};

#[test]
fn test_wire_to_mqtt_bridge() {
    // =================== Device sends a pin update ===================
    let wire = [b'S', 0xDC, 0x0C, 0, 0, 5, 0x12, 0x80, 0, 0, 4, 0xBB, 0, 0, 0];
    let msg = Message::from_bytes(&wire).expect("valid pin/r packet");
    assert_eq!(msg.address, 0xCDC);
    assert!(msg.is_request);
    assert_eq!(msg.body, Body::Pin { pin: 0x12, value: 0xBB });

    // =================== Controller republishes it ===================
    let mqtt = msg.to_mqtt();
    assert_eq!(mqtt.topic, "Se/CDC/pin/12/r");
    assert_eq!(&mqtt.payload[..], &[0xBB, 0, 0, 0]);

    // =================== And back to the wire ===================
    let back = Message::from_mqtt(&mqtt.topic, &mqtt.payload).expect("canonical topic");
    assert_eq!(&back.to_bytes().unwrap()[..], &wire[..]);
}

#[test]
fn test_encoded_message_passes_view_checks() {
    let messages = [
        Message::discovery(1),
        Message::connection(2, false),
        Message::devinfo(3, "{\"name\":\"Foo\"}"),
        Message::pininfo(4, 9, "").request(),
        Message::pin(5, 0xFF, u32::MAX),
    ];

    for msg in messages {
        let bytes = msg.to_bytes().unwrap();
        let view = PacketView::new(&bytes[..]).unwrap();
        assert!(view.validate(), "{msg:?}");
        assert!(view.check_bounds().is_ok());
        assert_eq!(view.size(), bytes.len());
        assert_eq!(view.type_code(), Some(msg.type_code()));
        assert_eq!(view.is_request(), msg.is_request);
    }
}

#[test]
fn test_header_errors_surface_as_validation() {
    let mut wire = Message::pin(0xC30, 0xD2, 1).to_bytes().unwrap().to_vec();
    wire[5] = TypeCode::Discovery.code();

    let err = Message::from_bytes(&wire).unwrap_err();
    assert_eq!(
        err.validation(),
        Some(ValidationError::IllegalPinField {
            type_code: 1,
            pin: 0xD2
        })
    );

    let err = Message::from_bytes(&wire[..5]).unwrap_err();
    assert!(matches!(err, ProtocolError::BufferTooShort { .. }));
    assert_eq!(err.validation(), None);
}
