#![no_main]

use libfuzzer_sys::fuzz_target;
use selene_protocol::{Message, PacketView};

fuzz_target!(|data: &[u8]| {
    // Header checks and payload access must never read past the buffer
    if let Ok(view) = PacketView::new(data) {
        let valid = view.validate();
        assert_eq!(valid, view.violations().is_empty());
        let _ = view.check_bounds();
        let _ = view.payload();
        let _ = view.payload_u32();
    }

    // Anything the decoder accepts must re-encode to the same packet bytes
    if let Ok(msg) = Message::from_bytes(data) {
        let bytes = msg.to_bytes().expect("decoded message re-encodes");
        assert_eq!(&bytes[..], &data[..bytes.len()]);
    }
});
