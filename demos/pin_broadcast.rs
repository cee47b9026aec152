//! Example: Broadcasting Pin Values
//!
//! Builds pin updates on the fast path, decodes them the way a controller
//! would, and republishes them as MQTT topic / payload pairs. Finishes with a
//! deliberately broken packet and a metrics snapshot.
//!
//! Run with: `cargo run --example pin_broadcast`
//! Set `SELENE_LOG_LEVEL=debug` to see rejected packets.

#![allow(clippy::uninlined_format_args)]

use selene_protocol::config::SeleneConfig;
use selene_protocol::utils::{global_metrics, init_logging};
use selene_protocol::{Message, PacketView, PinUpdate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SeleneConfig::from_env()?;
    config.validate_strict()?;
    init_logging(&config.logging)?;

    println!("=== Selene Pin Broadcast Demo ===\n");

    // 1. Device side: one reusable buffer, only pin and value change
    let mut update = PinUpdate::new(0xC30);
    let readings = [(0xD2u8, 0x102u32), (0xD3, 0), (0xD4, u32::MAX)];

    for (pin, value) in readings {
        let wire = update.update(pin, value).to_vec();
        println!("wire:  {:02X?}", wire);

        // 2. Controller side: validate, decode, republish
        let view = PacketView::new(&wire[..])?;
        if !view.validate() {
            println!("       dropped invalid packet");
            continue;
        }
        let msg = Message::from_bytes_with(&wire, &config.packet)?;
        let mqtt = msg.to_mqtt();
        println!("mqtt:  {} {:02X?}", mqtt.topic, &mqtt.payload[..]);
        println!("json:  {}\n", String::from_utf8(msg.to_json()?)?);
    }

    // 3. A request asking the device to report pin 0xD2
    let request = Message::pin(0xC30, 0xD2, 0).request();
    println!("request topic: {}", request.topic());

    // 4. Reserved byte set: rejected and counted
    let mut broken = *update.as_bytes();
    broken[8] = 0x01;
    match Message::from_bytes_with(&broken, &config.packet) {
        Ok(msg) => println!("unexpectedly accepted {:?}", msg),
        Err(e) => println!("rejected: {}", e),
    }

    let snapshot = global_metrics().snapshot();
    println!(
        "\ndecoded={} rejected={} (reserved bits: {})",
        snapshot.packets_decoded, snapshot.packets_rejected, snapshot.rejected_reserved_bits
    );
    global_metrics().log_metrics();

    Ok(())
}
