#![no_main]

use libfuzzer_sys::fuzz_target;
use selene_protocol::Message;

fuzz_target!(|input: (&str, &[u8])| {
    let (topic, payload) = input;
    // Only canonical topics parse, so an accepted topic maps back to itself
    if let Ok(msg) = Message::from_mqtt(topic, payload) {
        let mqtt = msg.to_mqtt();
        assert_eq!(mqtt.topic, topic);
        assert_eq!(&mqtt.payload[..], payload);
    }
});
