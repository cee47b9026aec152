//! # MQTT Topic Mapping
//!
//! Selene messages bridged onto MQTT carry the header in the topic and only
//! the payload in the message body:
//!
//! ```text
//! Se/<ADDRESS>/<type>[/<PIN>][/r]
//! ```
//!
//! Address and pin are uppercase hexadecimal without leading zeros; the pin
//! segment is present exactly for pin-bearing types; a trailing `r` marks a
//! request. Parsing only accepts the canonical form so that every accepted
//! topic maps back to itself.

use bytes::Bytes;

use crate::config::{PacketConfig, TOPIC_PREFIX, TOPIC_REQUEST_SUFFIX};
use crate::core::packet_type::TypeCode;
use crate::error::constants::{
    ERR_TOPIC_ADDRESS, ERR_TOPIC_PIN, ERR_TOPIC_PREFIX, ERR_TOPIC_TRAILING, ERR_TOPIC_TYPE,
};
use crate::error::{ProtocolError, Result};
use crate::protocol::message::{observe, Body, Message};

/// A topic / payload pair as published to or received from a broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttMessage {
    pub topic: String,
    pub payload: Bytes,
}

impl Message {
    /// Topic for this message.
    pub fn topic(&self) -> String {
        let mut topic = format!("{TOPIC_PREFIX}/{:X}/{}", self.address, self.type_code());
        if let Some(pin) = self.body.pin() {
            topic.push_str(&format!("/{pin:X}"));
        }
        if self.is_request {
            topic.push('/');
            topic.push_str(TOPIC_REQUEST_SUFFIX);
        }
        topic
    }

    pub fn to_mqtt(&self) -> MqttMessage {
        MqttMessage {
            topic: self.topic(),
            payload: self.body.with_payload(Bytes::copy_from_slice),
        }
    }

    /// Parses a topic and payload with default limits.
    pub fn from_mqtt(topic: &str, payload: &[u8]) -> Result<Self> {
        Self::from_mqtt_with(topic, payload, &PacketConfig::default())
    }

    pub fn from_mqtt_with(topic: &str, payload: &[u8], config: &PacketConfig) -> Result<Self> {
        let result = parse(topic, payload, config.max_payload_size);
        observe(&result, payload.len(), config);
        result
    }
}

impl TryFrom<&MqttMessage> for Message {
    type Error = ProtocolError;

    fn try_from(mqtt: &MqttMessage) -> Result<Self> {
        Message::from_mqtt(&mqtt.topic, &mqtt.payload)
    }
}

fn parse(topic: &str, payload: &[u8], max_payload_size: usize) -> Result<Message> {
    let invalid = |reason| ProtocolError::InvalidTopic {
        topic: topic.to_owned(),
        reason,
    };
    let mut segments = topic.split('/');

    if segments.next() != Some(TOPIC_PREFIX) {
        return Err(invalid(ERR_TOPIC_PREFIX));
    }

    let address = segments
        .next()
        .and_then(parse_hex)
        .ok_or_else(|| invalid(ERR_TOPIC_ADDRESS))?;

    let type_code = segments
        .next()
        .and_then(TypeCode::from_name)
        .ok_or_else(|| invalid(ERR_TOPIC_TYPE))?;

    let pin = if type_code.has_pin() {
        segments
            .next()
            .and_then(parse_hex)
            .and_then(|v| u8::try_from(v).ok())
            .ok_or_else(|| invalid(ERR_TOPIC_PIN))?
    } else {
        0
    };

    let is_request = match segments.next() {
        None => false,
        Some(TOPIC_REQUEST_SUFFIX) => true,
        Some(_) => return Err(invalid(ERR_TOPIC_TRAILING)),
    };
    if segments.next().is_some() {
        return Err(invalid(ERR_TOPIC_TRAILING));
    }

    Ok(Message {
        address,
        is_request,
        body: Body::decode(type_code, pin, payload, max_payload_size)?,
    })
}

/// Canonical uppercase hex: round-trips through `{:X}` unchanged.
fn parse_hex(segment: &str) -> Option<u32> {
    let v = u32::from_str_radix(segment, 16).ok()?;
    (format!("{v:X}") == segment).then_some(v)
}
