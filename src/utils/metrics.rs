//! Observability and Metrics
//!
//! Counters for typed message decoding and encoding, broken down by the
//! reason a packet was rejected.
//!
//! Uses atomic counters for thread-safe metrics collection. The zero-copy
//! [`PacketView`](crate::core::packet::PacketView) and
//! [`PinUpdate`](crate::core::pin_update::PinUpdate) paths never touch these.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

use crate::error::{ProtocolError, ValidationError};

/// Global metrics collector for message operations
#[derive(Debug)]
pub struct Metrics {
    /// Messages decoded successfully
    pub packets_decoded: AtomicU64,
    /// Messages encoded
    pub packets_encoded: AtomicU64,
    /// Inbound packets rejected for any reason
    pub packets_rejected: AtomicU64,
    /// Bytes of accepted inbound input
    pub bytes_decoded: AtomicU64,
    /// Bytes written by encoding
    pub bytes_encoded: AtomicU64,
    /// Rejections: prefix byte was not 'S'
    pub rejected_bad_prefix: AtomicU64,
    /// Rejections: type code outside 1-5
    pub rejected_unknown_type: AtomicU64,
    /// Rejections: pin field on a type without one
    pub rejected_illegal_pin: AtomicU64,
    /// Rejections: reserved bits set
    pub rejected_reserved_bits: AtomicU64,
    /// Rejections: payload size disagrees with the type
    pub rejected_size_mismatch: AtomicU64,
    /// Rejections: input shorter than the header or declared payload
    pub rejected_truncated: AtomicU64,
    /// Rejections: payload content (connection flag, UTF-8, length limit)
    pub rejected_payload: AtomicU64,
    /// Rejections: malformed MQTT topic
    pub rejected_topic: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            packets_decoded: AtomicU64::new(0),
            packets_encoded: AtomicU64::new(0),
            packets_rejected: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            rejected_bad_prefix: AtomicU64::new(0),
            rejected_unknown_type: AtomicU64::new(0),
            rejected_illegal_pin: AtomicU64::new(0),
            rejected_reserved_bits: AtomicU64::new(0),
            rejected_size_mismatch: AtomicU64::new(0),
            rejected_truncated: AtomicU64::new(0),
            rejected_payload: AtomicU64::new(0),
            rejected_topic: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a decoded message
    pub fn packet_decoded(&self, byte_count: u64) {
        self.packets_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record an encoded message
    pub fn packet_encoded(&self, byte_count: u64) {
        self.packets_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a rejected inbound packet under its reason
    pub fn packet_rejected(&self, error: &ProtocolError) {
        self.packets_rejected.fetch_add(1, Ordering::Relaxed);
        let counter = match error {
            ProtocolError::Invalid(v) => match v {
                ValidationError::BadPrefix(_) => &self.rejected_bad_prefix,
                ValidationError::UnknownType(_) => &self.rejected_unknown_type,
                ValidationError::IllegalPinField { .. } => &self.rejected_illegal_pin,
                ValidationError::ReservedBitsSet { .. } => &self.rejected_reserved_bits,
                ValidationError::PayloadSizeMismatch { .. } => &self.rejected_size_mismatch,
                ValidationError::Truncated { .. } => &self.rejected_truncated,
            },
            ProtocolError::BufferTooShort { .. } => &self.rejected_truncated,
            ProtocolError::InvalidTopic { .. } => &self.rejected_topic,
            ProtocolError::OversizedPayload(_) | ProtocolError::InvalidPayload(_) => {
                &self.rejected_payload
            }
            ProtocolError::Io(_)
            | ProtocolError::SerializeError(_)
            | ProtocolError::DeserializeError(_)
            | ProtocolError::ConfigError(_) => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            packets_decoded: self.packets_decoded.load(Ordering::Relaxed),
            packets_encoded: self.packets_encoded.load(Ordering::Relaxed),
            packets_rejected: self.packets_rejected.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            rejected_bad_prefix: self.rejected_bad_prefix.load(Ordering::Relaxed),
            rejected_unknown_type: self.rejected_unknown_type.load(Ordering::Relaxed),
            rejected_illegal_pin: self.rejected_illegal_pin.load(Ordering::Relaxed),
            rejected_reserved_bits: self.rejected_reserved_bits.load(Ordering::Relaxed),
            rejected_size_mismatch: self.rejected_size_mismatch.load(Ordering::Relaxed),
            rejected_truncated: self.rejected_truncated.load(Ordering::Relaxed),
            rejected_payload: self.rejected_payload.load(Ordering::Relaxed),
            rejected_topic: self.rejected_topic.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            packets_decoded = snapshot.packets_decoded,
            packets_encoded = snapshot.packets_encoded,
            packets_rejected = snapshot.packets_rejected,
            bytes_decoded = snapshot.bytes_decoded,
            bytes_encoded = snapshot.bytes_encoded,
            rejected_bad_prefix = snapshot.rejected_bad_prefix,
            rejected_unknown_type = snapshot.rejected_unknown_type,
            rejected_illegal_pin = snapshot.rejected_illegal_pin,
            rejected_reserved_bits = snapshot.rejected_reserved_bits,
            rejected_size_mismatch = snapshot.rejected_size_mismatch,
            rejected_truncated = snapshot.rejected_truncated,
            rejected_payload = snapshot.rejected_payload,
            rejected_topic = snapshot.rejected_topic,
            uptime_seconds = snapshot.uptime_seconds,
            "Selene metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub packets_decoded: u64,
    pub packets_encoded: u64,
    pub packets_rejected: u64,
    pub bytes_decoded: u64,
    pub bytes_encoded: u64,
    pub rejected_bad_prefix: u64,
    pub rejected_unknown_type: u64,
    pub rejected_illegal_pin: u64,
    pub rejected_reserved_bits: u64,
    pub rejected_size_mismatch: u64,
    pub rejected_truncated: u64,
    pub rejected_payload: u64,
    pub rejected_topic: u64,
    pub uptime_seconds: u64,
}

/// Global metrics instance
static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}

/// Initialize metrics collection (call once at startup)
pub fn init_metrics() {
    let _ = global_metrics();
    info!("Metrics collection initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_bucketed() {
        let metrics = Metrics::new();
        metrics.packet_rejected(&ProtocolError::Invalid(ValidationError::BadPrefix(0)));
        metrics.packet_rejected(&ProtocolError::Invalid(ValidationError::Truncated {
            needed: 15,
            available: 12,
        }));
        metrics.packet_rejected(&ProtocolError::BufferTooShort {
            needed: 11,
            available: 3,
        });
        metrics.packet_rejected(&ProtocolError::OversizedPayload(200));

        let snap = metrics.snapshot();
        assert_eq!(snap.packets_rejected, 4);
        assert_eq!(snap.rejected_bad_prefix, 1);
        assert_eq!(snap.rejected_truncated, 2);
        assert_eq!(snap.rejected_payload, 1);
        assert_eq!(snap.rejected_topic, 0);
    }

    #[test]
    fn test_byte_counters() {
        let metrics = Metrics::new();
        metrics.packet_decoded(15);
        metrics.packet_decoded(11);
        metrics.packet_encoded(12);

        let snap = metrics.snapshot();
        assert_eq!(snap.packets_decoded, 2);
        assert_eq!(snap.bytes_decoded, 26);
        assert_eq!(snap.packets_encoded, 1);
        assert_eq!(snap.bytes_encoded, 12);
    }
}
