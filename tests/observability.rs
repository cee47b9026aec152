//! Logging setup and global metrics as seen from outside the crate.
//!
//! The subscriber is process-global, so every logging assertion lives in a
//! single test.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use selene_protocol::config::LoggingConfig;
use selene_protocol::utils::{global_metrics, init_logging};
use selene_protocol::{Message, ProtocolError};
use tracing::Level;

#[test]
fn test_init_logging_to_file() {
    let path = std::env::temp_dir().join(format!("selene-log-{}.jsonl", std::process::id()));
    let missing_path = LoggingConfig {
        log_to_file: true,
        log_file_path: None,
        ..LoggingConfig::default()
    };
    assert!(matches!(
        init_logging(&missing_path),
        Err(ProtocolError::ConfigError(_))
    ));

    let config = LoggingConfig {
        app_name: "selene-test".to_string(),
        log_level: Level::DEBUG,
        log_to_console: false,
        log_to_file: true,
        log_file_path: Some(path.to_string_lossy().into_owned()),
        json_format: true,
    };
    init_logging(&config).expect("first init succeeds");

    // a second subscriber cannot be installed
    assert!(matches!(
        init_logging(&config),
        Err(ProtocolError::ConfigError(_))
    ));

    let _ = Message::from_bytes(&[b'X'; 11]);

    let contents = std::fs::read_to_string(&path).expect("log file written");
    std::fs::remove_file(&path).ok();
    assert!(contents.contains("Logging initialized"));
    assert!(contents.contains("Rejected Selene packet"));
}

#[test]
fn test_decode_outcomes_are_counted() {
    let metrics = global_metrics();
    let before = metrics.snapshot();

    let wire = Message::pin(0xC30, 0xD2, 7).to_bytes().unwrap();
    Message::from_bytes(&wire).unwrap();
    let _ = Message::from_bytes(&wire[..12]);
    let _ = Message::from_mqtt("Se/c30/pin/D2", &wire[11..]);

    let after = metrics.snapshot();
    // other tests in this binary may decode concurrently, so only lower bounds hold
    assert!(after.packets_encoded > before.packets_encoded);
    assert!(after.packets_decoded > before.packets_decoded);
    assert!(after.bytes_decoded >= before.bytes_decoded + wire.len() as u64);
    assert!(after.rejected_truncated > before.rejected_truncated);
    assert!(after.rejected_topic > before.rejected_topic);
    assert!(after.packets_rejected >= before.packets_rejected + 2);
}
