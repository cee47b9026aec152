//! # Protocol Layer
//!
//! Typed Selene messages and their MQTT representation.
//!
//! ## Components
//! - **Message**: owned packet with per-type payload decoding and encoding
//! - **Topic**: `Se/<ADDRESS>/<type>[/<PIN>][/r]` topic mapping
//! - **JSON**: human-readable form for consoles and JSON bridges
//!
//! Wire and topic decoding record outcomes in the global metrics and log rejected
//! input at `debug` level.

pub mod json;
pub mod message;
pub mod topic;

#[cfg(test)]
mod tests;
