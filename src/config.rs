//! # Configuration Management
//!
//! Wire constants and runtime configuration for the Selene packet library.
//!
//! The wire constants are fixed by the protocol. The runtime configuration
//! only tunes how this crate decodes and logs; it never changes the bytes
//! that go on the wire.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - `SELENE_*` environment overrides via `from_env()`

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::Level;

/// Default limit for variable-size payloads (devinfo / pininfo)
pub const MAX_PAYLOAD_SIZE: usize = 144;

/// The payload-size header field is a single byte
pub const PAYLOAD_SIZE_FIELD_MAX: usize = u8::MAX as usize;

/// First segment of every Selene MQTT topic
pub const TOPIC_PREFIX: &str = "Se";

/// Trailing topic segment marking a request
pub const TOPIC_REQUEST_SUFFIX: &str = "r";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SeleneConfig {
    /// Decoding limits
    #[serde(default)]
    pub packet: PacketConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SeleneConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ProtocolError::ConfigError(format!("Cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Defaults overridden by `SELENE_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(size) = std::env::var("SELENE_MAX_PAYLOAD_SIZE") {
            config.packet.max_payload_size = size.parse::<usize>().map_err(|e| {
                ProtocolError::ConfigError(format!("Invalid SELENE_MAX_PAYLOAD_SIZE '{size}': {e}"))
            })?;
        }

        if let Ok(flag) = std::env::var("SELENE_LOG_REJECTIONS") {
            config.packet.log_rejections = parse_bool(&flag).ok_or_else(|| {
                ProtocolError::ConfigError(format!("Invalid SELENE_LOG_REJECTIONS '{flag}'"))
            })?;
        }

        if let Ok(level) = std::env::var("SELENE_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                ProtocolError::ConfigError(format!("Invalid SELENE_LOG_LEVEL '{level}'"))
            })?;
        }

        if let Ok(flag) = std::env::var("SELENE_LOG_JSON") {
            config.logging.json_format = parse_bool(&flag).ok_or_else(|| {
                ProtocolError::ConfigError(format!("Invalid SELENE_LOG_JSON '{flag}'"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Returns every problem found. Empty means the configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.packet.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Limits shared by every typed decode and encode path
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PacketConfig {
    /// Largest devinfo / pininfo payload read or written, in bytes
    pub max_payload_size: usize,

    /// Emit a debug event for every rejected inbound packet
    pub log_rejections: bool,
}

impl Default for PacketConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
            log_rejections: true,
        }
    }
}

impl PacketConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_payload_size > PAYLOAD_SIZE_FIELD_MAX {
            errors.push(format!(
                "Max payload size too large: {} bytes (payload-size field maximum: {})",
                self.max_payload_size, PAYLOAD_SIZE_FIELD_MAX
            ));
        } else if self.max_payload_size > MAX_PAYLOAD_SIZE {
            errors.push(format!(
                "WARNING: Max payload size {} exceeds the {}-byte limit other Selene peers enforce",
                self.max_payload_size, MAX_PAYLOAD_SIZE
            ));
        }

        errors
    }
}

/// Where and how `init_logging` writes events. Missing keys take their
/// defaults, so a `[logging]` table may set only what it changes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Reported once at startup
    pub app_name: String,

    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    pub log_to_console: bool,

    pub log_to_file: bool,

    /// Appended to, created if missing. Required when `log_to_file` is set.
    pub log_file_path: Option<String>,

    /// One JSON object per event instead of the human-readable format
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("selene"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match (self.log_to_file, self.log_file_path.as_deref()) {
            (true, None) => {
                errors.push("log_file_path must be specified when log_to_file is true".to_string())
            }
            (true, Some(path)) => {
                let dir = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty());
                if let Some(dir) = dir.filter(|d| !d.exists()) {
                    errors.push(format!("Log file directory does not exist: {}", dir.display()));
                }
            }
            (false, _) => {}
        }

        if !self.log_to_console && !self.log_to_file {
            errors.push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// `tracing::Level` as a lowercase string ("info", "debug", ...)
mod log_level_serde {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use tracing::Level;

    pub fn serialize<S: Serializer>(level: &Level, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&level.as_str().to_ascii_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Level, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse()
            .map_err(|_| D::Error::custom(format!("Invalid log level: {name}")))
    }
}
