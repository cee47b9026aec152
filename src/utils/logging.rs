//! Structured logging setup.
//!
//! Installs a `tracing-subscriber` fmt layer according to [`LoggingConfig`].
//! `RUST_LOG` overrides the configured level when set.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{ProtocolError, Result};

/// Initialize the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_ascii_lowercase()));

    let registry = tracing_subscriber::registry().with(filter);

    let file_writer = match (config.log_to_file, config.log_file_path.as_deref()) {
        (true, Some(path)) => Some(Mutex::new(
            OpenOptions::new().create(true).append(true).open(path)?,
        )),
        (true, None) => {
            return Err(ProtocolError::ConfigError(
                "log_file_path must be specified when log_to_file is true".to_string(),
            ))
        }
        (false, _) => None,
    };

    // console and file layers are optional; `Option<Layer>` is itself a layer
    let result = if config.json_format {
        let console = config.log_to_console.then(|| fmt::layer().json());
        let file = file_writer.map(|w| fmt::layer().json().with_writer(w));
        registry.with(console).with(file).try_init()
    } else {
        let console = config.log_to_console.then(fmt::layer);
        let file = file_writer.map(|w| fmt::layer().with_ansi(false).with_writer(w));
        registry.with(console).with(file).try_init()
    };
    result.map_err(|e| ProtocolError::ConfigError(format!("Failed to init logging: {e}")))?;

    info!(app = %config.app_name, level = %config.log_level, "Logging initialized");
    Ok(())
}
