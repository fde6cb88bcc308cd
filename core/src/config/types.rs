use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RingError};
use crate::ring::RingBuffer;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ring: RingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sizing of a [`RingBuffer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingConfig {
    /// Bytes allocated up front. Clamped to `max_size`.
    #[serde(default = "default_initial_size")]
    pub initial_size: usize,

    /// Ceiling of the storage; older bytes are overwritten past it.
    #[serde(default = "default_max_size")]
    pub max_size: usize,
}

fn default_initial_size() -> usize {
    4 * 1024
}

fn default_max_size() -> usize {
    1024 * 1024
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            initial_size: default_initial_size(),
            max_size: default_max_size(),
        }
    }
}

impl RingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size == 0 {
            return Err(ConfigError::Invalid("max_size must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn try_build(&self) -> Result<RingBuffer, RingError> {
        RingBuffer::try_new(self.initial_size, self.max_size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "warn" or "tailbuf_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}
