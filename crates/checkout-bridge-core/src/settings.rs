//! Settings of the bridge itself

use crate::LogLevel;
use serde::{Deserialize, Serialize};

/// Bridge settings passed once when the host module is created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeSettings {
    /// Initial log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Worker threads of the bridge runtime
    ///
    /// One worker keeps every continuation on a single logical context.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Shutdown timeout in milliseconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_ms: u64,

    /// Appearance override registered process-wide on startup
    #[serde(default)]
    pub appearance: Option<serde_json::Value>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_worker_threads() -> usize {
    1
}

fn default_shutdown_timeout() -> u64 {
    1000
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            worker_threads: default_worker_threads(),
            shutdown_timeout_ms: default_shutdown_timeout(),
            appearance: None,
        }
    }
}

impl BridgeSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create settings from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    /// Parsed log level, `Info` when the name is not recognised
    pub fn level(&self) -> LogLevel {
        LogLevel::parse(&self.log_level).unwrap_or(LogLevel::Info)
    }
}
