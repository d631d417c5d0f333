//! Dynamic log level reloading support

use crate::LogCallbackManager;
use checkout_bridge_core::{CheckoutError, CheckoutResult, LogLevel};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{Registry, reload};

/// Handle for swapping the level filter of the installed subscriber
pub struct ReloadHandle {
    handle: Mutex<Option<reload::Handle<LevelFilter, Registry>>>,
}

impl ReloadHandle {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    pub fn global() -> &'static ReloadHandle {
        static INSTANCE: OnceCell<ReloadHandle> = OnceCell::new();
        INSTANCE.get_or_init(ReloadHandle::new)
    }

    /// Set by [`crate::init_logging`] once the subscriber is installed
    pub fn set_handle(&self, handle: reload::Handle<LevelFilter, Registry>) {
        *self.handle.lock() = Some(handle);
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.lock().is_some()
    }

    pub fn reload_level(&self, level: LogLevel) -> CheckoutResult<()> {
        let guard = self.handle.lock();
        let handle = guard
            .as_ref()
            .ok_or_else(|| CheckoutError::Internal("log reload handle not initialized".to_string()))?;
        handle
            .reload(level_filter(level))
            .map_err(|e| CheckoutError::Internal(format!("failed to reload log filter: {e}")))
    }
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Change the level forwarded to the host
///
/// The callback manager always takes the new level. The subscriber filter is
/// only reloaded when this crate installed the subscriber.
pub fn set_log_level(level: LogLevel) {
    LogCallbackManager::global().set_level(level);
    let reload = ReloadHandle::global();
    if reload.is_initialized() {
        if let Err(e) = reload.reload_level(level) {
            tracing::warn!(error = %e, "could not reload log level");
        }
    }
}

pub(crate) fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Off => LevelFilter::OFF,
    }
}

#[cfg(test)]
#[path = "reload/reload_tests.rs"]
mod reload_tests;
