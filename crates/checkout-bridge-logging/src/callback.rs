//! Host log callback management

use checkout_bridge_core::LogLevel;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Host callback receiving `(level, target, message)`
///
/// Invoked from whichever thread emitted the event, so it must not block.
pub type LogCallback = Arc<dyn Fn(LogLevel, &str, &str) + Send + Sync>;

static CALLBACK_MANAGER: OnceCell<LogCallbackManager> = OnceCell::new();

/// Holds the host log callback and the minimum level forwarded to it
pub struct LogCallbackManager {
    callback: RwLock<Option<LogCallback>>,
    level: AtomicU8,
}

impl LogCallbackManager {
    pub fn new() -> Self {
        Self {
            callback: RwLock::new(None),
            level: AtomicU8::new(LogLevel::Info as u8),
        }
    }

    /// Process-wide instance used by [`crate::HostLoggingLayer::new`]
    pub fn global() -> &'static LogCallbackManager {
        CALLBACK_MANAGER.get_or_init(LogCallbackManager::new)
    }

    pub fn set_callback(&self, callback: Option<LogCallback>) {
        *self.callback.write() = callback;
    }

    pub fn has_callback(&self) -> bool {
        self.callback.read().is_some()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::SeqCst))
    }

    /// `Off` disables every level
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        let threshold = self.level();
        threshold != LogLevel::Off && level >= threshold
    }

    /// Forward a message when a callback is set and the level is enabled
    pub fn log(&self, level: LogLevel, target: &str, message: &str) {
        if !self.is_enabled(level) {
            return;
        }
        // Invoked outside the lock; callbacks may log themselves.
        let callback = self.callback.read().clone();
        if let Some(callback) = callback {
            callback(level, target, message);
        }
    }
}

impl Default for LogCallbackManager {
    fn default() -> Self {
        Self::new()
    }
}
