//! Tracing layer that forwards to the host log callback

use crate::callback::LogCallbackManager;
use crate::reload::ReloadHandle;
use checkout_bridge_core::LogLevel;
use std::fmt::Write as _;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Tracing layer that forwards log events to the host
///
/// Structured fields are appended to the message as `key=value` pairs so
/// they survive the trip through a plain-text host logger.
pub struct HostLoggingLayer {
    manager: &'static LogCallbackManager,
}

impl HostLoggingLayer {
    pub fn new() -> Self {
        Self {
            manager: LogCallbackManager::global(),
        }
    }

    pub fn with_manager(manager: &'static LogCallbackManager) -> Self {
        Self { manager }
    }

    fn convert_level(level: &Level) -> LogLevel {
        match *level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }
}

impl Default for HostLoggingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for HostLoggingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::convert_level(metadata.level());
        if !self.manager.is_enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.manager
            .log(level, metadata.target(), &visitor.into_message());
    }

    fn enabled(&self, metadata: &tracing::Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.manager
            .is_enabled(Self::convert_level(metadata.level()))
    }
}

/// Collects the `message` field and the remaining fields of an event
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: String,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: std::fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }

    fn into_message(self) -> String {
        match (self.message, self.fields.is_empty()) {
            (Some(message), true) => message,
            (Some(message), false) => format!("{message} {}", self.fields),
            (None, _) => self.fields,
        }
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }
}

/// Install the host logging layer as the global subscriber
///
/// The registry carries a reloadable level filter so [`crate::set_log_level`]
/// can change verbosity later. Returns `false` when another subscriber was
/// already installed; the level is applied to the callback manager either way.
pub fn init_logging(level: LogLevel) -> bool {
    use tracing_subscriber::prelude::*;

    LogCallbackManager::global().set_level(level);

    let (filter, handle) =
        tracing_subscriber::reload::Layer::new(crate::reload::level_filter(level));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(HostLoggingLayer::new());

    match tracing::subscriber::set_global_default(subscriber) {
        Ok(()) => {
            ReloadHandle::global().set_handle(handle);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
#[path = "layer/layer_tests.rs"]
mod layer_tests;
