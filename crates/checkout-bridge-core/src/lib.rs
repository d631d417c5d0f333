//! checkout-bridge-core - Core types for the checkout bridge
//!
//! This crate provides the foundational types shared by every checkout-bridge crate:
//! - [`RootConfiguration`] and [`SessionConfiguration`] parsed from host payloads
//! - [`ComponentState`] for the single-active-component state machine
//! - [`CheckoutError`] and [`ConfigError`] for the error taxonomy
//! - [`CheckoutEvent`] for the host event vocabulary
//! - [`PaymentSdk`], [`SdkSession`] and [`SdkComponent`] traits for the native SDK

mod action;
mod config;
mod environment;
mod error;
mod event;
mod lifecycle;
mod payment_methods;
mod sdk;
mod settings;

pub use action::{Action, deserialize_action};
pub use config::{
    Amount, CardConfiguration, ComponentConfiguration, DropInConfiguration, MethodConfiguration,
    Payment, RawConfiguration, RootConfiguration, SessionConfiguration, WalletConfiguration, keys,
};
pub use environment::Environment;
pub use error::{
    CANCELED_MESSAGE, CheckoutError, CheckoutResult, ConfigError, ErrorKind, SdkError, SdkOrigin,
};
pub use event::{CheckoutEvent, ErrorPayload};
pub use lifecycle::ComponentState;
pub use payment_methods::{
    ComponentKind, PaymentMethod, PaymentMethods, StoredPaymentMethod, WalletKind,
};
pub use sdk::{
    CallbackSink, ComponentCallback, ComponentRequest, Dismissal, ExternalResult, PaymentSdk,
    SdkComponent, SdkSession, SessionRequest,
};
pub use settings::BridgeSettings;

/// Log levels forwarded to the host log callback
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Off,
        }
    }

    /// Parse a level name as written in [`BridgeSettings::log_level`]
    ///
    /// Matching is case-insensitive; unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            "off" | "none" => Some(LogLevel::Off),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Action, CallbackSink, CheckoutError, CheckoutEvent, CheckoutResult, ComponentCallback,
        ComponentKind, ComponentState, ConfigError, ErrorKind, LogLevel, PaymentMethods,
        PaymentSdk, RawConfiguration, RootConfiguration, SdkComponent, SdkError, SdkSession,
        SessionConfiguration, WalletKind,
    };
}
