//! checkout-bridge-logging - Tracing to host log callback bridge
//!
//! This crate provides:
//! - [`HostLoggingLayer`] tracing layer that forwards events to the host
//! - [`LogCallback`] type for the host log callback
//! - Dynamic log level changes through [`set_log_level`]

mod callback;
mod layer;
mod reload;

pub use callback::{LogCallback, LogCallbackManager};
pub use checkout_bridge_core::LogLevel;
pub use layer::{HostLoggingLayer, init_logging};
pub use reload::{ReloadHandle, set_log_level};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        HostLoggingLayer, LogCallback, LogCallbackManager, LogLevel, init_logging, set_log_level,
    };
}
