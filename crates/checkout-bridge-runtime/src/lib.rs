//! checkout-bridge-runtime - Tokio runtime integration
//!
//! This crate provides:
//! - [`AsyncRuntime`] owning the Tokio runtime continuations run on
//! - [`HostExecutor`] bridging synchronous host calls to async bridge operations
//! - Graceful shutdown with broadcast signals

mod executor;
mod runtime;
mod shutdown;

pub use executor::{HostExecutor, panic_message};
pub use runtime::{AsyncRuntime, RuntimeConfig};
pub use shutdown::{ShutdownHandle, ShutdownSignal};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{AsyncRuntime, HostExecutor, RuntimeConfig, ShutdownHandle, ShutdownSignal};
}
