//! # checkout-bridge
//!
//! Bridges a host runtime (a JavaScript UI layer, a CLI, a test harness) to a
//! native payment SDK. The bridge:
//! - Parses the loosely-typed host configuration once, at the boundary
//! - Establishes server-managed sessions or runs the standalone-action flow
//! - Keeps at most one payment component alive and drives its lifecycle
//! - Routes server-issued actions and external app results to that component
//! - Reports every outcome as one of four host events
//!
//! ## Quick Start
//!
//! ```ignore
//! use checkout_bridge::prelude::*;
//! use serde_json::json;
//!
//! let events = |event: CheckoutEvent| println!("{}", event.name());
//! let bridge = CheckoutBridge::new(Arc::new(platform_sdk), Arc::new(events));
//!
//! let request = OpenRequest::new("dropin", json!({
//!     "clientKey": "test_123",
//!     "session": {"id": "CS1", "sessionData": "Ab02..."}
//! }));
//! bridge.open(request).await?;
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate over:
//! - [`checkout_bridge_core`] - Configuration, errors, events, SDK traits
//! - [`checkout_bridge_transport`] - Host wire formats
//! - [`checkout_bridge_runtime`] - Tokio runtime and host executor
//! - [`checkout_bridge_logging`] - Host log forwarding

mod bridge;
mod dispatcher;
mod emitter;
mod external;
mod module;
mod panic_guard;
mod session;
mod style;

#[cfg(any(test, feature = "sandbox"))]
pub mod sandbox;

pub use bridge::{CheckoutBridge, OpenOutcome, OpenRequest, OpenTicket};
pub use dispatcher::{ActionDispatcher, ActionRoute};
pub use emitter::{ChannelEventSink, EventEmitter, EventSink, inject_return_url, translate_failure};
pub use external::{ACTION_REQUEST_CODE, PendingExternalFlow, WALLET_REQUEST_CODE};
pub use module::CheckoutModule;
pub use panic_guard::{catch_panic, install_panic_hook};
pub use session::SessionEstablisher;
pub use style::{APPEARANCE_KEY, StyleRegistry};

// Re-export the crates embedders need alongside the bridge
pub use checkout_bridge_core as core;
pub use checkout_bridge_core::{
    Action, BridgeSettings, CheckoutError, CheckoutEvent, CheckoutResult, ComponentState,
    ErrorKind, ErrorPayload, ExternalResult, LogLevel, PaymentSdk, SdkError,
};
pub use checkout_bridge_logging as logging;
pub use checkout_bridge_transport::{CallResponse, EventEnvelope, HostCall};

pub use async_trait::async_trait;
pub use serde_json;
pub use tokio;
pub use tracing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BridgeSettings, CallResponse, CheckoutBridge, CheckoutError, CheckoutEvent,
        CheckoutModule, CheckoutResult, ComponentState, EventSink, OpenOutcome, OpenRequest,
        PaymentSdk, StyleRegistry, async_trait,
    };
    pub use checkout_bridge_core::{
        CallbackSink, ComponentCallback, ComponentRequest, Dismissal, SdkComponent, SdkSession,
        SessionRequest,
    };
    pub use std::sync::Arc;
}
