//! Synchronous host module facade
//!
//! Host runtimes call into the bridge from their own threads and expect an
//! immediate acknowledgement; outcomes arrive later as events. Every entry
//! point here is panic-guarded and never blocks on network-bound work.

use crate::bridge::{CheckoutBridge, OpenOutcome, OpenRequest, OpenTicket};
use crate::emitter::EventSink;
use crate::panic_guard::{catch_panic, install_panic_hook};
use crate::style::StyleRegistry;
use checkout_bridge_core::{
    BridgeSettings, CheckoutError, CheckoutResult, ComponentState, ExternalResult, LogLevel,
    PaymentSdk,
};
use checkout_bridge_logging::{LogCallback, LogCallbackManager, init_logging, set_log_level};
use checkout_bridge_runtime::{AsyncRuntime, HostExecutor, RuntimeConfig};
use checkout_bridge_transport::{CallResponse, HostCall};
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

/// Entry point the host runtime talks to
pub struct CheckoutModule {
    bridge: CheckoutBridge,
    executor: HostExecutor,
    settings: BridgeSettings,
}

impl CheckoutModule {
    /// Create the module using the process-wide [`StyleRegistry`]
    ///
    /// The appearance from `settings`, if any, is registered there.
    pub fn new(
        settings: BridgeSettings,
        sdk: Arc<dyn PaymentSdk>,
        sink: Arc<dyn EventSink>,
    ) -> CheckoutResult<Self> {
        Self::with_styles(settings, sdk, sink, StyleRegistry::global())
    }

    pub fn with_styles(
        settings: BridgeSettings,
        sdk: Arc<dyn PaymentSdk>,
        sink: Arc<dyn EventSink>,
        styles: Arc<StyleRegistry>,
    ) -> CheckoutResult<Self> {
        install_panic_hook();
        set_log_level(settings.level());

        if let Some(appearance) = settings.appearance.clone() {
            styles.set_appearance(appearance);
        }

        let runtime = AsyncRuntime::new(RuntimeConfig::from_settings(&settings))?;
        let executor = HostExecutor::new(Arc::new(runtime));
        let bridge = CheckoutBridge::with_styles(sdk, sink, styles);

        tracing::info!(
            worker_threads = settings.worker_threads,
            log_level = %settings.level(),
            "checkout module ready"
        );
        Ok(Self {
            bridge,
            executor,
            settings,
        })
    }

    /// Route bridge logs to the host logger
    ///
    /// Returns `false` when a tracing subscriber was already installed; the
    /// callback and level are registered either way.
    pub fn install_host_logging(callback: LogCallback, level: LogLevel) -> bool {
        LogCallbackManager::global().set_callback(Some(callback));
        init_logging(level)
    }

    pub fn bridge(&self) -> &CheckoutBridge {
        &self.bridge
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    pub fn state(&self) -> ComponentState {
        self.bridge.state()
    }

    /// Start opening a component; the outcome arrives as events
    ///
    /// A panic inside the spawned open only resets the bridge while that
    /// open still owns the lifecycle.
    pub fn open(&self, request: OpenRequest) -> CallResponse {
        let call_id = self.executor.next_call_id();
        let bridge = self.bridge.clone();
        let recovery = self.bridge.clone();
        let ticket = OpenTicket::new();
        let owner = ticket.clone();

        let spawned = self.executor.spawn_guarded(
            "open",
            async move {
                if let Err(err) = bridge.open_with_ticket(request, ticket).await {
                    tracing::debug!(error = %err, "open finished with failure");
                }
            },
            move |message| recovery.recover_open_panic(&owner, &message),
        );

        match spawned {
            Ok(()) => CallResponse::accepted().with_call_id(call_id),
            Err(err) => {
                tracing::warn!(error = %err, "open refused");
                CallResponse::from_error(&err).with_call_id(call_id)
            }
        }
    }

    /// Open a component and wait until it is presented or has failed
    ///
    /// Must be called from a host thread, never from inside the bridge runtime.
    pub fn open_blocking(&self, request: OpenRequest) -> CheckoutResult<OpenOutcome> {
        let bridge = self.bridge.clone();
        let ticket = OpenTicket::new();
        let owner = ticket.clone();
        self.guarded_with(
            "open",
            || self.executor.call_sync(bridge.open_with_ticket(request, ticket)),
            |message| self.bridge.recover_open_panic(&owner, message),
        )
    }

    pub fn hide(&self, success: bool, message: Option<Value>) -> CallResponse {
        let call_id = self.executor.next_call_id();
        let result = self.guarded("hide", || self.bridge.hide(success, message));
        Self::respond(call_id, result)
    }

    pub fn handle(&self, action: &Value) -> CallResponse {
        let call_id = self.executor.next_call_id();
        let result = self.guarded("handle", || self.bridge.handle(action));
        Self::respond(call_id, result)
    }

    /// Forward an activity or sheet result; `false` when nothing waited for it
    pub fn handle_activity_result(
        &self,
        request_code: i32,
        result_code: i32,
        data: Option<Value>,
    ) -> bool {
        let result = self.guarded("activityResult", || {
            Ok(self
                .bridge
                .rejoin_external_result(request_code, ExternalResult::new(result_code, data)))
        });
        result.unwrap_or(false)
    }

    /// Execute a decoded host call
    pub fn dispatch(&self, call: HostCall) -> CallResponse {
        tracing::debug!(method = call.method(), "host call");
        match call {
            HostCall::Open {
                component,
                payment_methods,
                configuration,
            } => self.open(OpenRequest {
                component,
                payment_methods,
                configuration,
            }),
            HostCall::Hide { success, message } => self.hide(success, message),
            HostCall::Handle { action } => self.handle(&action),
            HostCall::ActivityResult {
                request_code,
                result_code,
                data,
            } => {
                let call_id = self.executor.next_call_id();
                if self.handle_activity_result(request_code, result_code, data) {
                    CallResponse::accepted().with_call_id(call_id)
                } else {
                    CallResponse::rejected(
                        "noPendingFlow",
                        format!("no external flow waiting for request code {request_code}"),
                    )
                    .with_call_id(call_id)
                }
            }
        }
    }

    /// Decode, execute and encode a host call in its JSON wire form
    pub fn dispatch_json(&self, request: &[u8]) -> Vec<u8> {
        let response = match HostCall::from_bytes(request) {
            Ok(call) => self.dispatch(call),
            Err(err) => {
                tracing::warn!(error = %err, "undecodable host call");
                CallResponse::from_error(&CheckoutError::from(err))
            }
        };
        match response.to_bytes() {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(error = %err, "failed to encode call response");
                br#"{"status":"rejected","errorCode":"internal"}"#.to_vec()
            }
        }
    }

    /// Dismiss anything still open and stop the runtime
    pub fn shutdown(&self) -> CheckoutResult<()> {
        if let Err(err) = self.guarded("shutdown", || self.bridge.hide(false, None)) {
            tracing::warn!(error = %err, "hide during shutdown failed");
        }
        let timeout = Duration::from_millis(self.settings.shutdown_timeout_ms);
        self.executor.runtime().shutdown(timeout)
    }

    /// Run a host operation, turning a panic into an internal failure
    fn guarded<R>(
        &self,
        operation: &'static str,
        f: impl FnOnce() -> CheckoutResult<R>,
    ) -> CheckoutResult<R> {
        self.guarded_with(operation, f, |message| {
            self.bridge.recover_from_panic(message)
        })
    }

    fn guarded_with<R>(
        &self,
        operation: &'static str,
        f: impl FnOnce() -> CheckoutResult<R>,
        recover: impl FnOnce(&str),
    ) -> CheckoutResult<R> {
        match catch_panic(operation, AssertUnwindSafe(f)) {
            Ok(result) => result,
            Err(err) => {
                let message = match &err {
                    CheckoutError::Internal(message) => message.clone(),
                    other => other.to_string(),
                };
                recover(&message);
                Err(err)
            }
        }
    }

    fn respond(call_id: u64, result: CheckoutResult<()>) -> CallResponse {
        match result {
            Ok(()) => CallResponse::accepted().with_call_id(call_id),
            Err(err) => CallResponse::from_error(&err).with_call_id(call_id),
        }
    }
}
