//! Scripted in-memory payment SDK
//!
//! [`SandboxSdk`] implements every collaborator trait without any platform
//! UI. It records each call the bridge makes, lets a test script failures
//! and wallet availability, and exposes the callback sinks the bridge
//! registered so native callbacks can be simulated. [`EventLog`] collects
//! the events the bridge emits.

use crate::emitter::EventSink;
use async_trait::async_trait;
use checkout_bridge_core::{
    Action, CallbackSink, CheckoutEvent, ComponentCallback, ComponentConfiguration, ComponentKind,
    ComponentRequest, Dismissal, ExternalResult, PaymentMethod, PaymentMethods, PaymentSdk,
    SdkComponent, SdkError, SdkSession, SessionRequest, WalletKind,
};
use parking_lot::{Condvar, Mutex};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;

/// A collaborator call observed by the sandbox
#[derive(Debug, Clone, PartialEq)]
pub enum SdkCall {
    CreateSession {
        session_identifier: String,
        session_data: String,
    },
    BindSession,
    UnbindSession,
    WalletAvailability(WalletKind),
    CreateComponent {
        kind: ComponentKind,
        external_request_code: Option<i32>,
    },
    Present,
    HandleAction(&'static str),
    ExternalResult(i32),
    RemoveObservers,
    Dismiss {
        success: bool,
    },
}

/// What the bridge asked the sandbox to build
#[derive(Debug, Clone)]
pub struct CreatedComponent {
    pub kind: ComponentKind,
    pub payment_methods: PaymentMethods,
    pub payment_method: Option<PaymentMethod>,
    pub configuration: ComponentConfiguration,
    pub external_request_code: Option<i32>,
}

struct Script {
    session_failure: Option<SdkError>,
    session_methods: PaymentMethods,
    wallet_available: bool,
    create_failure: Option<SdkError>,
    present_failure: Option<SdkError>,
    action_failure: Option<SdkError>,
    dismiss_failure: Option<SdkError>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            session_failure: None,
            session_methods: PaymentMethods::default(),
            wallet_available: true,
            create_failure: None,
            present_failure: None,
            action_failure: None,
            dismiss_failure: None,
        }
    }
}

#[derive(Default)]
struct SandboxState {
    calls: Mutex<Vec<SdkCall>>,
    script: Mutex<Script>,
    session_gate: Mutex<Option<Arc<Notify>>>,
    session_requests: Mutex<Vec<SessionRequest>>,
    created: Mutex<Option<CreatedComponent>>,
    component_callbacks: Mutex<Option<Arc<dyn CallbackSink>>>,
    session_callbacks: Mutex<Option<Arc<dyn CallbackSink>>>,
}

impl SandboxState {
    fn record(&self, call: SdkCall) {
        self.calls.lock().push(call);
    }
}

/// Scripted [`PaymentSdk`]
#[derive(Clone, Default)]
pub struct SandboxSdk {
    state: Arc<SandboxState>,
}

impl SandboxSdk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalogue returned by sessions created from now on
    pub fn with_session_methods(self, methods: PaymentMethods) -> Self {
        self.state.script.lock().session_methods = methods;
        self
    }

    pub fn fail_session(&self, err: SdkError) {
        self.state.script.lock().session_failure = Some(err);
    }

    pub fn set_wallet_available(&self, available: bool) {
        self.state.script.lock().wallet_available = available;
    }

    pub fn fail_component_creation(&self, err: SdkError) {
        self.state.script.lock().create_failure = Some(err);
    }

    pub fn fail_present(&self, err: SdkError) {
        self.state.script.lock().present_failure = Some(err);
    }

    pub fn fail_actions(&self, err: SdkError) {
        self.state.script.lock().action_failure = Some(err);
    }

    pub fn fail_dismiss(&self, err: SdkError) {
        self.state.script.lock().dismiss_failure = Some(err);
    }

    /// Make session creation wait until [`SandboxSdk::release_sessions`]
    pub fn hold_sessions(&self) {
        *self.state.session_gate.lock() = Some(Arc::new(Notify::new()));
    }

    pub fn release_sessions(&self) {
        if let Some(gate) = self.state.session_gate.lock().take() {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<SdkCall> {
        self.state.calls.lock().clone()
    }

    pub fn count(&self, call: &SdkCall) -> usize {
        self.state.calls.lock().iter().filter(|c| *c == call).count()
    }

    pub fn has_call(&self, call: &SdkCall) -> bool {
        self.count(call) > 0
    }

    pub fn session_requests(&self) -> Vec<SessionRequest> {
        self.state.session_requests.lock().clone()
    }

    /// The most recent component the bridge built
    pub fn created(&self) -> Option<CreatedComponent> {
        self.state.created.lock().clone()
    }

    /// Callbacks registered by the most recent component, kept after teardown
    pub fn component_callbacks(&self) -> Option<Arc<dyn CallbackSink>> {
        self.state.component_callbacks.lock().clone()
    }

    /// Callbacks bound to the most recent session, kept after unbind
    pub fn session_callbacks(&self) -> Option<Arc<dyn CallbackSink>> {
        self.state.session_callbacks.lock().clone()
    }

    /// Deliver a callback as the most recent component; `false` if none was built
    pub fn deliver(&self, callback: ComponentCallback) -> bool {
        match self.component_callbacks() {
            Some(sink) => {
                sink.deliver(callback);
                true
            }
            None => false,
        }
    }

    pub fn submit(&self, payment_data: Value) -> bool {
        self.deliver(ComponentCallback::Submit(payment_data))
    }

    pub fn provide(&self, action_data: Value) -> bool {
        self.deliver(ComponentCallback::Provide(action_data))
    }

    pub fn complete(&self) -> bool {
        self.deliver(ComponentCallback::Complete)
    }

    pub fn fail(&self, err: SdkError) -> bool {
        self.deliver(ComponentCallback::Fail(err))
    }

    /// Simulate the shopper closing the payment UI
    pub fn cancel(&self) -> bool {
        self.fail(SdkError::cancellation())
    }
}

#[async_trait]
impl PaymentSdk for SandboxSdk {
    async fn create_session(
        &self,
        request: SessionRequest,
    ) -> Result<Arc<dyn SdkSession>, SdkError> {
        self.state.record(SdkCall::CreateSession {
            session_identifier: request.session_identifier.clone(),
            session_data: request.initial_session_data.clone(),
        });
        self.state.session_requests.lock().push(request.clone());

        let gate = self.state.session_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let (failure, methods) = {
            let script = self.state.script.lock();
            (script.session_failure.clone(), script.session_methods.clone())
        };
        match failure {
            Some(err) => Err(err),
            None => Ok(Arc::new(SandboxSession {
                identifier: request.session_identifier,
                methods,
                state: self.state.clone(),
            })),
        }
    }

    async fn is_wallet_available(
        &self,
        wallet: WalletKind,
        _method: &PaymentMethod,
        _configuration: &ComponentConfiguration,
    ) -> bool {
        self.state.record(SdkCall::WalletAvailability(wallet));
        self.state.script.lock().wallet_available
    }

    fn create_component(&self, request: ComponentRequest) -> Result<Arc<dyn SdkComponent>, SdkError> {
        self.state.record(SdkCall::CreateComponent {
            kind: request.kind.clone(),
            external_request_code: request.external_request_code,
        });
        if let Some(err) = self.state.script.lock().create_failure.clone() {
            return Err(err);
        }

        *self.state.component_callbacks.lock() = Some(request.callbacks.clone());
        *self.state.created.lock() = Some(CreatedComponent {
            kind: request.kind,
            payment_methods: request.payment_methods,
            payment_method: request.payment_method,
            configuration: request.configuration,
            external_request_code: request.external_request_code,
        });
        Ok(Arc::new(SandboxComponent {
            state: self.state.clone(),
        }))
    }
}

struct SandboxSession {
    identifier: String,
    methods: PaymentMethods,
    state: Arc<SandboxState>,
}

impl SdkSession for SandboxSession {
    fn session_identifier(&self) -> &str {
        &self.identifier
    }

    fn payment_methods(&self) -> PaymentMethods {
        self.methods.clone()
    }

    fn bind(&self, callbacks: Arc<dyn CallbackSink>) {
        self.state.record(SdkCall::BindSession);
        *self.state.session_callbacks.lock() = Some(callbacks);
    }

    fn unbind(&self) {
        self.state.record(SdkCall::UnbindSession);
    }
}

struct SandboxComponent {
    state: Arc<SandboxState>,
}

impl SdkComponent for SandboxComponent {
    fn present(&self) -> Result<(), SdkError> {
        self.state.record(SdkCall::Present);
        match self.state.script.lock().present_failure.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn handle_action(&self, action: Action) -> Result<(), SdkError> {
        self.state.record(SdkCall::HandleAction(action.type_name()));
        match self.state.script.lock().action_failure.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn handle_external_result(&self, result: ExternalResult) -> Result<(), SdkError> {
        self.state.record(SdkCall::ExternalResult(result.result_code));
        Ok(())
    }

    fn remove_observers(&self) {
        self.state.record(SdkCall::RemoveObservers);
    }

    fn dismiss(&self, dismissal: &Dismissal) -> Result<(), SdkError> {
        self.state.record(SdkCall::Dismiss {
            success: dismissal.success,
        });
        match self.state.script.lock().dismiss_failure.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Event sink that keeps every event for inspection
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<CheckoutEvent>>,
    changed: Condvar,
}

impl EventLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<CheckoutEvent> {
        self.events.lock().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(CheckoutEvent::name).collect()
    }

    pub fn last(&self) -> Option<CheckoutEvent> {
        self.events.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn terminal_count(&self) -> usize {
        self.events.lock().iter().filter(|e| e.is_terminal()).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Block until at least `count` events arrived; `false` on timeout
    pub fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut events = self.events.lock();
        while events.len() < count {
            if self.changed.wait_until(&mut events, deadline).timed_out() {
                return events.len() >= count;
            }
        }
        true
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: CheckoutEvent) {
        self.events.lock().push(event);
        self.changed.notify_all();
    }
}

#[cfg(test)]
#[path = "sandbox/sandbox_tests.rs"]
mod sandbox_tests;
