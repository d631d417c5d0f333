//! Single-active-component lifecycle
//!
//! [`CheckoutBridge`] owns at most one (session, component) pair at a time.
//! Every mutation happens under one lock over [`BridgeState`]; SDK calls,
//! awaits and event emission happen with the lock released. Each teardown
//! bumps the epoch so continuations and callbacks belonging to an earlier
//! component recognise themselves as stale and back off.

use crate::dispatcher::ActionDispatcher;
use crate::emitter::{EventEmitter, EventSink, translate_failure};
use crate::external::PendingExternalFlow;
use crate::session::SessionEstablisher;
use crate::style::StyleRegistry;
use checkout_bridge_core::{
    CallbackSink, CheckoutError, CheckoutResult, ComponentCallback, ComponentConfiguration,
    ComponentKind, ComponentRequest, ComponentState, ConfigError, Dismissal, ExternalResult,
    PaymentMethods, PaymentSdk, RawConfiguration, RootConfiguration, SdkComponent, SdkSession,
    SessionConfiguration, deserialize_action,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::Instrument;

/// Host request to open a payment component
#[derive(Debug, Clone, PartialEq)]
pub struct OpenRequest {
    /// Component name, e.g. `dropin`, `googlepay`, `scheme`
    pub component: String,
    /// Catalogue for the standalone-action flow; ignored when a session is configured
    pub payment_methods: Option<Value>,
    pub configuration: Value,
}

impl OpenRequest {
    pub fn new(component: impl Into<String>, configuration: Value) -> Self {
        Self {
            component: component.into(),
            payment_methods: None,
            configuration,
        }
    }

    pub fn with_payment_methods(mut self, payment_methods: Value) -> Self {
        self.payment_methods = Some(payment_methods);
        self
    }
}

/// Remembers the epoch an `open` was admitted under
///
/// Outlives a panic inside the call, so recovery can tell whether the
/// panicking open still owns the lifecycle.
#[derive(Debug, Clone, Default)]
pub struct OpenTicket {
    epoch: Arc<AtomicU64>,
}

impl OpenTicket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Epoch of the admitted open, `None` if it was never admitted
    pub fn epoch(&self) -> Option<u64> {
        match self.epoch.load(Ordering::SeqCst) {
            0 => None,
            epoch => Some(epoch),
        }
    }

    fn record(&self, epoch: u64) {
        self.epoch.store(epoch, Ordering::SeqCst);
    }
}

/// How an `open` call ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The component is rendering and accepts actions
    Presented,
    /// The host hid the bridge before the component could be presented
    Abandoned,
}

/// The live (session, component) pair
struct ActiveCheckout {
    kind: ComponentKind,
    component: Arc<dyn SdkComponent>,
    session: Option<Arc<dyn SdkSession>>,
    relay: Arc<CallbackRelay>,
    pending: Option<PendingExternalFlow>,
    return_url: Option<String>,
}

impl ActiveCheckout {
    /// Release every native resource
    ///
    /// Callbacks are cut off before the UI goes away. A failing dismissal is
    /// logged and otherwise ignored.
    fn teardown(self, dismissal: &Dismissal) {
        self.relay.detach();
        self.component.remove_observers();
        if let Some(session) = &self.session {
            session.unbind();
        }
        if let Err(err) = self.component.dismiss(dismissal) {
            tracing::warn!(component = %self.kind, error = %err, "dismissing component failed");
        }
        if let Some(pending) = self.pending {
            tracing::debug!(request_code = pending.request_code(), "dropping pending external flow");
        }
    }
}

#[derive(Default)]
struct BridgeState {
    phase: ComponentState,
    epoch: u64,
    active: Option<ActiveCheckout>,
}

impl BridgeState {
    /// Start a teardown from the current phase, returning the new epoch
    fn begin_teardown(&mut self, target: ComponentState) -> (u64, Option<ActiveCheckout>) {
        debug_assert!(self.phase.can_transition_to(target));
        self.phase = target;
        self.epoch += 1;
        (self.epoch, self.active.take())
    }

    fn is_presented(&self, epoch: u64) -> bool {
        self.epoch == epoch && self.phase.can_handle_actions()
    }
}

struct BridgeInner {
    sdk: Arc<dyn PaymentSdk>,
    establisher: SessionEstablisher,
    dispatcher: ActionDispatcher,
    emitter: EventEmitter,
    styles: Arc<StyleRegistry>,
    state: Mutex<BridgeState>,
}

/// Drives the payment SDK on behalf of the host
///
/// Cloning is cheap; clones share the same lifecycle.
///
/// # Example
///
/// ```ignore
/// let bridge = CheckoutBridge::new(sdk, sink);
/// bridge.open(OpenRequest::new("dropin", configuration)).await?;
/// bridge.handle(&action)?;
/// bridge.hide(true, None)?;
/// ```
#[derive(Clone)]
pub struct CheckoutBridge {
    inner: Arc<BridgeInner>,
}

impl CheckoutBridge {
    /// Create a bridge using the process-wide [`StyleRegistry`]
    pub fn new(sdk: Arc<dyn PaymentSdk>, sink: Arc<dyn EventSink>) -> Self {
        Self::with_styles(sdk, sink, StyleRegistry::global())
    }

    pub fn with_styles(
        sdk: Arc<dyn PaymentSdk>,
        sink: Arc<dyn EventSink>,
        styles: Arc<StyleRegistry>,
    ) -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                establisher: SessionEstablisher::new(sdk.clone()),
                sdk,
                dispatcher: ActionDispatcher::new(),
                emitter: EventEmitter::new(sink),
                styles,
                state: Mutex::new(BridgeState::default()),
            }),
        }
    }

    pub fn state(&self) -> ComponentState {
        self.inner.state.lock().phase
    }

    /// Request code of the external flow the active component waits for
    pub fn pending_request_code(&self) -> Option<i32> {
        self.inner
            .state
            .lock()
            .active
            .as_ref()
            .and_then(|active| active.pending)
            .map(|pending| pending.request_code())
    }

    /// Open a payment component
    ///
    /// Failures are reported to the host as `didFail` and also returned.
    /// Returns [`OpenOutcome::Abandoned`] when `hide` overtook the call.
    pub async fn open(&self, request: OpenRequest) -> CheckoutResult<OpenOutcome> {
        self.open_with_ticket(request, OpenTicket::new()).await
    }

    /// Open a payment component, recording its epoch in `ticket` on admission
    pub async fn open_with_ticket(
        &self,
        request: OpenRequest,
        ticket: OpenTicket,
    ) -> CheckoutResult<OpenOutcome> {
        let span = tracing::info_span!("open", component = %request.component);
        self.inner.clone().open(request, ticket).instrument(span).await
    }

    /// Dismiss the active component and return to `Idle`
    ///
    /// Safe at any point after `open`, including while a session is still
    /// being established. A no-op when nothing is open.
    pub fn hide(&self, success: bool, message: Option<Value>) -> CheckoutResult<()> {
        let (epoch, checkout) = {
            let mut state = self.inner.state.lock();
            if !state.phase.is_active() {
                tracing::debug!(phase = %state.phase, "hide with nothing to dismiss");
                return Ok(());
            }
            state.begin_teardown(ComponentState::Dismissing)
        };

        tracing::info!(success, epoch, "hiding component");
        if let Some(checkout) = checkout {
            checkout.teardown(&Dismissal { success, message });
        }
        self.inner.settle(epoch);
        Ok(())
    }

    /// Deliver a server-issued action to the presented component
    ///
    /// Without a presented component the action is dropped with
    /// [`CheckoutError::NoActiveComponent`] and nothing else happens. A
    /// malformed action ends the component with `didFail(invalidAction)`.
    pub fn handle(&self, payload: &Value) -> CheckoutResult<()> {
        let current = {
            let state = self.inner.state.lock();
            match &state.active {
                Some(active) if state.phase.can_handle_actions() => {
                    Some((state.epoch, active.component.clone()))
                }
                _ => None,
            }
        };
        let Some((epoch, component)) = current else {
            tracing::warn!("action received without a presented component");
            return Err(CheckoutError::NoActiveComponent);
        };

        let action = match deserialize_action(payload) {
            Ok(action) => action,
            Err(err) => {
                self.inner.fail_presented(epoch, err.clone());
                return Err(err);
            }
        };

        let route = self.inner.dispatcher.route(&action);
        if let Some(flow) = route.pending_flow() {
            self.inner.arm(epoch, flow);
        }
        tracing::debug!(action = action.type_name(), ?route, "dispatching action");

        if let Err(err) = component.handle_action(action) {
            let err = translate_failure(err);
            self.inner.fail_presented(epoch, err.clone());
            return Err(err);
        }
        Ok(())
    }

    /// Forward an external app or sheet result to the active component
    ///
    /// Only a result matching the pending request code is delivered, and
    /// only once. Returns whether it was delivered.
    pub fn rejoin_external_result(&self, request_code: i32, result: ExternalResult) -> bool {
        let target = {
            let mut state = self.inner.state.lock();
            let epoch = state.epoch;
            let presented = state.phase.can_handle_actions();
            match state.active.as_mut() {
                Some(active)
                    if presented && active.pending.is_some_and(|p| p.matches(request_code)) =>
                {
                    active.pending = None;
                    Some((epoch, active.component.clone()))
                }
                _ => None,
            }
        };
        let Some((epoch, component)) = target else {
            tracing::debug!(request_code, "ignoring external result without a pending flow");
            return false;
        };

        tracing::info!(request_code, result_code = result.result_code, "rejoining external flow");
        if let Err(err) = component.handle_external_result(result) {
            self.inner.fail_presented(epoch, translate_failure(err));
        }
        true
    }

    /// Force the bridge back to `Idle` after a panic escaped an operation
    pub fn recover_from_panic(&self, message: &str) {
        self.recover(None, message);
    }

    /// Recover from a panic inside the `open` that `ticket` belongs to
    ///
    /// Does nothing unless that open still owns the lifecycle; a `hide` or a
    /// later open has already moved on from it.
    pub fn recover_open_panic(&self, ticket: &OpenTicket, message: &str) {
        match ticket.epoch() {
            Some(epoch) => self.recover(Some(epoch), message),
            None => tracing::debug!(panic = message, "open panicked before admission"),
        }
    }

    fn recover(&self, owner: Option<u64>, message: &str) {
        let checkout = {
            let mut state = self.inner.state.lock();
            if let Some(epoch) = owner
                && (state.epoch != epoch || !state.phase.is_active())
            {
                tracing::debug!(
                    epoch,
                    current = state.epoch,
                    panic = message,
                    "ignoring panic from a superseded open"
                );
                return;
            }
            state.phase = ComponentState::Idle;
            state.epoch += 1;
            state.active.take()
        };
        tracing::error!(panic = message, "recovering bridge after panic");
        if let Some(checkout) = checkout {
            checkout.teardown(&Dismissal::default());
        }
        self.inner
            .emitter
            .fail(&CheckoutError::Internal(message.to_string()));
    }
}

impl BridgeInner {
    async fn open(
        self: Arc<Self>,
        request: OpenRequest,
        ticket: OpenTicket,
    ) -> CheckoutResult<OpenOutcome> {
        let admitted = {
            let mut state = self.state.lock();
            if state.phase == ComponentState::Idle {
                state.phase = ComponentState::Opening;
                state.epoch += 1;
                Ok(state.epoch)
            } else {
                Err(CheckoutError::InvalidState {
                    expected: ComponentState::Idle,
                    actual: state.phase,
                })
            }
        };
        let epoch = match admitted {
            Ok(epoch) => epoch,
            Err(err) => {
                tracing::warn!(error = %err, "open rejected, a component is already active");
                self.emitter.fail(&err);
                return Err(err);
            }
        };

        ticket.record(epoch);
        tracing::info!(epoch, "opening component");
        match self.prepare(epoch, request).await {
            Ok(Some(checkout)) => Ok(self.commit(epoch, checkout)),
            Ok(None) => {
                tracing::debug!(epoch, "open abandoned");
                Ok(OpenOutcome::Abandoned)
            }
            Err(err) => self.fail_opening(epoch, err),
        }
    }

    /// Parse, establish, check availability, then build and present
    ///
    /// Returns `None` when the epoch went stale during an await. Anything
    /// built before a failure is released here.
    async fn prepare(
        self: &Arc<Self>,
        epoch: u64,
        request: OpenRequest,
    ) -> CheckoutResult<Option<ActiveCheckout>> {
        let raw = RawConfiguration::from_value(request.configuration);
        let root = RootConfiguration::parse(&raw)?;
        let session_config = SessionConfiguration::detect(&raw)?;
        let kind = ComponentKind::from_name(&request.component);

        let (session, payment_methods) = match &session_config {
            Some(session_config) => {
                let session = self.establisher.establish(&root, session_config).await?;
                if self.is_stale(epoch) {
                    return Ok(None);
                }
                let catalogue = session.payment_methods();
                (Some(session), catalogue)
            }
            None => {
                let payload = request
                    .payment_methods
                    .filter(|payload| !payload.is_null())
                    .ok_or(ConfigError::NoPaymentMethods)?;
                (None, PaymentMethods::from_value(&payload)?)
            }
        };

        let payment_method = match kind.required_method_types().as_slice() {
            [] => None,
            method_types => Some(
                payment_methods
                    .find_any(method_types)
                    .cloned()
                    .ok_or_else(|| CheckoutError::NoPaymentMethod(method_types[0].to_string()))?,
            ),
        };

        let configuration = ComponentConfiguration::merge(
            &root,
            session_config.as_ref(),
            &kind,
            &raw,
            self.styles.appearance(),
        )?;

        let mut pending = None;
        if let (ComponentKind::Wallet(wallet), Some(method)) = (&kind, &payment_method) {
            let available = self
                .sdk
                .is_wallet_available(*wallet, method, &configuration)
                .await;
            if self.is_stale(epoch) {
                return Ok(None);
            }
            if !available {
                return Err(CheckoutError::NotSupported(wallet.display_name().to_string()));
            }
            pending = Some(PendingExternalFlow::wallet());
        }

        let relay = Arc::new(CallbackRelay::new(epoch, Arc::downgrade(self)));
        if let Some(session) = &session {
            session.bind(relay.clone());
        }

        let component = match self.sdk.create_component(ComponentRequest {
            kind: kind.clone(),
            payment_methods,
            payment_method,
            configuration,
            callbacks: relay.clone(),
            external_request_code: pending.map(|flow| flow.request_code()),
        }) {
            Ok(component) => component,
            Err(err) => {
                if let Some(session) = &session {
                    session.unbind();
                }
                return Err(translate_failure(err));
            }
        };

        let checkout = ActiveCheckout {
            kind,
            component,
            session,
            relay,
            pending,
            return_url: root.return_url,
        };
        if let Err(err) = checkout.component.present() {
            checkout.teardown(&Dismissal::default());
            return Err(translate_failure(err));
        }
        Ok(Some(checkout))
    }

    /// Install a presented component, unless `hide` got there first
    fn commit(&self, epoch: u64, checkout: ActiveCheckout) -> OpenOutcome {
        let kind = checkout.kind.clone();
        let rejected = {
            let mut state = self.state.lock();
            if state.epoch == epoch && state.phase == ComponentState::Opening {
                state.phase = ComponentState::Presented;
                checkout.relay.attach();
                state.active = Some(checkout);
                None
            } else {
                Some(checkout)
            }
        };

        match rejected {
            None => {
                tracing::info!(component = %kind, epoch, "component presented");
                OpenOutcome::Presented
            }
            Some(checkout) => {
                tracing::debug!(component = %kind, epoch, "component presented after hide, dismissing");
                checkout.teardown(&Dismissal::default());
                OpenOutcome::Abandoned
            }
        }
    }

    fn fail_opening(&self, epoch: u64, err: CheckoutError) -> CheckoutResult<OpenOutcome> {
        let teardown_epoch = {
            let mut state = self.state.lock();
            if state.epoch != epoch || state.phase != ComponentState::Opening {
                None
            } else {
                Some(state.begin_teardown(ComponentState::Failing).0)
            }
        };
        let Some(teardown_epoch) = teardown_epoch else {
            tracing::debug!(epoch, error = %err, "open failed after hide, not reported");
            return Ok(OpenOutcome::Abandoned);
        };

        self.settle(teardown_epoch);
        self.emitter.fail(&err);
        Err(err)
    }

    /// End the presented component with a failure
    fn fail_presented(&self, epoch: u64, err: CheckoutError) {
        if self.end_presented(epoch, ComponentState::Failing, Dismissal::default()) {
            self.emitter.fail(&err);
        } else {
            tracing::debug!(epoch, error = %err, "failure for a component no longer presented");
        }
    }

    /// Tear down the presented component of `epoch`; `false` if it is gone
    fn end_presented(&self, epoch: u64, target: ComponentState, dismissal: Dismissal) -> bool {
        let (teardown_epoch, checkout) = {
            let mut state = self.state.lock();
            if !state.is_presented(epoch) {
                return false;
            }
            state.begin_teardown(target)
        };

        tracing::info!(epoch, phase = %target, "ending component");
        if let Some(checkout) = checkout {
            checkout.teardown(&dismissal);
        }
        self.settle(teardown_epoch);
        true
    }

    /// Finish a teardown started at `epoch`
    fn settle(&self, epoch: u64) {
        let mut state = self.state.lock();
        if state.epoch == epoch && state.phase.is_tearing_down() {
            state.phase = ComponentState::Idle;
        }
    }

    fn arm(&self, epoch: u64, flow: PendingExternalFlow) {
        let mut state = self.state.lock();
        if state.epoch != epoch {
            return;
        }
        if let Some(active) = state.active.as_mut() {
            if let Some(previous) = active.pending.filter(|previous| *previous != flow) {
                tracing::debug!(
                    previous = previous.request_code(),
                    request_code = flow.request_code(),
                    "replacing pending external flow"
                );
            }
            active.pending = Some(flow);
        }
    }

    fn is_stale(&self, epoch: u64) -> bool {
        self.state.lock().epoch != epoch
    }

    fn on_callback(&self, epoch: u64, callback: ComponentCallback) {
        match callback {
            ComponentCallback::Submit(payment_data) => {
                let return_url = {
                    let state = self.state.lock();
                    match &state.active {
                        Some(active) if state.is_presented(epoch) => Some(active.return_url.clone()),
                        _ => None,
                    }
                };
                match return_url {
                    Some(return_url) => self.emitter.submit(payment_data, return_url.as_deref()),
                    None => tracing::debug!(epoch, "ignoring stale submit"),
                }
            }
            ComponentCallback::Provide(action_data) => {
                if self.state.lock().is_presented(epoch) {
                    self.emitter.provide(action_data);
                } else {
                    tracing::debug!(epoch, "ignoring stale provide");
                }
            }
            ComponentCallback::Complete => {
                let dismissal = Dismissal {
                    success: true,
                    message: None,
                };
                if self.end_presented(epoch, ComponentState::Completing, dismissal) {
                    self.emitter.complete();
                } else {
                    tracing::debug!(epoch, "ignoring stale completion");
                }
            }
            ComponentCallback::Fail(err) => self.fail_presented(epoch, translate_failure(err)),
        }
    }
}

/// Callback sink handed to the SDK for one component's lifetime
///
/// Holds the bridge weakly and drops everything once detached, so a
/// component that outlives its teardown cannot reach the next one.
struct CallbackRelay {
    epoch: u64,
    attached: AtomicBool,
    bridge: Weak<BridgeInner>,
}

impl CallbackRelay {
    fn new(epoch: u64, bridge: Weak<BridgeInner>) -> Self {
        Self {
            epoch,
            attached: AtomicBool::new(false),
            bridge,
        }
    }

    fn attach(&self) {
        self.attached.store(true, Ordering::SeqCst);
    }

    fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }
}

impl CallbackSink for CallbackRelay {
    fn deliver(&self, callback: ComponentCallback) {
        if !self.attached.load(Ordering::SeqCst) {
            tracing::debug!(epoch = self.epoch, "callback on detached relay dropped");
            return;
        }
        match self.bridge.upgrade() {
            Some(bridge) => bridge.on_callback(self.epoch, callback),
            None => tracing::debug!(epoch = self.epoch, "callback after bridge dropped"),
        }
    }
}
