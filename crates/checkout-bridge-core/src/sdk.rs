//! Native payment SDK collaborator traits
//!
//! The bridge never renders payment UI or talks to the payment processor
//! itself. It drives an implementation of these traits supplied by the
//! platform layer (or the sandbox SDK in tests).

use crate::{
    Action, ComponentConfiguration, ComponentKind, Environment, Payment, PaymentMethod,
    PaymentMethods, SdkError, WalletKind,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Parameters for creating a server-managed session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    pub environment: Environment,
    pub client_key: String,
    pub session_identifier: String,
    pub initial_session_data: String,
    pub payment: Option<Payment>,
    pub locale: Option<String>,
}

/// Native completion callbacks, one variant per delegate method
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentCallback {
    Submit(Value),
    Provide(Value),
    Complete,
    Fail(SdkError),
}

/// Receiver the SDK invokes when a component or session reports progress
///
/// May be called from any thread. Calls after the bridge detached the sink
/// are dropped.
pub trait CallbackSink: Send + Sync {
    fn deliver(&self, callback: ComponentCallback);
}

/// Parameters for constructing a payment component
pub struct ComponentRequest {
    pub kind: ComponentKind,
    pub payment_methods: PaymentMethods,
    /// Catalogue entry for single-method and wallet components
    pub payment_method: Option<PaymentMethod>,
    pub configuration: ComponentConfiguration,
    pub callbacks: Arc<dyn CallbackSink>,
    /// Request code the component must use when launching an external sheet
    pub external_request_code: Option<i32>,
}

/// Result of an external app or sheet, forwarded by the host runtime
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalResult {
    pub result_code: i32,
    pub data: Option<Value>,
}

impl ExternalResult {
    pub fn new(result_code: i32, data: Option<Value>) -> Self {
        Self { result_code, data }
    }
}

/// How the host wants the component dismissed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dismissal {
    pub success: bool,
    pub message: Option<Value>,
}

/// Server-coordinated checkout session
pub trait SdkSession: Send + Sync {
    fn session_identifier(&self) -> &str;

    /// Catalogue owned by the session
    fn payment_methods(&self) -> PaymentMethods;

    /// Route session delegate callbacks to the bridge
    fn bind(&self, callbacks: Arc<dyn CallbackSink>);

    /// Stop routing session delegate callbacks
    fn unbind(&self);
}

/// A presented payment UI unit
pub trait SdkComponent: Send + Sync {
    /// Start rendering the component
    fn present(&self) -> Result<(), SdkError>;

    fn handle_action(&self, action: Action) -> Result<(), SdkError>;

    fn handle_external_result(&self, result: ExternalResult) -> Result<(), SdkError>;

    /// Detach every observer registered on the component
    fn remove_observers(&self);

    /// Tear down the platform UI
    fn dismiss(&self, dismissal: &Dismissal) -> Result<(), SdkError>;
}

/// Entry point of the native payment SDK
///
/// # Example
///
/// ```ignore
/// use checkout_bridge_core::prelude::*;
///
/// struct NativeSdk;
///
/// #[async_trait::async_trait]
/// impl PaymentSdk for NativeSdk {
///     async fn create_session(&self, request: SessionRequest)
///         -> Result<Arc<dyn SdkSession>, SdkError> {
///         // call the platform SDK
///     }
///
///     async fn is_wallet_available(&self, wallet: WalletKind, method: &PaymentMethod,
///         configuration: &ComponentConfiguration) -> bool {
///         true
///     }
///
///     fn create_component(&self, request: ComponentRequest)
///         -> Result<Arc<dyn SdkComponent>, SdkError> {
///         // build the platform component
///     }
/// }
/// ```
#[async_trait]
pub trait PaymentSdk: Send + Sync + 'static {
    /// Create a session with the payment processor (network-bound)
    async fn create_session(&self, request: SessionRequest)
    -> Result<Arc<dyn SdkSession>, SdkError>;

    /// Ask the platform whether the wallet can be used on this device
    async fn is_wallet_available(
        &self,
        wallet: WalletKind,
        method: &PaymentMethod,
        configuration: &ComponentConfiguration,
    ) -> bool;

    /// Construct (but do not present) a payment component
    fn create_component(&self, request: ComponentRequest)
    -> Result<Arc<dyn SdkComponent>, SdkError>;
}
