//! End-to-end lifecycle tests against the sandbox SDK
//!
//! Each test drives a `CheckoutBridge` the way a host would and checks both
//! the events it emits and the collaborator calls it makes.

use checkout_bridge::sandbox::{EventLog, SandboxSdk, SdkCall};
use checkout_bridge::{
    CheckoutBridge, CheckoutError, CheckoutEvent, ComponentState, ErrorKind, ErrorPayload,
    ExternalResult, OpenOutcome, OpenRequest, SdkError, StyleRegistry,
};
use checkout_bridge_core::{
    Amount, ComponentKind, ComponentCallback, PaymentMethod, PaymentMethods, SdkOrigin, WalletKind,
};
use serde_json::{Value, json};
use std::sync::Arc;

fn setup() -> (SandboxSdk, CheckoutBridge, Arc<EventLog>) {
    setup_with(SandboxSdk::new())
}

fn setup_with(sdk: SandboxSdk) -> (SandboxSdk, CheckoutBridge, Arc<EventLog>) {
    let events = EventLog::new();
    let bridge = CheckoutBridge::with_styles(
        Arc::new(sdk.clone()),
        events.clone(),
        Arc::new(StyleRegistry::new()),
    );
    (sdk, bridge, events)
}

fn base_configuration() -> Value {
    json!({
        "clientKey": "test_123",
        "amount": {"value": 1000, "currency": "EUR"},
        "countryCode": "NL"
    })
}

fn catalogue() -> Value {
    json!({
        "paymentMethods": [
            {"type": "scheme", "name": "Cards", "brands": ["visa", "mc"]},
            {"type": "ideal", "name": "iDEAL"}
        ],
        "storedPaymentMethods": []
    })
}

fn session_configuration() -> Value {
    json!({
        "clientKey": "test_123",
        "countryCode": "NL",
        "session": {"id": "S1", "sessionData": "D1"}
    })
}

// ============================================================================
// Standalone-action flow
// ============================================================================

#[tokio::test]
async fn test_standalone_without_payment_methods_fails_with_configuration_error() {
    let (sdk, bridge, events) = setup();

    let result = bridge.open(OpenRequest::new("dropin", base_configuration())).await;

    assert_eq!(result.unwrap_err().kind(), ErrorKind::Configuration);
    assert_eq!(events.names(), vec!["didFail"]);
    assert_eq!(events.last().unwrap().error_code(), Some("noPaymentMethods"));
    assert_eq!(bridge.state(), ComponentState::Idle);
    assert!(sdk.calls().is_empty());
}

#[tokio::test]
async fn test_standalone_with_catalogue_presents_without_session() {
    let (sdk, bridge, _events) = setup();

    let outcome = bridge
        .open(OpenRequest::new("dropin", base_configuration()).with_payment_methods(catalogue()))
        .await
        .unwrap();

    assert_eq!(outcome, OpenOutcome::Presented);
    assert!(!sdk.calls().iter().any(|c| matches!(c, SdkCall::CreateSession { .. })));
    let created = sdk.created().unwrap();
    assert_eq!(created.kind, ComponentKind::DropIn);
    assert_eq!(created.payment_methods.payment_methods.len(), 2);
    assert_eq!(created.configuration.client_key, "test_123");
    assert_eq!(
        created.configuration.payment.unwrap().amount,
        Amount::new(1000, "EUR")
    );
}

#[tokio::test]
async fn test_malformed_catalogue_fails_with_configuration_error() {
    let (_sdk, bridge, events) = setup();

    let result = bridge
        .open(OpenRequest::new("dropin", base_configuration()).with_payment_methods(json!([1, 2])))
        .await;

    assert_eq!(result.unwrap_err().kind(), ErrorKind::Configuration);
    assert_eq!(events.last().unwrap().error_code(), Some("invalidPaymentMethods"));
}

#[tokio::test]
async fn test_missing_client_key_fails_and_stays_idle() {
    let (_sdk, bridge, events) = setup();
    let configuration = json!({"amount": {"value": 1, "currency": "EUR"}, "countryCode": "NL"});

    let result = bridge
        .open(OpenRequest::new("dropin", configuration).with_payment_methods(catalogue()))
        .await;

    assert!(matches!(result, Err(CheckoutError::Configuration(_))));
    assert_eq!(
        events.events(),
        vec![CheckoutEvent::DidFail(ErrorPayload {
            error_code: "noClientKey".to_string(),
            error_message: "no clientKey in configuration".to_string(),
        })]
    );
    assert_eq!(bridge.state(), ComponentState::Idle);
}

// ============================================================================
// Session flow
// ============================================================================

#[tokio::test]
async fn test_session_flow_establishes_with_identifier_and_data() {
    let methods = PaymentMethods::new(vec![PaymentMethod::new("scheme", "Cards")]);
    let (sdk, bridge, _events) = setup_with(SandboxSdk::new().with_session_methods(methods.clone()));

    let outcome = bridge
        .open(OpenRequest::new("dropin", session_configuration()))
        .await
        .unwrap();

    assert_eq!(outcome, OpenOutcome::Presented);
    assert_eq!(
        sdk.calls()[..2],
        [
            SdkCall::CreateSession {
                session_identifier: "S1".to_string(),
                session_data: "D1".to_string(),
            },
            SdkCall::BindSession,
        ]
    );
    let created = sdk.created().unwrap();
    assert_eq!(created.payment_methods, methods);
    assert_eq!(created.configuration.session_identifier.as_deref(), Some("S1"));
}

#[tokio::test]
async fn test_session_failure_is_reported_unmodified() {
    let (sdk, bridge, events) = setup();
    sdk.fail_session(SdkError::new(SdkOrigin::Session, "422", "Invalid session data"));

    let result = bridge.open(OpenRequest::new("dropin", session_configuration())).await;

    assert!(result.is_err());
    assert_eq!(
        events.events(),
        vec![CheckoutEvent::DidFail(ErrorPayload {
            error_code: "422".to_string(),
            error_message: "Invalid session data".to_string(),
        })]
    );
    assert!(!sdk.has_call(&SdkCall::Present));
    assert_eq!(bridge.state(), ComponentState::Idle);
}

#[tokio::test]
async fn test_malformed_session_block_is_configuration_error() {
    let (sdk, bridge, events) = setup();
    let configuration = json!({"clientKey": "test_123", "session": {"id": "S1"}});

    let result = bridge.open(OpenRequest::new("dropin", configuration)).await;

    assert_eq!(result.unwrap_err().error_code(), "invalidSession");
    assert_eq!(events.terminal_count(), 1);
    assert!(sdk.calls().is_empty());
}

#[tokio::test]
async fn test_session_completion_unbinds_session() {
    let (sdk, bridge, events) = setup();
    bridge
        .open(OpenRequest::new("dropin", session_configuration()))
        .await
        .unwrap();

    sdk.session_callbacks()
        .unwrap()
        .deliver(ComponentCallback::Complete);

    assert_eq!(events.names(), vec!["didComplete"]);
    assert!(sdk.has_call(&SdkCall::UnbindSession));
    assert_eq!(bridge.state(), ComponentState::Idle);
}

// ============================================================================
// Wallet flow
// ============================================================================

#[tokio::test]
async fn test_wallet_without_catalogue_entry_fails_with_no_payment_method() {
    let (sdk, bridge, events) = setup();

    let result = bridge
        .open(OpenRequest::new("googlepay", base_configuration()).with_payment_methods(catalogue()))
        .await;

    assert_eq!(result.unwrap_err().kind(), ErrorKind::NoPaymentMethod);
    assert_eq!(events.last().unwrap().error_code(), Some("noPaymentMethod"));
    assert!(!sdk.calls().iter().any(|c| matches!(c, SdkCall::CreateComponent { .. })));
    assert_eq!(bridge.state(), ComponentState::Idle);
}

#[tokio::test]
async fn test_wallet_without_amount_fails_with_no_payment() {
    let (_sdk, bridge, events) = setup();
    let payment_methods = json!({"paymentMethods": [{"type": "paywithgoogle"}]});

    let result = bridge
        .open(
            OpenRequest::new("googlepay", json!({"clientKey": "test_123"}))
                .with_payment_methods(payment_methods),
        )
        .await;

    assert_eq!(result.unwrap_err().error_code(), "noPayment");
    assert_eq!(events.terminal_count(), 1);
}

#[tokio::test]
async fn test_apple_pay_without_merchant_identifier_fails() {
    let (_sdk, bridge, _events) = setup();
    let payment_methods = json!({"paymentMethods": [{"type": "applepay"}]});

    let result = bridge
        .open(OpenRequest::new("applepay", base_configuration()).with_payment_methods(payment_methods))
        .await;

    assert_eq!(result.unwrap_err().error_code(), "noMerchantIdentifier");
}

#[tokio::test]
async fn test_wallet_unavailable_never_presents() {
    let (sdk, bridge, events) = setup();
    sdk.set_wallet_available(false);
    let payment_methods = json!({"paymentMethods": [{"type": "paywithgoogle"}]});

    let result = bridge
        .open(OpenRequest::new("googlepay", base_configuration()).with_payment_methods(payment_methods))
        .await;

    assert_eq!(result.unwrap_err().kind(), ErrorKind::NotSupported);
    assert_eq!(
        events.events(),
        vec![CheckoutEvent::DidFail(ErrorPayload {
            error_code: "notSupported".to_string(),
            error_message: "GooglePay unavailable".to_string(),
        })]
    );
    assert!(sdk.has_call(&SdkCall::WalletAvailability(WalletKind::GooglePay)));
    assert!(!sdk.has_call(&SdkCall::Present));
}

#[tokio::test]
async fn test_wallet_result_rejoins_exactly_once() {
    let (sdk, bridge, events) = setup();
    let payment_methods = json!({"paymentMethods": [{"type": "googlepay"}]});
    bridge
        .open(OpenRequest::new("googlepay", base_configuration()).with_payment_methods(payment_methods))
        .await
        .unwrap();

    assert!(bridge.rejoin_external_result(1001, ExternalResult::new(-1, Some(json!({"token": "gp"})))));
    assert!(!bridge.rejoin_external_result(1001, ExternalResult::new(-1, None)));
    sdk.submit(json!({"paymentMethod": {"type": "googlepay"}}));

    assert_eq!(sdk.count(&SdkCall::ExternalResult(-1)), 1);
    assert_eq!(events.names(), vec!["didSubmit"]);
}

// ============================================================================
// hide / handle
// ============================================================================

#[tokio::test]
async fn test_hide_while_presented_tears_down_in_order() {
    let (sdk, bridge, events) = setup();
    bridge
        .open(OpenRequest::new("dropin", session_configuration()))
        .await
        .unwrap();

    bridge.hide(true, Some(json!({}))).unwrap();
    let handled = bridge.handle(&json!({"type": "threeDS2", "token": "t"}));

    let calls = sdk.calls();
    let tail: Vec<_> = calls[calls.len() - 3..].to_vec();
    assert_eq!(
        tail,
        vec![
            SdkCall::RemoveObservers,
            SdkCall::UnbindSession,
            SdkCall::Dismiss { success: true },
        ]
    );
    assert_eq!(bridge.state(), ComponentState::Idle);
    assert_eq!(handled, Err(CheckoutError::NoActiveComponent));
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_open_hide_open_starts_fresh() {
    let (sdk, bridge, events) = setup();
    let request = OpenRequest::new("scheme", base_configuration()).with_payment_methods(catalogue());

    bridge.open(request.clone()).await.unwrap();
    bridge.hide(false, None).unwrap();
    let outcome = bridge.open(request).await;

    assert_eq!(outcome, Ok(OpenOutcome::Presented));
    assert_eq!(sdk.count(&SdkCall::Present), 2);
    assert_eq!(bridge.pending_request_code(), None);
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_handle_in_component_action_delivers_without_pending_flow() {
    let (sdk, bridge, _events) = setup();
    bridge
        .open(OpenRequest::new("scheme", base_configuration()).with_payment_methods(catalogue()))
        .await
        .unwrap();

    bridge
        .handle(&json!({"type": "threeDS2", "token": "eyJ0aHJlZURT", "subtype": "fingerprint"}))
        .unwrap();

    assert!(sdk.has_call(&SdkCall::HandleAction("threeDS2")));
    assert_eq!(bridge.pending_request_code(), None);
    assert_eq!(bridge.state(), ComponentState::Presented);
}

#[tokio::test]
async fn test_handle_sdk_action_then_rejoin() {
    let (sdk, bridge, _events) = setup();
    bridge
        .open(OpenRequest::new("ideal", base_configuration()).with_payment_methods(catalogue()))
        .await
        .unwrap();

    bridge
        .handle(&json!({"type": "sdk", "paymentMethodType": "wechatpaySDK", "sdkData": {}}))
        .unwrap();

    assert_eq!(bridge.pending_request_code(), Some(1002));
    assert!(!bridge.rejoin_external_result(1001, ExternalResult::new(0, None)));
    assert!(bridge.rejoin_external_result(1002, ExternalResult::new(0, None)));
    assert!(sdk.has_call(&SdkCall::ExternalResult(0)));
}

#[tokio::test]
async fn test_action_failure_ends_component_with_sdk_error() {
    let (sdk, bridge, events) = setup();
    sdk.fail_actions(SdkError::new(SdkOrigin::Component, "actionFailed", "3DS2 failed"));
    bridge
        .open(OpenRequest::new("scheme", base_configuration()).with_payment_methods(catalogue()))
        .await
        .unwrap();

    let result = bridge.handle(&json!({"type": "threeDS2", "token": "t"}));

    assert_eq!(result.unwrap_err().error_code(), "actionFailed");
    assert_eq!(events.last().unwrap().error_code(), Some("actionFailed"));
    assert_eq!(bridge.state(), ComponentState::Idle);
}

// ============================================================================
// Cancellation and late callbacks
// ============================================================================

#[tokio::test]
async fn test_cancellation_maps_to_canceled() {
    let (sdk, bridge, events) = setup();
    bridge
        .open(OpenRequest::new("dropin", base_configuration()).with_payment_methods(catalogue()))
        .await
        .unwrap();

    sdk.cancel();

    assert_eq!(
        events.events(),
        vec![CheckoutEvent::DidFail(ErrorPayload {
            error_code: "canceled".to_string(),
            error_message: "payment canceled by shopper".to_string(),
        })]
    );
}

#[tokio::test]
async fn test_other_component_failure_passes_through() {
    let (sdk, bridge, events) = setup();
    bridge
        .open(OpenRequest::new("dropin", base_configuration()).with_payment_methods(catalogue()))
        .await
        .unwrap();

    sdk.fail(SdkError::new(SdkOrigin::Component, "refused", "Refused"));

    assert_eq!(events.last().unwrap().error_code(), Some("refused"));
    assert_eq!(events.terminal_count(), 1);
}

#[tokio::test]
async fn test_late_callbacks_after_completion_are_ignored() {
    let (sdk, bridge, events) = setup();
    bridge
        .open(OpenRequest::new("dropin", base_configuration()).with_payment_methods(catalogue()))
        .await
        .unwrap();

    sdk.complete();
    sdk.complete();
    sdk.cancel();
    sdk.provide(json!({"late": true}));

    assert_eq!(events.names(), vec!["didComplete"]);
    assert_eq!(sdk.count(&SdkCall::Dismiss { success: true }), 1);
}

#[tokio::test]
async fn test_provide_reaches_host_unchanged() {
    let (sdk, bridge, events) = setup();
    bridge
        .open(OpenRequest::new("dropin", base_configuration()).with_payment_methods(catalogue()))
        .await
        .unwrap();

    sdk.provide(json!({"details": {"threeDSResult": "abc"}, "paymentData": "pd"}));

    assert_eq!(
        events.events(),
        vec![CheckoutEvent::DidProvide(
            json!({"details": {"threeDSResult": "abc"}, "paymentData": "pd"})
        )]
    );
}
