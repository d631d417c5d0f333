#![allow(non_snake_case)]

use super::*;
use crate::sandbox::{SandboxSdk, SdkCall};
use checkout_bridge_core::{
    Amount, CheckoutError, Environment, PaymentMethod, PaymentMethods, RawConfiguration, SdkError,
    SdkOrigin,
};
use serde_json::json;

fn parse(configuration: serde_json::Value) -> (RootConfiguration, SessionConfiguration) {
    let raw = RawConfiguration::from_value(configuration);
    let root = RootConfiguration::parse(&raw).unwrap();
    let session = SessionConfiguration::parse(&raw).unwrap();
    (root, session)
}

#[tokio::test]
async fn SessionEstablisher___establish___passes_identifier_and_data() {
    let sdk = SandboxSdk::new();
    let establisher = SessionEstablisher::new(Arc::new(sdk.clone()));
    let (root, session) = parse(json!({
        "clientKey": "test_123",
        "environment": "live-us",
        "session": {"id": "S1", "sessionData": "D1"}
    }));

    let created = establisher.establish(&root, &session).await.unwrap();

    assert_eq!(created.session_identifier(), "S1");
    assert!(sdk.has_call(&SdkCall::CreateSession {
        session_identifier: "S1".to_string(),
        session_data: "D1".to_string(),
    }));
    let request = &sdk.session_requests()[0];
    assert_eq!(request.client_key, "test_123");
    assert_eq!(request.environment, Environment::LiveUnitedStates);
}

#[tokio::test]
async fn SessionEstablisher___establish___uses_root_payment_as_fallback() {
    let sdk = SandboxSdk::new();
    let establisher = SessionEstablisher::new(Arc::new(sdk.clone()));
    let (root, session) = parse(json!({
        "clientKey": "test_123",
        "countryCode": "NL",
        "amount": {"value": 1000, "currency": "EUR"},
        "session": {"id": "S1", "sessionData": "D1"}
    }));

    establisher.establish(&root, &session).await.unwrap();

    let payment = sdk.session_requests()[0].payment.clone().unwrap();
    assert_eq!(payment.amount, Amount::new(1000, "EUR"));
    assert_eq!(payment.country_code, "NL");
}

#[tokio::test]
async fn SessionEstablisher___session_catalogue___is_exposed() {
    let methods = PaymentMethods::new(vec![PaymentMethod::new("ideal", "iDEAL")]);
    let sdk = SandboxSdk::new().with_session_methods(methods.clone());
    let establisher = SessionEstablisher::new(Arc::new(sdk));
    let (root, session) = parse(json!({"clientKey": "k", "id": "S1", "sessionData": "D1"}));

    let created = establisher.establish(&root, &session).await.unwrap();

    assert_eq!(created.payment_methods(), methods);
}

#[tokio::test]
async fn SessionEstablisher___sdk_failure___returned_verbatim() {
    let sdk = SandboxSdk::new();
    let failure = SdkError::new(SdkOrigin::Session, "sessionExpired", "Session expired");
    sdk.fail_session(failure.clone());
    let establisher = SessionEstablisher::new(Arc::new(sdk));
    let (root, session) = parse(json!({"clientKey": "k", "session": {"id": "S1", "sessionData": "D1"}}));

    let result = establisher.establish(&root, &session).await;

    let err = result.err().unwrap();
    assert_eq!(err, CheckoutError::Sdk(failure));
    assert_eq!(err.error_code(), "sessionExpired");
    assert_eq!(err.to_string(), "Session expired");
}
