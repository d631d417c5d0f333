#![allow(non_snake_case)]

use super::*;
use checkout_bridge_core::{Environment, SdkOrigin};

fn session_request(id: &str) -> SessionRequest {
    SessionRequest {
        environment: Environment::Test,
        client_key: "test_key".to_string(),
        session_identifier: id.to_string(),
        initial_session_data: "data".to_string(),
        payment: None,
        locale: None,
    }
}

#[tokio::test]
async fn SandboxSdk___create_session___records_call_and_returns_catalogue() {
    let methods = PaymentMethods::new(vec![PaymentMethod::new("scheme", "Cards")]);
    let sdk = SandboxSdk::new().with_session_methods(methods.clone());

    let session = sdk.create_session(session_request("S1")).await.unwrap();

    assert_eq!(session.session_identifier(), "S1");
    assert_eq!(session.payment_methods(), methods);
    assert_eq!(
        sdk.calls(),
        vec![SdkCall::CreateSession {
            session_identifier: "S1".to_string(),
            session_data: "data".to_string(),
        }]
    );
}

#[tokio::test]
async fn SandboxSdk___scripted_session_failure___returns_error() {
    let sdk = SandboxSdk::new();
    let err = SdkError::new(SdkOrigin::Session, "401", "Unauthorized");
    sdk.fail_session(err.clone());

    let result = sdk.create_session(session_request("S1")).await;

    assert_eq!(result.err(), Some(err));
}

#[tokio::test]
async fn SandboxSdk___held_session___completes_after_release() {
    let sdk = SandboxSdk::new();
    sdk.hold_sessions();
    let worker = sdk.clone();

    let task = tokio::spawn(async move { worker.create_session(session_request("S1")).await });
    sdk.release_sessions();

    assert!(task.await.unwrap().is_ok());
}

#[test]
fn SandboxSdk___deliver_without_component___returns_false() {
    let sdk = SandboxSdk::new();

    assert!(!sdk.complete());
}

#[test]
fn EventLog___emit___records_in_order() {
    let log = EventLog::new();

    log.emit(CheckoutEvent::DidProvide(Value::Null));
    log.emit(CheckoutEvent::DidComplete);

    assert_eq!(log.names(), vec!["didProvide", "didComplete"]);
    assert_eq!(log.terminal_count(), 1);
    assert_eq!(log.last(), Some(CheckoutEvent::DidComplete));
}

#[test]
fn EventLog___wait_for_missing_events___times_out() {
    let log = EventLog::new();

    assert!(!log.wait_for(1, Duration::from_millis(20)));
}

#[test]
fn EventLog___wait_for_event_from_other_thread___returns_true() {
    let log = EventLog::new();
    let writer = log.clone();

    let handle = std::thread::spawn(move || writer.emit(CheckoutEvent::DidComplete));

    assert!(log.wait_for(1, Duration::from_secs(2)));
    handle.join().unwrap();
}
