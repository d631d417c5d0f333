#![allow(non_snake_case)]

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*;

// Tests below share the global manager.
static GLOBAL_MANAGER_LOCK: Mutex<()> = Mutex::new(());

fn counting_callback() -> (crate::LogCallback, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    let callback: crate::LogCallback = Arc::new(move |_: LogLevel, _: &str, _: &str| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (callback, count)
}

fn capturing_callback() -> (crate::LogCallback, Arc<Mutex<Option<String>>>) {
    let captured = Arc::new(Mutex::new(None));
    let slot = captured.clone();
    let callback: crate::LogCallback = Arc::new(move |_: LogLevel, _: &str, message: &str| {
        *slot.lock().unwrap() = Some(message.to_string());
    });
    (callback, captured)
}

#[test]
fn HostLoggingLayer___convert_level___maps_every_level() {
    assert_eq!(HostLoggingLayer::convert_level(&Level::TRACE), LogLevel::Trace);
    assert_eq!(HostLoggingLayer::convert_level(&Level::DEBUG), LogLevel::Debug);
    assert_eq!(HostLoggingLayer::convert_level(&Level::INFO), LogLevel::Info);
    assert_eq!(HostLoggingLayer::convert_level(&Level::WARN), LogLevel::Warn);
    assert_eq!(HostLoggingLayer::convert_level(&Level::ERROR), LogLevel::Error);
}

#[test]
fn HostLoggingLayer___with_callback___filters_below_level() {
    let _guard = GLOBAL_MANAGER_LOCK.lock().unwrap();
    let manager = LogCallbackManager::global();
    let (callback, count) = counting_callback();
    manager.set_callback(Some(callback));
    manager.set_level(LogLevel::Info);

    let subscriber = tracing_subscriber::registry().with(HostLoggingLayer::new());
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("component presented");
        tracing::debug!("state transition");
        tracing::error!("session failed");
    });

    manager.set_callback(None);
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn HostLoggingLayer___with_structured_fields___appends_fields() {
    let _guard = GLOBAL_MANAGER_LOCK.lock().unwrap();
    let manager = LogCallbackManager::global();
    let (callback, captured) = capturing_callback();
    manager.set_callback(Some(callback));
    manager.set_level(LogLevel::Info);

    let subscriber = tracing_subscriber::registry().with(HostLoggingLayer::new());
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(component = "dropin", epoch = 3, "component opened");
    });

    manager.set_callback(None);
    let message = captured.lock().unwrap().clone().unwrap();
    assert_eq!(message, "component opened component=dropin epoch=3");
}

#[test]
fn HostLoggingLayer___fields_without_message___uses_fields() {
    let _guard = GLOBAL_MANAGER_LOCK.lock().unwrap();
    let manager = LogCallbackManager::global();
    let (callback, captured) = capturing_callback();
    manager.set_callback(Some(callback));
    manager.set_level(LogLevel::Warn);

    let subscriber = tracing_subscriber::registry().with(HostLoggingLayer::new());
    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(request_code = 1002);
    });

    manager.set_callback(None);
    manager.set_level(LogLevel::Info);
    assert_eq!(captured.lock().unwrap().as_deref(), Some("request_code=1002"));
}

#[test]
fn MessageVisitor___message_only___is_unchanged() {
    let visitor = MessageVisitor {
        message: Some("plain".to_string()),
        fields: String::new(),
    };

    assert_eq!(visitor.into_message(), "plain");
}
