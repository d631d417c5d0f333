#![allow(non_snake_case)]

use super::*;
use tracing_subscriber::prelude::*;

#[test]
fn level_filter___maps_every_level() {
    assert_eq!(level_filter(LogLevel::Trace), LevelFilter::TRACE);
    assert_eq!(level_filter(LogLevel::Debug), LevelFilter::DEBUG);
    assert_eq!(level_filter(LogLevel::Info), LevelFilter::INFO);
    assert_eq!(level_filter(LogLevel::Warn), LevelFilter::WARN);
    assert_eq!(level_filter(LogLevel::Error), LevelFilter::ERROR);
    assert_eq!(level_filter(LogLevel::Off), LevelFilter::OFF);
}

#[test]
fn ReloadHandle___uninitialized___reports_error() {
    let handle = ReloadHandle::new();

    let result = handle.reload_level(LogLevel::Debug);

    assert!(!handle.is_initialized());
    assert!(result.is_err());
}

#[test]
fn ReloadHandle___with_handle___reloads_filter() {
    let handle = ReloadHandle::default();
    let (filter, reload_handle) = reload::Layer::new(LevelFilter::INFO);
    let _subscriber = tracing_subscriber::registry().with(filter);
    handle.set_handle(reload_handle);

    let result = handle.reload_level(LogLevel::Trace);

    assert!(handle.is_initialized());
    assert!(result.is_ok());
}
