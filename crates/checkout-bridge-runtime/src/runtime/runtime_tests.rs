#![allow(non_snake_case)]

use super::*;

// RuntimeConfig tests

#[test]
fn RuntimeConfig___default___uses_single_worker() {
    let config = RuntimeConfig::default();

    assert_eq!(config.worker_threads, 1);
    assert_eq!(config.thread_name, "checkout-bridge-worker");
    assert_eq!(config.max_blocking_threads, 16);
}

#[test]
fn RuntimeConfig___with_worker_threads_zero___clamps_to_one() {
    let config = RuntimeConfig::new().with_worker_threads(0);

    assert_eq!(config.worker_threads, 1);
}

#[test]
fn RuntimeConfig___from_settings___takes_worker_threads() {
    let settings = BridgeSettings {
        worker_threads: 3,
        ..Default::default()
    };

    let config = RuntimeConfig::from_settings(&settings);

    assert_eq!(config.worker_threads, 3);
}

#[test]
fn RuntimeConfig___with_thread_name___sets_name() {
    let config = RuntimeConfig::new().with_thread_name("checkout-test");

    assert_eq!(config.thread_name, "checkout-test");
}

// AsyncRuntime tests

#[test]
fn AsyncRuntime___with_defaults___is_running() {
    let runtime = AsyncRuntime::with_defaults().unwrap();

    assert!(!runtime.is_shutting_down());
    assert_eq!(runtime.in_flight(), 0);
}

#[test]
fn AsyncRuntime___block_on___executes_future() {
    let runtime = AsyncRuntime::with_defaults().unwrap();

    let result = runtime.block_on(async { 42 });

    assert_eq!(result, 42);
}

#[test]
fn AsyncRuntime___spawn___executes_task_and_releases_count() {
    let runtime = AsyncRuntime::with_defaults().unwrap();

    let handle = runtime.spawn(async { 123 });
    let result = runtime.block_on(handle).unwrap();

    assert_eq!(result, 123);
    assert_eq!(runtime.in_flight(), 0);
}

#[test]
fn AsyncRuntime___shutdown___triggers_signal() {
    let runtime = AsyncRuntime::with_defaults().unwrap();
    let signal = runtime.shutdown_signal();

    runtime.shutdown(Duration::from_millis(50)).unwrap();

    assert!(runtime.is_shutting_down());
    assert!(signal.is_triggered());
}

#[test]
fn AsyncRuntime___shutdown_twice___is_noop() {
    let runtime = AsyncRuntime::with_defaults().unwrap();

    runtime.shutdown(Duration::from_millis(10)).unwrap();
    let second = runtime.shutdown(Duration::from_millis(10));

    assert!(second.is_ok());
}

#[test]
fn AsyncRuntime___shutdown___waits_for_signal_aware_tasks() {
    let runtime = AsyncRuntime::with_defaults().unwrap();
    let finished = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let mut signal = runtime.shutdown_signal();
    let flag = finished.clone();
    let _task = runtime.spawn(async move {
        signal.wait().await;
        flag.store(true, Ordering::SeqCst);
    });

    runtime.shutdown(Duration::from_secs(1)).unwrap();

    assert!(finished.load(Ordering::SeqCst));
}
