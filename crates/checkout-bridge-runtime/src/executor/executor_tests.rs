#![allow(non_snake_case)]

use super::*;
use crate::RuntimeConfig;
use checkout_bridge_core::ErrorKind;
use std::sync::atomic::AtomicBool;

fn create_test_executor() -> HostExecutor {
    let runtime = AsyncRuntime::new(RuntimeConfig::default()).unwrap();
    HostExecutor::new(Arc::new(runtime))
}

#[test]
fn HostExecutor___next_call_id___increments_sequentially() {
    let executor = create_test_executor();

    let ids = [
        executor.next_call_id(),
        executor.next_call_id(),
        executor.next_call_id(),
    ];

    assert_eq!(ids, [0, 1, 2]);
}

#[test]
fn HostExecutor___clone___shares_call_counter() {
    let executor = create_test_executor();
    let clone = executor.clone();

    executor.next_call_id();

    assert_eq!(clone.next_call_id(), 1);
}

#[test]
fn HostExecutor___call_sync___executes_async_future() {
    let executor = create_test_executor();

    let result = executor.call_sync(async { Ok::<_, CheckoutError>(42) });

    assert_eq!(result.unwrap(), 42);
}

#[test]
fn HostExecutor___call_sync___propagates_errors() {
    let executor = create_test_executor();

    let result: CheckoutResult<()> =
        executor.call_sync(async { Err(CheckoutError::NoActiveComponent) });

    assert_eq!(result, Err(CheckoutError::NoActiveComponent));
}

#[test]
fn HostExecutor___call_sync_timeout___succeeds_within_timeout() {
    let executor = create_test_executor();

    let result = executor.call_sync_timeout(
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok::<_, CheckoutError>(42)
        },
        Duration::from_secs(1),
    );

    assert_eq!(result.unwrap(), 42);
}

#[test]
fn HostExecutor___call_sync_timeout___times_out() {
    let executor = create_test_executor();

    let result = executor.call_sync_timeout(
        async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, CheckoutError>(())
        },
        Duration::from_millis(10),
    );

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.to_string().contains("timed out"));
}

#[test]
fn HostExecutor___spawn___runs_continuation() {
    let executor = create_test_executor();
    let (tx, rx) = std::sync::mpsc::channel();

    executor
        .spawn("test", async move {
            tx.send(5).unwrap();
        })
        .unwrap();

    assert_eq!(rx.recv_timeout(Duration::from_secs(1)).unwrap(), 5);
}

#[test]
fn HostExecutor___spawn_panicking_task___does_not_poison_executor() {
    let executor = create_test_executor();

    executor
        .spawn("panics", async {
            panic!("continuation failure");
        })
        .unwrap();

    let result = executor.call_sync(async { Ok::<_, CheckoutError>(1) });
    assert_eq!(result.unwrap(), 1);
}

#[test]
fn HostExecutor___after_shutdown___rejects_calls() {
    let executor = create_test_executor();
    executor
        .runtime()
        .shutdown(Duration::from_millis(10))
        .unwrap();

    let result = executor.call_sync(async { Ok::<_, CheckoutError>(()) });
    let spawned = executor.spawn("late", async {});

    assert!(executor.is_shutting_down());
    assert!(matches!(result, Err(CheckoutError::Runtime(_))));
    assert!(matches!(spawned, Err(CheckoutError::Runtime(_))));
}

#[test]
fn HostExecutor___shutdown___abandons_pending_continuation() {
    let executor = create_test_executor();
    let finished = Arc::new(AtomicBool::new(false));
    let flag = finished.clone();
    executor
        .spawn("pending", async move {
            std::future::pending::<()>().await;
            flag.store(true, Ordering::SeqCst);
        })
        .unwrap();

    executor
        .runtime()
        .shutdown(Duration::from_millis(500))
        .unwrap();

    assert!(!finished.load(Ordering::SeqCst));
    assert!(executor.shutdown_signal().is_triggered());
}

#[test]
fn HostExecutor___spawn_guarded___reports_panic_message() {
    let executor = create_test_executor();
    let (tx, rx) = std::sync::mpsc::channel();

    executor
        .spawn_guarded(
            "guarded",
            async {
                panic!("open continuation failed");
            },
            move |message| {
                tx.send(message).unwrap();
            },
        )
        .unwrap();

    let message = rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(message, "open continuation failed");
}

#[test]
fn panic_message___string_payload___returns_text() {
    let payload: Box<dyn Any + Send> = Box::new(String::from("boom"));

    assert_eq!(panic_message(payload.as_ref()), "boom");
}

#[test]
fn panic_message___unknown_payload___returns_placeholder() {
    let payload: Box<dyn Any + Send> = Box::new(42_u32);

    assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
}
