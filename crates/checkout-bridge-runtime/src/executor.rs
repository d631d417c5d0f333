//! Bridge between synchronous host calls and async bridge operations

use crate::{AsyncRuntime, ShutdownSignal};
use checkout_bridge_core::{CheckoutError, CheckoutResult};
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Runs bridge operations on the runtime on behalf of the host
///
/// Host calls either block until the operation finishes (`call_sync`) or
/// hand it off as a detached continuation (`spawn`). Detached tasks that
/// panic are logged rather than silently lost.
#[derive(Clone)]
pub struct HostExecutor {
    runtime: Arc<AsyncRuntime>,
    call_counter: Arc<AtomicU64>,
}

impl HostExecutor {
    pub fn new(runtime: Arc<AsyncRuntime>) -> Self {
        Self {
            runtime,
            call_counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Identifier for the next host call, used to correlate logs
    pub fn next_call_id(&self) -> u64 {
        self.call_counter.fetch_add(1, Ordering::SeqCst)
    }

    pub fn runtime(&self) -> &Arc<AsyncRuntime> {
        &self.runtime
    }

    /// Run an operation to completion from a host thread
    pub fn call_sync<F, T>(&self, future: F) -> CheckoutResult<T>
    where
        F: Future<Output = CheckoutResult<T>>,
    {
        self.ensure_running()?;
        self.runtime.block_on(future)
    }

    /// Run an operation from a host thread, giving up after `timeout`
    pub fn call_sync_timeout<F, T>(&self, future: F, timeout: Duration) -> CheckoutResult<T>
    where
        F: Future<Output = CheckoutResult<T>>,
    {
        self.ensure_running()?;
        self.runtime.block_on(async move {
            match tokio::time::timeout(timeout, future).await {
                Ok(result) => result,
                Err(_) => Err(CheckoutError::Runtime(format!(
                    "operation timed out after {}ms",
                    timeout.as_millis()
                ))),
            }
        })
    }

    /// Start a detached continuation
    ///
    /// The continuation is abandoned if the bridge shuts down before it
    /// finishes. A panic inside it is logged with `label`.
    pub fn spawn<F>(&self, label: &'static str, future: F) -> CheckoutResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn_guarded(label, future, |_| {})
    }

    /// Start a detached continuation, calling `on_panic` with the panic message
    pub fn spawn_guarded<F, P>(&self, label: &'static str, future: F, on_panic: P) -> CheckoutResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
        P: FnOnce(String) + Send + 'static,
    {
        self.ensure_running()?;
        let signal = self.runtime.shutdown_signal();
        let task = self.runtime.spawn(async move {
            if signal.until_shutdown(future).await.is_none() {
                tracing::debug!(task = label, "continuation abandoned at shutdown");
            }
        });
        self.runtime.spawn(async move {
            match task.await {
                Ok(()) => {}
                Err(e) if e.is_panic() => {
                    let message = panic_message(e.into_panic().as_ref());
                    tracing::error!(task = label, panic = %message, "continuation panicked");
                    on_panic(message);
                }
                Err(_) => tracing::debug!(task = label, "continuation cancelled"),
            }
        });
        Ok(())
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.runtime.shutdown_signal()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.runtime.is_shutting_down()
    }

    fn ensure_running(&self) -> CheckoutResult<()> {
        if self.runtime.is_shutting_down() {
            return Err(CheckoutError::Runtime(
                "bridge runtime is shutting down".to_string(),
            ));
        }
        Ok(())
    }
}

/// Human-readable text of a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "executor/executor_tests.rs"]
mod executor_tests;
