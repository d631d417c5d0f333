//! Tokio runtime management

use crate::shutdown::{ShutdownHandle, ShutdownSignal};
use checkout_bridge_core::{BridgeSettings, CheckoutError, CheckoutResult};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::Notify;

/// Configuration for the bridge runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Worker threads; one keeps continuations on a single logical context
    pub worker_threads: usize,
    /// Name prefix for worker threads
    pub thread_name: String,
    /// Maximum blocking threads
    pub max_blocking_threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: 1,
            thread_name: "checkout-bridge-worker".to_string(),
            max_blocking_threads: 16,
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime configuration derived from the bridge settings
    pub fn from_settings(settings: &BridgeSettings) -> Self {
        Self::default().with_worker_threads(settings.worker_threads)
    }

    /// Set the number of worker threads (at least one)
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.max(1);
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// Count of spawned tasks that have not finished yet
#[derive(Default)]
pub(crate) struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    pub(crate) fn enter(self: &Arc<Self>) -> InFlightGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            tasks: Arc::clone(self),
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.count() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Decrements the in-flight count when the task ends (or unwinds)
pub(crate) struct InFlightGuard {
    tasks: Arc<InFlight>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.tasks.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.tasks.idle.notify_waiters();
        }
    }
}

/// Owns the Tokio runtime the bridge's continuations run on
pub struct AsyncRuntime {
    runtime: Mutex<Option<Runtime>>,
    handle: tokio::runtime::Handle,
    shutdown_handle: ShutdownHandle,
    in_flight: Arc<InFlight>,
    config: RuntimeConfig,
}

impl AsyncRuntime {
    pub fn new(config: RuntimeConfig) -> CheckoutResult<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads.max(1))
            .thread_name(&config.thread_name)
            .max_blocking_threads(config.max_blocking_threads)
            .enable_all()
            .build()
            .map_err(|e| CheckoutError::Runtime(format!("failed to create runtime: {e}")))?;

        Ok(Self {
            handle: runtime.handle().clone(),
            runtime: Mutex::new(Some(runtime)),
            shutdown_handle: ShutdownHandle::new(),
            in_flight: Arc::new(InFlight::default()),
            config,
        })
    }

    pub fn with_defaults() -> CheckoutResult<Self> {
        Self::new(RuntimeConfig::default())
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Handle to the underlying Tokio runtime
    pub fn handle(&self) -> tokio::runtime::Handle {
        self.handle.clone()
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown_handle.signal()
    }

    /// Block the calling (host) thread on a future
    ///
    /// Must not be called from a runtime worker thread.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.handle.block_on(future)
    }

    /// Spawn a task counted until it finishes
    pub fn spawn<F>(&self, future: F) -> tokio::task::JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let guard = self.in_flight.enter();
        self.handle.spawn(async move {
            let _guard = guard;
            future.await
        })
    }

    /// Number of spawned tasks still running
    pub fn in_flight(&self) -> usize {
        self.in_flight.count()
    }

    /// Initiate graceful shutdown
    ///
    /// Signals every task, waits up to `timeout` for spawned tasks to finish,
    /// then stops the runtime. Calling it twice is a no-op.
    pub fn shutdown(&self, timeout: Duration) -> CheckoutResult<()> {
        let Some(runtime) = self.runtime.lock().take() else {
            return Ok(());
        };
        tracing::info!(?timeout, in_flight = self.in_flight(), "shutting down bridge runtime");

        self.shutdown_handle.trigger();

        let in_flight = Arc::clone(&self.in_flight);
        let drained = runtime.block_on(async move {
            tokio::time::timeout(timeout, in_flight.wait_idle())
                .await
                .is_ok()
        });
        if !drained {
            tracing::warn!(
                remaining = self.in_flight(),
                "runtime shutdown timed out, abandoning tasks"
            );
        }

        runtime.shutdown_timeout(Duration::from_millis(100));
        tracing::info!("bridge runtime shutdown complete");
        Ok(())
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_handle.is_triggered()
    }
}

impl Drop for AsyncRuntime {
    fn drop(&mut self) {
        self.shutdown_handle.trigger();
        if let Some(runtime) = self.runtime.lock().take() {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
#[path = "runtime/runtime_tests.rs"]
mod runtime_tests;
