//! Shutdown signalling between the runtime and its continuations
//!
//! One `watch` channel carries a single flag: once it flips to `true` it
//! never flips back, so late subscribers observe it immediately.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Owner side of the shutdown flag
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    /// Raise the flag; returns whether this call was the one that raised it
    pub fn trigger(&self) -> bool {
        self.flag
            .send_if_modified(|triggered| !std::mem::replace(triggered, true))
    }

    pub fn is_triggered(&self) -> bool {
        *self.flag.borrow()
    }

    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            flag: self.flag.subscribe(),
        }
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Observes shutdown from inside spawned continuations
#[derive(Clone)]
pub struct ShutdownSignal {
    flag: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub fn is_triggered(&self) -> bool {
        *self.flag.borrow()
    }

    /// Resolve once shutdown is triggered or the handle is gone
    pub async fn wait(&mut self) {
        let _ = self.flag.wait_for(|triggered| *triggered).await;
    }

    /// Run `future` unless shutdown happens first
    ///
    /// Returns `None` when the future was abandoned, including when shutdown
    /// had already been triggered before the call.
    pub async fn until_shutdown<F: Future>(mut self, future: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.wait() => None,
            output = future => Some(output),
        }
    }
}
