//! Host event emission and SDK error translation

use checkout_bridge_core::{CheckoutError, CheckoutEvent, SdkError, keys};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Receiver of the events the bridge reports to the host
///
/// Called without any bridge lock held, from whichever thread produced the
/// event.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: CheckoutEvent);
}

impl<F> EventSink for F
where
    F: Fn(CheckoutEvent) + Send + Sync,
{
    fn emit(&self, event: CheckoutEvent) {
        self(event)
    }
}

/// Event sink backed by an unbounded Tokio channel
#[derive(Clone)]
pub struct ChannelEventSink {
    sender: mpsc::UnboundedSender<CheckoutEvent>,
}

impl ChannelEventSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CheckoutEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: CheckoutEvent) {
        if self.sender.send(event).is_err() {
            tracing::debug!("event receiver dropped, event discarded");
        }
    }
}

/// Builds host events from bridge outcomes
#[derive(Clone)]
pub struct EventEmitter {
    sink: Arc<dyn EventSink>,
}

impl EventEmitter {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Report submitted payment data, adding `returnUrl` when it is missing
    pub fn submit(&self, payment_data: Value, return_url: Option<&str>) {
        self.emit(CheckoutEvent::DidSubmit(inject_return_url(
            payment_data,
            return_url,
        )));
    }

    pub fn provide(&self, action_data: Value) {
        self.emit(CheckoutEvent::DidProvide(action_data));
    }

    pub fn complete(&self) {
        self.emit(CheckoutEvent::DidComplete);
    }

    pub fn fail(&self, err: &CheckoutError) {
        tracing::error!(code = err.error_code(), error = %err, "checkout failed");
        self.emit(CheckoutEvent::fail(err));
    }

    fn emit(&self, event: CheckoutEvent) {
        tracing::debug!(event = event.name(), "emitting event");
        self.sink.emit(event);
    }
}

/// Map a native SDK failure onto the bridge taxonomy
///
/// Component failures carrying the canonical cancellation message become
/// [`CheckoutError::Canceled`]; everything else passes through unchanged.
pub fn translate_failure(err: SdkError) -> CheckoutError {
    if err.is_cancellation() {
        CheckoutError::Canceled
    } else {
        CheckoutError::Sdk(err)
    }
}

/// Add `returnUrl` to an object payload that does not carry one
pub fn inject_return_url(payment_data: Value, return_url: Option<&str>) -> Value {
    match (payment_data, return_url) {
        (Value::Object(mut data), Some(url)) => {
            data.entry(keys::RETURN_URL)
                .or_insert_with(|| Value::String(url.to_string()));
            Value::Object(data)
        }
        (payment_data, _) => payment_data,
    }
}
