//! Host event vocabulary

use crate::CheckoutError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a `didFail` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub error_code: String,
    pub error_message: String,
}

impl From<&CheckoutError> for ErrorPayload {
    fn from(err: &CheckoutError) -> Self {
        Self {
            error_code: err.error_code().to_string(),
            error_message: err.to_string(),
        }
    }
}

/// Every outcome the bridge reports to the host
///
/// `DidSubmit` and `DidProvide` may occur any number of times; exactly one of
/// `DidComplete` or `DidFail` ends a component's lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutEvent {
    /// Shopper submitted payment data
    DidSubmit(Value),
    /// Component produced additional action data
    DidProvide(Value),
    /// Payment finished successfully
    DidComplete,
    /// Payment or bridge operation failed
    DidFail(ErrorPayload),
}

impl CheckoutEvent {
    pub fn fail(err: &CheckoutError) -> Self {
        CheckoutEvent::DidFail(err.into())
    }

    /// Event name on the host side
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutEvent::DidSubmit(_) => "didSubmit",
            CheckoutEvent::DidProvide(_) => "didProvide",
            CheckoutEvent::DidComplete => "didComplete",
            CheckoutEvent::DidFail(_) => "didFail",
        }
    }

    /// Whether this event ends a component's lifecycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutEvent::DidComplete | CheckoutEvent::DidFail(_))
    }

    /// Error code of a `DidFail` event
    pub fn error_code(&self) -> Option<&str> {
        match self {
            CheckoutEvent::DidFail(payload) => Some(&payload.error_code),
            _ => None,
        }
    }
}
