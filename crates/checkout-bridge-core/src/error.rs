//! Error taxonomy for checkout-bridge

use crate::ComponentState;
use thiserror::Error;

/// Result type alias for bridge operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Canonical message the native SDK uses when the shopper dismisses a component
pub const CANCELED_MESSAGE: &str = "Payment canceled.";

/// Configuration problems detected while parsing a host payload
///
/// These are terminal for the `open` call that produced them and never
/// affect bridge-wide state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `clientKey` absent, empty or not a string
    #[error("no clientKey in configuration")]
    NoClientKey,

    /// Amount or country code missing where a payment is required
    #[error("amount or countryCode missing in configuration")]
    NoPayment,

    /// A session block without both `id` and `sessionData`
    #[error("missing session.id or session.sessionData")]
    MalformedSession,

    /// Standalone-action flow opened without a payment methods payload
    #[error("no paymentMethods provided")]
    NoPaymentMethods,

    /// The payment methods payload does not match the expected shape
    #[error("invalid paymentMethods: {0}")]
    InvalidPaymentMethods(String),

    /// Wallet configuration without the merchant identifier it requires
    #[error("{0} requires a merchant identifier")]
    NoMerchantIdentifier(&'static str),
}

impl ConfigError {
    /// Stable code reported to the host in `didFail`
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::NoClientKey => "noClientKey",
            ConfigError::NoPayment => "noPayment",
            ConfigError::MalformedSession => "invalidSession",
            ConfigError::NoPaymentMethods => "noPaymentMethods",
            ConfigError::InvalidPaymentMethods(_) => "invalidPaymentMethods",
            ConfigError::NoMerchantIdentifier(_) => "noMerchantIdentifier",
        }
    }
}

/// Which native collaborator produced an [`SdkError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkOrigin {
    /// Session creation or a session delegate callback
    Session,
    /// A payment component (drop-in, wallet, card, ...)
    Component,
    /// Platform plumbing around the SDK (sheets, activities)
    Platform,
}

/// Opaque failure reported by the native payment SDK
///
/// Passed through to the host unchanged, except for component cancellation
/// which is remapped to [`CheckoutError::Canceled`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SdkError {
    pub origin: SdkOrigin,
    pub code: String,
    pub message: String,
}

impl SdkError {
    pub fn new(origin: SdkOrigin, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            origin,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Component failure carrying the canonical cancellation message
    pub fn cancellation() -> Self {
        Self::new(SdkOrigin::Component, "canceled", CANCELED_MESSAGE)
    }

    /// True only for a component failure whose message is exactly [`CANCELED_MESSAGE`]
    pub fn is_cancellation(&self) -> bool {
        self.origin == SdkOrigin::Component && self.message == CANCELED_MESSAGE
    }
}

/// Closed classification of every error the host can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    NoPaymentMethod,
    NotSupported,
    InvalidAction,
    Canceled,
    Sdk,
    InvalidState,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::NoPaymentMethod => "noPaymentMethod",
            ErrorKind::NotSupported => "notSupported",
            ErrorKind::InvalidAction => "invalidAction",
            ErrorKind::Canceled => "canceled",
            ErrorKind::Sdk => "sdk",
            ErrorKind::InvalidState => "invalidState",
            ErrorKind::Internal => "internal",
        }
    }

    /// Recover the kind from a host-facing error code
    ///
    /// Configuration codes map to `Configuration`; unknown codes are treated as
    /// SDK pass-through codes.
    pub fn from_code(code: &str) -> Self {
        match code {
            "noClientKey" | "noPayment" | "invalidSession" | "noPaymentMethods"
            | "invalidPaymentMethods" | "noMerchantIdentifier" => ErrorKind::Configuration,
            "noPaymentMethod" => ErrorKind::NoPaymentMethod,
            "notSupported" => ErrorKind::NotSupported,
            "invalidAction" | "noActiveComponent" => ErrorKind::InvalidAction,
            "canceled" => ErrorKind::Canceled,
            "invalidState" => ErrorKind::InvalidState,
            "internal" | "runtime" => ErrorKind::Internal,
            _ => ErrorKind::Sdk,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for checkout operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckoutError {
    /// Host configuration could not be used
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// The requested payment method is not in the catalogue
    #[error("missing {0} payment method")]
    NoPaymentMethod(String),

    /// The requested wallet is unavailable on this device
    #[error("{0} unavailable")]
    NotSupported(String),

    /// Action payload is malformed or could not be delivered
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// An action arrived while no component was presented
    #[error("no active component to receive the action")]
    NoActiveComponent,

    /// Shopper dismissed the payment UI
    #[error("payment canceled by shopper")]
    Canceled,

    /// Operation not permitted in the current lifecycle state
    #[error("invalid checkout state: expected {expected}, got {actual}")]
    InvalidState {
        expected: ComponentState,
        actual: ComponentState,
    },

    /// Pass-through failure from the native SDK or session
    #[error(transparent)]
    Sdk(#[from] SdkError),

    /// Async runtime failure
    #[error("runtime error: {0}")]
    Runtime(String),

    /// Unexpected internal failure (caught panic)
    #[error("internal error: {0}")]
    Internal(String),
}

impl CheckoutError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckoutError::Configuration(_) => ErrorKind::Configuration,
            CheckoutError::NoPaymentMethod(_) => ErrorKind::NoPaymentMethod,
            CheckoutError::NotSupported(_) => ErrorKind::NotSupported,
            CheckoutError::InvalidAction(_) | CheckoutError::NoActiveComponent => {
                ErrorKind::InvalidAction
            }
            CheckoutError::Canceled => ErrorKind::Canceled,
            CheckoutError::InvalidState { .. } => ErrorKind::InvalidState,
            CheckoutError::Sdk(_) => ErrorKind::Sdk,
            CheckoutError::Runtime(_) | CheckoutError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Code reported to the host as `errorCode`
    ///
    /// SDK errors keep the code the SDK assigned.
    pub fn error_code(&self) -> &str {
        match self {
            CheckoutError::Configuration(e) => e.error_code(),
            CheckoutError::NoPaymentMethod(_) => "noPaymentMethod",
            CheckoutError::NotSupported(_) => "notSupported",
            CheckoutError::InvalidAction(_) => "invalidAction",
            CheckoutError::NoActiveComponent => "noActiveComponent",
            CheckoutError::Canceled => "canceled",
            CheckoutError::InvalidState { .. } => "invalidState",
            CheckoutError::Sdk(e) => &e.code,
            CheckoutError::Runtime(_) => "runtime",
            CheckoutError::Internal(_) => "internal",
        }
    }

    /// True when this error means the shopper backed out
    pub fn is_canceled(&self) -> bool {
        matches!(self, CheckoutError::Canceled)
    }
}
