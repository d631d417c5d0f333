//! Correlation of external app and sheet hand-offs

/// Request code used when a wallet component launches its platform sheet
pub const WALLET_REQUEST_CODE: i32 = 1001;

/// Request code used when an action hands off to an external app or browser
pub const ACTION_REQUEST_CODE: i32 = 1002;

/// An outstanding hand-off waiting for the host to forward its result
///
/// At most one exists per active component. It is consumed by the first
/// result carrying the same request code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingExternalFlow {
    request_code: i32,
}

impl PendingExternalFlow {
    pub fn new(request_code: i32) -> Self {
        Self { request_code }
    }

    pub fn wallet() -> Self {
        Self::new(WALLET_REQUEST_CODE)
    }

    pub fn request_code(&self) -> i32 {
        self.request_code
    }

    pub fn matches(&self, request_code: i32) -> bool {
        self.request_code == request_code
    }
}

#[cfg(test)]
#[path = "external/external_tests.rs"]
mod external_tests;
