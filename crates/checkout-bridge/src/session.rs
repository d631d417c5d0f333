//! Server-managed session establishment

use checkout_bridge_core::{
    CheckoutResult, PaymentSdk, RootConfiguration, SdkSession, SessionConfiguration,
    SessionRequest,
};
use std::sync::Arc;

/// Creates sessions through the native SDK
///
/// Establishment is network-bound; the caller decides what to do with the
/// session if the bridge moved on while it was being created.
#[derive(Clone)]
pub struct SessionEstablisher {
    sdk: Arc<dyn PaymentSdk>,
}

impl SessionEstablisher {
    pub fn new(sdk: Arc<dyn PaymentSdk>) -> Self {
        Self { sdk }
    }

    /// Create a session from the parsed host configuration
    ///
    /// SDK failures are returned verbatim as [`CheckoutError::Sdk`](checkout_bridge_core::CheckoutError::Sdk).
    pub async fn establish(
        &self,
        root: &RootConfiguration,
        session: &SessionConfiguration,
    ) -> CheckoutResult<Arc<dyn SdkSession>> {
        let request = SessionRequest {
            environment: root.environment,
            client_key: root.client_key.clone(),
            session_identifier: session.session_identifier.clone(),
            initial_session_data: session.initial_session_data.clone(),
            payment: session.payment(root),
            locale: root.locale.clone(),
        };

        tracing::debug!(
            session_id = %request.session_identifier,
            environment = %request.environment,
            "creating session"
        );

        match self.sdk.create_session(request).await {
            Ok(created) => {
                tracing::info!(session_id = created.session_identifier(), "session established");
                Ok(created)
            }
            Err(err) => {
                tracing::warn!(code = %err.code, error = %err, "session creation failed");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "session/session_tests.rs"]
mod session_tests;
