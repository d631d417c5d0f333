//! Routing of server-issued actions

use crate::external::{ACTION_REQUEST_CODE, PendingExternalFlow};
use checkout_bridge_core::Action;

/// Where an action is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionRoute {
    /// Handled entirely inside the active component
    Component,
    /// Leaves the app; the host must forward the result under `request_code`
    ExternalApp { request_code: i32 },
}

impl ActionRoute {
    /// The pending flow to arm before handing the action over
    pub fn pending_flow(&self) -> Option<PendingExternalFlow> {
        match self {
            ActionRoute::Component => None,
            ActionRoute::ExternalApp { request_code } => {
                Some(PendingExternalFlow::new(*request_code))
            }
        }
    }
}

/// Decides how each action type is delivered
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionDispatcher;

impl ActionDispatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn route(&self, action: &Action) -> ActionRoute {
        match action {
            Action::Sdk { .. } | Action::Redirect { .. } => ActionRoute::ExternalApp {
                request_code: ACTION_REQUEST_CODE,
            },
            Action::ThreeDS2 { .. }
            | Action::ThreeDS2Fingerprint { .. }
            | Action::ThreeDS2Challenge { .. }
            | Action::QrCode { .. }
            | Action::Await { .. }
            | Action::Voucher { .. } => ActionRoute::Component,
        }
    }
}
