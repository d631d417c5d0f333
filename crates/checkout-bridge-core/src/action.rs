//! Server-issued actions delivered by the host

use crate::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Instruction the active component must complete before the payment finalizes
///
/// Tagged by the `type` field of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    #[serde(rename = "redirect", rename_all = "camelCase")]
    Redirect {
        url: String,
        #[serde(default)]
        method: Option<String>,
        #[serde(default)]
        payment_method_type: Option<String>,
        #[serde(default)]
        payment_data: Option<String>,
        #[serde(default)]
        data: Option<Value>,
    },
    #[serde(rename = "threeDS2", rename_all = "camelCase")]
    ThreeDS2 {
        token: String,
        #[serde(default)]
        subtype: Option<String>,
        #[serde(default)]
        authorisation_token: Option<String>,
        #[serde(default)]
        payment_method_type: Option<String>,
        #[serde(default)]
        payment_data: Option<String>,
    },
    #[serde(rename = "threeDS2Fingerprint", rename_all = "camelCase")]
    ThreeDS2Fingerprint {
        token: String,
        #[serde(default)]
        payment_method_type: Option<String>,
        #[serde(default)]
        payment_data: Option<String>,
    },
    #[serde(rename = "threeDS2Challenge", rename_all = "camelCase")]
    ThreeDS2Challenge {
        token: String,
        #[serde(default)]
        payment_method_type: Option<String>,
        #[serde(default)]
        payment_data: Option<String>,
    },
    /// Hand-off to a third-party SDK or app (e.g. a banking app)
    #[serde(rename = "sdk", rename_all = "camelCase")]
    Sdk {
        payment_method_type: String,
        #[serde(default)]
        sdk_data: Option<Value>,
        #[serde(default)]
        payment_data: Option<String>,
    },
    #[serde(rename = "qrCode", rename_all = "camelCase")]
    QrCode {
        qr_code_data: String,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        payment_method_type: Option<String>,
        #[serde(default)]
        payment_data: Option<String>,
    },
    #[serde(rename = "await", rename_all = "camelCase")]
    Await {
        payment_method_type: String,
        #[serde(default)]
        payment_data: Option<String>,
    },
    #[serde(rename = "voucher", rename_all = "camelCase")]
    Voucher {
        payment_method_type: String,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        payment_data: Option<String>,
    },
}

impl Action {
    /// Value of the `type` tag
    pub fn type_name(&self) -> &'static str {
        match self {
            Action::Redirect { .. } => "redirect",
            Action::ThreeDS2 { .. } => "threeDS2",
            Action::ThreeDS2Fingerprint { .. } => "threeDS2Fingerprint",
            Action::ThreeDS2Challenge { .. } => "threeDS2Challenge",
            Action::Sdk { .. } => "sdk",
            Action::QrCode { .. } => "qrCode",
            Action::Await { .. } => "await",
            Action::Voucher { .. } => "voucher",
        }
    }

    pub fn payment_method_type(&self) -> Option<&str> {
        match self {
            Action::Redirect {
                payment_method_type,
                ..
            }
            | Action::ThreeDS2 {
                payment_method_type,
                ..
            }
            | Action::ThreeDS2Fingerprint {
                payment_method_type,
                ..
            }
            | Action::ThreeDS2Challenge {
                payment_method_type,
                ..
            }
            | Action::QrCode {
                payment_method_type,
                ..
            } => payment_method_type.as_deref(),
            Action::Sdk {
                payment_method_type,
                ..
            }
            | Action::Await {
                payment_method_type,
                ..
            }
            | Action::Voucher {
                payment_method_type,
                ..
            } => Some(payment_method_type.as_str()),
        }
    }
}

/// Deserialize a host-supplied action payload
///
/// Every failure, including a missing or unknown `type`, becomes
/// [`CheckoutError::InvalidAction`].
pub fn deserialize_action(payload: &Value) -> CheckoutResult<Action> {
    let Some(object) = payload.as_object() else {
        return Err(CheckoutError::InvalidAction(
            "action payload must be an object".to_string(),
        ));
    };
    match object.get("type") {
        Some(Value::String(_)) => {}
        Some(_) => {
            return Err(CheckoutError::InvalidAction(
                "action type must be a string".to_string(),
            ));
        }
        None => {
            return Err(CheckoutError::InvalidAction(
                "action payload has no type".to_string(),
            ));
        }
    }
    Action::deserialize(payload).map_err(|e| CheckoutError::InvalidAction(e.to_string()))
}
