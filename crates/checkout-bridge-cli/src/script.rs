//! Scripted shopper and host steps for `checkout-bridge run`

use anyhow::{Result, bail};
use checkout_bridge::core::{SdkError, SdkOrigin};
use checkout_bridge::sandbox::SandboxSdk;
use checkout_bridge::{ACTION_REQUEST_CODE, CheckoutModule};
use serde_json::{Value, json};
use std::str::FromStr;

/// One step of a scripted checkout
///
/// Shopper steps (`submit`, `complete`, ...) are delivered through the
/// sandbox SDK; host steps (`hide`, `redirect`, ...) go through the module.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Submit,
    Provide,
    Complete,
    Cancel,
    Fail(String),
    Hide,
    Redirect,
    ThreeDs,
    Result(i32),
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, argument) = match s.split_once(':') {
            Some((name, argument)) => (name, Some(argument)),
            None => (s, None),
        };

        let step = match (name, argument) {
            ("submit", None) => Step::Submit,
            ("provide", None) => Step::Provide,
            ("complete", None) => Step::Complete,
            ("cancel", None) => Step::Cancel,
            ("fail", None) => Step::Fail("Payment declined.".to_string()),
            ("fail", Some(message)) if !message.is_empty() => Step::Fail(message.to_string()),
            ("hide", None) => Step::Hide,
            ("redirect", None) => Step::Redirect,
            ("threeds", None) => Step::ThreeDs,
            ("result", Some(code)) => match code.parse() {
                Ok(code) => Step::Result(code),
                Err(_) => bail!("Invalid result code in step '{s}'"),
            },
            _ => bail!("Unknown step '{s}'"),
        };
        Ok(step)
    }
}

impl Step {
    /// The server action a host step forwards, if any
    pub fn action(&self) -> Option<Value> {
        match self {
            Step::Redirect => Some(json!({
                "type": "redirect",
                "url": "https://checkoutshopper-test.example.com/redirect",
                "method": "GET",
                "paymentMethodType": "ideal",
            })),
            Step::ThreeDs => Some(json!({
                "type": "threeDS2",
                "token": "sandbox-token",
                "subtype": "fingerprint",
                "paymentMethodType": "scheme",
            })),
            _ => None,
        }
    }

    /// Run the step, returning a short description of what happened
    pub fn apply(&self, module: &CheckoutModule, sdk: &SandboxSdk) -> String {
        match self {
            Step::Submit => delivered(
                "submit",
                sdk.submit(json!({"paymentMethod": {"type": "scheme"}})),
            ),
            Step::Provide => delivered(
                "provide",
                sdk.provide(json!({"details": {"threeDSResult": "sandbox"}})),
            ),
            Step::Complete => delivered("complete", sdk.complete()),
            Step::Cancel => delivered("cancel", sdk.cancel()),
            Step::Fail(message) => delivered(
                "fail",
                sdk.fail(SdkError::new(SdkOrigin::Component, "sandbox", message.clone())),
            ),
            Step::Hide => response("hide", module.hide(false, None).is_accepted()),
            Step::Redirect | Step::ThreeDs => match self.action() {
                Some(action) => response("handle", module.handle(&action).is_accepted()),
                None => "handle: no action".to_string(),
            },
            Step::Result(result_code) => {
                let matched = module.handle_activity_result(ACTION_REQUEST_CODE, *result_code, None);
                format!("result {result_code}: {}", if matched { "rejoined" } else { "ignored" })
            }
        }
    }
}

fn delivered(step: &str, delivered: bool) -> String {
    if delivered {
        format!("{step}: delivered")
    } else {
        format!("{step}: no component")
    }
}

fn response(step: &str, accepted: bool) -> String {
    if accepted {
        format!("{step}: accepted")
    } else {
        format!("{step}: rejected")
    }
}
