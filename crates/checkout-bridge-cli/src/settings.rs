//! Checkout settings file
//!
//! Mirrors the settings screen of a merchant app: credentials, payment
//! amount and an optional session, plus the bridge's own settings.

use anyhow::{Context, Result};
use checkout_bridge::BridgeSettings;
use checkout_bridge_core::keys;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::path::Path;

/// checkout.toml structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSettings {
    pub client_key: String,

    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default)]
    pub country_code: Option<String>,

    #[serde(default)]
    pub amount: Option<AmountSection>,

    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub return_url: Option<String>,

    #[serde(default)]
    pub session: Option<SessionSection>,

    /// Per-component sections (`dropin`, `card`, `googlepay`, `applepay`), passed through as-is
    #[serde(default)]
    pub components: Map<String, Value>,

    #[serde(default)]
    pub bridge: BridgeSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountSection {
    pub value: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSection {
    pub id: String,
    pub session_data: String,
}

fn default_environment() -> String {
    "test".to_string()
}

impl CheckoutSettings {
    /// Load settings from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read settings: {:?}", path.as_ref()))?;

        Self::from_str(&content)
    }

    /// Parse settings from string
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse settings")
    }

    /// The host configuration object handed to `open`
    pub fn to_configuration(&self) -> Value {
        let mut configuration = self.components.clone();
        configuration.insert(keys::CLIENT_KEY.to_string(), json!(self.client_key));
        configuration.insert(keys::ENVIRONMENT.to_string(), json!(self.environment));

        if let Some(country_code) = &self.country_code {
            configuration.insert(keys::COUNTRY_CODE.to_string(), json!(country_code));
        }
        if let Some(amount) = &self.amount {
            configuration.insert(
                keys::AMOUNT.to_string(),
                json!({ keys::VALUE: amount.value, keys::CURRENCY: amount.currency }),
            );
        }
        if let Some(locale) = &self.locale {
            configuration.insert(keys::LOCALE.to_string(), json!(locale));
        }
        if let Some(return_url) = &self.return_url {
            configuration.insert(keys::RETURN_URL.to_string(), json!(return_url));
        }
        if let Some(session) = &self.session {
            configuration.insert(
                keys::SESSION.to_string(),
                json!({ keys::SESSION_ID: session.id, keys::SESSION_DATA: session.session_data }),
            );
        }

        Value::Object(configuration)
    }
}
