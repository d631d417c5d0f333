//! Payment methods catalogue and component kinds

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payment methods available to the shopper
///
/// Either deserialized from the host payload (standalone-action flow) or
/// provided by an established session. Read-only once obtained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethods {
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(default)]
    pub stored_payment_methods: Vec<StoredPaymentMethod>,
}

impl PaymentMethods {
    pub fn new(payment_methods: Vec<PaymentMethod>) -> Self {
        Self {
            payment_methods,
            stored_payment_methods: Vec::new(),
        }
    }

    /// Deserialize the host payload
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::InvalidPaymentMethods(
                "expected an object with a paymentMethods list".to_string(),
            ));
        }
        Self::deserialize(value).map_err(|e| ConfigError::InvalidPaymentMethods(e.to_string()))
    }

    /// Find a payment method by type (ASCII case-insensitive)
    pub fn find(&self, method_type: &str) -> Option<&PaymentMethod> {
        self.payment_methods
            .iter()
            .find(|pm| pm.method_type.eq_ignore_ascii_case(method_type))
    }

    /// Find the first payment method matching any of the given types
    pub fn find_any(&self, method_types: &[&str]) -> Option<&PaymentMethod> {
        method_types.iter().find_map(|t| self.find(t))
    }

    pub fn find_stored(&self, id: &str) -> Option<&StoredPaymentMethod> {
        self.stored_payment_methods.iter().find(|pm| pm.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.payment_methods.is_empty() && self.stored_payment_methods.is_empty()
    }
}

/// One entry of the catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(rename = "type")]
    pub method_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub brands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Value>,
    /// Method-specific fields the bridge does not interpret
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl PaymentMethod {
    pub fn new(method_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            method_type: method_type.into(),
            name: Some(name.into()),
            brands: Vec::new(),
            configuration: None,
            details: Map::new(),
        }
    }
}

/// A payment method the shopper stored earlier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPaymentMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub method_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_four: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
}

/// Device wallets that need a platform payment sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WalletKind {
    GooglePay,
    ApplePay,
}

impl WalletKind {
    /// Catalogue types that identify this wallet, in lookup order
    pub fn payment_method_types(&self) -> &'static [&'static str] {
        match self {
            WalletKind::GooglePay => &["paywithgoogle", "googlepay"],
            WalletKind::ApplePay => &["applepay"],
        }
    }

    /// Key of the wallet's configuration sub-object
    pub fn config_key(&self) -> &'static str {
        match self {
            WalletKind::GooglePay => crate::keys::GOOGLE_PAY,
            WalletKind::ApplePay => crate::keys::APPLE_PAY,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WalletKind::GooglePay => "GooglePay",
            WalletKind::ApplePay => "ApplePay",
        }
    }
}

/// Which payment UI the host asked to open
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Aggregate UI over the whole catalogue
    DropIn,
    /// Device wallet via a platform sheet
    Wallet(WalletKind),
    /// One payment method by catalogue type (`scheme`, `ideal`, `klarna`, ...)
    Single(String),
}

impl ComponentKind {
    /// Resolve the name the host passes to `open`
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "dropin" | "drop-in" => ComponentKind::DropIn,
            "googlepay" | "paywithgoogle" => ComponentKind::Wallet(WalletKind::GooglePay),
            "applepay" => ComponentKind::Wallet(WalletKind::ApplePay),
            _ => ComponentKind::Single(name.to_string()),
        }
    }

    /// Catalogue types that must be present for this component to open
    ///
    /// Drop-in needs no particular entry.
    pub fn required_method_types(&self) -> Vec<&str> {
        match self {
            ComponentKind::DropIn => Vec::new(),
            ComponentKind::Wallet(wallet) => wallet.payment_method_types().to_vec(),
            ComponentKind::Single(method_type) => vec![method_type.as_str()],
        }
    }

    /// Card-like method types configured by the `card` sub-object
    pub fn is_card_type(method_type: &str) -> bool {
        matches!(
            method_type.to_ascii_lowercase().as_str(),
            "scheme" | "bcmc" | "card"
        )
    }

    pub fn name(&self) -> &str {
        match self {
            ComponentKind::DropIn => "dropin",
            ComponentKind::Wallet(wallet) => wallet.config_key(),
            ComponentKind::Single(method_type) => method_type,
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
