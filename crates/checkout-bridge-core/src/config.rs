//! Host configuration parsing
//!
//! The host hands the bridge a loosely-typed JSON object on every `open`.
//! Everything in this module turns that object into typed values: unknown keys
//! are ignored and keys holding the wrong type are treated as absent.

use crate::{ComponentKind, ConfigError, Environment, WalletKind};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Configuration keys understood by the parser
pub mod keys {
    pub const ENVIRONMENT: &str = "environment";
    pub const CLIENT_KEY: &str = "clientKey";
    pub const COUNTRY_CODE: &str = "countryCode";
    pub const AMOUNT: &str = "amount";
    pub const VALUE: &str = "value";
    pub const CURRENCY: &str = "currency";
    pub const LOCALE: &str = "locale";
    pub const RETURN_URL: &str = "returnUrl";

    pub const SESSION: &str = "session";
    pub const SESSION_ID: &str = "id";
    pub const SESSION_DATA: &str = "sessionData";

    pub const DROPIN: &str = "dropin";
    pub const CARD: &str = "card";
    pub const GOOGLE_PAY: &str = "googlepay";
    pub const APPLE_PAY: &str = "applepay";
}

/// Untyped configuration object received from the host
///
/// A payload that is not a JSON object is treated as an empty configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawConfiguration {
    entries: Map<String, Value>,
}

impl RawConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(entries) => Self { entries },
            _ => Self::default(),
        }
    }

    /// Create configuration from JSON bytes
    ///
    /// Empty input yields an empty configuration.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Self::from_value(value))
    }

    /// Get a typed value, or `None` when absent or of the wrong type
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|v| T::deserialize(v).ok())
    }

    /// Get a string value
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    /// Get a boolean value, falling back to `default`
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.entries
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// Get a nested object as its own configuration
    pub fn section(&self, key: &str) -> Option<RawConfiguration> {
        match self.entries.get(key) {
            Some(Value::Object(entries)) => Some(Self {
                entries: entries.clone(),
            }),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a value (used by hosts and tests building payloads)
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }
}

impl From<Value> for RawConfiguration {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// Monetary amount in minor units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amount {
    pub value: i64,
    pub currency_code: String,
}

impl Amount {
    pub fn new(value: i64, currency_code: impl Into<String>) -> Self {
        Self {
            value,
            currency_code: currency_code.into(),
        }
    }

    /// Read `amount: {value, currency}` from a configuration object
    ///
    /// Both fields must be present with the right types, otherwise the whole
    /// amount is absent.
    pub fn parse(raw: &RawConfiguration) -> Option<Self> {
        let amount = raw.section(keys::AMOUNT)?;
        let value = amount.get::<i64>(keys::VALUE)?;
        let currency = amount.get::<String>(keys::CURRENCY)?;
        Some(Self::new(value, currency))
    }
}

/// Amount plus the shopper's country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub amount: Amount,
    pub country_code: String,
}

/// Root configuration shared by every component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootConfiguration {
    pub environment: Environment,
    pub client_key: String,
    pub country_code: Option<String>,
    pub amount: Option<Amount>,
    pub locale: Option<String>,
    /// Appended to submitted payment data so redirects come back to the app
    pub return_url: Option<String>,
}

impl RootConfiguration {
    /// Parse the root configuration
    ///
    /// Fails only when `clientKey` is missing or empty.
    pub fn parse(raw: &RawConfiguration) -> Result<Self, ConfigError> {
        let client_key = raw
            .get::<String>(keys::CLIENT_KEY)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::NoClientKey)?;

        let environment = raw
            .get_str(keys::ENVIRONMENT)
            .map(Environment::parse)
            .unwrap_or_default();

        Ok(Self {
            environment,
            client_key,
            country_code: raw.get(keys::COUNTRY_CODE),
            amount: Amount::parse(raw),
            locale: raw.get(keys::LOCALE),
            return_url: raw.get(keys::RETURN_URL),
        })
    }

    /// Amount and country code together, if both were configured
    pub fn payment(&self) -> Option<Payment> {
        Some(Payment {
            amount: self.amount.clone()?,
            country_code: self.country_code.clone()?,
        })
    }
}

/// Session configuration for the server-managed flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfiguration {
    pub session_identifier: String,
    pub initial_session_data: String,
    pub amount: Option<Amount>,
    pub country_code: Option<String>,
}

impl SessionConfiguration {
    /// Parse the session block
    ///
    /// Reads the nested `session` object when present, otherwise the root
    /// object. Returns `None` unless both `id` and `sessionData` are strings.
    pub fn parse(raw: &RawConfiguration) -> Option<Self> {
        let node = raw.section(keys::SESSION);
        let node = node.as_ref().unwrap_or(raw);

        Some(Self {
            session_identifier: node.get(keys::SESSION_ID)?,
            initial_session_data: node.get(keys::SESSION_DATA)?,
            amount: Amount::parse(node),
            country_code: node.get(keys::COUNTRY_CODE),
        })
    }

    /// Decide between standalone and session mode
    ///
    /// `Ok(None)` means no session was requested. A session that was requested
    /// (a `session` key, or a root-level `id`/`sessionData`) but is incomplete
    /// is a configuration error rather than a silent fallback.
    pub fn detect(raw: &RawConfiguration) -> Result<Option<Self>, ConfigError> {
        let requested = raw.contains_key(keys::SESSION)
            || raw.contains_key(keys::SESSION_ID)
            || raw.contains_key(keys::SESSION_DATA);
        if !requested {
            return Ok(None);
        }
        Self::parse(raw)
            .map(Some)
            .ok_or(ConfigError::MalformedSession)
    }

    /// Payment for the session, falling back to the root configuration
    pub fn payment(&self, root: &RootConfiguration) -> Option<Payment> {
        Some(Payment {
            amount: self.amount.clone().or_else(|| root.amount.clone())?,
            country_code: self
                .country_code
                .clone()
                .or_else(|| root.country_code.clone())?,
        })
    }
}

/// Options of the `dropin` sub-object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropInConfiguration {
    pub show_preselected_stored_payment_method: bool,
    pub skip_list_when_single_payment_method: bool,
    pub title: Option<String>,
}

impl DropInConfiguration {
    pub fn parse(raw: &RawConfiguration) -> Self {
        let node = raw.section(keys::DROPIN).unwrap_or_default();
        Self {
            show_preselected_stored_payment_method: node
                .get_bool("showPreselectedStoredPaymentMethod", true),
            skip_list_when_single_payment_method: node
                .get_bool("skipListWhenSinglePaymentMethod", false),
            title: node.get("title"),
        }
    }
}

impl Default for DropInConfiguration {
    fn default() -> Self {
        Self::parse(&RawConfiguration::default())
    }
}

/// Options of the `card` sub-object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConfiguration {
    pub show_store_payment_field: bool,
    pub holder_name_required: bool,
    pub hide_cvc_stored_card: bool,
    pub hide_cvc: bool,
    pub supported_card_types: Vec<String>,
}

impl CardConfiguration {
    pub fn parse(raw: &RawConfiguration) -> Self {
        let node = raw.section(keys::CARD).unwrap_or_default();
        Self {
            show_store_payment_field: node.get_bool("showStorePaymentField", true),
            holder_name_required: node.get_bool("holderNameRequired", false),
            hide_cvc_stored_card: node.get_bool("hideCvcStoredCard", false),
            hide_cvc: node.get_bool("hideCvc", false),
            supported_card_types: node.get("supported").unwrap_or_default(),
        }
    }
}

impl Default for CardConfiguration {
    fn default() -> Self {
        Self::parse(&RawConfiguration::default())
    }
}

/// Options of the `googlepay` / `applepay` sub-objects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConfiguration {
    pub merchant_account: Option<String>,
    pub merchant_identifier: Option<String>,
    pub merchant_name: Option<String>,
    pub allowed_card_networks: Vec<String>,
    pub billing_address_required: bool,
    pub total_price_status: Option<String>,
}

impl WalletConfiguration {
    pub fn parse(raw: &RawConfiguration, wallet: WalletKind) -> Self {
        let node = raw.section(wallet.config_key()).unwrap_or_default();
        Self {
            merchant_account: node.get("merchantAccount"),
            merchant_identifier: node.get("merchantID"),
            merchant_name: node.get("merchantName"),
            allowed_card_networks: node.get("allowedCardNetworks").unwrap_or_default(),
            billing_address_required: node.get_bool("billingAddressRequired", false),
            total_price_status: node.get("totalPriceStatus"),
        }
    }

    /// Check the fields the wallet cannot work without
    pub fn validate(&self, wallet: WalletKind) -> Result<(), ConfigError> {
        match wallet {
            WalletKind::ApplePay if self.merchant_identifier.is_none() => {
                Err(ConfigError::NoMerchantIdentifier(wallet.display_name()))
            }
            _ => Ok(()),
        }
    }
}

/// Per-method part of the native UI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "component", rename_all = "camelCase")]
pub enum MethodConfiguration {
    #[serde(rename_all = "camelCase")]
    DropIn {
        dropin: DropInConfiguration,
        card: CardConfiguration,
        google_pay: Option<WalletConfiguration>,
        apple_pay: Option<WalletConfiguration>,
    },
    Card(CardConfiguration),
    Wallet {
        wallet: WalletKind,
        configuration: WalletConfiguration,
    },
    #[serde(rename_all = "camelCase")]
    Instant {
        payment_method_type: String,
    },
}

/// Native UI configuration handed to the SDK when constructing a component
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentConfiguration {
    pub environment: Environment,
    pub client_key: String,
    pub payment: Option<Payment>,
    pub locale: Option<String>,
    pub session_identifier: Option<String>,
    pub method: MethodConfiguration,
    /// Process-wide appearance override, if one was registered
    pub style: Option<Value>,
}

impl ComponentConfiguration {
    /// Merge root, session, method sub-object and style into one configuration
    pub fn merge(
        root: &RootConfiguration,
        session: Option<&SessionConfiguration>,
        kind: &ComponentKind,
        raw: &RawConfiguration,
        style: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let payment = match session {
            Some(session) => session.payment(root),
            None => root.payment(),
        };

        let method = match kind {
            ComponentKind::DropIn => MethodConfiguration::DropIn {
                dropin: DropInConfiguration::parse(raw),
                card: CardConfiguration::parse(raw),
                google_pay: Self::optional_wallet(raw, WalletKind::GooglePay),
                apple_pay: Self::optional_wallet(raw, WalletKind::ApplePay),
            },
            ComponentKind::Wallet(wallet) => {
                if payment.is_none() {
                    return Err(ConfigError::NoPayment);
                }
                let configuration = WalletConfiguration::parse(raw, *wallet);
                configuration.validate(*wallet)?;
                MethodConfiguration::Wallet {
                    wallet: *wallet,
                    configuration,
                }
            }
            ComponentKind::Single(method_type) if ComponentKind::is_card_type(method_type) => {
                MethodConfiguration::Card(CardConfiguration::parse(raw))
            }
            ComponentKind::Single(method_type) => MethodConfiguration::Instant {
                payment_method_type: method_type.clone(),
            },
        };

        Ok(Self {
            environment: root.environment,
            client_key: root.client_key.clone(),
            payment,
            locale: root.locale.clone(),
            session_identifier: session.map(|s| s.session_identifier.clone()),
            method,
            style,
        })
    }

    /// Drop-in only carries a wallet configuration when it is usable
    fn optional_wallet(raw: &RawConfiguration, wallet: WalletKind) -> Option<WalletConfiguration> {
        if !raw.contains_key(wallet.config_key()) {
            return None;
        }
        let configuration = WalletConfiguration::parse(raw, wallet);
        configuration.validate(wallet).ok().map(|_| configuration)
    }
}
