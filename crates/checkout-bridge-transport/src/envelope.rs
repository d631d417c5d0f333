//! Host call and event envelopes
//!
//! Host calls arrive as JSON objects tagged by `method`. Events leave as
//! single-key objects named after the host event (`{"didSubmit": {...}}`).

use crate::CodecError;
use checkout_bridge_core::{CheckoutError, CheckoutEvent, ErrorKind, ErrorPayload};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeMap};
use serde_json::{Map, Value};

/// Call received from the host runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum HostCall {
    /// Open a component by name with its configuration
    #[serde(rename_all = "camelCase")]
    Open {
        component: String,
        /// Required unless the configuration contains a session
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payment_methods: Option<Value>,
        #[serde(default)]
        configuration: Value,
    },

    /// Dismiss the active component
    Hide {
        #[serde(default)]
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<Value>,
    },

    /// Forward a server action to the active component
    Handle { action: Value },

    /// Result of an external app or platform sheet
    #[serde(rename_all = "camelCase")]
    ActivityResult {
        request_code: i32,
        result_code: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
}

impl HostCall {
    pub fn method(&self) -> &'static str {
        match self {
            HostCall::Open { .. } => "open",
            HostCall::Hide { .. } => "hide",
            HostCall::Handle { .. } => "handle",
            HostCall::ActivityResult { .. } => "activityResult",
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(self).map_err(|e| CodecError::Encode(e.to_string()))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CodecError> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// Event as it crosses to the host
///
/// `DidComplete` carries `null`; every other event carries its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EventEnvelope {
    pub event: CheckoutEvent,
}

impl EventEnvelope {
    pub fn new(event: CheckoutEvent) -> Self {
        Self { event }
    }

    pub fn name(&self) -> &'static str {
        self.event.name()
    }

    /// Payload value carried under the event name
    pub fn body(&self) -> Value {
        match &self.event {
            CheckoutEvent::DidSubmit(data) | CheckoutEvent::DidProvide(data) => data.clone(),
            CheckoutEvent::DidComplete => Value::Null,
            CheckoutEvent::DidFail(payload) => {
                serde_json::to_value(payload).unwrap_or(Value::Null)
            }
        }
    }

    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(self.name().to_string(), self.body());
        Value::Object(object)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(self).map_err(|e| CodecError::Encode(e.to_string()))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CodecError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Rebuild an event from its wire form
    pub fn from_value(value: &Value) -> Result<Self, CodecError> {
        let object = value
            .as_object()
            .ok_or_else(|| CodecError::InvalidFormat("event must be an object".to_string()))?;
        let mut entries = object.iter();
        let (name, body) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(CodecError::InvalidFormat(format!(
                    "event must have exactly one key, got {}",
                    object.len()
                )));
            }
        };

        let event = match name.as_str() {
            "didSubmit" => CheckoutEvent::DidSubmit(body.clone()),
            "didProvide" => CheckoutEvent::DidProvide(body.clone()),
            "didComplete" => CheckoutEvent::DidComplete,
            "didFail" => CheckoutEvent::DidFail(
                ErrorPayload::deserialize(body).map_err(|e| CodecError::Decode(e.to_string()))?,
            ),
            other => {
                return Err(CodecError::InvalidFormat(format!(
                    "unknown event: {other}"
                )));
            }
        };
        Ok(Self { event })
    }
}

impl From<CheckoutEvent> for EventEnvelope {
    fn from(event: CheckoutEvent) -> Self {
        Self::new(event)
    }
}

impl Serialize for EventEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match &self.event {
            CheckoutEvent::DidSubmit(data) | CheckoutEvent::DidProvide(data) => {
                map.serialize_entry(self.name(), data)?
            }
            CheckoutEvent::DidComplete => map.serialize_entry(self.name(), &Value::Null)?,
            CheckoutEvent::DidFail(payload) => map.serialize_entry(self.name(), payload)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EventEnvelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(de::Error::custom)
    }
}

/// Whether the bridge accepted a host call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Accepted,
    Rejected,
}

/// Synchronous acknowledgement of a host call
///
/// Payment outcomes are never carried here; they arrive as events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResponse {
    pub status: CallStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Identifier the bridge assigned to the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<u64>,
}

impl CallResponse {
    pub fn accepted() -> Self {
        Self {
            status: CallStatus::Accepted,
            error_code: None,
            error_message: None,
            call_id: None,
        }
    }

    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: CallStatus::Rejected,
            error_code: Some(code.into()),
            error_message: Some(message.into()),
            call_id: None,
        }
    }

    pub fn from_error(err: &CheckoutError) -> Self {
        Self::rejected(err.error_code(), err.to_string())
    }

    pub fn with_call_id(mut self, id: u64) -> Self {
        self.call_id = Some(id);
        self
    }

    pub fn is_accepted(&self) -> bool {
        self.status == CallStatus::Accepted
    }

    /// Error class of a rejected call, recovered from its error code
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_code.as_deref().map(ErrorKind::from_code)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(self).map_err(|e| CodecError::Encode(e.to_string()))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CodecError> {
        Ok(serde_json::from_slice(data)?)
    }
}

impl Default for CallResponse {
    fn default() -> Self {
        Self::accepted()
    }
}
