#![allow(non_snake_case)]

use super::*;
use checkout_bridge_core::ErrorKind;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Submission {
    component: String,
    amount: i64,
}

#[test]
fn JsonCodec___encode_then_decode___preserves_data() {
    let codec = JsonCodec::new();
    let original = Submission {
        component: "dropin".to_string(),
        amount: 1000,
    };

    let encoded = codec.encode(&original).unwrap();
    let decoded: Submission = codec.decode(&encoded).unwrap();

    assert_eq!(original, decoded);
}

#[test]
fn JsonCodec___compact___is_single_line() {
    let codec = JsonCodec::new();

    let encoded = codec.encode_string(&json!({"a": {"b": [1, 2]}})).unwrap();

    assert!(!encoded.contains('\n'));
    assert!(!codec.is_pretty());
}

#[test]
fn JsonCodec___pretty___output_contains_newlines() {
    let codec = JsonCodec::pretty();

    let encoded = codec.encode_string(&json!({"a": 1})).unwrap();

    assert!(encoded.contains('\n'));
}

#[test]
fn JsonCodec___decode_syntax_error___is_decode_error() {
    let codec = JsonCodec::new();

    let result: Result<Submission, _> = codec.decode(b"{\"component\":");

    let err = result.unwrap_err();
    assert!(err.is_decode());
    assert!(matches!(err, CodecError::Decode(_)));
}

#[test]
fn JsonCodec___decode_wrong_shape___is_decode_error() {
    let codec = JsonCodec::new();

    let result: Result<Submission, _> = codec.decode_str(r#"{"component": 5, "amount": 1}"#);

    assert!(result.unwrap_err().is_decode());
}

#[test]
fn JsonCodec___decode_value_blank___is_null() {
    let codec = JsonCodec::new();

    assert_eq!(codec.decode_value(b"").unwrap(), serde_json::Value::Null);
    assert_eq!(codec.decode_value(b"  \n").unwrap(), serde_json::Value::Null);
    assert_eq!(codec.decode_value(b"[1]").unwrap(), json!([1]));
}

#[test]
fn JsonCodec___content_type___is_json() {
    assert_eq!(JsonCodec::new().content_type(), "application/json");
}

#[test]
fn CodecError___into_checkout_error___is_internal() {
    let err: CheckoutError = CodecError::InvalidFormat("expected object".to_string()).into();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(err.to_string(), "internal error: invalid format: expected object");
}
