#![allow(non_snake_case)]

use super::*;

#[test]
fn PendingExternalFlow___wallet___uses_wallet_code() {
    let flow = PendingExternalFlow::wallet();

    assert_eq!(flow.request_code(), 1001);
    assert!(flow.matches(WALLET_REQUEST_CODE));
}

#[test]
fn PendingExternalFlow___action_code___does_not_match_wallet() {
    let flow = PendingExternalFlow::new(ACTION_REQUEST_CODE);

    assert_eq!(flow.request_code(), 1002);
    assert!(!flow.matches(WALLET_REQUEST_CODE));
}

#[test]
fn PendingExternalFlow___other_code___does_not_match() {
    let flow = PendingExternalFlow::new(7);

    assert!(flow.matches(7));
    assert!(!flow.matches(8));
}
