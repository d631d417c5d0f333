//! Panic containment at the host module boundary
//!
//! A panic inside a bridge operation must never unwind into the host
//! runtime. The guard converts it into [`CheckoutError::Internal`]; the
//! caller is responsible for forcing the bridge back to `Idle`.

use checkout_bridge_core::{CheckoutError, CheckoutResult};
use checkout_bridge_runtime::panic_message;
use std::panic;
use std::sync::Once;

static HOOK: Once = Once::new();

/// Run `f`, converting a panic into an internal error
///
/// # Example
///
/// ```ignore
/// let result = catch_panic("hide", || bridge.hide(true, None));
/// ```
pub fn catch_panic<F, R>(operation: &str, f: F) -> CheckoutResult<R>
where
    F: FnOnce() -> R + panic::UnwindSafe,
{
    panic::catch_unwind(f).map_err(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::error!(operation, panic = %message, "bridge operation panicked");
        CheckoutError::Internal(format!("{operation} panicked: {message}"))
    })
}

/// Install a panic hook that reports panics through tracing
///
/// Only the first call installs the hook; it replaces any hook set before.
pub fn install_panic_hook() {
    HOOK.call_once(|| {
        panic::set_hook(Box::new(|info| {
            let message = panic_message(info.payload());
            match info.location() {
                Some(location) => tracing::error!(
                    file = location.file(),
                    line = location.line(),
                    "PANIC: {message}"
                ),
                None => tracing::error!("PANIC: {message}"),
            }
        }));
    });
}
