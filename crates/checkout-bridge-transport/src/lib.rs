//! checkout-bridge-transport - Wire formats between the host runtime and the bridge
//!
//! This crate provides:
//! - [`Codec`] trait and the [`JsonCodec`] implementation
//! - [`HostCall`] for calls arriving from the host
//! - [`EventEnvelope`] for events sent back to the host
//! - [`CallResponse`] for synchronous call acknowledgements

mod codec;
mod envelope;

pub use codec::{Codec, CodecError, JsonCodec};
pub use envelope::{CallResponse, CallStatus, EventEnvelope, HostCall};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CallResponse, CallStatus, Codec, CodecError, EventEnvelope, HostCall, JsonCodec,
    };
}
