//! Transport layer (HTTP).
//!
//! Exposes the RPC route handler and the codec selection that turns an HTTP
//! request into a [`httprpc_core::protocol::CodecRequest`] exactly once.

pub mod codec;
pub mod http;
