//! httprpc core: transport-agnostic RPC codecs, error types, and id sources.
//!
//! This crate translates between raw HTTP bytes and method-call semantics for
//! JSON-RPC, REST-over-JSON and SOAP. It owns no transport and no method
//! registry: servers hand it a [`protocol::RawRequest`] and get back a
//! [`protocol::WireResponse`], clients hand it params and get back bytes.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `RpcError`/`Result` so malformed wire
//! input never takes a server down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod binding;
pub mod error;
pub mod ids;
pub mod method;
pub mod protocol;

/// Shared result type.
pub use error::{Result, RpcError};
pub use binding::{QueryBinding, RpcArgs};
pub use ids::{IdSource, RandomIds, SequentialIds};
pub use method::MethodName;
