//! httprpc gateway library entry.
//!
//! This crate wires the HTTP transport, content-type codec selection, method
//! dispatcher and built-in services into a small RPC server. It is intended
//! to be consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod router;
pub mod services;
pub mod transport;
