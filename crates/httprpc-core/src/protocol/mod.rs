//! Protocol codecs (JSON-RPC, REST-over-JSON, SOAP).
//!
//! Every server codec has the same shape: parse the request once, expose the
//! resolved `Port.Method`, bind the wire params onto a typed argument, then
//! encode a reply or a failure in the protocol's envelope. The shape is a
//! tagged variant ([`CodecRequest`]) selected by content type at the HTTP
//! boundary; the codecs never call each other.
//!
//! All parsers are panic-free: malformed input is reported as `RpcError` and
//! sticks to the request, so a handler is never invoked after a failed
//! parse or bind.

pub mod jsonrpc;
pub mod rest;
pub mod soap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::binding::{QueryBinding, RpcArgs};
use crate::error::{Result, RpcError};
use crate::method::MethodName;

/// Wire protocol, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    JsonRpc,
    Rest,
    Soap,
}

/// Bare, lower-cased MIME type of a `Content-Type` value (parameters
/// stripped).
pub fn mime_of(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::JsonRpc => "jsonrpc",
            Protocol::Rest => "rest",
            Protocol::Soap => "soap",
        }
    }

    /// Default MIME type served under this protocol.
    pub fn mime(self) -> &'static str {
        match self {
            Protocol::JsonRpc => jsonrpc::MIME,
            Protocol::Rest => rest::MIME,
            Protocol::Soap => soap::MIME,
        }
    }

    /// Parse one inbound request. Never fails: problems are kept on the
    /// request and surface from [`CodecRequest::method`].
    pub fn new_request(self, raw: RawRequest) -> CodecRequest {
        match self {
            Protocol::JsonRpc => CodecRequest::JsonRpc(jsonrpc::JsonRpcRequest::parse(raw)),
            Protocol::Rest => CodecRequest::Rest(rest::RestRequest::parse(raw)),
            Protocol::Soap => CodecRequest::Soap(soap::SoapRequest::parse(raw)),
        }
    }
}

/// The parts of an HTTP request a server codec consumes.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    /// URL path, e.g. `/rpc/Service1`.
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
    pub body: Bytes,
}

impl RawRequest {
    pub fn new(path: impl Into<String>, query: Option<&str>, body: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            query: query.map(str::to_string),
            body: body.into(),
        }
    }
}

/// Encoded reply ready for the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl WireResponse {
    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or_default()
    }
}

/// Per-request codec state. Owned by the task serving that request.
#[derive(Debug)]
pub enum CodecRequest {
    JsonRpc(jsonrpc::JsonRpcRequest),
    Rest(rest::RestRequest),
    Soap(soap::SoapRequest),
}

impl CodecRequest {
    pub fn protocol(&self) -> Protocol {
        match self {
            CodecRequest::JsonRpc(_) => Protocol::JsonRpc,
            CodecRequest::Rest(_) => Protocol::Rest,
            CodecRequest::Soap(_) => Protocol::Soap,
        }
    }

    /// Resolved `Port.Method`, or the parse error recorded for this request.
    pub fn method(&self) -> Result<MethodName> {
        match self {
            CodecRequest::JsonRpc(r) => r.method(),
            CodecRequest::Rest(r) => r.method(),
            CodecRequest::Soap(r) => r.method(),
        }
    }

    /// Bind wire params onto `A`. `binding` is only consulted by REST.
    pub fn read_request<A: RpcArgs>(&mut self, binding: &QueryBinding<A>) -> Result<A> {
        match self {
            CodecRequest::JsonRpc(r) => r.read_request(),
            CodecRequest::Rest(r) => r.read_request(binding),
            CodecRequest::Soap(r) => r.read_request(),
        }
    }

    /// Encode a successful reply.
    pub fn write_response<R: Serialize>(&self, reply: &R) -> Result<WireResponse> {
        match self {
            CodecRequest::JsonRpc(r) => r.write_response(reply),
            CodecRequest::Rest(r) => r.write_response(reply),
            CodecRequest::Soap(r) => r.write_response(reply),
        }
    }

    /// Encode a handler failure in the protocol's native error shape.
    pub fn write_handler_error(&self, message: &str) -> WireResponse {
        match self {
            CodecRequest::JsonRpc(r) => r.write_handler_error(message),
            CodecRequest::Rest(r) => r.write_handler_error(message),
            CodecRequest::Soap(r) => r.write_handler_error(message),
        }
    }

    /// Encode a request-level failure (resolution, binding, lookup).
    pub fn write_error(&self, err: &RpcError) -> WireResponse {
        match self {
            CodecRequest::JsonRpc(r) => r.write_error(err),
            CodecRequest::Rest(r) => r.write_error(err),
            CodecRequest::Soap(r) => r.write_error(err),
        }
    }

    /// Encode the outcome of a handler call. A reply that fails to serialize
    /// is reported as a request-level encode error.
    pub fn write_outcome<R: Serialize>(
        &self,
        outcome: std::result::Result<R, String>,
    ) -> WireResponse {
        match outcome {
            Ok(reply) => self
                .write_response(&reply)
                .unwrap_or_else(|e| self.write_error(&e)),
            Err(message) => self.write_handler_error(&message),
        }
    }
}
