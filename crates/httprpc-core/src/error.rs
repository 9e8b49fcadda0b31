//! Shared error type across httprpc crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// No usable `Port.Method` could be derived from the request.
    UnresolvableMethod,
    /// SOAP request path carried no port segment.
    MissingPort,
    /// Malformed body, or wire params that do not fit the argument shape.
    DecodeError,
    /// Reply could not be serialized.
    EncodeError,
    /// Remote peer answered with an explicit error field.
    RpcError,
    /// Remote peer answered with a non-200 status.
    RemoteError,
    /// Resolved name has no registered handler.
    MethodNotFound,
    /// Unknown or unimplemented protocol version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::UnresolvableMethod => "UNRESOLVABLE_METHOD",
            ClientCode::MissingPort => "MISSING_PORT",
            ClientCode::DecodeError => "DECODE_ERROR",
            ClientCode::EncodeError => "ENCODE_ERROR",
            ClientCode::RpcError => "RPC_ERROR",
            ClientCode::RemoteError => "REMOTE_ERROR",
            ClientCode::MethodNotFound => "METHOD_NOT_FOUND",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RpcError>;

/// Unified error type used by codecs, client and gateway.
#[derive(Debug, Clone, Error)]
pub enum RpcError {
    #[error("unresolvable method: {0}")]
    UnresolvableMethod(String),
    #[error("soap: no port: {0}")]
    MissingPort(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("encode error: {0}")]
    Encode(String),
    /// Rendered exactly as the remote error value.
    #[error("{0}")]
    Rpc(String),
    #[error("{status}: {body}")]
    Remote { status: String, body: String },
    #[error("method not found: {0}")]
    MethodNotFound(String),
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl RpcError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            RpcError::UnresolvableMethod(_) => ClientCode::UnresolvableMethod,
            RpcError::MissingPort(_) => ClientCode::MissingPort,
            RpcError::Decode(_) => ClientCode::DecodeError,
            RpcError::Encode(_) => ClientCode::EncodeError,
            RpcError::Rpc(_) => ClientCode::RpcError,
            RpcError::Remote { .. } => ClientCode::RemoteError,
            RpcError::MethodNotFound(_) => ClientCode::MethodNotFound,
            RpcError::UnsupportedVersion(_) => ClientCode::UnsupportedVersion,
            RpcError::Internal(_) => ClientCode::Internal,
        }
    }

    /// HTTP status a server codec reports this error with.
    ///
    /// Everything the caller could fix is a 400; serialization and internal
    /// failures are 500.
    pub fn http_status(&self) -> u16 {
        match self {
            RpcError::Encode(_) | RpcError::Internal(_) => 500,
            _ => 400,
        }
    }
}
