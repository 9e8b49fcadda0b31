//! v2.0 server codec.
//!
//! Envelope fields are parsed eagerly, `params` lazily (`RawValue`) so
//! binding happens against the handler's argument type.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

use crate::binding::RpcArgs;
use crate::error::{Result, RpcError};
use crate::method::MethodName;
use crate::protocol::{RawRequest, WireResponse};

use super::{CONTENT_TYPE, VERSION};

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
pub const SERVER_ERROR: i32 = -32000;

const FALLBACK_BODY: &[u8] = br#"{"result":null,"error":{"code":-32603,"message":"response encoding failed"},"id":null,"jsonrpc":"2.0"}"#;

#[derive(Debug, Deserialize)]
struct ServerRequestWire {
    #[serde(default)]
    jsonrpc: Option<String>,
    #[serde(default)]
    method: String,
    #[serde(default)]
    params: Option<Box<RawValue>>,
    #[serde(default)]
    id: Option<Box<RawValue>>,
}

/// `{code, message}` error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ServerResponse<'a, R: Serialize> {
    result: Option<R>,
    error: Option<ErrorObject>,
    id: Option<&'a RawValue>,
    jsonrpc: &'static str,
}

#[derive(Debug)]
struct Failure {
    code: i32,
    err: RpcError,
}

/// One parsed JSON-RPC 2.0 request.
#[derive(Debug)]
pub struct JsonRpcRequest {
    method: String,
    params: Option<Box<RawValue>>,
    id: Option<Box<RawValue>>,
    failure: Option<Failure>,
}

impl JsonRpcRequest {
    pub fn parse(raw: RawRequest) -> Self {
        let wire: ServerRequestWire = match serde_json::from_slice(&raw.body) {
            Ok(w) => w,
            Err(e) => {
                return Self::failed(
                    None,
                    PARSE_ERROR,
                    RpcError::Decode(format!("parse error: {e}")),
                )
            }
        };

        if wire.jsonrpc.as_deref() != Some(VERSION) {
            return Self::failed(
                wire.id,
                INVALID_REQUEST,
                RpcError::UnsupportedVersion(format!(
                    "jsonrpc must be \"{VERSION}\", got {:?}",
                    wire.jsonrpc.unwrap_or_default()
                )),
            );
        }

        Self {
            method: wire.method,
            params: wire.params,
            id: wire.id,
            failure: None,
        }
    }

    fn failed(id: Option<Box<RawValue>>, code: i32, err: RpcError) -> Self {
        Self {
            method: String::new(),
            params: None,
            id,
            failure: Some(Failure { code, err }),
        }
    }

    pub fn method(&self) -> Result<MethodName> {
        if let Some(f) = &self.failure {
            return Err(f.err.clone());
        }
        MethodName::parse(&self.method)
    }

    /// Bind `params`: an object, a one-element array holding the object, or
    /// nothing at all (`A::default()`).
    pub fn read_request<A: RpcArgs>(&mut self) -> Result<A> {
        if let Some(f) = &self.failure {
            return Err(f.err.clone());
        }
        let Some(raw) = self.params.as_deref() else {
            return Ok(A::default());
        };

        let decoded = match serde_json::from_str::<A>(raw.get()) {
            Ok(args) => Ok(args),
            Err(direct) => match serde_json::from_str::<[Value; 1]>(raw.get()) {
                Ok([only]) => serde_json::from_value::<A>(only),
                Err(_) => Err(direct),
            },
        };

        decoded.map_err(|e| {
            let err = RpcError::Decode(format!("invalid params: {e}"));
            self.failure = Some(Failure {
                code: INVALID_PARAMS,
                err: err.clone(),
            });
            err
        })
    }

    pub fn write_response<R: Serialize>(&self, reply: &R) -> Result<WireResponse> {
        if let Some(f) = &self.failure {
            return Ok(self.write_error(&f.err));
        }
        let body = serde_json::to_vec(&ServerResponse {
            result: Some(reply),
            error: None,
            id: self.id.as_deref(),
            jsonrpc: VERSION,
        })
        .map_err(|e| RpcError::Encode(e.to_string()))?;
        Ok(finish(body))
    }

    pub fn write_handler_error(&self, message: &str) -> WireResponse {
        if let Some(f) = &self.failure {
            return self.write_error(&f.err);
        }
        self.write_failure(SERVER_ERROR, message.to_string())
    }

    /// A failure recorded while parsing or binding keeps its own code.
    pub fn write_error(&self, err: &RpcError) -> WireResponse {
        let code = self
            .failure
            .as_ref()
            .map(|f| f.code)
            .unwrap_or_else(|| error_code(err));
        self.write_failure(code, err.to_string())
    }

    fn write_failure(&self, code: i32, message: String) -> WireResponse {
        let body = serde_json::to_vec(&ServerResponse::<()> {
            result: None,
            error: Some(ErrorObject { code, message }),
            id: self.id.as_deref(),
            jsonrpc: VERSION,
        })
        .unwrap_or_else(|_| FALLBACK_BODY.to_vec());
        finish(body)
    }
}

/// Protocol errors travel with status 200 so clients see the error object.
fn finish(body: Vec<u8>) -> WireResponse {
    WireResponse {
        status: 200,
        content_type: CONTENT_TYPE,
        body,
    }
}

fn error_code(err: &RpcError) -> i32 {
    match err {
        RpcError::MethodNotFound(_) => METHOD_NOT_FOUND,
        RpcError::UnresolvableMethod(_) | RpcError::UnsupportedVersion(_) => INVALID_REQUEST,
        RpcError::Decode(_) => INVALID_PARAMS,
        RpcError::Encode(_) | RpcError::Internal(_) => INTERNAL_ERROR,
        _ => SERVER_ERROR,
    }
}
