//! JSON-RPC codecs.
//!
//! - `client`: request encoders and response decoders for v1.0 and v2.0.
//! - `server`: v2.0 server codec sharing the [`super::CodecRequest`] shape.

pub mod client;
pub mod server;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, RpcError};
use crate::ids::IdSource;

pub use client::{
    decode_client_response, decode_client_response_v1, encode_client_request,
    encode_client_request_v1,
};
pub use server::{ErrorObject, JsonRpcRequest};

pub const MIME: &str = "application/json";
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Version tag carried by every v2.0 envelope.
pub const VERSION: &str = "2.0";

/// Client protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonVersion {
    V1,
    V2,
}

impl JsonVersion {
    /// Accepts `10`, `1.0`, `v10`, `v1.0` and the `2.0` equivalents.
    /// `1.1` is recognised but has no codec.
    pub fn parse(version: &str) -> Result<Self> {
        match version {
            "10" | "1.0" | "v10" | "v1.0" => Ok(JsonVersion::V1),
            "20" | "2.0" | "v20" | "v2.0" => Ok(JsonVersion::V2),
            "11" | "1.1" | "v11" | "v1.1" => Err(RpcError::UnsupportedVersion(
                "JsonRPC 1.1 is not implemented".into(),
            )),
            _ => Err(RpcError::UnsupportedVersion(
                "JsonRPC Version not recognized".into(),
            )),
        }
    }

    pub fn encode_request<P: Serialize + ?Sized>(
        self,
        method: &str,
        params: &P,
        ids: &dyn IdSource,
    ) -> Result<Vec<u8>> {
        match self {
            JsonVersion::V1 => encode_client_request_v1(method, params, ids),
            JsonVersion::V2 => encode_client_request(method, params, ids),
        }
    }

    pub fn decode_response<R: DeserializeOwned>(self, body: &[u8]) -> Result<R> {
        match self {
            JsonVersion::V1 => decode_client_response_v1(body),
            JsonVersion::V2 => decode_client_response(body),
        }
    }
}
