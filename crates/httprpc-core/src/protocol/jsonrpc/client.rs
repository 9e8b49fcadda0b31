//! Client-side envelopes.
//!
//! Results stay as `RawValue` until the error field has been checked, so a
//! failed call never tries to bind `result`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

use crate::error::{Result, RpcError};
use crate::ids::IdSource;

use super::VERSION;

/// v2.0 call envelope.
#[derive(Debug, Serialize)]
struct ClientRequest<'a, P: ?Sized> {
    method: &'a str,
    params: &'a P,
    id: u64,
    jsonrpc: &'static str,
}

/// v1.0 call envelope: params travel as a one-element array.
#[derive(Debug, Serialize)]
struct ClientRequestV1<'a, P: ?Sized> {
    method: &'a str,
    params: [&'a P; 1],
    id: u64,
}

/// Response envelope for both versions. An absent `result` is `None`; an
/// explicit `null` is `Some(None)`. `error` treats both alike.
#[derive(Debug, Deserialize)]
struct ClientResponse {
    #[serde(default, deserialize_with = "present")]
    result: Option<Option<Box<RawValue>>>,
    #[serde(default)]
    error: Option<Value>,
}

fn present<'de, D>(de: D) -> std::result::Result<Option<Option<Box<RawValue>>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Box<RawValue>>::deserialize(de).map(Some)
}

/// Encode `{method, params, id, jsonrpc: "2.0"}`.
pub fn encode_client_request<P: Serialize + ?Sized>(
    method: &str,
    params: &P,
    ids: &dyn IdSource,
) -> Result<Vec<u8>> {
    let req = ClientRequest {
        method,
        params,
        id: ids.next_id(),
        jsonrpc: VERSION,
    };
    serde_json::to_vec(&req).map_err(|e| RpcError::Encode(e.to_string()))
}

/// Encode `{method, params: [params], id}`.
pub fn encode_client_request_v1<P: Serialize + ?Sized>(
    method: &str,
    params: &P,
    ids: &dyn IdSource,
) -> Result<Vec<u8>> {
    let req = ClientRequestV1 {
        method,
        params: [params],
        id: ids.next_id(),
    };
    serde_json::to_vec(&req).map_err(|e| RpcError::Encode(e.to_string()))
}

/// Decode a v2.0 response onto `R`.
///
/// A non-null `error` wins and becomes [`RpcError::Rpc`]. Otherwise `result`
/// is bound. An absent `result` is a decode error; an explicit `null` only
/// succeeds if `R` accepts it.
pub fn decode_client_response<R: DeserializeOwned>(body: &[u8]) -> Result<R> {
    let res: ClientResponse = serde_json::from_slice(body)
        .map_err(|e| RpcError::Decode(format!("invalid response envelope: {e}")))?;

    if let Some(err) = res.error {
        return Err(RpcError::Rpc(render_error(&err)));
    }

    match res.result {
        None => Err(RpcError::Decode("missing result".into())),
        Some(Some(raw)) => serde_json::from_str(raw.get())
            .map_err(|e| RpcError::Decode(format!("invalid result: {e}"))),
        Some(None) => serde_json::from_str("null")
            .map_err(|_| RpcError::Decode("result is null".into())),
    }
}

/// Decode a v1.0 response. A null result is an error in v1.0.
pub fn decode_client_response_v1<R: DeserializeOwned>(body: &[u8]) -> Result<R> {
    let res: ClientResponse = serde_json::from_slice(body)
        .map_err(|e| RpcError::Decode(format!("invalid response envelope: {e}")))?;

    if let Some(err) = res.error {
        return Err(RpcError::Rpc(render_error(&err)));
    }

    let raw = match res.result {
        None => return Err(RpcError::Decode("missing result".into())),
        Some(None) => return Err(RpcError::Decode("result is null".into())),
        Some(Some(raw)) => raw,
    };
    serde_json::from_str(raw.get()).map_err(|e| RpcError::Decode(format!("invalid result: {e}")))
}

/// Strings render bare; every other JSON value renders as JSON text.
fn render_error(err: &Value) -> String {
    match err {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    #[test]
    fn v2_envelope_shape() {
        let ids = SequentialIds::starting_at(42);
        let buf = encode_client_request("Echo.Echo", &vec![1, 2], &ids).unwrap();
        assert_eq!(
            std::str::from_utf8(&buf).unwrap(),
            r#"{"method":"Echo.Echo","params":[1,2],"id":42,"jsonrpc":"2.0"}"#
        );
    }

    #[test]
    fn v1_envelope_wraps_params() {
        let ids = SequentialIds::starting_at(1);
        let buf = encode_client_request_v1("HelloService.Say", &"kevin", &ids).unwrap();
        assert_eq!(
            std::str::from_utf8(&buf).unwrap(),
            r#"{"method":"HelloService.Say","params":["kevin"],"id":1}"#
        );
    }

    #[test]
    fn error_renderings() {
        assert_eq!(render_error(&Value::from("boom")), "boom");
        assert_eq!(render_error(&Value::from(5)), "5");
        assert_eq!(
            render_error(&serde_json::json!({"code": -32000, "message": "boom"})),
            r#"{"code":-32000,"message":"boom"}"#
        );
    }

    #[test]
    fn v2_absent_result_is_a_decode_error() {
        let err = decode_client_response::<Option<i32>>(br#"{"error":null,"id":1,"jsonrpc":"2.0"}"#)
            .unwrap_err();
        assert_eq!(err.client_code().as_str(), "DECODE_ERROR");

        let err = decode_client_response::<Value>(br#"{"id":1}"#).unwrap_err();
        assert_eq!(err.client_code().as_str(), "DECODE_ERROR");
    }

    #[test]
    fn v2_explicit_null_result_binds_when_accepted() {
        let none: Option<i32> =
            decode_client_response(br#"{"result":null,"error":null,"id":1}"#).unwrap();
        assert_eq!(none, None);

        let err = decode_client_response::<i32>(br#"{"result":null,"error":null,"id":1}"#)
            .unwrap_err();
        assert_eq!(err.client_code().as_str(), "DECODE_ERROR");
    }

    #[test]
    fn v1_null_result_is_an_error() {
        let err = decode_client_response_v1::<i32>(br#"{"result":null,"error":null,"id":1}"#)
            .unwrap_err();
        assert_eq!(err.client_code().as_str(), "DECODE_ERROR");
    }
}
