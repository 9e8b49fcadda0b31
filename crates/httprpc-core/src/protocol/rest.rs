//! REST-over-JSON server codec.
//!
//! Addressing lives in the query string: `_rest_method` names the method and
//! `id` is echoed back. Params come from an optional JSON body, then from the
//! remaining query fields declared by the argument's [`QueryBinding`]. The
//! query layer runs last, so it overrides body fields of the same name.

use serde::Serialize;
use serde_json::Value;

use crate::binding::{QueryBinding, RpcArgs};
use crate::error::{Result, RpcError};
use crate::method::MethodName;

use super::{RawRequest, WireResponse};

pub const MIME: &str = "application/rest+json";
pub const CONTENT_TYPE: &str = "application/rest+json; charset=utf-8";

/// Query field carrying the dotted method name.
pub const METHOD_FIELD: &str = "_rest_method";
/// Query field carrying the correlation id.
pub const ID_FIELD: &str = "id";

const FALLBACK_BODY: &[u8] = br#"{"result":null,"error":"internal: response encoding failed","id":""}"#;

/// Response envelope. `result` and `error` are always present; exactly one
/// of them is non-null.
#[derive(Debug, Serialize)]
struct ServerResponse<'a, R: Serialize> {
    result: Option<R>,
    error: Option<&'a str>,
    id: &'a Value,
}

/// One parsed REST request.
#[derive(Debug)]
pub struct RestRequest {
    method: Option<String>,
    params: Vec<(String, String)>,
    id: Value,
    body: bytes::Bytes,
    err: Option<RpcError>,
}

impl RestRequest {
    pub fn parse(raw: RawRequest) -> Self {
        let params: Vec<(String, String)> = raw
            .query
            .as_deref()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();

        let method = first_value(&params, METHOD_FIELD).map(str::to_string);
        let id = echo_id(first_value(&params, ID_FIELD));

        Self {
            method,
            params,
            id,
            body: raw.body,
            err: None,
        }
    }

    /// Resolved method name. A recorded binding failure wins over the name.
    pub fn method(&self) -> Result<MethodName> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        match self.method.as_deref() {
            Some(m) if !m.is_empty() => MethodName::parse(m),
            _ => Err(RpcError::UnresolvableMethod(format!(
                "missing {METHOD_FIELD} query field"
            ))),
        }
    }

    /// Correlation id echoed in every response.
    pub fn id(&self) -> &Value {
        &self.id
    }

    /// Bind the JSON body (if any), then the declared query fields.
    ///
    /// Unmatched query fields are ignored. A structurally invalid body is the
    /// only hard failure; it is recorded and short-circuits later writes.
    pub fn read_request<A: RpcArgs>(&mut self, binding: &QueryBinding<A>) -> Result<A> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }

        let mut args = A::default();
        if !self.body.is_empty() {
            match serde_json::from_slice::<A>(&self.body) {
                Ok(decoded) => args = decoded,
                Err(e) => {
                    tracing::debug!(error = %e, "rest: body is not valid json for args");
                    let err = RpcError::Decode(format!("invalid json body: {e}"));
                    self.err = Some(err.clone());
                    return Err(err);
                }
            }
        }

        let query = self
            .params
            .iter()
            .filter(|(k, _)| k != METHOD_FIELD && k != ID_FIELD)
            .map(|(k, v)| (k.as_str(), v.as_str()));
        let bound = binding.apply(&mut args, query);
        tracing::trace!(bound, "rest: query fields bound");

        Ok(args)
    }

    /// `{"result": reply, "error": null, "id": id}`.
    pub fn write_response<R: Serialize>(&self, reply: &R) -> Result<WireResponse> {
        if let Some(err) = &self.err {
            return Ok(self.write_error(err));
        }
        let body = serde_json::to_vec(&ServerResponse {
            result: Some(reply),
            error: None,
            id: &self.id,
        })
        .map_err(|e| RpcError::Encode(e.to_string()))?;
        Ok(self.finish(200, body))
    }

    /// `{"result": null, "error": message, "id": id}` with status 200.
    pub fn write_handler_error(&self, message: &str) -> WireResponse {
        if let Some(err) = &self.err {
            return self.write_error(err);
        }
        self.write_failure(200, message)
    }

    /// Request-level failure: same shape as a handler error, non-200 status.
    pub fn write_error(&self, err: &RpcError) -> WireResponse {
        self.write_failure(err.http_status(), &err.to_string())
    }

    fn write_failure(&self, status: u16, message: &str) -> WireResponse {
        let body = serde_json::to_vec(&ServerResponse::<()> {
            result: None,
            error: Some(message),
            id: &self.id,
        })
        .unwrap_or_else(|_| FALLBACK_BODY.to_vec());
        self.finish(status, body)
    }

    fn finish(&self, status: u16, mut body: Vec<u8>) -> WireResponse {
        body.push(b'\n');
        WireResponse {
            status,
            content_type: CONTENT_TYPE,
            body,
        }
    }
}

fn first_value<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Ids that already are JSON (`5`, `"abc"`) are echoed verbatim; anything
/// else becomes a JSON string. Absent ids become `""`, never `null`.
fn echo_id(raw: Option<&str>) -> Value {
    match raw {
        None | Some("") => Value::String(String::new()),
        Some(s) => serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn id_echo_rules() {
        assert_eq!(echo_id(None), Value::String(String::new()));
        assert_eq!(echo_id(Some("")), Value::String(String::new()));
        assert_eq!(echo_id(Some("7")), Value::from(7));
        assert_eq!(echo_id(Some(r#""abc""#)), Value::from("abc"));
        assert_eq!(echo_id(Some("abc")), Value::from("abc"));
    }

    #[test]
    fn query_is_percent_decoded() {
        let req = RestRequest::parse(RawRequest::new(
            "/rpc",
            Some("_rest_method=Echo.Echo&A=hello%20world&A=ignored"),
            bytes::Bytes::new(),
        ));
        assert_eq!(req.method().unwrap().to_string(), "Echo.Echo");
        assert_eq!(first_value(&req.params, "A"), Some("hello world"));
    }
}
