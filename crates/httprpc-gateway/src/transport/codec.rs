//! Decode-once codec selection.
//!
//! - `Content-Type` picks the protocol from the configured table
//! - path, query and buffered body become a `RawRequest`
//! - the protocol parses it into a per-request `CodecRequest`

use axum::http::{header::CONTENT_TYPE, HeaderMap, Uri};
use bytes::Bytes;

use httprpc_core::protocol::{CodecRequest, RawRequest};

use crate::app_state::AppState;

#[derive(Debug)]
pub enum Inbound {
    Rpc(CodecRequest),
    /// Content type not in the codec table (carries the offending value).
    UnsupportedMediaType(String),
}

pub fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

pub fn decode(app: &AppState, uri: &Uri, headers: &HeaderMap, body: Bytes) -> Inbound {
    let ct = content_type(headers);
    let Some(protocol) = app.codec_for(ct) else {
        return Inbound::UnsupportedMediaType(ct.to_string());
    };
    Inbound::Rpc(protocol.new_request(raw_request(uri, body)))
}

pub fn raw_request(uri: &Uri, body: Bytes) -> RawRequest {
    RawRequest {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body,
    }
}

