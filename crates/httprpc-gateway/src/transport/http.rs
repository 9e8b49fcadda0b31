//! RPC route handler.
//!
//! Responsibilities:
//! - POST only; other verbs get 405
//! - pick the codec from `Content-Type`; unknown types get 415
//! - hand the request to the dispatcher and write back whatever the codec
//!   produced (status, content type, body)
//! - one tracing span per request

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::Instrument;

use httprpc_core::protocol::WireResponse;

use crate::app_state::AppState;
use crate::transport::codec::{decode, Inbound};

pub async fn rpc(
    State(app): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "POST")],
            format!("rpc: POST method required, received {method}"),
        )
            .into_response();
    }

    let mut req = match decode(&app, &uri, &headers, body) {
        Inbound::Rpc(req) => req,
        Inbound::UnsupportedMediaType(ct) => {
            tracing::warn!(content_type = %ct, path = %uri.path(), "unrecognized content type");
            return (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("rpc: unrecognized Content-Type: {ct}"),
            )
                .into_response();
        }
    };

    let span = tracing::info_span!(
        "rpc",
        protocol = req.protocol().as_str(),
        path = %uri.path(),
        method = tracing::field::Empty,
        status = tracing::field::Empty,
    );
    if let Ok(m) = req.method() {
        span.record("method", tracing::field::display(&m));
    }

    let dispatcher = app.dispatcher();
    async move {
        let res = dispatcher.dispatch(&mut req).await;
        tracing::Span::current().record("status", res.status);
        tracing::debug!("rpc handled");
        into_response(res)
    }
    .instrument(span)
    .await
}

fn into_response(res: WireResponse) -> Response {
    let status = StatusCode::from_u16(res.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, res.content_type)], res.body).into_response()
}
