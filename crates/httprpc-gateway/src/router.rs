//! Axum router wiring.
//!
//! `{rpc_path}` serves JSON-RPC and REST; `{rpc_path}/{port}` additionally
//! carries the SOAP port. Both go through the same handler.

use axum::{extract::DefaultBodyLimit, routing::any, Router};

use crate::{app_state::AppState, transport};

pub fn build_router(state: AppState) -> Router {
    let gw = &state.cfg().gateway;
    let base = gw.rpc_path.clone();
    let limit = gw.max_body_bytes;

    Router::new()
        .route(&base, any(transport::http::rpc))
        .route(&format!("{base}/*port"), any(transport::http::rpc))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}
