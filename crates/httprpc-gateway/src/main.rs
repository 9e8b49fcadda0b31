//! httprpc gateway
//!
//! - POST {rpc_path}          : JSON-RPC 2.0 / REST-over-JSON
//! - POST {rpc_path}/{port}   : SOAP (port = last path segment)
//! - Codec chosen by Content-Type
//! - Tracing span per request
//!
//! Config path: `$HTTPRPC_CONFIG`, default `httprpc.yaml`.

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use httprpc_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::var("HTTPRPC_CONFIG").unwrap_or_else(|_| "httprpc.yaml".into());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg.gateway.listen.parse()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "httprpc-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app).await?;
    Ok(())
}
