//! Call transport and JSON-RPC client against a canned HTTP server.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{body::Bytes, http::StatusCode, response::IntoResponse, routing::post, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use httprpc_client::{call_raw, ClientError, RpcClient};
use httprpc_core::SequentialIds;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Params {
    #[serde(rename = "A")]
    a: String,
    #[serde(rename = "B")]
    b: i32,
}

async fn rpc(body: Bytes) -> axum::response::Response {
    let req: Value = serde_json::from_slice(&body).unwrap();
    let id = req["id"].clone();
    match req["method"].as_str().unwrap() {
        "Echo" => {
            let params = if req.get("jsonrpc").is_some() {
                req["params"].clone()
            } else {
                req["params"][0].clone()
            };
            json!({"result": params, "error": null, "id": id, "jsonrpc": "2.0"})
                .to_string()
                .into_response()
        }
        "WillError" => format!("dksjflksjdf{}", json!({"id": id})).into_response(),
        "Fails" => json!({"result": null, "error": {"code": 7, "message": "nope"}, "id": id})
            .to_string()
            .into_response(),
        "Id" => json!({"result": id, "error": null, "id": id})
            .to_string()
            .into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn serve() -> SocketAddr {
    let app = Router::new().route("/", post(rpc));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn echo_and_garbage() {
    let addr = serve().await;
    let client = RpcClient::new(format!("http://{addr}/"));
    let params = Params {
        a: "hey".into(),
        b: 5,
    };

    let reply: Params = client.call_json("2.0", "Echo", &params).await.unwrap();
    assert_eq!(reply, params);

    let reply: Params = client.call_json("v1.0", "Echo", &params).await.unwrap();
    assert_eq!(reply, params);

    let err = client
        .call_json::<_, Params>("2.0", "WillError", &params)
        .await
        .expect_err("WillError: expected error");
    assert_eq!(err.rpc().unwrap().client_code().as_str(), "DECODE_ERROR");
}

#[tokio::test]
async fn explicit_error_field() {
    let addr = serve().await;
    let client = RpcClient::new(format!("http://{addr}/"));
    let err = client
        .call_json::<_, Params>("20", "Fails", &())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), r#"{"code":7,"message":"nope"}"#);
}

#[tokio::test]
async fn injected_ids_reach_the_wire() {
    let addr = serve().await;
    let client =
        RpcClient::new(format!("http://{addr}/")).with_ids(Arc::new(SequentialIds::starting_at(41)));
    let first: u64 = client.call_json("2.0", "Id", &()).await.unwrap();
    let second: u64 = client.call_json("2.0", "Id", &()).await.unwrap();
    assert_eq!((first, second), (41, 42));
}

#[tokio::test]
async fn unknown_version_fails_before_sending() {
    let client = RpcClient::new("http://127.0.0.1:9/");
    let err = client.call_json::<_, Value>("3.0", "Echo", &()).await.unwrap_err();
    assert_eq!(err.rpc().unwrap().client_code().as_str(), "UNSUPPORTED_VERSION");

    let err = client.call_json::<_, Value>("1.1", "Echo", &()).await.unwrap_err();
    assert_eq!(err.rpc().unwrap().client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[tokio::test]
async fn non_200_skips_the_decoder() {
    let addr = serve().await;
    let http = reqwest::Client::new();
    let body = br#"{"method":"Missing","params":null,"id":1,"jsonrpc":"2.0"}"#.to_vec();

    let err = call_raw(
        &http,
        &format!("http://{addr}/"),
        body,
        "application/json",
        |_| -> httprpc_core::Result<()> { panic!("decoder must not run on non-200") },
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "500 Internal Server Error: boom");
}

#[tokio::test]
async fn connection_failures_are_transport_errors() {
    // Bind then drop to get a port nobody listens on.
    let addr = {
        let l = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        l.local_addr().unwrap()
    };
    let client = RpcClient::new(format!("http://{addr}/"));
    let err = client.call_json::<_, Value>("2.0", "Echo", &()).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}
