//! Generic call transport.

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use httprpc_core::RpcError;

use crate::Result;

/// POST `body` to `address` and decode a 200 reply with `decode`.
///
/// The whole reply body is buffered before decoding. Non-200 replies fail
/// with [`RpcError::Remote`] (`"<status line>: <body>"`) and never reach the
/// decoder. No retries, no timeouts beyond what `http` is configured with.
pub async fn call_raw<T, D>(
    http: &reqwest::Client,
    address: &str,
    body: Vec<u8>,
    content_type: &str,
    decode: D,
) -> Result<T>
where
    D: FnOnce(&[u8]) -> httprpc_core::Result<T>,
{
    let res = http
        .post(address)
        .header(CONTENT_TYPE, content_type)
        .body(body)
        .send()
        .await?;

    let status = res.status();
    let bytes = res.bytes().await?;

    if status != StatusCode::OK {
        tracing::debug!(%address, %status, "rpc call answered with non-200");
        return Err(RpcError::Remote {
            status: status.to_string(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
        .into());
    }

    Ok(decode(&bytes)?)
}
