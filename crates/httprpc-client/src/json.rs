//! JSON-RPC calls over [`call_raw`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use httprpc_core::protocol::jsonrpc::{JsonVersion, MIME};
use httprpc_core::{IdSource, RandomIds};

use crate::transport::call_raw;
use crate::Result;

/// JSON-RPC client bound to one endpoint.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    address: String,
    ids: Arc<dyn IdSource>,
}

impl RpcClient {
    /// Client with random correlation ids.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            address: address.into(),
            ids: Arc::new(RandomIds),
        }
    }

    /// Swap the id source, e.g. for a shared counter.
    pub fn with_ids(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    /// Reuse an existing HTTP client (connection pool, proxy settings).
    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Call `method` using JSON-RPC `version` (`"1.0"`, `"2.0"`, `"v20"`, ...).
    pub async fn call_json<P, R>(&self, version: &str, method: &str, params: &P) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let version = JsonVersion::parse(version)?;
        let body = version.encode_request(method, params, self.ids.as_ref())?;
        tracing::debug!(address = %self.address, %method, ?version, "json-rpc call");
        call_raw(&self.http, &self.address, body, MIME, |bytes| {
            version.decode_response(bytes)
        })
        .await
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
