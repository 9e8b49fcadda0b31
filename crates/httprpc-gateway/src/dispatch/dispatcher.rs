use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;

use httprpc_core::error::{Result, RpcError};
use httprpc_core::protocol::{CodecRequest, WireResponse};
use httprpc_core::{MethodName, QueryBinding, RpcArgs};

/// One registered method: binds its own arguments and writes its own reply
/// through the request's codec.
#[async_trait]
pub trait MethodHandler: Send + Sync {
    async fn call(&self, req: &mut CodecRequest) -> WireResponse;
}

/// Adapts an async fn `A -> Result<R, E>` to [`MethodHandler`]. The REST
/// query binding for `A` is built once, here.
struct TypedHandler<A, F> {
    f: F,
    binding: QueryBinding<A>,
}

#[async_trait]
impl<A, R, E, F, Fut> MethodHandler for TypedHandler<A, F>
where
    A: RpcArgs,
    R: Serialize + Send + 'static,
    E: Display + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
{
    async fn call(&self, req: &mut CodecRequest) -> WireResponse {
        let args = match req.read_request(&self.binding) {
            Ok(args) => args,
            Err(e) => {
                tracing::warn!(error = %e, "argument binding failed");
                return req.write_error(&e);
            }
        };

        let outcome = (self.f)(args).await.map_err(|e| e.to_string());
        if let Err(msg) = &outcome {
            tracing::debug!(error = %msg, "handler returned error");
        }
        req.write_outcome(outcome)
    }
}

/// Registry of `Port.Method` handlers.
#[derive(Default)]
pub struct Dispatcher {
    methods: DashMap<String, Arc<dyn MethodHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            methods: DashMap::new(),
        }
    }

    /// Register an async fn under a dotted `Port.Method` name.
    pub fn register<A, R, E, F, Fut>(&self, name: &str, f: F) -> Result<()>
    where
        A: RpcArgs,
        R: Serialize + Send + 'static,
        E: Display + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
    {
        let name = MethodName::parse(name)?;
        self.register_handler(
            name,
            Arc::new(TypedHandler {
                f,
                binding: A::query_binding(),
            }),
        );
        Ok(())
    }

    pub fn register_handler(&self, name: MethodName, handler: Arc<dyn MethodHandler>) {
        self.methods.insert(name.to_string(), handler);
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn registered_methods(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.iter().map(|e| e.key().clone()).collect();
        names.sort_unstable();
        names
    }

    /// Resolve, look up, bind, invoke, encode. Every failure is written in
    /// the request's own protocol; nothing here returns an error.
    pub async fn dispatch(&self, req: &mut CodecRequest) -> WireResponse {
        let method = match req.method() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(error = %e, "method resolution failed");
                return req.write_error(&e);
            }
        };

        let handler = match self.methods.get(&method.to_string()) {
            Some(h) => h.value().clone(),
            None => {
                tracing::warn!(%method, "unknown method");
                return req.write_error(&RpcError::MethodNotFound(method.to_string()));
            }
        };

        handler.call(req).await
    }
}
