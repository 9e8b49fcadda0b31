//! Shared application state for the httprpc gateway.
//!
//! - Build the content-type codec table from config.
//! - Create the dispatcher and register built-in services.
//! - Startup errors are explicit (Result instead of panic).

use std::collections::HashMap;
use std::sync::Arc;

use httprpc_core::protocol::{mime_of, Protocol};
use httprpc_core::Result;

use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::services;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    dispatcher: Arc<Dispatcher>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    codecs: HashMap<String, Protocol>,
}

impl AppState {
    /// Build application state with the built-in services registered.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let dispatcher = Dispatcher::new();
        services::register_all(&dispatcher)?;

        let state = Self::with_dispatcher(cfg, dispatcher);
        tracing::info!(
            methods = ?state.dispatcher.registered_methods(),
            "registered rpc methods"
        );
        Ok(state)
    }

    /// Build application state around a caller-populated dispatcher.
    pub fn with_dispatcher(cfg: GatewayConfig, dispatcher: Dispatcher) -> Self {
        let codecs = cfg
            .codecs
            .iter()
            .map(|c| (c.mime(), c.protocol))
            .collect();

        Self {
            inner: Arc::new(AppStateInner { cfg, codecs }),
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    /// Codec registered for a `Content-Type` header value.
    pub fn codec_for(&self, content_type: &str) -> Option<Protocol> {
        self.inner.codecs.get(&mime_of(content_type)).copied()
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }
}
