//! Dotted `Port.Method` identifiers.

use std::fmt;

use crate::error::{Result, RpcError};

/// Resolved method name. Both parts are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodName {
    port: String,
    method: String,
}

impl MethodName {
    pub fn new(port: impl Into<String>, method: impl Into<String>) -> Result<Self> {
        let port = port.into();
        let method = method.into();
        if port.is_empty() || method.is_empty() {
            return Err(RpcError::UnresolvableMethod(format!("{port}.{method}")));
        }
        Ok(Self { port, method })
    }

    /// Parse `"Service.Method"`, splitting on the first dot.
    pub fn parse(dotted: &str) -> Result<Self> {
        let (port, method) = dotted
            .split_once('.')
            .ok_or_else(|| RpcError::UnresolvableMethod(dotted.to_string()))?;
        Self::new(port, method)
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.port, self.method)
    }
}
