use std::collections::HashSet;

use serde::Deserialize;

use httprpc_core::protocol::{mime_of, Protocol};

use super::ConfigError;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    /// Content type -> codec table. Defaults to one entry per protocol.
    #[serde(default = "default_codecs")]
    pub codecs: Vec<CodecConfig>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::UnsupportedVersion(self.version));
        }
        if self.codecs.is_empty() {
            return Err(ConfigError::Invalid("codecs must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for c in &self.codecs {
            c.validate()?;
            if !seen.insert(c.mime()) {
                return Err(ConfigError::Invalid(format!(
                    "codecs: duplicate content_type {}",
                    c.content_type
                )));
            }
        }

        self.gateway.validate()?;

        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            codecs: default_codecs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Route prefix. SOAP ports are the path segment after it.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            rpc_path: default_rpc_path(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1024..=16 * 1024 * 1024).contains(&self.max_body_bytes) {
            return Err(ConfigError::Invalid(
                "gateway.max_body_bytes must be between 1024 and 16777216".into(),
            ));
        }
        if !self.rpc_path.starts_with('/') || self.rpc_path.len() < 2 || self.rpc_path.ends_with('/')
        {
            return Err(ConfigError::Invalid(
                "gateway.rpc_path must start with '/' and not end with '/'".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_rpc_path() -> String {
    "/rpc".into()
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    pub content_type: String,
    pub protocol: Protocol,
}

impl CodecConfig {
    /// Lower-cased MIME type used as the lookup key.
    pub fn mime(&self) -> String {
        mime_of(&self.content_type)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mime = self.mime();
        if mime.is_empty() || self.content_type.contains(';') || !mime.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "codecs: content_type must be a bare MIME type, got {:?}",
                self.content_type
            )));
        }
        Ok(())
    }
}

fn default_codecs() -> Vec<CodecConfig> {
    [Protocol::JsonRpc, Protocol::Rest, Protocol::Soap]
        .into_iter()
        .map(|p| CodecConfig {
            content_type: p.mime().to_string(),
            protocol: p,
        })
        .collect()
}
