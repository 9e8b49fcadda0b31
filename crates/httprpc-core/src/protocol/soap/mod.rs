//! SOAP 1.1 envelope codec.
//!
//! - Port (service) comes from the last URL path segment.
//! - Method comes from the name of the single element inside `Body`.
//! - Params are that element's inner XML, decoded with quick-xml serde.
//! - Failures of any kind are written as a `Fault` body with status 400.

pub mod envelope;
pub mod server;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RpcError};

pub use envelope::{Envelope, MethodElement};
pub use server::SoapRequest;

pub const MIME: &str = "application/soap+xml";
pub const CONTENT_TYPE: &str = "application/soap+xml; charset=utf-8";

/// SOAP 1.1 envelope namespace. Fixed, never taken from input.
pub const ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Fault code used when the caller does not pick one.
pub const DEFAULT_FAULT_CODE: &str = "Client";

/// SOAP `Fault` body element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "Fault")]
pub struct Fault {
    #[serde(rename = "faultcode")]
    pub code: String,
    #[serde(rename = "faultstring")]
    pub string: String,
    #[serde(rename = "detail", default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Fault {
    /// An empty `code` falls back to [`DEFAULT_FAULT_CODE`].
    pub fn new(code: &str, string: impl Into<String>) -> Self {
        let code = if code.is_empty() {
            DEFAULT_FAULT_CODE
        } else {
            code
        };
        Self {
            code: code.to_string(),
            string: string.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Decode a response envelope's `Body` content onto `R`.
///
/// The body's inner XML is wrapped in a synthetic root, so `R` sees the
/// reply fields (or a `Fault` element) as its direct children.
pub fn decode_response<R: DeserializeOwned>(xml: &[u8]) -> Result<R> {
    let env = Envelope::parse(xml)?;
    decode_fragment(&env.body)
}

/// Wrap a raw fragment in `<root>` and decode it.
pub(crate) fn decode_fragment<R: DeserializeOwned>(fragment: &str) -> Result<R> {
    let wrapped = format!("<root>{fragment}</root>");
    quick_xml::de::from_str(&wrapped).map_err(|e| RpcError::Decode(format!("soap: {e}")))
}
