//! httprpc client: one HTTP POST per call, protocol codecs from core.
//!
//! The transport knows nothing about protocols. It posts an already encoded
//! body and hands the buffered reply to a decoder. Only a 200 reply reaches
//! the decoder; any other status becomes [`RpcError::Remote`] carrying the
//! raw body, so structured faults in error replies are not parsed here.

pub mod json;
pub mod transport;

use httprpc_core::RpcError;
use thiserror::Error;

pub use json::RpcClient;
pub use transport::call_raw;

/// Client-side result type.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Call failure: transport errors pass through untouched, everything else is
/// a codec or remote error.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl ClientError {
    /// Codec/remote error, if this is not a transport failure.
    pub fn rpc(&self) -> Option<&RpcError> {
        match self {
            ClientError::Rpc(e) => Some(e),
            ClientError::Transport(_) => None,
        }
    }
}
