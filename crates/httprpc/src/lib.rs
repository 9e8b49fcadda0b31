//! Top-level facade crate for httprpc.
//!
//! Re-exports the codecs, the client and the gateway library so users can
//! depend on a single crate.

pub mod core {
    pub use httprpc_core::*;
}

pub mod client {
    pub use httprpc_client::*;
}

pub mod gateway {
    pub use httprpc_gateway::*;
}
