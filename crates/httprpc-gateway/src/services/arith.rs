use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use httprpc_core::{Result, RpcArgs};

use crate::dispatch::Dispatcher;

/// Integer arithmetic, shaped for SOAP clients (`/rpc/Service1`).
pub struct Service1;

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MultiplyArgs {
    #[serde(rename = "A")]
    pub a: i32,
    #[serde(rename = "B")]
    pub b: i32,
}

impl RpcArgs for MultiplyArgs {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiplyReply {
    #[serde(rename = "Result")]
    pub result: i32,
}

#[derive(Debug, Error)]
pub enum ArithError {
    #[error("response error")]
    Requested,
    #[error("multiply overflow: {0} * {1}")]
    Overflow(i32, i32),
}

impl Service1 {
    pub const PORT: &'static str = "Service1";

    pub fn register(dispatcher: &Dispatcher) -> Result<()> {
        dispatcher.register("Service1.Multiply", multiply)?;
        dispatcher.register("Service1.ResponseError", response_error)?;
        dispatcher.register("Service1.Square", square)?;
        Ok(())
    }
}

async fn multiply(req: MultiplyArgs) -> std::result::Result<MultiplyReply, ArithError> {
    req.a
        .checked_mul(req.b)
        .map(|result| MultiplyReply { result })
        .ok_or(ArithError::Overflow(req.a, req.b))
}

async fn response_error(_req: MultiplyArgs) -> std::result::Result<MultiplyReply, ArithError> {
    Err(ArithError::Requested)
}

async fn square(req: MultiplyArgs) -> std::result::Result<MultiplyReply, Infallible> {
    Ok(MultiplyReply {
        result: req.a.saturating_mul(req.a),
    })
}
