use serde::{Deserialize, Serialize};

use httprpc_core::{QueryBinding, Result, RpcArgs};

use crate::dispatch::Dispatcher;

/// Returns its arguments. Used to observe binding from the outside.
pub struct EchoService;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoArgs {
    #[serde(rename = "A", default)]
    pub a: String,
    #[serde(rename = "B", default)]
    pub b: i64,
}

impl RpcArgs for EchoArgs {
    fn query_binding() -> QueryBinding<Self> {
        QueryBinding::<Self>::new().field("A", |args, v| args.a = v)
    }
}

impl EchoService {
    pub fn register(dispatcher: &Dispatcher) -> Result<()> {
        dispatcher.register("Echo.Echo", echo)?;
        dispatcher.register("Echo.Fail", fail)?;
        Ok(())
    }
}

async fn echo(args: EchoArgs) -> std::result::Result<EchoArgs, String> {
    Ok(args)
}

async fn fail(args: EchoArgs) -> std::result::Result<EchoArgs, String> {
    Err(format!("echo failed: {}", args.a))
}
