use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use httprpc_core::{QueryBinding, Result, RpcArgs};

use crate::dispatch::Dispatcher;

/// Greets a caller. Reachable from every protocol.
pub struct HelloService;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelloArgs {
    #[serde(rename = "Who", default)]
    pub who: String,
}

impl RpcArgs for HelloArgs {
    fn query_binding() -> QueryBinding<Self> {
        QueryBinding::<Self>::new().field("Who", |a, v| a.who = v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelloReply {
    #[serde(rename = "Message")]
    pub message: String,
}

impl HelloService {
    pub fn register(dispatcher: &Dispatcher) -> Result<()> {
        dispatcher.register("HelloService.Say", say)
    }
}

async fn say(args: HelloArgs) -> std::result::Result<HelloReply, Infallible> {
    Ok(HelloReply {
        message: format!("Hello, {}!", args.who),
    })
}
