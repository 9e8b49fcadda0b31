//! Built-in demo services.

pub mod arith;
pub mod echo;
pub mod hello;

pub use arith::Service1;
pub use echo::EchoService;
pub use hello::HelloService;

use httprpc_core::Result;

use crate::dispatch::Dispatcher;

/// Register every built-in service.
pub fn register_all(dispatcher: &Dispatcher) -> Result<()> {
    Service1::register(dispatcher)?;
    HelloService::register(dispatcher)?;
    EchoService::register(dispatcher)?;
    Ok(())
}
