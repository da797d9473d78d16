//! Effect execution runtime
//!
//! The state machine is pure; the dispatcher here owns the I/O: it loads
//! the chat's record, runs the transition, and executes the resulting
//! effects against the catalog cache, the store, and the gateway.

mod dispatcher;

#[cfg(test)]
pub mod testing;

pub use dispatcher::{DispatchError, Dispatcher};

use crate::gateway::TelegramGateway;

/// Production dispatcher wired to the concrete Telegram gateway
pub type ProductionDispatcher = Dispatcher<TelegramGateway>;
