//! One versioned worker generation: lifecycle, fetch interception, and
//! external commands, composed over the bucket store and the network.

pub mod command;
pub mod interceptor;
pub mod lifecycle;
pub mod worker;

#[cfg(test)]
pub(crate) mod testutil;

pub use command::CommandMessage;
pub use interceptor::FetchOutcome;
pub use lifecycle::{Activation, Installation};
pub use worker::{Phase, Worker};
