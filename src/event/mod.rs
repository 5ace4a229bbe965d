//! Task lifecycle events and the broker they travel through.
//!
//! A [`domain::TaskEvent`] is built from a committed task snapshot, encoded
//! as JSON, and handed to an [`ports::EventBroker`] keyed by task identifier.
//! Consumers read it back through an [`ports::EventSource`] subscription.
//!
//! - Wire schema in [`domain`]
//! - Broker contracts in [`ports`]
//! - The in-process partitioned broker in [`adapters`]
//! - The publisher in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
