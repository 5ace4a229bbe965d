//! In-process partitioned broker.

mod broker;
mod subscription;

pub use broker::{InMemoryBroker, partition_for};
pub use subscription::InMemorySubscription;
