//! Broker port: keyed, partitioned, offset-tracked record delivery.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for broker operations.
pub type BrokerResult<T> = Result<T, BrokerError>;

/// A record handed to the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRecord {
    /// Destination topic.
    pub topic: String,
    /// Partitioning key. Records with equal keys share a partition.
    pub key: String,
    /// Encoded payload.
    pub payload: Vec<u8>,
}

/// Where the broker stored an accepted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Partition the record landed on.
    pub partition: u32,
    /// Offset within that partition.
    pub offset: u64,
}

/// A record delivered to a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumedRecord {
    /// Source topic.
    pub topic: String,
    /// Source partition.
    pub partition: u32,
    /// Offset within the partition.
    pub offset: u64,
    /// Partitioning key.
    pub key: String,
    /// Encoded payload.
    pub payload: Vec<u8>,
}

/// Producer side of the broker.
#[async_trait]
pub trait EventBroker: Send + Sync {
    /// Appends `record` to its topic and returns where it was stored.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::UnknownTopic`] when the topic does not exist,
    /// [`BrokerError::Closed`] after shutdown, or
    /// [`BrokerError::Transport`] when the handoff fails.
    async fn send(&self, record: OutboundRecord) -> BrokerResult<DeliveryReceipt>;
}

/// Consumer side of the broker.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Subscription handle returned by [`EventSource::subscribe`].
    type Subscription: EventSubscription;

    /// Joins `group` on `topic`, resuming from the group's committed
    /// offsets.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::UnknownTopic`] when the topic does not exist.
    async fn subscribe(&self, topic: &str, group: &str) -> BrokerResult<Self::Subscription>;
}

/// An active group membership on one topic.
#[async_trait]
pub trait EventSubscription: Send {
    /// Waits for the next record.
    ///
    /// Returns `None` once the broker is closed and every record has been
    /// delivered to this subscription.
    async fn poll(&mut self) -> BrokerResult<Option<ConsumedRecord>>;

    /// Commits the group offset past `record`.
    ///
    /// Records polled but never acknowledged are delivered again to the next
    /// subscription of the same group.
    async fn ack(&mut self, record: &ConsumedRecord) -> BrokerResult<()>;
}

/// Errors returned by broker adapters.
#[derive(Debug, Clone, Error)]
pub enum BrokerError {
    /// The topic has not been created.
    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    /// A topic with this name already exists.
    #[error("topic already exists: {0}")]
    TopicExists(String),

    /// A topic was declared with zero partitions.
    #[error("topic {0} must have at least one partition")]
    NoPartitions(String),

    /// The broker has been shut down.
    #[error("broker is closed")]
    Closed,

    /// Network or client failure.
    #[error("broker transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl BrokerError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
