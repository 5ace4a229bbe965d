//! Publisher turning committed task snapshots into broker records.

use crate::event::{
    domain::{TaskEvent, TaskEventKind},
    ports::{BrokerError, DeliveryReceipt, EventBroker, OutboundRecord},
};
use crate::task::domain::Task;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Result type for publish operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// A task event that could not be handed to the broker.
#[derive(Debug, Clone, Error)]
pub enum PublishError {
    /// The event could not be encoded.
    #[error("failed to encode {kind} event for task {task_id}: {source}")]
    Encode {
        /// Task the event describes.
        task_id: i64,
        /// Event kind.
        kind: TaskEventKind,
        /// Serializer failure.
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// The broker rejected or failed the handoff.
    #[error("failed to publish {kind} event for task {task_id}: {source}")]
    Broker {
        /// Task the event describes.
        task_id: i64,
        /// Event kind.
        kind: TaskEventKind,
        /// Broker failure.
        #[source]
        source: BrokerError,
    },
}

impl PublishError {
    /// Returns the identifier of the task whose event was lost.
    #[must_use]
    pub const fn task_id(&self) -> i64 {
        match self {
            Self::Encode { task_id, .. } | Self::Broker { task_id, .. } => *task_id,
        }
    }

    /// Returns the kind of the lost event.
    #[must_use]
    pub const fn kind(&self) -> &TaskEventKind {
        match self {
            Self::Encode { kind, .. } | Self::Broker { kind, .. } => kind,
        }
    }
}

/// Emits one [`TaskEvent`] per call, keyed by task identifier.
///
/// Callers invoke [`publish`](Self::publish) only after the mutation it
/// reports has been committed. The publisher never retries; a failure is
/// returned for the caller to log or propagate.
pub struct TaskEventPublisher<B, C>
where
    B: EventBroker,
    C: Clock + Send + Sync,
{
    broker: Arc<B>,
    clock: Arc<C>,
    topic: String,
}

impl<B, C> Clone for TaskEventPublisher<B, C>
where
    B: EventBroker,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            broker: Arc::clone(&self.broker),
            clock: Arc::clone(&self.clock),
            topic: self.topic.clone(),
        }
    }
}

impl<B, C> TaskEventPublisher<B, C>
where
    B: EventBroker,
    C: Clock + Send + Sync,
{
    /// Creates a publisher writing to `topic`.
    #[must_use]
    pub fn new(broker: Arc<B>, clock: Arc<C>, topic: impl Into<String>) -> Self {
        Self {
            broker,
            clock,
            topic: topic.into(),
        }
    }

    /// Returns the destination topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Builds an event from `task` and sends it to the broker.
    ///
    /// The emission timestamp is taken here, before the handoff.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when encoding or the broker handoff fails.
    pub async fn publish(&self, task: &Task, kind: TaskEventKind) -> PublishResult<DeliveryReceipt> {
        let event = TaskEvent::from_task(task, kind, &*self.clock);
        let payload = event.encode().map_err(|err| PublishError::Encode {
            task_id: event.task_id(),
            kind: event.event_type().clone(),
            source: Arc::new(err),
        })?;
        let record = OutboundRecord {
            topic: self.topic.clone(),
            key: event.key(),
            payload,
        };
        let receipt = self
            .broker
            .send(record)
            .await
            .map_err(|err| PublishError::Broker {
                task_id: event.task_id(),
                kind: event.event_type().clone(),
                source: err,
            })?;
        debug!(
            task_id = event.task_id(),
            event_type = %event.event_type(),
            topic = %self.topic,
            partition = receipt.partition,
            offset = receipt.offset,
            "published task event"
        );
        Ok(receipt)
    }
}
