//! Topic log and producer side of the in-memory broker.

use super::InMemorySubscription;
use crate::event::ports::{
    BrokerError, BrokerResult, DeliveryReceipt, EventBroker, EventSource, OutboundRecord,
};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tracing::debug;

#[derive(Debug, Clone)]
pub(super) struct StoredRecord {
    pub(super) key: String,
    pub(super) payload: Vec<u8>,
}

#[derive(Debug, Default)]
pub(super) struct BrokerLog {
    pub(super) topics: HashMap<String, Vec<Vec<StoredRecord>>>,
    pub(super) committed: HashMap<(String, String), Vec<u64>>,
    pub(super) closed: bool,
}

#[derive(Debug, Default)]
pub(super) struct BrokerState {
    pub(super) log: Mutex<BrokerLog>,
    pub(super) arrivals: Notify,
}

/// Thread-safe in-process broker with keyed partitions and per-group
/// committed offsets.
///
/// Clones share the same topics, so one clone can be handed to a publisher
/// and another to a consumer.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBroker {
    state: Arc<BrokerState>,
}

impl InMemoryBroker {
    /// Creates a broker with no topics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name` with `partitions` empty partitions.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::NoPartitions`] for a zero count and
    /// [`BrokerError::TopicExists`] when the name is taken.
    pub fn create_topic(&self, name: &str, partitions: u32) -> BrokerResult<()> {
        if partitions == 0 {
            return Err(BrokerError::NoPartitions(name.to_owned()));
        }
        let mut log = self.state.log.lock().map_err(lock_error)?;
        if log.topics.contains_key(name) {
            return Err(BrokerError::TopicExists(name.to_owned()));
        }
        let slots = usize::try_from(partitions).map_err(BrokerError::transport)?;
        log.topics.insert(name.to_owned(), vec![Vec::new(); slots]);
        debug!(topic = name, partitions, "created topic");
        Ok(())
    }

    /// Stops accepting records and wakes every waiting subscriber.
    ///
    /// Subscribers still receive records already stored, then see the end of
    /// the stream.
    pub fn close(&self) {
        if let Ok(mut log) = self.state.log.lock() {
            log.closed = true;
        }
        self.state.arrivals.notify_waiters();
    }

    /// Returns the partition count of `topic`, if it exists.
    #[must_use]
    pub fn partition_count(&self, topic: &str) -> Option<u32> {
        let log = self.state.log.lock().ok()?;
        log.topics
            .get(topic)
            .and_then(|partitions| u32::try_from(partitions.len()).ok())
    }

    /// Returns the number of records stored in `topic` across partitions.
    #[must_use]
    pub fn record_count(&self, topic: &str) -> usize {
        self.state.log.lock().map_or(0, |log| {
            log.topics
                .get(topic)
                .map_or(0, |partitions| partitions.iter().map(Vec::len).sum())
        })
    }

    /// Returns the committed offsets of `group` on `topic`, one per
    /// partition. Partitions never acknowledged report zero.
    #[must_use]
    pub fn committed_offsets(&self, topic: &str, group: &str) -> Vec<u64> {
        let Ok(log) = self.state.log.lock() else {
            return Vec::new();
        };
        let Some(partitions) = log.topics.get(topic) else {
            return Vec::new();
        };
        let mut offsets = log
            .committed
            .get(&(topic.to_owned(), group.to_owned()))
            .cloned()
            .unwrap_or_default();
        offsets.resize(partitions.len(), 0);
        offsets
    }
}

/// Maps `key` onto one of `partitions` partitions.
///
/// The first eight bytes of the key's SHA-256 digest are folded into an
/// integer, so the mapping is stable across processes and builds. Returns
/// `None` when `partitions` is zero.
#[must_use]
pub fn partition_for(key: &str, partitions: u32) -> Option<u32> {
    let digest = Sha256::digest(key.as_bytes());
    let folded = digest
        .iter()
        .take(8)
        .fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte));
    folded
        .checked_rem(u64::from(partitions))
        .and_then(|partition| u32::try_from(partition).ok())
}

pub(super) fn lock_error(err: impl ToString) -> BrokerError {
    BrokerError::transport(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl EventBroker for InMemoryBroker {
    async fn send(&self, record: OutboundRecord) -> BrokerResult<DeliveryReceipt> {
        let receipt = {
            let mut log = self.state.log.lock().map_err(lock_error)?;
            if log.closed {
                return Err(BrokerError::Closed);
            }
            let partitions = log
                .topics
                .get_mut(&record.topic)
                .ok_or_else(|| BrokerError::UnknownTopic(record.topic.clone()))?;
            let count = u32::try_from(partitions.len()).map_err(BrokerError::transport)?;
            let partition = partition_for(&record.key, count)
                .ok_or_else(|| BrokerError::NoPartitions(record.topic.clone()))?;
            let entries = usize::try_from(partition)
                .ok()
                .and_then(|slot| partitions.get_mut(slot))
                .ok_or_else(|| BrokerError::NoPartitions(record.topic.clone()))?;
            let offset = u64::try_from(entries.len()).map_err(BrokerError::transport)?;
            entries.push(StoredRecord {
                key: record.key,
                payload: record.payload,
            });
            DeliveryReceipt { partition, offset }
        };
        self.state.arrivals.notify_waiters();
        debug!(
            topic = %record.topic,
            partition = receipt.partition,
            offset = receipt.offset,
            "stored record"
        );
        Ok(receipt)
    }
}

#[async_trait]
impl EventSource for InMemoryBroker {
    type Subscription = InMemorySubscription;

    async fn subscribe(&self, topic: &str, group: &str) -> BrokerResult<Self::Subscription> {
        let cursor = {
            let log = self.state.log.lock().map_err(lock_error)?;
            let partitions = log
                .topics
                .get(topic)
                .ok_or_else(|| BrokerError::UnknownTopic(topic.to_owned()))?;
            let mut offsets = log
                .committed
                .get(&(topic.to_owned(), group.to_owned()))
                .cloned()
                .unwrap_or_default();
            offsets.resize(partitions.len(), 0);
            offsets
        };
        debug!(topic, group, ?cursor, "joined consumer group");
        Ok(InMemorySubscription::new(
            Arc::clone(&self.state),
            topic.to_owned(),
            group.to_owned(),
            cursor,
        ))
    }
}
