//! Consumer side of the in-memory broker.

use super::broker::{BrokerState, lock_error};
use crate::event::ports::{BrokerError, BrokerResult, ConsumedRecord, EventSubscription};
use async_trait::async_trait;
use std::sync::Arc;

enum Polled {
    Record(ConsumedRecord),
    Pending,
    Drained,
}

/// A group member reading every partition of one topic.
///
/// Partitions are visited round-robin; within a partition records arrive in
/// offset order.
#[derive(Debug)]
pub struct InMemorySubscription {
    state: Arc<BrokerState>,
    topic: String,
    group: String,
    cursor: Vec<u64>,
    next_partition: usize,
}

impl InMemorySubscription {
    pub(super) const fn new(
        state: Arc<BrokerState>,
        topic: String,
        group: String,
        cursor: Vec<u64>,
    ) -> Self {
        Self {
            state,
            topic,
            group,
            cursor,
            next_partition: 0,
        }
    }

    /// Returns the subscribed topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Returns the consumer group.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    fn take_next(&mut self) -> BrokerResult<Polled> {
        let log = self.state.log.lock().map_err(lock_error)?;
        let partitions = log
            .topics
            .get(&self.topic)
            .ok_or_else(|| BrokerError::UnknownTopic(self.topic.clone()))?;
        let count = partitions.len();
        for step in 0..count {
            let Some(slot) = self.next_partition.wrapping_add(step).checked_rem(count) else {
                continue;
            };
            let (Some(entries), Some(position)) = (partitions.get(slot), self.cursor.get_mut(slot))
            else {
                continue;
            };
            let Some(entry) = usize::try_from(*position)
                .ok()
                .and_then(|index| entries.get(index))
            else {
                continue;
            };
            let record = ConsumedRecord {
                topic: self.topic.clone(),
                partition: u32::try_from(slot).map_err(BrokerError::transport)?,
                offset: *position,
                key: entry.key.clone(),
                payload: entry.payload.clone(),
            };
            *position += 1;
            self.next_partition = slot.wrapping_add(1);
            return Ok(Polled::Record(record));
        }
        Ok(if log.closed {
            Polled::Drained
        } else {
            Polled::Pending
        })
    }
}

#[async_trait]
impl EventSubscription for InMemorySubscription {
    async fn poll(&mut self) -> BrokerResult<Option<ConsumedRecord>> {
        let state = Arc::clone(&self.state);
        loop {
            // Register interest before looking, so a send between the look
            // and the wait still wakes us.
            let arrival = state.arrivals.notified();
            tokio::pin!(arrival);
            arrival.as_mut().enable();
            match self.take_next()? {
                Polled::Record(record) => return Ok(Some(record)),
                Polled::Drained => return Ok(None),
                Polled::Pending => arrival.await,
            }
        }
    }

    async fn ack(&mut self, record: &ConsumedRecord) -> BrokerResult<()> {
        if record.topic != self.topic {
            return Err(BrokerError::UnknownTopic(record.topic.clone()));
        }
        let slot = usize::try_from(record.partition).map_err(BrokerError::transport)?;
        let mut log = self.state.log.lock().map_err(lock_error)?;
        let committed = log
            .committed
            .entry((self.topic.clone(), self.group.clone()))
            .or_default();
        if committed.len() <= slot {
            committed.resize(slot.wrapping_add(1), 0);
        }
        if let Some(offset) = committed.get_mut(slot) {
            *offset = (*offset).max(record.offset.saturating_add(1));
        }
        Ok(())
    }
}
