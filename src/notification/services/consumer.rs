//! Explicit receive loop binding a consumer group to the dispatcher.

use super::TaskEventDispatcher;
use crate::config::EventsConfig;
use crate::event::ports::{BrokerError, EventSource, EventSubscription};
use crate::notification::domain::DispatchOutcome;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

/// Errors that stop the receive loop.
///
/// Message-level failures never appear here; only the broker connection can
/// end a run early.
#[derive(Debug, Error)]
pub enum ConsumerError {
    /// Subscribing, polling, or committing failed.
    #[error(transparent)]
    Broker(#[from] BrokerError),
}

/// Result type for consumer runs.
pub type ConsumerResult<T> = Result<T, ConsumerError>;

/// Counters for one [`NotificationConsumer::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerReport {
    /// Messages received and acknowledged.
    pub received: u64,
    /// Messages whose handler completed.
    pub handled: u64,
    /// Messages with a kind nobody handles.
    pub unhandled: u64,
    /// Messages that were not task events.
    pub parse_failed: u64,
    /// Messages whose handler failed or panicked.
    pub handler_failed: u64,
}

impl ConsumerReport {
    fn record(&mut self, outcome: &DispatchOutcome) {
        self.received = self.received.saturating_add(1);
        let counter = match outcome {
            DispatchOutcome::Handled(_) => &mut self.handled,
            DispatchOutcome::Unhandled(_) => &mut self.unhandled,
            DispatchOutcome::ParseFailed => &mut self.parse_failed,
            DispatchOutcome::HandlerFailed(_) => &mut self.handler_failed,
        };
        *counter = counter.saturating_add(1);
    }
}

/// Consumer-group member feeding the dispatcher.
pub struct NotificationConsumer<S>
where
    S: EventSource,
{
    source: Arc<S>,
    dispatcher: TaskEventDispatcher,
    topic: String,
    group: String,
}

impl<S> NotificationConsumer<S>
where
    S: EventSource,
{
    /// Creates a consumer for `group` on `topic`.
    #[must_use]
    pub fn new(
        source: Arc<S>,
        dispatcher: TaskEventDispatcher,
        topic: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            source,
            dispatcher,
            topic: topic.into(),
            group: group.into(),
        }
    }

    /// Creates a consumer using the configured topic and consumer group.
    #[must_use]
    pub fn from_config(
        source: Arc<S>,
        dispatcher: TaskEventDispatcher,
        config: &EventsConfig,
    ) -> Self {
        Self::new(
            source,
            dispatcher,
            config.topic.clone(),
            config.consumer_group.clone(),
        )
    }

    /// Polls, dispatches, and acknowledges until the stream ends or
    /// `shutdown` turns `true`.
    ///
    /// Shutdown is only observed while waiting for the next message, so a
    /// message being handled is always finished and acknowledged first.
    /// Dropping the shutdown sender also stops the loop.
    ///
    /// # Errors
    ///
    /// Returns [`ConsumerError::Broker`] when the subscription fails.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> ConsumerResult<ConsumerReport> {
        let mut subscription = self.source.subscribe(&self.topic, &self.group).await?;
        info!(topic = %self.topic, group = %self.group, "notification consumer started");
        let mut report = ConsumerReport::default();
        loop {
            if *shutdown.borrow_and_update() {
                break;
            }
            let next = tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                polled = subscription.poll() => polled?,
            };
            let Some(record) = next else {
                debug!(topic = %self.topic, "event stream ended");
                break;
            };
            let outcome = self.dispatcher.dispatch(&record.payload).await;
            report.record(&outcome);
            subscription.ack(&record).await?;
            debug!(
                partition = record.partition,
                offset = record.offset,
                ?outcome,
                "acknowledged task event"
            );
        }
        info!(
            received = report.received,
            handled = report.handled,
            unhandled = report.unhandled,
            parse_failed = report.parse_failed,
            handler_failed = report.handler_failed,
            "notification consumer stopped"
        );
        Ok(report)
    }
}
