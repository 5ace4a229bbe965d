//! Shared wiring for in-memory end-to-end tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rstest::fixture;
use taskflow::{
    clock::ManualClock,
    event::{
        adapters::memory::InMemoryBroker,
        domain::{TaskEvent, TaskEventKind},
        services::TaskEventPublisher,
    },
    notification::{
        ports::{HandlerResult, TaskEventHandler},
        services::{ConsumerReport, NotificationConsumer, TaskEventDispatcher},
    },
    task::{adapters::memory::InMemoryTaskRepository, services::TaskService},
};
use tokio::sync::watch;

/// Topic used by every pipeline.
pub const TOPIC: &str = "task-events";

/// Consumer group used by every pipeline.
pub const GROUP: &str = "notification-group";

/// Task service wired to the in-memory store and broker.
pub type TestTaskService = TaskService<InMemoryTaskRepository, InMemoryBroker, ManualClock>;

/// Handler that keeps every event it receives.
#[derive(Debug, Clone, Default)]
pub struct CapturingHandler {
    events: Arc<Mutex<Vec<TaskEvent>>>,
}

impl CapturingHandler {
    /// Returns a copy of the received events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<TaskEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TaskEventHandler for CapturingHandler {
    async fn handle(&self, event: &TaskEvent) -> HandlerResult<()> {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
        Ok(())
    }
}

/// Store, broker, and consumer-side handlers for one test.
pub struct Pipeline {
    /// Broker shared by the publisher and the consumer.
    pub broker: InMemoryBroker,
    /// Clock driving timestamps.
    pub clock: ManualClock,
    /// Task store front door.
    pub tasks: TestTaskService,
    /// Shared repository behind `tasks`.
    pub repository: Arc<InMemoryTaskRepository>,
    /// Handler registered for `CREATED`.
    pub on_created: CapturingHandler,
    /// Handler registered for `UPDATED`.
    pub on_updated: CapturingHandler,
    /// Handler registered for `DELETED`.
    pub on_deleted: CapturingHandler,
}

impl Pipeline {
    /// Builds a dispatcher routing each kind to its capturing handler.
    #[must_use]
    pub fn dispatcher(&self) -> TaskEventDispatcher {
        TaskEventDispatcher::new()
            .register(TaskEventKind::Created, Arc::new(self.on_created.clone()))
            .register(TaskEventKind::Updated, Arc::new(self.on_updated.clone()))
            .register(TaskEventKind::Deleted, Arc::new(self.on_deleted.clone()))
    }

    /// Closes the broker and runs the consumer until the stream is drained.
    ///
    /// # Errors
    ///
    /// Returns an error if the consumer cannot read the topic.
    pub async fn drain(&self) -> Result<ConsumerReport, eyre::Report> {
        self.broker.close();
        let consumer = NotificationConsumer::new(
            Arc::new(self.broker.clone()),
            self.dispatcher(),
            TOPIC,
            GROUP,
        );
        let (_stop, shutdown) = watch::channel(false);
        Ok(consumer.run(shutdown).await?)
    }
}

/// Provides a clock frozen at a fixed instant.
#[fixture]
pub fn clock() -> ManualClock {
    let start = Utc
        .with_ymd_and_hms(2025, 3, 14, 9, 0, 0)
        .single()
        .unwrap_or_default();
    ManualClock::new(start)
}

/// Provides a pipeline whose store assigns identifiers from 42.
///
/// # Panics
///
/// Panics if the topic cannot be created.
#[fixture]
pub fn pipeline(clock: ManualClock) -> Pipeline {
    let broker = InMemoryBroker::new();
    assert!(broker.create_topic(TOPIC, 3).is_ok(), "topic is created");
    let repository = Arc::new(InMemoryTaskRepository::starting_at(42));
    let clock_handle = Arc::new(clock.clone());
    let publisher = TaskEventPublisher::new(
        Arc::new(broker.clone()),
        Arc::clone(&clock_handle),
        TOPIC,
    );
    let tasks = TaskService::new(Arc::clone(&repository), publisher, clock_handle);
    Pipeline {
        broker,
        clock,
        tasks,
        repository,
        on_created: CapturingHandler::default(),
        on_updated: CapturingHandler::default(),
        on_deleted: CapturingHandler::default(),
    }
}
