//! Shared world state for task lifecycle event BDD scenarios.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rstest::fixture;
use taskflow::{
    auth::{domain::TokenError, services::TokenService},
    clock::ManualClock,
    event::{
        adapters::memory::InMemoryBroker,
        domain::{TaskEvent, TaskEventKind},
        services::TaskEventPublisher,
    },
    notification::{
        ports::{HandlerResult, TaskEventHandler},
        services::TaskEventDispatcher,
    },
    task::{adapters::memory::InMemoryTaskRepository, services::TaskService},
};

/// Topic carrying task events in scenarios.
pub const TOPIC: &str = "task-events";

/// Consumer group used in scenarios.
pub const GROUP: &str = "notification-group";

/// Token secret used in scenarios.
pub const SECRET: &str = "scenarioSecretKey-0123456789abcdefghijklmn";

/// Service type used by the BDD world.
pub type TestTaskService = TaskService<InMemoryTaskRepository, InMemoryBroker, ManualClock>;

/// Handler that keeps every event it receives.
#[derive(Debug, Clone, Default)]
pub struct CapturingHandler {
    events: Arc<Mutex<Vec<TaskEvent>>>,
}

impl CapturingHandler {
    /// Returns a copy of the received events.
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

/// Scenario world for task lifecycle event behaviour tests.
pub struct TaskEventWorld {
    pub clock: ManualClock,
    pub broker: InMemoryBroker,
    pub service: Option<TestTaskService>,
    pub on_created: CapturingHandler,
    pub on_updated: CapturingHandler,
    pub on_deleted: CapturingHandler,
    pub tokens: Option<TokenService<ManualClock>>,
    pub token: Option<String>,
}

impl TaskEventWorld {
    /// Creates a world with a frozen clock and an unprovisioned broker.
    #[must_use]
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2025, 3, 14, 9, 0, 0)
            .single()
            .unwrap_or_default();
        Self {
            clock: ManualClock::new(start),
            broker: InMemoryBroker::new(),
            service: None,
            on_created: CapturingHandler::default(),
            on_updated: CapturingHandler::default(),
            on_deleted: CapturingHandler::default(),
            tokens: None,
            token: None,
        }
    }

    /// Returns the task service set up by a `Given` step.
    ///
    /// # Errors
    ///
    /// Returns an error if no task store has been set up.
    pub fn service(&self) -> Result<&TestTaskService, eyre::Report> {
        self.service
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task service in scenario world"))
    }

    /// Wires a task service that publishes to the world's broker.
    ///
    /// # Errors
    ///
    /// Returns an error if the topic cannot be created.
    pub fn start_store(&mut self, first_id: i64) -> Result<(), eyre::Report> {
        self.broker.create_topic(TOPIC, 3)?;
        let clock = Arc::new(self.clock.clone());
        let publisher =
            TaskEventPublisher::new(Arc::new(self.broker.clone()), Arc::clone(&clock), TOPIC);
        self.service = Some(TaskService::new(
            Arc::new(InMemoryTaskRepository::starting_at(first_id)),
            publisher,
            clock,
        ));
        Ok(())
    }

    /// Builds a dispatcher routing each kind to its capturing handler.
    #[must_use]
    pub fn dispatcher(&self) -> TaskEventDispatcher {
        TaskEventDispatcher::new()
            .register(TaskEventKind::Created, Arc::new(self.on_created.clone()))
            .register(TaskEventKind::Updated, Arc::new(self.on_updated.clone()))
            .register(TaskEventKind::Deleted, Arc::new(self.on_deleted.clone()))
    }

    /// Verifies the issued token.
    ///
    /// # Errors
    ///
    /// Returns an error if no token service or token is present.
    pub fn verify_token(
        &self,
    ) -> Result<Result<taskflow::auth::domain::VerifiedToken, TokenError>, eyre::Report> {
        let tokens = self
            .tokens
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing token service in scenario world"))?;
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing issued token in scenario world"))?;
        Ok(tokens.verify(token))
    }
}

impl Default for TaskEventWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskEventWorld {
    TaskEventWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
