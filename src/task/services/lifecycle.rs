//! Task mutations with post-commit event publication.

use crate::event::{
    domain::TaskEventKind,
    ports::{DeliveryReceipt, EventBroker},
    services::{PublishError, TaskEventPublisher},
};
use crate::task::{
    domain::{NewTask, Task, TaskDomainError, TaskId, TaskStatus, TaskTitle, TaskUpdate},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskRequest {
    title: String,
    description: Option<String>,
    status: Option<String>,
}

impl NewTaskRequest {
    /// Creates a request with the required title. Status defaults to `TODO`.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Request payload replacing every editable field of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: String,
    description: Option<String>,
    status: String,
}

impl UpdateTaskRequest {
    /// Creates a request; the description is cleared unless set.
    #[must_use]
    pub fn new(title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: status.into(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Outcome of the event handoff that follows a committed mutation.
#[derive(Debug, Clone)]
pub enum Publication {
    /// The broker accepted the event.
    Delivered(DeliveryReceipt),
    /// The event was lost. The mutation is still committed.
    Failed(PublishError),
}

impl Publication {
    /// Returns `true` when the broker accepted the event.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

/// A committed mutation together with what happened to its event.
#[derive(Debug, Clone)]
pub struct Committed<T> {
    value: T,
    publication: Publication,
}

impl<T> Committed<T> {
    /// Returns the committed value.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Returns the publish outcome.
    #[must_use]
    pub const fn publication(&self) -> &Publication {
        &self.publication
    }

    /// Consumes the wrapper, returning the committed value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Service-level errors for task operations.
///
/// Publish failures never appear here; they are reported through
/// [`Publication::Failed`].
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other @ TaskRepositoryError::Persistence(_) => Self::Repository(other),
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task store front door.
///
/// Every successful create, update, or delete emits exactly one event, after
/// the repository call has returned. Failed mutations emit nothing.
pub struct TaskService<R, B, C>
where
    R: TaskRepository,
    B: EventBroker,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    publisher: TaskEventPublisher<B, C>,
    clock: Arc<C>,
}

impl<R, B, C> Clone for TaskService<R, B, C>
where
    R: TaskRepository,
    B: EventBroker,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            publisher: self.publisher.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, B, C> TaskService<R, B, C>
where
    R: TaskRepository,
    B: EventBroker,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        publisher: TaskEventPublisher<B, C>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            publisher,
            clock,
        }
    }

    /// Creates a task and announces it with a `CREATED` event.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when validation or persistence fails.
    pub async fn create(&self, request: NewTaskRequest) -> TaskServiceResult<Committed<Task>> {
        let title = TaskTitle::new(request.title)?;
        let status = request
            .status
            .map_or_else(|| Ok(TaskStatus::todo()), TaskStatus::new)?;
        let new_task = NewTask::new(title, request.description, status, &*self.clock);
        let task = self.repository.insert(&new_task).await?;
        info!(task_id = task.id().value(), "task created");
        let publication = self.announce(&task, TaskEventKind::Created).await;
        Ok(Committed {
            value: task,
            publication,
        })
    }

    /// Replaces a task's title, description, and status, then announces it
    /// with an `UPDATED` event carrying the new values.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn update(
        &self,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<Committed<Task>> {
        let update = TaskUpdate {
            title: TaskTitle::new(request.title)?,
            description: request.description,
            status: TaskStatus::new(request.status)?,
        };
        let mut task = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))?;
        task.apply(update, &*self.clock);
        self.repository.update(&task).await?;
        info!(task_id = id.value(), status = %task.status(), "task updated");
        let publication = self.announce(&task, TaskEventKind::Updated).await;
        Ok(Committed {
            value: task,
            publication,
        })
    }

    /// Deletes a task and announces it with a `DELETED` event carrying the
    /// task as it was just before removal.
    ///
    /// Attachments of the task are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn delete(&self, id: TaskId) -> TaskServiceResult<Committed<Task>> {
        let removed = self
            .repository
            .delete(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))?;
        info!(task_id = id.value(), "task deleted");
        let publication = self.announce(&removed, TaskEventKind::Deleted).await;
        Ok(Committed {
            value: removed,
            publication,
        })
    }

    /// Returns the task with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn get(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }

    /// Returns every task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when lookup fails.
    pub async fn list(&self) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repository.list().await?)
    }

    /// Returns tasks with the given status label.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] for a blank label.
    pub async fn list_by_status(&self, status: &str) -> TaskServiceResult<Vec<Task>> {
        let label = TaskStatus::new(status)?;
        Ok(self.repository.find_by_status(&label).await?)
    }

    /// Returns tasks whose title contains `keyword`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when lookup fails.
    pub async fn search(&self, keyword: &str) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repository.search_title(keyword.trim()).await?)
    }

    async fn announce(&self, task: &Task, kind: TaskEventKind) -> Publication {
        match self.publisher.publish(task, kind).await {
            Ok(receipt) => Publication::Delivered(receipt),
            Err(err) => {
                error!(
                    task_id = task.id().value(),
                    event_type = %err.kind(),
                    error = %err,
                    "task event was not published; the mutation stands"
                );
                Publication::Failed(err)
            }
        }
    }
}
