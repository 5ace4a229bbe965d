//! Attachments stored next to tasks that come and go.

use std::sync::Arc;

use super::helpers::{Pipeline, pipeline};
use chrono::Duration;
use rstest::rstest;
use taskflow::{
    clock::ManualClock,
    task::{
        adapters::memory::{
            InMemoryAttachmentRepository, InMemoryObjectStore, InMemoryTaskRepository,
        },
        ports::ObjectStore,
        services::{AttachmentService, AttachmentServiceError, NewTaskRequest},
    },
};

type TestAttachments = AttachmentService<
    InMemoryTaskRepository,
    InMemoryAttachmentRepository,
    InMemoryObjectStore<ManualClock>,
    ManualClock,
>;

fn attachments(pipeline: &Pipeline, objects: &Arc<InMemoryObjectStore<ManualClock>>) -> TestAttachments {
    AttachmentService::new(
        Arc::clone(&pipeline.repository),
        Arc::new(InMemoryAttachmentRepository::new()),
        Arc::clone(objects),
        Arc::new(pipeline.clock.clone()),
        Duration::hours(1),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn attachments_outlive_their_task_until_purged(pipeline: Pipeline) {
    let objects = Arc::new(InMemoryObjectStore::new(
        "task-attachments",
        Arc::new(pipeline.clock.clone()),
    ));
    let service = attachments(&pipeline, &objects);
    let task_id = pipeline
        .tasks
        .create(NewTaskRequest::new("Write report"))
        .await
        .expect("create should succeed")
        .into_value()
        .id();
    let stored = service
        .upload(
            task_id,
            "report.pdf",
            Some("application/pdf".to_owned()),
            b"%PDF-1.7".to_vec(),
        )
        .await
        .expect("upload should succeed");
    assert!(stored.storage_key().starts_with("42_"));
    assert!(stored.storage_key().ends_with("_report.pdf"));

    pipeline.tasks.delete(task_id).await.expect("delete should succeed");

    let listed = service.list(task_id).await.expect("list should succeed");
    assert_eq!(listed.len(), 1);
    assert!(
        objects
            .exists(stored.storage_key())
            .await
            .expect("exists check")
    );

    let removed = service.purge_task(task_id).await.expect("purge should succeed");
    assert_eq!(removed, 1);
    assert!(objects.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uploads_require_an_existing_task(pipeline: Pipeline) {
    let objects = Arc::new(InMemoryObjectStore::new(
        "task-attachments",
        Arc::new(pipeline.clock.clone()),
    ));
    let service = attachments(&pipeline, &objects);
    let task_id = pipeline
        .tasks
        .create(NewTaskRequest::new("Write report"))
        .await
        .expect("create should succeed")
        .into_value()
        .id();
    pipeline.tasks.delete(task_id).await.expect("delete should succeed");

    let result = service
        .upload(task_id, "late.txt", None, b"too late".to_vec())
        .await;

    assert!(matches!(result, Err(AttachmentServiceError::TaskNotFound(id)) if id == task_id));
    assert!(objects.is_empty());
}
