//! Task mutations observed from the consumer side of the broker.

use std::sync::Arc;

use super::helpers::{GROUP, Pipeline, TOPIC, pipeline};
use chrono::Duration;
use rstest::rstest;
use taskflow::{
    event::{
        adapters::memory::partition_for,
        domain::{TaskEvent, TaskEventKind},
        ports::{EventBroker, OutboundRecord},
    },
    notification::{
        adapters::MemoryNotificationSink,
        services::{NotificationConsumer, TaskEventDispatcher},
    },
    task::{
        domain::TaskId,
        services::{NewTaskRequest, TaskServiceError, UpdateTaskRequest},
    },
};
use tokio::sync::watch;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_reaches_the_create_handler_once(pipeline: Pipeline) {
    let committed = pipeline
        .tasks
        .create(NewTaskRequest::new("Write report").with_status("TODO"))
        .await
        .expect("create should succeed");
    assert_eq!(committed.value().id().value(), 42);
    assert!(committed.publication().is_delivered());

    let report = pipeline.drain().await.expect("consumer runs");

    let created = pipeline.on_created.events();
    assert_eq!(created.len(), 1);
    let event = created.first().expect("one event");
    assert_eq!(event.task_id(), 42);
    assert_eq!(event.title(), "Write report");
    assert_eq!(event.status(), "TODO");
    assert_eq!(event.event_type(), &TaskEventKind::Created);
    assert!(pipeline.on_updated.events().is_empty());
    assert!(pipeline.on_deleted.events().is_empty());
    assert_eq!(report.handled, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_routes_only_to_the_update_handler(pipeline: Pipeline) {
    let id = pipeline
        .tasks
        .create(NewTaskRequest::new("Write report"))
        .await
        .expect("create should succeed")
        .into_value()
        .id();
    pipeline.clock.advance(Duration::minutes(5));

    let updated = pipeline
        .tasks
        .update(id, UpdateTaskRequest::new("Write report", "DONE"))
        .await
        .expect("update should succeed");
    assert_eq!(updated.value().status().as_str(), "DONE");
    pipeline.drain().await.expect("consumer runs");

    let events = pipeline.on_updated.events();
    let event = events.first().expect("one update event");
    assert_eq!(events.len(), 1);
    assert_eq!(event.task_id(), 42);
    assert_eq!(event.status(), "DONE");
    assert_eq!(pipeline.on_created.events().len(), 1);
    assert!(pipeline.on_deleted.events().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_carries_the_pre_deletion_snapshot(pipeline: Pipeline) {
    let id = pipeline
        .tasks
        .create(NewTaskRequest::new("Write report").with_description("quarterly numbers"))
        .await
        .expect("create should succeed")
        .into_value()
        .id();

    pipeline.tasks.delete(id).await.expect("delete should succeed");
    pipeline.drain().await.expect("consumer runs");

    let events = pipeline.on_deleted.events();
    let event = events.first().expect("one delete event");
    assert_eq!(event.task_id(), 42);
    assert_eq!(event.title(), "Write report");
    assert_eq!(event.description(), Some("quarterly numbers"));
    assert_eq!(event.status(), "TODO");
    assert!(matches!(
        pipeline.tasks.get(id).await,
        Err(TaskServiceError::NotFound(missing)) if missing == id
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_task_keeps_its_events_in_order(pipeline: Pipeline) {
    let id = pipeline
        .tasks
        .create(NewTaskRequest::new("Write report"))
        .await
        .expect("create should succeed")
        .into_value()
        .id();
    pipeline
        .tasks
        .update(id, UpdateTaskRequest::new("Write report", "IN_PROGRESS"))
        .await
        .expect("update should succeed");
    pipeline.tasks.delete(id).await.expect("delete should succeed");

    let expected_partition = partition_for("42", 3).expect("non-zero partitions");
    assert_eq!(pipeline.broker.record_count(TOPIC), 3);
    let report = pipeline.drain().await.expect("consumer runs");

    assert_eq!(report.received, 3);
    assert_eq!(report.handled, 3);
    let committed = pipeline.broker.committed_offsets(TOPIC, GROUP);
    let slot = usize::try_from(expected_partition).expect("small partition index");
    assert_eq!(committed.get(slot).copied(), Some(3));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_mutations_publish_nothing(pipeline: Pipeline) {
    let missing = TaskId::new(7).expect("valid id");

    let updated = pipeline
        .tasks
        .update(missing, UpdateTaskRequest::new("Nope", "DONE"))
        .await;
    let deleted = pipeline.tasks.delete(missing).await;
    let invalid = pipeline.tasks.create(NewTaskRequest::new("   ")).await;

    assert!(matches!(updated, Err(TaskServiceError::NotFound(_))));
    assert!(matches!(deleted, Err(TaskServiceError::NotFound(_))));
    assert!(matches!(invalid, Err(TaskServiceError::Domain(_))));
    assert_eq!(pipeline.broker.record_count(TOPIC), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mutation_stands_when_the_broker_is_gone(pipeline: Pipeline) {
    pipeline.broker.close();

    let committed = pipeline
        .tasks
        .create(NewTaskRequest::new("Write report"))
        .await
        .expect("create should still succeed");

    assert!(!committed.publication().is_delivered());
    let stored = pipeline
        .tasks
        .get(committed.value().id())
        .await
        .expect("task was stored");
    assert_eq!(stored.title().as_str(), "Write report");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_and_malformed_messages_do_not_stop_the_consumer(pipeline: Pipeline) {
    let foreign = TaskEvent::decode(
        br#"{"taskId":9,"title":"x","status":"TODO","eventType":"UNKNOWN_OTHER","timestamp":"2025-03-14T09:00:00"}"#,
    )
    .expect("foreign event decodes");
    for payload in [foreign.encode().expect("encodes"), b"{oops".to_vec()] {
        pipeline
            .broker
            .send(OutboundRecord {
                topic: TOPIC.to_owned(),
                key: "9".to_owned(),
                payload,
            })
            .await
            .expect("send succeeds");
    }
    pipeline
        .tasks
        .create(NewTaskRequest::new("Write report"))
        .await
        .expect("create should succeed");

    let report = pipeline.drain().await.expect("consumer runs");

    assert_eq!(report.received, 3);
    assert_eq!(report.unhandled, 1);
    assert_eq!(report.parse_failed, 1);
    assert_eq!(report.handled, 1);
    assert_eq!(pipeline.on_created.events().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn independent_groups_each_render_notifications(pipeline: Pipeline) {
    pipeline
        .tasks
        .create(NewTaskRequest::new("Write report"))
        .await
        .expect("create should succeed");
    pipeline.broker.close();

    let mut inboxes = Vec::new();
    for group in ["email-group", "push-group"] {
        let sink = Arc::new(MemoryNotificationSink::new());
        let consumer = NotificationConsumer::new(
            Arc::new(pipeline.broker.clone()),
            TaskEventDispatcher::with_notifications(Arc::clone(&sink)),
            TOPIC,
            group,
        );
        let (_stop, shutdown) = watch::channel(false);
        consumer.run(shutdown).await.expect("consumer runs");
        inboxes.push(sink.notifications());
    }

    for inbox in inboxes {
        let messages: Vec<_> = inbox.into_iter().map(|note| note.message).collect();
        assert_eq!(messages, vec!["New task created: Write report".to_owned()]);
    }
}
