//! Shared handlers and payload builders.

use crate::event::domain::TaskEvent;
use crate::notification::ports::{HandlerError, HandlerResult, TaskEventHandler};
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Handler that records the task identifiers it saw.
#[derive(Debug, Clone, Default)]
pub(super) struct RecordingHandler {
    seen: Arc<Mutex<Vec<i64>>>,
}

impl RecordingHandler {
    pub(super) fn seen(&self) -> Vec<i64> {
        self.seen.lock().expect("recording lock").clone()
    }
}

#[async_trait]
impl TaskEventHandler for RecordingHandler {
    async fn handle(&self, event: &TaskEvent) -> HandlerResult<()> {
        self.seen
            .lock()
            .expect("recording lock")
            .push(event.task_id());
        Ok(())
    }
}

/// Handler that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct FailingHandler;

#[async_trait]
impl TaskEventHandler for FailingHandler {
    async fn handle(&self, _event: &TaskEvent) -> HandlerResult<()> {
        Err(HandlerError::Failed("smtp relay refused".to_owned()))
    }
}

/// Handler that panics.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct PanickingHandler;

#[async_trait]
impl TaskEventHandler for PanickingHandler {
    async fn handle(&self, event: &TaskEvent) -> HandlerResult<()> {
        panic!("handler blew up on task {}", event.task_id());
    }
}

/// Encodes a wire event with the given tag.
pub(super) fn payload(task_id: i64, event_type: &str) -> Vec<u8> {
    json!({
        "taskId": task_id,
        "title": "Write report",
        "description": null,
        "status": "TODO",
        "eventType": event_type,
        "timestamp": "2025-03-14T09:00:00"
    })
    .to_string()
    .into_bytes()
}
