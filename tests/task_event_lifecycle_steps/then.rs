//! Then steps for task lifecycle event BDD scenarios.

use super::world::{CapturingHandler, TaskEventWorld, run_async};
use rstest_bdd_macros::then;
use taskflow::{
    auth::domain::TokenError,
    event::domain::TaskEvent,
    task::{domain::TaskId, services::TaskServiceError},
};

fn single_event(handler: &CapturingHandler) -> Result<TaskEvent, eyre::Report> {
    let events = handler.events();
    eyre::ensure!(
        events.len() == 1,
        "expected exactly one event, found {}",
        events.len()
    );
    events
        .into_iter()
        .next()
        .ok_or_else(|| eyre::eyre!("expected one event"))
}

#[then(r#"the create handler received task {task_id:i64} with status "{status}""#)]
fn create_handler_received(
    world: &TaskEventWorld,
    task_id: i64,
    status: String,
) -> Result<(), eyre::Report> {
    let event = single_event(&world.on_created)?;
    eyre::ensure!(event.task_id() == task_id, "unexpected task id {}", event.task_id());
    eyre::ensure!(event.status() == status, "unexpected status {}", event.status());
    Ok(())
}

#[then(r#"the update handler received task {task_id:i64} with status "{status}""#)]
fn update_handler_received(
    world: &TaskEventWorld,
    task_id: i64,
    status: String,
) -> Result<(), eyre::Report> {
    let event = single_event(&world.on_updated)?;
    eyre::ensure!(event.task_id() == task_id, "unexpected task id {}", event.task_id());
    eyre::ensure!(event.status() == status, "unexpected status {}", event.status());
    Ok(())
}

#[then(r#"the delete handler received task {task_id:i64} titled "{title}""#)]
fn delete_handler_received(
    world: &TaskEventWorld,
    task_id: i64,
    title: String,
) -> Result<(), eyre::Report> {
    let event = single_event(&world.on_deleted)?;
    eyre::ensure!(event.task_id() == task_id, "unexpected task id {}", event.task_id());
    eyre::ensure!(event.title() == title, "unexpected title {}", event.title());
    Ok(())
}

#[then("the update handler received no events")]
fn update_handler_idle(world: &TaskEventWorld) -> Result<(), eyre::Report> {
    let count = world.on_updated.events().len();
    eyre::ensure!(count == 0, "update handler received {count} events");
    Ok(())
}

#[then("the delete handler received no events")]
fn delete_handler_idle(world: &TaskEventWorld) -> Result<(), eyre::Report> {
    let count = world.on_deleted.events().len();
    eyre::ensure!(count == 0, "delete handler received {count} events");
    Ok(())
}

#[then("task {task_id:i64} can no longer be found")]
fn task_is_gone(world: &TaskEventWorld, task_id: i64) -> Result<(), eyre::Report> {
    let id = TaskId::new(task_id)?;
    let result = run_async(world.service()?.get(id));
    if !matches!(result, Err(TaskServiceError::NotFound(_))) {
        return Err(eyre::eyre!("expected NotFound, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the token verifies as "{subject}""#)]
fn token_verifies(world: &TaskEventWorld, subject: String) -> Result<(), eyre::Report> {
    let verified = world
        .verify_token()?
        .map_err(|err| eyre::eyre!("token should verify: {err}"))?;
    eyre::ensure!(
        verified.subject() == subject,
        "unexpected subject {}",
        verified.subject()
    );
    Ok(())
}

#[then("verifying the token fails as expired")]
fn token_expired(world: &TaskEventWorld) -> Result<(), eyre::Report> {
    let result = world.verify_token()?;
    if result != Err(TokenError::Expired) {
        return Err(eyre::eyre!("expected Expired, got {result:?}"));
    }
    Ok(())
}
