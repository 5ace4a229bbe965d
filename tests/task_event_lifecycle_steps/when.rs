//! When steps for task lifecycle event BDD scenarios.

use std::sync::Arc;

use super::world::{GROUP, TOPIC, TaskEventWorld, run_async};
use chrono::Duration;
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskflow::{
    notification::services::NotificationConsumer,
    task::{
        domain::TaskId,
        services::{NewTaskRequest, UpdateTaskRequest},
    },
};
use tokio::sync::watch;

#[when(r#"a task titled "{title}" is created with status "{status}""#)]
fn create_task(
    world: &mut TaskEventWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let committed = run_async(
        world
            .service()?
            .create(NewTaskRequest::new(title).with_status(status)),
    )
    .wrap_err("create task")?;
    eyre::ensure!(
        committed.publication().is_delivered(),
        "created event was not delivered"
    );
    Ok(())
}

#[when(r#"task {task_id:i64} is updated to status "{status}""#)]
fn update_task(
    world: &mut TaskEventWorld,
    task_id: i64,
    status: String,
) -> Result<(), eyre::Report> {
    let id = TaskId::new(task_id)?;
    let service = world.service()?;
    let current = run_async(service.get(id)).wrap_err("load task before update")?;
    let request = UpdateTaskRequest::new(current.title().as_str(), status);
    run_async(service.update(id, request)).wrap_err("update task")?;
    Ok(())
}

#[when("task {task_id:i64} is deleted")]
fn delete_task(world: &mut TaskEventWorld, task_id: i64) -> Result<(), eyre::Report> {
    let id = TaskId::new(task_id)?;
    run_async(world.service()?.delete(id)).wrap_err("delete task")?;
    Ok(())
}

#[when("the notification consumer drains the topic")]
fn drain_topic(world: &mut TaskEventWorld) -> Result<(), eyre::Report> {
    world.broker.close();
    let consumer = NotificationConsumer::new(
        Arc::new(world.broker.clone()),
        world.dispatcher(),
        TOPIC,
        GROUP,
    );
    let (_stop, shutdown) = watch::channel(false);
    let report = run_async(consumer.run(shutdown)).wrap_err("run notification consumer")?;
    eyre::ensure!(
        report.handler_failed == 0 && report.parse_failed == 0,
        "consumer reported failures: {report:?}"
    );
    Ok(())
}

#[when(r#"a token is issued for "{subject}" with capability "{capability}""#)]
fn issue_token(
    world: &mut TaskEventWorld,
    subject: String,
    capability: String,
) -> Result<(), eyre::Report> {
    let tokens = world
        .tokens
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing token service in scenario world"))?;
    let token = tokens
        .issue(&subject, [capability])
        .wrap_err("issue token")?;
    world.token = Some(token);
    Ok(())
}

#[when("{hours:i64} hours pass")]
fn hours_pass(world: &mut TaskEventWorld, hours: i64) {
    world.clock.advance(Duration::hours(hours));
}
