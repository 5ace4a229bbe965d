//! Given steps for task lifecycle event BDD scenarios.

use std::sync::Arc;

use super::world::{SECRET, TaskEventWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskflow::{auth::services::TokenService, config::TokenConfig, task::services::NewTaskRequest};

#[given("an empty task store that assigns identifiers from {first_id:i64}")]
fn empty_task_store(world: &mut TaskEventWorld, first_id: i64) -> Result<(), eyre::Report> {
    world.start_store(first_id)
}

#[given(r#"a task titled "{title}" is created with status "{status}""#)]
fn existing_task(
    world: &mut TaskEventWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    run_async(
        world
            .service()?
            .create(NewTaskRequest::new(title).with_status(status)),
    )
    .wrap_err("create task in scenario setup")?;
    Ok(())
}

#[given("a token service with a lifetime of {lifetime_secs:u64} seconds")]
fn token_service(world: &mut TaskEventWorld, lifetime_secs: u64) -> Result<(), eyre::Report> {
    let config = TokenConfig {
        secret: SECRET.to_owned(),
        lifetime_secs,
    };
    let tokens = TokenService::new(&config, Arc::new(world.clock.clone()))
        .wrap_err("build token service")?;
    world.tokens = Some(tokens);
    Ok(())
}
