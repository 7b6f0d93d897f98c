//! Given steps for checklist lifecycle BDD scenarios.

use super::world::{ChecklistWorld, run_async};
use chrono::Utc;
use eyre::WrapErr;
use punchlist::{
    api::ChecklistOperations,
    checklist::{domain::TaskTemplate, services::SyncWorkOrderRequest},
    user::domain::{User, UserId, UserProfile},
};
use rstest_bdd_macros::given;

#[given(r#"the task template "{entries}""#)]
fn the_task_template(world: &mut ChecklistWorld, entries: String) -> Result<(), eyre::Report> {
    let template = TaskTemplate::new(entries.split(','))?;
    world.templates.replace(template)?;
    Ok(())
}

#[given("a signed-in worker with user id {user_id:i64}")]
fn a_signed_in_worker(world: &mut ChecklistWorld, user_id: i64) -> Result<(), eyre::Report> {
    let profile = UserProfile::new(
        format!("aad-{user_id}"),
        "Worker",
        format!("worker{user_id}@example.com"),
    )?;
    let user = User::first_login(UserId::new(user_id)?, &profile, Utc::now());
    world.users.insert(user)?;
    Ok(())
}

#[given(r#"work order "{work_order}" named "{name}" has been synchronized"#)]
fn work_order_synchronized(
    world: &mut ChecklistWorld,
    work_order: String,
    name: String,
) -> Result<(), eyre::Report> {
    let report = run_async(
        world
            .application
            .sync_work_orders(vec![SyncWorkOrderRequest::new(work_order, name)]),
    )
    .wrap_err("sync work order for scenario")?;
    if report.created().len() != 1 {
        return Err(eyre::eyre!("expected one created checklist, got {report:?}"));
    }
    Ok(())
}

#[given(r#"user {user_id:i64} has claimed the checklist for "{work_order}""#)]
fn user_has_claimed(
    world: &mut ChecklistWorld,
    user_id: i64,
    work_order: String,
) -> Result<(), eyre::Report> {
    let checklist = world.checklist_for(&work_order)?;
    run_async(
        world
            .application
            .claim(checklist.id(), UserId::new(user_id)?),
    )
    .wrap_err("claim checklist for scenario")?;
    Ok(())
}
