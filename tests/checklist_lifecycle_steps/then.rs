//! Then steps for checklist lifecycle BDD scenarios.

use super::world::{ChecklistWorld, run_async};
use punchlist::{
    api::ChecklistOperations, checklist::ports::ChecklistRepository, user::domain::UserId,
};
use rstest_bdd_macros::then;

#[then(r#"the checklist for "{work_order}" has {count:usize} open tasks"#)]
fn has_open_tasks(
    world: &ChecklistWorld,
    work_order: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let checklist = world.checklist_for(&work_order)?;
    let tasks = run_async(world.checklists.tasks_for(checklist.id()))?;
    let open = tasks.iter().filter(|task| !task.completed()).count();
    if tasks.len() != count || open != count {
        return Err(eyre::eyre!(
            "expected {count} open tasks, found {open} open of {}",
            tasks.len()
        ));
    }
    Ok(())
}

#[then(r#"the checklist for "{work_order}" is unassigned"#)]
fn is_unassigned(world: &ChecklistWorld, work_order: String) -> Result<(), eyre::Report> {
    let checklist = world.checklist_for(&work_order)?;
    if let Some(owner) = checklist.owner() {
        return Err(eyre::eyre!("expected no owner, found user {owner}"));
    }
    Ok(())
}

#[then(r#"the checklist for "{work_order}" is owned by user {user_id:i64}"#)]
fn is_owned_by(
    world: &ChecklistWorld,
    work_order: String,
    user_id: i64,
) -> Result<(), eyre::Report> {
    let checklist = world.checklist_for(&work_order)?;
    let expected = UserId::new(user_id)?;
    if checklist.owner() != Some(expected) {
        return Err(eyre::eyre!(
            "expected owner {expected}, found {:?}",
            checklist.owner()
        ));
    }
    Ok(())
}

#[then(r#"the checklist for "{work_order}" is active"#)]
fn is_active(world: &ChecklistWorld, work_order: String) -> Result<(), eyre::Report> {
    if world.checklist_for(&work_order)?.is_history() {
        return Err(eyre::eyre!("expected {work_order} to remain active"));
    }
    Ok(())
}

#[then(r#"the checklist for "{work_order}" is archived"#)]
fn is_archived(world: &ChecklistWorld, work_order: String) -> Result<(), eyre::Report> {
    let checklist = world.checklist_for(&work_order)?;
    if !checklist.is_history() {
        return Err(eyre::eyre!("expected {work_order} to be archived"));
    }
    let tasks = run_async(world.checklists.tasks_for(checklist.id()))?;
    if tasks.iter().any(|task| !task.completed()) {
        return Err(eyre::eyre!("archived checklist has open tasks"));
    }
    Ok(())
}

#[then(r#"completing the task "{text}" on "{work_order}" requires confirmation"#)]
fn completion_requires_confirmation(
    world: &ChecklistWorld,
    text: String,
    work_order: String,
) -> Result<(), eyre::Report> {
    let task = world.task_named(&work_order, &text)?;
    let required = run_async(world.application.requires_confirmation(task.id(), true))?;
    if !required {
        return Err(eyre::eyre!("expected completing {text:?} to need confirmation"));
    }
    Ok(())
}

#[then("user {user_id:i64} has no assigned checklists")]
fn no_assigned_checklists(world: &ChecklistWorld, user_id: i64) -> Result<(), eyre::Report> {
    let assigned = run_async(world.application.list_assigned(UserId::new(user_id)?))?;
    if !assigned.is_empty() {
        return Err(eyre::eyre!(
            "expected no assigned checklists, found {}",
            assigned.len()
        ));
    }
    Ok(())
}

#[then(r#"exactly {count:usize} checklist exists for "{work_order}""#)]
fn exactly_one_checklist(
    world: &ChecklistWorld,
    count: usize,
    work_order: String,
) -> Result<(), eyre::Report> {
    let matching = run_async(world.application.list_available("", usize::MAX))?
        .into_iter()
        .filter(|checklist| checklist.work_order_id().as_str() == work_order)
        .count();
    if matching != count {
        return Err(eyre::eyre!("expected {count} checklists, found {matching}"));
    }
    let checklist = world.checklist_for(&work_order)?;
    let tasks = run_async(world.checklists.tasks_for(checklist.id()))?;
    if tasks.len() != 3 {
        return Err(eyre::eyre!("expected one full task set, found {}", tasks.len()));
    }
    Ok(())
}

#[then("the last sync skipped {count:usize} work order")]
fn last_sync_skipped(world: &ChecklistWorld, count: usize) -> Result<(), eyre::Report> {
    let report = world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no sync has run in this scenario"))?;
    if report.skipped().len() != count || !report.created().is_empty() {
        return Err(eyre::eyre!("unexpected sync report: {report:?}"));
    }
    Ok(())
}

#[then(r#"the search returns only "{work_order}""#)]
fn search_returns_only(world: &ChecklistWorld, work_order: String) -> Result<(), eyre::Report> {
    let found = world
        .last_search
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no search has run in this scenario"))?;
    let ids: Vec<&str> = found
        .iter()
        .map(|checklist| checklist.work_order_id().as_str())
        .collect();
    if ids != [work_order.as_str()] {
        return Err(eyre::eyre!("expected only {work_order}, found {ids:?}"));
    }
    Ok(())
}
