//! Racing operations against shared in-memory stores.

use std::sync::Arc;

use crate::in_memory::helpers::{Stack, stack};
use punchlist::{
    api::{ApiError, ChecklistOperations},
    checklist::{
        domain::{ClaimPolicy, WorkOrderId},
        ports::ChecklistRepository,
        services::SyncWorkOrderRequest,
    },
};
use rstest::rstest;

const RACERS: usize = 8;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_syncs_create_one_checklist(stack: Stack) {
    let handles: Vec<_> = (0..RACERS)
        .map(|_| {
            let application = Arc::clone(&stack.application);
            tokio::spawn(async move {
                application
                    .sync_work_orders(vec![SyncWorkOrderRequest::new("WO-1", "Pump service")])
                    .await
            })
        })
        .collect();

    let mut created = 0;
    let mut skipped = 0;
    for handle in handles {
        let report = handle
            .await
            .expect("task should not panic")
            .expect("sync should succeed");
        created += report.created().len();
        skipped += report.skipped().len();
    }

    assert_eq!(created, 1);
    assert_eq!(skipped, RACERS - 1);
    let work_order = WorkOrderId::new("WO-1").expect("valid id");
    let checklist = stack
        .checklists
        .find_by_work_order(&work_order)
        .await
        .expect("lookup should succeed")
        .expect("checklist should exist");
    let tasks = stack
        .checklists
        .tasks_for(checklist.id())
        .await
        .expect("tasks should load");
    assert_eq!(tasks.len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_exclusive_claims_have_one_winner() {
    let stack = Stack::with_policy(ClaimPolicy::Exclusive);
    let report = stack
        .application
        .sync_work_orders(vec![SyncWorkOrderRequest::new("WO-1", "Pump service")])
        .await
        .expect("sync should succeed");
    let checklist_id = *report.created().first().expect("checklist created");
    let mut workers = Vec::with_capacity(RACERS);
    for index in 0..RACERS {
        workers.push(stack.sign_in(&format!("aad-{index}")).await);
    }

    let handles: Vec<_> = workers
        .iter()
        .map(|&worker| {
            let application = Arc::clone(&stack.application);
            tokio::spawn(async move { (worker, application.claim(checklist_id, worker).await) })
        })
        .collect();

    let mut winners = Vec::new();
    for handle in handles {
        let (worker, result) = handle.await.expect("task should not panic");
        match result {
            Ok(_) => winners.push(worker),
            Err(err) => assert!(
                matches!(err, ApiError::Conflict(_)),
                "losing claim should conflict, got {err:?}"
            ),
        }
    }

    assert_eq!(winners.len(), 1);
    let stored = stack
        .checklists
        .find_by_id(checklist_id)
        .await
        .expect("lookup should succeed")
        .expect("checklist should exist");
    assert_eq!(stored.owner(), winners.first().copied());
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_completions_archive_the_checklist(stack: Stack) {
    let report = stack
        .application
        .sync_work_orders(vec![SyncWorkOrderRequest::new("WO-1", "Pump service")])
        .await
        .expect("sync should succeed");
    let checklist_id = *report.created().first().expect("checklist created");
    let tasks = stack
        .checklists
        .tasks_for(checklist_id)
        .await
        .expect("tasks should load");

    let handles: Vec<_> = tasks
        .iter()
        .map(|task| {
            let application = Arc::clone(&stack.application);
            let task_id = task.id();
            tokio::spawn(async move { application.set_task_completed(task_id, true).await })
        })
        .collect();
    let mut archived_reports = 0;
    for handle in handles {
        let outcome = handle
            .await
            .expect("task should not panic")
            .expect("toggle should succeed");
        if outcome.archived() {
            archived_reports += 1;
        }
    }

    assert!(archived_reports >= 1);
    let stored = stack
        .checklists
        .find_by_id(checklist_id)
        .await
        .expect("lookup should succeed")
        .expect("checklist should exist");
    assert!(stored.is_history());
}
