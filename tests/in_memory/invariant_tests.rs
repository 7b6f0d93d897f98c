//! Cross-service invariants over the in-memory stores.

use crate::in_memory::helpers::{Stack, stack};
use punchlist::{
    api::{ApiError, ChecklistOperations},
    checklist::{
        domain::{ChecklistId, ClaimPolicy},
        ports::ChecklistRepository,
        services::SyncWorkOrderRequest,
    },
};
use rstest::rstest;

async fn sync_one(stack: &Stack, work_order: &str, name: &str) -> ChecklistId {
    let report = stack
        .application
        .sync_work_orders(vec![SyncWorkOrderRequest::new(work_order, name)])
        .await
        .expect("sync should succeed");
    *report.created().first().expect("checklist created")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archived_checklists_have_only_completed_tasks(stack: Stack) {
    let first = sync_one(&stack, "WO-1", "Pump service").await;
    let second = sync_one(&stack, "WO-2", "Valve swap").await;
    let first_tasks = stack
        .checklists
        .tasks_for(first)
        .await
        .expect("tasks should load");
    let second_tasks = stack
        .checklists
        .tasks_for(second)
        .await
        .expect("tasks should load");

    for task in &first_tasks {
        stack
            .application
            .set_task_completed(task.id(), true)
            .await
            .expect("toggle should succeed");
    }
    if let Some(task) = second_tasks.first() {
        stack
            .application
            .set_task_completed(task.id(), true)
            .await
            .expect("toggle should succeed");
    }

    for id in [first, second] {
        let checklist = stack
            .checklists
            .find_by_id(id)
            .await
            .expect("lookup should succeed")
            .expect("checklist should exist");
        let tasks = stack
            .checklists
            .tasks_for(id)
            .await
            .expect("tasks should load");
        if checklist.is_history() {
            assert!(tasks.iter().all(|task| task.completed()));
        }
    }
    let active = stack
        .application
        .list_available("", usize::MAX)
        .await
        .expect("search should succeed");
    let ids: Vec<ChecklistId> = active.iter().map(|checklist| checklist.id()).collect();
    assert_eq!(ids, vec![second]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn claim_then_release_returns_to_unassigned(stack: Stack) {
    let checklist_id = sync_one(&stack, "WO-1", "Pump service").await;
    let worker = stack.sign_in("aad-1").await;

    let claimed = stack
        .application
        .claim(checklist_id, worker)
        .await
        .expect("claim should succeed");
    assert_eq!(claimed.owner(), Some(worker));
    let released = stack
        .application
        .release(checklist_id)
        .await
        .expect("release should succeed");

    assert_eq!(released.owner(), None);
    assert!(
        stack
            .application
            .list_assigned(worker)
            .await
            .expect("listing should succeed")
            .is_empty()
    );
}

#[rstest]
#[case(ClaimPolicy::Reassign, true)]
#[case(ClaimPolicy::Exclusive, false)]
#[tokio::test(flavor = "multi_thread")]
async fn second_claim_follows_policy(#[case] policy: ClaimPolicy, #[case] reassigned: bool) {
    let stack = Stack::with_policy(policy);
    let checklist_id = sync_one(&stack, "WO-1", "Pump service").await;
    let ada = stack.sign_in("aad-ada").await;
    let bob = stack.sign_in("aad-bob").await;
    stack
        .application
        .claim(checklist_id, ada)
        .await
        .expect("first claim should succeed");

    let second = stack.application.claim(checklist_id, bob).await;

    if reassigned {
        assert_eq!(second.map(|checklist| checklist.owner()), Ok(Some(bob)));
    } else {
        assert!(matches!(second, Err(ApiError::Conflict(_))));
        let again = stack
            .application
            .claim(checklist_id, ada)
            .await
            .expect("owner may re-claim");
        assert_eq!(again.owner(), Some(ada));
    }
}
