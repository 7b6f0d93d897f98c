//! Search tests against `PostgreSQL`.

use crate::postgres::helpers::{TestDatabase, database, seeded_checklist};
use punchlist::checklist::{
    adapters::postgres::PostgresChecklistRepository,
    domain::ChecklistQuery,
    ports::ChecklistRepository,
};
use rstest::rstest;

async fn store_named(repo: &PostgresChecklistRepository, work_order: &str, name: &str) {
    let (checklist, tasks) = seeded_checklist(work_order, name);
    repo.store_with_tasks(&checklist, &tasks)
        .await
        .expect("store should succeed");
}

fn work_orders(found: &[punchlist::checklist::domain::Checklist]) -> Vec<&str> {
    found
        .iter()
        .map(|checklist| checklist.work_order_id().as_str())
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_is_case_insensitive_and_newest_first(#[from(database)] db: TestDatabase) {
    let repo = PostgresChecklistRepository::new(db.pool());
    store_named(&repo, "WO-1", "Inspect pump").await;
    store_named(&repo, "WO-2", "Replace valve").await;
    store_named(&repo, "WO-3", "INSPECT boiler").await;

    let found = repo
        .search(&ChecklistQuery::new("inspect", 10))
        .await
        .expect("search should succeed");
    assert_eq!(work_orders(&found), vec!["WO-3", "WO-1"]);

    let capped = repo
        .search(&ChecklistQuery::new("", 2))
        .await
        .expect("search should succeed");
    assert_eq!(work_orders(&capped), vec!["WO-3", "WO-2"]);

    let none = repo
        .search(&ChecklistQuery::new("", 0))
        .await
        .expect("search should succeed");
    assert!(none.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_treats_wildcards_literally(#[from(database)] db: TestDatabase) {
    let repo = PostgresChecklistRepository::new(db.pool());
    store_named(&repo, "WO-1", "100% torque check").await;
    store_named(&repo, "WO-2", "1000 hour service").await;
    store_named(&repo, "WO-3", "valve_a swap").await;
    store_named(&repo, "WO-4", "valve b swap").await;

    let percent = repo
        .search(&ChecklistQuery::new("100%", 10))
        .await
        .expect("search should succeed");
    assert_eq!(work_orders(&percent), vec!["WO-1"]);

    let underscore = repo
        .search(&ChecklistQuery::new("valve_", 10))
        .await
        .expect("search should succeed");
    assert_eq!(work_orders(&underscore), vec!["WO-3"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archived_checklists_are_hidden_unless_requested(#[from(database)] db: TestDatabase) {
    let repo = PostgresChecklistRepository::new(db.pool());
    let (checklist, tasks) = seeded_checklist("WO-1", "Pump service");
    repo.store_with_tasks(&checklist, &tasks)
        .await
        .expect("store should succeed");
    for task in &tasks {
        repo.set_task_completed(task.id(), true)
            .await
            .expect("toggle should succeed");
    }
    repo.mark_archived(checklist.id())
        .await
        .expect("archival should succeed");

    let active = repo
        .search(&ChecklistQuery::new("pump", 10))
        .await
        .expect("search should succeed");
    assert!(active.is_empty());

    let history = repo
        .search(&ChecklistQuery::new("pump", 10).including_history())
        .await
        .expect("search should succeed");
    assert_eq!(work_orders(&history), vec!["WO-1"]);
}
