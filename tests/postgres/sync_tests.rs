//! Template loading and synchronization tests against `PostgreSQL`.

use std::sync::Arc;

use crate::postgres::helpers::{TestDatabase, database};
use mockable::DefaultClock;
use punchlist::checklist::{
    adapters::postgres::{PostgresChecklistRepository, PostgresTemplateRepository},
    domain::WorkOrderId,
    ports::{ChecklistRepository, TemplateRepository},
    services::{ChecklistSyncService, SyncWorkOrderRequest},
};
use rstest::rstest;

const SEED_TEMPLATE_SQL: &str = "INSERT INTO default_todos (position, text) VALUES \
     (2, 'Clean'), (1, 'Inspect'), (3, 'Report');";

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn template_loads_in_position_order(#[from(database)] db: TestDatabase) {
    db.execute(SEED_TEMPLATE_SQL).expect("seed template");
    let templates = PostgresTemplateRepository::new(db.pool());

    let template = templates.load().await.expect("template should load");

    assert_eq!(template.texts(), ["Inspect", "Clean", "Report"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sync_seeds_once_per_work_order(#[from(database)] db: TestDatabase) {
    db.execute(SEED_TEMPLATE_SQL).expect("seed template");
    let checklists = Arc::new(PostgresChecklistRepository::new(db.pool()));
    let service = ChecklistSyncService::new(
        Arc::clone(&checklists),
        Arc::new(PostgresTemplateRepository::new(db.pool())),
        Arc::new(DefaultClock),
    );
    let batch = || {
        vec![
            SyncWorkOrderRequest::new("WO-1", "Pump service")
                .with_project_number("P-7")
                .with_project_name("North plant"),
            SyncWorkOrderRequest::new("WO-2", "Valve swap"),
        ]
    };

    let first = service
        .sync_work_orders(batch())
        .await
        .expect("sync should succeed");
    let second = service
        .sync_work_orders(batch())
        .await
        .expect("sync should succeed");

    assert_eq!(first.created().len(), 2);
    assert!(second.created().is_empty());
    assert_eq!(second.skipped().len(), 2);

    let work_order = WorkOrderId::new("WO-1").expect("valid id");
    let checklist = checklists
        .find_by_work_order(&work_order)
        .await
        .expect("lookup should succeed")
        .expect("checklist should exist");
    assert_eq!(checklist.belongs_to(), "P-7 North plant");
    let tasks = checklists
        .tasks_for(checklist.id())
        .await
        .expect("tasks should load");
    assert_eq!(tasks.len(), 3);
}
