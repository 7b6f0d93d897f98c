//! Serves the checklist HTTP API against `PostgreSQL`.
//!
//! Configuration is read from the environment (and `.env` when present);
//! see [`punchlist::config`] for the variables. The database schema is
//! expected to be migrated already.

use std::sync::Arc;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use punchlist::{
    api::{AppState, ChecklistApplication, router},
    checklist::adapters::postgres::{PostgresChecklistRepository, PostgresTemplateRepository},
    config::ServiceConfig,
    telemetry,
    user::adapters::postgres::PostgresUserRepository,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = ServiceConfig::from_env()?;
    telemetry::init_tracing(config.log_filter())?;

    let manager = ConnectionManager::<PgConnection>::new(config.database_url());
    let pool = Pool::builder()
        .max_size(config.pool_size())
        .build(manager)?;

    let application = ChecklistApplication::new(
        Arc::new(PostgresChecklistRepository::new(pool.clone())),
        Arc::new(PostgresTemplateRepository::new(pool.clone())),
        Arc::new(PostgresUserRepository::new(pool)),
        Arc::new(DefaultClock),
        config.assignment(),
    );
    let app = router(AppState::new(Arc::new(application)));

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(
        address = %config.bind_address(),
        claim_policy = config.assignment().claim_policy().as_str(),
        "punchlist listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("punchlist stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
