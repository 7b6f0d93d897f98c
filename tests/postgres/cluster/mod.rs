//! Embedded `PostgreSQL` cluster shared by the integration tests.
//!
//! The cluster starts once per test binary. As root, the lifecycle steps run
//! through the `pg_worker` binary, which drops to an unprivileged user first.
//! Setting `PUNCHLIST_TEST_DATABASE_URL` skips the cluster and uses that
//! server instead.


use std::sync::OnceLock;
use std::time::Duration;

use pg_embedded_setup_unpriv::worker_process_test_api::{
    WorkerOperation, WorkerRequest, WorkerRequestArgs, run as run_worker,
};
use pg_embedded_setup_unpriv::{ExecutionPrivileges, TestBootstrapSettings, bootstrap_for_tests};
use postgresql_embedded::{PostgreSQL, Status};
use tokio::runtime::Runtime;

use self::env::{EnvVarGuard, bootstrap_env, env_vars_to_os};
use self::fs::{sync_password_from_file, sync_port_from_pid};
use super::helpers::BoxError;

/// Variable naming an external server to use instead of the cluster.
pub const TEST_DATABASE_URL: &str = "PUNCHLIST_TEST_DATABASE_URL";

/// Database the per-test schemas are created in.
const TEST_DATABASE: &str = "postgres";

static SHARED_CLUSTER: OnceLock<Result<ManagedCluster, String>> = OnceLock::new();

/// Running embedded cluster. It lives for the whole test binary.
pub struct ManagedCluster {
    bootstrap: TestBootstrapSettings,
    env_vars: Vec<(String, Option<String>)>,
    _runtime: Option<Runtime>,
    _postgres: Option<PostgreSQL>,
}

impl ManagedCluster {
    fn start() -> Result<Self, BoxError> {
        let guard = EnvVarGuard::set_many(&bootstrap_env()?);
        let mut bootstrap = bootstrap_for_tests()?;
        drop(guard);
        sync_password_from_file(&mut bootstrap.settings)?;
        let env_vars = bootstrap.environment.to_env();
        let mut cluster = Self {
            bootstrap,
            env_vars,
            _runtime: None,
            _postgres: None,
        };
        match cluster.bootstrap.privileges {
            ExecutionPrivileges::Root => cluster.start_via_worker()?,
            ExecutionPrivileges::Unprivileged => cluster.start_in_process()?,
        }
        sync_port_from_pid(&mut cluster.bootstrap.settings)?;
        Ok(cluster)
    }

    fn start_in_process(&mut self) -> Result<(), BoxError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let guard = EnvVarGuard::set_many(&env_vars_to_os(&self.env_vars));
        let mut postgres = PostgreSQL::new(self.bootstrap.settings.clone());
        runtime.block_on(async {
            postgres.setup().await?;
            if !matches!(postgres.status(), Status::Started) {
                postgres.start().await?;
            }
            Ok::<(), BoxError>(())
        })?;
        drop(guard);
        self.bootstrap.settings = postgres.settings().clone();
        self._runtime = Some(runtime);
        self._postgres = Some(postgres);
        Ok(())
    }

    fn start_via_worker(&self) -> Result<(), BoxError> {
        self.run_worker(WorkerOperation::Setup, self.bootstrap.setup_timeout)?;
        self.run_worker(WorkerOperation::Start, self.bootstrap.start_timeout)
    }

    fn run_worker(&self, operation: WorkerOperation, timeout: Duration) -> Result<(), BoxError> {
        let worker = self
            .bootstrap
            .worker_binary
            .as_ref()
            .ok_or("PG_EMBEDDED_WORKER is not set for worker operation")?;
        let args = WorkerRequestArgs {
            worker: worker.as_path(),
            settings: &self.bootstrap.settings,
            env_vars: &self.env_vars,
            operation,
            timeout,
        };
        run_worker(&WorkerRequest::new(args))?;
        Ok(())
    }

    fn url(&self) -> String {
        self.bootstrap.settings.url(TEST_DATABASE)
    }
}

/// Returns the server the tests run against, starting the embedded cluster
/// on first use.
///
/// # Errors
///
/// Returns an error when the cluster fails to start.
pub fn server_url() -> Result<String, BoxError> {
    if let Some(url) = std::env::var(TEST_DATABASE_URL)
        .ok()
        .filter(|url| !url.trim().is_empty())
    {
        return Ok(url);
    }
    shared_cluster().map(ManagedCluster::url)
}

fn shared_cluster() -> Result<&'static ManagedCluster, BoxError> {
    SHARED_CLUSTER
        .get_or_init(|| {
            // The bootstrap blocks on its own runtime, so it cannot run on a
            // test's runtime thread.
            std::thread::spawn(ManagedCluster::start)
                .join()
                .map_err(|_| "cluster bootstrap thread panicked".to_owned())
                .and_then(|started| started.map_err(|err| err.to_string()))
        })
        .as_ref()
        .map_err(|message| format!("failed to start PostgreSQL: {message}").into())
}
