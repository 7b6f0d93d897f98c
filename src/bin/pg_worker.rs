//! Runs embedded `PostgreSQL` lifecycle steps for the integration tests when
//! they execute as root.
//!
//! ```text
//! pg_worker <setup|start|stop> <payload.json>
//! ```
//!
//! The payload is a serialized `WorkerPayload` holding the cluster settings
//! and environment overrides. `PostgreSQL` refuses to run as root, so the
//! worker switches to `nobody` before it touches the data directory.

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(unix)]
fn main() -> Result<(), BoxError> {
    worker::run(std::env::args_os().skip(1)).map_err(Into::into)
}

#[cfg(not(unix))]
fn main() -> Result<(), BoxError> {
    Err("pg_worker requires a Unix host".into())
}

#[cfg(unix)]
mod worker {
    use std::ffi::{CString, OsString};
    use std::io::Read;
    use std::mem::ManuallyDrop;

    use camino::Utf8Path;
    use nix::unistd::{Uid, User, initgroups, setgid, setuid};
    use pg_embedded_setup_unpriv::ambient_dir_and_path;
    use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
    use postgresql_embedded::{PostgreSQL, Status};
    use thiserror::Error;

    use super::BoxError;

    const UNPRIVILEGED_USER: &str = "nobody";

    /// Failures surfaced to the test harness through the exit status.
    #[derive(Debug, Error)]
    pub enum WorkerError {
        /// Arguments did not match `<operation> <payload>`.
        #[error("usage: pg_worker <setup|start|stop> <payload.json>: {0}")]
        Usage(String),
        /// The payload file could not be read or parsed.
        #[error("failed to load payload {path}: {source}")]
        Payload {
            /// Payload path as given.
            path: String,
            /// Underlying failure.
            #[source]
            source: BoxError,
        },
        /// Switching to the unprivileged user failed.
        #[error("failed to drop privileges: {0}")]
        Privileges(String),
        /// The payload settings were rejected.
        #[error("invalid cluster settings: {0}")]
        Settings(String),
        /// The async runtime could not be built.
        #[error("failed to build runtime: {0}")]
        Runtime(#[source] std::io::Error),
        /// A `PostgreSQL` lifecycle call failed.
        #[error("postgres {operation} failed: {message}")]
        Postgres {
            /// Lifecycle step.
            operation: &'static str,
            /// Error reported by `postgresql_embedded`.
            message: String,
        },
    }

    /// Lifecycle step requested by the harness.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Operation {
        /// Install binaries and initialise the data directory.
        Setup,
        /// Start the server and leave it running.
        Start,
        /// Stop the server.
        Stop,
    }

    impl Operation {
        const fn as_str(self) -> &'static str {
            match self {
                Self::Setup => "setup",
                Self::Start => "start",
                Self::Stop => "stop",
            }
        }
    }

    impl TryFrom<&str> for Operation {
        type Error = WorkerError;

        fn try_from(value: &str) -> Result<Self, Self::Error> {
            match value {
                "setup" => Ok(Self::Setup),
                "start" => Ok(Self::Start),
                "stop" => Ok(Self::Stop),
                other => Err(WorkerError::Usage(format!("unknown operation '{other}'"))),
            }
        }
    }

    /// Parsed command line.
    #[derive(Debug, PartialEq, Eq)]
    pub struct Invocation {
        /// Requested step.
        pub operation: Operation,
        /// Path of the JSON payload.
        pub payload: String,
    }

    /// Parses `<operation> <payload>` from the arguments after the program
    /// name.
    pub fn parse_args(
        mut args: impl Iterator<Item = OsString>,
    ) -> Result<Invocation, WorkerError> {
        let operation = next_arg(&mut args, "operation")?;
        let operation = Operation::try_from(operation.as_str())?;
        let payload = next_arg(&mut args, "payload path")?;
        if let Some(extra) = args.next() {
            return Err(WorkerError::Usage(format!(
                "unexpected argument '{}'",
                extra.to_string_lossy()
            )));
        }
        Ok(Invocation { operation, payload })
    }

    fn next_arg(
        args: &mut impl Iterator<Item = OsString>,
        name: &str,
    ) -> Result<String, WorkerError> {
        let raw = args
            .next()
            .ok_or_else(|| WorkerError::Usage(format!("missing {name}")))?;
        raw.into_string().map_err(|value| {
            WorkerError::Usage(format!("{name} is not UTF-8: {}", value.to_string_lossy()))
        })
    }

    /// Executes one lifecycle step.
    pub fn run(args: impl Iterator<Item = OsString>) -> Result<(), WorkerError> {
        let invocation = parse_args(args)?;
        let payload = load_payload(Utf8Path::new(&invocation.payload)).map_err(|source| {
            WorkerError::Payload {
                path: invocation.payload.clone(),
                source,
            }
        })?;
        drop_privileges()?;
        let settings = payload
            .settings
            .into_settings()
            .map_err(|err| WorkerError::Settings(err.to_string()))?;
        apply_environment(&payload.environment);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(WorkerError::Runtime)?;
        let operation = invocation.operation;
        let mut postgres = PostgreSQL::new(settings);
        match operation {
            Operation::Setup => runtime.block_on(async {
                postgres.setup().await.map_err(|err| failed(operation, &err))?;
                ensure_started(&mut postgres, operation).await
            }),
            Operation::Start => {
                runtime.block_on(ensure_started(&mut postgres, operation))?;
                // Dropping the handle would stop the server the tests need.
                let _running = ManuallyDrop::new(postgres);
                Ok(())
            }
            Operation::Stop => runtime.block_on(async move {
                postgres.stop().await.map_err(|err| failed(operation, &err))
            }),
        }
    }

    async fn ensure_started(
        postgres: &mut PostgreSQL,
        operation: Operation,
    ) -> Result<(), WorkerError> {
        if matches!(postgres.status(), Status::Started) {
            return Ok(());
        }
        postgres.start().await.map_err(|err| failed(operation, &err))
    }

    fn failed(operation: Operation, err: &impl std::fmt::Display) -> WorkerError {
        WorkerError::Postgres {
            operation: operation.as_str(),
            message: err.to_string(),
        }
    }

    fn load_payload(path: &Utf8Path) -> Result<WorkerPayload, BoxError> {
        let (dir, relative) = ambient_dir_and_path(path)?;
        let mut bytes = Vec::new();
        dir.open(relative.as_std_path())?.read_to_end(&mut bytes)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn drop_privileges() -> Result<(), WorkerError> {
        if !Uid::effective().is_root() {
            return Ok(());
        }
        let user = User::from_name(UNPRIVILEGED_USER)
            .map_err(privileges)?
            .ok_or_else(|| privileges(format!("user '{UNPRIVILEGED_USER}' not found")))?;
        let name = CString::new(user.name.clone()).map_err(privileges)?;
        initgroups(&name, user.gid).map_err(privileges)?;
        setgid(user.gid).map_err(privileges)?;
        setuid(user.uid).map_err(privileges)?;

        // SAFETY: no other thread exists yet; the runtime is built afterwards.
        unsafe {
            std::env::set_var("HOME", &user.dir);
            std::env::set_var("USER", &user.name);
            std::env::set_var("LOGNAME", &user.name);
        }
        Ok(())
    }

    fn privileges(err: impl std::fmt::Display) -> WorkerError {
        WorkerError::Privileges(err.to_string())
    }

    fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
        for (key, value) in environment {
            // SAFETY: no other thread exists yet; the runtime is built afterwards.
            unsafe {
                match value {
                    Some(secret) => std::env::set_var(key, secret.expose()),
                    None => std::env::remove_var(key),
                }
            }
        }
    }

}
