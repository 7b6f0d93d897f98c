//! Process configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | required |
//! | `PUNCHLIST_BIND_ADDRESS` | `0.0.0.0:8080` |
//! | `PUNCHLIST_POOL_SIZE` | `8` |
//! | `PUNCHLIST_SEARCH_MAX_LIMIT` | `100` |
//! | `PUNCHLIST_CLAIM_POLICY` | `reassign` |
//! | `PUNCHLIST_LOG` | `info` |

use std::net::{Ipv4Addr, SocketAddr};

use thiserror::Error;

use crate::checklist::{
    domain::{ClaimPolicy, ParseClaimPolicyError},
    services::AssignmentConfig,
};

const DATABASE_URL: &str = "DATABASE_URL";
const BIND_ADDRESS: &str = "PUNCHLIST_BIND_ADDRESS";
const POOL_SIZE: &str = "PUNCHLIST_POOL_SIZE";
const SEARCH_MAX_LIMIT: &str = "PUNCHLIST_SEARCH_MAX_LIMIT";
const CLAIM_POLICY: &str = "PUNCHLIST_CLAIM_POLICY";
const LOG_FILTER: &str = "PUNCHLIST_LOG";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_LOG_FILTER: &str = "info";

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    /// A variable is set to a value that cannot be parsed.
    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Parser message.
        reason: String,
    },
}

/// Settings for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    database_url: String,
    bind_address: SocketAddr,
    pool_size: u32,
    assignment: AssignmentConfig,
    log_filter: String,
}

impl ServiceConfig {
    /// Loads `.env` when present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case outside development.
        match dotenvy::dotenv() {
            Err(err) if !err.not_found() => {
                return Err(ConfigError::Invalid {
                    name: ".env",
                    value: String::new(),
                    reason: err.to_string(),
                });
            }
            _ => {}
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value fails to parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let database_url = read(DATABASE_URL).ok_or(ConfigError::Missing(DATABASE_URL))?;
        let bind_address = parse_or(
            read(BIND_ADDRESS),
            BIND_ADDRESS,
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
        )?;
        let pool_size = parse_or(read(POOL_SIZE), POOL_SIZE, DEFAULT_POOL_SIZE)?;
        if pool_size == 0 {
            return Err(ConfigError::Invalid {
                name: POOL_SIZE,
                value: pool_size.to_string(),
                reason: "pool size must be positive".to_owned(),
            });
        }
        let max_search_limit = parse_or(
            read(SEARCH_MAX_LIMIT),
            SEARCH_MAX_LIMIT,
            AssignmentConfig::DEFAULT_MAX_SEARCH_LIMIT,
        )?;
        let claim_policy = match read(CLAIM_POLICY) {
            Some(raw) => ClaimPolicy::try_from(raw.as_str()).map_err(
                |ParseClaimPolicyError(value)| ConfigError::Invalid {
                    name: CLAIM_POLICY,
                    value,
                    reason: "expected reassign or exclusive".to_owned(),
                },
            )?,
            None => ClaimPolicy::default(),
        };
        let log_filter = read(LOG_FILTER).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());

        Ok(Self {
            database_url,
            bind_address,
            pool_size,
            assignment: AssignmentConfig::new(claim_policy, max_search_limit),
            log_filter,
        })
    }

    /// Returns the `PostgreSQL` connection string.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the HTTP listen address.
    #[must_use]
    pub const fn bind_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }

    /// Returns the assignment settings.
    #[must_use]
    pub const fn assignment(&self) -> AssignmentConfig {
        self.assignment
    }

    /// Returns the default tracing filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

fn parse_or<T>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = raw else {
        return Ok(default);
    };
    value.parse().map_err(|err: T::Err| ConfigError::Invalid {
        name,
        reason: err.to_string(),
        value,
    })
}
