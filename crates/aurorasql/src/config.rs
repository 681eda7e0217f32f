//! Connection and session configuration.

use crate::error::{AuroraError, AuroraResult};
use crate::monitor::SqlLogger;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::Level;

pub const ENV_RESOURCE_ARN: &str = "AURORA_RESOURCE_ARN";
pub const ENV_SECRET_ARN: &str = "AURORA_SECRET_ARN";
pub const ENV_DATABASE: &str = "AURORA_DATABASE";

/// Identifies the cluster, the credentials secret and the database every
/// Data API request targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    pub resource_arn: String,
    pub secret_arn: String,
    pub database: String,
}

impl ConnectionConfig {
    pub fn new(
        resource_arn: impl Into<String>,
        secret_arn: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            resource_arn: resource_arn.into(),
            secret_arn: secret_arn.into(),
            database: database.into(),
        }
    }

    /// Read `AURORA_RESOURCE_ARN`, `AURORA_SECRET_ARN` and `AURORA_DATABASE`.
    pub fn from_env() -> AuroraResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AuroraResult<Self> {
        let read = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AuroraError::validation(format!("environment variable {key} is not set")))
        };
        Ok(Self {
            resource_arn: read(ENV_RESOURCE_ARN)?,
            secret_arn: read(ENV_SECRET_ARN)?,
            database: read(ENV_DATABASE)?,
        })
    }
}

/// Configuration for [`Session`](crate::Session).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub connection: ConnectionConfig,
    /// Per-call timeout for Data API requests.
    pub query_timeout: Option<Duration>,
    /// Statement logging.
    pub sql_logger: SqlLogger,
}

impl SessionConfig {
    /// Create a new configuration with defaults.
    pub fn new(connection: ConnectionConfig) -> Self {
        Self {
            connection,
            query_timeout: None,
            sql_logger: SqlLogger::default(),
        }
    }

    /// Set query timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.query_timeout = Some(duration);
        self
    }

    /// Remove the query timeout.
    pub fn no_timeout(mut self) -> Self {
        self.query_timeout = None;
        self
    }

    /// Replace the SQL logger.
    pub fn sql_logger(mut self, logger: SqlLogger) -> Self {
        self.sql_logger = logger;
        self
    }

    /// Set the level statements are logged at.
    pub fn log_level(mut self, level: Level) -> Self {
        self.sql_logger.level = level;
        self
    }

    /// Set the maximum logged SQL length.
    pub fn max_logged_sql(mut self, len: usize) -> Self {
        self.sql_logger.max_sql_length = Some(len);
        self
    }

    /// Disable statement logging.
    pub fn no_logging(mut self) -> Self {
        self.sql_logger.enabled = false;
        self
    }
}

impl From<ConnectionConfig> for SessionConfig {
    fn from(connection: ConnectionConfig) -> Self {
        Self::new(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_reads_all_three_keys() {
        let env: HashMap<&str, &str> = [
            (ENV_RESOURCE_ARN, "arn:aws:rds:eu-west-1:1:cluster:c"),
            (ENV_SECRET_ARN, "arn:aws:secretsmanager:eu-west-1:1:secret:s"),
            (ENV_DATABASE, "app"),
        ]
        .into_iter()
        .collect();

        let config = ConnectionConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.database, "app");
        assert!(config.resource_arn.ends_with("cluster:c"));
    }

    #[test]
    fn missing_key_is_named() {
        let err = ConnectionConfig::from_lookup(|k| (k != ENV_DATABASE).then(|| "x".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_DATABASE));
    }

    #[test]
    fn deserializes_camel_case() {
        let config: ConnectionConfig = serde_json::from_str(
            r#"{"resourceArn":"r","secretArn":"s","database":"d"}"#,
        )
        .unwrap();
        assert_eq!(config, ConnectionConfig::new("r", "s", "d"));
    }

    #[test]
    fn session_builder() {
        let config = SessionConfig::new(ConnectionConfig::new("r", "s", "d"))
            .timeout(Duration::from_secs(5))
            .log_level(Level::INFO)
            .max_logged_sql(50);
        assert_eq!(config.query_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.sql_logger.level, Level::INFO);
        assert_eq!(config.sql_logger.max_sql_length, Some(50));
        assert!(!config.no_logging().sql_logger.enabled);
    }
}
