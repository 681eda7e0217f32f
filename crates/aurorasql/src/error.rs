//! Error types for aurorasql

use std::time::Duration;
use thiserror::Error;

/// Result type alias for aurorasql operations
pub type AuroraResult<T> = Result<T, AuroraError>;

/// Marker the Data API puts in errors while a paused cluster resumes.
const WAKING_MARKER: &str = "Communications link failure";

/// Error types for query building and execution
#[derive(Debug, Error)]
pub enum AuroraError {
    /// `limit` was called with an unsupported number of arguments
    #[error("limit expects 1 or 2 arguments, got {}: {args:?}", .args.len())]
    InvalidLimit { args: Vec<u64> },

    /// Neither `select` nor `delete` was called
    #[error("query has no statement: call select() or delete() first")]
    MissingStatement,

    /// `select` was called without any field, or with a blank one
    #[error("select projection is empty or has a blank entry")]
    EmptyProjection,

    /// `delete` was called with an empty table name
    #[error("delete target table is empty")]
    EmptyDeleteTarget,

    /// SELECT without a FROM source
    #[error("select statement has no FROM source")]
    MissingFrom,

    /// UNION branches attached to a DELETE statement
    #[error("UNION is only supported on SELECT statements (delete target: {table})")]
    UnionOnDelete { table: String },

    /// A parameter value that cannot be sent over the wire
    #[error("unsupported parameter '{key}': {kind} values cannot be bound")]
    UnsupportedParam { key: String, kind: &'static str },

    /// A returned row does not match the projection
    #[error("row {row} has {got} values but {expected} fields were selected")]
    RowShape {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// Value decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The cluster is resuming from a pause
    #[error("database is still waking up, try again in a minute: {0}")]
    DatabaseWaking(String),

    /// Transport error reported by the Data API client
    #[error("Transport error: {0}")]
    Transport(String),

    /// Query timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(Duration),

    /// A statement of a script failed
    #[error("script statement #{index} failed ({statement}): {source}")]
    Script {
        index: usize,
        statement: String,
        #[source]
        source: Box<AuroraError>,
    },

    /// I/O error (script files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl AuroraError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an unsupported parameter error
    pub fn unsupported_param(key: impl Into<String>, kind: &'static str) -> Self {
        Self::UnsupportedParam {
            key: key.into(),
            kind,
        }
    }

    /// Classify a transport failure message.
    ///
    /// Messages carrying the Data API's link failure marker become
    /// [`AuroraError::DatabaseWaking`], everything else is a plain transport error.
    pub fn from_transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(WAKING_MARKER) {
            Self::DatabaseWaking(message)
        } else {
            Self::Transport(message)
        }
    }

    /// Check if this error is a builder misuse detected before execution
    pub fn is_builder_misuse(&self) -> bool {
        matches!(
            self,
            Self::InvalidLimit { .. }
                | Self::MissingStatement
                | Self::EmptyProjection
                | Self::EmptyDeleteTarget
                | Self::MissingFrom
                | Self::UnionOnDelete { .. }
        )
    }

    /// Check if this is a waking-database error (worth retrying later)
    pub fn is_database_waking(&self) -> bool {
        matches!(self, Self::DatabaseWaking(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_messages_are_classified() {
        let err = AuroraError::from_transport(
            "BadRequestException: Communications link failure\n\nThe last packet sent...",
        );
        assert!(err.is_database_waking());

        let err = AuroraError::from_transport("AccessDeniedException");
        assert!(matches!(err, AuroraError::Transport(ref m) if m == "AccessDeniedException"));
    }

    #[test]
    fn limit_error_reports_arity() {
        let err = AuroraError::InvalidLimit { args: vec![1, 2, 3] };
        assert_eq!(
            err.to_string(),
            "limit expects 1 or 2 arguments, got 3: [1, 2, 3]"
        );
        assert!(err.is_builder_misuse());
    }
}
