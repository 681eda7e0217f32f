//! Trait definitions for statement builders.

use crate::client::{Executor, affected_rows};
use crate::error::AuroraResult;
use crate::value::Params;
use std::future::Future;

/// SQL text plus the named parameters it references.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltStatement {
    pub sql: String,
    pub params: Params,
}

impl BuiltStatement {
    pub fn new(sql: impl Into<String>, params: Params) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Base trait for everything that produces one executable statement.
pub trait SqlStatement: Sync {
    /// Build the SQL string and its parameters.
    fn to_statement(&self) -> AuroraResult<BuiltStatement>;

    /// Debug helper to get the SQL string.
    fn to_sql(&self) -> AuroraResult<String> {
        self.to_statement().map(|stmt| stmt.sql)
    }

    /// Execute and return the affected row count.
    fn execute(&self, conn: &impl Executor) -> impl Future<Output = AuroraResult<u64>> + Send {
        async move {
            let stmt = self.to_statement()?;
            let output = conn.execute_sql(&stmt.sql, &stmt.params).await?;
            Ok(affected_rows(&output))
        }
    }
}
