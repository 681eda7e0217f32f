//! A frozen, compiled SELECT/DELETE statement.

use crate::client::Executor;
use crate::error::{AuroraError, AuroraResult};
use crate::qb::compile;
use crate::qb::model::{QueryModel, StatementKind};
use crate::qb::traits::{BuiltStatement, SqlStatement};
use crate::row::{FromRow, Row, decode_rows};
use crate::value::{Params, Value};
use std::sync::OnceLock;

/// A validated query produced by [`QueryBuilder::build`](crate::qb::QueryBuilder::build).
///
/// The model cannot change any more, so the SQL text is compiled on first use
/// and cached. Parameters may still be (re)bound; they never affect the SQL.
#[derive(Debug, Clone)]
pub struct Query {
    model: QueryModel,
    params: Params,
    sql: OnceLock<String>,
}

impl Query {
    pub(crate) fn new(model: QueryModel, params: Params) -> Self {
        Self {
            model,
            params,
            sql: OnceLock::new(),
        }
    }

    /// The compiled SQL text (compiled once, then cached).
    pub fn sql(&self) -> &str {
        self.sql.get_or_init(|| compile::render(&self.model))
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn model(&self) -> &QueryModel {
        &self.model
    }

    pub fn kind(&self) -> StatementKind {
        self.model.kind().unwrap_or(StatementKind::Select)
    }

    /// Field names result rows are keyed by.
    pub fn field_names(&self) -> Vec<String> {
        compile::result_field_names(&self.model)
    }

    /// Bind a named parameter.
    pub fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Replace all parameters.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    // ==================== Execution ====================

    /// Execute and decode all rows.
    pub async fn fetch_all(&self, conn: &impl Executor) -> AuroraResult<Vec<Row>> {
        if self.kind() == StatementKind::Delete {
            return Err(AuroraError::validation(
                "DELETE statements return no rows; use execute()",
            ));
        }
        let output = conn.execute_sql(self.sql(), &self.params).await?;
        match output.records {
            Some(records) => decode_rows(&self.field_names(), records),
            None => Ok(Vec::new()),
        }
    }

    /// Execute and map all rows to `T`.
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl Executor) -> AuroraResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute and return the first row, if any.
    pub async fn fetch_opt(&self, conn: &impl Executor) -> AuroraResult<Option<Row>> {
        Ok(self.fetch_all(conn).await?.into_iter().next())
    }

    /// Execute and map the first row to `T`, if any.
    pub async fn fetch_opt_as<T: FromRow>(&self, conn: &impl Executor) -> AuroraResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }
}

impl SqlStatement for Query {
    fn to_statement(&self) -> AuroraResult<BuiltStatement> {
        Ok(BuiltStatement::new(self.sql(), self.params.clone()))
    }
}
