//! Sessions and transactions on top of a [`DataApiClient`].
//!
//! A [`Session`] pairs a transport with its [`SessionConfig`]. Both the session
//! and every [`Transaction`] it starts implement [`Executor`], so builders and
//! repository code can take `&impl Executor` and run either way.
//!
//! For ergonomic commit/rollback handling, use the [`transaction!`](crate::transaction) macro.
//!
//! # Example
//!
//! ```ignore
//! use aurorasql::{qb, AuroraResult, Session, SessionConfig, ConnectionConfig};
//!
//! # async fn demo(client: impl aurorasql::DataApiClient) -> AuroraResult<()> {
//! let session = Session::new(client, ConnectionConfig::from_env()?);
//!
//! aurorasql::transaction!(&session, tx, {
//!     qb::update("accounts")
//!         .set_expr("balance = balance - :amount")
//!         .where_("id = :id")
//!         .bind("amount", 100)
//!         .bind("id", 1)
//!         .execute(&tx)
//!         .await?;
//!     Ok(())
//! })?;
//! # Ok(()) }
//! ```

use crate::client::{DataApiClient, Executor};
use crate::config::{ConnectionConfig, SessionConfig};
use crate::error::{AuroraError, AuroraResult};
use crate::monitor::SQL_TARGET;
use crate::value::Params;
use crate::wire::{
    BatchExecuteStatementOutput, BatchExecuteStatementRequest, BeginTransactionRequest,
    EndTransactionRequest, ExecuteStatementOutput, ExecuteStatementRequest,
};
use std::future::Future;

/// Runs the given block inside a Data API transaction.
///
/// - Begins a transaction via `$session.begin().await`.
/// - Commits on `Ok(_)`.
/// - Rolls back on `Err(_)`.
///
/// The block must evaluate to `aurorasql::AuroraResult<T>`.
#[macro_export]
macro_rules! transaction {
    ($session:expr, $tx:ident, $body:block) => {{
        let $tx = ($session).begin().await?;

        let __aurorasql_tx_body_result = async { $body }.await;
        match __aurorasql_tx_body_result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(error) => match $tx.rollback().await {
                Ok(()) => Err(error),
                Err(rollback_err) => Err($crate::AuroraError::Other(format!(
                    "{error} (rollback failed: {rollback_err})"
                ))),
            },
        }
    }};
}

/// A configured connection to one Aurora database.
#[derive(Debug, Clone)]
pub struct Session<C: DataApiClient> {
    client: C,
    config: SessionConfig,
}

impl<C: DataApiClient> Session<C> {
    pub fn new(client: C, config: impl Into<SessionConfig>) -> Self {
        Self {
            client,
            config: config.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.config.connection
    }

    /// Start a transaction.
    pub async fn begin(&self) -> AuroraResult<Transaction<'_, C>> {
        let conn = self.connection();
        let request = BeginTransactionRequest {
            resource_arn: conn.resource_arn.clone(),
            secret_arn: conn.secret_arn.clone(),
            database: conn.database.clone(),
        };
        let id = self
            .with_timeout(self.client.begin_transaction(request))
            .await?;
        tracing::debug!(target: SQL_TARGET, transaction = %id, "transaction started");

        Ok(Transaction {
            session: self,
            id,
            finished: false,
        })
    }

    async fn with_timeout<T>(
        &self,
        call: impl Future<Output = AuroraResult<T>>,
    ) -> AuroraResult<T> {
        match self.config.query_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| AuroraError::Timeout(limit))?,
            None => call.await,
        }
    }

    async fn run_statement(
        &self,
        sql: &str,
        params: &Params,
        transaction_id: Option<&str>,
    ) -> AuroraResult<ExecuteStatementOutput> {
        let parameters = params.to_sql_parameters()?;
        self.config
            .sql_logger
            .statement(sql, parameters.len(), 1, transaction_id);

        let conn = self.connection();
        let request = ExecuteStatementRequest {
            resource_arn: conn.resource_arn.clone(),
            secret_arn: conn.secret_arn.clone(),
            database: conn.database.clone(),
            sql: sql.to_string(),
            parameters,
            transaction_id: transaction_id.map(str::to_string),
        };
        self.with_timeout(self.client.execute_statement(request))
            .await
    }

    async fn run_batch(
        &self,
        sql: &str,
        param_sets: &[Params],
        transaction_id: Option<&str>,
    ) -> AuroraResult<BatchExecuteStatementOutput> {
        let parameter_sets = param_sets
            .iter()
            .map(Params::to_sql_parameters)
            .collect::<AuroraResult<Vec<_>>>()?;
        let param_count = parameter_sets.first().map_or(0, Vec::len);
        self.config
            .sql_logger
            .statement(sql, param_count, parameter_sets.len(), transaction_id);

        let conn = self.connection();
        let request = BatchExecuteStatementRequest {
            resource_arn: conn.resource_arn.clone(),
            secret_arn: conn.secret_arn.clone(),
            database: conn.database.clone(),
            sql: sql.to_string(),
            parameter_sets,
            transaction_id: transaction_id.map(str::to_string),
        };
        self.with_timeout(self.client.batch_execute_statement(request))
            .await
    }

    fn end_request(&self, transaction_id: &str) -> EndTransactionRequest {
        let conn = self.connection();
        EndTransactionRequest {
            resource_arn: conn.resource_arn.clone(),
            secret_arn: conn.secret_arn.clone(),
            transaction_id: transaction_id.to_string(),
        }
    }
}

impl<C: DataApiClient> Executor for Session<C> {
    fn execute_sql(
        &self,
        sql: &str,
        params: &Params,
    ) -> impl Future<Output = AuroraResult<ExecuteStatementOutput>> + Send {
        self.run_statement(sql, params, None)
    }

    fn batch_execute_sql(
        &self,
        sql: &str,
        param_sets: &[Params],
    ) -> impl Future<Output = AuroraResult<BatchExecuteStatementOutput>> + Send {
        self.run_batch(sql, param_sets, None)
    }
}

/// An open Data API transaction.
///
/// Finish it with [`Transaction::commit`] or [`Transaction::rollback`]. A
/// transaction dropped while still open is left to the Data API, which
/// expires it after a few minutes; a warning is logged.
#[derive(Debug)]
pub struct Transaction<'a, C: DataApiClient> {
    session: &'a Session<C>,
    id: String,
    finished: bool,
}

impl<C: DataApiClient> Transaction<'_, C> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn commit(mut self) -> AuroraResult<()> {
        self.finished = true;
        let request = self.session.end_request(&self.id);
        self.session
            .with_timeout(self.session.client.commit_transaction(request))
            .await?;
        tracing::debug!(target: SQL_TARGET, transaction = %self.id, "transaction committed");
        Ok(())
    }

    pub async fn rollback(mut self) -> AuroraResult<()> {
        self.finished = true;
        let request = self.session.end_request(&self.id);
        self.session
            .with_timeout(self.session.client.rollback_transaction(request))
            .await?;
        tracing::debug!(target: SQL_TARGET, transaction = %self.id, "transaction rolled back");
        Ok(())
    }
}

impl<C: DataApiClient> Executor for Transaction<'_, C> {
    fn execute_sql(
        &self,
        sql: &str,
        params: &Params,
    ) -> impl Future<Output = AuroraResult<ExecuteStatementOutput>> + Send {
        self.session.run_statement(sql, params, Some(&self.id))
    }

    fn batch_execute_sql(
        &self,
        sql: &str,
        param_sets: &[Params],
    ) -> impl Future<Output = AuroraResult<BatchExecuteStatementOutput>> + Send {
        self.session.run_batch(sql, param_sets, Some(&self.id))
    }

    fn transaction_id(&self) -> Option<&str> {
        Some(&self.id)
    }
}

impl<C: DataApiClient> Drop for Transaction<'_, C> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(
                target: SQL_TARGET,
                transaction = %self.id,
                "transaction dropped without commit or rollback"
            );
        }
    }
}
