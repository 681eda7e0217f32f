//! Transport and executor traits.
//!
//! [`DataApiClient`] is the raw Data API surface a transport implements (for
//! example on top of an AWS SDK client). [`Executor`] is what query builders run
//! against; it is implemented by [`Session`](crate::Session) and
//! [`Transaction`](crate::Transaction), so the same code works inside and outside
//! a transaction.

use crate::error::AuroraResult;
use crate::value::Params;
use crate::wire::{
    BatchExecuteStatementOutput, BatchExecuteStatementRequest, BeginTransactionRequest,
    EndTransactionRequest, ExecuteStatementOutput, ExecuteStatementRequest,
};
use std::future::Future;
use std::sync::Arc;

/// The five Data API operations used by this crate.
///
/// Implementations should report service failures with
/// [`AuroraError::from_transport`](crate::AuroraError::from_transport) so that
/// "database is waking up" conditions are classified consistently.
pub trait DataApiClient: Send + Sync {
    fn execute_statement(
        &self,
        request: ExecuteStatementRequest,
    ) -> impl Future<Output = AuroraResult<ExecuteStatementOutput>> + Send;

    fn batch_execute_statement(
        &self,
        request: BatchExecuteStatementRequest,
    ) -> impl Future<Output = AuroraResult<BatchExecuteStatementOutput>> + Send;

    /// Start a transaction and return its id.
    fn begin_transaction(
        &self,
        request: BeginTransactionRequest,
    ) -> impl Future<Output = AuroraResult<String>> + Send;

    fn commit_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> impl Future<Output = AuroraResult<()>> + Send;

    fn rollback_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> impl Future<Output = AuroraResult<()>> + Send;
}

impl<T: DataApiClient> DataApiClient for Arc<T> {
    fn execute_statement(
        &self,
        request: ExecuteStatementRequest,
    ) -> impl Future<Output = AuroraResult<ExecuteStatementOutput>> + Send {
        (**self).execute_statement(request)
    }

    fn batch_execute_statement(
        &self,
        request: BatchExecuteStatementRequest,
    ) -> impl Future<Output = AuroraResult<BatchExecuteStatementOutput>> + Send {
        (**self).batch_execute_statement(request)
    }

    fn begin_transaction(
        &self,
        request: BeginTransactionRequest,
    ) -> impl Future<Output = AuroraResult<String>> + Send {
        (**self).begin_transaction(request)
    }

    fn commit_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> impl Future<Output = AuroraResult<()>> + Send {
        (**self).commit_transaction(request)
    }

    fn rollback_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> impl Future<Output = AuroraResult<()>> + Send {
        (**self).rollback_transaction(request)
    }
}

/// Something that can run SQL text with named parameters.
pub trait Executor: Send + Sync {
    /// Execute one statement.
    fn execute_sql(
        &self,
        sql: &str,
        params: &Params,
    ) -> impl Future<Output = AuroraResult<ExecuteStatementOutput>> + Send;

    /// Execute one statement once per parameter set.
    fn batch_execute_sql(
        &self,
        sql: &str,
        param_sets: &[Params],
    ) -> impl Future<Output = AuroraResult<BatchExecuteStatementOutput>> + Send;

    /// Id of the transaction statements run in, if any.
    fn transaction_id(&self) -> Option<&str> {
        None
    }
}

/// Affected row count reported by an execute call (0 when absent).
pub(crate) fn affected_rows(output: &ExecuteStatementOutput) -> u64 {
    output
        .number_of_records_updated
        .map_or(0, |n| u64::try_from(n).unwrap_or(0))
}
