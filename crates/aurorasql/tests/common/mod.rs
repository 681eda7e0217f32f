#![allow(dead_code)]

use aurorasql::wire::{
    BatchExecuteStatementOutput, BatchExecuteStatementRequest, BeginTransactionRequest,
    EndTransactionRequest, ExecuteStatementOutput, ExecuteStatementRequest, Field, UpdateResult,
};
use aurorasql::{AuroraError, AuroraResult, ConnectionConfig, DataApiClient, Session, SessionConfig};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory Data API: records every request and replays canned outputs.
#[derive(Default)]
pub struct MockClient {
    pub executed: Mutex<Vec<ExecuteStatementRequest>>,
    pub batches: Mutex<Vec<BatchExecuteStatementRequest>>,
    /// "begin:<id>", "commit:<id>", "rollback:<id>"
    pub events: Mutex<Vec<String>>,
    outputs: Mutex<VecDeque<ExecuteStatementOutput>>,
    fail_on: Mutex<Option<(String, String)>>,
    fail_rollback: Mutex<bool>,
    delay: Mutex<Option<Duration>>,
    next_tx: Mutex<u32>,
}

impl MockClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the output of the next execute call.
    pub fn push_output(&self, output: ExecuteStatementOutput) {
        self.outputs.lock().unwrap().push_back(output);
    }

    pub fn push_records(&self, records: Vec<Vec<Field>>) {
        self.push_output(ExecuteStatementOutput {
            records: Some(records),
            ..Default::default()
        });
    }

    /// Fail every statement whose SQL contains `needle` with `message`.
    pub fn fail_on(&self, needle: &str, message: &str) {
        *self.fail_on.lock().unwrap() = Some((needle.to_string(), message.to_string()));
    }

    pub fn fail_rollback(&self) {
        *self.fail_rollback.lock().unwrap() = true;
    }

    pub fn delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.sql.clone())
            .collect()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn failure_for(&self, sql: &str) -> Option<AuroraError> {
        self.fail_on
            .lock()
            .unwrap()
            .as_ref()
            .filter(|(needle, _)| sql.contains(needle.as_str()))
            .map(|(_, message)| AuroraError::from_transport(message.clone()))
    }

    fn delayed<T: Send>(
        &self,
        result: AuroraResult<T>,
    ) -> impl Future<Output = AuroraResult<T>> + Send {
        let delay = *self.delay.lock().unwrap();
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }
    }
}

impl DataApiClient for MockClient {
    fn execute_statement(
        &self,
        request: ExecuteStatementRequest,
    ) -> impl Future<Output = AuroraResult<ExecuteStatementOutput>> + Send {
        let result = match self.failure_for(&request.sql) {
            Some(err) => Err(err),
            None => Ok(self.outputs.lock().unwrap().pop_front().unwrap_or_default()),
        };
        self.executed.lock().unwrap().push(request);
        self.delayed(result)
    }

    fn batch_execute_statement(
        &self,
        request: BatchExecuteStatementRequest,
    ) -> impl Future<Output = AuroraResult<BatchExecuteStatementOutput>> + Send {
        let result = match self.failure_for(&request.sql) {
            Some(err) => Err(err),
            None => Ok(BatchExecuteStatementOutput {
                update_results: (0..request.parameter_sets.len())
                    .map(|i| UpdateResult {
                        generated_fields: vec![Field::LongValue(100 + i as i64)],
                    })
                    .collect(),
            }),
        };
        self.batches.lock().unwrap().push(request);
        self.delayed(result)
    }

    fn begin_transaction(
        &self,
        _request: BeginTransactionRequest,
    ) -> impl Future<Output = AuroraResult<String>> + Send {
        let id = {
            let mut next = self.next_tx.lock().unwrap();
            *next += 1;
            format!("tx-{}", *next)
        };
        self.events.lock().unwrap().push(format!("begin:{id}"));
        self.delayed(Ok(id))
    }

    fn commit_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> impl Future<Output = AuroraResult<()>> + Send {
        self.events
            .lock()
            .unwrap()
            .push(format!("commit:{}", request.transaction_id));
        self.delayed(Ok(()))
    }

    fn rollback_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> impl Future<Output = AuroraResult<()>> + Send {
        self.events
            .lock()
            .unwrap()
            .push(format!("rollback:{}", request.transaction_id));
        let result = if *self.fail_rollback.lock().unwrap() {
            Err(AuroraError::from_transport("transaction already expired"))
        } else {
            Ok(())
        };
        self.delayed(result)
    }
}

pub fn connection() -> ConnectionConfig {
    ConnectionConfig::new(
        "arn:aws:rds:eu-west-1:123456789012:cluster:app",
        "arn:aws:secretsmanager:eu-west-1:123456789012:secret:app",
        "app",
    )
}

pub fn session() -> (Arc<MockClient>, Session<Arc<MockClient>>) {
    let client = MockClient::new();
    let session = Session::new(Arc::clone(&client), SessionConfig::new(connection()));
    (client, session)
}
