mod common;

use aurorasql::wire::{ExecuteStatementOutput, Field};
use aurorasql::{
    AuroraError, Executor, Params, Row, Session, SessionConfig, SqlStatement, Value, qb,
};
use common::{MockClient, connection, session};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn fetch_all_decodes_rows_by_alias() {
    let (client, session) = session();
    client.push_records(vec![
        vec![Field::LongValue(1), Field::StringValue("ann".into())],
        vec![Field::LongValue(2), Field::IsNull(true)],
    ]);

    let query = qb::select(["id", "name AS n"])
        .from("users")
        .where_("id > :minId")
        .limit(10)
        .bind("minId", 0i64)
        .build()
        .unwrap();
    let rows = query.fetch_all(&session).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].columns(), ["id", "n"]);
    assert_eq!(rows[0].try_get::<String>("n").unwrap(), "ann");
    assert_eq!(rows[1].try_get::<Option<String>>("n").unwrap(), None);

    let executed = client.executed.lock().unwrap();
    let request = &executed[0];
    assert_eq!(
        request.sql,
        "SELECT id,name AS n FROM users WHERE id > :minId LIMIT 0,10"
    );
    assert_eq!(request.database, "app");
    assert_eq!(request.transaction_id, None);
    assert_eq!(request.parameters.len(), 1);
    assert_eq!(request.parameters[0].name, "minId");
    assert_eq!(request.parameters[0].value, Field::LongValue(0));
}

#[tokio::test]
async fn fetch_without_records_is_empty() {
    let (_client, session) = session();
    let query = qb::select(["id"]).from("t").build().unwrap();
    assert!(query.fetch_all(&session).await.unwrap().is_empty());
    assert!(query.fetch_opt(&session).await.unwrap().is_none());
}

#[tokio::test]
async fn fetch_as_maps() {
    let (client, session) = session();
    client.push_records(vec![vec![Field::LongValue(7), Field::BooleanValue(true)]]);

    let query = qb::select(["id", "active"]).from("t").build().unwrap();
    let maps: Vec<BTreeMap<String, Value>> = query.fetch_all_as(&session).await.unwrap();
    assert_eq!(maps[0].get("active"), Some(&Value::Bool(true)));

    client.push_records(vec![vec![Field::LongValue(8), Field::BooleanValue(false)]]);
    let row: Option<Row> = query.fetch_opt_as(&session).await.unwrap();
    assert_eq!(row.unwrap().try_get::<i64>("id").unwrap(), 8);
}

#[tokio::test]
async fn short_record_reports_row_index() {
    let (client, session) = session();
    client.push_records(vec![
        vec![Field::LongValue(1), Field::LongValue(2)],
        vec![Field::LongValue(3)],
    ]);

    let query = qb::select(["a", "b"]).from("t").build().unwrap();
    let err = query.fetch_all(&session).await.unwrap_err();
    assert!(matches!(
        err,
        AuroraError::RowShape {
            row: 1,
            expected: 2,
            got: 1
        }
    ));
}

#[tokio::test]
async fn delete_execute_returns_affected_rows() {
    let (client, session) = session();
    client.push_output(ExecuteStatementOutput {
        number_of_records_updated: Some(3),
        ..Default::default()
    });

    let query = qb::delete("sessions")
        .where_("expires_at < :now")
        .bind(":now", "2024-01-01 00:00:00")
        .build()
        .unwrap();

    assert_eq!(query.execute(&session).await.unwrap(), 3);
    assert!(query.fetch_all(&session).await.is_err());

    let executed = client.executed.lock().unwrap();
    assert_eq!(executed[0].sql, "DELETE FROM sessions WHERE expires_at < :now");
    assert_eq!(executed[0].parameters[0].name, "now");
    // The rejected fetch never reached the transport.
    assert_eq!(executed.len(), 1);
}

#[tokio::test]
async fn array_params_are_rejected_before_sending() {
    let (client, session) = session();
    let params = Params::new()
        .bind("ids", Value::Array(vec![Value::Long(1), Value::Long(2)]))
        .bind("name", "x");

    let err = session
        .execute_sql("SELECT 1 FROM t WHERE id IN (:ids)", &params)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AuroraError::UnsupportedParam { ref key, kind: "array" } if key == "ids"
    ));
    assert!(client.executed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn waking_database_is_classified() {
    let (client, session) = session();
    client.fail_on("SELECT", "BadRequestException: Communications link failure");

    let query = qb::select(["id"]).from("t").build().unwrap();
    let err = query.fetch_all(&session).await.unwrap_err();
    assert!(err.is_database_waking());
}

#[tokio::test]
async fn slow_calls_time_out() {
    let client = MockClient::new();
    client.delay(Duration::from_millis(200));
    let session = Session::new(
        Arc::clone(&client),
        SessionConfig::new(connection()).timeout(Duration::from_millis(10)),
    );

    let err = session
        .execute_sql("SELECT 1", &Params::new())
        .await
        .unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn update_runs_through_executor() {
    let (client, session) = session();
    client.push_output(ExecuteStatementOutput {
        number_of_records_updated: Some(1),
        ..Default::default()
    });

    let affected = qb::update("users")
        .set("status", "inactive")
        .where_("id = :id")
        .bind("id", 5i64)
        .execute(&session)
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let executed = client.executed.lock().unwrap();
    assert_eq!(
        executed[0].sql,
        "UPDATE users SET status = :status WHERE id = :id"
    );
    let names: Vec<&str> = executed[0].parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["id", "status"]);
}
