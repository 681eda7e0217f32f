mod common;

use aurorasql::wire::{ExecuteStatementOutput, Field};
use aurorasql::{AuroraError, Value, qb};
use common::session;

#[tokio::test]
async fn insert_returns_generated_fields() {
    let (client, session) = session();
    client.push_output(ExecuteStatementOutput {
        number_of_records_updated: Some(2),
        generated_fields: vec![Field::LongValue(41)],
        ..Default::default()
    });

    let outcome = qb::insert("users")
        .columns(["name", "age"])
        .row([Value::from("ann"), Value::from(31i64)])
        .row([Value::from("bob"), Value::Null])
        .require_generated_fields(true)
        .insert(&session)
        .await
        .unwrap();

    assert_eq!(outcome.affected_rows, 2);
    assert_eq!(outcome.generated_fields, [Value::Long(41)]);

    let executed = client.executed.lock().unwrap();
    assert_eq!(
        executed[0].sql,
        "INSERT INTO users (name,age) VALUES (:name_0,:age_0),(:name_1,:age_1)"
    );
    assert_eq!(executed[0].parameters.len(), 4);
    let age_1 = executed[0]
        .parameters
        .iter()
        .find(|p| p.name == "age_1")
        .unwrap();
    assert_eq!(age_1.value, Field::IsNull(true));
}

#[tokio::test]
async fn missing_generated_fields_fail_when_required() {
    let (_client, session) = session();

    let err = qb::insert("users")
        .columns(["name"])
        .row(["ann"])
        .require_generated_fields(true)
        .insert(&session)
        .await
        .unwrap_err();
    assert!(matches!(err, AuroraError::Other(ref m) if m.contains("no generated fields")));

    // INSERT IGNORE may legitimately write nothing.
    let outcome = qb::insert_ignore("users")
        .columns(["name"])
        .row(["ann"])
        .require_generated_fields(true)
        .insert(&session)
        .await
        .unwrap();
    assert!(outcome.generated_fields.is_empty());

    // Not required: no check at all.
    assert!(
        qb::replace("users")
            .columns(["name"])
            .row(["ann"])
            .insert(&session)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn batch_insert_sends_one_set_per_row() {
    let (client, session) = session();

    let generated = qb::insert("t")
        .columns(["a", "b"])
        .rows([[1i64, 2], [3, 4], [5, 6]])
        .insert_batch(&session)
        .await
        .unwrap();

    assert_eq!(generated.len(), 3);
    assert_eq!(generated[2], [Value::Long(102)]);

    let batches = client.batches.lock().unwrap();
    assert_eq!(batches[0].sql, "INSERT INTO t (a,b) VALUES (:a,:b)");
    assert_eq!(batches[0].parameter_sets.len(), 3);
    assert_eq!(batches[0].parameter_sets[1][0].value, Field::LongValue(3));
}

#[tokio::test]
async fn invalid_insert_never_reaches_transport() {
    let (client, session) = session();

    let err = qb::insert("t")
        .columns(["a", "b"])
        .row([1i64])
        .insert(&session)
        .await
        .unwrap_err();
    assert!(matches!(err, AuroraError::Validation(_)));
    assert!(client.executed.lock().unwrap().is_empty());
}
