//! Data API wire types.
//!
//! These mirror the JSON documents exchanged with the RDS Data API
//! (`ExecuteStatement`, `BatchExecuteStatement` and the transaction calls), so a
//! transport implementation can serialize them directly with `serde_json`.

use serde::{Deserialize, Serialize};

/// A typed value as carried on the wire.
///
/// Serialized externally tagged, e.g. `{"longValue": 42}` or `{"isNull": true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    IsNull(bool),
    BooleanValue(bool),
    DoubleValue(f64),
    LongValue(i64),
    StringValue(String),
    BlobValue(#[serde(with = "blob")] Vec<u8>),
    ArrayValue(ArrayValue),
}

impl Field {
    /// The SQL NULL field.
    pub fn null() -> Self {
        Field::IsNull(true)
    }
}

/// An array value returned by the Data API (PostgreSQL-compatible clusters only,
/// but decoded wherever it shows up).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrayValue {
    ArrayValues(Vec<ArrayValue>),
    BooleanValues(Vec<bool>),
    DoubleValues(Vec<f64>),
    LongValues(Vec<i64>),
    StringValues(Vec<String>),
}

/// A named parameter for a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlParameter {
    pub name: String,
    pub value: Field,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteStatementRequest {
    pub resource_arn: String,
    pub secret_arn: String,
    pub database: String,
    pub sql: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<SqlParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteStatementOutput {
    /// Result rows, absent for statements that return none.
    #[serde(default)]
    pub records: Option<Vec<Vec<Field>>>,
    #[serde(default)]
    pub number_of_records_updated: Option<i64>,
    #[serde(default)]
    pub generated_fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchExecuteStatementRequest {
    pub resource_arn: String,
    pub secret_arn: String,
    pub database: String,
    pub sql: String,
    #[serde(default)]
    pub parameter_sets: Vec<Vec<SqlParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchExecuteStatementOutput {
    #[serde(default)]
    pub update_results: Vec<UpdateResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    #[serde(default)]
    pub generated_fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginTransactionRequest {
    pub resource_arn: String,
    pub secret_arn: String,
    pub database: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndTransactionRequest {
    pub resource_arn: String,
    pub secret_arn: String,
    pub transaction_id: String,
}

/// Blob fields travel base64-encoded.
mod blob {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
