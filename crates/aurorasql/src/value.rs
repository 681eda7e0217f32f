//! Host-side scalar values and named parameter maps.

use crate::error::{AuroraError, AuroraResult};
use crate::wire::{ArrayValue, Field, SqlParameter};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A value exchanged with the database.
///
/// Only the scalar variants can be bound as parameters; [`Value::Array`] exists
/// because the Data API can return arrays in result sets.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Double(f64),
    Long(i64),
    String(String),
    Blob(Vec<u8>),
    Array(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Double(_) => "double",
            Value::Long(_) => "long",
            Value::String(_) => "string",
            Value::Blob(_) => "blob",
            Value::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Marshal this value into a wire field for the parameter `key`.
    pub fn to_field(&self, key: &str) -> AuroraResult<Field> {
        match self {
            Value::Null => Ok(Field::null()),
            Value::Bool(b) => Ok(Field::BooleanValue(*b)),
            Value::Double(d) => Ok(Field::DoubleValue(*d)),
            Value::Long(l) => Ok(Field::LongValue(*l)),
            Value::String(s) => Ok(Field::StringValue(s.clone())),
            Value::Blob(b) => Ok(Field::BlobValue(b.clone())),
            Value::Array(_) => Err(AuroraError::unsupported_param(key, self.kind())),
        }
    }

    /// Decode a wire field returned for `column`.
    pub fn from_field(field: Field, column: &str) -> AuroraResult<Value> {
        match field {
            Field::IsNull(true) => Ok(Value::Null),
            Field::IsNull(false) => Err(AuroraError::decode(column, "field carries no value")),
            Field::BooleanValue(b) => Ok(Value::Bool(b)),
            Field::DoubleValue(d) => Ok(Value::Double(d)),
            Field::LongValue(l) => Ok(Value::Long(l)),
            Field::StringValue(s) => Ok(Value::String(s)),
            Field::BlobValue(b) => Ok(Value::Blob(b)),
            Field::ArrayValue(array) => Ok(Value::from_array(array)),
        }
    }

    fn from_array(array: ArrayValue) -> Value {
        let items = match array {
            ArrayValue::ArrayValues(nested) => nested.into_iter().map(Value::from_array).collect(),
            ArrayValue::BooleanValues(v) => v.into_iter().map(Value::Bool).collect(),
            ArrayValue::DoubleValues(v) => v.into_iter().map(Value::Double).collect(),
            ArrayValue::LongValues(v) => v.into_iter().map(Value::Long).collect(),
            ArrayValue::StringValues(v) => v.into_iter().map(Value::String).collect(),
        };
        Value::Array(items)
    }

    /// Convert a JSON value bound under `key`.
    ///
    /// Objects are rejected; arrays convert but cannot be bound later.
    pub fn from_json(key: &str, json: serde_json::Value) -> AuroraResult<Value> {
        use serde_json::Value as Json;

        match json {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Long(i)),
                None => n
                    .as_f64()
                    .map(Value::Double)
                    .ok_or_else(|| AuroraError::unsupported_param(key, "number")),
            },
            Json::String(s) => Ok(Value::String(s)),
            Json::Array(items) => items
                .into_iter()
                .map(|item| Value::from_json(key, item))
                .collect::<AuroraResult<Vec<_>>>()
                .map(Value::Array),
            Json::Object(_) => Err(AuroraError::unsupported_param(key, "object")),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Long(v.into())
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Long(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Long(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Double(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Blob(v.to_vec())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::String(v.format(DATETIME_FORMAT).to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::String(v.format(DATE_FORMAT).to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Extract a Rust value from a [`Value`].
///
/// The error string is wrapped into [`AuroraError::Decode`] by the caller, which
/// knows the column name.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, String>;
}

fn mismatch(expected: &str, value: &Value) -> String {
    format!("expected {}, found {}", expected, value.kind())
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, String> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Long(l) => Ok(*l),
            other => Err(mismatch("long", other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, String> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| format!("{} does not fit in i32", wide))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Double(d) => Ok(*d),
            Value::Long(l) => Ok(*l as f64),
            other => Err(mismatch("double", other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(*b),
            // MySQL TINYINT(1) columns come back as longs
            Value::Long(0) => Ok(false),
            Value::Long(1) => Ok(true),
            other => Err(mismatch("bool", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(mismatch("string", other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Blob(b) => Ok(b.clone()),
            other => Err(mismatch("blob", other)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(s) => NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                .map_err(|e| format!("invalid datetime '{}': {}", s, e)),
            other => Err(mismatch("datetime string", other)),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map_err(|e| format!("invalid date '{}': {}", s, e)),
            other => Err(mismatch("date string", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Array(items) => items.iter().map(T::from_value).collect(),
            other => Err(mismatch("array", other)),
        }
    }
}

/// Named parameters for one statement, keyed without the leading `:`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` under `name`; a leading `:` in `name` is ignored.
    ///
    /// Returns the value previously bound under that name.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(normalize_name(name), value.into())
    }

    /// Consuming form of [`Params::insert`].
    pub fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(normalize_name(name).as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge `other` into this map; `other` wins on name clashes.
    pub fn extend(&mut self, other: Params) {
        self.0.extend(other.0);
    }

    /// Build parameters from a JSON object.
    pub fn from_json(json: serde_json::Value) -> AuroraResult<Self> {
        let serde_json::Value::Object(map) = json else {
            return Err(AuroraError::validation(
                "parameters must be given as a JSON object",
            ));
        };

        let mut params = Params::new();
        for (key, value) in map {
            let value = Value::from_json(&key, value)?;
            params.insert(&key, value);
        }
        Ok(params)
    }

    /// Parse parameters from JSON text holding one object.
    pub fn parse_json(text: &str) -> AuroraResult<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(json)
    }

    /// Marshal every parameter into its wire form.
    ///
    /// Fails on the first value that cannot be bound, naming its key.
    pub fn to_sql_parameters(&self) -> AuroraResult<Vec<SqlParameter>> {
        self.0
            .iter()
            .map(|(name, value)| {
                Ok(SqlParameter {
                    name: name.clone(),
                    value: value.to_field(name)?,
                })
            })
            .collect()
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.insert(name.as_ref(), value);
        }
        params
    }
}

fn normalize_name(name: &str) -> String {
    name.strip_prefix(':').unwrap_or(name).to_string()
}
