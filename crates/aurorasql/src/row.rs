//! Row decoding and mapping traits

use crate::error::{AuroraError, AuroraResult};
use crate::value::{FromValue, Value};
use crate::wire::Field;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One decoded result row: projection field names paired with values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Column names in projection order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values in projection order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for `column`. When a name appears twice, the later one wins.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .rposition(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    /// Typed value for `column`.
    pub fn try_get<T: FromValue>(&self, column: &str) -> AuroraResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| AuroraError::decode(column, "column not found in row"))?;
        T::from_value(value).map_err(|message| AuroraError::decode(column, message))
    }

    /// Convert into a name -> value map.
    pub fn into_map(self) -> BTreeMap<String, Value> {
        self.columns.iter().cloned().zip(self.values).collect()
    }
}

/// Trait for types that can be built from a [`Row`].
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> AuroraResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> AuroraResult<Self> {
        Ok(row.clone())
    }
}

impl FromRow for BTreeMap<String, Value> {
    fn from_row(row: &Row) -> AuroraResult<Self> {
        Ok(row.clone().into_map())
    }
}

/// Decode Data API records against the projection's field names.
///
/// Every record must carry exactly one field per name.
pub fn decode_rows(fields: &[String], records: Vec<Vec<Field>>) -> AuroraResult<Vec<Row>> {
    let columns: Arc<[String]> = fields.into();

    records
        .into_iter()
        .enumerate()
        .map(|(row_idx, record)| {
            if record.len() != columns.len() {
                return Err(AuroraError::RowShape {
                    row: row_idx,
                    expected: columns.len(),
                    got: record.len(),
                });
            }

            let values = record
                .into_iter()
                .zip(columns.iter())
                .map(|(field, column)| Value::from_field(field, column))
                .collect::<AuroraResult<Vec<_>>>()?;

            Ok(Row {
                columns: Arc::clone(&columns),
                values,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn decodes_rows_in_order() {
        let rows = decode_rows(
            &names(&["id", "n"]),
            vec![
                vec![Field::LongValue(1), Field::StringValue("ann".into())],
                vec![Field::LongValue(2), Field::IsNull(true)],
            ],
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].try_get::<i64>("id").unwrap(), 1);
        assert_eq!(rows[0].try_get::<String>("n").unwrap(), "ann");
        assert_eq!(rows[1].try_get::<Option<String>>("n").unwrap(), None);
    }

    #[test]
    fn short_record_is_a_shape_error() {
        let err = decode_rows(
            &names(&["id", "n"]),
            vec![
                vec![Field::LongValue(1), Field::StringValue("a".into())],
                vec![Field::LongValue(2)],
            ],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            AuroraError::RowShape {
                row: 1,
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn missing_or_mistyped_column_reports_name() {
        let rows = decode_rows(&names(&["id"]), vec![vec![Field::LongValue(1)]]).unwrap();
        let err = rows[0].try_get::<String>("id").unwrap_err();
        assert!(matches!(err, AuroraError::Decode { ref column, .. } if column == "id"));
        assert!(rows[0].try_get::<i64>("nope").is_err());
    }

    #[test]
    fn duplicate_names_keep_last_value() {
        let rows = decode_rows(
            &names(&["x", "x"]),
            vec![vec![Field::LongValue(1), Field::LongValue(2)]],
        )
        .unwrap();
        assert_eq!(rows[0].get("x"), Some(&Value::Long(2)));
        assert_eq!(rows[0].clone().into_map().len(), 1);
    }
}
