//! UPDATE query builder.

use crate::error::{AuroraError, AuroraResult};
use crate::qb::traits::{BuiltStatement, SqlStatement};
use crate::value::{Params, Value};

/// SET entry.
#[derive(Clone, Debug)]
enum Assignment {
    /// `column = :column`, value bound under the column name
    Column(String),
    /// Raw SQL assignment
    Raw(String),
}

/// UPDATE builder: `UPDATE t SET a = :a, b = b + 1 WHERE c1 AND c2`.
#[derive(Clone, Debug)]
pub struct UpdateQb {
    table: String,
    assignments: Vec<Assignment>,
    conditions: Vec<String>,
    params: Params,
}

impl UpdateQb {
    /// Create a new UPDATE builder.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            assignments: Vec::new(),
            conditions: Vec::new(),
            params: Params::new(),
        }
    }

    /// Set a column to a bound value.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.params.insert(column, value);
        self.assignments.push(Assignment::Column(column.to_string()));
        self
    }

    /// Set an optional column value (None => skip).
    pub fn set_opt<T: Into<Value>>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// Append a raw assignment such as `hits = hits + 1`.
    pub fn set_expr(mut self, expr: impl Into<String>) -> Self {
        self.assignments.push(Assignment::Raw(expr.into()));
        self
    }

    /// Add a raw condition; all conditions are ANDed.
    pub fn where_(mut self, cond: impl Into<String>) -> Self {
        let cond = cond.into();
        if !cond.trim().is_empty() {
            self.conditions.push(cond);
        }
        self
    }

    /// Bind a parameter referenced by a condition or raw assignment.
    pub fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name, value);
        self
    }

    pub fn build(&self) -> AuroraResult<BuiltStatement> {
        if self.assignments.is_empty() {
            return Err(AuroraError::validation(format!(
                "update of {} has no SET expressions",
                self.table
            )));
        }

        let sets: Vec<String> = self
            .assignments
            .iter()
            .map(|a| match a {
                Assignment::Column(column) => format!("{column} = :{column}"),
                Assignment::Raw(expr) => expr.clone(),
            })
            .collect();

        let mut sql = format!("UPDATE {} SET {}", self.table, sets.join(", "));
        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }

        Ok(BuiltStatement::new(sql, self.params.clone()))
    }
}

impl SqlStatement for UpdateQb {
    fn to_statement(&self) -> AuroraResult<BuiltStatement> {
        self.build()
    }
}
