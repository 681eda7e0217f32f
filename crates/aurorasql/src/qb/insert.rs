//! INSERT / INSERT IGNORE / REPLACE builder with generated named parameters.

use crate::client::{Executor, affected_rows};
use crate::error::{AuroraError, AuroraResult};
use crate::qb::traits::{BuiltStatement, SqlStatement};
use crate::value::{Params, Value};
use crate::wire::Field;

/// How rows are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InsertMode {
    /// `INSERT INTO`
    #[default]
    Insert,
    /// `INSERT IGNORE INTO`
    Ignore,
    /// `REPLACE INTO`
    Replace,
}

impl InsertMode {
    pub fn keyword(self) -> &'static str {
        match self {
            InsertMode::Insert => "INSERT INTO",
            InsertMode::Ignore => "INSERT IGNORE INTO",
            InsertMode::Replace => "REPLACE INTO",
        }
    }
}

/// Result of an insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertOutcome {
    pub affected_rows: u64,
    /// Generated values (e.g. the AUTO_INCREMENT id), in wire order.
    pub generated_fields: Vec<Value>,
}

/// Multi-row insert builder.
///
/// Each cell is bound as `:{column}_{row}`. Row indices never contain `_`, so
/// the name splits unambiguously at its last underscore and two different
/// cells can never share a placeholder.
#[derive(Clone, Debug)]
pub struct InsertQb {
    table: String,
    mode: InsertMode,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    require_generated: bool,
}

impl InsertQb {
    /// Create a new INSERT builder.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            mode: InsertMode::Insert,
            columns: Vec::new(),
            rows: Vec::new(),
            require_generated: false,
        }
    }

    pub fn mode(mut self, mode: InsertMode) -> Self {
        self.mode = mode;
        self
    }

    /// Switch to `INSERT IGNORE`.
    pub fn ignore(self) -> Self {
        self.mode(InsertMode::Ignore)
    }

    /// Switch to `REPLACE`.
    pub fn replace(self) -> Self {
        self.mode(InsertMode::Replace)
    }

    /// Set the column list.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append one row of values, in column order.
    pub fn row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    /// Append many rows.
    pub fn rows<R, I, V>(self, rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        rows.into_iter().fold(self, |qb, row| qb.row(row))
    }

    /// Fail [`insert`](Self::insert) when an INSERT/REPLACE reports no generated fields.
    ///
    /// Useful for tables with an AUTO_INCREMENT key. Ignored for `INSERT IGNORE`,
    /// which legitimately writes nothing.
    pub fn require_generated_fields(mut self, require: bool) -> Self {
        self.require_generated = require;
        self
    }

    fn validate(&self) -> AuroraResult<()> {
        if self.columns.is_empty() {
            return Err(AuroraError::validation(format!(
                "insert into {} has no columns",
                self.table
            )));
        }
        if self.rows.is_empty() {
            return Err(AuroraError::validation(format!(
                "insert into {} has no rows",
                self.table
            )));
        }
        if let Some((idx, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.columns.len())
        {
            return Err(AuroraError::validation(format!(
                "insert into {}: row {} has {} values for {} columns",
                self.table,
                idx,
                row.len(),
                self.columns.len()
            )));
        }
        Ok(())
    }

    fn head(&self) -> String {
        format!(
            "{} {} ({}) VALUES",
            self.mode.keyword(),
            self.table,
            self.columns.join(",")
        )
    }

    /// Build a single multi-row statement.
    pub fn build(&self) -> AuroraResult<BuiltStatement> {
        self.validate()?;

        let mut params = Params::new();
        let tuples: Vec<String> = self
            .rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let placeholders: Vec<String> = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(column, value)| {
                        let name = format!("{}_{}", column, row_idx);
                        let placeholder = format!(":{}", name);
                        params.insert(&name, value.clone());
                        placeholder
                    })
                    .collect();
                format!("({})", placeholders.join(","))
            })
            .collect();

        let sql = format!("{} {}", self.head(), tuples.join(","));
        Ok(BuiltStatement::new(sql, params))
    }

    /// Build a one-row template plus one parameter set per row, for
    /// `BatchExecuteStatement`.
    pub fn build_batch(&self) -> AuroraResult<(String, Vec<Params>)> {
        self.validate()?;

        let placeholders: Vec<String> = self.columns.iter().map(|c| format!(":{}", c)).collect();
        let sql = format!("{} ({})", self.head(), placeholders.join(","));

        let sets: Vec<Params> = self
            .rows
            .iter()
            .map(|row| self.columns.iter().map(String::as_str).zip(row.iter().cloned()).collect())
            .collect();

        Ok((sql, sets))
    }

    /// Execute as one statement.
    pub async fn insert(&self, conn: &impl Executor) -> AuroraResult<InsertOutcome> {
        let stmt = self.build()?;
        let output = conn.execute_sql(&stmt.sql, &stmt.params).await?;

        if self.require_generated
            && self.mode != InsertMode::Ignore
            && output.generated_fields.is_empty()
        {
            return Err(AuroraError::Other(format!(
                "inserted into {} but no generated fields were returned",
                self.table
            )));
        }

        Ok(InsertOutcome {
            affected_rows: affected_rows(&output),
            generated_fields: decode_generated(output.generated_fields)?,
        })
    }

    /// Execute once per row through `BatchExecuteStatement`.
    ///
    /// Returns the generated fields of every row.
    pub async fn insert_batch(&self, conn: &impl Executor) -> AuroraResult<Vec<Vec<Value>>> {
        let (sql, sets) = self.build_batch()?;
        let output = conn.batch_execute_sql(&sql, &sets).await?;
        output
            .update_results
            .into_iter()
            .map(|result| decode_generated(result.generated_fields))
            .collect()
    }
}

fn decode_generated(fields: Vec<Field>) -> AuroraResult<Vec<Value>> {
    fields
        .into_iter()
        .map(|field| Value::from_field(field, "generated"))
        .collect()
}

impl SqlStatement for InsertQb {
    fn to_statement(&self) -> AuroraResult<BuiltStatement> {
        self.build()
    }
}
