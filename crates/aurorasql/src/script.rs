//! Running multi-statement SQL scripts in one transaction.

use crate::client::{DataApiClient, Executor};
use crate::error::{AuroraError, AuroraResult};
use crate::monitor::SQL_TARGET;
use crate::session::Session;
use crate::value::Params;
use std::path::Path;

/// Split `script` after every occurrence of `separator`.
///
/// Each statement keeps its trailing separator and is trimmed; pieces with
/// nothing but whitespace before the separator are dropped. An empty separator
/// yields the whole script as one statement.
pub fn split_statements<'a>(script: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        let whole = script.trim();
        return if whole.is_empty() { Vec::new() } else { vec![whole] };
    }

    script
        .split_inclusive(separator)
        .map(str::trim)
        .filter(|piece| {
            !piece
                .strip_suffix(separator)
                .unwrap_or(piece)
                .trim()
                .is_empty()
        })
        .collect()
}

/// Execute every statement of `script` inside one transaction.
///
/// Commits when all statements succeed and returns how many ran. On the first
/// failure the transaction is rolled back and the error names the statement's
/// index and text.
pub async fn execute_script<C: DataApiClient>(
    session: &Session<C>,
    script: &str,
    separator: &str,
) -> AuroraResult<usize> {
    let statements = split_statements(script, separator);
    let tx = session.begin().await?;
    let no_params = Params::new();

    for (index, statement) in statements.iter().enumerate() {
        if let Err(source) = tx.execute_sql(statement, &no_params).await {
            let error = AuroraError::Script {
                index,
                statement: statement.to_string(),
                source: Box::new(source),
            };
            return match tx.rollback().await {
                Ok(()) => Err(error),
                Err(rollback_err) => {
                    tracing::warn!(
                        target: SQL_TARGET,
                        error = %rollback_err,
                        "script rollback failed"
                    );
                    Err(AuroraError::Other(format!(
                        "{error} (rollback failed: {rollback_err})"
                    )))
                }
            };
        }
    }

    tx.commit().await?;
    tracing::info!(target: SQL_TARGET, statements = statements.len(), "script executed");
    Ok(statements.len())
}

/// Read a script file and run it with [`execute_script`].
pub async fn execute_file<C: DataApiClient>(
    session: &Session<C>,
    path: impl AsRef<Path>,
    separator: &str,
) -> AuroraResult<usize> {
    let script = tokio::fs::read_to_string(path.as_ref()).await?;
    execute_script(session, &script, separator).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_separator() {
        let script = "CREATE TABLE a (id INT);\n\nINSERT INTO a VALUES (1);\n  \n";
        assert_eq!(
            split_statements(script, ";"),
            ["CREATE TABLE a (id INT);", "INSERT INTO a VALUES (1);"]
        );
    }

    #[test]
    fn trailing_statement_without_separator() {
        assert_eq!(split_statements("a;b", ";"), ["a;", "b"]);
        assert_eq!(split_statements("a;;", ";"), ["a;"]);
        assert_eq!(split_statements("a; ;\n;b", ";"), ["a;", "b"]);
    }

    #[test]
    fn custom_and_empty_separator() {
        assert_eq!(
            split_statements("x\n--\ny\n--\n", "--"),
            ["x\n--", "y\n--"]
        );
        assert_eq!(split_statements(" a; b ", ""), ["a; b"]);
        assert!(split_statements("   ", ";").is_empty());
    }
}
