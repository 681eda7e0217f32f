//! SQL compiler: turns a [`QueryModel`] into one statement string.
//!
//! Clause order is fixed:
//!
//! ```text
//! SELECT p1,p2 FROM src | DELETE FROM t
//! JOIN ...                      (insertion order)
//! WHERE ...                     (flat AND, flat OR, AND groups, OR groups)
//! GROUP BY ...
//! HAVING ...                    (same layout as WHERE)
//! ORDER BY ...
//! LIMIT offset,count            (omitted when count is 0)
//! UNION <branch> ...            (SELECT only, compiled recursively)
//! ```
//!
//! Condition text is emitted verbatim; named parameters (`:name`) must already
//! be part of it. Nothing is escaped here.

use crate::error::{AuroraError, AuroraResult};
use crate::qb::condition::ConditionGroup;
use crate::qb::join::alias_after_as;
use crate::qb::model::{Head, QueryModel};

/// Validate and compile a model.
pub fn compile(model: &QueryModel) -> AuroraResult<String> {
    validate(model)?;
    Ok(render(model))
}

/// Check a model (and its union branches) for builder misuse.
pub fn validate(model: &QueryModel) -> AuroraResult<()> {
    if let Some(args) = &model.invalid_limit {
        return Err(AuroraError::InvalidLimit { args: args.clone() });
    }

    match &model.head {
        None => return Err(AuroraError::MissingStatement),
        Some(Head::Select(fields)) => {
            if fields.is_empty() || fields.iter().any(|f| f.trim().is_empty()) {
                return Err(AuroraError::EmptyProjection);
            }
            if model.source.as_deref().is_none_or(|s| s.trim().is_empty()) {
                return Err(AuroraError::MissingFrom);
            }
        }
        Some(Head::Delete(table)) => {
            if table.trim().is_empty() {
                return Err(AuroraError::EmptyDeleteTarget);
            }
            if !model.unions.is_empty() {
                return Err(AuroraError::UnionOnDelete {
                    table: table.clone(),
                });
            }
            if !model.joins.is_empty() {
                return Err(AuroraError::validation(format!(
                    "joins are not supported on DELETE statements (delete target: {})",
                    table
                )));
            }
            if let Some(source) = &model.source {
                return Err(AuroraError::validation(format!(
                    "FROM {} is not supported on DELETE statements (delete target: {})",
                    source, table
                )));
            }
        }
    }

    model.unions.iter().try_for_each(validate)
}

/// Render a model that already passed [`validate`].
pub(crate) fn render(model: &QueryModel) -> String {
    let mut parts: Vec<String> = Vec::new();

    match &model.head {
        Some(Head::Select(fields)) => parts.push(format!(
            "SELECT {} FROM {}",
            fields.join(","),
            model.source.as_deref().unwrap_or_default()
        )),
        Some(Head::Delete(table)) => parts.push(format!("DELETE FROM {}", table)),
        None => {}
    }

    for join in &model.joins {
        parts.push(join.to_sql());
    }

    if let Some(where_sql) = render_clause("WHERE", &model.where_clause) {
        parts.push(where_sql);
    }

    if !model.group_by.is_empty() {
        parts.push(format!("GROUP BY {}", model.group_by.join(", ")));
    }

    if let Some(having_sql) = render_clause("HAVING", &model.having) {
        parts.push(having_sql);
    }

    if !model.order_by.is_empty() {
        let entries: Vec<String> = model.order_by.iter().map(ToString::to_string).collect();
        parts.push(format!("ORDER BY {}", entries.join(", ")));
    }

    if !model.limit.is_unbounded() {
        parts.push(format!("LIMIT {},{}", model.limit.offset, model.limit.count));
    }

    if matches!(model.head, Some(Head::Select(_))) {
        for branch in &model.unions {
            parts.push(format!("UNION {}", render(branch)));
        }
    }

    parts.join(" ")
}

/// Field names a row decoder should use for the model's projection.
///
/// `"name AS n"` yields `"n"`, anything else is used as written. DELETE
/// statements return no rows, so they have no field names.
pub fn result_field_names(model: &QueryModel) -> Vec<String> {
    model
        .projection()
        .iter()
        .map(|field| alias_after_as(field).unwrap_or(field).to_string())
        .collect()
}

/// Accumulates the entries of one condition level.
///
/// The first entry gets the introducer (if any), later entries get the
/// connective of their own category.
struct ConditionWriter {
    introducer: Option<&'static str>,
    parts: Vec<String>,
}

impl ConditionWriter {
    fn new(introducer: Option<&'static str>) -> Self {
        Self {
            introducer,
            parts: Vec::new(),
        }
    }

    fn push(&mut self, connective: &str, fragment: &str) {
        let lead = if self.parts.is_empty() {
            self.introducer
        } else {
            Some(connective)
        };
        match lead {
            Some(lead) => self.parts.push(format!("{} {}", lead, fragment)),
            None => self.parts.push(fragment.to_string()),
        }
    }

    fn write_group(&mut self, group: &ConditionGroup) {
        for cond in group.and_conditions.iter().filter(|c| !c.trim().is_empty()) {
            self.push("AND", cond);
        }
        for cond in group.or_conditions.iter().filter(|c| !c.trim().is_empty()) {
            self.push("OR", cond);
        }
        for nested in &group.and_groups {
            if let Some(sql) = render_group(nested) {
                self.push("AND", &sql);
            }
        }
        for nested in &group.or_groups {
            if let Some(sql) = render_group(nested) {
                self.push("OR", &sql);
            }
        }
    }

    fn finish(self) -> Option<String> {
        if self.parts.is_empty() {
            None
        } else {
            Some(self.parts.join(" "))
        }
    }
}

/// Render a top-level clause, e.g. `WHERE a AND b OR (c AND d)`.
fn render_clause(keyword: &'static str, group: &ConditionGroup) -> Option<String> {
    let mut writer = ConditionWriter::new(Some(keyword));
    writer.write_group(group);
    writer.finish()
}

/// Render a nested group as `(...)`; empty groups render to nothing.
fn render_group(group: &ConditionGroup) -> Option<String> {
    let mut writer = ConditionWriter::new(None);
    writer.write_group(group);
    writer.finish().map(|sql| format!("({})", sql))
}
