//! Fluent builder that populates a [`QueryModel`].

use crate::error::{AuroraError, AuroraResult};
use crate::qb::compile;
use crate::qb::condition::ConditionGroup;
use crate::qb::join::{Join, JoinKind};
use crate::qb::model::{Head, QueryModel, Window};
use crate::qb::order::OrderBy;
use crate::qb::query::Query;
use crate::value::{Params, Value};

/// SELECT/DELETE query builder.
///
/// Every method consumes the builder and hands it back, so one owned value flows
/// through the whole chain. [`QueryBuilder::build`] validates the model and
/// freezes it into a [`Query`].
#[derive(Clone, Debug, Default)]
pub struct QueryBuilder {
    model: QueryModel,
    params: Params,
    /// Parameters of union branches, merged at build time.
    union_params: Vec<Params>,
}

impl QueryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Statement head ====================

    /// Set the projection. Replaces a previous `delete`.
    ///
    /// Avoid `*`: result rows are keyed by the projection entries.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.model.head = Some(Head::Select(fields.into_iter().map(Into::into).collect()));
        self
    }

    /// Turn the statement into `DELETE FROM table`. Replaces a previous `select`.
    pub fn delete(mut self, table: impl Into<String>) -> Self {
        self.model.head = Some(Head::Delete(table.into()));
        self
    }

    /// Set the FROM source (a table or a parenthesized sub-select).
    pub fn from(mut self, source: impl Into<String>) -> Self {
        self.model.source = Some(source.into());
        self
    }

    // ==================== JOIN ====================

    /// Add `JOIN source ON source.pk = target.fk`.
    pub fn join(self, source: &str, target: &str, primary_key: &str, foreign_key: &str) -> Self {
        self.push_join(JoinKind::Inner, source, target, primary_key, foreign_key)
    }

    /// Add `LEFT JOIN source ON source.pk = target.fk`.
    pub fn left_join(self, source: &str, target: &str, primary_key: &str, foreign_key: &str) -> Self {
        self.push_join(JoinKind::Left, source, target, primary_key, foreign_key)
    }

    /// Add `RIGHT JOIN source ON source.pk = target.fk`.
    pub fn right_join(self, source: &str, target: &str, primary_key: &str, foreign_key: &str) -> Self {
        self.push_join(JoinKind::Right, source, target, primary_key, foreign_key)
    }

    fn push_join(
        mut self,
        kind: JoinKind,
        source: &str,
        target: &str,
        primary_key: &str,
        foreign_key: &str,
    ) -> Self {
        self.model
            .joins
            .push(Join::new(kind, source, target, primary_key, foreign_key));
        self
    }

    // ==================== WHERE ====================

    /// Add a WHERE condition joined with `AND`.
    pub fn where_(mut self, expr: impl Into<String>) -> Self {
        self.model.where_clause.and_conditions.push(expr.into());
        self
    }

    /// Alias for [`QueryBuilder::where_`].
    pub fn and_where(self, expr: impl Into<String>) -> Self {
        self.where_(expr)
    }

    /// Add a WHERE condition joined with `OR`.
    pub fn or_where(mut self, expr: impl Into<String>) -> Self {
        self.model.where_clause.or_conditions.push(expr.into());
        self
    }

    /// Add a parenthesized group joined with `AND`.
    pub fn where_group(mut self, group: ConditionGroup) -> Self {
        self.model.where_clause.and_groups.push(group);
        self
    }

    /// Add a parenthesized group joined with `OR`.
    pub fn or_where_group(mut self, group: ConditionGroup) -> Self {
        self.model.where_clause.or_groups.push(group);
        self
    }

    /// Build a group from a fresh empty one and add it with `AND`.
    pub fn where_group_with(self, build: impl FnOnce(ConditionGroup) -> ConditionGroup) -> Self {
        self.where_group(build(ConditionGroup::new()))
    }

    /// Build a group from a fresh empty one and add it with `OR`.
    pub fn or_where_group_with(self, build: impl FnOnce(ConditionGroup) -> ConditionGroup) -> Self {
        self.or_where_group(build(ConditionGroup::new()))
    }

    // ==================== Grouping & ordering ====================

    /// Append GROUP BY fields.
    pub fn group_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.model.group_by.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Append ORDER BY entries. Bare strings sort ascending.
    pub fn order_by<I, O>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<OrderBy>,
    {
        self.model.order_by.extend(entries.into_iter().map(Into::into));
        self
    }

    // ==================== HAVING ====================

    /// Add a HAVING condition joined with `AND`.
    pub fn having(mut self, expr: impl Into<String>) -> Self {
        self.model.having.and_conditions.push(expr.into());
        self
    }

    /// Alias for [`QueryBuilder::having`].
    pub fn having_and(self, expr: impl Into<String>) -> Self {
        self.having(expr)
    }

    /// Add a HAVING condition joined with `OR`.
    pub fn having_or(mut self, expr: impl Into<String>) -> Self {
        self.model.having.or_conditions.push(expr.into());
        self
    }

    pub fn having_group(mut self, group: ConditionGroup) -> Self {
        self.model.having.and_groups.push(group);
        self
    }

    pub fn having_or_group(mut self, group: ConditionGroup) -> Self {
        self.model.having.or_groups.push(group);
        self
    }

    pub fn having_group_with(self, build: impl FnOnce(ConditionGroup) -> ConditionGroup) -> Self {
        self.having_group(build(ConditionGroup::new()))
    }

    pub fn having_or_group_with(
        self,
        build: impl FnOnce(ConditionGroup) -> ConditionGroup,
    ) -> Self {
        self.having_or_group(build(ConditionGroup::new()))
    }

    // ==================== Pagination ====================

    /// `LIMIT 0,count`. A count of 0 emits no LIMIT clause.
    pub fn limit(mut self, count: u64) -> Self {
        self.model.limit = Window::new(0, count);
        self.model.invalid_limit = None;
        self
    }

    /// `LIMIT offset,count`.
    pub fn limit_offset(mut self, offset: u64, count: u64) -> Self {
        self.model.limit = Window::new(offset, count);
        self.model.invalid_limit = None;
        self
    }

    /// Variadic form: `[count]` or `[offset, count]`.
    ///
    /// Any other length is recorded and makes [`QueryBuilder::build`] fail with
    /// [`AuroraError::InvalidLimit`](crate::AuroraError::InvalidLimit).
    pub fn limit_args(mut self, args: &[u64]) -> Self {
        match Window::from_args(args) {
            Ok(window) => {
                self.model.limit = window;
                self.model.invalid_limit = None;
            }
            Err(_) => self.model.invalid_limit = Some(args.to_vec()),
        }
        self
    }

    // ==================== UNION ====================

    /// Append a snapshot of `other` as a UNION branch.
    ///
    /// Later changes to `other` do not reach this query. Parameters bound on
    /// `other` are copied too and merged when the query is built; a name bound
    /// to two different values fails the build.
    pub fn union(mut self, other: &QueryBuilder) -> Self {
        self.model.unions.push(other.model.clone());
        self.union_params.push(other.params.clone());
        self.union_params.extend(other.union_params.iter().cloned());
        self
    }

    /// Build a UNION branch from a fresh builder.
    pub fn union_with(self, build: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        let branch = build(QueryBuilder::new());
        self.union(&branch)
    }

    // ==================== Parameters ====================

    /// Bind a named parameter used as `:name` in condition text.
    pub fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Bind a whole parameter map; its entries win over earlier bindings.
    pub fn params(mut self, params: Params) -> Self {
        self.params.extend(params);
        self
    }

    // ==================== Build ====================

    /// The model built so far.
    pub fn model(&self) -> &QueryModel {
        &self.model
    }

    /// Compile the current model without caching (for debugging).
    pub fn to_sql(&self) -> AuroraResult<String> {
        let sql = compile::compile(&self.model)?;
        self.merged_params()?;
        Ok(sql)
    }

    /// Validate the model and freeze it into a [`Query`].
    pub fn build(self) -> AuroraResult<Query> {
        compile::validate(&self.model)?;
        let params = self.merged_params()?;
        Ok(Query::new(self.model, params))
    }

    /// Own parameters plus those of every union branch.
    ///
    /// A branch may repeat a name only with the same value.
    fn merged_params(&self) -> AuroraResult<Params> {
        let mut merged = self.params.clone();
        for (name, value) in self.union_params.iter().flat_map(Params::iter) {
            match merged.get(name) {
                Some(bound) if bound != value => {
                    return Err(AuroraError::validation(format!(
                        "parameter '{}' is bound to {:?} and, in a UNION branch, to {:?}",
                        name, bound, value
                    )));
                }
                Some(_) => {}
                None => {
                    merged.insert(name, value.clone());
                }
            }
        }
        Ok(merged)
    }
}
