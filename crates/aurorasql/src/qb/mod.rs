//! Query builders for the Aurora Data API (MySQL dialect).
//!
//! SELECT and DELETE statements go through one pipeline: a [`QueryBuilder`]
//! fills a [`QueryModel`], [`QueryBuilder::build`] validates it into a
//! [`Query`], and the compiler renders it to a single SQL string. Named
//! parameters (`:name`) appear verbatim in condition text and are bound
//! separately, so the SQL never carries values.
//!
//! INSERT/REPLACE and UPDATE have their own small builders which generate
//! their placeholders themselves.
//!
//! # Usage
//!
//! ```ignore
//! use aurorasql::qb;
//!
//! let users = qb::select(["id", "name AS n"])
//!     .from("users u")
//!     .left_join("orders o", "u", "user_id", "id")
//!     .where_("u.status = :status")
//!     .or_where_group_with(|g| g.where_("u.karma > :karma").where_("u.verified = 1"))
//!     .order_by([qb::OrderBy::desc("u.created_at")])
//!     .limit(20)
//!     .bind("status", "active")
//!     .bind("karma", 100)
//!     .build()?
//!     .fetch_all(&session)
//!     .await?;
//!
//! qb::insert("users")
//!     .columns(["name", "email"])
//!     .row(["alice", "alice@example.com"])
//!     .insert(&session)
//!     .await?;
//!
//! qb::update("users")
//!     .set("status", "inactive")
//!     .where_("id = :id")
//!     .bind("id", 7)
//!     .execute(&session)
//!     .await?;
//! ```

mod builder;
mod compile;
mod condition;
mod insert;
mod join;
mod model;
mod order;
mod query;
mod traits;
mod update;

pub use builder::QueryBuilder;
pub use compile::{compile, result_field_names, validate};
pub use condition::{Cond, ConditionGroup, and, or};
pub use insert::{InsertMode, InsertOutcome, InsertQb};
pub use join::{Join, JoinKind, resolve_alias};
pub use model::{Head, QueryModel, StatementKind, Window};
pub use order::{Direction, OrderBy};
pub use query::Query;
pub use traits::{BuiltStatement, SqlStatement};
pub use update::UpdateQb;

/// Create an empty query builder.
pub fn query() -> QueryBuilder {
    QueryBuilder::new()
}

/// Create a SELECT builder with the given projection.
///
/// # Example
/// ```ignore
/// let q = aurorasql::qb::select(["id", "name"]).from("users").build()?;
/// ```
pub fn select<I, S>(fields: I) -> QueryBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    QueryBuilder::new().select(fields)
}

/// Create a DELETE builder for the given table.
pub fn delete(table: &str) -> QueryBuilder {
    QueryBuilder::new().delete(table)
}

/// Create an INSERT builder for the given table.
///
/// # Example
/// ```ignore
/// let qb = aurorasql::qb::insert("users")
///     .columns(["name", "age"])
///     .row([Value::from("alice"), Value::from(30)]);
/// ```
pub fn insert(table: &str) -> InsertQb {
    InsertQb::new(table)
}

/// Create an `INSERT IGNORE` builder for the given table.
pub fn insert_ignore(table: &str) -> InsertQb {
    InsertQb::new(table).ignore()
}

/// Create a `REPLACE` builder for the given table.
pub fn replace(table: &str) -> InsertQb {
    InsertQb::new(table).replace()
}

/// Create an UPDATE builder for the given table.
pub fn update(table: &str) -> UpdateQb {
    UpdateQb::new(table)
}
