//! # aurorasql
//!
//! A structured MySQL query builder and compiler for the Aurora Serverless
//! Data API.
//!
//! ## Features
//!
//! - **Structured queries**: a fluent builder fills a query model; a compiler turns it
//!   into one deterministic SQL string
//! - **Named parameters**: `:name` placeholders in condition text, values bound separately
//! - **Nested conditions**: AND/OR groups of any depth for WHERE and HAVING
//! - **Joins, unions, grouping, ordering, `LIMIT offset,count`**
//! - **Typed rows**: records decode against the projection's field names
//! - **Transaction-friendly**: pass a [`Transaction`] anywhere an [`Executor`] is expected
//! - **Scripts**: run a separator-delimited SQL file in one transaction
//!
//! The Data API transport itself is a trait ([`DataApiClient`]); plug in any
//! client that can send the request types from [`wire`].
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use aurorasql::qb;
//!
//! let query = qb::select(["id", "name AS n"])
//!     .from("users")
//!     .where_("id > :minId")
//!     .limit(10)
//!     .bind("minId", 5)
//!     .build()?;
//!
//! assert_eq!(query.sql(), "SELECT id,name AS n FROM users WHERE id > :minId LIMIT 0,10");
//!
//! for row in query.fetch_all(&session).await? {
//!     let name: String = row.try_get("n")?;
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod monitor;
pub mod qb;
pub mod row;
pub mod script;
pub mod session;
pub mod value;
pub mod wire;

pub use client::{DataApiClient, Executor};
pub use config::{ConnectionConfig, SessionConfig};
pub use error::{AuroraError, AuroraResult};
pub use monitor::SqlLogger;
pub use row::{FromRow, Row, decode_rows};
pub use script::{execute_file, execute_script, split_statements};
pub use session::{Session, Transaction};
pub use value::{FromValue, Params, Value};

// Re-export qb module for easy access
pub use qb::{
    ConditionGroup, InsertQb, OrderBy, Query, QueryBuilder, SqlStatement, UpdateQb, delete,
    insert, insert_ignore, query, replace, select, update,
};
