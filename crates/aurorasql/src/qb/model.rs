//! The structured representation of one statement before compilation.

use crate::error::{AuroraError, AuroraResult};
use crate::qb::condition::ConditionGroup;
use crate::qb::join::Join;
use crate::qb::order::OrderBy;

/// Statement head: either a projection or a delete target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Head {
    Select(Vec<String>),
    Delete(String),
}

/// Kind of statement a model compiles to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Delete,
}

/// `LIMIT offset,count` window. A `count` of 0 means no LIMIT clause.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub count: u64,
}

impl Window {
    pub fn new(offset: u64, count: u64) -> Self {
        Self { offset, count }
    }

    /// Interpret a `limit(...)` argument list: `[count]` or `[offset, count]`.
    pub fn from_args(args: &[u64]) -> AuroraResult<Self> {
        match *args {
            [count] => Ok(Self::new(0, count)),
            [offset, count] => Ok(Self::new(offset, count)),
            _ => Err(AuroraError::InvalidLimit {
                args: args.to_vec(),
            }),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.count == 0
    }
}

/// Everything one statement (or one union branch) says.
///
/// Every list keeps insertion order, which is also output order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryModel {
    pub(crate) head: Option<Head>,
    pub(crate) source: Option<String>,
    pub(crate) joins: Vec<Join>,
    pub(crate) where_clause: ConditionGroup,
    pub(crate) group_by: Vec<String>,
    pub(crate) order_by: Vec<OrderBy>,
    pub(crate) having: ConditionGroup,
    pub(crate) limit: Window,
    /// Arguments of a rejected `limit_args` call, reported at compile time.
    pub(crate) invalid_limit: Option<Vec<u64>>,
    pub(crate) unions: Vec<QueryModel>,
}

impl QueryModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head(&self) -> Option<&Head> {
        self.head.as_ref()
    }

    pub fn kind(&self) -> Option<StatementKind> {
        self.head.as_ref().map(|head| match head {
            Head::Select(_) => StatementKind::Select,
            Head::Delete(_) => StatementKind::Delete,
        })
    }

    pub fn projection(&self) -> &[String] {
        match &self.head {
            Some(Head::Select(fields)) => fields,
            _ => &[],
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn where_clause(&self) -> &ConditionGroup {
        &self.where_clause
    }

    pub fn group_by(&self) -> &[String] {
        &self.group_by
    }

    pub fn order_by(&self) -> &[OrderBy] {
        &self.order_by
    }

    pub fn having(&self) -> &ConditionGroup {
        &self.having
    }

    pub fn limit(&self) -> Window {
        self.limit
    }

    pub fn unions(&self) -> &[QueryModel] {
        &self.unions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_from_args() {
        assert_eq!(Window::from_args(&[5]).unwrap(), Window::new(0, 5));
        assert_eq!(Window::from_args(&[2, 5]).unwrap(), Window::new(2, 5));
        assert!(matches!(
            Window::from_args(&[]),
            Err(AuroraError::InvalidLimit { ref args }) if args.is_empty()
        ));
        assert!(Window::from_args(&[1, 2, 3]).is_err());
        assert!(Window::new(3, 0).is_unbounded());
    }
}
