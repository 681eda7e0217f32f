//! Nested boolean condition groups for WHERE/HAVING clauses.
//!
//! A [`ConditionGroup`] keeps four ordered lists: flat conditions joined with
//! `AND`, flat conditions joined with `OR`, nested groups joined with `AND` and
//! nested groups joined with `OR`. When rendered, entries come out in that
//! category order; the first one carries no connective, every later one carries
//! the connective of its category.
//!
//! Groups are plain values. Build them with the chaining methods or with the
//! [`and`] / [`or`] combinators:
//!
//! ```ignore
//! use aurorasql::qb::{and, or, Cond};
//!
//! // (status = 'active' AND (role = 'admin' OR karma > 100))
//! let group = and([
//!     Cond::from("status = 'active'"),
//!     or(["role = 'admin'", "karma > 100"]).into(),
//! ]);
//! ```

/// One item handed to the [`and`] / [`or`] combinators.
#[derive(Clone, Debug, PartialEq)]
pub enum Cond {
    /// A raw boolean expression, emitted verbatim.
    Raw(String),
    /// A nested, parenthesized group.
    Group(ConditionGroup),
}

impl Cond {
    pub fn raw(expr: impl Into<String>) -> Self {
        Cond::Raw(expr.into())
    }
}

impl From<&str> for Cond {
    fn from(expr: &str) -> Self {
        Cond::Raw(expr.to_string())
    }
}

impl From<String> for Cond {
    fn from(expr: String) -> Self {
        Cond::Raw(expr)
    }
}

impl From<ConditionGroup> for Cond {
    fn from(group: ConditionGroup) -> Self {
        Cond::Group(group)
    }
}

/// A parenthesized collection of conditions with AND/OR relations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConditionGroup {
    pub(crate) and_conditions: Vec<String>,
    pub(crate) or_conditions: Vec<String>,
    pub(crate) and_groups: Vec<ConditionGroup>,
    pub(crate) or_groups: Vec<ConditionGroup>,
}

impl ConditionGroup {
    /// Create a new empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition joined with `AND`.
    pub fn where_(mut self, expr: impl Into<String>) -> Self {
        self.and_conditions.push(expr.into());
        self
    }

    /// Alias for [`ConditionGroup::where_`].
    pub fn and_where(self, expr: impl Into<String>) -> Self {
        self.where_(expr)
    }

    /// Add a condition joined with `OR`.
    pub fn or_where(mut self, expr: impl Into<String>) -> Self {
        self.or_conditions.push(expr.into());
        self
    }

    /// Nest a group joined with `AND`.
    pub fn group(mut self, group: ConditionGroup) -> Self {
        self.and_groups.push(group);
        self
    }

    /// Nest a group joined with `OR`.
    pub fn or_group(mut self, group: ConditionGroup) -> Self {
        self.or_groups.push(group);
        self
    }

    /// Nest a group built from a fresh empty group, joined with `AND`.
    pub fn group_with(self, build: impl FnOnce(ConditionGroup) -> ConditionGroup) -> Self {
        self.group(build(ConditionGroup::new()))
    }

    /// Nest a group built from a fresh empty group, joined with `OR`.
    pub fn or_group_with(self, build: impl FnOnce(ConditionGroup) -> ConditionGroup) -> Self {
        self.or_group(build(ConditionGroup::new()))
    }

    /// Add a condition or a group joined with `AND`.
    pub fn and(self, cond: impl Into<Cond>) -> Self {
        match cond.into() {
            Cond::Raw(expr) => self.where_(expr),
            Cond::Group(group) => self.group(group),
        }
    }

    /// Add a condition or a group joined with `OR`.
    pub fn or(self, cond: impl Into<Cond>) -> Self {
        match cond.into() {
            Cond::Raw(expr) => self.or_where(expr),
            Cond::Group(group) => self.or_group(group),
        }
    }

    /// True when nothing in this group (or any nested group) would be emitted.
    pub fn is_empty(&self) -> bool {
        self.and_conditions.iter().all(|c| c.trim().is_empty())
            && self.or_conditions.iter().all(|c| c.trim().is_empty())
            && self.and_groups.iter().all(ConditionGroup::is_empty)
            && self.or_groups.iter().all(ConditionGroup::is_empty)
    }

    pub fn and_conditions(&self) -> &[String] {
        &self.and_conditions
    }

    pub fn or_conditions(&self) -> &[String] {
        &self.or_conditions
    }

    pub fn and_groups(&self) -> &[ConditionGroup] {
        &self.and_groups
    }

    pub fn or_groups(&self) -> &[ConditionGroup] {
        &self.or_groups
    }
}

/// Build a group whose entries are all joined with `AND`.
pub fn and<C: Into<Cond>>(items: impl IntoIterator<Item = C>) -> ConditionGroup {
    items.into_iter().fold(ConditionGroup::new(), ConditionGroup::and)
}

/// Build a group whose entries are all joined with `OR`.
pub fn or<C: Into<Cond>>(items: impl IntoIterator<Item = C>) -> ConditionGroup {
    items.into_iter().fold(ConditionGroup::new(), ConditionGroup::or)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinators_sort_items_into_lists() {
        let group = and([Cond::from("a = 1"), or(["b = 2", "c = 3"]).into()]);
        assert_eq!(group.and_conditions(), ["a = 1"]);
        assert_eq!(group.and_groups().len(), 1);
        assert_eq!(group.and_groups()[0].or_conditions(), ["b = 2", "c = 3"]);
    }

    #[test]
    fn blank_groups_are_empty() {
        assert!(ConditionGroup::new().is_empty());
        assert!(ConditionGroup::new().where_("  ").group(ConditionGroup::new()).is_empty());
        assert!(!ConditionGroup::new().or_group(or(["x"])).is_empty());
    }
}
