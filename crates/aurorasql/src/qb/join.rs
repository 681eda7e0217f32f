//! JOIN descriptors and alias resolution.

/// JOIN flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

/// A single join: `source` is the joined table expression, `target` the table
/// it is attached to. The ON predicate compares `source.primary_key` with
/// `target.foreign_key`, each side qualified by its resolved alias.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Join {
    pub kind: JoinKind,
    pub source: String,
    pub target: String,
    pub primary_key: String,
    pub foreign_key: String,
}

impl Join {
    pub fn new(
        kind: JoinKind,
        source: impl Into<String>,
        target: impl Into<String>,
        primary_key: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            source: source.into(),
            target: target.into(),
            primary_key: primary_key.into(),
            foreign_key: foreign_key.into(),
        }
    }

    /// Render `JOIN <source> ON `<alias>`.`<pk>` = `<alias>`.`<fk>``.
    pub fn to_sql(&self) -> String {
        format!(
            "{} {} ON `{}`.`{}` = `{}`.`{}`",
            self.kind.keyword(),
            self.source,
            resolve_alias(&self.source),
            self.primary_key,
            resolve_alias(&self.target),
            self.foreign_key
        )
    }
}

/// Text after the last case-insensitive `" as "`, trimmed.
pub(crate) fn alias_after_as(expr: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets valid for slicing `expr`.
    let lowered = expr.to_ascii_lowercase();
    lowered.rfind(" as ").map(|idx| expr[idx + 4..].trim())
}

/// Derive the alias that qualifies columns of a table expression.
///
/// - `"orders AS o"` -> `"o"` (last case-insensitive `" as "`)
/// - `"(SELECT ...) o"` -> `"o"` (text after the last `)`)
/// - `"orders"` -> `"orders"`
pub fn resolve_alias(expr: &str) -> &str {
    if let Some(alias) = alias_after_as(expr) {
        return alias;
    }
    match expr.rfind(')') {
        Some(idx) => expr[idx + 1..].trim(),
        None => expr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_resolution() {
        assert_eq!(resolve_alias("orders AS o"), "o");
        assert_eq!(resolve_alias("orders as o"), "o");
        assert_eq!(resolve_alias("orders"), "orders");
        assert_eq!(resolve_alias("(SELECT 1) o"), "o");
        assert_eq!(resolve_alias("(SELECT id AS x FROM t) AS sub"), "sub");
        assert_eq!(resolve_alias("(SELECT (1)) t2 "), "t2");
    }

    #[test]
    fn join_renders_qualified_keys() {
        let join = Join::new(JoinKind::Left, "orders AS o", "users u", "user_id", "id");
        // "users u" has neither AS nor a parenthesis, so it is used verbatim.
        assert_eq!(
            join.to_sql(),
            "LEFT JOIN orders AS o ON `o`.`user_id` = `users u`.`id`"
        );

        let join = Join::new(JoinKind::Inner, "orders", "users", "user_id", "id");
        assert_eq!(
            join.to_sql(),
            "JOIN orders ON `orders`.`user_id` = `users`.`id`"
        );
    }
}
