//! Table expressions and joins.

use crate::qb::clause::ClauseMap;
use crate::qb::expr::Expr;
use std::fmt;

/// The thing an alias is attached to.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    Name(String),
    Subquery(ClauseMap),
}

/// A table reference in FROM / JOIN / INSERT INTO / UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub enum TableExpr {
    /// `"schema"."table"`
    Name(String),
    /// `"table" "alias"` or `(SELECT ...) "alias"`
    Aliased { source: TableSource, alias: String },
    /// `(SELECT ...)` without alias
    Subquery(ClauseMap),
}

impl TableExpr {
    pub fn name(name: impl Into<String>) -> Self {
        TableExpr::Name(name.into())
    }

    /// `table alias` or `(subquery) alias`
    pub fn aliased(source: impl Into<TableSource>, alias: impl Into<String>) -> Self {
        TableExpr::Aliased {
            source: source.into(),
            alias: alias.into(),
        }
    }
}

impl From<&str> for TableSource {
    fn from(name: &str) -> Self {
        TableSource::Name(name.to_string())
    }
}

impl From<String> for TableSource {
    fn from(name: String) -> Self {
        TableSource::Name(name)
    }
}

impl From<ClauseMap> for TableSource {
    fn from(map: ClauseMap) -> Self {
        TableSource::Subquery(map)
    }
}

impl From<&str> for TableExpr {
    fn from(name: &str) -> Self {
        TableExpr::Name(name.to_string())
    }
}

impl From<String> for TableExpr {
    fn from(name: String) -> Self {
        TableExpr::Name(name)
    }
}

impl From<ClauseMap> for TableExpr {
    fn from(map: ClauseMap) -> Self {
        TableExpr::Subquery(map)
    }
}

impl From<(&str, &str)> for TableExpr {
    fn from((name, alias): (&str, &str)) -> Self {
        TableExpr::aliased(name, alias)
    }
}

impl From<(ClauseMap, &str)> for TableExpr {
    fn from((subquery, alias): (ClauseMap, &str)) -> Self {
        TableExpr::aliased(subquery, alias)
    }
}

/// Join kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub const ALL: [JoinKind; 5] = [
        JoinKind::Inner,
        JoinKind::Left,
        JoinKind::Right,
        JoinKind::Full,
        JoinKind::Cross,
    ];

    pub fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Full => "FULL",
            JoinKind::Cross => "CROSS",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_sql() == s)
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One `KIND JOIN table ON condition` item.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableExpr,
    pub on: Expr,
}

impl Join {
    pub fn new(kind: JoinKind, table: impl Into<TableExpr>, on: impl Into<Expr>) -> Self {
        Self {
            kind,
            table: table.into(),
            on: on.into(),
        }
    }
}
