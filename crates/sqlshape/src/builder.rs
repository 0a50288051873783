//! Single-clause constructors.
//!
//! Every function returns a clause map holding exactly one clause, so
//! statements are assembled by combining small maps with [`merge`] or
//! [`append`]:
//!
//! ```
//! use sqlshape::builder::*;
//! use sqlshape::{Expr, Value, merge};
//!
//! let map = merge([
//!     insert_into("users"),
//!     columns(["name", "email"]),
//!     values(vec![vec![Value::param("alice"), Value::param("a@example.com")]]),
//!     returning(vec![Expr::ident("id")]),
//! ]);
//! let stmt = map.to_statement().unwrap();
//! assert_eq!(
//!     stmt.text(),
//!     r#"INSERT INTO "users" ("name", "email") VALUES ($1, $2) RETURNING "id""#
//! );
//! ```
//!
//! [`merge`]: crate::merge
//! [`append`]: crate::append

use crate::qb::clause::{Clause, ClauseMap, Direction, Nulls, OrderItem};
use crate::qb::expr::Expr;
use crate::qb::table::{Join, JoinKind, TableExpr, TableSource};
use crate::value::Value;

fn one(clause: Clause) -> ClauseMap {
    ClauseMap::from(clause)
}

pub fn select(exprs: Vec<Expr>) -> ClauseMap {
    one(Clause::Select(exprs))
}

/// `SELECT DISTINCT ON (on...) exprs...`
pub fn select_distinct(on: Vec<Expr>, exprs: Vec<Expr>) -> ClauseMap {
    one(Clause::SelectDistinct { on, exprs })
}

pub fn insert_into(table: impl Into<TableExpr>) -> ClauseMap {
    one(Clause::InsertInto(table.into()))
}

pub fn insert_into_as(table: impl Into<TableSource>, alias: impl Into<String>) -> ClauseMap {
    one(Clause::InsertInto(TableExpr::aliased(table, alias)))
}

pub fn update(table: impl Into<TableExpr>) -> ClauseMap {
    one(Clause::Update(table.into()))
}

pub fn update_as(table: impl Into<TableSource>, alias: impl Into<String>) -> ClauseMap {
    one(Clause::Update(TableExpr::aliased(table, alias)))
}

/// Column list of an INSERT. An empty list renders nothing.
pub fn columns<I, S>(columns: I) -> ClauseMap
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    one(Clause::Columns(columns.into_iter().map(Into::into).collect()))
}

/// VALUES rows. No rows renders `DEFAULT VALUES`.
pub fn values(rows: Vec<Vec<Value>>) -> ClauseMap {
    one(Clause::Values(rows))
}

pub fn on_conflict<I, S>(columns: I) -> ClauseMap
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    one(Clause::OnConflict(
        columns.into_iter().map(Into::into).collect(),
    ))
}

/// `DO UPDATE SET exprs...`
pub fn do_update(exprs: Vec<Expr>) -> ClauseMap {
    one(Clause::DoUpdate(exprs))
}

pub fn do_nothing() -> ClauseMap {
    one(Clause::DoNothing)
}

pub fn set(exprs: Vec<Expr>) -> ClauseMap {
    one(Clause::Set(exprs))
}

pub fn from(table: impl Into<TableExpr>) -> ClauseMap {
    one(Clause::From(table.into()))
}

/// `FROM table alias` / `FROM (subquery) alias`
pub fn from_as(table: impl Into<TableSource>, alias: impl Into<String>) -> ClauseMap {
    one(Clause::From(TableExpr::aliased(table, alias)))
}

pub fn joins(joins: Vec<Join>) -> ClauseMap {
    one(Clause::Join(joins))
}

/// `INNER JOIN table alias ON on`
pub fn join(table: impl Into<TableSource>, alias: impl Into<String>, on: impl Into<Expr>) -> Join {
    Join::new(JoinKind::Inner, TableExpr::aliased(table, alias), on)
}

/// `LEFT JOIN table alias ON on`
pub fn left_join(
    table: impl Into<TableSource>,
    alias: impl Into<String>,
    on: impl Into<Expr>,
) -> Join {
    Join::new(JoinKind::Left, TableExpr::aliased(table, alias), on)
}

/// `WHERE expr`. Named with a trailing underscore since `where` is a keyword.
pub fn where_(expr: impl Into<Expr>) -> ClauseMap {
    one(Clause::Where(expr.into()))
}

pub fn group_by(exprs: Vec<Expr>) -> ClauseMap {
    one(Clause::GroupBy(exprs))
}

pub fn having(expr: impl Into<Expr>) -> ClauseMap {
    one(Clause::Having(expr.into()))
}

pub fn order_by(items: Vec<OrderItem>) -> ClauseMap {
    one(Clause::OrderBy(items))
}

/// Single-item ORDER BY.
///
/// Without an explicit `nulls`, ASC sorts NULLS LAST and DESC sorts
/// NULLS FIRST.
pub fn order_by_with(
    expr: impl Into<Expr>,
    direction: Direction,
    nulls: Option<Nulls>,
) -> ClauseMap {
    let item = OrderItem::new(expr, direction);
    let item = match nulls {
        Some(nulls) => item.nulls(nulls),
        None => item,
    };
    order_by(vec![item])
}

pub fn limit(n: u64) -> ClauseMap {
    one(Clause::Limit(n))
}

pub fn offset(n: u64) -> ClauseMap {
    one(Clause::Offset(n))
}

pub fn for_update() -> ClauseMap {
    one(Clause::ForUpdate)
}

pub fn returning(exprs: Vec<Expr>) -> ClauseMap {
    one(Clause::Returning(exprs))
}
