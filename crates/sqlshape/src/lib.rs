//! # sqlshape
//!
//! A structural SQL statement builder for PostgreSQL.
//!
//! ## Features
//!
//! - **Data, not strings**: statements are clause maps of typed expressions
//! - **Parameter-safe**: inline parameters become `$1, $2, ...` with values in placeholder order
//! - **Composable**: nested clause maps are subqueries; `merge` / `append` combine maps
//! - **Deterministic**: clauses always render in SQL order, whatever order they were added in
//! - **Dynamic form**: clause maps convert to and from JSON
//!
//! ## Example
//!
//! ```
//! use sqlshape::builder::*;
//! use sqlshape::{Expr, OrderItem, append, merge};
//!
//! let base = merge([
//!     select(vec![Expr::ident("u.id"), Expr::ident("u.name")]),
//!     from_as("users", "u"),
//!     where_(Expr::eq("u.active", Expr::param(true))),
//! ]);
//!
//! // Narrow the query further without rebuilding it.
//! let map = append([
//!     base,
//!     where_(Expr::ilike("u.name", Expr::param("%ann%"))),
//!     order_by(vec![OrderItem::asc("u.name")]),
//! ])
//! .unwrap();
//!
//! let stmt = map.to_statement().unwrap();
//! assert_eq!(
//!     stmt.text(),
//!     r#"SELECT "u"."id", "u"."name" FROM "users" "u" WHERE ("u"."active" = $1 AND "u"."name" ILIKE $2) ORDER BY "u"."name" ASC NULLS LAST"#
//! );
//! assert_eq!(stmt.values().len(), 2);
//! ```
//!
//! A [`Statement`] hands its values straight to `tokio-postgres`:
//!
//! ```ignore
//! let stmt = sqlshape::render(&map)?;
//! let rows = client.query(stmt.text(), &stmt.params_ref()).await?;
//! ```

pub mod builder;
pub mod combine;
pub mod config;
pub mod error;
pub mod ident;
pub mod json;
pub mod param;
pub mod qb;
pub mod render;
pub mod value;

pub use combine::{append, merge};
pub use config::{DEFAULT_MAX_DEPTH, RenderConfig};
pub use error::{QbError, QbResult};
pub use param::Param;
pub use qb::{
    BinaryOp, Clause, ClauseKind, ClauseMap, Direction, Expr, Join, JoinKind, Nulls, OrderItem,
    TableExpr, TableSource,
};
pub use render::{Statement, render, render_with};
pub use value::Value;
