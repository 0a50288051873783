//! Clause map data model.
//!
//! A statement is described as a [`ClauseMap`]: at most one [`Clause`] per
//! [`ClauseKind`], each carrying typed payloads built from [`Expr`],
//! [`TableExpr`], [`Join`] and [`OrderItem`]. Nested clause maps act as
//! subqueries anywhere an expression or table is accepted.
//!
//! # Usage
//!
//! ```
//! use sqlshape::qb::{Clause, ClauseMap, Expr};
//!
//! let map = ClauseMap::new()
//!     .with(Clause::From("users".into()))
//!     .with(Clause::Select(vec![Expr::ident("id")]))
//!     .with(Clause::Where(Expr::eq("status", Expr::param("active"))));
//!
//! let stmt = sqlshape::render(&map).unwrap();
//! assert_eq!(stmt.text(), r#"SELECT "id" FROM "users" WHERE "status" = $1"#);
//! ```

pub mod clause;
pub mod expr;
pub mod table;

pub use clause::{Clause, ClauseKind, ClauseMap, Direction, Nulls, OrderItem};
pub use expr::{BinaryOp, EXPR_TAGS, Expr};
pub use table::{Join, JoinKind, TableExpr, TableSource};
