//! Statement rendering.
//!
//! [`render`] walks a [`ClauseMap`] in clause priority order and produces a
//! [`Statement`]: SQL text with `$1, $2, ...` placeholders and the bound values
//! in placeholder order.
//!
//! ```
//! use sqlshape::builder::{from, select, where_};
//! use sqlshape::{Expr, merge, render};
//!
//! let map = merge([
//!     select(vec![Expr::ident("id")]),
//!     from("users"),
//!     where_(Expr::eq("id", Expr::param(7))),
//! ]);
//! let stmt = render(&map).unwrap();
//! assert_eq!(stmt.text(), r#"SELECT "id" FROM "users" WHERE "id" = $1"#);
//! assert_eq!(stmt.values().len(), 1);
//! ```

mod clause;
mod expr;
mod writer;

use crate::config::RenderConfig;
use crate::error::QbResult;
use crate::param::Param;
use crate::qb::clause::ClauseMap;
use serde::Serialize;
use std::fmt;
use tokio_postgres::types::ToSql;
use writer::SqlWriter;

/// Rendered SQL text and its bound values.
///
/// `values()[i - 1]` is the value for placeholder `$i`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    text: String,
    values: Vec<Param>,
}

impl Statement {
    /// SQL text with `$n` placeholders.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bound values in placeholder order.
    pub fn values(&self) -> &[Param] {
        &self.values
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect()
    }

    pub fn into_parts(self) -> (String, Vec<Param>) {
        (self.text, self.values)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Render a clause map with the default configuration.
pub fn render(map: &ClauseMap) -> QbResult<Statement> {
    render_with(map, &RenderConfig::default())
}

/// Render a clause map.
///
/// Fails with [`EmptyClauseMap`](crate::QbError::EmptyClauseMap) on an empty
/// map (also when nested) and with
/// [`DepthExceeded`](crate::QbError::DepthExceeded) when nesting passes
/// `config.max_depth`.
pub fn render_with(map: &ClauseMap, config: &RenderConfig) -> QbResult<Statement> {
    let mut w = SqlWriter::new(config);
    clause::write_statement(&mut w, map)?;
    let (text, values) = w.finish();
    let stmt = Statement { text, values };

    #[cfg(feature = "tracing")]
    trace_rendered(&stmt);

    Ok(stmt)
}

impl ClauseMap {
    /// Render with the default configuration.
    pub fn to_statement(&self) -> QbResult<Statement> {
        render(self)
    }
}

#[cfg(feature = "tracing")]
const MAX_LOGGED_SQL: usize = 200;

#[cfg(feature = "tracing")]
fn trace_rendered(stmt: &Statement) {
    let sql = if stmt.text.len() > MAX_LOGGED_SQL {
        format!("{}...", truncate_sql_bytes(&stmt.text, MAX_LOGGED_SQL))
    } else {
        stmt.text.clone()
    };
    tracing::debug!(
        target: "sqlshape.render",
        param_count = stmt.values.len(),
        sql = %sql,
        "rendered statement"
    );
}

/// Cut `sql` to at most `max_bytes`, backing off to a char boundary.
#[cfg(feature = "tracing")]
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(test)]
mod tests;
