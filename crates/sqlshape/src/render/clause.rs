//! Clause handlers and statement assembly.

use super::expr::{write_expr, write_expr_list, write_value};
use super::writer::SqlWriter;
use crate::error::{QbError, QbResult};
use crate::qb::clause::{Clause, ClauseMap, OrderItem};
use crate::qb::expr::Expr;
use crate::qb::table::{Join, TableExpr, TableSource};
use crate::value::Value;

/// Write every clause of `map` in priority order, separated by one space.
pub(crate) fn write_statement(w: &mut SqlWriter, map: &ClauseMap) -> QbResult<()> {
    if map.is_empty() {
        return Err(QbError::EmptyClauseMap);
    }
    let mut first = true;
    for clause in map.iter() {
        let mark = w.len();
        if !first {
            w.push(" ");
        }
        let before = w.len();
        write_clause(w, clause)?;
        if w.len() == before {
            // Clause rendered to nothing; drop its separator too.
            w.truncate(mark);
            continue;
        }
        first = false;
    }
    Ok(())
}

fn write_clause(w: &mut SqlWriter, clause: &Clause) -> QbResult<()> {
    match clause {
        Clause::Select(exprs) => write_keyword_list(w, "SELECT", exprs)?,
        Clause::SelectDistinct { on, exprs } => {
            w.push("SELECT DISTINCT");
            if !on.is_empty() {
                w.push(" ON (");
                write_expr_list(w, on)?;
                w.push(")");
            }
            if !exprs.is_empty() {
                w.push(" ");
                write_expr_list(w, exprs)?;
            }
        }
        Clause::InsertInto(table) => {
            w.push("INSERT INTO ");
            write_table(w, table)?;
        }
        Clause::Update(table) => {
            w.push("UPDATE ");
            write_table(w, table)?;
        }
        Clause::Columns(columns) => {
            if !columns.is_empty() {
                w.push_column_list(columns);
            }
        }
        Clause::Values(rows) => write_values(w, rows),
        Clause::OnConflict(columns) => {
            w.push("ON CONFLICT");
            if !columns.is_empty() {
                w.push(" ").push_column_list(columns);
            }
        }
        Clause::DoUpdate(exprs) => write_keyword_list(w, "DO UPDATE SET", exprs)?,
        Clause::DoNothing => {
            w.push("DO NOTHING");
        }
        Clause::Set(exprs) => write_keyword_list(w, "SET", exprs)?,
        Clause::From(table) => {
            w.push("FROM ");
            write_table(w, table)?;
        }
        Clause::Join(joins) => w.push_list(joins, " ", write_join)?,
        Clause::Where(expr) => {
            w.push("WHERE ");
            write_expr(w, expr)?;
        }
        Clause::GroupBy(exprs) => write_keyword_list(w, "GROUP BY", exprs)?,
        Clause::Having(expr) => {
            w.push("HAVING ");
            write_expr(w, expr)?;
        }
        Clause::OrderBy(items) => {
            w.push("ORDER BY");
            if !items.is_empty() {
                w.push(" ");
                w.push_list(items, ", ", write_order_item)?;
            }
        }
        Clause::Limit(n) => {
            w.push("LIMIT ").push(&n.to_string());
        }
        Clause::Offset(n) => {
            w.push("OFFSET ").push(&n.to_string());
        }
        Clause::ForUpdate => {
            w.push("FOR UPDATE");
        }
        Clause::Returning(exprs) => write_keyword_list(w, "RETURNING", exprs)?,
    }
    Ok(())
}

/// `KEYWORD a, b, ...`; an empty list leaves the bare keyword.
fn write_keyword_list(w: &mut SqlWriter, keyword: &str, exprs: &[Expr]) -> QbResult<()> {
    w.push(keyword);
    if !exprs.is_empty() {
        w.push(" ");
        write_expr_list(w, exprs)?;
    }
    Ok(())
}

fn write_values(w: &mut SqlWriter, rows: &[Vec<Value>]) {
    if rows.is_empty() {
        w.push("DEFAULT VALUES");
        return;
    }
    w.push("VALUES ");
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            w.push(", ");
        }
        w.push("(");
        for (j, value) in row.iter().enumerate() {
            if j > 0 {
                w.push(", ");
            }
            write_value(w, value);
        }
        w.push(")");
    }
}

fn write_join(w: &mut SqlWriter, join: &Join) -> QbResult<()> {
    w.push(join.kind.as_sql()).push(" JOIN ");
    write_table(w, &join.table)?;
    w.push(" ON ");
    write_expr(w, &join.on)
}

fn write_order_item(w: &mut SqlWriter, item: &OrderItem) -> QbResult<()> {
    write_expr(w, &item.expr)?;
    w.push(" ")
        .push(item.direction.as_sql())
        .push(" ")
        .push(item.nulls.as_sql());
    Ok(())
}

/// Table reference: name, `name alias`, `(subquery) alias` or `(subquery)`.
pub(crate) fn write_table(w: &mut SqlWriter, table: &TableExpr) -> QbResult<()> {
    match table {
        TableExpr::Name(name) => {
            w.push_ident(name);
        }
        TableExpr::Aliased { source, alias } => {
            match source {
                TableSource::Name(name) => {
                    w.push_ident(name);
                }
                TableSource::Subquery(map) => write_subquery(w, map)?,
            }
            w.push(" ").push_ident(alias);
        }
        TableExpr::Subquery(map) => write_subquery(w, map)?,
    }
    Ok(())
}

fn write_subquery(w: &mut SqlWriter, map: &ClauseMap) -> QbResult<()> {
    w.nested(|w| {
        w.push("(");
        write_statement(w, map)?;
        w.push(")");
        Ok(())
    })
}
