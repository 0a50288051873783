//! Expression serializer.

use super::clause::write_statement;
use super::writer::SqlWriter;
use crate::error::{QbError, QbResult};
use crate::qb::expr::Expr;
use crate::value::Value;

pub(crate) fn write_value(w: &mut SqlWriter, value: &Value) {
    match value {
        Value::Ident(name) => {
            w.push_ident(name);
        }
        Value::Param(param) => {
            w.push_bind(param.clone());
        }
        Value::Raw(sql) => {
            w.push(sql);
        }
    }
}

pub(crate) fn write_expr_list(w: &mut SqlWriter, exprs: &[Expr]) -> QbResult<()> {
    w.push_list(exprs, ", ", write_expr)
}

pub(crate) fn write_expr(w: &mut SqlWriter, expr: &Expr) -> QbResult<()> {
    match expr {
        Expr::Value(value) => write_value(w, value),
        Expr::Binary { op, left, right } => {
            write_expr(w, left)?;
            w.push(" ").push(op.as_sql()).push(" ");
            write_expr(w, right)?;
        }
        Expr::And(exprs) => write_group(w, exprs, " AND ", "TRUE")?,
        Expr::Or(exprs) => write_group(w, exprs, " OR ", "FALSE")?,
        Expr::CaseWhen(operands) => {
            if operands.is_empty() {
                return Err(QbError::malformed("case_when requires at least 1 operand"));
            }
            w.push("CASE");
            let mut pairs = operands.chunks_exact(2);
            for pair in &mut pairs {
                w.push(" WHEN ");
                write_expr(w, &pair[0])?;
                w.push(" THEN ");
                write_expr(w, &pair[1])?;
            }
            if let [otherwise] = pairs.remainder() {
                w.push(" ELSE ");
                write_expr(w, otherwise)?;
            }
            w.push(" END");
        }
        Expr::In {
            expr,
            list,
            negated,
        } => {
            write_expr(w, expr)?;
            w.push(if *negated { " NOT IN(" } else { " IN(" });
            match list.as_slice() {
                // `IN(NULL)` keeps the statement valid; it never matches.
                [] => {
                    w.push("NULL");
                }
                [Expr::Subquery(map)] => w.nested(|w| write_statement(w, map))?,
                items => write_expr_list(w, items)?,
            }
            w.push(")");
        }
        Expr::IsNull(inner) => {
            write_expr(w, inner)?;
            w.push(" IS NULL");
        }
        Expr::IsNotNull(inner) => {
            write_expr(w, inner)?;
            w.push(" IS NOT NULL");
        }
        Expr::Not(inner) => {
            w.push("NOT (");
            write_expr(w, inner)?;
            w.push(")");
        }
        Expr::Exists(inner) => {
            w.push("EXISTS ");
            if matches!(**inner, Expr::Subquery(_)) {
                write_expr(w, inner)?;
            } else {
                w.push("(");
                write_expr(w, inner)?;
                w.push(")");
            }
        }
        Expr::Call { name, args } => {
            w.push(&name.to_uppercase()).push("(");
            write_expr_list(w, args)?;
            w.push(")");
        }
        Expr::Subquery(map) => w.nested(|w| {
            w.push("(");
            write_statement(w, map)?;
            w.push(")");
            Ok(())
        })?,
    }
    Ok(())
}

/// `(a SEP b SEP ...)`, or `empty` when there are no operands.
fn write_group(w: &mut SqlWriter, exprs: &[Expr], sep: &str, empty: &str) -> QbResult<()> {
    if exprs.is_empty() {
        w.push(empty);
        return Ok(());
    }
    w.push("(");
    w.push_list(exprs, sep, write_expr)?;
    w.push(")");
    Ok(())
}
