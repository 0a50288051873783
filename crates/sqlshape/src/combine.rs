//! Combining clause maps.
//!
//! - [`merge`]: shallow, right-biased. A later map's clause replaces an earlier
//!   one of the same kind.
//! - [`append`]: clause-aware. Lists are concatenated, `values` rows are
//!   extended column-wise and `where`/`having` conditions are AND-ed.

use crate::error::{QbError, QbResult};
use crate::qb::clause::{Clause, ClauseKind, ClauseMap};
use crate::qb::expr::Expr;

/// Combine maps; for a kind present in several maps the last one wins.
///
/// ```
/// use sqlshape::builder::{from, select};
/// use sqlshape::{Expr, merge};
///
/// let merged = merge([
///     select(vec![Expr::ident("x")]),
///     from("f"),
///     select(vec![Expr::ident("y")]),
/// ]);
/// assert_eq!(merged, merge([select(vec![Expr::ident("y")]), from("f")]));
/// ```
pub fn merge<I>(maps: I) -> ClauseMap
where
    I: IntoIterator<Item = ClauseMap>,
{
    let mut out = ClauseMap::new();
    for map in maps {
        out.extend(map);
    }
    out
}

/// Append the clauses of every map onto the first one.
///
/// The first map may hold any clause. Every later map may only hold
/// appendable clauses (see [`ClauseKind::APPENDABLE`]); anything else fails
/// with [`QbError::UnsupportedAppendClause`]. A clause missing from the
/// accumulator is adopted as-is.
pub fn append<I>(maps: I) -> QbResult<ClauseMap>
where
    I: IntoIterator<Item = ClauseMap>,
{
    let mut maps = maps.into_iter();
    let Some(mut acc) = maps.next() else {
        return Ok(ClauseMap::new());
    };
    for next in maps {
        check_appendable(&next)?;
        for clause in next {
            let merged = match acc.remove(clause.kind()) {
                Some(existing) => append_clause(existing, clause)?,
                None => clause,
            };
            acc.insert(merged);
        }
    }
    Ok(acc)
}

fn check_appendable(map: &ClauseMap) -> QbResult<()> {
    let unsupported: Vec<String> = map
        .kinds()
        .filter(|k| !k.is_appendable())
        .map(|k| k.name().to_string())
        .collect();
    if unsupported.is_empty() {
        return Ok(());
    }
    Err(QbError::UnsupportedAppendClause {
        clauses: unsupported,
        supported: ClauseKind::appendable_names(),
    })
}

fn append_clause(left: Clause, right: Clause) -> QbResult<Clause> {
    let clause = match (left, right) {
        (Clause::Columns(mut a), Clause::Columns(b)) => {
            a.extend(b);
            Clause::Columns(a)
        }
        (Clause::Values(mut a), Clause::Values(b)) => {
            if a.len() != b.len() {
                return Err(QbError::ValuesShapeMismatch {
                    left: a.len(),
                    right: b.len(),
                });
            }
            for (row, extra) in a.iter_mut().zip(b) {
                row.extend(extra);
            }
            Clause::Values(a)
        }
        (Clause::Where(a), Clause::Where(b)) => Clause::Where(Expr::And(vec![a, b])),
        (Clause::Having(a), Clause::Having(b)) => Clause::Having(Expr::And(vec![a, b])),
        (Clause::Set(mut a), Clause::Set(b)) => {
            a.extend(b);
            Clause::Set(a)
        }
        (Clause::OrderBy(mut a), Clause::OrderBy(b)) => {
            a.extend(b);
            Clause::OrderBy(a)
        }
        (Clause::Select(mut a), Clause::Select(b)) => {
            a.extend(b);
            Clause::Select(a)
        }
        (Clause::Join(mut a), Clause::Join(b)) => {
            a.extend(b);
            Clause::Join(a)
        }
        (Clause::GroupBy(mut a), Clause::GroupBy(b)) => {
            a.extend(b);
            Clause::GroupBy(a)
        }
        (_, right) => {
            return Err(QbError::UnsupportedAppendClause {
                clauses: vec![right.kind().name().to_string()],
                supported: ClauseKind::appendable_names(),
            });
        }
    };
    Ok(clause)
}
