//! Expression tree.
//!
//! This module provides the [`Expr`] enum which supports:
//! - leaf values (identifiers, inline parameters, raw SQL)
//! - binary comparisons (`=`, `!=`, `>`, `LIKE`, `&&`, ...)
//! - AND/OR groups, CASE WHEN, IN / NOT IN, IS [NOT] NULL, NOT, EXISTS
//! - function calls
//! - nested clause maps, rendered as parenthesized subqueries
//!
//! Expressions carry no placeholder numbers. Numbering happens once, at render
//! time, in the order placeholders are written.

use crate::param::Param;
use crate::qb::clause::ClauseMap;
use crate::value::Value;

/// Operator tags accepted in the dynamic (JSON) form, in dispatch-table order.
pub const EXPR_TAGS: &[&str] = &[
    "=", "!=", ">", ">=", "<", "<=", "as", "%", "and", "or", "null", "not_null", "case_when", "in",
    "like", "ilike", "not_in", "&&", "not", "exists",
];

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Column alias: `expr as name`
    As,
    Like,
    Ilike,
    /// Array/range overlap: `&&`
    Overlaps,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 10] = [
        BinaryOp::Eq,
        BinaryOp::Neq,
        BinaryOp::Gt,
        BinaryOp::Gte,
        BinaryOp::Lt,
        BinaryOp::Lte,
        BinaryOp::As,
        BinaryOp::Like,
        BinaryOp::Ilike,
        BinaryOp::Overlaps,
    ];

    /// Tag used in the dynamic form.
    pub fn tag(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Neq => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::As => "as",
            BinaryOp::Like => "like",
            BinaryOp::Ilike => "ilike",
            BinaryOp::Overlaps => "&&",
        }
    }

    /// Operator text written between the operands.
    pub fn as_sql(self) -> &'static str {
        match self {
            BinaryOp::Like => "LIKE",
            BinaryOp::Ilike => "ILIKE",
            other => other.tag(),
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.tag() == tag)
    }
}

/// Expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Identifier, inline parameter or raw SQL.
    Value(Value),

    /// `left op right`, no parentheses added.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `(a AND b AND ...)`
    And(Vec<Expr>),

    /// `(a OR b OR ...)`
    Or(Vec<Expr>),

    /// `CASE WHEN c1 THEN r1 ... [ELSE z] END`.
    ///
    /// Operands are consumed in (condition, result) pairs; a trailing odd
    /// operand is the ELSE branch.
    CaseWhen(Vec<Expr>),

    /// `expr IN(...)` / `expr NOT IN(...)`.
    ///
    /// A single subquery operand renders as `IN(SELECT ...)`; anything else
    /// renders as a comma-separated list.
    In {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },

    /// `expr IS NULL`
    IsNull(Box<Expr>),

    /// `expr IS NOT NULL`
    IsNotNull(Box<Expr>),

    /// `NOT (expr)`
    Not(Box<Expr>),

    /// `EXISTS (subquery)`
    Exists(Box<Expr>),

    /// `NAME(arg, ...)`, name upper-cased on output.
    Call { name: String, args: Vec<Expr> },

    /// Nested statement, rendered as `(...)`.
    Subquery(ClauseMap),
}

impl Expr {
    /// Identifier / column reference.
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Value(Value::ident(name))
    }

    /// Inline parameter.
    pub fn param(value: impl Into<Param>) -> Self {
        Expr::Value(Value::param(value))
    }

    /// Raw SQL fragment, inserted verbatim.
    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Value(Value::raw(sql))
    }

    /// Nested statement used as an expression.
    pub fn subquery(map: ClauseMap) -> Self {
        Expr::Subquery(map)
    }

    /// Binary expression with an arbitrary operator.
    pub fn binary(op: BinaryOp, left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left.into()),
            right: Box::new(right.into()),
        }
    }

    /// `left = right`
    pub fn eq(left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Eq, left, right)
    }

    /// `left != right`
    pub fn neq(left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Neq, left, right)
    }

    /// `left > right`
    pub fn gt(left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Gt, left, right)
    }

    /// `left >= right`
    pub fn gte(left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Gte, left, right)
    }

    /// `left < right`
    pub fn lt(left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Lt, left, right)
    }

    /// `left <= right`
    pub fn lte(left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Lte, left, right)
    }

    /// `expr as alias`
    pub fn as_(expr: impl Into<Expr>, alias: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::As, expr, alias)
    }

    /// `left LIKE pattern`
    pub fn like(left: impl Into<Expr>, pattern: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Like, left, pattern)
    }

    /// `left ILIKE pattern` (case-insensitive)
    pub fn ilike(left: impl Into<Expr>, pattern: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Ilike, left, pattern)
    }

    /// `left && right`
    pub fn overlaps(left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Overlaps, left, right)
    }

    /// Create an AND group from a list of expressions.
    pub fn and(exprs: Vec<Expr>) -> Self {
        Expr::And(exprs)
    }

    /// Create an OR group from a list of expressions.
    pub fn or(exprs: Vec<Expr>) -> Self {
        Expr::Or(exprs)
    }

    /// Function call; `name` is upper-cased on output.
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.into(),
            args,
        }
    }

    pub fn is_null(expr: impl Into<Expr>) -> Self {
        Expr::IsNull(Box::new(expr.into()))
    }

    pub fn is_not_null(expr: impl Into<Expr>) -> Self {
        Expr::IsNotNull(Box::new(expr.into()))
    }

    pub fn not(expr: impl Into<Expr>) -> Self {
        Expr::Not(Box::new(expr.into()))
    }

    pub fn exists(subquery: ClauseMap) -> Self {
        Expr::Exists(Box::new(Expr::Subquery(subquery)))
    }

    /// CASE WHEN from (condition, result) pairs and an optional trailing ELSE.
    pub fn case_when(operands: Vec<Expr>) -> Self {
        Expr::CaseWhen(operands)
    }

    /// `expr IN(v1, v2, ...)`
    pub fn in_list(expr: impl Into<Expr>, list: Vec<Expr>) -> Self {
        Expr::In {
            expr: Box::new(expr.into()),
            list,
            negated: false,
        }
    }

    /// `expr IN(SELECT ...)`
    pub fn in_subquery(expr: impl Into<Expr>, subquery: ClauseMap) -> Self {
        Self::in_list(expr, vec![Expr::Subquery(subquery)])
    }

    /// `expr NOT IN(v1, v2, ...)`
    pub fn not_in(expr: impl Into<Expr>, list: Vec<Expr>) -> Self {
        Expr::In {
            expr: Box::new(expr.into()),
            list,
            negated: true,
        }
    }

    /// `expr NOT IN(SELECT ...)`
    pub fn not_in_subquery(expr: impl Into<Expr>, subquery: ClauseMap) -> Self {
        Self::not_in(expr, vec![Expr::Subquery(subquery)])
    }

    /// Check if this expression is a leaf value.
    pub fn is_value(&self) -> bool {
        matches!(self, Expr::Value(_))
    }

    /// Operator tag of this node in the dynamic form, `None` for values and
    /// subqueries.
    pub fn tag(&self) -> Option<&'static str> {
        let tag = match self {
            Expr::Value(_) | Expr::Subquery(_) => return None,
            Expr::Binary { op, .. } => op.tag(),
            Expr::And(_) => "and",
            Expr::Or(_) => "or",
            Expr::CaseWhen(_) => "case_when",
            Expr::In { negated: false, .. } => "in",
            Expr::In { negated: true, .. } => "not_in",
            Expr::IsNull(_) => "null",
            Expr::IsNotNull(_) => "not_null",
            Expr::Not(_) => "not",
            Expr::Exists(_) => "exists",
            Expr::Call { .. } => "%",
        };
        Some(tag)
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Value(value)
    }
}

impl From<Param> for Expr {
    fn from(param: Param) -> Self {
        Expr::Value(Value::Param(param))
    }
}

impl From<&str> for Expr {
    fn from(name: &str) -> Self {
        Expr::ident(name)
    }
}

impl From<String> for Expr {
    fn from(name: String) -> Self {
        Expr::ident(name)
    }
}

impl From<ClauseMap> for Expr {
    fn from(map: ClauseMap) -> Self {
        Expr::Subquery(map)
    }
}
