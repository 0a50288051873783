//! Clauses and clause maps.

use crate::qb::expr::Expr;
use crate::qb::table::{Join, TableExpr};
use crate::value::Value;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

/// Closed set of clause kinds.
///
/// Declaration order is the render order: `Ord` on this type is the clause
/// priority table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClauseKind {
    Select,
    SelectDistinct,
    InsertInto,
    Update,
    Columns,
    Values,
    OnConflict,
    DoUpdate,
    DoNothing,
    Set,
    From,
    Join,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Offset,
    ForUpdate,
    Returning,
}

impl ClauseKind {
    /// All kinds in priority order.
    pub const ALL: [ClauseKind; 20] = [
        ClauseKind::Select,
        ClauseKind::SelectDistinct,
        ClauseKind::InsertInto,
        ClauseKind::Update,
        ClauseKind::Columns,
        ClauseKind::Values,
        ClauseKind::OnConflict,
        ClauseKind::DoUpdate,
        ClauseKind::DoNothing,
        ClauseKind::Set,
        ClauseKind::From,
        ClauseKind::Join,
        ClauseKind::Where,
        ClauseKind::GroupBy,
        ClauseKind::Having,
        ClauseKind::OrderBy,
        ClauseKind::Limit,
        ClauseKind::Offset,
        ClauseKind::ForUpdate,
        ClauseKind::Returning,
    ];

    /// Kinds `append` knows how to accumulate.
    pub const APPENDABLE: [ClauseKind; 9] = [
        ClauseKind::Columns,
        ClauseKind::Values,
        ClauseKind::Where,
        ClauseKind::Having,
        ClauseKind::Set,
        ClauseKind::OrderBy,
        ClauseKind::Select,
        ClauseKind::Join,
        ClauseKind::GroupBy,
    ];

    /// Key used in the dynamic form.
    pub fn name(self) -> &'static str {
        match self {
            ClauseKind::Select => "select",
            ClauseKind::SelectDistinct => "select_distinct",
            ClauseKind::InsertInto => "insert_into",
            ClauseKind::Update => "update",
            ClauseKind::Columns => "columns",
            ClauseKind::Values => "values",
            ClauseKind::OnConflict => "on_conflict",
            ClauseKind::DoUpdate => "do_update",
            ClauseKind::DoNothing => "do_nothing",
            ClauseKind::Set => "set",
            ClauseKind::From => "from",
            ClauseKind::Join => "join",
            ClauseKind::Where => "where",
            ClauseKind::GroupBy => "group_by",
            ClauseKind::Having => "having",
            ClauseKind::OrderBy => "order_by",
            ClauseKind::Limit => "limit",
            ClauseKind::Offset => "offset",
            ClauseKind::ForUpdate => "for_update",
            ClauseKind::Returning => "returning",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Names of all kinds, in priority order.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.name()).collect()
    }

    /// Names of the appendable kinds.
    pub fn appendable_names() -> Vec<&'static str> {
        Self::APPENDABLE.iter().map(|k| k.name()).collect()
    }

    pub fn is_appendable(self) -> bool {
        Self::APPENDABLE.contains(&self)
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ASC" => Some(Direction::Asc),
            "DESC" => Some(Direction::Desc),
            _ => None,
        }
    }
}

/// NULLS placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nulls {
    First,
    Last,
}

impl Nulls {
    /// Default placement for a direction: ASC → NULLS LAST, DESC → NULLS FIRST.
    pub fn default_for(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Nulls::Last,
            Direction::Desc => Nulls::First,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Nulls::First => "NULLS FIRST",
            Nulls::Last => "NULLS LAST",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NULLS FIRST" => Some(Nulls::First),
            "NULLS LAST" => Some(Nulls::Last),
            _ => None,
        }
    }
}

/// One ORDER BY item: `expr DIR NULLS ...`
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub expr: Expr,
    pub direction: Direction,
    pub nulls: Nulls,
}

impl OrderItem {
    /// Order item with the default NULLS placement for `direction`.
    pub fn new(expr: impl Into<Expr>, direction: Direction) -> Self {
        Self {
            expr: expr.into(),
            direction,
            nulls: Nulls::default_for(direction),
        }
    }

    pub fn asc(expr: impl Into<Expr>) -> Self {
        Self::new(expr, Direction::Asc)
    }

    pub fn desc(expr: impl Into<Expr>) -> Self {
        Self::new(expr, Direction::Desc)
    }

    /// Override the NULLS placement.
    pub fn nulls(mut self, nulls: Nulls) -> Self {
        self.nulls = nulls;
        self
    }
}

/// A clause and its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Select(Vec<Expr>),
    SelectDistinct { on: Vec<Expr>, exprs: Vec<Expr> },
    InsertInto(TableExpr),
    Update(TableExpr),
    Columns(Vec<String>),
    /// Rows of values; no rows renders `DEFAULT VALUES`.
    Values(Vec<Vec<Value>>),
    OnConflict(Vec<String>),
    DoUpdate(Vec<Expr>),
    DoNothing,
    Set(Vec<Expr>),
    From(TableExpr),
    Join(Vec<Join>),
    Where(Expr),
    GroupBy(Vec<Expr>),
    Having(Expr),
    OrderBy(Vec<OrderItem>),
    Limit(u64),
    Offset(u64),
    ForUpdate,
    Returning(Vec<Expr>),
}

impl Clause {
    pub fn kind(&self) -> ClauseKind {
        match self {
            Clause::Select(_) => ClauseKind::Select,
            Clause::SelectDistinct { .. } => ClauseKind::SelectDistinct,
            Clause::InsertInto(_) => ClauseKind::InsertInto,
            Clause::Update(_) => ClauseKind::Update,
            Clause::Columns(_) => ClauseKind::Columns,
            Clause::Values(_) => ClauseKind::Values,
            Clause::OnConflict(_) => ClauseKind::OnConflict,
            Clause::DoUpdate(_) => ClauseKind::DoUpdate,
            Clause::DoNothing => ClauseKind::DoNothing,
            Clause::Set(_) => ClauseKind::Set,
            Clause::From(_) => ClauseKind::From,
            Clause::Join(_) => ClauseKind::Join,
            Clause::Where(_) => ClauseKind::Where,
            Clause::GroupBy(_) => ClauseKind::GroupBy,
            Clause::Having(_) => ClauseKind::Having,
            Clause::OrderBy(_) => ClauseKind::OrderBy,
            Clause::Limit(_) => ClauseKind::Limit,
            Clause::Offset(_) => ClauseKind::Offset,
            Clause::ForUpdate => ClauseKind::ForUpdate,
            Clause::Returning(_) => ClauseKind::Returning,
        }
    }
}

/// A statement described as a set of clauses, at most one per kind.
///
/// Iteration order is always clause priority order, independent of the order
/// clauses were inserted in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseMap {
    clauses: BTreeMap<ClauseKind, Clause>,
}

impl ClauseMap {
    /// Create an empty clause map.
    pub fn new() -> Self {
        Self {
            clauses: BTreeMap::new(),
        }
    }

    /// Insert a clause, replacing any clause of the same kind.
    pub fn insert(&mut self, clause: Clause) -> Option<Clause> {
        self.clauses.insert(clause.kind(), clause)
    }

    /// Chainable [`ClauseMap::insert`].
    pub fn with(mut self, clause: Clause) -> Self {
        self.insert(clause);
        self
    }

    pub fn get(&self, kind: ClauseKind) -> Option<&Clause> {
        self.clauses.get(&kind)
    }

    pub fn remove(&mut self, kind: ClauseKind) -> Option<Clause> {
        self.clauses.remove(&kind)
    }

    pub fn contains(&self, kind: ClauseKind) -> bool {
        self.clauses.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Present kinds, in priority order.
    pub fn kinds(&self) -> impl Iterator<Item = ClauseKind> + '_ {
        self.clauses.keys().copied()
    }

    /// Clauses in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.values()
    }
}

impl FromIterator<Clause> for ClauseMap {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        let mut map = ClauseMap::new();
        map.extend(iter);
        map
    }
}

impl Extend<Clause> for ClauseMap {
    fn extend<I: IntoIterator<Item = Clause>>(&mut self, iter: I) {
        for clause in iter {
            self.insert(clause);
        }
    }
}

impl IntoIterator for ClauseMap {
    type Item = Clause;
    type IntoIter = btree_map::IntoValues<ClauseKind, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_values()
    }
}

impl From<Clause> for ClauseMap {
    fn from(clause: Clause) -> Self {
        ClauseMap::new().with(clause)
    }
}
