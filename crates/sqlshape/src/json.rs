//! Dynamic JSON form of clause maps.
//!
//! Shapes:
//!
//! | thing | JSON |
//! |---|---|
//! | clause map | `{"select": [...], "from": "t", ...}` |
//! | identifier | `"t.id"` |
//! | inline parameter | `{"ip": 5}` |
//! | raw SQL | `{"r": "NOW()"}` (non-strings render as their JSON text) |
//! | expression | `["=", "t.id", {"ip": 5}]`, `["%", "count", "t.id"]` |
//! | subquery | a nested clause map object |
//! | table | `"t"`, `["t", "alias"]`, `[{...}, "alias"]`, `{...}` |
//! | join | `["INNER", ["t2", "b"], ["=", "b.id", "a.id"]]` |
//! | order item | `["t.id", "DESC", "NULLS FIRST"]` |
//!
//! `select_distinct` is `{"on": [...], "exprs": [...]}`; `do_nothing` and
//! `for_update` only need to be present (conventionally `null` / `true`).

use crate::config::RenderConfig;
use crate::error::{QbError, QbResult};
use crate::param::Param;
use crate::qb::clause::{Clause, ClauseKind, ClauseMap, Direction, Nulls, OrderItem};
use crate::qb::expr::{BinaryOp, EXPR_TAGS, Expr};
use crate::qb::table::{Join, JoinKind, TableExpr, TableSource};
use crate::value::Value;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue, json};

impl ClauseMap {
    /// Parse the dynamic form with the default depth limit.
    pub fn from_json(value: &JsonValue) -> QbResult<ClauseMap> {
        Self::from_json_with(value, &RenderConfig::default())
    }

    /// Parse the dynamic form.
    ///
    /// Unknown clause keys fail with `UnsupportedClause`, unknown operator
    /// tags with `UnsupportedExpression`, unwrapped literals with
    /// `InvalidValue` and wrong shapes with `Malformed`.
    pub fn from_json_with(value: &JsonValue, config: &RenderConfig) -> QbResult<ClauseMap> {
        Parser::new(config).map(value)
    }

    /// Convert into the dynamic form.
    pub fn to_json(&self) -> JsonValue {
        let mut obj = Map::new();
        for clause in self.iter() {
            obj.insert(clause.kind().name().to_string(), clause_json(clause));
        }
        JsonValue::Object(obj)
    }
}

impl Serialize for ClauseMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ClauseMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        ClauseMap::from_json(&value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Param {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Param {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(|v| Param::from_json(&v))
    }
}

// ==================== Parsing ====================

struct Parser {
    depth: usize,
    max_depth: Option<usize>,
}

impl Parser {
    fn new(config: &RenderConfig) -> Self {
        Self {
            depth: 0,
            max_depth: config.max_depth,
        }
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> QbResult<T>) -> QbResult<T> {
        self.depth += 1;
        if let Some(max_depth) = self.max_depth
            && self.depth > max_depth
        {
            self.depth -= 1;
            return Err(QbError::DepthExceeded { max_depth });
        }
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn map(&mut self, value: &JsonValue) -> QbResult<ClauseMap> {
        let JsonValue::Object(obj) = value else {
            return Err(QbError::malformed(format!(
                "expected a clause map object, got {value}"
            )));
        };
        let mut map = ClauseMap::new();
        for (key, payload) in obj {
            let kind = ClauseKind::from_name(key).ok_or_else(|| QbError::UnsupportedClause {
                clause: key.clone(),
                supported: ClauseKind::names(),
            })?;
            map.insert(self.clause(kind, payload)?);
        }
        Ok(map)
    }

    fn clause(&mut self, kind: ClauseKind, v: &JsonValue) -> QbResult<Clause> {
        let clause = match kind {
            ClauseKind::Select => Clause::Select(self.exprs(v)?),
            ClauseKind::SelectDistinct => {
                let obj = v.as_object().ok_or_else(|| {
                    QbError::malformed(format!(
                        "select_distinct: expected {{\"on\": [...], \"exprs\": [...]}}, got {v}"
                    ))
                })?;
                let on = match obj.get("on") {
                    Some(on) => self.exprs(on)?,
                    None => Vec::new(),
                };
                let exprs = match obj.get("exprs") {
                    Some(exprs) => self.exprs(exprs)?,
                    None => Vec::new(),
                };
                Clause::SelectDistinct { on, exprs }
            }
            ClauseKind::InsertInto => Clause::InsertInto(self.table(v)?),
            ClauseKind::Update => Clause::Update(self.table(v)?),
            ClauseKind::Columns => Clause::Columns(names(kind, v)?),
            ClauseKind::Values => {
                let rows = array(kind.name(), v)?;
                let mut out = Vec::with_capacity(rows.len());
                for row in rows {
                    let row = array("values row", row)?;
                    out.push(row.iter().map(value_only).collect::<QbResult<Vec<_>>>()?);
                }
                Clause::Values(out)
            }
            ClauseKind::OnConflict => Clause::OnConflict(names(kind, v)?),
            ClauseKind::DoUpdate => Clause::DoUpdate(self.exprs(v)?),
            ClauseKind::DoNothing => Clause::DoNothing,
            ClauseKind::Set => Clause::Set(self.exprs(v)?),
            ClauseKind::From => Clause::From(self.table(v)?),
            ClauseKind::Join => {
                let items = array(kind.name(), v)?;
                let mut joins = Vec::with_capacity(items.len());
                for item in items {
                    joins.push(self.join(item)?);
                }
                Clause::Join(joins)
            }
            ClauseKind::Where => Clause::Where(self.expr(v)?),
            ClauseKind::GroupBy => Clause::GroupBy(self.exprs(v)?),
            ClauseKind::Having => Clause::Having(self.expr(v)?),
            ClauseKind::OrderBy => {
                let items = array(kind.name(), v)?;
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.order_item(item)?);
                }
                Clause::OrderBy(out)
            }
            ClauseKind::Limit => Clause::Limit(count(kind, v)?),
            ClauseKind::Offset => Clause::Offset(count(kind, v)?),
            ClauseKind::ForUpdate => Clause::ForUpdate,
            ClauseKind::Returning => Clause::Returning(self.exprs(v)?),
        };
        Ok(clause)
    }

    fn exprs(&mut self, v: &JsonValue) -> QbResult<Vec<Expr>> {
        let items = array("expression list", v)?;
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(self.expr(item)?);
        }
        Ok(out)
    }

    fn expr(&mut self, v: &JsonValue) -> QbResult<Expr> {
        match v {
            JsonValue::String(name) => Ok(Expr::ident(name.as_str())),
            JsonValue::Object(obj) => match wrapped_value(obj) {
                Some(value) => Ok(Expr::Value(value)),
                None => Ok(Expr::Subquery(self.nested(|p| p.map(v))?)),
            },
            JsonValue::Array(items) => self.tagged(items),
            other => Err(QbError::invalid_value(other.to_string())),
        }
    }

    fn tagged(&mut self, items: &[JsonValue]) -> QbResult<Expr> {
        let Some((head, args)) = items.split_first() else {
            return Err(QbError::malformed("empty expression array"));
        };
        let JsonValue::String(tag) = head else {
            return Err(QbError::malformed(format!(
                "expression must start with an operator tag, got {head}"
            )));
        };

        if let Some(op) = BinaryOp::from_tag(tag) {
            let [left, right] = args else {
                return Err(arity(tag, "2 operands", args.len()));
            };
            return Ok(Expr::binary(op, self.expr(left)?, self.expr(right)?));
        }

        let expr = match tag.as_str() {
            "and" | "or" | "case_when" => {
                if args.is_empty() {
                    return Err(arity(tag, "at least 1 operand", 0));
                }
                let operands = self.expr_slice(args)?;
                match tag.as_str() {
                    "and" => Expr::And(operands),
                    "or" => Expr::Or(operands),
                    _ => Expr::CaseWhen(operands),
                }
            }
            "in" | "not_in" => {
                let Some((tested, list)) = args.split_first() else {
                    return Err(arity(tag, "at least 1 operand", 0));
                };
                Expr::In {
                    expr: Box::new(self.expr(tested)?),
                    list: self.expr_slice(list)?,
                    negated: tag.as_str() == "not_in",
                }
            }
            "null" | "not_null" | "not" | "exists" => {
                let [operand] = args else {
                    return Err(arity(tag, "1 operand", args.len()));
                };
                let inner = Box::new(self.expr(operand)?);
                match tag.as_str() {
                    "null" => Expr::IsNull(inner),
                    "not_null" => Expr::IsNotNull(inner),
                    "not" => Expr::Not(inner),
                    _ => Expr::Exists(inner),
                }
            }
            "%" => {
                let Some((JsonValue::String(name), rest)) = args.split_first() else {
                    return Err(QbError::malformed(
                        "function call must be [\"%\", name, args...]",
                    ));
                };
                Expr::Call {
                    name: name.clone(),
                    args: self.expr_slice(rest)?,
                }
            }
            _ => {
                return Err(QbError::UnsupportedExpression {
                    tag: tag.clone(),
                    supported: EXPR_TAGS.to_vec(),
                });
            }
        };
        Ok(expr)
    }

    fn expr_slice(&mut self, items: &[JsonValue]) -> QbResult<Vec<Expr>> {
        items.iter().map(|item| self.expr(item)).collect()
    }

    fn table(&mut self, v: &JsonValue) -> QbResult<TableExpr> {
        match v {
            JsonValue::String(name) => Ok(TableExpr::Name(name.clone())),
            JsonValue::Object(_) => Ok(TableExpr::Subquery(self.nested(|p| p.map(v))?)),
            JsonValue::Array(items) => {
                let [source, JsonValue::String(alias)] = items.as_slice() else {
                    return Err(QbError::malformed(format!(
                        "aliased table must be [table, alias], got {v}"
                    )));
                };
                let source = match source {
                    JsonValue::String(name) => TableSource::Name(name.clone()),
                    JsonValue::Object(_) => TableSource::Subquery(self.nested(|p| p.map(source))?),
                    other => {
                        return Err(QbError::malformed(format!(
                            "table must be a name or a clause map, got {other}"
                        )));
                    }
                };
                Ok(TableExpr::aliased(source, alias.as_str()))
            }
            other => Err(QbError::malformed(format!(
                "table must be a name, [table, alias] or a clause map, got {other}"
            ))),
        }
    }

    fn join(&mut self, v: &JsonValue) -> QbResult<Join> {
        let items = array("join", v)?;
        let [JsonValue::String(kind), table, on] = items.as_slice() else {
            return Err(QbError::malformed(format!(
                "join must be [kind, table, condition], got {v}"
            )));
        };
        let kind = JoinKind::parse(kind)
            .ok_or_else(|| QbError::malformed(format!("unknown join kind {kind}")))?;
        Ok(Join {
            kind,
            table: self.table(table)?,
            on: self.expr(on)?,
        })
    }

    fn order_item(&mut self, v: &JsonValue) -> QbResult<OrderItem> {
        let items = array("order item", v)?;
        let (expr, rest) = items
            .split_first()
            .ok_or_else(|| QbError::malformed("empty order item"))?;
        let direction = match rest.first() {
            None => Direction::Asc,
            Some(JsonValue::String(d)) => Direction::parse(d)
                .ok_or_else(|| QbError::malformed(format!("unknown sort direction {d}")))?,
            Some(other) => {
                return Err(QbError::malformed(format!(
                    "sort direction must be a string, got {other}"
                )));
            }
        };
        let nulls = match rest.get(1) {
            None => Nulls::default_for(direction),
            Some(JsonValue::String(n)) => Nulls::parse(n)
                .ok_or_else(|| QbError::malformed(format!("unknown nulls placement {n}")))?,
            Some(other) => {
                return Err(QbError::malformed(format!(
                    "nulls placement must be a string, got {other}"
                )));
            }
        };
        if rest.len() > 2 {
            return Err(arity("order item", "at most 3 elements", items.len()));
        }
        Ok(OrderItem {
            expr: self.expr(expr)?,
            direction,
            nulls,
        })
    }
}

/// `{"ip": ..}` or `{"r": ..}`; other keys are ignored and `ip` wins over `r`.
fn wrapped_value(obj: &Map<String, JsonValue>) -> Option<Value> {
    if let Some(v) = obj.get("ip") {
        return Some(Value::Param(Param::from_json(v)));
    }
    obj.get("r").map(|v| match v {
        JsonValue::String(s) => Value::Raw(s.clone()),
        other => Value::Raw(other.to_string()),
    })
}

/// A value in a position that only takes values (a `values` row).
fn value_only(v: &JsonValue) -> QbResult<Value> {
    match v {
        JsonValue::String(name) => Ok(Value::Ident(name.clone())),
        JsonValue::Object(obj) => {
            wrapped_value(obj).ok_or_else(|| QbError::invalid_value(v.to_string()))
        }
        other => Err(QbError::invalid_value(other.to_string())),
    }
}

fn array<'a>(what: &str, v: &'a JsonValue) -> QbResult<&'a Vec<JsonValue>> {
    v.as_array()
        .ok_or_else(|| QbError::malformed(format!("{what}: expected an array, got {v}")))
}

fn names(kind: ClauseKind, v: &JsonValue) -> QbResult<Vec<String>> {
    array(kind.name(), v)?
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                QbError::malformed(format!("{kind}: expected column names, got {item}"))
            })
        })
        .collect()
}

fn count(kind: ClauseKind, v: &JsonValue) -> QbResult<u64> {
    v.as_u64().ok_or_else(|| {
        QbError::malformed(format!("{kind}: expected a non-negative integer, got {v}"))
    })
}

fn arity(what: &str, expected: &str, got: usize) -> QbError {
    QbError::malformed(format!("{what}: expected {expected}, got {got}"))
}

// ==================== Serializing ====================

fn clause_json(clause: &Clause) -> JsonValue {
    match clause {
        Clause::Select(exprs)
        | Clause::DoUpdate(exprs)
        | Clause::Set(exprs)
        | Clause::GroupBy(exprs)
        | Clause::Returning(exprs) => exprs_json(exprs),
        Clause::SelectDistinct { on, exprs } => json!({
            "on": exprs_json(on),
            "exprs": exprs_json(exprs),
        }),
        Clause::InsertInto(table) | Clause::Update(table) | Clause::From(table) => {
            table_json(table)
        }
        Clause::Columns(cols) | Clause::OnConflict(cols) => {
            JsonValue::Array(cols.iter().cloned().map(JsonValue::String).collect())
        }
        Clause::Values(rows) => JsonValue::Array(
            rows.iter()
                .map(|row| JsonValue::Array(row.iter().map(value_json).collect()))
                .collect(),
        ),
        Clause::DoNothing => JsonValue::Null,
        Clause::Join(joins) => JsonValue::Array(
            joins
                .iter()
                .map(|j| json!([j.kind.as_sql(), table_json(&j.table), expr_json(&j.on)]))
                .collect(),
        ),
        Clause::Where(expr) | Clause::Having(expr) => expr_json(expr),
        Clause::OrderBy(items) => JsonValue::Array(
            items
                .iter()
                .map(|i| json!([expr_json(&i.expr), i.direction.as_sql(), i.nulls.as_sql()]))
                .collect(),
        ),
        Clause::Limit(n) | Clause::Offset(n) => JsonValue::from(*n),
        Clause::ForUpdate => JsonValue::Bool(true),
    }
}

fn value_json(value: &Value) -> JsonValue {
    match value {
        Value::Ident(name) => JsonValue::String(name.clone()),
        Value::Param(param) => json!({ "ip": param.to_json() }),
        Value::Raw(sql) => json!({ "r": sql }),
    }
}

fn exprs_json(exprs: &[Expr]) -> JsonValue {
    JsonValue::Array(exprs.iter().map(expr_json).collect())
}

fn expr_json(expr: &Expr) -> JsonValue {
    let tagged = |tag: &str, operands: Vec<JsonValue>| {
        let mut items = Vec::with_capacity(operands.len() + 1);
        items.push(JsonValue::String(tag.to_string()));
        items.extend(operands);
        JsonValue::Array(items)
    };

    match expr {
        Expr::Value(value) => value_json(value),
        Expr::Subquery(map) => map.to_json(),
        Expr::Binary { op, left, right } => {
            tagged(op.tag(), vec![expr_json(left), expr_json(right)])
        }
        Expr::And(exprs) => tagged("and", exprs.iter().map(expr_json).collect()),
        Expr::Or(exprs) => tagged("or", exprs.iter().map(expr_json).collect()),
        Expr::CaseWhen(exprs) => tagged("case_when", exprs.iter().map(expr_json).collect()),
        Expr::In {
            expr,
            list,
            negated,
        } => {
            let mut operands = vec![expr_json(expr)];
            operands.extend(list.iter().map(expr_json));
            tagged(if *negated { "not_in" } else { "in" }, operands)
        }
        Expr::IsNull(inner) => tagged("null", vec![expr_json(inner)]),
        Expr::IsNotNull(inner) => tagged("not_null", vec![expr_json(inner)]),
        Expr::Not(inner) => tagged("not", vec![expr_json(inner)]),
        Expr::Exists(inner) => tagged("exists", vec![expr_json(inner)]),
        Expr::Call { name, args } => {
            let mut operands = vec![JsonValue::String(name.clone())];
            operands.extend(args.iter().map(expr_json));
            tagged("%", operands)
        }
    }
}

fn table_json(table: &TableExpr) -> JsonValue {
    match table {
        TableExpr::Name(name) => JsonValue::String(name.clone()),
        TableExpr::Subquery(map) => map.to_json(),
        TableExpr::Aliased { source, alias } => {
            let source = match source {
                TableSource::Name(name) => JsonValue::String(name.clone()),
                TableSource::Subquery(map) => map.to_json(),
            };
            json!([source, alias])
        }
    }
}

#[cfg(test)]
mod tests;
