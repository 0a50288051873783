//! Leaf values: identifiers, inline parameters and raw SQL.

use crate::param::Param;

/// A leaf value inside an expression.
///
/// A bare string is always an identifier. Literals must be wrapped explicitly,
/// either as an inline parameter (bound, rendered as `$n`) or as raw SQL
/// (rendered verbatim).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Identifier or column reference, quoted on output.
    Ident(String),
    /// Inline parameter: rendered as a placeholder, value bound.
    Param(Param),
    /// Raw SQL inserted verbatim. Never escaped.
    Raw(String),
}

impl Value {
    /// Create an identifier value.
    pub fn ident(name: impl Into<String>) -> Self {
        Value::Ident(name.into())
    }

    /// Create an inline parameter.
    pub fn param(value: impl Into<Param>) -> Self {
        Value::Param(value.into())
    }

    /// Create a raw SQL fragment, e.g. `Value::raw("NOW()")`.
    ///
    /// The text is not escaped; never feed it untrusted input.
    pub fn raw(sql: impl Into<String>) -> Self {
        Value::Raw(sql.into())
    }
}

impl From<&str> for Value {
    fn from(name: &str) -> Self {
        Value::Ident(name.to_string())
    }
}

impl From<String> for Value {
    fn from(name: String) -> Self {
        Value::Ident(name)
    }
}

impl From<Param> for Value {
    fn from(param: Param) -> Self {
        Value::Param(param)
    }
}
