//! Bound parameter values.
//!
//! A [`Param`] is the value behind one `$n` placeholder. It is a closed set of
//! scalar kinds plus JSON, so rendered statements stay comparable, printable
//! and serializable, and it implements [`ToSql`] so a [`Statement`] can be
//! handed straight to `tokio-postgres`.
//!
//! [`Statement`]: crate::Statement

use bytes::BytesMut;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type};
use uuid::Uuid;

/// A value bound to a statement placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// SQL NULL (of whatever type the server infers).
    Null,
    Bool(bool),
    /// Integers; narrowed to INT2/INT4 when the server asks for those.
    Int(i64),
    /// Floating point; narrowed to FLOAT4 when the server asks for it.
    Float(f64),
    Text(String),
    /// JSON / JSONB payloads.
    Json(JsonValue),
    Uuid(Uuid),
    /// TIMESTAMPTZ
    Timestamp(DateTime<Utc>),
}

impl Param {
    /// Create a parameter from anything convertible into one.
    pub fn new(value: impl Into<Param>) -> Self {
        value.into()
    }

    /// Convert a JSON value into a parameter.
    ///
    /// Scalars map onto the matching variant; arrays and objects stay JSON.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Param::Null,
            JsonValue::Bool(b) => Param::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Param::Int(i),
                None => n.as_f64().map(Param::Float).unwrap_or(Param::Null),
            },
            JsonValue::String(s) => Param::Text(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => Param::Json(value.clone()),
        }
    }

    /// Convert the parameter into its JSON representation.
    ///
    /// UUIDs and timestamps become strings; non-finite floats become `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Param::Null => JsonValue::Null,
            Param::Bool(b) => JsonValue::Bool(*b),
            Param::Int(i) => JsonValue::from(*i),
            Param::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Param::Text(s) => JsonValue::String(s.clone()),
            Param::Json(v) => v.clone(),
            Param::Uuid(u) => JsonValue::String(u.to_string()),
            Param::Timestamp(ts) => JsonValue::String(ts.to_rfc3339()),
        }
    }

    /// Check if this is a NULL parameter.
    pub fn is_null(&self) -> bool {
        matches!(self, Param::Null)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl ToSql for Param {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Param::Null => Ok(IsNull::Yes),
            Param::Bool(v) => v.to_sql_checked(ty, out),
            Param::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Param::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Param::Text(v) => v.to_sql_checked(ty, out),
            Param::Json(v) => v.to_sql_checked(ty, out),
            Param::Uuid(v) => v.to_sql_checked(ty, out),
            Param::Timestamp(v) => v.to_sql_checked(ty, out),
        }
    }

    // The concrete check happens per variant in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Param::Bool(v)
    }
}

impl From<i16> for Param {
    fn from(v: i16) -> Self {
        Param::Int(v.into())
    }
}

impl From<i32> for Param {
    fn from(v: i32) -> Self {
        Param::Int(v.into())
    }
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::Int(v)
    }
}

impl From<u32> for Param {
    fn from(v: u32) -> Self {
        Param::Int(v.into())
    }
}

impl From<f32> for Param {
    fn from(v: f32) -> Self {
        Param::Float(v.into())
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Float(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Text(v.to_string())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Text(v)
    }
}

impl From<JsonValue> for Param {
    fn from(v: JsonValue) -> Self {
        Param::from_json(&v)
    }
}

impl From<Uuid> for Param {
    fn from(v: Uuid) -> Self {
        Param::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Param {
    fn from(v: DateTime<Utc>) -> Self {
        Param::Timestamp(v)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Param::Null)
    }
}
