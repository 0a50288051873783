//! Error types for sqlshape

use thiserror::Error;

/// Result type alias for sqlshape operations
pub type QbResult<T> = Result<T, QbError>;

/// Errors raised while building, combining or rendering clause maps.
///
/// Every variant is a hard failure: rendering never returns a partial
/// statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QbError {
    /// A clause key has no renderer.
    #[error("Unknown clause {clause}. Supported clauses: {}.", .supported.join(", "))]
    UnsupportedClause {
        clause: String,
        supported: Vec<&'static str>,
    },

    /// An expression operator tag has no handler.
    #[error("Unknown expr {tag}. Supported exprs: {}", .supported.join(", "))]
    UnsupportedExpression {
        tag: String,
        supported: Vec<&'static str>,
    },

    /// An object value is neither an inline parameter nor a raw value.
    #[error("Invalid expr value: {0}")]
    InvalidValue(String),

    /// `append` received clauses it cannot accumulate.
    #[error(
        "Trying to append following unsupported clauses: {}. Only following clauses are supported: {}",
        .clauses.join(", "),
        .supported.join(", ")
    )]
    UnsupportedAppendClause {
        clauses: Vec<String>,
        supported: Vec<&'static str>,
    },

    /// `append` of two `values` clauses with a different number of rows.
    #[error("Cannot append values: left side has {left} rows, right side has {right}")]
    ValuesShapeMismatch { left: usize, right: usize },

    /// Dynamic input has the wrong shape (arity, JSON type).
    #[error("Malformed clause map: {0}")]
    Malformed(String),

    /// Nesting went deeper than the configured limit.
    #[error("Nesting depth exceeds the limit of {max_depth}")]
    DepthExceeded { max_depth: usize },

    /// Nothing to render.
    #[error("Cannot render an empty clause map")]
    EmptyClauseMap,
}

impl QbError {
    /// Create a malformed-input error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Create an invalid-value error
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    /// Check if this error came from an unknown clause or operator
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedClause { .. }
                | Self::UnsupportedExpression { .. }
                | Self::UnsupportedAppendClause { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_expression_lists_tags() {
        let err = QbError::UnsupportedExpression {
            tag: "xor".to_string(),
            supported: vec!["=", "and"],
        };
        assert_eq!(err.to_string(), "Unknown expr xor. Supported exprs: =, and");
        assert!(err.is_unsupported());
    }

    #[test]
    fn unsupported_append_lists_offenders() {
        let err = QbError::UnsupportedAppendClause {
            clauses: vec!["for_update".to_string(), "limit".to_string()],
            supported: vec!["columns", "values"],
        };
        let msg = err.to_string();
        assert!(msg.contains("for_update, limit"));
        assert!(msg.contains("columns, values"));
    }
}
