use crate::config::RenderConfig;
use crate::error::{QbError, QbResult};
use crate::ident;
use crate::param::Param;

/// Single output buffer threaded through every recursive render call.
///
/// Text and bound values grow together: each [`SqlWriter::push_bind`] writes
/// `$n` for the value it appends, so placeholder numbers always equal the
/// value's 1-based position in the list.
#[derive(Debug)]
pub(crate) struct SqlWriter {
    sql: String,
    params: Vec<Param>,
    depth: usize,
    max_depth: Option<usize>,
}

impl SqlWriter {
    pub(crate) fn new(config: &RenderConfig) -> Self {
        Self {
            sql: String::with_capacity(128),
            params: Vec::new(),
            depth: 0,
            max_depth: config.max_depth,
        }
    }

    /// Append raw SQL.
    pub(crate) fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append a placeholder and bind its value.
    pub(crate) fn push_bind(&mut self, value: Param) -> &mut Self {
        self.params.push(value);
        self.sql.push('$');
        self.sql.push_str(&self.params.len().to_string());
        self
    }

    /// Append a quoted identifier.
    pub(crate) fn push_ident(&mut self, name: &str) -> &mut Self {
        ident::write_escaped(name, &mut self.sql);
        self
    }

    /// Append `("a", "b")`.
    pub(crate) fn push_column_list(&mut self, columns: &[String]) -> &mut Self {
        self.sql.push('(');
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            ident::write_escaped(col, &mut self.sql);
        }
        self.sql.push(')');
        self
    }

    /// Write `items` separated by `sep`.
    pub(crate) fn push_list<T>(
        &mut self,
        items: &[T],
        sep: &str,
        mut write: impl FnMut(&mut Self, &T) -> QbResult<()>,
    ) -> QbResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(sep);
            }
            write(self, item)?;
        }
        Ok(())
    }

    /// Run `f` one subquery level deeper.
    pub(crate) fn nested(&mut self, f: impl FnOnce(&mut Self) -> QbResult<()>) -> QbResult<()> {
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

    /// Current length of the text, for [`SqlWriter::truncate`].
    pub(crate) fn len(&self) -> usize {
        self.sql.len()
    }

    /// Drop text written after `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.sql.truncate(len);
    }

    pub(crate) fn finish(self) -> (String, Vec<Param>) {
        (self.sql, self.params)
    }
}
