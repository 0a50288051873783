//! SQL identifier quoting.
//!
//! Every bare string that reaches the renderer is an identifier (schema, table,
//! column or alias). Identifiers are quoted segment by segment:
//!
//! - `users` → `"users"`
//! - `t.id` → `"t"."id"`
//! - `"t"."id"` → unchanged (already quoted input is passed through)
//!
//! Segment content is not validated and embedded `"` characters are not
//! escaped; callers own the names they pass in.

/// Quote an identifier, splitting on `.`.
///
/// Idempotent: input that already starts with `"` is returned as-is.
///
/// # Example
/// ```
/// assert_eq!(sqlshape::ident::escape("t.id"), r#""t"."id""#);
/// assert_eq!(sqlshape::ident::escape(r#""t"."id""#), r#""t"."id""#);
/// ```
pub fn escape(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 2);
    write_escaped(identifier, &mut out);
    out
}

/// Append the quoted form of `identifier` to `out`.
pub(crate) fn write_escaped(identifier: &str, out: &mut String) {
    if identifier.starts_with('"') {
        out.push_str(identifier);
        return;
    }
    for (i, part) in identifier.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push('"');
        out.push_str(part);
        out.push('"');
    }
}

/// Render a parenthesized, comma-separated list of quoted column names.
///
/// # Example
/// ```
/// assert_eq!(sqlshape::ident::column_list(&["a", "b"]), r#"("a", "b")"#);
/// ```
pub fn column_list<S: AsRef<str>>(columns: &[S]) -> String {
    let mut out = String::from("(");
    for (i, col) in columns.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_escaped(col.as_ref(), &mut out);
    }
    out.push(')');
    out
}
