//! Statement classification.
//!
//! A statement is a read when its first token, after comments are removed,
//! is `SELECT`. Everything else (DML, DDL, EXEC, batches starting with a CTE)
//! is a write. The classification only picks the result shape; it is not a
//! permission check.

use crate::models::StatementKind;

const BLOCK_COMMENT_START: &str = "/*";
const BLOCK_COMMENT_END: &str = "*/";
const LINE_COMMENT: &str = "--";

/// Catalog view whose listings are reshaped into a `Tables_in_<db>` column.
const TABLE_CATALOG: &str = "INFORMATION_SCHEMA.TABLES";

/// Classify a statement by its first significant token.
///
/// # Examples
///
/// ```
/// use mssql_mcp_server::models::StatementKind;
/// use mssql_mcp_server::tools::classifier::classify;
///
/// assert_eq!(classify("/* hi */ select 1"), StatementKind::Read);
/// assert_eq!(classify("-- x\nUPDATE t SET a=1"), StatementKind::Write);
/// ```
pub fn classify(sql: &str) -> StatementKind {
    let stripped = strip_comments(sql);
    match stripped.split_whitespace().next() {
        Some(token) if token.eq_ignore_ascii_case("SELECT") => StatementKind::Read,
        _ => StatementKind::Write,
    }
}

/// Remove block comments, then line comments, keeping line structure.
pub fn strip_comments(sql: &str) -> String {
    strip_block_comments(sql)
        .lines()
        .map(|line| match line.find(LINE_COMMENT) {
            Some(pos) => &line[..pos],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove `/* ... */` spans, shortest match first, left to right.
/// An unterminated opener is left in place.
fn strip_block_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut rest = sql;

    while let Some(start) = rest.find(BLOCK_COMMENT_START) {
        let body = &rest[start + BLOCK_COMMENT_START.len()..];
        match body.find(BLOCK_COMMENT_END) {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &body[end + BLOCK_COMMENT_END.len()..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

/// Whether a read statement targets the table catalog view.
pub fn is_table_catalog_query(sql: &str) -> bool {
    sql.to_uppercase().contains(TABLE_CATALOG)
}
