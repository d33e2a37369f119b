//! Output formatting utilities for MCP tools and resources.
//!
//! Tabular results are rendered as plain comma-separated text: a header line
//! of column names followed by one line per row. Values are not quoted.

use crate::models::TabularResult;

/// Render a result as `header\nrow\nrow...`.
pub fn format_as_csv(result: &TabularResult) -> String {
    let mut lines = Vec::with_capacity(result.rows.len() + 1);
    lines.push(result.columns.join(","));
    lines.extend(result.rows.iter().map(|row| row.join(",")));
    lines.join("\n")
}

/// Message returned after a successful write statement.
pub fn format_rows_affected(rows_affected: u64) -> String {
    format!("Query executed successfully. Rows affected: {}", rows_affected)
}
