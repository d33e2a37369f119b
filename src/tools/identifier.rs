//! Table identifier validation.
//!
//! Identifiers are `table` or `schema.table`, each segment made of ASCII
//! letters, digits and underscores. Accepted identifiers are returned in
//! bracket-quoted form, ready to splice into a statement.

use crate::error::{DbError, DbResult};

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate and bracket-escape a table identifier.
///
/// # Errors
///
/// Returns [`DbError::InvalidIdentifier`] carrying the original input when the
/// identifier does not match the grammar. Nothing is ever partially escaped.
///
/// # Examples
///
/// ```
/// use mssql_mcp_server::tools::identifier::escape_identifier;
///
/// assert_eq!(escape_identifier("dbo.Orders").unwrap(), "[dbo].[Orders]");
/// assert!(escape_identifier("Orders; DROP TABLE x").is_err());
/// ```
pub fn escape_identifier(input: &str) -> DbResult<String> {
    let segments: Vec<&str> = input.split('.').collect();

    let valid = matches!(segments.len(), 1 | 2) && segments.iter().all(|s| is_valid_segment(s));
    if !valid {
        return Err(DbError::invalid_identifier(input));
    }

    Ok(segments
        .iter()
        .map(|s| format!("[{}]", s))
        .collect::<Vec<_>>()
        .join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_segment() {
        assert_eq!(escape_identifier("Orders").unwrap(), "[Orders]");
        assert_eq!(escape_identifier("order_items_2024").unwrap(), "[order_items_2024]");
    }

    #[test]
    fn test_schema_qualified() {
        assert_eq!(escape_identifier("sales.Orders").unwrap(), "[sales].[Orders]");
    }

    #[test]
    fn test_rejections() {
        for input in [
            "",
            ".",
            "a.",
            ".a",
            "a.b.c",
            "a b",
            "Orders;",
            "Orders; DROP TABLE x",
            "[Orders]",
            "Ord-ers",
            "Orders\n",
            "tãble",
        ] {
            assert!(escape_identifier(input).is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_error_carries_input() {
        match escape_identifier("bad name") {
            Err(DbError::InvalidIdentifier { input }) => assert_eq!(input, "bad name"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
