//! Query-related data models.

use serde::Serialize;

/// Read or write, decided from the first token of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementKind {
    /// SELECT - rows are fetched and returned
    Read,
    /// Everything else - committed, affected row count returned
    Write,
}

/// Column names plus stringified rows, in engine order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TabularResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows returned.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Reshape a catalog listing into a single `Tables_in_<database>` column
    /// holding the first value of every row.
    pub fn into_table_listing(self, database: &str) -> Self {
        let rows = self
            .rows
            .into_iter()
            .map(|row| vec![row.into_iter().next().unwrap_or_default()])
            .collect();
        Self {
            columns: vec![format!("Tables_in_{}", database)],
            rows,
        }
    }
}

/// What a single statement produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementOutcome {
    Rows(TabularResult),
    Affected(u64),
}
