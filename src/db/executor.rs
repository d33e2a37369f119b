//! Query execution engine.
//!
//! Every call opens a fresh session through the [`Connector`], runs exactly one
//! statement and closes the session again, on success and on failure alike.
//! There is no pooling and no retry.
//!
//! Statement shape is decided by [`classify`]:
//! - READ: the first result set is collected as text
//! - WRITE: the statement is committed and the affected row count returned

use crate::db::connector::{Connector, Session};
use crate::db::mssql::TiberiusConnector;
use crate::error::DbResult;
use crate::models::{ConnectionDescriptor, StatementKind, StatementOutcome, TabularResult};
use crate::tools::classifier::{classify, is_table_catalog_query};
use std::time::Instant;
use tracing::{debug, warn};

/// Query executor that handles database statement execution.
#[derive(Debug, Clone, Default)]
pub struct QueryExecutor<C = TiberiusConnector> {
    connector: C,
}

impl<C: Connector> QueryExecutor<C> {
    /// Create an executor that opens sessions through `connector`.
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// Execute a single statement and shape the result by its kind.
    ///
    /// Reads against `INFORMATION_SCHEMA.TABLES` come back as a one-column
    /// `Tables_in_<database>` listing.
    pub async fn execute(
        &self,
        descriptor: &ConnectionDescriptor,
        sql: &str,
    ) -> DbResult<StatementOutcome> {
        let kind = classify(sql);
        let start = Instant::now();
        debug!(sql = %sql, kind = ?kind, "Executing statement");

        let mut session = self.connector.connect(descriptor).await?;

        let outcome = match kind {
            StatementKind::Read => session.fetch_all(sql).await.map(|result| {
                if is_table_catalog_query(sql) {
                    StatementOutcome::Rows(result.into_table_listing(&descriptor.database))
                } else {
                    StatementOutcome::Rows(result)
                }
            }),
            StatementKind::Write => session
                .execute_and_commit(sql)
                .await
                .map(StatementOutcome::Affected),
        };

        close_session(session).await;

        match &outcome {
            Ok(StatementOutcome::Rows(result)) => debug!(
                rows = result.row_count(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Query completed"
            ),
            Ok(StatementOutcome::Affected(rows)) => debug!(
                rows_affected = rows,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Write completed"
            ),
            Err(e) => debug!(error = %e, "Statement failed"),
        }

        outcome
    }

    /// Run a read statement and return the raw first result set.
    pub async fn fetch(
        &self,
        descriptor: &ConnectionDescriptor,
        sql: &str,
    ) -> DbResult<TabularResult> {
        debug!(sql = %sql, "Fetching rows");

        let mut session = self.connector.connect(descriptor).await?;
        let result = session.fetch_all(sql).await;
        close_session(session).await;

        result
    }
}

/// Close a session. A failing close never changes the request's outcome.
async fn close_session<S: Session>(session: S) {
    if let Err(e) = session.close().await {
        warn!(error = %e, "Failed to close database session");
    }
}
