//! Table resources.
//!
//! Every base table of the configured database is exposed as a read-only
//! resource `mssql://<table>/data` whose content is the first 100 rows.

use crate::db::{Connector, QueryExecutor, TiberiusConnector};
use crate::error::{DbError, DbResult};
use crate::models::ConnectionDescriptor;
use crate::tools::format::format_as_csv;
use crate::tools::identifier::escape_identifier;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// URI scheme prefix of table resources.
pub const RESOURCE_SCHEME: &str = "mssql://";

/// MIME type of resource contents.
pub const RESOURCE_MIME_TYPE: &str = "text/plain";

/// Maximum rows returned by a resource read.
pub const RESOURCE_ROW_LIMIT: u32 = 100;

const LIST_TABLES_SQL: &str =
    "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_TYPE = 'BASE TABLE'";

/// Descriptor of one table resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableResource {
    pub uri: String,
    pub name: String,
    pub description: String,
}

impl TableResource {
    pub fn for_table(table: &str) -> Self {
        Self {
            uri: format!("{}{}/data", RESOURCE_SCHEME, table),
            name: format!("Table: {}", table),
            description: format!("Data in table: {}", table),
        }
    }
}

/// Extract the table segment from a resource URI.
///
/// `mssql://Orders/data` yields `Orders`. Anything after the first `/` is ignored.
pub fn table_from_uri(uri: &str) -> DbResult<&str> {
    let rest = uri
        .strip_prefix(RESOURCE_SCHEME)
        .ok_or_else(|| DbError::invalid_uri(uri))?;
    Ok(rest.split('/').next().unwrap_or_default())
}

/// Handler for resource listing and reading.
pub struct ResourceHandler<C = TiberiusConnector> {
    executor: Arc<QueryExecutor<C>>,
    descriptor: Arc<ConnectionDescriptor>,
}

impl<C: Connector> ResourceHandler<C> {
    /// Create a new resource handler.
    pub fn new(executor: Arc<QueryExecutor<C>>, descriptor: Arc<ConnectionDescriptor>) -> Self {
        Self {
            executor,
            descriptor,
        }
    }

    /// List one resource per base table.
    ///
    /// Listing is best effort: any failure is logged and yields an empty list.
    pub async fn list_tables(&self) -> Vec<TableResource> {
        match self.executor.fetch(&self.descriptor, LIST_TABLES_SQL).await {
            Ok(result) => {
                let resources: Vec<TableResource> = result
                    .rows
                    .iter()
                    .filter_map(|row| row.first())
                    .map(|table| TableResource::for_table(table))
                    .collect();
                info!(count = resources.len(), "Listed table resources");
                resources
            }
            Err(e) => {
                warn!(error = %e, "Failed to list resources");
                Vec::new()
            }
        }
    }

    /// Read the first rows of the table named by `uri`.
    ///
    /// # Errors
    ///
    /// - [`DbError::InvalidUri`] for a foreign scheme
    /// - [`DbError::InvalidIdentifier`] for a malformed table name
    /// - [`DbError::Execution`] with the engine's message for database failures
    pub async fn read_table(&self, uri: &str) -> DbResult<String> {
        let table = table_from_uri(uri)?;
        let escaped = escape_identifier(table)?;
        info!(table = %table, "Reading resource");

        let sql = format!("SELECT TOP {} * FROM {}", RESOURCE_ROW_LIMIT, escaped);
        let result = self.executor.fetch(&self.descriptor, &sql).await?;

        Ok(format_as_csv(&result))
    }
}

impl<C> Clone for ResourceHandler<C> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            descriptor: Arc::clone(&self.descriptor),
        }
    }
}
