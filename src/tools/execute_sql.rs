//! SQL execution tool.
//!
//! The gateway exposes exactly one tool. Its name is configurable
//! (`execute_sql` by default) and it takes a single `query` argument.
//! Database failures are returned as tool error content, not protocol errors.

use crate::db::{Connector, QueryExecutor, TiberiusConnector};
use crate::error::{DbError, DbResult};
use crate::models::{ConnectionDescriptor, StatementOutcome};
use crate::tools::format::{format_as_csv, format_rows_affected};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use tracing::{error, info};

/// Description advertised for the tool.
pub const TOOL_DESCRIPTION: &str = "Execute an SQL query on the SQL Server";

const QUERY_REQUIRED: &str = "Query is required";

/// Input for the SQL execution tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteSqlInput {
    /// The SQL query to execute
    pub query: String,
}

impl ExecuteSqlInput {
    /// Parse raw tool arguments.
    ///
    /// A missing, null or empty `query` is rejected with `Query is required`.
    pub fn from_arguments(arguments: Option<Map<String, JsonValue>>) -> DbResult<Self> {
        let arguments = arguments.unwrap_or_default();
        if matches!(arguments.get("query"), None | Some(JsonValue::Null)) {
            return Err(DbError::invalid_input(QUERY_REQUIRED));
        }

        let input: Self = serde_json::from_value(JsonValue::Object(arguments))
            .map_err(|e| DbError::invalid_input(format!("Invalid arguments: {}", e)))?;

        if input.query.is_empty() {
            return Err(DbError::invalid_input(QUERY_REQUIRED));
        }
        Ok(input)
    }
}

/// JSON schema of [`ExecuteSqlInput`], as advertised in the tool listing.
pub fn input_schema() -> Map<String, JsonValue> {
    match serde_json::to_value(schemars::schema_for!(ExecuteSqlInput)) {
        Ok(JsonValue::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Text reply of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolReply {
    pub text: String,
    /// True when the statement failed
    pub is_error: bool,
}

impl ToolReply {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Handler for the SQL execution tool.
pub struct SqlToolHandler<C = TiberiusConnector> {
    executor: Arc<QueryExecutor<C>>,
    descriptor: Arc<ConnectionDescriptor>,
    command: Arc<str>,
}

impl<C: Connector> SqlToolHandler<C> {
    /// Create a new handler serving the tool named `command`.
    pub fn new(
        executor: Arc<QueryExecutor<C>>,
        descriptor: Arc<ConnectionDescriptor>,
        command: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            executor,
            descriptor,
            command: command.into(),
        }
    }

    /// Name of the tool.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Handle a tool call.
    ///
    /// # Errors
    ///
    /// Fails only for calls the gateway cannot serve: an unknown tool name or
    /// a missing query. Statement failures come back as an error [`ToolReply`].
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Option<Map<String, JsonValue>>,
    ) -> DbResult<ToolReply> {
        if name != &*self.command {
            return Err(DbError::unknown_tool(name));
        }
        let input = ExecuteSqlInput::from_arguments(arguments)?;

        info!(tool = %name, "Calling tool");

        match self.executor.execute(&self.descriptor, &input.query).await {
            Ok(StatementOutcome::Rows(result)) => {
                info!(row_count = result.row_count(), "Query executed");
                Ok(ToolReply::success(format_as_csv(&result)))
            }
            Ok(StatementOutcome::Affected(rows)) => {
                info!(rows_affected = rows, "Statement executed");
                Ok(ToolReply::success(format_rows_affected(rows)))
            }
            Err(e) => {
                error!(error = %e, "Error executing SQL");
                Ok(ToolReply::error(format!(
                    "Error executing query: {}",
                    e.reason()
                )))
            }
        }
    }
}

impl<C> Clone for SqlToolHandler<C> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            descriptor: Arc::clone(&self.descriptor),
            command: Arc::clone(&self.command),
        }
    }
}
