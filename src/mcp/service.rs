//! MCP service implementation using rmcp.
//!
//! This module defines the MssqlService struct exposing the table resources
//! and the SQL execution tool over the MCP protocol. The tool name comes from
//! configuration, so listing and dispatch are implemented directly on
//! [`ServerHandler`] instead of through the router macros.

use crate::db::{Connector, QueryExecutor, TiberiusConnector};
use crate::models::ConnectionDescriptor;
use crate::tools::execute_sql::{self, SqlToolHandler, TOOL_DESCRIPTION, ToolReply};
use crate::tools::resources::{RESOURCE_MIME_TYPE, ResourceHandler, TableResource};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, Content, Implementation,
        ListResourcesResult, ListToolsResult, PaginatedRequestParam, ProtocolVersion, RawResource,
        ReadResourceRequestParam, ReadResourceResult, Resource, ResourceContents,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
};
use std::sync::Arc;
use tracing::info;

pub struct MssqlService<C = TiberiusConnector> {
    /// Handler for the SQL execution tool
    tools: SqlToolHandler<C>,
    /// Handler for table resources
    resources: ResourceHandler<C>,
}

impl<C: Connector> MssqlService<C> {
    /// Create a new MssqlService instance.
    ///
    /// # Arguments
    ///
    /// * `executor` - Shared statement executor
    /// * `descriptor` - Connection descriptor resolved at startup
    /// * `command` - Name under which the SQL tool is exposed
    pub fn new(
        executor: Arc<QueryExecutor<C>>,
        descriptor: Arc<ConnectionDescriptor>,
        command: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            tools: SqlToolHandler::new(Arc::clone(&executor), Arc::clone(&descriptor), command),
            resources: ResourceHandler::new(executor, descriptor),
        }
    }

    /// The single tool offered by this server.
    pub fn tool_definition(&self) -> Tool {
        Tool::new(
            self.tools.command().to_string(),
            TOOL_DESCRIPTION,
            Arc::new(execute_sql::input_schema()),
        )
    }

    /// Current table resources.
    pub async fn resource_list(&self) -> Vec<Resource> {
        self.resources
            .list_tables()
            .await
            .into_iter()
            .map(to_mcp_resource)
            .collect()
    }
}

impl<C> Clone for MssqlService<C> {
    fn clone(&self) -> Self {
        Self {
            tools: self.tools.clone(),
            resources: self.resources.clone(),
        }
    }
}

fn to_mcp_resource(table: TableResource) -> Resource {
    let mut resource = RawResource::new(table.uri, table.name);
    resource.description = Some(table.description);
    resource.mime_type = Some(RESOURCE_MIME_TYPE.to_string());
    resource.no_annotation()
}

fn to_call_result(reply: ToolReply) -> CallToolResult {
    let content = vec![Content::text(reply.text)];
    if reply.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

impl<C: Connector> ServerHandler for MssqlService<C> {
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        Ok(ListResourcesResult::with_all_items(
            self.resource_list().await,
        ))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!(uri = %request.uri, "Reading resource");
        let text = self.resources.read_table(&request.uri).await?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult::with_all_items(vec![self.tool_definition()]))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let reply = self.tools.invoke(&request.name, request.arguments).await?;
        Ok(to_call_result(reply))
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "mssql-mcp-server".to_owned(),
                title: Some("MSSQL MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "Microsoft SQL Server gateway.\n\
                \n\
                - Resources: every base table is exposed as `mssql://<table>/data` \
                  (first 100 rows, comma-separated with a header line)\n\
                - Tool `{}`: runs one SQL statement. SELECT returns rows; \
                  anything else is committed and returns the affected row count",
                self.tools.command()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionSettings;
    use crate::db::{ConfigResolver, NativeDriverRegistry};

    fn create_test_service(command: &str) -> MssqlService {
        let settings = ConnectionSettings {
            database: Some("shop".to_string()),
            user: Some("app".to_string()),
            password: Some("pw".to_string()),
            ..ConnectionSettings::for_host("localhost")
        };
        let descriptor = ConfigResolver::new(NativeDriverRegistry)
            .resolve(&settings)
            .unwrap();
        MssqlService::new(
            Arc::new(QueryExecutor::new(TiberiusConnector)),
            Arc::new(descriptor),
            command,
        )
    }

    #[test]
    fn test_server_info() {
        let info = create_test_service("execute_sql").get_info();
        assert_eq!(info.server_info.name, "mssql-mcp-server");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.instructions.unwrap().contains("`execute_sql`"));
    }

    #[test]
    fn test_tool_definition_uses_configured_name() {
        let tool = create_test_service("run_sql").tool_definition();
        assert_eq!(tool.name, "run_sql");
        assert_eq!(
            tool.description.as_deref(),
            Some("Execute an SQL query on the SQL Server")
        );
        assert!(tool.input_schema.contains_key("properties"));
    }

    #[test]
    fn test_resource_conversion() {
        let resource = to_mcp_resource(TableResource::for_table("Orders"));
        assert_eq!(resource.uri, "mssql://Orders/data");
        assert_eq!(resource.name, "Table: Orders");
        assert_eq!(resource.description.as_deref(), Some("Data in table: Orders"));
        assert_eq!(resource.mime_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn test_error_reply_is_flagged() {
        let result = to_call_result(ToolReply::error("Error executing query: boom"));
        assert_eq!(result.is_error, Some(true));
        let result = to_call_result(ToolReply::success("x\n1"));
        assert_eq!(result.is_error, Some(false));
    }
}
