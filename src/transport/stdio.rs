//! Stdio transport for the MCP server.
//!
//! This transport uses standard input/output for communication,
//! which is the standard mode for CLI-based MCP integrations.
//! Logs go to stderr so they never interleave with protocol messages.

use crate::db::{Connector, TiberiusConnector};
use crate::error::{DbError, DbResult};
use crate::mcp::MssqlService;
use crate::transport::{Transport, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use tracing::{info, warn};

/// Stdio transport implementation.
///
/// This transport reads JSON-RPC messages from stdin and writes
/// responses to stdout, following the MCP protocol specification.
pub struct StdioTransport<C = TiberiusConnector> {
    service: MssqlService<C>,
}

impl<C: Connector> StdioTransport<C> {
    /// Create a new stdio transport serving `service`.
    pub fn new(service: MssqlService<C>) -> Self {
        Self { service }
    }
}

impl<C: Connector> Transport for StdioTransport<C> {
    async fn run(&self) -> DbResult<()> {
        info!("Starting MCP server with stdio transport");

        let running_service = self
            .service
            .clone()
            .serve(stdio())
            .await
            .map_err(|e| DbError::internal(format!("Failed to start stdio transport: {}", e)))?;

        let shutdown_requested = tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => {
                        info!("Stdio transport completed normally");
                    }
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        return Err(DbError::internal(format!("Stdio transport error: {}", e)));
                    }
                }
                false
            }
            _ = wait_for_signal() => {
                info!("Shutdown signal received");
                true
            }
        };

        if shutdown_requested {
            // A blocked stdin read cannot be interrupted; leave the process directly.
            info!("Exiting process");
            std::process::exit(0);
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionSettings;
    use crate::db::{ConfigResolver, NativeDriverRegistry, QueryExecutor};
    use std::sync::Arc;

    #[test]
    fn test_stdio_transport_creation() {
        let settings = ConnectionSettings {
            database: Some("shop".to_string()),
            windows_auth: true,
            ..ConnectionSettings::for_host("localhost")
        };
        let descriptor = ConfigResolver::new(NativeDriverRegistry)
            .resolve(&settings)
            .unwrap();
        let service = MssqlService::new(
            Arc::new(QueryExecutor::new(TiberiusConnector)),
            Arc::new(descriptor),
            "execute_sql",
        );
        let transport = StdioTransport::new(service);
        assert_eq!(transport.name(), "stdio");
    }
}
