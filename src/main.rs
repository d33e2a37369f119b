//! MSSQL MCP Server - Main entry point.
//!
//! This server exposes a Microsoft SQL Server database to AI assistants over
//! MCP: table resources plus a configurable SQL execution tool.

use clap::Parser;
use mssql_mcp_server::config::{Config, TransportMode};
use mssql_mcp_server::db::{
    ConfigResolver, NativeDriverRegistry, QueryExecutor, TiberiusConnector,
};
use mssql_mcp_server::mcp::MssqlService;
use mssql_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr; stdout carries the stdio protocol stream.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    init_tracing(&config);

    info!(
        transport = %config.transport,
        "Starting MSSQL MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Resolve the connection once; the descriptor is immutable afterwards
    let resolver = ConfigResolver::new(NativeDriverRegistry);
    let descriptor = match resolver.resolve(&config.connection_settings()) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            error!(error = %e, "Invalid database configuration");
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("Required environment:");
            eprintln!("  MSSQL_DATABASE                      database name");
            eprintln!("  MSSQL_USER / MSSQL_PASSWORD         SQL Authentication");
            eprintln!("  MSSQL_WINDOWS_AUTH=true             Windows Authentication instead");
            eprintln!();
            eprintln!("Optional: MSSQL_SERVER (default localhost), MSSQL_PORT (default 1433),");
            eprintln!("          MSSQL_ENCRYPT, MSSQL_COMMAND (default execute_sql)");
            std::process::exit(1);
        }
    };

    let summary = descriptor.summary();
    info!(
        auth = %summary.auth_mode,
        driver = %summary.driver,
        encrypt = summary.encrypt,
        trust_server_certificate = summary.trust_server_certificate,
        "Database config: {}",
        summary
    );

    let service = MssqlService::new(
        Arc::new(QueryExecutor::new(TiberiusConnector)),
        Arc::new(descriptor),
        config.command.as_str(),
    );

    // Run the appropriate transport
    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            StdioTransport::new(service).run().await
        }
        TransportMode::Http => {
            info!(
                bind = %config.http_bind_addr(),
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                service,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
