//! Configuration handling for the MSSQL MCP Server.
//!
//! This module provides configuration management via CLI arguments and environment variables.
//! Database settings use the `MSSQL_*` variables, server settings the `MCP_*` ones.

use crate::models::connection::DEFAULT_PORT;
use clap::{ArgAction, Parser, ValueEnum};

pub const DEFAULT_SERVER: &str = "localhost";
pub const DEFAULT_COMMAND: &str = "execute_sql";
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Parse an on/off setting. Only `true` (any case) switches it on.
pub fn parse_flag(value: &str) -> Result<bool, String> {
    Ok(value.eq_ignore_ascii_case("true"))
}

/// Raw connection inputs, before resolution into a descriptor.
#[derive(Clone, Default)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub database: Option<String>,
    pub user: Option<String>,
    /// Sensitive - never log
    pub password: Option<String>,
    pub windows_auth: bool,
    /// None means "use the host-dependent default"
    pub encrypt: Option<bool>,
}

impl ConnectionSettings {
    /// Settings for a host with every optional input unset.
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            ..Self::default()
        }
    }
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("windows_auth", &self.windows_auth)
            .field("encrypt", &self.encrypt)
            .finish()
    }
}

/// Configuration for the MSSQL MCP Server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mssql-mcp-server",
    about = "MCP server for Microsoft SQL Server - lets AI assistants list tables, read table data and run SQL",
    version,
    author
)]
pub struct Config {
    /// SQL Server host. Use `(localdb)\<instance>` for LocalDB.
    #[arg(long = "server", default_value = DEFAULT_SERVER, env = "MSSQL_SERVER")]
    pub server: String,

    /// SQL Server TCP port
    #[arg(long, default_value_t = DEFAULT_PORT, env = "MSSQL_PORT")]
    pub port: u16,

    /// Database to connect to (required)
    #[arg(long, env = "MSSQL_DATABASE")]
    pub database: Option<String>,

    /// Login name for SQL Authentication
    #[arg(long, env = "MSSQL_USER")]
    pub user: Option<String>,

    /// Password for SQL Authentication
    #[arg(long, env = "MSSQL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Use Windows (integrated) authentication instead of a SQL login
    #[arg(
        long,
        env = "MSSQL_WINDOWS_AUTH",
        default_value = "false",
        value_parser = parse_flag,
        action = ArgAction::Set
    )]
    pub windows_auth: bool,

    /// Encrypt the connection. Defaults to true for Azure SQL hosts, false otherwise.
    #[arg(long, env = "MSSQL_ENCRYPT", value_parser = parse_flag, action = ArgAction::Set)]
    pub encrypt: Option<bool>,

    /// Name of the SQL execution tool
    #[arg(long, default_value = DEFAULT_COMMAND, env = "MSSQL_COMMAND")]
    pub command: String,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            port: DEFAULT_PORT,
            database: None,
            user: None,
            password: None,
            windows_auth: false,
            encrypt: None,
            command: DEFAULT_COMMAND.to_string(),
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Connection inputs for the resolver. Empty strings count as unset.
    pub fn connection_settings(&self) -> ConnectionSettings {
        fn non_empty(value: &Option<String>) -> Option<String> {
            value.as_ref().filter(|v| !v.is_empty()).cloned()
        }

        ConnectionSettings {
            host: self.server.clone(),
            port: self.port,
            database: non_empty(&self.database),
            user: non_empty(&self.user),
            password: non_empty(&self.password),
            windows_auth: self.windows_auth,
            encrypt: self.encrypt,
        }
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
