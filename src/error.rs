//! Error types for the MSSQL MCP Server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! `ConfigError` is fatal at startup; every `DbError` is local to one request.
//! No variant ever carries a password.

use thiserror::Error;

/// Startup configuration failures. Without a descriptor no operation can run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing database: MSSQL_DATABASE is required")]
    MissingDatabase,

    #[error(
        "missing credentials: MSSQL_USER and MSSQL_PASSWORD are required for SQL Authentication"
    )]
    MissingCredentials,

    #[error(
        "no driver: no SQL Server driver is registered (searched {searched} driver(s) for '{marker}')"
    )]
    NoDriver { marker: String, searched: usize },
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Carries the rejected input verbatim for diagnostics.
    #[error("Invalid table name: {input}")]
    InvalidIdentifier { input: String },

    #[error("Invalid URI scheme: {uri}")]
    InvalidUri { uri: String },

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("{message}")]
    InvalidInput { message: String },

    /// Anything the engine reported: connectivity, syntax, constraints, permissions.
    #[error("Database error: {message}")]
    Execution { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create an invalid identifier error.
    pub fn invalid_identifier(input: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            input: input.into(),
        }
    }

    /// Create an invalid URI error.
    pub fn invalid_uri(uri: impl Into<String>) -> Self {
        Self::InvalidUri { uri: uri.into() }
    }

    /// Create an unknown tool error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an execution error.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The underlying reason without the category prefix.
    ///
    /// For execution errors this is the engine's own message.
    pub fn reason(&self) -> String {
        match self {
            Self::Execution { message } | Self::Internal { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// True for failures that belong to the request itself rather than the database.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. }
                | Self::InvalidUri { .. }
                | Self::UnknownTool { .. }
                | Self::InvalidInput { .. }
        )
    }
}

impl From<tiberius::error::Error> for DbError {
    fn from(err: tiberius::error::Error) -> Self {
        match err {
            tiberius::error::Error::Server(token) => DbError::execution(format!(
                "{} (code: {}, state: {})",
                token.message(),
                token.code(),
                token.state()
            )),
            other => DbError::execution(other.to_string()),
        }
    }
}

impl From<std::io::Error> for DbError {
    fn from(err: std::io::Error) -> Self {
        DbError::execution(format!("I/O error: {}", err))
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Convert DbError to MCP ErrorData for semantic error categorization.
impl From<DbError> for rmcp::ErrorData {
    fn from(err: DbError) -> Self {
        if err.is_client_error() {
            rmcp::ErrorData::invalid_params(err.to_string(), None)
        } else {
            rmcp::ErrorData::internal_error(err.to_string(), None)
        }
    }
}
