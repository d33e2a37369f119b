//! MSSQL MCP Server Library
//!
//! This library exposes a Microsoft SQL Server database to MCP (Model Context
//! Protocol) clients: base tables as readable resources and one tool that runs
//! arbitrary SQL.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::{ConfigError, DbError};
pub use mcp::MssqlService;
