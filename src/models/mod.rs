//! Data models for the MSSQL MCP Server.
//!
//! This module re-exports all model types used throughout the application.
//! Every value here is transient: rebuilt per request, never persisted.

pub mod connection;
pub mod query;

// Re-export commonly used types
pub use connection::{AuthMode, ConnectionDescriptor, ConnectionSummary};
pub use query::{StatementKind, StatementOutcome, TabularResult};
