//! MCP tool and resource implementations.
//!
//! - `execute_sql`: the configurable SQL execution tool
//! - `resources`: table listing and table reads
//! - `identifier`: table name validation and escaping
//! - `classifier`: READ/WRITE statement classification
//! - `format`: plain-text result rendering

pub mod classifier;
pub mod execute_sql;
pub mod format;
pub mod identifier;
pub mod resources;

pub use execute_sql::{ExecuteSqlInput, SqlToolHandler, ToolReply};
pub use resources::{ResourceHandler, TableResource};
