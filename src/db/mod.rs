//! Database access layer.
//!
//! - `driver`: driver registry and selection
//! - `resolver`: settings to connection descriptor
//! - `connector`: session seam used by the executor
//! - `mssql`: tiberius-backed sessions
//! - `executor`: single-statement execution
//! - `types`: cell rendering

pub mod connector;
pub mod driver;
pub mod executor;
pub mod mssql;
pub mod resolver;
pub mod types;

pub use connector::{Connector, Session};
pub use driver::{DriverRegistry, NativeDriverRegistry, StaticDriverRegistry};
pub use executor::QueryExecutor;
pub use mssql::{TiberiusConnector, TiberiusSession};
pub use resolver::ConfigResolver;
