//! Connection seam between the executor and the wire driver.
//!
//! A [`Connector`] opens one [`Session`] per request; the executor closes it
//! when the request is done. The production implementation lives in
//! [`crate::db::mssql`].

use crate::error::DbResult;
use crate::models::{ConnectionDescriptor, TabularResult};
use std::future::Future;

/// Opens sessions against the database described by a descriptor.
pub trait Connector: Send + Sync + 'static {
    type Session: Session;

    /// Open a new session. Connectivity and login failures are execution errors.
    fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> impl Future<Output = DbResult<Self::Session>> + Send;
}

/// One open database session.
pub trait Session: Send + Sized {
    /// Run a statement and collect the first result set as text.
    fn fetch_all(&mut self, sql: &str) -> impl Future<Output = DbResult<TabularResult>> + Send;

    /// Run a statement, commit, and return the affected row count.
    fn execute_and_commit(&mut self, sql: &str) -> impl Future<Output = DbResult<u64>> + Send;

    /// Close the session.
    fn close(self) -> impl Future<Output = DbResult<()>> + Send;
}
