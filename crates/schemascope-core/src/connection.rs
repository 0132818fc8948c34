//! Connection trait

use crate::{QueryResult, Result, Value};
use async_trait::async_trait;

/// A read-only database connection.
///
/// schemascope never mutates the target database, so the trait exposes only
/// the query path. Parameters are positional; drivers substitute them with
/// whatever placeholder syntax the engine uses.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "mysql")
    fn driver_name(&self) -> &str;

    /// Execute a query that returns rows (SELECT)
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult>;
}
