//! Analysis and optimization result shapes, and the statistics trait

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A previously logged query whose execution time exceeded the engine's
/// slow-query threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlowQuery {
    pub query: String,
    /// Execution time in seconds
    pub execution_time: f64,
}

/// Slow-query facts for one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPerformance {
    /// Arithmetic mean of the returned execution times, 0 when none were found
    pub average_execution_time: f64,
    /// Slowest logged queries, slowest first
    pub slow_queries: Vec<SlowQuery>,
}

impl QueryPerformance {
    /// Build performance facts from a slow-query listing
    pub fn from_slow_queries(slow_queries: Vec<SlowQuery>) -> Self {
        let average_execution_time = if slow_queries.is_empty() {
            0.0
        } else {
            slow_queries.iter().map(|q| q.execution_time).sum::<f64>()
                / slow_queries.len() as f64
        };
        Self {
            average_execution_time,
            slow_queries,
        }
    }

    pub fn empty() -> Self {
        Self::from_slow_queries(Vec::new())
    }
}

/// MIN/MAX/AVG aggregate over a numeric column. All fields are None when
/// the table holds no rows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NumericStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

/// Row count for one distinct value of a categorical column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: i64,
}

/// Data-distribution facts for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnDistribution {
    Numeric(NumericStats),
    Categorical(Vec<ValueCount>),
}

/// Per-table analysis produced by an analysis strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableAnalysis {
    pub column_count: usize,
    pub index_count: usize,
    pub foreign_key_count: usize,
    /// Human-readable findings, in rule-evaluation order
    pub potential_issues: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_performance: Option<QueryPerformance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_distribution: Option<BTreeMap<String, ColumnDistribution>>,
}

/// Mapping from table name to its analysis
pub type SchemaAnalysis = BTreeMap<String, TableAnalysis>;

/// Suggestion lists grouped by category for one table
pub type TableOptimization = BTreeMap<String, Vec<String>>;

/// Mapping from table name to its grouped suggestions
pub type SchemaOptimization = BTreeMap<String, TableOptimization>;

/// Read-only data statistics needed by the advanced analysis strategy.
///
/// All lookups are scoped to the active database of the underlying
/// connection.
#[async_trait]
pub trait StatisticsSource: Send + Sync {
    /// The slowest logged queries touching a table, slowest first
    async fn slow_queries(&self, table: &str) -> Result<Vec<SlowQuery>>;

    /// MIN/MAX/AVG aggregate for a numeric column
    async fn numeric_distribution(&self, table: &str, column: &str) -> Result<NumericStats>;

    /// Per-value row counts for a categorical column
    async fn value_counts(&self, table: &str, column: &str) -> Result<Vec<ValueCount>>;
}

#[cfg(test)]
mod tests;
