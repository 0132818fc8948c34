//! MySQL slow-query and data-distribution lookups

use async_trait::async_trait;
use schemascope_core::{
    Connection, NumericStats, Result, SlowQuery, StatisticsSource, Value, ValueCount,
};

use crate::MySqlConnection;

/// How many slow-log entries to surface per table
const SLOW_QUERY_LIMIT: u32 = 5;

/// Quote an identifier for interpolation into MySQL SQL.
///
/// Identifiers come from trusted metadata, but they still pass through
/// backtick quoting (internal backticks doubled) before interpolation.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

#[async_trait]
impl StatisticsSource for MySqlConnection {
    #[tracing::instrument(skip(self))]
    async fn slow_queries(&self, table: &str) -> Result<Vec<SlowQuery>> {
        let db = self.require_database()?;
        // The slow log has no table column; scope best-effort on the query
        // text in addition to the database.
        let sql = format!(
            "SELECT sql_text, TIME_TO_SEC(query_time) AS execution_time
             FROM mysql.slow_log
             WHERE db = ? AND sql_text LIKE ?
             ORDER BY query_time DESC
             LIMIT {}",
            SLOW_QUERY_LIMIT
        );
        let result = self
            .query(
                &sql,
                &[
                    Value::String(db.to_string()),
                    Value::String(format!("%{}%", table)),
                ],
            )
            .await?;

        let slow_queries = result
            .rows
            .iter()
            .map(|row| SlowQuery {
                query: row
                    .get(0)
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
                execution_time: row.get(1).and_then(|v| v.as_f64()).unwrap_or(0.0),
            })
            .collect();

        Ok(slow_queries)
    }

    #[tracing::instrument(skip(self))]
    async fn numeric_distribution(&self, table: &str, column: &str) -> Result<NumericStats> {
        let col = quote_ident(column);
        let sql = format!(
            "SELECT MIN({col}) AS min_value, MAX({col}) AS max_value, AVG({col}) AS avg_value FROM {}",
            quote_ident(table),
        );
        let result = self.query(&sql, &[]).await?;

        let stats = result
            .rows
            .first()
            .map(|row| NumericStats {
                min: row.get(0).and_then(|v| v.as_f64()),
                max: row.get(1).and_then(|v| v.as_f64()),
                avg: row.get(2).and_then(|v| v.as_f64()),
            })
            .unwrap_or_default();

        Ok(stats)
    }

    #[tracing::instrument(skip(self))]
    async fn value_counts(&self, table: &str, column: &str) -> Result<Vec<ValueCount>> {
        let col = quote_ident(column);
        let sql = format!(
            "SELECT {col} AS value, COUNT(*) AS count FROM {} GROUP BY {col} ORDER BY {col}",
            quote_ident(table),
        );
        let result = self.query(&sql, &[]).await?;

        let counts = result
            .rows
            .iter()
            .map(|row| ValueCount {
                value: row.get(0).map(|v| v.to_string()).unwrap_or_default(),
                count: row.get(1).and_then(|v| v.as_i64()).unwrap_or(0),
            })
            .collect();

        Ok(counts)
    }
}

#[cfg(test)]
mod tests;
