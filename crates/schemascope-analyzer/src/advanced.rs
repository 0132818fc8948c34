//! Advanced analysis and optimization: slow-query correlation, data
//! distribution profiling, and grouped suggestions

use async_trait::async_trait;
use regex::Regex;
use schemascope_core::{
    Column, ColumnDistribution, Index, QueryPerformance, Result, Schema, SchemaAnalysis,
    SchemaOptimization, StatisticsSource, Table, TableAnalysis, TableOptimization,
};
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use crate::basic::NORMALIZATION_COLUMN_THRESHOLD;
use crate::{AnalysisStrategy, OptimizationStrategy};

/// Numeric column types profiled with MIN/MAX/AVG
const NUMERIC_TYPES: [&str; 4] = ["int", "bigint", "float", "double"];
/// Foreign key count above which denormalization is suggested
const DENORMALIZATION_FK_THRESHOLD: usize = 3;
/// Column count above which partitioning is suggested
const WIDE_TABLE_COLUMN_THRESHOLD: usize = 100_000;
/// TINYINT upper bound (exclusive) for unsigned-range values
const TINYINT_MAX: f64 = 256.0;
/// SMALLINT signed range
const SMALLINT_MIN: f64 = -32_768.0;
const SMALLINT_MAX: f64 = 32_767.0;

/// Category keys for the grouped suggestions
pub const INDEX_SUGGESTIONS: &str = "index_suggestions";
pub const DENORMALIZATION_SUGGESTIONS: &str = "denormalization_suggestions";
pub const PARTITIONING_SUGGESTIONS: &str = "partitioning_suggestions";
pub const DATA_TYPE_SUGGESTIONS: &str = "data_type_suggestions";

/// Matches the column name of a `WHERE <column> =` equality predicate.
/// Deliberately a pattern match, not a SQL parser.
static WHERE_EQUALITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"WHERE\s+(\S+)\s*=").expect("equality pattern is valid"));

/// Analysis that augments the structural counts with slow-query facts and
/// per-column data distribution read from the target database.
pub struct AdvancedAnalysisStrategy {
    statistics: Arc<dyn StatisticsSource>,
}

impl AdvancedAnalysisStrategy {
    pub fn new(statistics: Arc<dyn StatisticsSource>) -> Self {
        Self { statistics }
    }

    /// Slow-query facts for one table. A failed lookup degrades to empty
    /// facts rather than aborting the whole analysis; the slow log is
    /// frequently absent or unreadable.
    async fn query_performance(&self, table: &str) -> QueryPerformance {
        match self.statistics.slow_queries(table).await {
            Ok(slow_queries) => QueryPerformance::from_slow_queries(slow_queries),
            Err(error) => {
                tracing::warn!(
                    table = %table,
                    error = %error,
                    "slow-query lookup failed; continuing without performance facts"
                );
                QueryPerformance::empty()
            }
        }
    }

    /// Distribution facts for the profiled column types. A failed
    /// per-column aggregate skips that column only.
    async fn data_distribution(
        &self,
        table: &str,
        columns: &[Column],
    ) -> BTreeMap<String, ColumnDistribution> {
        let mut distribution = BTreeMap::new();
        for column in columns {
            if NUMERIC_TYPES.contains(&column.data_type.as_str()) {
                match self
                    .statistics
                    .numeric_distribution(table, &column.name)
                    .await
                {
                    Ok(stats) => {
                        distribution
                            .insert(column.name.clone(), ColumnDistribution::Numeric(stats));
                    }
                    Err(error) => tracing::warn!(
                        table = %table,
                        column = %column.name,
                        error = %error,
                        "numeric distribution lookup failed; skipping column"
                    ),
                }
            } else if column.data_type == "enum" {
                match self.statistics.value_counts(table, &column.name).await {
                    Ok(counts) => {
                        distribution
                            .insert(column.name.clone(), ColumnDistribution::Categorical(counts));
                    }
                    Err(error) => tracing::warn!(
                        table = %table,
                        column = %column.name,
                        error = %error,
                        "value count lookup failed; skipping column"
                    ),
                }
            }
        }
        distribution
    }
}

#[async_trait]
impl AnalysisStrategy for AdvancedAnalysisStrategy {
    fn name(&self) -> &'static str {
        "advanced"
    }

    async fn analyze(&self, schema: &Schema) -> Result<SchemaAnalysis> {
        let mut analysis = SchemaAnalysis::new();
        for (name, table) in schema.iter() {
            let query_performance = self.query_performance(name).await;
            let data_distribution = self.data_distribution(name, &table.columns).await;
            analysis.insert(
                name.clone(),
                TableAnalysis {
                    column_count: table.columns.len(),
                    index_count: table.indexes.len(),
                    foreign_key_count: table.foreign_keys.len(),
                    potential_issues: identify_potential_issues(table),
                    query_performance: Some(query_performance),
                    data_distribution: Some(data_distribution),
                },
            );
        }
        Ok(analysis)
    }
}

/// Simplified issue rules: the structural subset this strategy keeps.
/// Foreign keys require an index on exactly their column list.
fn identify_potential_issues(table: &Table) -> Vec<String> {
    let mut issues = Vec::new();

    if table.indexes.is_empty() {
        issues.push(
            "No indexes found. Consider adding indexes for frequently queried columns."
                .to_string(),
        );
    }

    if table.columns.len() > NORMALIZATION_COLUMN_THRESHOLD {
        issues.push("Large number of columns. Consider normalizing the table.".to_string());
    }

    for fk in &table.foreign_keys {
        let Some(leading) = fk.local_columns.first() else {
            continue;
        };
        if !has_exact_index(&table.indexes, &fk.local_columns) {
            issues.push(format!("Missing index on foreign key column: {}", leading));
        }
    }

    issues
}

/// Whether any index covers exactly the given column list, in order
fn has_exact_index(indexes: &[Index], columns: &[String]) -> bool {
    indexes.iter().any(|index| index.columns.as_slice() == columns)
}

/// Grouped suggestions derived from the advanced analysis facts.
/// Pure function of the analysis input.
pub struct AdvancedOptimizationStrategy;

impl OptimizationStrategy for AdvancedOptimizationStrategy {
    fn name(&self) -> &'static str {
        "advanced"
    }

    fn optimize(&self, analysis: &SchemaAnalysis) -> Result<SchemaOptimization> {
        let mut optimization = SchemaOptimization::new();
        for (table, table_analysis) in analysis {
            let mut categories = TableOptimization::new();
            categories.insert(
                INDEX_SUGGESTIONS.to_string(),
                suggest_indexes(table_analysis),
            );
            categories.insert(
                DENORMALIZATION_SUGGESTIONS.to_string(),
                suggest_denormalization(table_analysis),
            );
            categories.insert(
                PARTITIONING_SUGGESTIONS.to_string(),
                suggest_partitioning(table_analysis),
            );
            categories.insert(
                DATA_TYPE_SUGGESTIONS.to_string(),
                suggest_data_types(table_analysis),
            );
            optimization.insert(table.clone(), categories);
        }
        Ok(optimization)
    }
}

/// One suggestion per slow query that exposes equality-filtered columns
fn suggest_indexes(analysis: &TableAnalysis) -> Vec<String> {
    let mut suggestions = Vec::new();
    if let Some(performance) = &analysis.query_performance {
        for slow_query in &performance.slow_queries {
            let columns = extract_equality_columns(&slow_query.query);
            if !columns.is_empty() {
                suggestions.push(format!(
                    "Consider adding an index on columns: {}",
                    columns.join(", ")
                ));
            }
        }
    }
    suggestions
}

/// Extract column names from `WHERE <column> =` patterns in a query
fn extract_equality_columns(query: &str) -> Vec<String> {
    WHERE_EQUALITY
        .captures_iter(query)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn suggest_denormalization(analysis: &TableAnalysis) -> Vec<String> {
    if analysis.foreign_key_count > DENORMALIZATION_FK_THRESHOLD {
        vec![
            "Consider denormalizing frequently joined tables to improve query performance."
                .to_string(),
        ]
    } else {
        Vec::new()
    }
}

fn suggest_partitioning(analysis: &TableAnalysis) -> Vec<String> {
    if analysis.column_count > WIDE_TABLE_COLUMN_THRESHOLD {
        vec![
            "Consider partitioning the table based on a suitable column (e.g., date or category) to improve query performance on large datasets."
                .to_string(),
        ]
    } else {
        Vec::new()
    }
}

/// Suggest narrower integer types when the observed numeric range fits
fn suggest_data_types(analysis: &TableAnalysis) -> Vec<String> {
    let mut suggestions = Vec::new();
    if let Some(distribution) = &analysis.data_distribution {
        for (column, column_distribution) in distribution {
            let ColumnDistribution::Numeric(stats) = column_distribution else {
                continue;
            };
            let (Some(min), Some(max)) = (stats.min, stats.max) else {
                continue;
            };
            if min >= 0.0 && max < TINYINT_MAX {
                suggestions.push(format!(
                    "Consider using TINYINT for column {} to save space.",
                    column
                ));
            } else if min >= SMALLINT_MIN && max <= SMALLINT_MAX {
                suggestions.push(format!(
                    "Consider using SMALLINT for column {} to save space.",
                    column
                ));
            }
        }
    }
    suggestions
}

#[cfg(test)]
mod tests;
