//! Basic analysis and optimization: structural heuristics only

use async_trait::async_trait;
use schemascope_core::{
    Index, Result, Schema, SchemaAnalysis, SchemaOptimization, Table, TableAnalysis,
    TableOptimization,
};

use crate::{AnalysisStrategy, OptimizationStrategy};

/// Column count above which normalization is suggested
pub(crate) const NORMALIZATION_COLUMN_THRESHOLD: usize = 20;
/// Index count above which a table counts as over-indexed
const OVER_INDEXING_THRESHOLD: usize = 5;
/// Varchar display length above which TEXT is the better fit
const OVERSIZED_VARCHAR_LENGTH: u32 = 255;
/// Index-per-column ratio above which over-indexing is suggested
const OVER_INDEXING_RATIO: f64 = 0.5;
/// Large text column types worth flagging
const LARGE_TEXT_TYPES: [&str; 3] = ["text", "longtext", "mediumtext"];

/// Category key holding the basic strategy's flat suggestion list
pub const GENERAL_SUGGESTIONS: &str = "suggestions";

/// Structural analysis: per-table counts plus a fixed, ordered rule list.
/// Pure function of the schema; issues no queries.
pub struct BasicAnalysisStrategy;

#[async_trait]
impl AnalysisStrategy for BasicAnalysisStrategy {
    fn name(&self) -> &'static str {
        "basic"
    }

    async fn analyze(&self, schema: &Schema) -> Result<SchemaAnalysis> {
        let mut analysis = SchemaAnalysis::new();
        for (name, table) in schema.iter() {
            analysis.insert(
                name.clone(),
                TableAnalysis {
                    column_count: table.columns.len(),
                    index_count: table.indexes.len(),
                    foreign_key_count: table.foreign_keys.len(),
                    potential_issues: identify_potential_issues(table),
                    query_performance: None,
                    data_distribution: None,
                },
            );
        }
        Ok(analysis)
    }
}

/// Evaluate the issue rules for one table. Rules run independently and in
/// a fixed order; the order only affects the message sequence.
fn identify_potential_issues(table: &Table) -> Vec<String> {
    let mut issues = Vec::new();

    if !table.has_primary_key() {
        issues.push(
            "Table lacks a primary key. Consider adding one for better data integrity and performance."
                .to_string(),
        );
    }

    if table.indexes.is_empty() {
        issues.push(
            "Table has no indexes. Consider adding indexes for frequently queried columns."
                .to_string(),
        );
    }

    for fk in &table.foreign_keys {
        if !has_index_prefix(&table.indexes, &fk.local_columns) {
            issues.push(format!(
                "Foreign key ({}) lacks an index. Consider adding one to improve join performance.",
                fk.local_columns.join(", ")
            ));
        }
    }

    for column in &table.columns {
        if LARGE_TEXT_TYPES.contains(&column.data_type.as_str()) {
            issues.push(format!(
                "Column '{}' is a large text field. Ensure it's necessary and consider using a more compact data type if possible.",
                column.name
            ));
        }
    }

    if table.columns.len() > NORMALIZATION_COLUMN_THRESHOLD {
        issues.push(format!(
            "Table has a high number of columns ({}). Consider normalizing the table structure.",
            table.columns.len()
        ));
    }

    if table.indexes.len() > OVER_INDEXING_THRESHOLD {
        issues.push(format!(
            "Table has a high number of indexes ({}). Review and remove unnecessary indexes to improve insert/update performance.",
            table.indexes.len()
        ));
    }

    for column in &table.columns {
        if column.default.is_none() && !column.nullable {
            issues.push(format!(
                "Column '{}' has no default value and is not nullable. This might cause issues with data insertion.",
                column.name
            ));
        }
    }

    for column in &table.columns {
        if column.data_type == "varchar"
            && column.length.is_some_and(|l| l > OVERSIZED_VARCHAR_LENGTH)
        {
            issues.push(format!(
                "Column '{}' is a VARCHAR with length > 255. Consider using TEXT if you need to store large strings.",
                column.name
            ));
        }
        // Columns whose metadata carries no unsigned attribute are skipped
        if column.data_type == "int" && column.unsigned == Some(false) {
            issues.push(format!(
                "Column '{}' is a signed integer. Consider using UNSIGNED if negative values are not needed.",
                column.name
            ));
        }
    }

    issues
}

/// Whether any index covers the given columns as a leading prefix, in order
fn has_index_prefix(indexes: &[Index], columns: &[String]) -> bool {
    indexes.iter().any(|index| {
        index.columns.len() >= columns.len() && index.columns[..columns.len()] == columns[..]
    })
}

/// Flat-checklist optimization over the analysis counts and findings.
/// Pure function of the analysis input.
pub struct BasicOptimizationStrategy;

impl OptimizationStrategy for BasicOptimizationStrategy {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn optimize(&self, analysis: &SchemaAnalysis) -> Result<SchemaOptimization> {
        let mut optimization = SchemaOptimization::new();
        for (table, table_analysis) in analysis {
            let mut categories = TableOptimization::new();
            categories.insert(
                GENERAL_SUGGESTIONS.to_string(),
                suggest_optimizations(table_analysis),
            );
            optimization.insert(table.clone(), categories);
        }
        Ok(optimization)
    }
}

fn suggest_optimizations(analysis: &TableAnalysis) -> Vec<String> {
    let mut suggestions = Vec::new();

    if analysis.foreign_key_count > 0 {
        suggestions.push(
            "Consider adding indexes to foreign key columns to improve join performance."
                .to_string(),
        );
    }

    // A table with no columns has nothing to index
    if analysis.column_count > 0 && analysis.index_count == 0 {
        suggestions.push(
            "This table has no indexes. Consider adding indexes on frequently queried columns."
                .to_string(),
        );
    }

    // The ratio is undefined for a table with no columns; skip the check
    if analysis.column_count > 0 {
        let index_ratio = analysis.index_count as f64 / analysis.column_count as f64;
        if index_ratio > OVER_INDEXING_RATIO {
            suggestions.push(
                "The table might be over-indexed. Review existing indexes and consider removing unnecessary ones."
                    .to_string(),
            );
        }
    }

    if analysis.column_count > NORMALIZATION_COLUMN_THRESHOLD {
        suggestions.push(
            "The table has a high number of columns. Consider normalizing the table structure."
                .to_string(),
        );
    }

    for issue in &analysis.potential_issues {
        suggestions.push(format!("Resolve identified issue: {}", issue));
    }

    if analysis
        .query_performance
        .as_ref()
        .is_some_and(|perf| !perf.slow_queries.is_empty())
    {
        suggestions.push(
            "Optimize slow queries identified in the analysis. Consider adding indexes or restructuring the queries."
                .to_string(),
        );
    }

    if suggestions.is_empty() {
        suggestions.push(
            "No immediate optimizations identified. Continue monitoring query performance and data growth."
                .to_string(),
        );
    }

    suggestions
}
