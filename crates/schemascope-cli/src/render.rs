//! Terminal rendering of analysis and optimization results

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use schemascope_core::{SchemaAnalysis, SchemaOptimization};
use serde::Serialize;

pub fn print_analysis(analysis: &SchemaAnalysis) {
    for (table_name, table_analysis) in analysis {
        println!("\nTable: {}", table_name);

        let mut metrics = Table::new();
        metrics
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Metric", "Value"]);
        metrics.add_row(vec![
            "Column Count".to_string(),
            table_analysis.column_count.to_string(),
        ]);
        metrics.add_row(vec![
            "Index Count".to_string(),
            table_analysis.index_count.to_string(),
        ]);
        metrics.add_row(vec![
            "Foreign Key Count".to_string(),
            table_analysis.foreign_key_count.to_string(),
        ]);
        println!("{metrics}");

        if !table_analysis.potential_issues.is_empty() {
            println!("Potential Issues:");
            for issue in &table_analysis.potential_issues {
                println!("- {}", issue);
            }
        }

        if let Some(performance) = &table_analysis.query_performance {
            println!("Query Performance:");
            println!(
                "Average Execution Time: {} seconds",
                performance.average_execution_time
            );
            if !performance.slow_queries.is_empty() {
                println!("Slow Queries:");
                for slow in &performance.slow_queries {
                    println!("- Execution Time: {} seconds", slow.execution_time);
                    println!("  Query: {}", slow.query);
                }
            }
        }
    }
}

pub fn print_optimization(optimization: &SchemaOptimization) {
    for (table_name, categories) in optimization {
        println!("\nOptimizations for Table: {}", table_name);
        for (category, suggestions) in categories {
            if suggestions.is_empty() {
                continue;
            }
            println!("\n{}:", category);
            for suggestion in suggestions {
                println!("- {}", suggestion);
            }
        }
    }
}

/// Serialize the whole report as one JSON document on stdout
pub fn print_json(
    analysis: &SchemaAnalysis,
    optimization: Option<&SchemaOptimization>,
) -> anyhow::Result<()> {
    #[derive(Serialize)]
    struct Report<'a> {
        analysis: &'a SchemaAnalysis,
        #[serde(skip_serializing_if = "Option::is_none")]
        optimizations: Option<&'a SchemaOptimization>,
    }

    let report = Report {
        analysis,
        optimizations: optimization,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
