//! Tests for the advanced strategies

use super::*;
use pretty_assertions::assert_eq;
use schemascope_core::{
    ForeignKey, NumericStats, SchemaScopeError, SlowQuery, ValueCount,
};
use std::collections::HashMap;

fn col(name: &str, data_type: &str) -> Column {
    Column {
        name: name.to_string(),
        data_type: data_type.to_string(),
        length: None,
        nullable: true,
        default: None,
        unsigned: None,
    }
}

fn index(name: &str, columns: &[&str], is_primary: bool) -> Index {
    Index {
        name: name.to_string(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
        is_unique: is_primary,
        is_primary,
    }
}

fn counts_only(column_count: usize, index_count: usize, foreign_key_count: usize) -> TableAnalysis {
    TableAnalysis {
        column_count,
        index_count,
        foreign_key_count,
        potential_issues: Vec::new(),
        query_performance: None,
        data_distribution: None,
    }
}

/// Canned statistics for exercising the strategy without a database
#[derive(Default)]
struct FakeStatistics {
    slow: Vec<SlowQuery>,
    numeric: HashMap<String, NumericStats>,
    counts: HashMap<String, Vec<ValueCount>>,
    failing: bool,
}

#[async_trait]
impl StatisticsSource for FakeStatistics {
    async fn slow_queries(&self, _table: &str) -> schemascope_core::Result<Vec<SlowQuery>> {
        if self.failing {
            return Err(SchemaScopeError::Query("slow log unavailable".into()));
        }
        Ok(self.slow.clone())
    }

    async fn numeric_distribution(
        &self,
        _table: &str,
        column: &str,
    ) -> schemascope_core::Result<NumericStats> {
        if self.failing {
            return Err(SchemaScopeError::Query("aggregate rejected".into()));
        }
        Ok(self.numeric.get(column).copied().unwrap_or_default())
    }

    async fn value_counts(
        &self,
        _table: &str,
        column: &str,
    ) -> schemascope_core::Result<Vec<ValueCount>> {
        if self.failing {
            return Err(SchemaScopeError::Query("aggregate rejected".into()));
        }
        Ok(self.counts.get(column).cloned().unwrap_or_default())
    }
}

fn schema_with(table: &str, columns: Vec<Column>, indexes: Vec<Index>) -> Schema {
    let mut schema = Schema::new();
    schema.insert(
        table,
        Table {
            columns,
            indexes,
            foreign_keys: Vec::new(),
        },
    );
    schema
}

mod analysis_tests {
    use super::*;

    #[tokio::test]
    async fn test_average_execution_time_is_mean_of_slow_queries() {
        let stats = FakeStatistics {
            slow: vec![
                SlowQuery {
                    query: "SELECT * FROM users WHERE email = 'a'".to_string(),
                    execution_time: 2.0,
                },
                SlowQuery {
                    query: "SELECT * FROM users".to_string(),
                    execution_time: 4.0,
                },
            ],
            ..Default::default()
        };
        let strategy = AdvancedAnalysisStrategy::new(Arc::new(stats));
        let schema = schema_with(
            "users",
            vec![col("id", "int")],
            vec![index("PRIMARY", &["id"], true)],
        );

        let analysis = strategy.analyze(&schema).await.unwrap();
        let perf = analysis["users"].query_performance.as_ref().unwrap();
        assert_eq!(perf.average_execution_time, 3.0);
        assert_eq!(perf.slow_queries.len(), 2);
    }

    #[tokio::test]
    async fn test_no_slow_queries_yields_zero_average() {
        let strategy = AdvancedAnalysisStrategy::new(Arc::new(FakeStatistics::default()));
        let schema = schema_with(
            "users",
            vec![col("id", "int")],
            vec![index("PRIMARY", &["id"], true)],
        );

        let analysis = strategy.analyze(&schema).await.unwrap();
        let perf = analysis["users"].query_performance.as_ref().unwrap();
        assert_eq!(perf.average_execution_time, 0.0);
    }

    #[tokio::test]
    async fn test_distribution_profiles_numeric_and_enum_columns_only() {
        let stats = FakeStatistics {
            numeric: HashMap::from([(
                "age".to_string(),
                NumericStats {
                    min: Some(0.0),
                    max: Some(90.0),
                    avg: Some(35.0),
                },
            )]),
            counts: HashMap::from([(
                "status".to_string(),
                vec![ValueCount {
                    value: "active".to_string(),
                    count: 12,
                }],
            )]),
            ..Default::default()
        };
        let strategy = AdvancedAnalysisStrategy::new(Arc::new(stats));
        let schema = schema_with(
            "users",
            vec![
                col("age", "int"),
                col("status", "enum"),
                col("email", "varchar"),
            ],
            vec![index("PRIMARY", &["age"], true)],
        );

        let analysis = strategy.analyze(&schema).await.unwrap();
        let distribution = analysis["users"].data_distribution.as_ref().unwrap();
        assert!(matches!(
            distribution.get("age"),
            Some(ColumnDistribution::Numeric(_))
        ));
        assert!(matches!(
            distribution.get("status"),
            Some(ColumnDistribution::Categorical(_))
        ));
        assert!(!distribution.contains_key("email"));
    }

    #[tokio::test]
    async fn test_sub_query_failures_do_not_abort_analysis() {
        let stats = FakeStatistics {
            failing: true,
            ..Default::default()
        };
        let strategy = AdvancedAnalysisStrategy::new(Arc::new(stats));
        let schema = schema_with(
            "users",
            vec![col("age", "int"), col("status", "enum")],
            vec![index("PRIMARY", &["age"], true)],
        );

        let analysis = strategy.analyze(&schema).await.unwrap();
        let users = &analysis["users"];
        assert_eq!(
            users.query_performance.as_ref().unwrap().average_execution_time,
            0.0
        );
        assert!(users.data_distribution.as_ref().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_key_requires_exact_index_match() {
        let mut schema = Schema::new();
        schema.insert(
            "orders",
            Table {
                columns: vec![col("tenant_id", "int"), col("user_id", "int")],
                // A composite index prefixed by the FK column is not enough here
                indexes: vec![index("tenant_idx", &["tenant_id", "user_id"], false)],
                foreign_keys: vec![ForeignKey {
                    name: "tenant_fk".to_string(),
                    local_columns: vec!["tenant_id".to_string()],
                    referenced_table: "tenants".to_string(),
                    referenced_columns: vec!["id".to_string()],
                }],
            },
        );
        let strategy = AdvancedAnalysisStrategy::new(Arc::new(FakeStatistics::default()));

        let analysis = strategy.analyze(&schema).await.unwrap();
        assert!(
            analysis["orders"]
                .potential_issues
                .iter()
                .any(|i| i.contains("Missing index on foreign key column: tenant_id"))
        );
    }
}

mod extraction_tests {
    use super::*;

    #[test]
    fn test_extracts_column_after_where_equality() {
        let columns =
            extract_equality_columns("SELECT * FROM users WHERE email = 'a@example.com'");
        assert_eq!(columns, vec!["email"]);
    }

    #[test]
    fn test_only_the_predicate_following_where_is_captured() {
        let columns =
            extract_equality_columns("SELECT * FROM users WHERE email = 'a' AND status = 'b'");
        assert_eq!(columns, vec!["email"]);
    }

    #[test]
    fn test_no_equality_predicate_yields_nothing() {
        assert!(extract_equality_columns("SELECT * FROM users").is_empty());
        assert!(extract_equality_columns("SELECT * FROM users WHERE age > 3").is_empty());
    }
}

mod optimization_tests {
    use super::*;

    #[test]
    fn test_one_index_suggestion_per_slow_query() {
        let mut analysis_entry = counts_only(3, 1, 0);
        analysis_entry.query_performance = Some(QueryPerformance::from_slow_queries(vec![
            SlowQuery {
                query: "SELECT * FROM users WHERE email = 'a'".to_string(),
                execution_time: 3.0,
            },
            SlowQuery {
                query: "SELECT * FROM users".to_string(),
                execution_time: 2.0,
            },
        ]));
        let suggestions = suggest_indexes(&analysis_entry);
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("email"));
    }

    #[test]
    fn test_denormalization_requires_more_than_three_foreign_keys() {
        assert!(suggest_denormalization(&counts_only(5, 1, 4)).len() == 1);
        assert!(suggest_denormalization(&counts_only(5, 1, 3)).is_empty());
    }

    #[test]
    fn test_partitioning_threshold() {
        assert!(suggest_partitioning(&counts_only(100_001, 1, 0)).len() == 1);
        assert!(suggest_partitioning(&counts_only(100_000, 1, 0)).is_empty());
    }

    #[test]
    fn test_small_range_suggests_tinyint() {
        let mut analysis_entry = counts_only(1, 1, 0);
        analysis_entry.data_distribution = Some(BTreeMap::from([(
            "age".to_string(),
            ColumnDistribution::Numeric(NumericStats {
                min: Some(0.0),
                max: Some(200.0),
                avg: Some(40.0),
            }),
        )]));
        let suggestions = suggest_data_types(&analysis_entry);
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("TINYINT for column age"));
    }

    #[test]
    fn test_medium_range_suggests_smallint() {
        let mut analysis_entry = counts_only(1, 1, 0);
        analysis_entry.data_distribution = Some(BTreeMap::from([(
            "delta".to_string(),
            ColumnDistribution::Numeric(NumericStats {
                min: Some(-100.0),
                max: Some(30_000.0),
                avg: Some(5.0),
            }),
        )]));
        let suggestions = suggest_data_types(&analysis_entry);
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("SMALLINT for column delta"));
    }

    #[test]
    fn test_wide_range_suggests_nothing() {
        let mut analysis_entry = counts_only(1, 1, 0);
        analysis_entry.data_distribution = Some(BTreeMap::from([(
            "total".to_string(),
            ColumnDistribution::Numeric(NumericStats {
                min: Some(-100_000.0),
                max: Some(200_000.0),
                avg: Some(12.0),
            }),
        )]));
        assert!(suggest_data_types(&analysis_entry).is_empty());
    }

    #[test]
    fn test_all_categories_present_even_when_empty() {
        let mut analysis = SchemaAnalysis::new();
        analysis.insert("users".to_string(), counts_only(2, 1, 0));

        let optimization = AdvancedOptimizationStrategy.optimize(&analysis).unwrap();
        let users = &optimization["users"];
        for category in [
            INDEX_SUGGESTIONS,
            DENORMALIZATION_SUGGESTIONS,
            PARTITIONING_SUGGESTIONS,
            DATA_TYPE_SUGGESTIONS,
        ] {
            assert!(users.contains_key(category), "missing {}", category);
            assert!(users[category].is_empty());
        }
    }
}
